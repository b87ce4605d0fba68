//! Directive scanning over comment-free LaTeX text.
//!
//! Scanning is textual and best-effort: includes hidden behind
//! `\newcommand` wrappers, `\if` branches, or citation macros without `cite`
//! in their name are invisible to it.

use super::patterns::{BIBLIOGRAPHY_RE, BIBLIOGRAPHY_STYLE_RE, CITE_RE, GRAPHICS_RE, INPUT_RE};

/// Key in `\nocite{*}` meaning "every bibliography entry is cited".
pub const WILDCARD_KEY: &str = "*";

/// Arguments of every directive found in one source file, in document order
/// within each family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// `\input`, `\include`, `\subfile` targets
    pub includes: Vec<String>,
    /// `\bibliography` names, already split and suffixed with `.bib`
    pub bibliographies: Vec<String>,
    /// `\bibliographystyle` names, suffixed with `.bst`
    pub styles: Vec<String>,
    /// Citation keys from every `cite`-like command
    pub citations: Vec<String>,
    /// `\includegraphics` base paths
    pub graphics: Vec<String>,
}

/// Collect all directives from already comment-stripped text.
///
/// # Examples
///
/// ```
/// use texprune::latex::scan_directives;
///
/// let found = scan_directives("\\input{intro}\\citep[p.~2]{knuth84, lamport94}");
/// assert_eq!(found.includes, vec!["intro"]);
/// assert_eq!(found.citations, vec!["knuth84", "lamport94"]);
/// ```
pub fn scan_directives(text: &str) -> Directives {
    let mut found = Directives::default();

    for caps in INPUT_RE.captures_iter(text) {
        found.includes.push(caps[1].trim().to_string());
    }

    for caps in BIBLIOGRAPHY_RE.captures_iter(text) {
        found.bibliographies.extend(
            split_list(&caps[1]).map(|name| with_default_extension(name, ".bib")),
        );
    }

    for caps in BIBLIOGRAPHY_STYLE_RE.captures_iter(text) {
        found.styles.push(with_default_extension(caps[1].trim(), ".bst"));
    }

    for caps in CITE_RE.captures_iter(text) {
        found.citations.extend(split_list(&caps[1]).map(str::to_string));
    }

    for caps in GRAPHICS_RE.captures_iter(text) {
        found.graphics.push(caps[1].trim().to_string());
    }

    found
}

/// Split a comma-separated argument, trimming entries and skipping empty ones.
fn split_list(arg: &str) -> impl Iterator<Item = &str> {
    arg.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Append `ext` unless `name` already ends with it.
pub fn with_default_extension(name: &str, ext: &str) -> String {
    if name.ends_with(ext) {
        name.to_string()
    } else {
        format!("{name}{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_includes() {
        let found = scan_directives("\\input{a}\n\\include{b}\n\\subfile{ c }\n\\includegraphics{d}");
        assert_eq!(found.includes, vec!["a", "b", "c"]);
        assert_eq!(found.graphics, vec!["d"]);
    }

    #[test]
    fn test_scan_bibliography_list() {
        let found = scan_directives("\\bibliography{refs, extra.bib}\\bibliographystyle{plainnat}");
        assert_eq!(found.bibliographies, vec!["refs.bib", "extra.bib"]);
        assert_eq!(found.styles, vec!["plainnat.bst"]);
    }

    #[test]
    fn test_scan_citation_family() {
        let text = "\\cite{a} \\citet{b,c} \\parencite[see][12]{d} \\nocite{*} \\mycitecmd{e}";
        let found = scan_directives(text);
        assert_eq!(found.citations, vec!["a", "b", "c", "d", "*", "e"]);
    }

    #[test]
    fn test_scan_citation_with_space_before_argument() {
        let found = scan_directives("\\cite [chap. 2] {knuth}");
        assert_eq!(found.citations, vec!["knuth"]);
    }

    #[test]
    fn test_bibliographystyle_is_not_a_citation() {
        let found = scan_directives("\\bibliographystyle{plain}");
        assert!(found.citations.is_empty());
    }

    #[test]
    fn test_scan_graphics_with_options() {
        let found = scan_directives("\\includegraphics[width=0.5\\linewidth]{figs/plot}");
        assert_eq!(found.graphics, vec!["figs/plot"]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(scan_directives("plain prose"), Directives::default());
    }

    #[test]
    fn test_with_default_extension() {
        assert_eq!(with_default_extension("refs", ".bib"), "refs.bib");
        assert_eq!(with_default_extension("refs.bib", ".bib"), "refs.bib");
    }
}
