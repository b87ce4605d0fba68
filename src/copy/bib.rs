//! BibTeX entry filtering.
//!
//! Blocks are recognised textually: a block starts at `@type{` and runs up to
//! the next `@` or end of file. This is the same approximation BibTeX tooling
//! commonly relies on; an `@` inside a field value truncates the block that
//! contains it.
//!
//! `@string`, `@preamble` and `@comment` blocks carry no key and are always
//! kept, since the remaining entries may reference their macros.

use std::collections::BTreeSet;
use std::ops::Range;

use memchr::memchr;

use crate::latex::patterns::{BIB_ENTRY_RE, BIB_KEY_RE};
use crate::latex::{WILDCARD_KEY, strip_line_comments};

const MACRO_KINDS: &[&str] = &["string", "preamble", "comment"];

/// One block within a `.bib` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry<'a> {
    /// Block type as written, e.g. `article` or `String`.
    pub kind: &'a str,
    /// Citation key; `None` for macro blocks and malformed entries.
    pub key: Option<&'a str>,
    pub text: &'a str,
    pub span: Range<usize>,
}

impl BibEntry<'_> {
    /// Whether this is a `@string`, `@preamble` or `@comment` block.
    pub fn is_macro(&self) -> bool {
        MACRO_KINDS.iter().any(|kind| self.kind.eq_ignore_ascii_case(kind))
    }
}

/// What filtering did to a bibliography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BibOutcome {
    /// No keys or `\nocite{*}`: every entry kept, comments stripped.
    KeptAll,
    /// Only cited entries kept, plus macro blocks.
    Filtered { kept: usize, total: usize },
    /// Nothing matched; the whole file was kept as a precaution.
    NoMatches,
}

/// Split `content` into blocks in file order.
///
/// # Examples
///
/// ```
/// use texprune::copy::parse_entries;
///
/// let bib = "@string{ack = {Thanks}}\n@article{a, title={A}}\n@book{b, title={B}}\n";
/// let keys: Vec<_> = parse_entries(bib).iter().filter_map(|e| e.key).collect();
/// assert_eq!(keys, vec!["a", "b"]);
/// ```
pub fn parse_entries(content: &str) -> Vec<BibEntry<'_>> {
    let bytes = content.as_bytes();
    let mut entries = Vec::new();
    let mut pos = 0;

    while let Some(caps) = BIB_ENTRY_RE.captures_at(content, pos) {
        let (Some(opener), Some(kind)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        let end = memchr(b'@', &bytes[opener.end()..]).map_or(content.len(), |i| opener.end() + i);
        let mut entry = BibEntry {
            kind: kind.as_str(),
            key: None,
            text: &content[opener.start()..end],
            span: opener.start()..end,
        };
        if !entry.is_macro() {
            entry.key = BIB_KEY_RE
                .captures(&content[opener.end()..end])
                .and_then(|key| key.get(1))
                .map(|key| key.as_str());
        }
        entries.push(entry);
        pos = end;
    }

    entries
}

/// Keep only the entries whose keys were cited, plus every macro block.
///
/// Comments are always stripped. Kept blocks are reassembled in file order,
/// separated by one blank line, with a single trailing newline.
pub fn filter_bibliography(content: &str, citations: &BTreeSet<String>) -> (String, BibOutcome) {
    let stripped = strip_line_comments(content);

    if citations.is_empty() || citations.contains(WILDCARD_KEY) {
        return (stripped, BibOutcome::KeptAll);
    }

    let entries = parse_entries(&stripped);
    let total = entries.iter().filter(|entry| entry.key.is_some()).count();
    let cited = |entry: &BibEntry<'_>| entry.key.is_some_and(|key| citations.contains(key));

    let kept = entries.iter().filter(|entry| cited(entry)).count();
    if kept == 0 {
        return (stripped, BibOutcome::NoMatches);
    }

    let mut filtered = entries
        .iter()
        .filter(|entry| entry.is_macro() || cited(entry))
        .map(|entry| entry.text.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n");
    filtered.push('\n');
    (filtered, BibOutcome::Filtered { kept, total })
}
