//! LaTeX comment removal.
//!
//! There are two strippers with different jobs:
//!
//! - [`strip_for_scan`] is regex-based and only feeds the directive scanner.
//!   It also drops `comment` environments so directives inside them are ignored.
//!   Its output is never written anywhere.
//! - [`remove_comments`] is line-oriented and produces the text that is
//!   persisted in the cleaned project.
//!
//! Both treat `\%` as a literal percent sign rather than a comment opener.

use memchr::memchr_iter;

use super::patterns::{BLANK_RUN_RE, COMMENT_ENV_RE, LINE_COMMENT_RE};

/// Remove `%` line comments, keeping everything up to the comment marker.
///
/// ```
/// use texprune::latex::strip_line_comments;
///
/// assert_eq!(strip_line_comments("100\\% done % trailing"), "100\\% done ");
/// ```
pub fn strip_line_comments(text: &str) -> String {
    LINE_COMMENT_RE.replace_all(text, "${1}").into_owned()
}

/// Comment-free text for directive scanning.
///
/// Strips line comments first, then `\begin{comment}...\end{comment}` blocks.
pub fn strip_for_scan(text: &str) -> String {
    let without_lines = strip_line_comments(text);
    COMMENT_ENV_RE.replace_all(&without_lines, "").into_owned()
}

/// Byte offset of the first `%` in `line` that is not directly preceded by `\`.
pub fn find_comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    memchr_iter(b'%', bytes).find(|&i| i == 0 || bytes[i - 1] != b'\\')
}

/// Remove comments line by line, producing the persisted form of a source.
///
/// - Lines whose first non-whitespace character is `%` are dropped.
/// - Other lines are cut at the first unescaped `%`; the line ending is kept.
/// - Runs of three or more blank lines collapse to two.
/// - Non-empty output ends with exactly one line ending.
///
/// CRLF sources stay CRLF: collapsed runs and the final line ending use
/// `\r\n` whenever the input contains one.
///
/// # Examples
///
/// ```
/// use texprune::latex::remove_comments;
///
/// let src = "% header\n\\section{A} % note\nText 50\\% off\n";
/// assert_eq!(remove_comments(src), "\\section{A} \nText 50\\% off\n");
/// ```
pub fn remove_comments(text: &str) -> String {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut result = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        if line.trim_start().starts_with('%') {
            continue;
        }

        match find_comment_start(line) {
            Some(pos) => {
                result.push_str(&line[..pos]);
                if line.ends_with("\r\n") {
                    result.push_str("\r\n");
                } else if line.ends_with('\n') {
                    result.push('\n');
                }
            }
            None => result.push_str(line),
        }
    }

    let blank_run = newline.repeat(3);
    let collapsed = BLANK_RUN_RE.replace_all(&result, blank_run.as_str());
    if collapsed.is_empty() {
        return String::new();
    }

    let mut text = collapsed.trim_end_matches(['\r', '\n']).to_string();
    text.push_str(newline);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scan_strip_escaped_percent() {
        assert_eq!(strip_for_scan("100\\% done % trailing"), "100\\% done ");
    }

    #[test]
    fn test_scan_strip_full_line_comment() {
        let src = "a\n% \\input{hidden}\nb\n";
        assert_eq!(strip_for_scan(src), "a\n\nb\n");
    }

    #[test]
    fn test_scan_strip_adjacent_percents() {
        assert_eq!(strip_for_scan("x\\%%c"), "x\\%");
    }

    #[test]
    fn test_scan_strip_comment_environment() {
        let src = "keep\n\\begin{comment}\n\\input{draft}\n\\end{comment}\nafter";
        let stripped = strip_for_scan(src);
        assert!(!stripped.contains("draft"));
        assert!(stripped.contains("keep"));
        assert!(stripped.contains("after"));
    }

    #[test]
    fn test_remove_comments_escaped_percent() {
        assert_eq!(remove_comments("100\\% done % trailing"), "100\\% done \n");
    }

    #[test]
    fn test_remove_comments_drops_indented_comment_lines() {
        let src = "\\begin{document}\n    % indented\nbody\n";
        assert_eq!(remove_comments(src), "\\begin{document}\nbody\n");
    }

    #[test]
    fn test_remove_comments_collapses_blank_runs() {
        let src = "a\n\n\n\n\n\nb\n";
        assert_eq!(remove_comments(src), "a\n\n\nb\n");
    }

    #[test]
    fn test_remove_comments_single_trailing_newline() {
        assert_eq!(remove_comments("end\n\n\n"), "end\n");
        assert_eq!(remove_comments("end"), "end\n");
        assert_eq!(remove_comments(""), "");
    }

    #[test]
    fn test_remove_comments_keeps_newline_of_truncated_line() {
        assert_eq!(remove_comments("a % x\nb\n"), "a \nb\n");
    }

    #[test]
    fn test_remove_comments_keeps_crlf_endings() {
        let src = "\\section{A} % note\r\n% dropped\r\nbody\r\n\r\n\r\n";
        assert_eq!(remove_comments(src), "\\section{A} \r\nbody\r\n");
    }

    #[test]
    fn test_remove_comments_collapses_crlf_blank_runs() {
        let src = "a\r\n\r\n\r\n\r\n\r\nb";
        assert_eq!(remove_comments(src), "a\r\n\r\n\r\nb\r\n");
    }

    #[test]
    fn test_find_comment_start() {
        assert_eq!(find_comment_start("abc"), None);
        assert_eq!(find_comment_start("%abc"), Some(0));
        assert_eq!(find_comment_start("a\\%b%c"), Some(4));
    }

    proptest! {
        #[test]
        fn prop_remove_comments_is_idempotent(
            lines in prop::collection::vec("[a-z \\\\%{}]{0,12}", 0..12)
        ) {
            let text = lines.join("\n");
            let once = remove_comments(&text);
            prop_assert_eq!(remove_comments(&once), once.clone());
        }

        #[test]
        fn prop_scan_strip_is_idempotent(
            lines in prop::collection::vec("[a-z \\\\%{}]{0,12}", 0..12)
        ) {
            let text = lines.join("\n");
            let once = strip_for_scan(&text);
            prop_assert_eq!(strip_for_scan(&once), once.clone());
        }

        #[test]
        fn prop_escaped_percent_survives(word in "[a-z]{1,8}") {
            let text = format!("{word} 5\\% more");
            prop_assert_eq!(strip_for_scan(&text), text.clone());
            prop_assert_eq!(remove_comments(&text), format!("{text}\n"));
        }
    }
}
