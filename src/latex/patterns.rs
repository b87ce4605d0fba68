//! Cached regex patterns for LaTeX and BibTeX scanning.
//!
//! Uses LazyLock to compile patterns once on first use.

use regex_lite::Regex;
use std::sync::LazyLock;

// === Comment patterns ===

/// Matches a `%` not preceded by a backslash, through end of line.
/// Group 1 holds the character before the `%` so it can be put back.
pub static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^|[^\\])%.*$").unwrap());

/// Matches `\begin{comment} ... \end{comment}` blocks, across lines.
pub static COMMENT_ENV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\begin\{comment\}.*?\\end\{comment\}").unwrap());

/// Matches runs of three or more blank lines, LF or CRLF.
pub static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\s*\n\s*\n\s*\n+").unwrap());

/// Matches whitespace runs, for text normalization.
pub static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// === Directive patterns ===

/// Matches `\input{...}`, `\include{...}` and `\subfile{...}`
pub static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:input|include|subfile)\{([^}]+)\}").unwrap());

/// Matches `\bibliography{a,b}`
pub static BIBLIOGRAPHY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\bibliography\{([^}]+)\}").unwrap());

/// Matches `\bibliographystyle{...}`
pub static BIBLIOGRAPHY_STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\bibliographystyle\{([^}]+)\}").unwrap());

/// Matches `\includegraphics[opts]{path}`
pub static GRAPHICS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\includegraphics\*?(?:\[[^\]]*\])?\{([^}]+)\}").unwrap()
});

/// Matches any command whose name contains `cite` (covers `\nocite`,
/// `\citep`, `\parencite`, custom wrappers), skipping optional arguments.
pub static CITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\[a-zA-Z]*cite[a-zA-Z]*\*?\s*(?:\[[^\]]*\]\s*)*\{([^}]+)\}").unwrap()
});

/// Matches `\documentclass`, for main-file detection.
pub static DOCUMENTCLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\documentclass\b").unwrap());

// === BibTeX patterns ===

/// Matches a block opener `@type{` or `@type(`; group 1 is the type.
pub static BIB_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)\s*[{(]").unwrap());

/// Matches the citation key that opens an entry body, up to its comma.
pub static BIB_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^,\s{}@]+)\s*,").unwrap());
