//! Normalized-text tier.

use similar::TextDiff;

use crate::latex::patterns::WHITESPACE_RE;

/// Result of comparing extracted page text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextReport {
    pub identical: bool,
    /// Unified diff of the raw extracted text, when it differs.
    pub diff: Option<String>,
    /// Set when text could not be extracted from either PDF.
    pub error: Option<String>,
}

impl TextReport {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            identical: false,
            diff: None,
            error: Some(reason.into()),
        }
    }
}

/// Collapse every whitespace run to one space and trim.
///
/// ```
/// use texprune::compare::normalize_text;
///
/// assert_eq!(normalize_text("  Intro\n\n  text\tbody "), "Intro text body");
/// ```
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Compare per-page text of two documents.
pub fn compare_text(original: &[String], cleaned: &[String]) -> TextReport {
    let original = original.join("\n\n");
    let cleaned = cleaned.join("\n\n");

    if normalize_text(&original) == normalize_text(&cleaned) {
        return TextReport {
            identical: true,
            ..Default::default()
        };
    }

    TextReport {
        identical: false,
        diff: Some(unified_diff(&original, &cleaned)),
        error: None,
    }
}

/// Line-based unified diff with `Original PDF` / `Cleaned PDF` headers.
pub fn unified_diff(original: &str, cleaned: &str) -> String {
    TextDiff::from_lines(original, cleaned)
        .unified_diff()
        .context_radius(3)
        .header("Original PDF", "Cleaned PDF")
        .to_string()
}
