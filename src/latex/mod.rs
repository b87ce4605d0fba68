//! Textual LaTeX analysis: comment stripping, directive scanning, and
//! main-document detection.

mod comments;
mod directives;
mod discover;
pub(crate) mod patterns;

pub use comments::{find_comment_start, remove_comments, strip_for_scan, strip_line_comments};
pub use directives::{Directives, WILDCARD_KEY, scan_directives, with_default_extension};
pub use discover::find_main_tex;
