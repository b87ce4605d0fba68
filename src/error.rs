//! Error types for texprune operations.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while resolving, copying, or comparing projects.
///
/// Resolution and copying are best-effort and only surface I/O errors at
/// their outermost boundary; everything else is logged and skipped.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Could not determine a main TeX file in {0}")]
    NoMainFile(PathBuf),

    #[error("{program} failed: {reason}")]
    Toolchain { program: String, reason: String },

    #[error("{program} did not finish within {}s", timeout.as_secs())]
    CompileTimeout { program: String, timeout: Duration },

    #[error("PDF not generated: {0}")]
    MissingArtifact(PathBuf),

    #[error("PDF processing failed: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, Error>;
