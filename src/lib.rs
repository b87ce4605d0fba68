//! # texprune
//!
//! Minimize a LaTeX project for submission and verify that the minimized
//! copy still renders the same document.
//!
//! ## Features
//!
//! - Resolve the transitive `\input`/`\include`/`\subfile` graph of a main document
//! - Collect referenced graphics, bibliographies, styles, and citation keys
//! - Copy only what is used, with comments stripped from `.tex` sources
//! - Prune `.bib` files down to the cited entries
//! - Compare two compiled projects by hash, extracted text, and rendered pages
//!
//! ## Quick Start
//!
//! ```no_run
//! use texprune::{Copier, Resolver};
//!
//! let mut resolution = Resolver::new("paper").resolve("main.tex");
//! let report = Copier::new("paper", "paper-clean")
//!     .copy(&mut resolution.deps)
//!     .unwrap();
//! println!("{} files written", report.copied.len());
//! ```
//!
//! ## Checking the Result
//!
//! ```no_run
//! use std::path::Path;
//! use texprune::compare::{Checker, LatexToolchain, PdfiumBackend};
//! use texprune::config::CompareOptions;
//!
//! let toolchain = LatexToolchain::default();
//! let pdfium = PdfiumBackend::new();
//! let checker = Checker::new(&toolchain, &pdfium, &pdfium, CompareOptions::default());
//!
//! let result = checker
//!     .check(Path::new("paper"), Path::new("paper-clean"), Path::new("main.tex"))
//!     .unwrap();
//! assert!(result.verdict.is_success());
//! ```
//!
//! Scanning is regex based and best-effort: macros that expand to include
//! directives, or `\input` inside verbatim blocks, are not understood.

pub mod compare;
pub mod config;
pub mod copy;
pub mod error;
pub mod latex;
pub mod resolve;
pub mod util;

use std::path::Path;

pub use compare::{Checker, Comparison, Verdict};
pub use copy::{Copier, CopyReport};
pub use error::{Error, Result};
pub use latex::find_main_tex;
pub use resolve::{DepNode, DependencySet, NodeKind, Resolution, Resolver};

/// Resolve `main` inside `source` and copy the result into `output`.
///
/// The dependency tree and summary are logged before copying.
pub fn clean_project(source: &Path, output: &Path, main: &Path) -> Result<(Resolution, CopyReport)> {
    let mut resolution = Resolver::new(source).resolve(main);
    if let Some(tree) = &resolution.tree {
        tree.log();
    }
    resolution.deps.log_summary();

    let report = Copier::new(source, output).copy(&mut resolution.deps)?;
    Ok((resolution, report))
}
