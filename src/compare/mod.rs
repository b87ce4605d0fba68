//! Equivalence checking between an original and a cleaned project.
//!
//! Both projects are compiled, then the two PDFs go through up to three
//! tiers, cheapest first:
//!
//! 1. [`hash`]: byte-identical artifacts end the check immediately.
//! 2. [`text`]: per-page text with whitespace runs collapsed.
//! 3. [`visual`]: rendered pages compared pixel by pixel (opt-in).
//!
//! The toolchain and both PDF services are injected as trait objects, so the
//! checker itself never touches LaTeX or PDFium directly.

pub mod hash;
pub mod pdf;
pub mod text;
pub mod toolchain;
pub mod visual;

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::config::CompareOptions;
use crate::error::Result;

pub use hash::file_digest;
pub use pdf::{PageRasterizer, PdfiumBackend, TextExtractor, render_dimensions};
pub use text::{TextReport, compare_text, normalize_text, unified_diff};
pub use toolchain::{LatexToolchain, Toolchain, needs_bibtex};
pub use visual::{PageResult, VisualReport, compare_pages, pixel_diff_ratio};

/// Overall outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    HashIdentical,
    TextIdentical,
    VisuallyIdentical,
    Differs,
}

impl Verdict {
    /// Whether the cleaned project reproduces the original's bytes or text.
    ///
    /// A visual match alone is reported but does not count: the text differs.
    pub fn is_success(self) -> bool {
        matches!(self, Verdict::HashIdentical | Verdict::TextIdentical)
    }
}

/// Everything the checker learned about a pair of PDFs.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub verdict: Verdict,
    pub hash_match: bool,
    /// `None` when the hash tier already decided.
    pub text: Option<TextReport>,
    /// `None` unless the visual tier was requested and reached.
    pub visual: Option<VisualReport>,
}

/// Compiles two projects and compares the results.
pub struct Checker<'a> {
    toolchain: &'a dyn Toolchain,
    text: &'a dyn TextExtractor,
    raster: &'a dyn PageRasterizer,
    options: CompareOptions,
}

impl<'a> Checker<'a> {
    pub fn new(
        toolchain: &'a dyn Toolchain,
        text: &'a dyn TextExtractor,
        raster: &'a dyn PageRasterizer,
        options: CompareOptions,
    ) -> Self {
        Self {
            toolchain,
            text,
            raster,
            options,
        }
    }

    /// Compile both projects and compare the artifacts.
    ///
    /// A compilation failure on either side is returned as `Err` and no
    /// comparison is attempted.
    pub fn check(&self, original_dir: &Path, cleaned_dir: &Path, main_tex: &Path) -> Result<Comparison> {
        info!("Compiling original project...");
        let original_pdf = self.toolchain.compile(original_dir, main_tex)?;

        info!("Compiling cleaned project...");
        let cleaned_pdf = self.toolchain.compile(cleaned_dir, main_tex)?;

        Ok(self.compare_pdfs(&original_pdf, &cleaned_pdf))
    }

    /// Compare two already-compiled PDFs.
    pub fn compare_pdfs(&self, original: &Path, cleaned: &Path) -> Comparison {
        info!("Comparing PDF hashes...");
        let hash_match = match (file_digest(original), file_digest(cleaned)) {
            (Ok(a), Ok(b)) => {
                debug!(original = %a, cleaned = %b, "PDF digests");
                a == b
            }
            (Err(e), _) | (_, Err(e)) => {
                error!("Could not hash PDFs: {e}");
                false
            }
        };

        if hash_match {
            info!("PDF hashes match perfectly!");
            return Comparison {
                verdict: Verdict::HashIdentical,
                hash_match,
                text: None,
                visual: None,
            };
        }
        info!("PDF hashes differ. This is common due to timestamps and other metadata.");

        info!("Comparing PDF text content...");
        let text = self.text_tier(original, cleaned);
        if text.identical {
            info!("PDF text content is identical!");
        } else if text.error.is_none() {
            warn!("PDF text content differs!");
            if let Some(diff) = text.diff.as_deref().filter(|_| self.options.show_diff) {
                info!("Text differences:\n{diff}");
            }
        }

        let visual = self.options.visual.then(|| {
            info!("Comparing PDFs visually...");
            let report = self.visual_tier(original, cleaned);
            if report.is_identical() {
                info!("PDFs are visually identical!");
            } else {
                warn!("PDFs have visual differences!");
            }
            report
        });

        let verdict = if text.identical {
            Verdict::TextIdentical
        } else if visual.as_ref().is_some_and(VisualReport::is_identical) {
            Verdict::VisuallyIdentical
        } else {
            Verdict::Differs
        };

        Comparison {
            verdict,
            hash_match,
            text: Some(text),
            visual,
        }
    }

    fn text_tier(&self, original: &Path, cleaned: &Path) -> TextReport {
        let pages = self
            .text
            .page_texts(original)
            .and_then(|a| self.text.page_texts(cleaned).map(|b| (a, b)));

        match pages {
            Ok((a, b)) => compare_text(&a, &b),
            Err(e) => {
                error!("Error comparing PDF text: {e}");
                TextReport::failed(e.to_string())
            }
        }
    }

    fn visual_tier(&self, original: &Path, cleaned: &Path) -> VisualReport {
        let dpi = self.options.dpi;
        let images = self
            .raster
            .rasterize(original, dpi)
            .and_then(|a| self.raster.rasterize(cleaned, dpi).map(|b| (a, b)));

        let (a, b) = match images {
            Ok(pair) => pair,
            Err(e) => {
                error!("Error in visual comparison: {e}");
                return VisualReport::failed(e.to_string());
            }
        };

        let report = compare_pages(&a, &b, self.options.pixel_threshold);
        if report.page_count_mismatch() {
            warn!(
                "Different number of pages: {} vs {}",
                report.original_pages, report.cleaned_pages
            );
        }
        for (index, page) in report.pages.iter().enumerate() {
            match page {
                PageResult::Match { ratio } => {
                    debug!(page = index + 1, ratio, "Page matches");
                }
                PageResult::Differs { ratio } => {
                    warn!("Page {} differs: {:.2}% pixels different", index + 1, ratio * 100.0);
                }
                PageResult::SizeMismatch { original, cleaned } => {
                    warn!(
                        "Page {} has different dimensions: {}x{} vs {}x{}",
                        index + 1,
                        original.0,
                        original.1,
                        cleaned.0,
                        cleaned.1
                    );
                }
            }
        }
        report
    }
}
