//! Rendered-page tier.

use image::RgbaImage;

/// Outcome for a single page pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageResult {
    /// Differing-pixel ratio at or below the threshold.
    Match { ratio: f64 },
    /// Differing-pixel ratio above the threshold.
    Differs { ratio: f64 },
    /// Rendered at different pixel sizes, so not comparable.
    SizeMismatch { original: (u32, u32), cleaned: (u32, u32) },
}

impl PageResult {
    pub fn is_match(&self) -> bool {
        matches!(self, PageResult::Match { .. })
    }
}

/// Result of comparing every rendered page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualReport {
    pub original_pages: usize,
    pub cleaned_pages: usize,
    /// One entry per page, empty when the page counts differ.
    pub pages: Vec<PageResult>,
    /// Set when either PDF could not be rasterized.
    pub error: Option<String>,
}

impl VisualReport {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn page_count_mismatch(&self) -> bool {
        self.original_pages != self.cleaned_pages
    }

    pub fn is_identical(&self) -> bool {
        self.error.is_none() && !self.page_count_mismatch() && self.pages.iter().all(PageResult::is_match)
    }
}

/// Fraction of pixels that differ in at least one channel.
///
/// Both images must have the same dimensions.
pub fn pixel_diff_ratio(a: &RgbaImage, b: &RgbaImage) -> f64 {
    let total = a.width() as u64 * a.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let differing = a.pixels().zip(b.pixels()).filter(|(p, q)| p != q).count() as u64;
    differing as f64 / total as f64
}

/// Compare rendered pages pairwise against `threshold`.
pub fn compare_pages(original: &[RgbaImage], cleaned: &[RgbaImage], threshold: f64) -> VisualReport {
    let mut report = VisualReport {
        original_pages: original.len(),
        cleaned_pages: cleaned.len(),
        ..Default::default()
    };
    if report.page_count_mismatch() {
        return report;
    }

    report.pages = original
        .iter()
        .zip(cleaned)
        .map(|(a, b)| {
            if a.dimensions() != b.dimensions() {
                return PageResult::SizeMismatch {
                    original: a.dimensions(),
                    cleaned: b.dimensions(),
                };
            }
            let ratio = pixel_diff_ratio(a, b);
            if ratio > threshold {
                PageResult::Differs { ratio }
            } else {
                PageResult::Match { ratio }
            }
        })
        .collect();

    report
}
