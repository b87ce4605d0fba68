//! Defaults and option structs shared by the cleaner and the comparator.

use std::time::Duration;

pub const APP_NAME: &str = "texprune";

/// Where the cleaner writes when `--output_dir` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "./cleaned_project";

/// Rasterization DPI for the visual tier.
pub const DEFAULT_DPI: u32 = 300;

/// Fraction of differing pixels above which a page is flagged.
pub const DEFAULT_PIXEL_THRESHOLD: f64 = 0.01;

/// A compiler that runs longer than this is killed.
pub const DEFAULT_COMPILE_TIMEOUT: Duration = Duration::from_secs(600);

/// Extra pdflatex passes after the first one so cross-references settle.
pub const DEFAULT_PDFLATEX_RERUNS: usize = 2;

/// Extensions tried, in order, after the bare name of an `\includegraphics` argument.
pub const GRAPHICS_EXTENSIONS: &[&str] = &[".pdf", ".png", ".jpg", ".jpeg", ".eps", ".ps", ".tif", ".tiff"];

/// Build-support files copied from the project root whenever they exist.
pub const AUXILIARY_FILES: &[&str] = &[
    "Makefile",
    "makefile",
    "latexmkrc",
    ".latexmkrc",
    "README",
    "README.md",
    "README.txt",
    "acmart.cls",
    "IEEEtran.cls",
    "llncs.cls",
    "elsarticle.cls",
    "sigconf.cls",
    "sig-alternate.cls",
    "sig-alternate-05-2015.cls",
];

/// Extensions picked up by the style-file sweep regardless of references.
pub const STYLE_EXTENSIONS: &[&str] = &["sty", "cls", "bst"];

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{APP_NAME}={level},texprune_compare={level}")
}

/// How the external LaTeX toolchain is driven.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub timeout: Duration,
    pub pdflatex_reruns: usize,
    pub shell_escape: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_COMPILE_TIMEOUT,
            pdflatex_reruns: DEFAULT_PDFLATEX_RERUNS,
            shell_escape: true,
        }
    }
}

impl CompileOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Which fidelity tiers the checker runs and how strict they are.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Run the rendered-page tier when hashes differ.
    pub visual: bool,
    pub dpi: u32,
    pub pixel_threshold: f64,
    /// Log the unified text diff when the text tier fails.
    pub show_diff: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            visual: false,
            dpi: DEFAULT_DPI,
            pixel_threshold: DEFAULT_PIXEL_THRESHOLD,
            show_diff: false,
        }
    }
}

impl CompareOptions {
    pub fn with_visual(mut self, visual: bool) -> Self {
        self.visual = visual;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.pixel_threshold = threshold;
        self
    }

    pub fn with_diff(mut self, show_diff: bool) -> Self {
        self.show_diff = show_diff;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphics_extensions_try_pdf_before_png() {
        let pdf = GRAPHICS_EXTENSIONS.iter().position(|e| *e == ".pdf").unwrap();
        let png = GRAPHICS_EXTENSIONS.iter().position(|e| *e == ".png").unwrap();
        assert!(pdf < png);
    }

    #[test]
    fn verbose_filter_enables_debug() {
        assert!(default_log_filter(true).contains("texprune=debug"));
        assert!(default_log_filter(false).contains("texprune=info"));
    }

    #[test]
    fn compare_defaults() {
        let opts = CompareOptions::default();
        assert!(!opts.visual);
        assert_eq!(opts.dpi, 300);
        assert!((opts.pixel_threshold - 0.01).abs() < f64::EPSILON);
    }
}
