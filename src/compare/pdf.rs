//! PDF services: per-page text extraction and page rasterization.
//!
//! Both sit behind traits so the checker can be driven by mocks in tests.
//! The production implementation uses Google PDFium through `pdfium-render`.
//! Each call binds a fresh `Pdfium` instance; the OS caches the library load,
//! so repeat binds are cheap.

use std::path::Path;

use image::RgbaImage;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Upper bound on either side of a rendered page, in pixels.
const MAX_DIMENSION_PX: u32 = 8192;

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Extracts the text of every page of a PDF.
pub trait TextExtractor {
    fn page_texts(&self, pdf: &Path) -> Result<Vec<String>>;
}

/// Renders every page of a PDF to an RGBA bitmap.
pub trait PageRasterizer {
    fn rasterize(&self, pdf: &Path, dpi: u32) -> Result<Vec<RgbaImage>>;
}

/// PDFium-backed text extraction and rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumBackend;

impl PdfiumBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Load the PDFium dynamic library.
///
/// Discovery order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` env var (explicit path to library file)
/// 2. Alongside the running executable
/// 3. System library search paths
fn load_pdfium() -> Result<Pdfium> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        debug!(path = %path, "Loading PDFium from env var");
        let bindings = Pdfium::bind_to_library(&path)
            .map_err(|e| Error::Pdf(format!("Failed to load PDFium from {path}: {e}")))?;
        return Ok(Pdfium::new(bindings));
    }

    if let Some(exe_dir) = std::env::current_exe().ok().as_deref().and_then(Path::parent) {
        let lib_path = Pdfium::pdfium_platform_library_name_at_path(exe_dir.to_string_lossy().as_ref());
        if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
            debug!(dir = %exe_dir.display(), "Loaded PDFium from executable directory");
            return Ok(Pdfium::new(bindings));
        }
    }

    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        Error::Pdf(format!(
            "PDFium library not found. Set PDFIUM_DYNAMIC_LIB_PATH or install PDFium: {e}"
        ))
    })?;
    Ok(Pdfium::new(bindings))
}

fn open<'a>(pdfium: &'a Pdfium, pdf: &Path) -> Result<PdfDocument<'a>> {
    pdfium
        .load_pdf_from_file(pdf, None)
        .map_err(|e| Error::Pdf(format!("Failed to load {}: {e}", pdf.display())))
}

/// Pixel size for a page at `dpi`, with the longer side capped at
/// [`MAX_DIMENSION_PX`] and aspect ratio preserved.
pub fn render_dimensions(width_points: f32, height_points: f32, dpi: u32) -> (u32, u32) {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let raw_w = (width_points * scale).max(1.0);
    let raw_h = (height_points * scale).max(1.0);

    let max_dim = raw_w.max(raw_h);
    if max_dim > MAX_DIMENSION_PX as f32 {
        let ratio = MAX_DIMENSION_PX as f32 / max_dim;
        let w = ((raw_w * ratio) as u32).clamp(1, MAX_DIMENSION_PX);
        let h = ((raw_h * ratio) as u32).clamp(1, MAX_DIMENSION_PX);
        (w, h)
    } else {
        (raw_w as u32, raw_h as u32)
    }
}

impl TextExtractor for PdfiumBackend {
    fn page_texts(&self, pdf: &Path) -> Result<Vec<String>> {
        let pdfium = load_pdfium()?;
        let document = open(&pdfium, pdf)?;

        let mut texts = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let text = page.text().map_err(|e| {
                Error::Pdf(format!("Text extraction failed on page {}: {e}", index + 1))
            })?;
            texts.push(text.all());
        }

        debug!(path = %pdf.display(), pages = texts.len(), "Extracted PDF text");
        Ok(texts)
    }
}

impl PageRasterizer for PdfiumBackend {
    fn rasterize(&self, pdf: &Path, dpi: u32) -> Result<Vec<RgbaImage>> {
        let pdfium = load_pdfium()?;
        let document = open(&pdfium, pdf)?;

        let mut images = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let (width_points, height_points) = (page.width().value, page.height().value);
            let (width, height) = render_dimensions(width_points, height_points, dpi);
            if width_points.max(height_points) * dpi as f32 / POINTS_PER_INCH > MAX_DIMENSION_PX as f32 {
                warn!(page = index + 1, width, height, "Page dimensions capped to {MAX_DIMENSION_PX}px");
            }

            let config = PdfRenderConfig::new()
                .set_target_width(width as i32)
                .set_maximum_height(height as i32);

            let bitmap = page.render_with_config(&config).map_err(|e| {
                Error::Pdf(format!("Rendering failed on page {}: {e}", index + 1))
            })?;
            images.push(bitmap.as_image().to_rgba8());
        }

        debug!(path = %pdf.display(), pages = images.len(), dpi, "Rasterized PDF");
        Ok(images)
    }
}
