//! PDF page rasterization over the system pdfium library.

use std::path::Path;

use image::RgbImage;
use pdfium_render::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};

/// Rasterizes PDF pages into RGB buffers via `pdfium-render`.
///
/// Binding to the system library happens once, in [`PdfRasterizer::new`];
/// pdfium keeps process-global state, so the binding is created a single
/// time and reused for every document.
pub struct PdfRasterizer {
    pdfium: Pdfium,
}

impl PdfRasterizer {
    /// Bind to the system pdfium library.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDependency`] when the library cannot be
    /// located or loaded.
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|err| Error::missing_dependency("pdfium", err.to_string()))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Rasterize every page of the PDF at `path` at the given resolution.
    ///
    /// Pages come back in document order. PDF points are 1/72 inch, so the
    /// render scale factor is `dpi / 72`.
    pub fn rasterize(&self, path: &Path, dpi: f32) -> Result<Vec<RgbImage>> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|err| Error::failed_to_load_pdf(path, err.to_string()))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(dpi / 72.0);

        let mut pages = Vec::new();
        for page in document.pages().iter() {
            let bitmap = page
                .render_with_config(&config)
                .map_err(|err| Error::conversion_failed(path, err.to_string()))?;
            pages.push(bitmap.as_image().into_rgb8());
        }

        debug!(path = %path.display(), pages = pages.len(), dpi, "rasterized PDF");
        Ok(pages)
    }
}
