//! Document codecs: the format-conversion capability behind both pipelines.
//!
//! The [`DocumentCodec`] trait is the seam between the pipelines and the
//! format libraries. The production implementation, [`LibraryCodec`], is
//! backed by the `tiff`/`image` crates for raster decoding, `printpdf` for
//! building PDF pages from frames, and `pdfium-render` for rasterizing PDF
//! pages. Tests inject their own implementations to exercise pipeline
//! behavior without the system pdfium library.

mod frames;
mod pdf;
mod raster;

use std::cell::OnceCell;
use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};

pub use raster::PdfRasterizer;

/// Input file kind, derived from the extension (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.pdf`
    Pdf,
    /// `.tif` / `.tiff`
    Tiff,
    /// `.jpg` / `.jpeg`
    Jpeg,
}

impl FileKind {
    /// Classify a path by its extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFile`] for anything outside the supported
    /// set, including extension-less paths.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| Error::unsupported_file(path))?;

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "tif" | "tiff" => Ok(Self::Tiff),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(Error::unsupported_file(path)),
        }
    }
}

/// Format-conversion capability consumed by the merge and export pipelines.
pub trait DocumentCodec {
    /// Decode every frame of a raster file (TIFF or JPEG) into RGB buffers.
    ///
    /// A JPEG yields exactly one frame; a TIFF yields one frame per
    /// directory, in file order.
    fn decode_frames(&self, path: &Path) -> Result<Vec<RgbImage>>;

    /// Encode RGB frames as a PDF byte stream, one full-bleed page per frame.
    fn frames_to_pdf(&self, frames: &[RgbImage]) -> Result<Vec<u8>>;

    /// Rasterize each page of a PDF at the given resolution.
    fn rasterize_pdf(&self, path: &Path, dpi: f32) -> Result<Vec<RgbImage>>;

    /// Encode one RGB frame as a JPG file at the given quality (1-100).
    fn encode_jpeg(&self, frame: &RgbImage, target: &Path, quality: u8) -> Result<()>;
}

/// Production codec backed by the format libraries.
///
/// The pdfium binding is resolved lazily on first PDF rasterization, so
/// merge runs and raster-only exports work on machines without the library
/// installed. Single binding per codec instance; pdfium holds process-global
/// state and must not be re-initialized per call.
#[derive(Default)]
pub struct LibraryCodec {
    rasterizer: OnceCell<PdfRasterizer>,
}

impl LibraryCodec {
    /// Create a codec. No libraries are loaded until first use.
    pub fn new() -> Self {
        Self::default()
    }

    fn rasterizer(&self) -> Result<&PdfRasterizer> {
        if self.rasterizer.get().is_none() {
            let rasterizer = PdfRasterizer::new()?;
            let _ = self.rasterizer.set(rasterizer);
        }
        self.rasterizer
            .get()
            .ok_or_else(|| Error::other("pdfium rasterizer initialization failed"))
    }
}

impl DocumentCodec for LibraryCodec {
    fn decode_frames(&self, path: &Path) -> Result<Vec<RgbImage>> {
        match FileKind::from_path(path)? {
            FileKind::Tiff => frames::decode_tiff_frames(path),
            FileKind::Jpeg => frames::decode_jpeg(path).map(|frame| vec![frame]),
            FileKind::Pdf => Err(Error::conversion_failed(
                path,
                "PDF files are rasterized, not frame-decoded",
            )),
        }
    }

    fn frames_to_pdf(&self, frames: &[RgbImage]) -> Result<Vec<u8>> {
        pdf::frames_to_pdf(frames)
    }

    fn rasterize_pdf(&self, path: &Path, dpi: f32) -> Result<Vec<RgbImage>> {
        self.rasterizer()?.rasterize(path, dpi)
    }

    fn encode_jpeg(&self, frame: &RgbImage, target: &Path, quality: u8) -> Result<()> {
        frames::encode_jpeg(frame, target, quality)
    }
}
