//! Export pipeline: write every page/frame of the inputs as JPG files.
//!
//! Each input is processed in isolation: a file that fails to decode adds a
//! `"<filename>: <message>"` entry to the failure list and the batch moves
//! on. The one exception is a missing conversion capability
//! ([`Error::MissingDependency`]), which would fail every remaining PDF the
//! same way and therefore aborts the whole batch.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::{DocumentCodec, FileKind, LibraryCodec};
use crate::config::{DEFAULT_EXPORT_DPI, DEFAULT_JPEG_QUALITY};
use crate::error::{Error, Result};
use crate::utils::resolve_conflict;

/// Summary of a completed export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Number of JPG files written.
    pub exported: usize,

    /// Per-file failures, as `"<filename>: <message>"` strings.
    pub failures: Vec<String>,
}

/// Exports pages and frames of PDF/TIFF/JPG files as JPG images.
pub struct Exporter<C> {
    codec: C,
    dpi: f32,
    quality: u8,
}

impl Exporter<LibraryCodec> {
    /// Create an exporter backed by the production codec, at the default
    /// resolution and quality.
    pub fn new() -> Self {
        Self::with_codec(LibraryCodec::new())
    }
}

impl Default for Exporter<LibraryCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DocumentCodec> Exporter<C> {
    /// Create an exporter with an injected codec.
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            dpi: DEFAULT_EXPORT_DPI,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the rasterization resolution for PDF pages.
    pub fn dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the JPEG quality (1-100).
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Export every page/frame of `paths` as JPG files under `output_dir`.
    ///
    /// The directory is created if it does not exist. Output names follow
    /// `<stem>_page<NNN>.jpg` for PDF pages and `<stem>_frame<NNN>.jpg` for
    /// TIFF frames (3-digit, 1-based); JPG inputs are copied under their
    /// original name. Every name passes through conflict resolution.
    ///
    /// # Errors
    ///
    /// Only [`Error::MissingDependency`] and a failure to create
    /// `output_dir` abort the batch; everything else is collected in the
    /// returned [`ExportOutcome::failures`].
    pub fn export(&self, paths: &[PathBuf], output_dir: &Path) -> Result<ExportOutcome> {
        fs::create_dir_all(output_dir).map_err(|source| Error::FailedToCreateOutput {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut exported = 0;
        let mut failures = Vec::new();

        for path in paths {
            match self.export_one(path, output_dir) {
                Ok(count) => exported += count,
                Err(err @ Error::MissingDependency { .. }) => return Err(err),
                Err(err) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    failures.push(format!("{name}: {err}"));
                }
            }
        }

        info!(
            exported,
            failed = failures.len(),
            output_dir = %output_dir.display(),
            "export complete"
        );

        Ok(ExportOutcome { exported, failures })
    }

    /// Export a single input; returns the number of JPG files written.
    fn export_one(&self, path: &Path, output_dir: &Path) -> Result<usize> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match FileKind::from_path(path)? {
            FileKind::Pdf => {
                let pages = self.codec.rasterize_pdf(path, self.dpi)?;
                for (index, page) in pages.iter().enumerate() {
                    let name = format!("{stem}_page{:03}.jpg", index + 1);
                    let target = resolve_conflict(&output_dir.join(name));
                    self.codec.encode_jpeg(page, &target, self.quality)?;
                }
                debug!(path = %path.display(), pages = pages.len(), "exported PDF pages");
                Ok(pages.len())
            }
            FileKind::Tiff => {
                let frames = self.codec.decode_frames(path)?;
                for (index, frame) in frames.iter().enumerate() {
                    let name = format!("{stem}_frame{:03}.jpg", index + 1);
                    let target = resolve_conflict(&output_dir.join(name));
                    self.codec.encode_jpeg(frame, &target, self.quality)?;
                }
                debug!(path = %path.display(), frames = frames.len(), "exported TIFF frames");
                Ok(frames.len())
            }
            FileKind::Jpeg => {
                // Already a JPG, copy as-is under the original name.
                let name = path
                    .file_name()
                    .ok_or_else(|| Error::unsupported_file(path))?;
                let target = resolve_conflict(&output_dir.join(name));
                fs::copy(path, &target)?;
                copy_file_times(path, &target)?;
                Ok(1)
            }
        }
    }
}

/// Carry the source's modification and access times onto the copy, so a
/// copied JPG keeps its original timestamps.
fn copy_file_times(source: &Path, target: &Path) -> Result<()> {
    let metadata = fs::metadata(source)?;

    let mut times = fs::FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    let file = fs::File::options().write(true).open(target)?;
    file.set_times(times)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs::File;
    use tempfile::TempDir;

    /// Codec double that renders fixed blank pages for PDFs and fails on
    /// demand, so the PDF path is testable without a system pdfium.
    struct FakeCodec {
        pdf_pages: usize,
        pdfium_available: bool,
    }

    impl FakeCodec {
        fn new(pdf_pages: usize) -> Self {
            Self {
                pdf_pages,
                pdfium_available: true,
            }
        }

        fn without_pdfium() -> Self {
            Self {
                pdf_pages: 0,
                pdfium_available: false,
            }
        }
    }

    impl DocumentCodec for FakeCodec {
        fn decode_frames(&self, path: &Path) -> Result<Vec<RgbImage>> {
            match FileKind::from_path(path)? {
                FileKind::Jpeg => Ok(vec![RgbImage::new(2, 2)]),
                _ => Err(Error::conversion_failed(path, "corrupt frame data")),
            }
        }

        fn frames_to_pdf(&self, _frames: &[RgbImage]) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn rasterize_pdf(&self, _path: &Path, _dpi: f32) -> Result<Vec<RgbImage>> {
            if !self.pdfium_available {
                return Err(Error::missing_dependency("pdfium", "library not found"));
            }
            Ok(vec![RgbImage::new(4, 4); self.pdf_pages])
        }

        fn encode_jpeg(&self, frame: &RgbImage, target: &Path, quality: u8) -> Result<()> {
            crate::codec::LibraryCodec::new().encode_jpeg(frame, target, quality)
        }
    }

    fn fixture_jpg(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(6, 6, Rgb([10, 20, 30])).save(&path).unwrap();
        path
    }

    fn fixture_tiff(dir: &Path, name: &str, frames: usize) -> PathBuf {
        use tiff::encoder::{TiffEncoder, colortype};

        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        for _ in 0..frames {
            encoder
                .write_image::<colortype::RGB8>(4, 4, &vec![200u8; 4 * 4 * 3])
                .unwrap();
        }
        path
    }

    #[test]
    fn test_export_tiff_frames_with_real_codec() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let tif = fixture_tiff(dir.path(), "scan.tif", 3);

        let outcome = Exporter::new().export(&[tif], &out).unwrap();
        assert_eq!(outcome.exported, 3);
        assert!(outcome.failures.is_empty());
        assert!(out.join("scan_frame001.jpg").exists());
        assert!(out.join("scan_frame002.jpg").exists());
        assert!(out.join("scan_frame003.jpg").exists());
    }

    #[test]
    fn test_export_jpg_copies_under_original_name() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let jpg = fixture_jpg(dir.path(), "photo.jpg");

        let outcome = Exporter::new().export(&[jpg], &out).unwrap();
        assert_eq!(outcome.exported, 1);
        assert!(out.join("photo.jpg").exists());
    }

    #[test]
    fn test_export_jpg_keeps_source_timestamps() {
        use std::time::{Duration, SystemTime};

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let jpg = fixture_jpg(dir.path(), "photo.jpg");

        // Backdate the source so a fresh mtime on the copy would show up.
        let old = SystemTime::now() - Duration::from_secs(30 * 24 * 60 * 60);
        let file = File::options().write(true).open(&jpg).unwrap();
        file.set_times(fs::FileTimes::new().set_modified(old)).unwrap();
        drop(file);

        Exporter::new().export(&[jpg.clone()], &out).unwrap();

        let source_mtime = fs::metadata(&jpg).unwrap().modified().unwrap();
        let copy_mtime = fs::metadata(out.join("photo.jpg"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(copy_mtime, source_mtime);
    }

    #[test]
    fn test_export_resolves_name_conflicts() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        File::create(out.join("photo.jpg")).unwrap();
        File::create(out.join("photo_1.jpg")).unwrap();

        let jpg = fixture_jpg(dir.path(), "photo.jpg");
        let outcome = Exporter::new().export(&[jpg], &out).unwrap();
        assert_eq!(outcome.exported, 1);
        assert!(out.join("photo_2.jpg").exists());
    }

    #[test]
    fn test_export_pdf_pages_with_fake_codec() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let pdf = dir.path().join("report.pdf");
        File::create(&pdf).unwrap();

        let exporter = Exporter::with_codec(FakeCodec::new(2));
        let outcome = exporter.export(&[pdf], &out).unwrap();
        assert_eq!(outcome.exported, 2);
        assert!(out.join("report_page001.jpg").exists());
        assert!(out.join("report_page002.jpg").exists());
    }

    #[test]
    fn test_export_isolates_per_file_failures() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let pdf = dir.path().join("x.pdf");
        File::create(&pdf).unwrap();
        let bad = dir.path().join("bad.tif");
        fs::write(&bad, b"garbage").unwrap();

        let exporter = Exporter::with_codec(FakeCodec::new(2));
        let outcome = exporter.export(&[pdf, bad], &out).unwrap();

        assert_eq!(outcome.exported, 2);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].starts_with("bad.tif: "));
        assert!(out.join("x_page001.jpg").exists());
        assert!(out.join("x_page002.jpg").exists());
    }

    #[test]
    fn test_export_unsupported_file_is_collected() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let png = dir.path().join("pic.png");
        fs::write(&png, b"fake").unwrap();
        let jpg = fixture_jpg(dir.path(), "photo.jpg");

        let outcome = Exporter::new().export(&[png, jpg], &out).unwrap();
        assert_eq!(outcome.exported, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].starts_with("pic.png: "));
    }

    #[test]
    fn test_missing_dependency_aborts_batch() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let pdf = dir.path().join("a.pdf");
        File::create(&pdf).unwrap();
        let jpg = fixture_jpg(dir.path(), "b.jpg");

        let exporter = Exporter::with_codec(FakeCodec::without_pdfium());
        let err = exporter.export(&[pdf, jpg], &out).unwrap_err();
        assert!(matches!(err, Error::MissingDependency { .. }));

        // The batch stopped; the later input was not processed.
        assert!(!out.join("b.jpg").exists());
    }

    #[test]
    fn test_export_empty_inputs() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");

        let outcome = Exporter::new().export(&[], &out).unwrap();
        assert_eq!(outcome.exported, 0);
        assert!(outcome.failures.is_empty());
        assert!(out.exists());
    }
}
