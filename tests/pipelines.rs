//! End-to-end pipeline tests over programmatically generated fixtures.
//!
//! These run the real codec for everything that does not need a system
//! pdfium library: raster decoding, PDF generation, and `lopdf`
//! concatenation.

use std::fs::File;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use lopdf::{Document, Object, dictionary};
use rstest::rstest;
use tempfile::TempDir;

use docbind::error::Error;
use docbind::export::Exporter;
use docbind::merge::Merger;
use docbind::registry::FileRegistry;

fn fixture_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..pages {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

fn fixture_jpg(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(16, 12, Rgb([200, 100, 50]))
        .save(&path)
        .unwrap();
    path
}

fn fixture_tiff(dir: &Path, name: &str, frames: usize) -> PathBuf {
    use tiff::encoder::{TiffEncoder, colortype};

    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    for i in 0..frames {
        let fill = 40 * (i as u8 + 1);
        encoder
            .write_image::<colortype::RGB8>(8, 8, &vec![fill; 8 * 8 * 3])
            .unwrap();
    }
    path
}

#[test]
fn merge_mixed_inputs_in_registry_order() {
    let dir = TempDir::new().unwrap();
    let jpg = fixture_jpg(dir.path(), "a.jpg");
    let pdf = fixture_pdf(dir.path(), "b.pdf", 2);
    let tif = fixture_tiff(dir.path(), "c.tiff", 2);

    let mut registry = FileRegistry::new();
    assert_eq!(registry.add(vec![jpg, pdf, tif]), 3);

    let output = dir.path().join("combined.pdf");
    let outcome = Merger::new().merge(&registry.paths(), &output).unwrap();

    assert_eq!(outcome.files_merged, 3);
    assert_eq!(outcome.total_pages, 5);

    let merged = Document::load(&output).unwrap();
    assert_eq!(merged.get_pages().len(), 5);
}

#[test]
fn merge_respects_reordering() {
    let dir = TempDir::new().unwrap();
    let one = fixture_pdf(dir.path(), "one.pdf", 1);
    let two = fixture_pdf(dir.path(), "two.pdf", 2);

    let mut registry = FileRegistry::new();
    registry.add(vec![one.clone(), two.clone()]);
    registry.reorder(&[1], -1);

    assert_eq!(registry.paths(), vec![two, one]);

    let output = dir.path().join("out.pdf");
    let outcome = Merger::new().merge(&registry.paths(), &output).unwrap();
    assert_eq!(outcome.total_pages, 3);
}

#[test]
fn merge_failure_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let good = fixture_jpg(dir.path(), "good.jpg");
    let bad = dir.path().join("bad.tif");
    std::fs::write(&bad, b"definitely not a tiff").unwrap();

    let output = dir.path().join("out.pdf");
    let err = Merger::new().merge(&[good, bad], &output).unwrap_err();

    assert!(matches!(err, Error::ConversionFailed { .. }));
    assert!(!output.exists());
}

#[test]
fn export_tiff_and_jpg_end_to_end() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("exported");
    let tif = fixture_tiff(dir.path(), "scan.tif", 2);
    let jpg = fixture_jpg(dir.path(), "photo.jpg");

    let outcome = Exporter::new().export(&[tif, jpg], &out).unwrap();

    assert_eq!(outcome.exported, 3);
    assert!(outcome.failures.is_empty());
    assert!(out.join("scan_frame001.jpg").exists());
    assert!(out.join("scan_frame002.jpg").exists());
    assert!(out.join("photo.jpg").exists());

    // Exported frames decode back as real JPEGs.
    let frame = image::open(out.join("scan_frame001.jpg")).unwrap();
    assert_eq!(frame.width(), 8);
    assert_eq!(frame.height(), 8);
}

#[test]
fn export_conflicting_names_get_suffixes() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("exported");
    std::fs::create_dir_all(&out).unwrap();
    File::create(out.join("photo.jpg")).unwrap();
    File::create(out.join("photo_1.jpg")).unwrap();

    let jpg = fixture_jpg(dir.path(), "photo.jpg");
    let outcome = Exporter::new().export(&[jpg], &out).unwrap();

    assert_eq!(outcome.exported, 1);
    assert!(out.join("photo_2.jpg").exists());
}

#[test]
fn export_collects_failures_and_continues() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("exported");
    let bad = dir.path().join("bad.tiff");
    std::fs::write(&bad, b"garbage").unwrap();
    let jpg = fixture_jpg(dir.path(), "photo.jpg");

    let outcome = Exporter::new().export(&[bad, jpg], &out).unwrap();

    assert_eq!(outcome.exported, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].starts_with("bad.tiff: "));
}

#[rstest]
#[case("scan.pdf", true)]
#[case("scan.tif", true)]
#[case("scan.TIFF", true)]
#[case("scan.jpg", true)]
#[case("scan.JPEG", true)]
#[case("scan.png", false)]
#[case("scan.docx", false)]
fn registry_extension_filtering(#[case] name: &str, #[case] accepted: bool) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    File::create(&path).unwrap();

    let mut registry = FileRegistry::new();
    let added = registry.add(vec![path]);
    assert_eq!(added == 1, accepted);
}

#[test]
fn rename_then_merge_uses_new_path() {
    let dir = TempDir::new().unwrap();
    let pdf = fixture_pdf(dir.path(), "draft.pdf", 1);

    let mut registry = FileRegistry::new();
    registry.add(vec![pdf]);

    let renamed = registry.rename(0, "final", false).unwrap();
    assert_eq!(renamed, dir.path().join("final.pdf"));
    assert!(!dir.path().join("draft.pdf").exists());

    let output = dir.path().join("out.pdf");
    let outcome = Merger::new().merge(&registry.paths(), &output).unwrap();
    assert_eq!(outcome.files_merged, 1);
    assert_eq!(outcome.total_pages, 1);
}
