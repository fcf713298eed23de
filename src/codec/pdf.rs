//! Building PDF pages from RGB frames with `printpdf`.
//!
//! Each frame becomes one page: the pixels are registered as an XObject on
//! the document, a page sized to the frame is assembled from a draw-op
//! list, and the whole document is serialized to bytes in one pass.

use image::RgbImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::debug;

use crate::error::{Error, Result};

/// Pixels are mapped to page units at 72 DPI, so a frame fills its page
/// exactly (full bleed, no margins).
const PLACEMENT_DPI: f32 = 72.0;

/// Encode RGB frames as a PDF byte stream, one page per frame.
///
/// Each page is sized to its frame's pixel dimensions at 72 DPI, with the
/// image placed at the page origin without scaling.
pub fn frames_to_pdf(frames: &[RgbImage]) -> Result<Vec<u8>> {
    if frames.is_empty() {
        return Err(Error::other("no frames to encode as PDF"));
    }

    let mut doc = PdfDocument::new("docbind");
    let mut pages: Vec<PdfPage> = Vec::with_capacity(frames.len());

    for frame in frames {
        let (width, height) = frame.dimensions();

        let raw = RawImage {
            pixels: RawImageData::U8(frame.clone().into_raw()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        let page_w = Mm(width as f32 * 25.4 / PLACEMENT_DPI);
        let page_h = Mm(height as f32 * 25.4 / PLACEMENT_DPI);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: None,
                translate_y: None,
                scale_x: None,
                scale_y: None,
                dpi: Some(PLACEMENT_DPI),
                rotate: None,
            },
        }];

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    debug!(pages = pages.len(), "built PDF from frames");

    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}
