//! Raster frame decoding and JPEG encoding.
//!
//! TIFF files are walked directory by directory with the `tiff` decoder so
//! multi-frame files yield every frame. All frames are normalized to
//! 8-bit RGB; 16-bit samples are reduced to their high byte.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::error::{Error, Result};

/// Decode every frame of a TIFF file into RGB buffers, in file order.
pub fn decode_tiff_frames(path: &Path) -> Result<Vec<RgbImage>> {
    let file = File::open(path).map_err(|err| Error::conversion_failed(path, err.to_string()))?;
    let mut decoder = Decoder::new(BufReader::new(file))
        .map_err(|err| Error::conversion_failed(path, err.to_string()))?;

    let mut frames = Vec::new();
    loop {
        let (width, height) = decoder
            .dimensions()
            .map_err(|err| Error::conversion_failed(path, err.to_string()))?;
        let colortype = decoder
            .colortype()
            .map_err(|err| Error::conversion_failed(path, err.to_string()))?;
        let data = decoder
            .read_image()
            .map_err(|err| Error::conversion_failed(path, err.to_string()))?;

        frames.push(frame_to_rgb(path, width, height, colortype, data)?);

        if !decoder.more_images() {
            break;
        }
        decoder
            .next_image()
            .map_err(|err| Error::conversion_failed(path, err.to_string()))?;
    }

    debug!(path = %path.display(), frames = frames.len(), "decoded TIFF");
    Ok(frames)
}

/// Decode a JPEG file into a single RGB buffer.
pub fn decode_jpeg(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|err| Error::conversion_failed(path, err.to_string()))?;
    Ok(img.to_rgb8())
}

/// Encode one RGB frame as a JPG file at the given quality.
pub fn encode_jpeg(frame: &RgbImage, target: &Path, quality: u8) -> Result<()> {
    let file = File::create(target).map_err(|source| Error::FailedToCreateOutput {
        path: target.to_path_buf(),
        source,
    })?;
    let encoder = JpegEncoder::new_with_quality(std::io::BufWriter::new(file), quality);
    frame
        .write_with_encoder(encoder)
        .map_err(|err| Error::conversion_failed(target, err.to_string()))?;
    Ok(())
}

/// Normalize one decoded TIFF frame to 8-bit RGB.
fn frame_to_rgb(
    path: &Path,
    width: u32,
    height: u32,
    colortype: ColorType,
    data: DecodingResult,
) -> Result<RgbImage> {
    let samples = match colortype {
        ColorType::Gray(_) => 1,
        ColorType::GrayA(_) => 2,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => {
            return Err(Error::conversion_failed(
                path,
                format!("unsupported TIFF color type: {other:?}"),
            ));
        }
    };

    // Flatten to 8-bit samples first, then expand to RGB.
    let bytes: Vec<u8> = match data {
        DecodingResult::U8(buf) => buf,
        DecodingResult::U16(buf) => buf.into_iter().map(|v| (v >> 8) as u8).collect(),
        _ => {
            return Err(Error::conversion_failed(
                path,
                "unsupported TIFF sample format",
            ));
        }
    };

    let expected = width as usize * height as usize * samples;
    if bytes.len() < expected {
        return Err(Error::conversion_failed(path, "truncated TIFF frame data"));
    }

    let mut image = RgbImage::new(width, height);
    for (i, pixel) in image.pixels_mut().enumerate() {
        let offset = i * samples;
        *pixel = match samples {
            1 | 2 => {
                let v = bytes[offset];
                Rgb([v, v, v])
            }
            _ => Rgb([bytes[offset], bytes[offset + 1], bytes[offset + 2]]),
        };
    }

    Ok(image)
}
