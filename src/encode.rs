//! Ceiling-bound encoding. The main rendition degrades PNG, then JPEG
//! at two quality rungs; the third attempt is accepted unconditionally.
//! The small rendition re-derives from whatever the main became.

use std::io::Cursor;

use anyhow::Context;
use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::brand::{SMALL_HEIGHT, SMALL_WIDTH};
use crate::error::ThumbResult;

const JPEG_QUALITY_HIGH: u8 = 85;
const JPEG_QUALITY_FLOOR: u8 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

#[derive(Clone, Debug)]
pub struct EncodedMain {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// Encode attempts spent; never exceeds 3.
    pub attempts: u8,
}

/// Encodes the canvas under `ceiling_bytes` if any rung manages it; the
/// floor rung's output is returned regardless of size.
pub fn encode_main(canvas: &image::RgbaImage, ceiling_bytes: usize) -> ThumbResult<EncodedMain> {
    let png = png_bytes(canvas)?;
    if png.len() <= ceiling_bytes {
        return Ok(EncodedMain {
            bytes: png,
            format: OutputFormat::Png,
            attempts: 1,
        });
    }
    tracing::debug!(
        png_len = png.len(),
        ceiling_bytes,
        "png over ceiling, stepping down to jpeg"
    );

    // jpeg drops alpha; the composed canvas is opaque by construction
    let rgb = image::DynamicImage::ImageRgba8(canvas.clone()).to_rgb8();

    let high = jpeg_bytes(&rgb, JPEG_QUALITY_HIGH)?;
    if high.len() <= ceiling_bytes {
        return Ok(EncodedMain {
            bytes: high,
            format: OutputFormat::Jpeg,
            attempts: 2,
        });
    }
    tracing::debug!(
        jpeg_len = high.len(),
        ceiling_bytes,
        "high-quality jpeg over ceiling, stepping down"
    );

    let floor = jpeg_bytes(&rgb, JPEG_QUALITY_FLOOR)?;
    Ok(EncodedMain {
        bytes: floor,
        format: OutputFormat::Jpeg,
        attempts: 3,
    })
}

/// 640x360 preview, always lossless, derived from the shipped main
/// bytes so the preview matches the published rendition exactly.
pub fn small_from_main(main_bytes: &[u8]) -> ThumbResult<Vec<u8>> {
    let main = image::load_from_memory(main_bytes).context("decode main rendition")?;
    let small = main.resize_exact(SMALL_WIDTH, SMALL_HEIGHT, FilterType::Lanczos3);
    let mut out = Cursor::new(Vec::new());
    small
        .write_to(&mut out, ImageFormat::Png)
        .context("encode small rendition png")?;
    Ok(out.into_inner())
}

fn png_bytes(canvas: &image::RgbaImage) -> ThumbResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    canvas
        .write_to(&mut out, ImageFormat::Png)
        .context("encode main rendition png")?;
    Ok(out.into_inner())
}

fn jpeg_bytes(rgb: &image::RgbImage, quality: u8) -> ThumbResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(rgb)
        .context("encode main rendition jpeg")?;
    Ok(out.into_inner())
}
