//! Screenshot preparation for vision requests.
//!
//! Captures arrive in whatever format the capture tool wrote. Before a
//! description request they are decoded, shrunk to fit 1024x768, and
//! re-encoded as JPEG so every request has a bounded size.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

pub const MAX_WIDTH: u32 = 1024;
pub const MAX_HEIGHT: u32 = 768;
pub const JPEG_QUALITY: u8 = 70;

/// Decode any supported image and return it as a JPEG no larger than
/// [`MAX_WIDTH`]x[`MAX_HEIGHT`]. Smaller images keep their size.
pub fn prepare_for_vision(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("screenshot is not a decodable image")?;

    let img = if img.width() > MAX_WIDTH || img.height() > MAX_HEIGHT {
        img.thumbnail(MAX_WIDTH, MAX_HEIGHT)
    } else {
        img
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut jpeg = Cursor::new(Vec::new());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))
        .context("failed to encode screenshot as JPEG")?;
    Ok(jpeg.into_inner())
}
