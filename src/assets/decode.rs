use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::foundation::{
    error::{MemeError, MemeResult},
    math::premultiply_rgba8_in_place,
};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Build from straight-alpha RGBA8 pixels.
    pub fn from_rgba8(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut rgba8_premul = image.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        }
    }
}

/// Decode encoded image bytes (format sniffed from content) to straight-alpha RGBA8.
pub fn decode_rgba8(bytes: &[u8]) -> MemeResult<image::RgbaImage> {
    let rgba = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")
        .and_then(|r| r.decode().context("decode image from memory"))
        .map_err(|e| MemeError::image_load(format!("{e:#}")))?
        .to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(MemeError::image_load("decoded image has no pixels"));
    }
    Ok(rgba)
}

/// Decode encoded image bytes (format sniffed from content) to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> MemeResult<DecodedImage> {
    decode_rgba8(bytes).map(DecodedImage::from_rgba8)
}

/// Read intrinsic dimensions from the image header without decoding pixels.
pub fn probe_dimensions(bytes: &[u8]) -> MemeResult<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")
        .and_then(|r| r.into_dimensions().context("read image dimensions"))
        .map_err(|e| MemeError::image_load(format!("{e:#}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
