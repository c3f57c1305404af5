use image::{ExtendedColorType, ImageEncoder};
use once_cell::sync::Lazy;

use crate::{
    encode::{blob::Blob, format::OutputFormat},
    foundation::{
        core::Quality,
        error::{MemeError, MemeResult},
    },
    render::surface::Surface,
};

/// Encode a premultiplied surface.
///
/// JPEG drops alpha by taking the premultiplied color channels directly, which is the same as
/// compositing over black.
pub fn encode_surface(surface: &Surface, format: OutputFormat, quality: Quality) -> MemeResult<Blob> {
    let bytes = match format {
        OutputFormat::Png | OutputFormat::Webp => encode_rgba(surface, format, quality)?,
        OutputFormat::Jpeg => {
            let rgb: Vec<u8> = surface
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            encode_rgb8_jpeg(&rgb, surface.width, surface.height, quality)?
        }
    };
    tracing::trace!(%format, size = bytes.len(), "surface encoded");
    Ok(Blob { format, bytes })
}

/// Encode straight-alpha RGBA pixels.
pub fn encode_rgba_image(
    image: &image::RgbaImage,
    format: OutputFormat,
    quality: Quality,
) -> MemeResult<Blob> {
    let (w, h) = image.dimensions();
    let bytes = match format {
        OutputFormat::Png => write_rgba8(image.as_raw(), w, h, format)?,
        OutputFormat::Webp => write_webp(image.as_raw().clone(), w, h, quality)?,
        OutputFormat::Jpeg => {
            // Straight alpha is flattened over black, matching the surface path.
            let rgb: Vec<u8> = image
                .pixels()
                .flat_map(|p| {
                    let a = u16::from(p.0[3]);
                    let over_black = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
                    [over_black(p.0[0]), over_black(p.0[1]), over_black(p.0[2])]
                })
                .collect();
            encode_rgb8_jpeg(&rgb, w, h, quality)?
        }
    };
    Ok(Blob { format, bytes })
}

fn encode_rgba(surface: &Surface, format: OutputFormat, quality: Quality) -> MemeResult<Vec<u8>> {
    let straight = surface.to_rgba_image()?;
    match format {
        OutputFormat::Webp => write_webp(straight.into_raw(), surface.width, surface.height, quality),
        _ => write_rgba8(straight.as_raw(), surface.width, surface.height, format),
    }
}

/// WebP through the lossless encoder, with RGB quantized first when `quality < 1`.
fn write_webp(mut rgba: Vec<u8>, width: u32, height: u32, quality: Quality) -> MemeResult<Vec<u8>> {
    quantize_rgb(&mut rgba, quality);
    write_rgba8(&rgba, width, height, OutputFormat::Webp)
}

/// Snap RGB channels to `webp_levels(quality)` evenly spaced values. Alpha is left alone.
fn quantize_rgb(rgba: &mut [u8], quality: Quality) {
    let levels = webp_levels(quality);
    if levels >= 256 {
        return;
    }
    let step = 255.0 / (f32::from(levels) - 1.0);
    for px in rgba.chunks_exact_mut(4) {
        for c in px.iter_mut().take(3) {
            let bucket = (f32::from(*c) / step).round();
            *c = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Palette size per channel; coarse at low quality, full at 1.0.
fn webp_levels(quality: Quality) -> u16 {
    let q = quality.get().clamp(0.01, 1.0);
    if q >= 1.0 {
        return 256;
    }
    (2.0 + q * q * 254.0).round().clamp(2.0, 256.0) as u16
}

fn write_rgba8(rgba: &[u8], width: u32, height: u32, format: OutputFormat) -> MemeResult<Vec<u8>> {
    let mut out = Vec::new();
    let res = match format {
        OutputFormat::Png => image::codecs::png::PngEncoder::new(&mut out).write_image(
            rgba,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Webp => image::codecs::webp::WebPEncoder::new_lossless(&mut out)
            .write_image(rgba, width, height, ExtendedColorType::Rgba8),
        OutputFormat::Jpeg => {
            return Err(MemeError::encode("jpeg cannot carry an alpha channel"));
        }
    };
    res.map_err(|e| MemeError::encode(format!("{format} encode failed: {e}")))?;
    if out.is_empty() {
        return Err(MemeError::encode(format!("{format} encoder produced no bytes")));
    }
    Ok(out)
}

fn encode_rgb8_jpeg(rgb: &[u8], width: u32, height: u32, quality: Quality) -> MemeResult<Vec<u8>> {
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality.to_percent())
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| MemeError::encode(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

static LOSSY_WEBP: Lazy<bool> = Lazy::new(detect_lossy_webp);

fn detect_lossy_webp() -> bool {
    let sample = Quality::new(0.5).and_then(|q| write_webp(vec![0, 0, 0, 255], 1, 1, q));
    let lossy = matches!(sample.as_deref(), Ok(b) if is_lossy_webp(b));
    tracing::debug!(lossy, "webp encoder capability");
    lossy
}

/// `RIFF....WEBP` container whose first chunk is a lossy `VP8 ` bitstream.
pub(crate) fn is_lossy_webp(bytes: &[u8]) -> bool {
    bytes.len() >= 16 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" && &bytes[12..16] == b"VP8 "
}

/// Preferred lossy-upload format for this build: WebP when its encoder is lossy, else JPEG.
///
/// A lossless-only WebP encoder would usually grow photographic uploads, so it does not count.
/// Probed once per process.
pub fn select_format() -> OutputFormat {
    if *LOSSY_WEBP {
        OutputFormat::Webp
    } else {
        OutputFormat::Jpeg
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
