use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    encode::{blob::Blob, encoder::encode_surface, format::OutputFormat},
    foundation::{core::Quality, error::MemeResult},
    render::raster::RenderedRaster,
};

/// Encode `raster` as `format`.
///
/// `quality` defaults to the raster's render quality. PNG exports at the render quality reuse the
/// raster's cached blob.
pub fn export(
    raster: &RenderedRaster,
    format: OutputFormat,
    quality: Option<Quality>,
) -> MemeResult<Blob> {
    let quality = quality.unwrap_or(raster.quality());
    if format == OutputFormat::Png {
        return raster.png_blob().cloned();
    }
    encode_surface(raster.surface(), format, quality)
}

/// Encode `raster` and return it as a data URL.
pub fn export_data_url(
    raster: &RenderedRaster,
    format: OutputFormat,
    quality: Option<Quality>,
) -> MemeResult<String> {
    if format == OutputFormat::Png {
        return raster.data_url().map(str::to_string);
    }
    Ok(export(raster, format, quality)?.to_data_url())
}

/// Save `raster` as a PNG file at `path`, creating parent directories.
///
/// Nothing is written when encoding fails.
#[tracing::instrument(skip(raster, path), fields(path = %path.as_ref().display()))]
pub async fn download(raster: &RenderedRaster, path: impl AsRef<Path>) -> MemeResult<PathBuf> {
    let path = path.as_ref();
    let blob = export(raster, OutputFormat::Png, None)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create download directory '{}'", parent.display()))?;
    }
    tokio::fs::write(path, &blob.bytes)
        .await
        .with_context(|| format!("write download '{}'", path.display()))?;
    tracing::debug!(size = blob.size(), "download written");
    Ok(path.to_path_buf())
}

/// Destination for clipboard image writes.
pub trait ClipboardSink {
    /// Place a PNG-encoded image on the clipboard.
    fn write_png(&mut self, png: &Blob) -> MemeResult<()>;
}

/// Export `raster` as PNG and hand it to `sink`.
///
/// The sink is only touched after the export succeeded.
pub fn copy_to_clipboard(raster: &RenderedRaster, sink: &mut dyn ClipboardSink) -> MemeResult<()> {
    let blob = export(raster, OutputFormat::Png, None)?;
    sink.write_png(&blob)
}

#[cfg(feature = "clipboard")]
pub use system::SystemClipboard;

#[cfg(feature = "clipboard")]
mod system {
    use crate::{
        encode::{blob::Blob, export::ClipboardSink},
        foundation::error::{MemeError, MemeResult},
    };

    /// The OS clipboard, via `arboard`.
    pub struct SystemClipboard {
        inner: arboard::Clipboard,
    }

    impl SystemClipboard {
        /// Open the system clipboard.
        pub fn new() -> MemeResult<Self> {
            let inner = arboard::Clipboard::new()
                .map_err(|e| MemeError::encode(format!("open clipboard: {e}")))?;
            Ok(Self { inner })
        }
    }

    impl ClipboardSink for SystemClipboard {
        fn write_png(&mut self, png: &Blob) -> MemeResult<()> {
            let rgba = image::load_from_memory_with_format(&png.bytes, image::ImageFormat::Png)
                .map_err(|e| MemeError::encode(format!("clipboard png: {e}")))?
                .to_rgba8();
            self.inner
                .set_image(arboard::ImageData {
                    width: rgba.width() as usize,
                    height: rgba.height() as usize,
                    bytes: std::borrow::Cow::Borrowed(rgba.as_raw()),
                })
                .map_err(|e| MemeError::encode(format!("clipboard write: {e}")))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
