use once_cell::sync::OnceCell;

use crate::{
    encode::{blob::Blob, encoder::encode_surface, format::OutputFormat},
    foundation::{core::Quality, error::MemeResult},
    render::surface::Surface,
};

/// Output of one composite render: the surface plus lazily derived PNG forms.
#[derive(Debug)]
pub struct RenderedRaster {
    surface: Surface,
    quality: Quality,
    png: OnceCell<Blob>,
    data_url: OnceCell<String>,
}

impl RenderedRaster {
    /// Wrap a finished surface; `quality` is the default for lossy exports.
    pub fn new(surface: Surface, quality: Quality) -> Self {
        Self {
            surface,
            quality,
            png: OnceCell::new(),
            data_url: OnceCell::new(),
        }
    }

    /// Drawable surface for live display.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.surface.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.surface.height
    }

    /// Quality requested for this render.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// PNG encoding, computed on first access.
    pub fn png_blob(&self) -> MemeResult<&Blob> {
        self.png
            .get_or_try_init(|| encode_surface(&self.surface, OutputFormat::Png, self.quality))
    }

    /// PNG data URL, computed on first access.
    pub fn data_url(&self) -> MemeResult<&str> {
        self.data_url
            .get_or_try_init(|| self.png_blob().map(Blob::to_data_url))
            .map(String::as_str)
    }
}
