use std::sync::Mutex;

use crate::{
    assets::{loader::ImageLoader, source::ImageSource},
    caption::{
        font::FontProvider,
        shape::CaptionShaper,
        text::{CaptionSlot, normalize_caption, place_caption},
    },
    config::CompositorOpts,
    foundation::{
        core::{Canvas, Quality, Vec2},
        error::{MemeError, MemeResult},
    },
    layout::fit::fit_and_center,
    render::{raster::RenderedRaster, surface::Painter},
};

/// One render request: an image reference, two captions and the target surface.
#[derive(Clone, Debug, PartialEq)]
pub struct MemeComposite {
    /// Image reference (`http(s)`, `file://`, path, `data:` or `blob:` URL).
    pub source: String,
    /// Raw top caption; normalized before drawing.
    pub top_caption: String,
    /// Raw bottom caption; normalized before drawing.
    pub bottom_caption: String,
    /// Output surface size.
    pub canvas: Canvas,
    /// Default quality for lossy exports of the result.
    pub quality: Quality,
}

impl MemeComposite {
    /// Request with the canvas and quality from `opts`.
    pub fn new(
        source: impl Into<String>,
        top_caption: impl Into<String>,
        bottom_caption: impl Into<String>,
        opts: &CompositorOpts,
    ) -> Self {
        Self {
            source: source.into(),
            top_caption: top_caption.into(),
            bottom_caption: bottom_caption.into(),
            canvas: opts.canvas,
            quality: opts.quality,
        }
    }
}

/// Merges a background image and two outlined captions into one raster.
///
/// Every call fully redraws into a fresh surface; nothing is cached between renders apart from
/// the resolved caption font and its shaper.
#[derive(Debug)]
pub struct Compositor {
    loader: ImageLoader,
    fonts: FontProvider,
    shaper: Mutex<Option<CaptionShaper>>,
}

impl Compositor {
    /// Compositor loading images through `loader` and captions through `fonts`.
    pub fn new(loader: ImageLoader, fonts: FontProvider) -> Self {
        Self {
            loader,
            fonts,
            shaper: Mutex::new(None),
        }
    }

    /// Compositor for `opts`, using its font path when set.
    pub fn from_opts(loader: ImageLoader, opts: &CompositorOpts) -> Self {
        Self::new(loader, FontProvider::new(opts.font_path.clone()))
    }

    /// Loader used for source images.
    pub fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    /// Load, fit, caption and rasterize `composite`.
    #[tracing::instrument(
        skip(self, composite),
        fields(width = composite.canvas.width, height = composite.canvas.height)
    )]
    pub async fn render(&self, composite: &MemeComposite) -> MemeResult<RenderedRaster> {
        let canvas = composite.canvas;
        let source = ImageSource::parse(&composite.source)?;
        let image = self.loader.load(&source).await?;

        let fit = fit_and_center(image.width, image.height, canvas)?;
        tracing::debug!(
            offset_x = fit.offset_x,
            offset_y = fit.offset_y,
            draw_width = fit.draw_width,
            draw_height = fit.draw_height,
            "image fitted"
        );

        let mut painter = Painter::new(canvas)?;
        painter.draw_image(&image, fit.to_affine(image.width, image.height))?;

        let captions = [
            (CaptionSlot::Top, normalize_caption(&composite.top_caption)),
            (CaptionSlot::Bottom, normalize_caption(&composite.bottom_caption)),
        ];
        let placed: Vec<_> = captions
            .iter()
            .filter_map(|(slot, text)| place_caption(*slot, canvas, text).map(|p| (text, p)))
            .collect();

        if !placed.is_empty() {
            let font = self.fonts.resolve()?;
            let mut guard = self
                .shaper
                .lock()
                .map_err(|_| MemeError::render("caption shaper lock poisoned"))?;
            if guard.is_none() {
                *guard = Some(CaptionShaper::new(font)?);
            }
            let shaper = guard
                .as_mut()
                .ok_or_else(|| MemeError::render("caption shaper missing"))?;
            for (text, placement) in placed {
                let shaped = shaper.shape(text, placement.font_size)?;
                let origin = Vec2::new(
                    placement.center_x - f64::from(shaped.width) / 2.0,
                    placement.top_y,
                );
                tracing::debug!(
                    caption = %text,
                    font_size = placement.font_size,
                    x = origin.x,
                    y = origin.y,
                    "caption placed"
                );
                painter.draw_caption(&shaped, font.font_data(), origin, placement.stroke_width);
            }
        }

        let surface = painter.finish()?;
        Ok(RenderedRaster::new(surface, composite.quality))
    }
}
