use std::sync::Arc;

use crate::{
    assets::decode::DecodedImage,
    caption::shape::ShapedCaption,
    foundation::{
        core::{Affine, Canvas, Vec2},
        error::{MemeError, MemeResult},
        math::unpremultiply_rgba8_in_place,
    },
};

/// Finished drawable surface in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub data: Vec<u8>,
}

impl Surface {
    /// Canvas matching the surface dimensions.
    pub fn canvas(&self) -> MemeResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Straight-alpha copy suitable for the `image` encoders.
    pub fn to_rgba_image(&self) -> MemeResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| MemeError::encode("surface byte length does not match its dimensions"))
    }

    /// Premultiplied pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Records draw calls for one surface and rasterizes them on [`Painter::finish`].
///
/// Every painter owns its context; nothing is pooled between renders.
pub struct Painter {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
}

impl Painter {
    /// Transparent surface of `canvas` size.
    pub fn new(canvas: Canvas) -> MemeResult<Self> {
        let (w, h) = canvas.as_u16()?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
        })
    }

    /// Draw `image` with `transform` mapping its pixel space onto the canvas.
    pub fn draw_image(&mut self, image: &DecodedImage, transform: Affine) -> MemeResult<()> {
        let pixmap = background_pixmap(image)?;
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        Ok(())
    }

    /// Draw a black outline then a white fill of `caption` with its layout origin at `origin`.
    pub fn draw_caption(
        &mut self,
        caption: &ShapedCaption,
        font: &vello_cpu::peniko::FontData,
        origin: Vec2,
        stroke_width: f32,
    ) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

        self.ctx
            .set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(stroke_width)));
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        self.ctx
            .glyph_run(font)
            .font_size(caption.font_size)
            .stroke_glyphs(caption.cpu_glyphs());

        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        self.ctx
            .glyph_run(font)
            .font_size(caption.font_size)
            .fill_glyphs(caption.cpu_glyphs());
    }

    /// Rasterize all recorded draws.
    pub fn finish(mut self) -> MemeResult<Surface> {
        let (w, h) = self.canvas.as_u16()?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(Surface {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// Wrap a decoded background as an image paint.
fn background_pixmap(image: &DecodedImage) -> MemeResult<vello_cpu::Pixmap> {
    let oversized = || {
        MemeError::render(format!(
            "background {}x{} exceeds the 65535px raster limit",
            image.width, image.height
        ))
    };
    let w = u16::try_from(image.width).map_err(|_| oversized())?;
    let h = u16::try_from(image.height).map_err(|_| oversized())?;

    let expected = image.width as usize * image.height as usize * 4;
    if image.rgba8_premul.len() != expected {
        return Err(MemeError::render(format!(
            "background holds {} bytes, expected {expected} for {}x{}",
            image.rgba8_premul.len(),
            image.width,
            image.height
        )));
    }

    let pixels: Vec<_> = image
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
        .collect();
    let translucent = pixels.iter().any(|px| px.a != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, translucent))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
