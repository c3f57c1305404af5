use crate::foundation::{
    core::{Affine, Canvas, Rect, Vec2},
    error::{MemeError, MemeResult},
};

/// Where a source image lands on the canvas after fit-and-center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitPlacement {
    /// Horizontal letterbox offset.
    pub offset_x: f64,
    /// Vertical letterbox offset.
    pub offset_y: f64,
    /// Scaled image width.
    pub draw_width: f64,
    /// Scaled image height.
    pub draw_height: f64,
}

impl FitPlacement {
    /// Destination rectangle on the canvas.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.offset_x + self.draw_width,
            self.offset_y + self.draw_height,
        )
    }

    /// Transform mapping image pixel space `(0,0)-(image_w,image_h)` onto [`Self::rect`].
    pub fn to_affine(&self, image_width: u32, image_height: u32) -> Affine {
        let sx = self.draw_width / f64::from(image_width);
        let sy = self.draw_height / f64::from(image_height);
        Affine::translate(Vec2::new(self.offset_x, self.offset_y)) * Affine::scale_non_uniform(sx, sy)
    }
}

/// Scale an image to fit the canvas without cropping or distortion and center it.
///
/// Relatively wider images span the full canvas width and are letterboxed top/bottom; taller
/// (or equal) images span the full height and are letterboxed left/right.
pub fn fit_and_center(image_width: u32, image_height: u32, canvas: Canvas) -> MemeResult<FitPlacement> {
    if image_width == 0 || image_height == 0 {
        return Err(MemeError::render(format!(
            "image dimensions must be > 0 (got {image_width}x{image_height})"
        )));
    }

    let width = f64::from(canvas.width);
    let height = f64::from(canvas.height);
    let image_aspect = f64::from(image_width) / f64::from(image_height);

    let placement = if image_aspect > canvas.aspect_ratio() {
        let draw_height = width / image_aspect;
        FitPlacement {
            offset_x: 0.0,
            offset_y: (height - draw_height) / 2.0,
            draw_width: width,
            draw_height,
        }
    } else {
        let draw_width = height * image_aspect;
        FitPlacement {
            offset_x: (width - draw_width) / 2.0,
            offset_y: 0.0,
            draw_width,
            draw_height: height,
        }
    };
    Ok(placement)
}

/// Downscale `(width, height)` to fit within `(max_width, max_height)` preserving aspect ratio.
///
/// Images already within bounds come back unchanged; nothing is ever upscaled.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let aspect = f64::from(width) / f64::from(height);
    let mut w = f64::from(width);
    let mut h = f64::from(height);
    if w > f64::from(max_width) {
        w = f64::from(max_width);
        h = w / aspect;
    }
    if h > f64::from(max_height) {
        h = f64::from(max_height);
        w = h * aspect;
    }

    (
        (w.round() as u32).clamp(1, width.max(1)),
        (h.round() as u32).clamp(1, height.max(1)),
    )
}

/// Thumbnail size whose longer side equals `size`, aspect preserved.
pub fn thumbnail_size(width: u32, height: u32, size: u32) -> (u32, u32) {
    let aspect = f64::from(width) / f64::from(height.max(1));
    let size_f = f64::from(size);
    let (w, h) = if aspect > 1.0 {
        (size_f, size_f / aspect)
    } else {
        (size_f * aspect, size_f)
    };
    ((w.floor() as u32).max(1), (h.floor() as u32).max(1))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
