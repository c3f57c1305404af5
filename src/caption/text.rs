use crate::foundation::core::Canvas;

/// Distance between a caption and the canvas edge it is anchored to.
pub const CAPTION_INSET_PX: f64 = 20.0;

/// Outline width as a fraction of the caption font size.
pub const STROKE_WIDTH_RATIO: f32 = 0.1;

/// Captions at or below this many characters are drawn at the base size.
const LENGTH_FACTOR_PIVOT: usize = 10;

/// Uppercase, trim, and collapse internal whitespace runs to single spaces.
///
/// Idempotent. A caption consisting only of whitespace normalizes to `""`.
pub fn normalize_caption(text: &str) -> String {
    let upper = text.to_uppercase();
    let mut out = String::with_capacity(upper.len());
    for word in upper.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Font size for a normalized caption on a canvas of `canvas_width` pixels.
///
/// Long captions shrink by 2% per character past ten, floored at half the base size; the result
/// never exceeds `min(canvas_width * 0.08, 72)`.
pub fn caption_font_size(canvas_width: u32, caption: &str) -> f32 {
    let width = f64::from(canvas_width);
    let base = (width * 0.04).max(16.0);
    let max = (width * 0.08).min(72.0);

    let chars = caption.chars().count();
    let over = chars.saturating_sub(LENGTH_FACTOR_PIVOT) as f64;
    let length_factor = (1.0 - over * 0.02).max(0.5);

    (base * length_factor).min(max) as f32
}

/// Which canvas edge a caption is anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptionSlot {
    /// Near the top edge.
    Top,
    /// Near the bottom edge, lifted by its own font size.
    Bottom,
}

/// Resolved position and stroke metrics for one caption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionPlacement {
    /// Horizontal midline the caption is centered on.
    pub center_x: f64,
    /// Top of the caption's em box.
    pub top_y: f64,
    /// Font size in pixels.
    pub font_size: f32,
    /// Outline stroke width in pixels.
    pub stroke_width: f32,
}

/// Place a normalized caption. Returns `None` for an empty caption, which is not drawn.
pub fn place_caption(slot: CaptionSlot, canvas: Canvas, caption: &str) -> Option<CaptionPlacement> {
    if caption.is_empty() {
        return None;
    }

    let font_size = caption_font_size(canvas.width, caption);
    let top_y = match slot {
        CaptionSlot::Top => CAPTION_INSET_PX,
        CaptionSlot::Bottom => f64::from(canvas.height) - f64::from(font_size) - CAPTION_INSET_PX,
    };

    Some(CaptionPlacement {
        center_x: f64::from(canvas.width) / 2.0,
        top_y,
        font_size,
        stroke_width: font_size * STROKE_WIDTH_RATIO,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/caption/text.rs"]
mod tests;
