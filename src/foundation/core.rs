use crate::foundation::error::{MemeError, MemeResult};

pub use kurbo::{Affine, Rect, Vec2};

/// Target drawable-surface size in pixels. Both dimensions are non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "CanvasRepr")]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

#[derive(serde::Deserialize)]
struct CanvasRepr {
    width: u32,
    height: u32,
}

impl TryFrom<CanvasRepr> for Canvas {
    type Error = MemeError;

    fn try_from(value: CanvasRepr) -> Result<Self, Self::Error> {
        Canvas::new(value.width, value.height)
    }
}

impl Canvas {
    /// Construct a canvas, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> MemeResult<Self> {
        if width == 0 || height == 0 {
            return Err(MemeError::validation(format!(
                "canvas dimensions must be > 0 (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height.
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Dimensions narrowed to the `u16` range accepted by `vello_cpu`.
    pub fn as_u16(self) -> MemeResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| MemeError::render("surface width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| MemeError::render("surface height exceeds u16"))?;
        Ok((w, h))
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Encoder quality in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Quality(f32);

impl Quality {
    /// Maximum quality.
    pub const MAX: Quality = Quality(1.0);

    /// Construct a quality value, rejecting non-finite or out-of-range input.
    pub fn new(q: f32) -> MemeResult<Self> {
        if !q.is_finite() || !(0.0..=1.0).contains(&q) {
            return Err(MemeError::validation(format!(
                "quality must be within [0, 1] (got {q})"
            )));
        }
        Ok(Self(q))
    }

    pub(crate) const fn new_unchecked(q: f32) -> Self {
        Self(q)
    }

    /// Raw value.
    pub fn get(self) -> f32 {
        self.0
    }

    /// Quality as an encoder percentage in `1..=100`.
    pub fn to_percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl TryFrom<f32> for Quality {
    type Error = MemeError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl From<Quality> for f32 {
    fn from(value: Quality) -> Self {
        value.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
