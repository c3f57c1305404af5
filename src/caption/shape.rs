use crate::{
    caption::font::CaptionFont,
    foundation::error::{MemeError, MemeResult},
};

/// One positioned glyph of a shaped caption, in layout space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionGlyph {
    /// Glyph id in the caption font.
    pub id: u32,
    /// Pen x relative to the left edge of the line.
    pub x: f32,
    /// Baseline y relative to the top of the line box.
    pub y: f32,
}

/// A single-line caption shaped at a fixed font size.
#[derive(Clone, Debug)]
pub struct ShapedCaption {
    /// Advance width of the line.
    pub width: f32,
    /// Line box height.
    pub height: f32,
    /// Font size the glyphs were shaped at.
    pub font_size: f32,
    /// Glyphs in visual order.
    pub glyphs: Vec<CaptionGlyph>,
}

impl ShapedCaption {
    pub(crate) fn cpu_glyphs(&self) -> impl Iterator<Item = vello_cpu::Glyph> + '_ {
        self.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        })
    }
}

/// Shapes captions with Parley against one registered caption font.
pub struct CaptionShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
}

impl std::fmt::Debug for CaptionShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionShaper")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl CaptionShaper {
    /// Register `font` with a fresh Parley font context.
    pub fn new(font: &CaptionFont) -> MemeResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(font.font_data().data.clone(), None);
        // Collections register every face; shape with the family of the face we will draw.
        let family_id = families
            .iter()
            .find(|(_, infos)| infos.iter().any(|info| info.index() == font.index()))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| MemeError::font(format!("no font families in '{}'", font.origin())))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MemeError::font("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Family name Parley resolved from the font bytes.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shape `text` as one unwrapped line at `size_px`.
    ///
    /// The line box starts at y = 0, so drawing at a caption's `top_y` puts the top of the line box there.
    pub fn shape(&mut self, text: &str, size_px: f32) -> MemeResult<ShapedCaption> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MemeError::render("caption font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::with_capacity(text.len());
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| CaptionGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Ok(ShapedCaption {
            width: layout.width(),
            height: layout.height(),
            font_size: size_px,
            glyphs,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/shape.rs"]
mod tests;
