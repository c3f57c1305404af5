use std::path::{Path, PathBuf};

use anyhow::Context;
use once_cell::sync::OnceCell;

use crate::{
    config::ENV_FONT,
    foundation::error::{MemeError, MemeResult},
};

/// Preferred display faces for captions, most "impact meme" first.
const PREFERRED_FAMILIES: &[&str] = &[
    "Impact",
    "Anton",
    "Arial Black",
    "DejaVu Sans",
    "Liberation Sans",
];

/// A caption face: shared font bytes plus the face index within them.
///
/// The bytes are wrapped once; shaping and glyph drawing share the same blob.
#[derive(Clone)]
pub struct CaptionFont {
    data: vello_cpu::peniko::FontData,
    origin: String,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont")
            .field("bytes_len", &self.data.data.len())
            .field("index", &self.data.index)
            .field("origin", &self.origin)
            .finish()
    }
}

impl CaptionFont {
    /// Wrap in-memory font bytes (face 0).
    pub fn from_bytes(bytes: Vec<u8>, origin: impl Into<String>) -> Self {
        Self::from_face(bytes, 0, origin)
    }

    /// Wrap font bytes, selecting face `index` of a collection.
    pub fn from_face(bytes: Vec<u8>, index: u32, origin: impl Into<String>) -> Self {
        Self {
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index),
            origin: origin.into(),
        }
    }

    /// Read a font file from disk.
    pub fn from_path(path: &Path) -> MemeResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read caption font '{}'", path.display()))
            .map_err(|e| MemeError::font(format!("{e:#}")))?;
        Ok(Self::from_bytes(bytes, path.display().to_string()))
    }

    /// Font file bytes (may be a collection).
    pub fn bytes(&self) -> &[u8] {
        self.data.data.data()
    }

    /// Face index within [`Self::bytes`].
    pub fn index(&self) -> u32 {
        self.data.index
    }

    /// Where the face came from, for diagnostics.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }
}

/// Lazily resolves the caption face once and hands out the cached result.
///
/// Resolution only happens when a caption is actually drawn, so image-only renders never need a
/// font to exist.
#[derive(Debug, Default)]
pub struct FontProvider {
    explicit: Option<PathBuf>,
    resolved: OnceCell<CaptionFont>,
}

impl FontProvider {
    /// Provider that loads `explicit` when set, otherwise searches system fonts.
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            resolved: OnceCell::new(),
        }
    }

    /// Provider backed by an already-loaded font.
    pub fn preloaded(font: CaptionFont) -> Self {
        Self {
            explicit: None,
            resolved: OnceCell::with_value(font),
        }
    }

    /// Resolve (once) and return the caption font.
    ///
    /// Order: the explicit path, then `MEMEFORGE_FONT`, then installed system fonts.
    pub fn resolve(&self) -> MemeResult<&CaptionFont> {
        self.resolved.get_or_try_init(|| {
            if let Some(path) = &self.explicit {
                return CaptionFont::from_path(path);
            }
            match std::env::var_os(ENV_FONT).filter(|v| !v.is_empty()) {
                Some(path) => CaptionFont::from_path(Path::new(&path)),
                None => find_system_caption_font(),
            }
        })
    }
}

/// Search installed system fonts for a bold display face.
pub fn find_system_caption_font() -> MemeResult<CaptionFont> {
    use usvg::fontdb;

    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let mut families: Vec<fontdb::Family<'_>> =
        PREFERRED_FAMILIES.iter().copied().map(fontdb::Family::Name).collect();
    families.push(fontdb::Family::SansSerif);

    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::BOLD,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))
        .ok_or_else(|| MemeError::font("no system fonts available for captions"))?;

    let origin = db
        .face(id)
        .map(|f| {
            f.families
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| "unknown".to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());

    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| MemeError::font(format!("failed to read face data for '{origin}'")))?;

    tracing::debug!(family = %origin, index, "resolved system caption font");
    Ok(CaptionFont::from_face(bytes, index, origin))
}

#[cfg(test)]
#[path = "../../tests/unit/caption/font.rs"]
mod tests;
