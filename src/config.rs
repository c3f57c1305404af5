use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    encode::format::OutputFormat,
    foundation::{
        core::{Canvas, Quality},
        error::{MemeError, MemeResult},
    },
};

/// Environment variable naming a caption font file.
pub const ENV_FONT: &str = "MEMEFORGE_FONT";
/// Environment variable overriding the default canvas width.
pub const ENV_CANVAS_WIDTH: &str = "MEMEFORGE_CANVAS_WIDTH";
/// Environment variable overriding the default canvas height.
pub const ENV_CANVAS_HEIGHT: &str = "MEMEFORGE_CANVAS_HEIGHT";

/// Target surface and caption font for the compositor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorOpts {
    /// Output surface size.
    pub canvas: Canvas,
    /// Default quality for lossy exports.
    pub quality: Quality,
    /// Caption font file; system fonts are searched when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 800,
                height: 600,
            },
            quality: Quality::new_unchecked(0.9),
            font_path: None,
        }
    }
}

/// Bounds and encoding for upload optimization.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeOpts {
    /// Widest output allowed.
    pub max_width: u32,
    /// Tallest output allowed.
    pub max_height: u32,
    /// Encoder quality for lossy formats.
    pub quality: Quality,
    /// Output encoding; `None` picks the best supported lossy format.
    pub format: Option<OutputFormat>,
}

impl Default for OptimizeOpts {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            quality: Quality::new_unchecked(0.8),
            format: None,
        }
    }
}

impl OptimizeOpts {
    /// Reject zero bounds.
    pub fn validate(&self) -> MemeResult<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(MemeError::validation(format!(
                "optimize bounds must be > 0 (got {}x{})",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

/// Accepted intrinsic image dimensions, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DimensionBounds {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for DimensionBounds {
    fn default() -> Self {
        Self {
            min_width: 100,
            min_height: 100,
            max_width: 5000,
            max_height: 5000,
        }
    }
}

/// Preview thumbnail settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailOpts {
    /// Length of the longer thumbnail side.
    pub size: u32,
    /// JPEG quality.
    pub quality: Quality,
}

impl Default for ThumbnailOpts {
    fn default() -> Self {
        Self {
            size: 200,
            quality: Quality::new_unchecked(0.7),
        }
    }
}

/// Top-level configuration, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemeforgeConfig {
    pub compositor: CompositorOpts,
    pub optimize: OptimizeOpts,
    pub dimensions: DimensionBounds,
    pub thumbnail: ThumbnailOpts,
}

impl MemeforgeConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> MemeResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| MemeError::validation(format!("config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> MemeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Apply `MEMEFORGE_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> MemeResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `MEMEFORGE_*` overrides from `lookup`.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> MemeResult<()> {
        if let Some(font) = lookup(ENV_FONT).filter(|v| !v.trim().is_empty()) {
            self.compositor.font_path = Some(PathBuf::from(font));
        }
        let width = parse_dimension(ENV_CANVAS_WIDTH, lookup(ENV_CANVAS_WIDTH))?;
        let height = parse_dimension(ENV_CANVAS_HEIGHT, lookup(ENV_CANVAS_HEIGHT))?;
        if width.is_some() || height.is_some() {
            self.compositor.canvas = Canvas::new(
                width.unwrap_or(self.compositor.canvas.width),
                height.unwrap_or(self.compositor.canvas.height),
            )?;
        }
        Ok(())
    }

    /// Check cross-field constraints the types cannot express.
    pub fn validate(&self) -> MemeResult<()> {
        self.optimize.validate()?;
        let d = &self.dimensions;
        if d.min_width > d.max_width || d.min_height > d.max_height {
            return Err(MemeError::validation(
                "dimension bounds: minimum exceeds maximum",
            ));
        }
        if self.thumbnail.size == 0 {
            return Err(MemeError::validation("thumbnail size must be > 0"));
        }
        Ok(())
    }
}

fn parse_dimension(key: &str, value: Option<String>) -> MemeResult<Option<u32>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|&n| n > 0)
        .map(Some)
        .ok_or_else(|| MemeError::validation(format!("{key} must be a positive integer (got '{raw}')")))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
