use crate::foundation::error::{MemeError, MemeResult};

/// Raster encodings the exporter and optimizer can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG; quality is ignored.
    #[default]
    Png,
    /// Lossy JPEG; alpha is dropped.
    Jpeg,
    /// WebP.
    Webp,
}

impl OutputFormat {
    /// MIME type, e.g. `image/png`.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// Preferred file extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// Parse a MIME type (`image/jpg` is accepted as an alias).
    pub fn from_mime(mime: &str) -> MemeResult<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Ok(Self::Png),
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/webp" => Ok(Self::Webp),
            other => Err(MemeError::encode(format!("unsupported export type '{other}'"))),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = MemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            other if other.contains('/') => Self::from_mime(other),
            other => Err(MemeError::validation(format!("unknown output format '{other}'"))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        })
    }
}
