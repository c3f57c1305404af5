use std::{path::PathBuf, str::FromStr};

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::foundation::error::{MemeError, MemeResult};

/// A reference to a source image, parsed from the string form callers hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// `http(s)://` resource fetched through an [`ImageFetcher`].
    Remote(url::Url),
    /// Local file, from a `file://` URL or a plain path.
    File(PathBuf),
    /// Inline `data:` URL payload.
    Data {
        /// Declared media type (may be empty).
        mime: String,
        /// Decoded payload bytes.
        bytes: Vec<u8>,
    },
    /// `blob:` URL registered in an [`crate::ObjectUrlRegistry`].
    Blob(String),
}

impl ImageSource {
    /// Parse a reference string.
    pub fn parse(reference: &str) -> MemeResult<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(MemeError::image_load("image reference is empty"));
        }

        if reference.starts_with("blob:") {
            return Ok(Self::Blob(reference.to_string()));
        }
        if let Some(rest) = reference.strip_prefix("data:") {
            return parse_data_url(rest);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            let url = url::Url::parse(reference)
                .map_err(|e| MemeError::image_load(format!("invalid image url '{reference}': {e}")))?;
            return Ok(Self::Remote(url));
        }
        if reference.starts_with("file://") {
            let path = url::Url::parse(reference)
                .ok()
                .and_then(|u| u.to_file_path().ok())
                .ok_or_else(|| MemeError::image_load(format!("invalid file url '{reference}'")))?;
            return Ok(Self::File(path));
        }
        Ok(Self::File(PathBuf::from(reference)))
    }

    /// Short description for logs and error messages; never includes inline payloads.
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.to_string(),
            Self::File(path) => path.display().to_string(),
            Self::Data { mime, bytes } => format!("data:{mime} ({} bytes)", bytes.len()),
            Self::Blob(url) => url.clone(),
        }
    }
}

impl FromStr for ImageSource {
    type Err = MemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_data_url(rest: &str) -> MemeResult<ImageSource> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MemeError::image_load("data url is missing ','"))?;
    let Some(mime) = header.strip_suffix(";base64") else {
        return Err(MemeError::image_load("only base64 data urls are supported"));
    };
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| MemeError::image_load(format!("invalid base64 in data url: {e}")))?;
    Ok(ImageSource::Data {
        mime: mime.to_string(),
        bytes,
    })
}

/// Fetches remote image bytes.
///
/// [`crate::HttpFetcher`] is the stock implementation behind the `http` feature. Implementations
/// must return the raw response body so the decoded pixels stay exportable.
#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the body at `url`.
    async fn fetch(&self, url: &url::Url) -> MemeResult<Vec<u8>>;
}

/// Fetcher for builds or hosts without network access; every request fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRemoteFetcher;

#[async_trait::async_trait]
impl ImageFetcher for NoRemoteFetcher {
    async fn fetch(&self, url: &url::Url) -> MemeResult<Vec<u8>> {
        Err(MemeError::image_load(format!(
            "no remote fetcher configured for '{url}'"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
