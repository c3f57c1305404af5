use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::{
        decode::{DecodedImage, decode_image, probe_dimensions},
        object_url::ObjectUrlRegistry,
        source::{ImageFetcher, ImageSource, NoRemoteFetcher},
    },
    foundation::error::{MemeError, MemeResult},
};

/// Turns an [`ImageSource`] into decoded pixels.
///
/// Each call resolves or fails exactly once; nothing is retried or cached.
#[derive(Clone)]
pub struct ImageLoader {
    fetcher: Arc<dyn ImageFetcher>,
    blobs: ObjectUrlRegistry,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("live_object_urls", &self.blobs.live_count())
            .finish_non_exhaustive()
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(Arc::new(NoRemoteFetcher), ObjectUrlRegistry::new())
    }
}

impl ImageLoader {
    /// Loader using `fetcher` for remote URLs and `blobs` for `blob:` URLs.
    pub fn new(fetcher: Arc<dyn ImageFetcher>, blobs: ObjectUrlRegistry) -> Self {
        Self { fetcher, blobs }
    }

    /// Registry backing `blob:` URLs.
    pub fn blobs(&self) -> &ObjectUrlRegistry {
        &self.blobs
    }

    /// Raw encoded bytes behind `source`.
    pub async fn fetch_bytes(&self, source: &ImageSource) -> MemeResult<Arc<[u8]>> {
        match source {
            ImageSource::Remote(url) => {
                let bytes = self.fetcher.fetch(url).await.map_err(|e| match e {
                    MemeError::ImageLoad(_) => e,
                    other => MemeError::image_load(format!("fetch '{url}': {other}")),
                })?;
                Ok(Arc::from(bytes))
            }
            ImageSource::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("read image '{}'", path.display()))
                    .map_err(|e| MemeError::image_load(format!("{e:#}")))?;
                Ok(Arc::from(bytes))
            }
            ImageSource::Data { bytes, .. } => Ok(Arc::from(bytes.as_slice())),
            ImageSource::Blob(url) => self
                .blobs
                .resolve(url)
                .ok_or_else(|| MemeError::image_load(format!("object url '{url}' is not live"))),
        }
    }

    /// Fetch and decode `source`.
    #[tracing::instrument(skip(self, source), fields(source = %source.describe()))]
    pub async fn load(&self, source: &ImageSource) -> MemeResult<DecodedImage> {
        let bytes = self.fetch_bytes(source).await?;
        let image = decode_image(&bytes)?;
        tracing::debug!(
            width = image.width,
            height = image.height,
            bytes = bytes.len(),
            "image decoded"
        );
        Ok(image)
    }

    /// Parse `reference` and load it.
    pub async fn load_ref(&self, reference: &str) -> MemeResult<DecodedImage> {
        let source = ImageSource::parse(reference)?;
        self.load(&source).await
    }

    /// Intrinsic dimensions of `source`, decoding only the header.
    pub async fn probe(&self, source: &ImageSource) -> MemeResult<(u32, u32)> {
        let bytes = self.fetch_bytes(source).await?;
        probe_dimensions(&bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
