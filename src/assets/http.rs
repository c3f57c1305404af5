use std::time::Duration;

use crate::{
    assets::source::ImageFetcher,
    foundation::error::{MemeError, MemeResult},
};

/// Upper bound on one remote image request, connect through body.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote image fetcher backed by a shared `reqwest` client.
///
/// Transport failures and non-2xx statuses surface as [`MemeError::ImageLoad`].
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Fetcher with [`DEFAULT_FETCH_TIMEOUT`].
    pub fn new() -> MemeResult<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> MemeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("memeforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MemeError::image_load(format!("build http client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetcher reusing an existing client (connection pool, proxies, TLS config).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ImageFetcher for HttpFetcher {
    #[tracing::instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &url::Url) -> MemeResult<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MemeError::image_load(format!("fetch '{url}': {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MemeError::image_load(format!("fetch '{url}': HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MemeError::image_load(format!("read body of '{url}': {e}")))?;
        tracing::debug!(%status, bytes = body.len(), "remote image fetched");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/http.rs"]
mod tests;
