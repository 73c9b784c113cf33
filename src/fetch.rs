//! HTTP download seam
//!
//! Catalog lookups, style archives and Vale releases all go through
//! [`Fetcher`], so tests can serve bytes from memory instead of the network.

use crate::errors::{Result, ValeError};
use async_trait::async_trait;
use std::time::Duration;

/// Something that can turn a URL into bytes
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("vale-config-manager/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ValeError::NetworkFailure(format!("Cannot build HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ValeError::from_network_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ValeError::from_http_status(url, status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ValeError::from_network_error(url, e))?;

        if bytes.is_empty() {
            return Err(ValeError::DownloadFailure {
                url: url.to_string(),
                reason: "empty response body".to_string(),
            });
        }

        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
