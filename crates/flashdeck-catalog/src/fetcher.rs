//! Catalog document download with retries

use crate::CatalogError;
use async_trait::async_trait;
use flashdeck_network::{HttpClient, NetworkError};
use std::time::Duration;

/// Source of the raw catalog document
#[async_trait]
pub trait CatalogFetch: Send + Sync {
    async fn fetch(&self) -> Result<String, CatalogError>;
}

/// Fetches the catalog over HTTP, retrying with exponential backoff
pub struct HttpCatalogFetcher {
    client: HttpClient,
    url: String,
    max_retries: u32,
    backoff: Duration,
}

impl HttpCatalogFetcher {
    pub fn new(client: HttpClient, url: impl Into<String>, max_retries: u32, backoff: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            max_retries: max_retries.max(1),
            backoff,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogFetch for HttpCatalogFetcher {
    async fn fetch(&self) -> Result<String, CatalogError> {
        let mut last_error: Option<NetworkError> = None;
        let mut attempts = 0;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                tracing::warn!("Retry attempt {} of {}", attempt + 1, self.max_retries);
                tokio::time::sleep(self.backoff.saturating_mul(2u32.saturating_pow(attempt - 1))).await;
            }
            attempts += 1;

            match self.client.get_text(&self.url).await {
                Ok(body) => {
                    tracing::info!("Fetched catalog from {} ({} bytes)", self.url, body.len());
                    return Ok(body);
                }
                Err(e) => {
                    tracing::warn!("Catalog fetch from {} failed: {}", self.url, e);
                    let retryable = e.is_retryable();
                    last_error = Some(e);
                    if !retryable {
                        break;
                    }
                }
            }
        }

        Err(CatalogError::FetchFailed {
            attempts,
            source: last_error.unwrap_or(NetworkError::Offline),
        })
    }
}
