//! HTTP client with request interception

use crate::{NetworkError, RequestInterceptor};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// reqwest client whose every request URL passes through the interceptor
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    interceptor: Arc<dyn RequestInterceptor>,
}

impl HttpClient {
    /// Create a new client
    pub fn new(
        interceptor: Arc<dyn RequestInterceptor>,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("Flashdeck/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            interceptor,
        })
    }

    pub fn interceptor(&self) -> &Arc<dyn RequestInterceptor> {
        &self.interceptor
    }

    /// Rewrite and parse an outgoing address
    pub fn prepare(&self, address: &str) -> Result<Url, NetworkError> {
        let rewritten = self.interceptor.apply(address);
        Url::parse(&rewritten).map_err(|e| NetworkError::InvalidUrl {
            url: rewritten,
            reason: e.to_string(),
        })
    }

    /// GET a document body as text
    pub async fn get_text(&self, address: &str) -> Result<String, NetworkError> {
        let url = self.prepare(address)?;

        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// HEAD an address, returning the status code
    pub async fn head(&self, address: &str) -> Result<u16, NetworkError> {
        let url = self.prepare(address)?;

        tracing::debug!("HEAD {}", url);

        let response = self.client.head(url).send().await?;
        Ok(response.status().as_u16())
    }
}
