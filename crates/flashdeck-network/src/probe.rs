//! Asset existence checks

use crate::{HttpClient, NetworkError};
use async_trait::async_trait;
use std::time::Duration;

/// Checks that an asset is reachable before the player is asked to load it
#[async_trait]
pub trait AssetProbe: Send + Sync {
    async fn check(&self, address: &str) -> Result<(), NetworkError>;
}

/// HEAD-request probe with a bounded wait
pub struct HttpAssetProbe {
    client: HttpClient,
    timeout: Duration,
}

impl HttpAssetProbe {
    pub fn new(client: HttpClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl AssetProbe for HttpAssetProbe {
    async fn check(&self, address: &str) -> Result<(), NetworkError> {
        let status = tokio::time::timeout(self.timeout, self.client.head(address))
            .await
            .map_err(|_| NetworkError::Timeout(self.timeout))??;

        // Some static hosts refuse HEAD outright; that still proves the host answers.
        if (200..400).contains(&status) || status == 405 {
            Ok(())
        } else {
            Err(NetworkError::Status {
                url: address.to_string(),
                status,
            })
        }
    }
}
