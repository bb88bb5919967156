//! Network access for Flashdeck
//!
//! Every address the page loads goes through a [`RequestInterceptor`] before
//! it reaches the network layer or a resource loader. The default interceptor
//! is the [`Redirector`], which maps legacy asset hosts onto the new CDN.
//!
//! # Features
//!
//! - Literal substring redirect rules, first match wins
//! - HTTP client that rewrites every request URL
//! - Resource registry covering existing and later-created elements
//! - Connectivity signal for offline/degraded mode
//! - Bounded asset existence probes

mod client;
mod connectivity;
mod probe;
mod redirect;
mod resources;

pub use client::HttpClient;
pub use connectivity::ConnectivityMonitor;
pub use flashdeck_config::RedirectRule;
pub use probe::{AssetProbe, HttpAssetProbe};
pub use redirect::{PassThrough, Redirector, RequestInterceptor};
pub use resources::{ElementId, ResourceElement, ResourceKind, ResourceRegistry};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Offline")]
    Offline,

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Server returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl NetworkError {
    /// Whether repeating the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::Status { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            NetworkError::Timeout(_) | NetworkError::Http(_) => true,
            NetworkError::Offline
            | NetworkError::InvalidUrl { .. }
            | NetworkError::ElementNotFound(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let status = |status| NetworkError::Status {
            url: String::new(),
            status,
        };
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!NetworkError::Offline.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = NetworkError::Status {
            url: "https://cdn.xperia.pt/laserquest/a.swf".into(),
            status: 404,
        };
        assert!(err.to_string().contains("404"));
        assert_eq!(NetworkError::Offline.to_string(), "Offline");
    }
}
