//! Game catalog for Flashdeck
//!
//! Handles catalog document parsing, the in-memory lookup table, URL slug
//! resolution, the time-boxed local cache and the recently used list.

mod cache;
mod catalog;
mod clock;
mod document;
mod entry;
mod fetcher;
mod recent;
mod resolver;
mod service;
mod slug;

pub use cache::{CachedCatalog, CatalogCache};
pub use catalog::Catalog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use document::parse_document;
pub use entry::CatalogEntry;
pub use fetcher::{CatalogFetch, HttpCatalogFetcher};
pub use recent::{DEFAULT_RECENT_LIMIT, RecentList};
pub use resolver::{MatchKind, Resolution, resolve};
pub use service::{CatalogLoad, CatalogOrigin, CatalogService};
pub use slug::{SEPARATOR, normalize};

use flashdeck_network::NetworkError;
use flashdeck_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog fetch failed after {attempts} attempt(s): {source}")]
    FetchFailed {
        attempts: u32,
        #[source]
        source: NetworkError,
    },

    #[error("Malformed catalog: {0}")]
    Malformed(String),

    #[error("Offline and no cached catalog available")]
    Offline,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
