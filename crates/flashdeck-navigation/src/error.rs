//! Navigation errors

use flashdeck_catalog::CatalogError;
use flashdeck_network::NetworkError;
use std::fmt;
use thiserror::Error;

/// Category of a navigation failure, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CatalogFetchFailed,
    CatalogMalformed,
    EntryNotFound,
    AssetUnreachable,
    PlayerInitFailed,
    Offline,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::CatalogFetchFailed => "catalog fetch failed",
            ErrorKind::CatalogMalformed => "catalog malformed",
            ErrorKind::EntryNotFound => "entry not found",
            ErrorKind::AssetUnreachable => "asset unreachable",
            ErrorKind::PlayerInitFailed => "player init failed",
            ErrorKind::Offline => "offline",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Catalog could not be loaded: {0}")]
    CatalogFetchFailed(String),

    #[error("Catalog is malformed: {0}")]
    CatalogMalformed(String),

    #[error("No game found for '{0}'")]
    EntryNotFound(String),

    #[error("Could not load {asset}: {cause}")]
    AssetUnreachable { asset: String, cause: String },

    #[error("Player failed to start: {0}")]
    PlayerInitFailed(String),

    #[error("Offline")]
    Offline,
}

impl NavigationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NavigationError::CatalogFetchFailed(_) => ErrorKind::CatalogFetchFailed,
            NavigationError::CatalogMalformed(_) => ErrorKind::CatalogMalformed,
            NavigationError::EntryNotFound(_) => ErrorKind::EntryNotFound,
            NavigationError::AssetUnreachable { .. } => ErrorKind::AssetUnreachable,
            NavigationError::PlayerInitFailed(_) => ErrorKind::PlayerInitFailed,
            NavigationError::Offline => ErrorKind::Offline,
        }
    }
}

impl From<CatalogError> for NavigationError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Malformed(reason) => NavigationError::CatalogMalformed(reason),
            CatalogError::Json(e) => NavigationError::CatalogMalformed(e.to_string()),
            CatalogError::Offline => NavigationError::Offline,
            e @ (CatalogError::FetchFailed { .. } | CatalogError::Storage(_)) => {
                NavigationError::CatalogFetchFailed(e.to_string())
            }
        }
    }
}

/// Errors raised while wiring the frontend together
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Network setup failed: {0}")]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_mapping() {
        let err: NavigationError = CatalogError::Malformed("no entries".into()).into();
        assert_eq!(err.kind(), ErrorKind::CatalogMalformed);

        let err: NavigationError = CatalogError::Offline.into();
        assert_eq!(err, NavigationError::Offline);

        let err: NavigationError = CatalogError::FetchFailed {
            attempts: 3,
            source: NetworkError::Offline,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::CatalogFetchFailed);
        assert!(err.to_string().contains("3 attempt"));
    }

    #[test]
    fn test_error_display() {
        let err = NavigationError::AssetUnreachable {
            asset: "a.swf".into(),
            cause: "404".into(),
        };
        assert_eq!(err.to_string(), "Could not load a.swf: 404");
        assert_eq!(ErrorKind::EntryNotFound.to_string(), "entry not found");
    }
}
