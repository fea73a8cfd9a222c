//! Unified error handling.
//!
//! Remote and snapshot-read failures never surface here: they are recovered
//! as empty collections (see [`crate::remote::FetchOutcome`] and
//! [`crate::store::SnapshotLoad`]). What remains are failures the caller has
//! to act on.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Library-level error type.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Writing the snapshot failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// HTML rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// The identifier is already used by another record in the collection.
    #[error("Identifier {0} is already in use")]
    DuplicateId(i64),

    /// A list position does not exist.
    #[error("No record at position {position} (collection has {len})")]
    PositionOutOfRange { position: usize, len: usize },
}

/// Result type alias for `CatalogError`.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::PositionOutOfRange { position: 4, len: 2 };
        assert_eq!(err.to_string(), "No record at position 4 (collection has 2)");

        let err = CatalogError::from(StoreError::InvalidKey("a/b".to_string()));
        assert_eq!(err.to_string(), "Store error: Invalid store key: a/b");
    }
}
