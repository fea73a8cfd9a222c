//! Remote API loader.
//!
//! # Architecture
//!
//! - [`ApiClient`] performs one `GET` per load with `reqwest` and decodes the
//!   `{ "users": [...] }` / `{ "products": [...] }` envelopes
//! - Raw entities are normalized into local records in [`conversions`], so
//!   downstream code never sees a missing field
//! - Failures never escape as errors: a load yields a [`FetchOutcome`] whose
//!   failure variant carries the reason and an empty collection
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_catalog::remote::{ApiClient, RemoteSource};
//!
//! let client = ApiClient::new(&config.remote)?;
//! let users = RemoteSource::<User>::fetch(&client).await.into_records();
//! ```

mod client;
pub mod conversions;
pub mod types;

pub use client::ApiClient;

use std::future::Future;

use thiserror::Error;

/// Why a remote load produced no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The request could not be sent or the body could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The body was not the expected JSON envelope.
    #[error("JSON parse error: {0}")]
    Parse(String),
}

/// Result of a remote load.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<R> {
    /// The API answered; the normalized records (possibly none).
    Fetched(Vec<R>),
    /// The load failed and was recovered as an empty collection.
    Failed(FetchFailure),
}

impl<R> FetchOutcome<R> {
    /// The fetched records, or an empty collection on failure.
    #[must_use]
    pub fn into_records(self) -> Vec<R> {
        match self {
            Self::Fetched(records) => records,
            Self::Failed(_) => Vec::new(),
        }
    }

    /// The failure reason, if the load failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Fetched(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Number of records carried.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Fetched(records) => records.len(),
            Self::Failed(_) => 0,
        }
    }

    /// Whether no records are carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A source of normalized records of type `R`.
///
/// Implementations log and absorb every failure; `fetch` always completes
/// with a [`FetchOutcome`].
pub trait RemoteSource<R> {
    /// Load the collection.
    fn fetch(&self) -> impl Future<Output = FetchOutcome<R>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_is_empty() {
        let outcome: FetchOutcome<u8> = FetchOutcome::Failed(FetchFailure::Status(503));
        assert!(outcome.is_empty());
        assert_eq!(outcome.failure(), Some(&FetchFailure::Status(503)));
        assert!(outcome.into_records().is_empty());
    }

    #[test]
    fn test_fetched_outcome_keeps_records() {
        let outcome = FetchOutcome::Fetched(vec![1, 2, 3]);
        assert_eq!(outcome.len(), 3);
        assert_eq!(outcome.failure(), None);
        assert_eq!(outcome.into_records(), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(
            FetchFailure::Status(404).to_string(),
            "Unexpected HTTP status 404"
        );
    }
}
