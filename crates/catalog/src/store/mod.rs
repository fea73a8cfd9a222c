//! Persistent key-value storage and whole-collection snapshots.
//!
//! A [`KeyValueStore`] is a flat map of string keys to string values.
//! [`SnapshotStore`] layers the snapshot discipline on top: the entire
//! collection of one entity kind is serialized under that kind's namespace
//! key on every save, never patched.
//!
//! # Backends
//!
//! - [`FileStore`] - one file per key in a data directory
//! - [`MemoryStore`] - process-local map, shared between clones

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::marker::PhantomData;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Entity;

/// Errors raised by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key contains characters the backend cannot address.
    #[error("Invalid store key: {0}")]
    InvalidKey(String),

    /// The collection could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Another thread panicked while holding the store lock.
    #[error("Store lock poisoned")]
    Poisoned,
}

/// A string-keyed, string-valued persistent map.
pub trait KeyValueStore {
    /// Read the value under `key`, or `None` if it is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Deleting an unset key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Keys are limited to ASCII alphanumerics, `_`, `-`, and `.`.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Result of reading a snapshot slot.
///
/// Only `Found` carries records. Every other variant is treated as an empty
/// cache by the reconciler; the variant records why.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotLoad<E> {
    /// The slot held a well-formed collection (possibly empty).
    Found(Vec<E>),
    /// The key is unset.
    Absent,
    /// The stored value is not a JSON array of records.
    Corrupt(String),
    /// The backend could not be read.
    Unreadable(String),
}

impl<E> SnapshotLoad<E> {
    /// The loaded records, or an empty collection for every other outcome.
    #[must_use]
    pub fn into_records(self) -> Vec<E> {
        match self {
            Self::Found(records) => records,
            Self::Absent | Self::Corrupt(_) | Self::Unreadable(_) => Vec::new(),
        }
    }

    /// Whether the slot yielded at least one record.
    #[must_use]
    pub fn has_records(&self) -> bool {
        matches!(self, Self::Found(records) if !records.is_empty())
    }
}

/// Whole-collection snapshot of one entity kind in a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct SnapshotStore<E, S> {
    store: S,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: KeyValueStore> SnapshotStore<E, S> {
    /// Wrap `store`, addressing the slot of `E`'s entity kind.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Namespace key of the slot.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        E::KIND.store_key()
    }

    /// The underlying key-value store.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.store
    }

    /// Read the collection. Never fails; see [`SnapshotLoad`].
    pub fn load(&self) -> SnapshotLoad<E> {
        let raw = match self.store.get(self.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = self.key(), "Snapshot slot is empty");
                return SnapshotLoad::Absent;
            }
            Err(e) => {
                warn!(key = self.key(), error = %e, "Snapshot slot unreadable");
                return SnapshotLoad::Unreadable(e.to_string());
            }
        };

        match serde_json::from_str::<Vec<E>>(&raw) {
            Ok(records) => {
                debug!(key = self.key(), count = records.len(), "Snapshot loaded");
                SnapshotLoad::Found(records)
            }
            Err(e) => {
                warn!(
                    key = self.key(),
                    error = %e,
                    value = %raw.chars().take(200).collect::<String>(),
                    "Discarding corrupt snapshot"
                );
                SnapshotLoad::Corrupt(e.to_string())
            }
        }
    }

    /// Overwrite the slot with the entire collection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save(&self, records: &[E]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records)?;
        self.store.set(self.key(), &raw)?;
        debug!(key = self.key(), count = records.len(), "Snapshot saved");
        Ok(())
    }

    /// Delete the slot so the next startup goes back to the remote source.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(self.key())
    }
}
