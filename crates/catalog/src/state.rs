//! Application state shared by every command.

use std::sync::Arc;

use tracing::instrument;

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::models::{Product, User};
use crate::remote::ApiClient;
use crate::store::{FileStore, SnapshotStore};
use crate::sync::{Catalog, InitReport};

/// Configuration, remote client, and store, wired together.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    api: ApiClient,
    store: FileStore,
}

impl AppState {
    /// Create the state, opening the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the data
    /// directory cannot be created.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let api = ApiClient::new(&config.remote)?;
        let store = FileStore::open(&config.data_dir)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api, store }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Remote API client; it is the [`crate::remote::RemoteSource`] for
    /// both entity kinds.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn store(&self) -> &FileStore {
        &self.inner.store
    }

    /// Snapshot slot of the users collection.
    #[must_use]
    pub fn user_snapshots(&self) -> SnapshotStore<User, FileStore> {
        SnapshotStore::new(self.inner.store.clone())
    }

    /// Snapshot slot of the products collection.
    #[must_use]
    pub fn product_snapshots(&self) -> SnapshotStore<Product, FileStore> {
        SnapshotStore::new(self.inner.store.clone())
    }

    /// Bring the users collection to `Ready`.
    ///
    /// # Errors
    ///
    /// Returns an error if a fetched collection cannot be persisted.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<(Catalog<User, FileStore>, InitReport)> {
        Catalog::init(self.inner.store.clone(), &self.inner.api).await
    }

    /// Bring the products collection to `Ready`.
    ///
    /// # Errors
    ///
    /// Returns an error if a fetched collection cannot be persisted.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<(Catalog<Product, FileStore>, InitReport)> {
        Catalog::init(self.inner.store.clone(), &self.inner.api).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = tmp.path().join("nested").join("data");
        let config = CatalogConfig::from_lookup(|key| {
            (key == "VITRINE_DATA_DIR").then(|| data_dir.display().to_string())
        })
        .unwrap();

        let state = AppState::new(config).unwrap();

        assert!(data_dir.is_dir());
        assert_eq!(state.store().dir(), data_dir.as_path());
        assert_eq!(state.user_snapshots().key(), "df2_users_v1");
        assert_eq!(state.product_snapshots().key(), "df2_products_v1");
    }
}
