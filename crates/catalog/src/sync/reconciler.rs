//! Startup policy: local snapshot first, remote source as fallback.

use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::models::{Entity, EntityKind};
use crate::remote::{FetchFailure, FetchOutcome, RemoteSource};
use crate::store::{KeyValueStore, SnapshotLoad, SnapshotStore};

use super::Catalog;

/// Lifecycle of one entity kind's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing loaded yet.
    ColdStart,
    /// The in-memory collection is authoritative.
    Ready,
}

/// Why the local snapshot was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheMiss {
    /// The slot was never written or was cleared.
    Absent,
    /// The slot held an empty collection.
    Empty,
    /// The slot held something other than a collection of records.
    Corrupt(String),
    /// The store could not be read.
    Unreadable(String),
}

/// Where the collection came from at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOrigin {
    /// A non-empty local snapshot; the remote source was not contacted.
    Cache,
    /// The remote source, after the snapshot was skipped.
    Remote {
        cache_miss: CacheMiss,
        /// Set when the fetch failed and the collection started empty.
        failure: Option<FetchFailure>,
    },
}

/// Summary of a completed startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub kind: EntityKind,
    pub origin: InitOrigin,
    /// Records in the collection once ready.
    pub count: usize,
}

/// One-shot `ColdStart -> Ready` transition for a single entity kind.
pub struct Reconciler<E, S> {
    snapshots: SnapshotStore<E, S>,
}

impl<E: Entity, S: KeyValueStore> Reconciler<E, S> {
    /// Prepare a reconciler over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            snapshots: SnapshotStore::new(store),
        }
    }

    /// A reconciler has not run yet, so it is always cold.
    #[must_use]
    pub const fn state(&self) -> SyncState {
        SyncState::ColdStart
    }

    /// Run the startup policy.
    ///
    /// 1. Load the snapshot.
    /// 2. Non-empty: adopt it. The remote source is never invoked.
    /// 3. Otherwise: fetch, adopt the result even when empty, and save it.
    ///
    /// # Errors
    ///
    /// Returns an error only if saving the fetched collection fails.
    #[instrument(skip_all, fields(kind = %E::KIND))]
    pub async fn run(self, source: &impl RemoteSource<E>) -> Result<(Catalog<E, S>, InitReport)> {
        let cache_miss = match self.snapshots.load() {
            SnapshotLoad::Found(records) if !records.is_empty() => {
                info!(count = records.len(), "Using local snapshot");
                let report = InitReport {
                    kind: E::KIND,
                    origin: InitOrigin::Cache,
                    count: records.len(),
                };
                return Ok((Catalog::ready(records, self.snapshots), report));
            }
            SnapshotLoad::Found(_) => CacheMiss::Empty,
            SnapshotLoad::Absent => CacheMiss::Absent,
            SnapshotLoad::Corrupt(reason) => CacheMiss::Corrupt(reason),
            SnapshotLoad::Unreadable(reason) => CacheMiss::Unreadable(reason),
        };

        info!(reason = ?cache_miss, "Snapshot unusable, loading from remote");
        let outcome = source.fetch().await;
        let failure = outcome.failure().cloned();
        if let Some(failure) = &failure {
            warn!(error = %failure, "Starting with an empty collection");
        }

        let records = match outcome {
            FetchOutcome::Fetched(records) => records,
            FetchOutcome::Failed(_) => Vec::new(),
        };
        self.snapshots.save(&records)?;

        let report = InitReport {
            kind: E::KIND,
            origin: InitOrigin::Remote {
                cache_miss,
                failure,
            },
            count: records.len(),
        };
        Ok((Catalog::ready(records, self.snapshots), report))
    }
}
