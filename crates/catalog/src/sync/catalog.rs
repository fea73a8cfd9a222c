//! In-memory collection controller.

use tracing::{debug, info, instrument, warn};

use crate::error::{CatalogError, Result};
use crate::models::{Entity, IdAllocator, InsertPosition};
use crate::remote::{FetchFailure, FetchOutcome, RemoteSource};
use crate::render::{ListView, ToItemView, render};
use crate::store::{KeyValueStore, SnapshotStore};

use super::{InitReport, Reconciler, SyncState};

/// Proof that a refresh was started; see [`Catalog::begin_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a refresh only takes effect through `Catalog::finish_refresh`"]
pub struct RefreshTicket {
    generation: u64,
}

/// What a finished refresh did to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshResult {
    /// The collection was replaced and persisted.
    Applied {
        count: usize,
        failure: Option<FetchFailure>,
    },
    /// A newer refresh was started meanwhile; the result was dropped.
    Stale,
}

/// The authoritative collection of one entity kind.
///
/// Every successful mutation writes the whole collection back to the store
/// before returning.
#[derive(Debug)]
pub struct Catalog<E, S> {
    records: Vec<E>,
    snapshots: SnapshotStore<E, S>,
    generation: u64,
}

impl<E: Entity, S: KeyValueStore> Catalog<E, S> {
    pub(crate) fn ready(records: Vec<E>, snapshots: SnapshotStore<E, S>) -> Self {
        Self {
            records,
            snapshots,
            generation: 0,
        }
    }

    /// Bring the collection to `Ready` using the startup policy.
    ///
    /// # Errors
    ///
    /// Returns an error if a fetched collection cannot be persisted.
    pub async fn init(store: S, source: &impl RemoteSource<E>) -> Result<(Self, InitReport)> {
        Reconciler::new(store).run(source).await
    }

    /// Always `Ready`: a catalog only exists once reconciliation is done.
    #[must_use]
    pub const fn state(&self) -> SyncState {
        SyncState::Ready
    }

    #[must_use]
    pub fn records(&self) -> &[E] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at render position `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&E> {
        self.records.get(position)
    }

    /// Render position of the record with identifier `id`.
    #[must_use]
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// The snapshot slot backing this catalog.
    #[must_use]
    pub const fn snapshots(&self) -> &SnapshotStore<E, S> {
        &self.snapshots
    }

    /// An identifier not used by any record in the collection.
    #[must_use]
    pub fn fresh_id(&self) -> i64 {
        IdAllocator::for_records(&self.records).allocate()
    }

    /// Insert `record` at its kind's insertion point and persist.
    ///
    /// Returns the position the record landed at.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is already in use or the store
    /// write fails. On a store failure the collection is left unchanged.
    #[instrument(skip_all, fields(kind = %E::KIND, id = record.id()))]
    pub fn append(&mut self, record: E) -> Result<usize> {
        if self.position_of(record.id()).is_some() {
            return Err(CatalogError::DuplicateId(record.id()));
        }

        let position = match E::KIND.insert_position() {
            InsertPosition::Front => {
                self.records.insert(0, record);
                0
            }
            InsertPosition::Back => {
                self.records.push(record);
                self.records.len() - 1
            }
        };
        if let Err(e) = self.persist() {
            self.records.remove(position);
            return Err(e);
        }
        info!(position, count = self.records.len(), "Record added");
        Ok(position)
    }

    /// Remove the record at `position` and persist.
    ///
    /// An out-of-range position is a no-op: nothing is written and `None`
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails; the record is put back.
    #[instrument(skip(self), fields(kind = %E::KIND))]
    pub fn remove_at(&mut self, position: usize) -> Result<Option<E>> {
        if position >= self.records.len() {
            debug!(len = self.records.len(), "Position out of range, nothing removed");
            return Ok(None);
        }

        let removed = self.records.remove(position);
        if let Err(e) = self.persist() {
            self.records.insert(position, removed);
            return Err(e);
        }
        info!(id = removed.id(), count = self.records.len(), "Record removed");
        Ok(Some(removed))
    }

    /// Remove the record with identifier `id` and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn remove_by_id(&mut self, id: i64) -> Result<Option<E>> {
        match self.position_of(id) {
            Some(position) => self.remove_at(position),
            None => Ok(None),
        }
    }

    /// Discard the collection, adopt `records`, and persist unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails; the previous collection
    /// is kept.
    pub fn replace_all(&mut self, records: Vec<E>) -> Result<()> {
        let previous = std::mem::replace(&mut self.records, records);
        if let Err(e) = self.persist() {
            self.records = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Start a refresh. Any ticket issued earlier becomes stale.
    pub const fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Apply the outcome of the fetch started with `ticket`.
    ///
    /// A failed fetch still replaces the collection (with nothing). Results
    /// for superseded tickets are dropped without touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    #[instrument(skip_all, fields(kind = %E::KIND, generation = ticket.generation))]
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        outcome: FetchOutcome<E>,
    ) -> Result<RefreshResult> {
        if ticket.generation != self.generation {
            info!(current = self.generation, "Discarding stale refresh result");
            return Ok(RefreshResult::Stale);
        }

        let failure = outcome.failure().cloned();
        if let Some(failure) = &failure {
            warn!(error = %failure, "Refresh failed, collection is now empty");
        }
        self.replace_all(outcome.into_records())?;
        info!(count = self.records.len(), "Collection refreshed");
        Ok(RefreshResult::Applied {
            count: self.records.len(),
            failure,
        })
    }

    /// Re-fetch from `source` and replace the collection wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn refresh(&mut self, source: &impl RemoteSource<E>) -> Result<RefreshResult> {
        let ticket = self.begin_refresh();
        let outcome = source.fetch().await;
        self.finish_refresh(ticket, outcome)
    }

    fn persist(&self) -> Result<()> {
        self.snapshots.save(&self.records)?;
        Ok(())
    }
}

impl<E: Entity + ToItemView, S: KeyValueStore> Catalog<E, S> {
    /// Project the collection for display.
    #[must_use]
    pub fn view(&self) -> ListView {
        render(&self.records)
    }
}
