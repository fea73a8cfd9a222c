//! Synchronization between the remote source, the local snapshot, and the
//! in-memory collection.
//!
//! - [`Reconciler`] decides once, at startup, where the collection comes from
//! - [`Catalog`] owns the collection afterwards and persists every mutation

mod catalog;
mod reconciler;

pub use catalog::{Catalog, RefreshResult, RefreshTicket};
pub use reconciler::{CacheMiss, InitOrigin, InitReport, Reconciler, SyncState};
