//! Command implementations.
//!
//! Every list command first brings the collection to `Ready` (snapshot or
//! API), then applies its action, then prints the re-rendered list.

pub mod clear;
pub mod products;
pub mod users;

use std::io::Write;

use thiserror::Error;
use tracing::{info, warn};

use vitrine_catalog::config::CatalogConfig;
use vitrine_catalog::models::{Entity, EntityKind};
use vitrine_catalog::remote::FetchFailure;
use vitrine_catalog::render::ListView;
use vitrine_catalog::state::AppState;
use vitrine_catalog::store::KeyValueStore;
use vitrine_catalog::sync::{Catalog, InitOrigin, InitReport, RefreshResult};

/// Errors raised by the commands themselves.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Nothing was removed because the position does not exist.
    #[error("No {kind} record at position {position} (list has {len})")]
    NoSuchPosition {
        kind: EntityKind,
        position: usize,
        len: usize,
    },

    /// Nothing was removed because no record has the identifier.
    #[error("No {kind} record with id {id}")]
    NoSuchId { kind: EntityKind, id: i64 },

    /// `remove` was given neither a position nor an identifier.
    #[error("Nothing to remove: give a list position or --id")]
    MissingRemoveTarget,
}

/// How lists are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Html,
}

impl Output {
    pub const fn from_html_flag(html: bool) -> Self {
        if html { Self::Html } else { Self::Text }
    }

    /// Write `view` to stdout.
    pub fn print(self, view: &ListView) -> Result<(), Box<dyn std::error::Error>> {
        let rendered = match self {
            Self::Text => view.to_string(),
            Self::Html => view.to_html()?,
        };
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Which record a `remove` command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveTarget {
    Position(usize),
    Id(i64),
}

/// Load configuration from the environment and open the data directory.
pub fn load_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let config = CatalogConfig::from_env()?;
    info!(data_dir = %config.data_dir.display(), "Configuration loaded");
    Ok(AppState::new(config)?)
}

/// Log where a collection came from at startup.
fn report_init(report: &InitReport) {
    match &report.origin {
        InitOrigin::Cache => {
            info!(kind = %report.kind, count = report.count, "Loaded from local snapshot");
        }
        InitOrigin::Remote {
            cache_miss,
            failure: None,
        } => {
            info!(kind = %report.kind, count = report.count, reason = ?cache_miss, "Loaded from API");
        }
        InitOrigin::Remote {
            failure: Some(failure),
            ..
        } => report_fetch_failure(report.kind, failure),
    }
}

fn report_fetch_failure(kind: EntityKind, failure: &FetchFailure) {
    warn!(%kind, error = %failure, "API unavailable, list is empty");
}

/// Log the outcome of a refresh.
fn report_refresh(kind: EntityKind, result: &RefreshResult) {
    match result {
        RefreshResult::Applied {
            failure: Some(failure),
            ..
        } => report_fetch_failure(kind, failure),
        RefreshResult::Applied {
            count,
            failure: None,
        } => info!(%kind, count, "Refreshed from API"),
        RefreshResult::Stale => info!(%kind, "Refresh superseded"),
    }
}

/// Remove one record, turning a no-op into an error for the command line.
fn remove_record<E: Entity, S: KeyValueStore>(
    catalog: &mut Catalog<E, S>,
    target: RemoveTarget,
) -> Result<E, Box<dyn std::error::Error>> {
    let removed = match target {
        RemoveTarget::Position(position) => catalog.remove_at(position)?.ok_or(
            CommandError::NoSuchPosition {
                kind: E::KIND,
                position,
                len: catalog.len(),
            },
        )?,
        RemoveTarget::Id(id) => catalog
            .remove_by_id(id)?
            .ok_or(CommandError::NoSuchId { kind: E::KIND, id })?,
    };
    info!(kind = %E::KIND, id = removed.id(), "Removed");
    Ok(removed)
}
