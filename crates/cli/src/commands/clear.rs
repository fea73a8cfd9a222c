//! `vitrine clear ...`
//!
//! Clearing does not contact the API; the next list command does.

use tracing::info;

use vitrine_catalog::state::AppState;

/// Delete the users snapshot.
///
/// # Errors
///
/// Returns an error if the snapshot file cannot be removed.
pub fn users(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let snapshots = state.user_snapshots();
    snapshots.clear()?;
    info!(key = snapshots.key(), "Snapshot cleared");
    Ok(())
}

/// Delete the products snapshot.
///
/// # Errors
///
/// Returns an error if the snapshot file cannot be removed.
pub fn products(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let snapshots = state.product_snapshots();
    snapshots.clear()?;
    info!(key = snapshots.key(), "Snapshot cleared");
    Ok(())
}
