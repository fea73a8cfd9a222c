//! `vitrine users ...`

use tracing::info;

use vitrine_catalog::forms::{SubmitError, UserForm};
use vitrine_catalog::models::EntityKind;
use vitrine_catalog::state::AppState;

use super::{Output, RemoveTarget, remove_record, report_init, report_refresh};

/// Print the users.
///
/// # Errors
///
/// Returns an error if the list cannot be stored or printed.
pub async fn list(state: &AppState, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let (users, report) = state.users().await?;
    report_init(&report);
    output.print(&users.view())
}

/// Validate and add a user at the top of the list.
///
/// Rejected fields are printed to stderr, one per line.
///
/// # Errors
///
/// Returns an error if validation fails or the list cannot be stored.
pub async fn add(
    state: &AppState,
    output: Output,
    mut form: UserForm,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut users, report) = state.users().await?;
    report_init(&report);

    match form.submit(&mut users) {
        Ok(user) => info!(id = %user.id, name = %user.full_name(), "User added"),
        Err(SubmitError::Invalid(annotations)) => {
            print_annotations(&form);
            return Err(SubmitError::Invalid(annotations).into());
        }
        Err(e) => return Err(e.into()),
    }

    output.print(&users.view())
}

/// Remove a user.
///
/// # Errors
///
/// Returns an error if there is no such user or the list cannot be stored.
pub async fn remove(
    state: &AppState,
    output: Output,
    target: RemoveTarget,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut users, report) = state.users().await?;
    report_init(&report);
    remove_record(&mut users, target)?;
    output.print(&users.view())
}

/// Replace the users with a fresh copy from the API.
///
/// # Errors
///
/// Returns an error if the list cannot be stored.
pub async fn refresh(state: &AppState, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let (mut users, report) = state.users().await?;
    report_init(&report);
    let result = users.refresh(state.api()).await?;
    report_refresh(EntityKind::Users, &result);
    output.print(&users.view())
}

#[allow(clippy::print_stderr)]
fn print_annotations(form: &UserForm) {
    for (field, message) in form.annotations() {
        eprintln!("{}: {message}", field.name());
    }
}
