//! `vitrine products ...`

use tracing::info;

use vitrine_catalog::forms::ProductForm;
use vitrine_catalog::models::EntityKind;
use vitrine_catalog::state::AppState;

use super::{Output, RemoveTarget, remove_record, report_init, report_refresh};

/// Print the products.
///
/// # Errors
///
/// Returns an error if the list cannot be stored or printed.
pub async fn list(state: &AppState, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let (products, report) = state.products().await?;
    report_init(&report);
    output.print(&products.view())
}

/// Add a product at the end of the list.
///
/// # Errors
///
/// Returns an error if the list cannot be stored.
pub async fn add(
    state: &AppState,
    output: Output,
    mut form: ProductForm,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut products, report) = state.products().await?;
    report_init(&report);
    let product = form.submit(&mut products)?;
    info!(id = %product.id, title = %product.title, "Product added");
    output.print(&products.view())
}

/// Copy the product at `position`, let `edit` change the copy, and add it.
///
/// # Errors
///
/// Returns an error if there is no product at `position` or the list
/// cannot be stored.
pub async fn duplicate(
    state: &AppState,
    output: Output,
    position: usize,
    edit: impl FnOnce(&mut ProductForm),
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut products, report) = state.products().await?;
    report_init(&report);

    let mut form = ProductForm::seeded_from(&products, position)?;
    edit(&mut form);
    let product = form.submit(&mut products)?;
    info!(id = %product.id, source_position = position, "Product duplicated");
    output.print(&products.view())
}

/// Remove a product.
///
/// # Errors
///
/// Returns an error if there is no such product or the list cannot be
/// stored.
pub async fn remove(
    state: &AppState,
    output: Output,
    target: RemoveTarget,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut products, report) = state.products().await?;
    report_init(&report);
    remove_record(&mut products, target)?;
    output.print(&products.view())
}

/// Replace the products with a fresh page from the API.
///
/// # Errors
///
/// Returns an error if the list cannot be stored.
pub async fn refresh(state: &AppState, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let (mut products, report) = state.products().await?;
    report_init(&report);
    let result = products.refresh(state.api()).await?;
    report_refresh(EntityKind::Products, &result);
    output.print(&products.view())
}
