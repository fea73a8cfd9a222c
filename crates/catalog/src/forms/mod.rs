//! Record entry forms.
//!
//! Forms hold raw input strings exactly as typed. Only the user form is
//! validated; the product form accepts anything and coerces it.

mod product;
mod user;

pub use product::ProductForm;
pub use user::{UserField, UserForm};

use std::collections::BTreeMap;

use thiserror::Error;

use crate::error::CatalogError;

/// Why a form submission did not produce a record.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// One or more fields failed validation. The form is left as typed.
    #[error("Invalid input: {}", join_messages(.0))]
    Invalid(BTreeMap<UserField, &'static str>),

    /// The record was valid but could not be stored.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

fn join_messages(annotations: &BTreeMap<UserField, &'static str>) -> String {
    annotations
        .values()
        .copied()
        .collect::<Vec<_>>()
        .join("; ")
}
