//! Vitrine Catalog library.
//!
//! Local-first management of two entity kinds, users and products. Each kind
//! is backed by a remote HTTP API, a persistent key-value snapshot, and a
//! single in-memory collection owned by a [`sync::Catalog`] controller.
//!
//! # Control flow
//!
//! ```text
//! startup / user action
//!   -> Reconciler or Mutator changes the in-memory collection
//!   -> SnapshotStore persists the whole collection
//!   -> Renderer projects it into list items
//! ```
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`models`] - `User` and `Product` records and their ingestion rules
//! - [`remote`] - Remote loader (`reqwest`) and normalization
//! - [`store`] - Key-value stores and whole-collection snapshots
//! - [`sync`] - Startup reconciliation and mutations
//! - [`forms`] - User form validation and product templates
//! - [`render`] - View-model projection, text and HTML output

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod remote;
pub mod render;
pub mod state;
pub mod store;
pub mod sync;

pub use error::{CatalogError, Result};
