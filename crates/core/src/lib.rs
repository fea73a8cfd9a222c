//! Vitrine Core - Shared types library.
//!
//! This crate provides the record-level building blocks used across Vitrine:
//! - `catalog` - Local-first synchronization of users and products
//! - `cli` - Command-line front end over the catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure predicates - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, emails, and prices
//! - [`validation`] - Per-field predicates backing the user form

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
