//! Loomworks Core - Shared types library.
//!
//! This crate provides common types used across all Loomworks components:
//! - `admin` - Internal administration panel for the store
//! - `integration-tests` - Black-box tests against a running panel
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Records are
//! defined and owned by the upstream store API; the structs here mirror its
//! wire shapes (camelCase JSON, `_id` identifiers) and are passed through
//! unmodified.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and status enums
//! - [`models`] - Upstream record shapes (products, orders, customers,
//!   reviews, dashboard statistics, login)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
