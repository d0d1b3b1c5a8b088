//! Core types and the migration driver for the off-bottom-torque backfill.
//!
//! This crate is free of database and UI dependencies. Storage backends
//! implement [`store::MigrationStore`]; [`migrate::migrate`] runs the whole
//! ensure-column / build-lookup / apply pipeline against any of them.

pub mod error;
pub mod field;
pub mod layout;
pub mod lookup;
pub mod migrate;
pub mod payload;
pub mod record;
pub mod store;

pub use error::{Error, Result};
pub use migrate::{MigrationReport, migrate};
