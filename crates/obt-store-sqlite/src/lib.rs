//! SQLite backend for the off-bottom-torque migration.
//!
//! Wraps a plain [`rusqlite::Connection`]; the migration is a single-threaded
//! batch job, so no connection pool or async executor is involved.

mod encode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
