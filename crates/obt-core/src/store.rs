//! The `MigrationStore` trait.
//!
//! Implemented by storage backends (e.g. `obt-store-sqlite`). The driver in
//! [`crate::migrate`] depends on this abstraction only.

use crate::record::{OverrideRow, PayloadWrite, Record};

/// Access to the two tables of the database being migrated.
///
/// Each mutating call is one transaction: it either commits in full or leaves
/// the database as it was.
pub trait MigrationStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether the primary table already has the payload column.
  fn payload_column_exists(&self) -> Result<bool, Self::Error>;

  /// Add the payload column as `TEXT`, then write `seed`. Returns the number
  /// of rows written.
  fn add_payload_column(&mut self, seed: &[PayloadWrite]) -> Result<usize, Self::Error>;

  /// Report rows whose torque-off value is present and not blank.
  fn load_overrides(&self) -> Result<Vec<OverrideRow>, Self::Error>;

  /// All primary rows. `payload` is `None` for every row while the payload
  /// column does not exist.
  fn load_records(&self) -> Result<Vec<Record>, Self::Error>;

  /// Overwrite the payload of each record in `writes`. Returns the number of
  /// rows actually changed, which is less than `writes.len()` when a row has
  /// gone away.
  fn write_payloads(&mut self, writes: &[PayloadWrite]) -> Result<usize, Self::Error>;
}
