//! Snapshot the source, migrate the snapshot, always close the connection.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use obt_core::{MigrationReport, migrate};
use obt_store_sqlite::SqliteStore;
use tracing::{info, warn};

use crate::{
  input::{InputError, InputSource, Resolution, validate_input},
  settings::Settings,
  snapshot::create_snapshot,
};

/// A finished migration.
#[derive(Debug, Clone)]
pub struct Outcome {
  /// The migrated working copy.
  pub output: PathBuf,
  pub report: MigrationReport,
}

/// How a run ended, short of an error.
#[derive(Debug)]
pub enum Finished {
  Migrated(Outcome),
  /// The operator chose no file.
  Cancelled,
  /// The chosen path is not an acceptable source file.
  Rejected(InputError),
}

/// Resolve the source path through `input`, validate it, then migrate.
///
/// Cancellation and rejected paths are ordinary outcomes; nothing is written
/// in either case.
pub fn execute(input: &mut dyn InputSource, settings: &Settings) -> anyhow::Result<Finished> {
  let path = match input.resolve_input_path()? {
    Resolution::Selected(path) => path,
    Resolution::Cancelled => return Ok(Finished::Cancelled),
  };

  if let Err(e) = validate_input(&path, &settings.extension) {
    return Ok(Finished::Rejected(e));
  }

  Ok(Finished::Migrated(run_migration(&path, settings)?))
}

/// Copy `source` next to itself and migrate the copy.
///
/// The source file is never opened for writing. The database connection is
/// closed before this returns, whether or not the migration succeeded.
pub fn run_migration(source: &Path, settings: &Settings) -> anyhow::Result<Outcome> {
  let output = create_snapshot(source, &settings.suffix)?;
  info!("Created working copy {}", output.display());

  let mut store = SqliteStore::open(&output, settings.layout.clone())
    .with_context(|| format!("failed to open {} as a SQLite database", output.display()))?;
  info!("Connected to: {}", output.display());

  let result = migrate(&mut store);

  match store.close() {
    Ok(()) => info!("Database connection closed."),
    Err(e) => warn!("Closing {} failed: {e}", output.display()),
  }

  let report = result.with_context(|| format!("migration of {} failed", output.display()))?;
  Ok(Outcome { output, report })
}

/// Whether `err` originated in the database layer rather than in the
/// filesystem or settings.
pub fn is_database_error(err: &anyhow::Error) -> bool {
  err.chain().any(|cause| cause.is::<obt_store_sqlite::Error>())
}
