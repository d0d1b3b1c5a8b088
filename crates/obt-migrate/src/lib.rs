//! Operator-facing pieces of the off-bottom-torque migration: settings,
//! input-path resolution, the working-copy snapshot and the top-level
//! [`run_migration`] entry point used by the `obt-migrate` binary.

pub mod input;
pub mod run;
pub mod settings;
pub mod snapshot;

pub use input::{GivenPath, InputError, InputSource, Resolution};
pub use run::{Finished, Outcome, execute, is_database_error, run_migration};
pub use settings::Settings;
