//! `obt-migrate` — backfill off-bottom torque payloads into a copy of a
//! slide-record database.
//!
//! # Usage
//!
//! ```
//! obt-migrate path/to/site.mdb      # writes path/to/site_WSv3.mdb
//! obt-migrate                       # pick the file interactively
//! ```
//!
//! The source must be a SQLite database; the `.mdb` extension is kept only so
//! existing file names keep working. Jet/ACE (Access) files are rejected as
//! "not a database".
//!
//! Exits `0` on success, when no file is chosen, or when the chosen path is
//! not an acceptable source file; `1` when the migration itself fails.

mod picker;

use std::{
  io::{self, BufRead, IsTerminal, Write},
  path::PathBuf,
  process::ExitCode,
};

use anyhow::Context as _;
use clap::Parser;
use obt_migrate::{
  Finished, GivenPath, InputSource, Outcome, Settings, execute, is_database_error,
};
use picker::FilePicker;
use tracing::{error, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "obt-migrate",
  version,
  about = "Backfill off-bottom torque payloads into a copy of a slide-record database",
  long_about = "Backfill off-bottom torque payloads into a copy of a slide-record database.\n\n\
                The source must be a SQLite database file, whatever its extension \
                (`.mdb` by default). Access (Jet/ACE) files must be converted to SQLite first."
)]
struct Cli {
  /// Source SQLite database file. Omit to choose one interactively.
  file: Option<PathBuf>,

  /// Path to a TOML settings file.
  #[arg(short, long, value_name = "FILE", default_value = "obt-migrate.toml")]
  config: PathBuf,

  /// Exit without waiting for Enter.
  #[arg(long)]
  no_pause: bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let pause = !cli.no_pause && io::stdin().is_terminal();

  let code = match Settings::load(&cli.config) {
    Ok(settings) => {
      let result = input_source(&cli, &settings)
        .and_then(|mut input| execute(input.as_mut(), &settings));
      finish(result, &settings.extension)
    }
    Err(e) => finish(Err(e), ""),
  };

  if pause {
    wait_for_enter();
  }
  code
}

/// The path given on the command line, or the interactive picker.
fn input_source(cli: &Cli, settings: &Settings) -> anyhow::Result<Box<dyn InputSource>> {
  let source: Box<dyn InputSource> = match &cli.file {
    Some(path) => Box::new(GivenPath(path.clone())),
    None => {
      let cwd = std::env::current_dir().context("reading current directory")?;
      Box::new(FilePicker::new(cwd, settings.extension.as_str()))
    }
  };
  Ok(source)
}

/// Print the outcome and pick the exit code. Only failures of the migration
/// itself are non-zero.
fn finish(result: anyhow::Result<Finished>, extension: &str) -> ExitCode {
  match result {
    Ok(Finished::Migrated(outcome)) => {
      print_summary(&outcome);
      println!("\n✅ Operation completed successfully!");
      ExitCode::SUCCESS
    }
    Ok(Finished::Cancelled) => {
      println!("No file selected.");
      ExitCode::SUCCESS
    }
    Ok(Finished::Rejected(e)) => {
      println!("Error: {e}. Please select a valid .{extension} file.");
      ExitCode::SUCCESS
    }
    Err(e) if is_database_error(&e) => {
      error!("{e:#}");
      println!("Database error: {e:#}");
      ExitCode::FAILURE
    }
    Err(e) => {
      error!("{e:#}");
      println!("An error occurred: {e:#}");
      ExitCode::FAILURE
    }
  }
}

fn print_summary(outcome: &Outcome) {
  let r = &outcome.report;
  println!();
  println!("Output:            {}", outcome.output.display());
  if r.column_added {
    println!("Payload column:    added, {} rows initialized", r.seeded);
  } else {
    println!("Payload column:    already present");
  }
  println!(
    "Torque-off values: {} loaded, {} invalid, {} zero, {} duplicate keys",
    r.overrides_loaded, r.overrides_invalid, r.overrides_zero, r.duplicate_keys
  );
  println!(
    "Slide records:     {} updated ({} from reports, {} reset), {} skipped",
    r.updated, r.overridden, r.payloads_reset, r.skipped
  );
}

/// Keep the console window open until the operator has read the outcome.
fn wait_for_enter() {
  print!("Press Enter to exit...");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line).ok();
}
