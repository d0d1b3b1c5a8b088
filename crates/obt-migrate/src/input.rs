//! Resolving and validating the source file path.
//!
//! The interactive picker lives in the binary; the library only sees the
//! [`InputSource`] capability, so nothing here depends on a terminal.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The result of asking an [`InputSource`] for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Selected(PathBuf),
  Cancelled,
}

/// Something that can produce the path of the database to migrate.
pub trait InputSource {
  fn resolve_input_path(&mut self) -> anyhow::Result<Resolution>;
}

/// A path supplied on the command line.
#[derive(Debug, Clone)]
pub struct GivenPath(pub PathBuf);

impl InputSource for GivenPath {
  fn resolve_input_path(&mut self) -> anyhow::Result<Resolution> {
    Ok(Resolution::Selected(self.0.clone()))
  }
}

// ─── Validation ───────────────────────────────────────────────────────────────

/// Reasons a resolved path is rejected. These are operator mistakes, not
/// failures.
#[derive(Debug, Error)]
pub enum InputError {
  #[error("{} does not exist", .0.display())]
  NotFound(PathBuf),

  #[error("{} is not a regular file", .0.display())]
  NotAFile(PathBuf),

  #[error("{} is not a .{expected} file", path.display())]
  WrongExtension { path: PathBuf, expected: String },
}

/// Case-insensitive extension check; `extension` has no leading dot.
pub fn has_extension(path: &Path, extension: &str) -> bool {
  path
    .extension()
    .and_then(|e| e.to_str())
    .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Accept `path` only if it is an existing regular file with `extension`.
pub fn validate_input(path: &Path, extension: &str) -> Result<(), InputError> {
  if !path.exists() {
    return Err(InputError::NotFound(path.to_path_buf()));
  }
  if !path.is_file() {
    return Err(InputError::NotAFile(path.to_path_buf()));
  }
  if !has_extension(path, extension) {
    return Err(InputError::WrongExtension {
      path:     path.to_path_buf(),
      expected: extension.to_owned(),
    });
  }
  Ok(())
}
