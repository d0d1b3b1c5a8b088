//! The working copy every migration runs against.

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::Context as _;

/// `dir/site.mdb` with suffix `_WSv3` becomes `dir/site_WSv3.mdb`.
pub fn snapshot_path(source: &Path, suffix: &str) -> PathBuf {
  let mut name = source.file_stem().unwrap_or_default().to_os_string();
  name.push(suffix);
  if let Some(ext) = source.extension() {
    name.push(".");
    name.push(ext);
  }
  source.with_file_name(name)
}

/// Copy `source` to its snapshot path, replacing any earlier snapshot, and
/// return that path. `source` itself is only read.
pub fn create_snapshot(source: &Path, suffix: &str) -> anyhow::Result<PathBuf> {
  let target = snapshot_path(source, suffix);
  anyhow::ensure!(
    target != source,
    "snapshot of {} would overwrite the source",
    source.display()
  );

  fs::copy(source, &target)
    .with_context(|| format!("failed to copy {} to {}", source.display(), target.display()))?;
  Ok(target)
}
