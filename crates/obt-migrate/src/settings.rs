//! Runtime settings, read from an optional TOML file and `OBT_*` environment
//! variables.

use std::path::Path;

use anyhow::Context as _;
use obt_core::layout::TableLayout;
use serde::Deserialize;

/// Everything the migration can be configured with.
///
/// ```toml
/// extension = "mdb"
/// suffix    = "_WSv3"
///
/// [layout]
/// records = "SLIDE_RECORDS"
/// payload = "JSON_FIELDS"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Extension of accepted source files, without the leading dot. The file
  /// itself must still be a SQLite database.
  pub extension: String,
  /// Inserted between the file stem and the extension of the working copy.
  pub suffix:    String,
  pub layout:    TableLayout,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      extension: "mdb".into(),
      suffix:    "_WSv3".into(),
      layout:    TableLayout::default(),
    }
  }
}

impl Settings {
  /// Load settings from `path` (if it exists), overridden by environment
  /// variables such as `OBT_SUFFIX` or `OBT_LAYOUT__PAYLOAD`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(
        config::Environment::with_prefix("OBT")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .with_context(|| format!("failed to read settings from {}", path.display()))?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.extension = settings.extension.trim_start_matches('.').to_owned();

    anyhow::ensure!(!settings.extension.is_empty(), "settings: extension must not be empty");
    anyhow::ensure!(!settings.suffix.is_empty(), "settings: suffix must not be empty");
    Ok(settings)
  }
}
