//! Table and column names of the database being migrated.

use serde::Deserialize;

/// Names of the tables and columns the migration reads and writes.
///
/// The key columns (`well`, `day`, `month`, `year`) are shared by both
/// tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableLayout {
  /// Primary table holding slide records.
  pub records:     String,
  pub uid:         String,
  pub sequence_no: String,
  /// Payload column; added to `records` when missing.
  pub payload:     String,

  /// Secondary table holding daily reports.
  pub reports:     String,
  pub tq_off:      String,

  pub well:        String,
  pub day:         String,
  pub month:       String,
  pub year:        String,
}

impl Default for TableLayout {
  fn default() -> Self {
    Self {
      records:     "SLIDE_RECORDS".into(),
      uid:         "UID".into(),
      sequence_no: "SEQUENCE_NO".into(),
      payload:     "JSON_FIELDS".into(),
      reports:     "DAILY_REPORTS".into(),
      tq_off:      "TQ_OFF".into(),
      well:        "ACTUALWELL".into(),
      day:         "DAY".into(),
      month:       "MONTH".into(),
      year:        "YEAR".into(),
    }
  }
}
