//! Row types read from and written to the two source tables.

use std::fmt;

use crate::field::Field;

// ─── Lookup key ──────────────────────────────────────────────────────────────

/// The composite business key joining a daily report to slide records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
  pub well:  Field,
  pub day:   Field,
  pub month: Field,
  pub year:  Field,
}

impl LookupKey {
  /// `true` if every component of the key is empty.
  pub fn is_blank(&self) -> bool {
    self.well.is_empty()
      && self.day.is_empty()
      && self.month.is_empty()
      && self.year.is_empty()
  }
}

impl fmt::Display for LookupKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}/{}/{}", self.well, self.day, self.month, self.year)
  }
}

// ─── Slide record ────────────────────────────────────────────────────────────

/// A row of the primary table.
#[derive(Debug, Clone)]
pub struct Record {
  /// Storage locator of the row, used to address writes. Unlike `uid` it
  /// round-trips exactly whatever the cell holds.
  pub row_id:      i64,
  pub uid:         Field,
  pub sequence_no: Field,
  pub key:         LookupKey,
  /// Raw payload text; `None` when the cell is `NULL` or the column does not
  /// exist yet.
  pub payload:     Option<String>,
}

impl Record {
  /// A record qualifies when it carries a sequence label and at least one
  /// identifying key component. Header and placeholder rows fail this test
  /// and are never written.
  pub fn is_qualifying(&self) -> bool {
    self.sequence_no.has_text() && !self.key.is_blank()
  }
}

// ─── Daily report ────────────────────────────────────────────────────────────

/// A row of the secondary table carrying a torque-off value.
#[derive(Debug, Clone)]
pub struct OverrideRow {
  pub key:    LookupKey,
  pub tq_off: Field,
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// A serialized payload destined for the row at `row_id`. `uid` is carried
/// for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadWrite {
  pub row_id:  i64,
  pub uid:     Field,
  pub payload: String,
}

impl PayloadWrite {
  pub fn for_record(record: &Record, payload: String) -> Self {
    Self { row_id: record.row_id, uid: record.uid.clone(), payload }
  }
}
