//! The torque-off lookup built from daily reports.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
  Error, Result,
  field::Field,
  record::{LookupKey, OverrideRow},
};

/// Parse a torque-off cell.
///
/// Returns `Ok(None)` for blank text and for zero, both of which mean "no
/// override". Non-numeric and non-finite values are errors.
pub fn parse_torque(field: &Field) -> Result<Option<f64>> {
  let value = match field {
    Field::Null => return Ok(None),
    Field::Integer(n) => *n as f64,
    Field::Real(v) => *v,
    other => {
      let text = other
        .as_text()
        .ok_or_else(|| Error::InvalidTorque(other.to_string()))?;
      let trimmed = text.trim();
      if trimmed.is_empty() {
        return Ok(None);
      }
      trimmed
        .parse::<f64>()
        .map_err(|_| Error::InvalidTorque(text.clone()))?
    }
  };

  if !value.is_finite() {
    return Err(Error::NonFiniteTorque(field.to_string()));
  }
  Ok((value != 0.0).then_some(value))
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// What happened to the report rows while building a [`TqLookup`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
  /// Rows scanned.
  pub scanned:    usize,
  /// Rows skipped because the value did not parse.
  pub invalid:    usize,
  /// Rows skipped because the value was zero.
  pub zero:       usize,
  /// Rows that replaced an earlier entry with the same key.
  pub duplicates: usize,
}

// ─── Lookup ──────────────────────────────────────────────────────────────────

/// Non-zero torque-off values keyed by well and date.
#[derive(Debug, Clone, Default)]
pub struct TqLookup {
  entries: HashMap<LookupKey, f64>,
}

impl TqLookup {
  /// Build the lookup from report rows in scan order. A later row with the
  /// same key replaces an earlier one.
  pub fn build(rows: impl IntoIterator<Item = OverrideRow>) -> (Self, LookupStats) {
    let mut lookup = Self::default();
    let mut stats = LookupStats::default();

    for row in rows {
      stats.scanned += 1;
      match parse_torque(&row.tq_off) {
        Ok(Some(value)) => {
          if let Some(previous) = lookup.entries.insert(row.key.clone(), value) {
            stats.duplicates += 1;
            debug!(key = %row.key, previous, value, "duplicate report key, keeping later value");
          }
        }
        Ok(None) => stats.zero += 1,
        Err(e) => {
          stats.invalid += 1;
          warn!("Skipping invalid torque-off value for {}: {e}", row.key);
        }
      }
    }

    (lookup, stats)
  }

  pub fn get(&self, key: &LookupKey) -> Option<f64> { self.entries.get(key).copied() }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(well: &str) -> LookupKey {
    LookupKey {
      well:  well.into(),
      day:   Field::Integer(1),
      month: Field::Integer(6),
      year:  Field::Integer(2024),
    }
  }

  fn row(well: &str, tq_off: Field) -> OverrideRow { OverrideRow { key: key(well), tq_off } }

  #[test]
  fn parses_trimmed_text_and_numbers() {
    assert_eq!(parse_torque(&" 7.5 ".into()).unwrap(), Some(7.5));
    assert_eq!(parse_torque(&"-2e1".into()).unwrap(), Some(-20.0));
    assert_eq!(parse_torque(&Field::Integer(3)).unwrap(), Some(3.0));
    assert_eq!(parse_torque(&Field::Real(0.25)).unwrap(), Some(0.25));
  }

  #[test]
  fn zero_and_blank_mean_no_override() {
    assert_eq!(parse_torque(&"0".into()).unwrap(), None);
    assert_eq!(parse_torque(&"0.000".into()).unwrap(), None);
    assert_eq!(parse_torque(&"".into()).unwrap(), None);
    assert_eq!(parse_torque(&"   ".into()).unwrap(), None);
    assert_eq!(parse_torque(&Field::Integer(0)).unwrap(), None);
    assert_eq!(parse_torque(&Field::Null).unwrap(), None);
  }

  #[test]
  fn garbage_and_non_finite_are_errors() {
    assert!(matches!(parse_torque(&"n/a".into()), Err(Error::InvalidTorque(_))));
    assert!(matches!(parse_torque(&"inf".into()), Err(Error::NonFiniteTorque(_))));
    assert!(matches!(parse_torque(&"NaN".into()), Err(Error::NonFiniteTorque(_))));
    assert!(parse_torque(&Field::Blob(vec![0xff, 0xfe])).is_err());
  }

  #[test]
  fn build_skips_invalid_and_zero_rows() {
    let (lookup, stats) = TqLookup::build([
      row("A1", "7.5".into()),
      row("A2", "0".into()),
      row("A3", "".into()),
      row("A4", "oops".into()),
    ]);

    assert_eq!(lookup.len(), 1);
    assert_eq!(lookup.get(&key("A1")), Some(7.5));
    assert_eq!(lookup.get(&key("A2")), None);
    assert_eq!(lookup.get(&key("A3")), None);
    assert_eq!(lookup.get(&key("A4")), None);
    assert_eq!(stats, LookupStats { scanned: 4, invalid: 1, zero: 2, duplicates: 0 });
  }

  #[test]
  fn later_row_wins_on_duplicate_key() {
    let (lookup, stats) = TqLookup::build([
      row("A1", "1.0".into()),
      row("A1", "2.0".into()),
    ]);
    assert_eq!(lookup.get(&key("A1")), Some(2.0));
    assert_eq!(stats.duplicates, 1);
  }

  #[test]
  fn zero_row_does_not_erase_earlier_value() {
    let (lookup, _) = TqLookup::build([
      row("A1", "4.25".into()),
      row("A1", "0".into()),
    ]);
    assert_eq!(lookup.get(&key("A1")), Some(4.25));
  }
}
