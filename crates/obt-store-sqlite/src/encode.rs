//! Conversions from SQLite values to [`Field`], and identifier quoting.

use obt_core::field::Field;
use rusqlite::types::ValueRef;

// ─── Field ────────────────────────────────────────────────────────────────────

pub fn decode_field(value: ValueRef<'_>) -> Field {
  match value {
    ValueRef::Null => Field::Null,
    ValueRef::Integer(n) => Field::Integer(n),
    ValueRef::Real(v) => Field::from_real(v),
    ValueRef::Text(t) => Field::Text(String::from_utf8_lossy(t).into_owned()),
    ValueRef::Blob(b) => Field::Blob(b.to_vec()),
  }
}

// ─── Payload text ─────────────────────────────────────────────────────────────

/// Read a payload cell as text. Non-text cells render through [`Field`] so
/// that they fail payload parsing instead of the query.
pub fn decode_payload(value: ValueRef<'_>) -> Option<String> {
  match decode_field(value) {
    Field::Null => None,
    Field::Text(s) => Some(s),
    other => Some(other.as_text().unwrap_or_else(|| other.to_string())),
  }
}

// ─── Identifiers ──────────────────────────────────────────────────────────────

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String { format!("\"{}\"", name.replace('"', "\"\"")) }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quotes_identifiers() {
    assert_eq!(quote_ident("SLIDE_RECORDS"), "\"SLIDE_RECORDS\"");
    assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
  }

  #[test]
  fn integral_reals_decode_as_integers() {
    assert_eq!(decode_field(ValueRef::Real(6.0)), Field::Integer(6));
    assert_eq!(decode_field(ValueRef::Real(6.5)), Field::Real(6.5));
  }
}
