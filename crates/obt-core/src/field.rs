//! [`Field`] — a dynamically-typed cell value.
//!
//! The source tables carry no reliable column types: a `DAY` may be stored as
//! `6`, `6.0` or `"6"` depending on which tool last wrote the row. Keys are
//! compared on the stored value, with integral reals folded into integers so
//! `6` and `6.0` join while `"6"` stays distinct.

use std::{
  fmt,
  hash::{Hash, Hasher},
};

#[derive(Debug, Clone)]
pub enum Field {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Blob(Vec<u8>),
}

impl Field {
  /// Build a field from a real, folding integral values into
  /// [`Field::Integer`].
  pub fn from_real(value: f64) -> Self {
    if value.is_finite()
      && value.fract() == 0.0
      && value >= i64::MIN as f64
      && value < i64::MAX as f64
    {
      Field::Integer(value as i64)
    } else {
      Field::Real(value)
    }
  }

  /// `true` for `NULL`, the empty string, numeric zero and an empty blob.
  pub fn is_empty(&self) -> bool {
    match self {
      Field::Null => true,
      Field::Integer(n) => *n == 0,
      Field::Real(v) => *v == 0.0,
      Field::Text(s) => s.is_empty(),
      Field::Blob(b) => b.is_empty(),
    }
  }

  /// `true` if the field is non-empty and its text rendering is not blank.
  pub fn has_text(&self) -> bool {
    !self.is_empty() && !self.to_string().trim().is_empty()
  }

  /// The field as text, if it can be read as text at all.
  ///
  /// Numbers render as they display; blobs are accepted only when they hold
  /// valid UTF-8.
  pub fn as_text(&self) -> Option<String> {
    match self {
      Field::Null => None,
      Field::Blob(b) => std::str::from_utf8(b).ok().map(str::to_owned),
      Field::Text(s) => Some(s.clone()),
      other => Some(other.to_string()),
    }
  }
}

impl PartialEq for Field {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Field::Null, Field::Null) => true,
      (Field::Integer(a), Field::Integer(b)) => a == b,
      (Field::Real(a), Field::Real(b)) => a.to_bits() == b.to_bits(),
      (Field::Text(a), Field::Text(b)) => a == b,
      (Field::Blob(a), Field::Blob(b)) => a == b,
      _ => false,
    }
  }
}

impl Eq for Field {}

impl Hash for Field {
  fn hash<H: Hasher>(&self, state: &mut H) {
    std::mem::discriminant(self).hash(state);
    match self {
      Field::Null => {}
      Field::Integer(n) => n.hash(state),
      Field::Real(v) => v.to_bits().hash(state),
      Field::Text(s) => s.hash(state),
      Field::Blob(b) => b.hash(state),
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Field::Null => f.write_str("NULL"),
      Field::Integer(n) => write!(f, "{n}"),
      Field::Real(v) => write!(f, "{v}"),
      Field::Text(s) => f.write_str(s),
      Field::Blob(b) => write!(f, "<{} bytes>", b.len()),
    }
  }
}

impl From<&str> for Field {
  fn from(s: &str) -> Self { Field::Text(s.to_owned()) }
}

impl From<i64> for Field {
  fn from(n: i64) -> Self { Field::Integer(n) }
}
