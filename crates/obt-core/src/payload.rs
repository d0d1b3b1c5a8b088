//! The JSON payload stored in the slide-record payload column.
//!
//! Payloads are written as `{"offBtmTq": 7.5, "formation": ""}`: fixed key
//! order, one space after `:` and `,`, non-ASCII escaped as `\uXXXX`, and
//! numbers spelled the way Python's `repr` spells them (`1e-06`, `1e+16`).
//! Readers of the migrated file already consume exactly this text.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;

use crate::{Error, Result};

// ─── Payload ─────────────────────────────────────────────────────────────────

/// The two-field object held by the payload column.
///
/// Missing fields decode to their defaults; unknown fields are dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Payload {
  /// Off-bottom torque, rounded to six decimals when set from a report.
  #[serde(rename = "offBtmTq", default)]
  pub off_btm_tq: f64,
  #[serde(default)]
  pub formation:  String,
}

impl Payload {
  /// Decode a stored payload. Fails when the text is not JSON, not an
  /// object, or has a field of the wrong type.
  pub fn parse(text: &str) -> Result<Self> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
      return Err(Error::PayloadNotObject);
    }
    Ok(serde_json::from_value(value)?)
  }

  /// Encode in the stored text format.
  pub fn encode(&self) -> Result<String> {
    let mut buf = Vec::with_capacity(48);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    self.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
  }

  /// Set the torque from an override, rounded to six decimals.
  pub fn apply_torque(&mut self, value: f64) {
    self.off_btm_tq = round_micros(value);
  }
}

/// Round to six decimal places.
///
/// Rounds the exact decimal value of `value`, ties to even, so
/// `2477.1754355` (stored just below the tie) becomes `2477.175435`.
pub fn round_micros(value: f64) -> f64 {
  if !value.is_finite() {
    return value;
  }
  format!("{value:.6}").parse().unwrap_or(value)
}

/// Shortest round-trip spelling of a finite `value`: fixed notation for
/// decimal exponents in `-4..16`, otherwise `<mantissa>e±NN`.
fn repr_f64(value: f64) -> String {
  let sci = format!("{:e}", value.abs());
  let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
  let exp: i32 = exp.parse().unwrap_or(0);
  let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

  let body = if (-4..16).contains(&exp) {
    if exp < 0 {
      format!("0.{}{digits}", "0".repeat((-exp - 1) as usize))
    } else {
      let point = exp as usize + 1;
      if digits.len() <= point {
        format!("{digits}{}.0", "0".repeat(point - digits.len()))
      } else {
        format!("{}.{}", &digits[..point], &digits[point..])
      }
    }
  } else {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
  };

  if value.is_sign_negative() { format!("-{body}") } else { body }
}

// ─── Formatter ───────────────────────────────────────────────────────────────

/// Compact JSON with `", "` and `": "` separators and ASCII-only strings.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
  fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
  where
    W: ?Sized + Write,
  {
    writer.write_all(repr_f64(value).as_bytes())
  }

  fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
  where
    W: ?Sized + Write,
  {
    if first { Ok(()) } else { writer.write_all(b", ") }
  }

  fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
  where
    W: ?Sized + Write,
  {
    if first { Ok(()) } else { writer.write_all(b", ") }
  }

  fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + Write,
  {
    writer.write_all(b": ")
  }

  fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
  where
    W: ?Sized + Write,
  {
    let mut start = 0;
    for (i, ch) in fragment.char_indices() {
      if ch.is_ascii() {
        continue;
      }
      writer.write_all(&fragment.as_bytes()[start..i])?;
      let mut units = [0u16; 2];
      for unit in ch.encode_utf16(&mut units) {
        write!(writer, "\\u{unit:04x}")?;
      }
      start = i + ch.len_utf8();
    }
    writer.write_all(&fragment.as_bytes()[start..])
  }
}
