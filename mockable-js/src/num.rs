use core::hash::Hash;
use core::hash::Hasher;
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

// This provides Eq for f64.
#[derive(Copy, Clone, Debug)]
pub struct JsNumber(pub f64);

impl JsNumber {
  /// Parses the source text of a numeric literal token, including radix prefixes, legacy octal
  /// and numeric separators. Returns None if the text is malformed.
  pub fn from_literal(raw: &str) -> Option<JsNumber> {
    let clean: String = raw.chars().filter(|c| *c != '_').collect();
    let radix = |digits: &str, radix: u32| -> Option<JsNumber> {
      if digits.is_empty() {
        return None;
      }
      let mut value = 0f64;
      for c in digits.chars() {
        value = value * radix as f64 + c.to_digit(radix)? as f64;
      }
      Some(JsNumber(value))
    };
    let lower = clean.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
      return radix(hex, 16);
    };
    if let Some(oct) = lower.strip_prefix("0o") {
      return radix(oct, 8);
    };
    if let Some(bin) = lower.strip_prefix("0b") {
      return radix(bin, 2);
    };
    if lower.len() > 1 && lower.starts_with('0') && lower.bytes().all(|b| b.is_ascii_digit()) {
      // Legacy octal, unless a digit rules it out.
      if lower.bytes().all(|b| b < b'8') {
        return radix(&lower[1..], 8);
      };
    };
    lower.parse::<f64>().ok().map(JsNumber)
  }
}

impl Display for JsNumber {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let v = self.0;
    if v.is_nan() {
      write!(f, "NaN")
    } else if v.is_infinite() {
      write!(f, "{}", if v > 0.0 { "Infinity" } else { "-Infinity" })
    } else if v.fract() == 0.0 && v.abs() < 1e21 {
      write!(f, "{}", v as i128)
    } else {
      write!(f, "{}", v)
    }
  }
}

impl PartialEq for JsNumber {
  fn eq(&self, other: &Self) -> bool {
    if self.0.is_nan() {
      return other.0.is_nan();
    };
    self.0.eq(&other.0)
  }
}

impl Eq for JsNumber {}

impl Hash for JsNumber {
  fn hash<H: Hasher>(&self, state: &mut H) {
    if !self.0.is_nan() {
      self.0.to_bits().hash(state);
    };
  }
}

impl Serialize for JsNumber {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::JsNumber;

  #[test]
  fn parses_literal_forms() {
    assert_eq!(JsNumber::from_literal("42"), Some(JsNumber(42.0)));
    assert_eq!(JsNumber::from_literal("1_000"), Some(JsNumber(1000.0)));
    assert_eq!(JsNumber::from_literal("0xff"), Some(JsNumber(255.0)));
    assert_eq!(JsNumber::from_literal("0b101"), Some(JsNumber(5.0)));
    assert_eq!(JsNumber::from_literal("0o17"), Some(JsNumber(15.0)));
    assert_eq!(JsNumber::from_literal("017"), Some(JsNumber(15.0)));
    assert_eq!(JsNumber::from_literal("019"), Some(JsNumber(19.0)));
    assert_eq!(JsNumber::from_literal(".5"), Some(JsNumber(0.5)));
    assert_eq!(JsNumber::from_literal("1e3"), Some(JsNumber(1000.0)));
    assert_eq!(JsNumber::from_literal("0x"), None);
  }

  #[test]
  fn displays_integers_without_fraction() {
    assert_eq!(JsNumber(3.0).to_string(), "3");
    assert_eq!(JsNumber(0.25).to_string(), "0.25");
  }
}
