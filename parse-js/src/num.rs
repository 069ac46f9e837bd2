use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;

/// A numeric literal's value. Equality treats every NaN as equal, so literals can be compared and
/// hashed.
#[derive(Copy, Clone, Debug)]
pub struct JsNumber(pub f64);

impl JsNumber {
  /// The value of a decimal literal's digits, with separators already removed.
  pub fn from_decimal(digits: &str) -> Option<JsNumber> {
    digits.parse::<f64>().ok().map(JsNumber)
  }

  /// The value of the digits after a `0x`, `0o` or `0b` prefix. Large values round like any other
  /// double.
  pub fn from_radix(digits: &str, radix: u32) -> Option<JsNumber> {
    if digits.is_empty() {
      return None;
    };
    digits
      .chars()
      .try_fold(0f64, |acc, c| Some(acc * f64::from(radix) + f64::from(c.to_digit(radix)?)))
      .map(JsNumber)
  }
}

impl Display for JsNumber {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl PartialEq for JsNumber {
  fn eq(&self, other: &Self) -> bool {
    (self.0.is_nan() && other.0.is_nan()) || self.0 == other.0
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
  fn radix_digits() {
    assert_eq!(JsNumber::from_radix("1F", 16), Some(JsNumber(31.0)));
    assert_eq!(JsNumber::from_radix("101", 2), Some(JsNumber(5.0)));
    assert_eq!(JsNumber::from_radix("17", 8), Some(JsNumber(15.0)));
    assert_eq!(JsNumber::from_radix("18", 8), None);
    assert_eq!(JsNumber::from_radix("", 16), None);
    assert_eq!(JsNumber::from_radix("ffffffff", 16), Some(JsNumber(4294967295.0)));
  }

  #[test]
  fn decimal_digits() {
    assert_eq!(JsNumber::from_decimal("1000.5"), Some(JsNumber(1000.5)));
    assert_eq!(JsNumber::from_decimal(".5e1"), Some(JsNumber(5.0)));
    assert_eq!(JsNumber::from_decimal("5."), Some(JsNumber(5.0)));
  }
}
