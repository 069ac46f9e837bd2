use std::fmt::Write;

/// `value` as a double-quoted string literal. Only what would end the literal or change its meaning
/// is escaped; other non-ASCII characters are kept as they are, except U+2028 and U+2029.
pub fn escape_string(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  let mut chars = value.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      // `\0` followed by a digit reads as a legacy octal escape.
      '\0' if chars.peek().is_some_and(char::is_ascii_digit) => out.push_str("\\x00"),
      '\0' => out.push_str("\\0"),
      '\u{2028}' | '\u{2029}' => {
        let _ = write!(out, "\\u{:04x}", c as u32);
      }
      c if c.is_ascii_control() => {
        let _ = write!(out, "\\x{:02X}", c as u32);
      }
      c => out.push(c),
    };
  }
  out.push('"');
  out
}

#[cfg(test)]
mod tests {
  use super::escape_string;

  #[test]
  fn quotes_and_backslashes() {
    assert_eq!(escape_string("a\"b\\c"), r#""a\"b\\c""#);
    assert_eq!(escape_string("it's"), r#""it's""#);
  }

  #[test]
  fn control_characters() {
    assert_eq!(escape_string("a\nb\tc"), r#""a\nb\tc""#);
    assert_eq!(escape_string("a\u{0007}b\u{7f}"), r#""a\x07b\x7F""#);
    assert_eq!(escape_string("\u{0000}9"), r#""\x009""#);
    assert_eq!(escape_string("\u{0000}a"), r#""\0a""#);
  }

  #[test]
  fn unicode_is_kept_except_line_separators() {
    assert_eq!(escape_string("é☃\u{2028}"), "\"é☃\\u2028\"");
  }
}
