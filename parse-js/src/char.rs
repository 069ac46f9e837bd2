pub const ZWNJ: char = '\u{200C}';
pub const ZWJ: char = '\u{200D}';

#[inline]
pub fn is_line_terminator(c: char) -> bool {
  matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[inline]
pub fn is_whitespace(c: char) -> bool {
  matches!(
    c,
    '\t'
      | '\u{000B}'
      | '\u{000C}'
      | ' '
      | '\u{00A0}'
      | '\u{1680}'
      | '\u{2000}'..='\u{200A}'
      | '\u{202F}'
      | '\u{205F}'
      | '\u{3000}'
      | '\u{FEFF}'
  )
}

// Unicode letters stand in for ID_Start, and letters and digits for ID_Continue.
#[inline]
pub fn is_id_start(c: char) -> bool {
  c == '$' || c == '_' || c.is_ascii_alphabetic() || (!c.is_ascii() && c.is_alphabetic())
}

#[inline]
pub fn is_id_continue(c: char) -> bool {
  is_id_start(c) || c.is_ascii_digit() || c == ZWNJ || c == ZWJ || (!c.is_ascii() && c.is_alphanumeric())
}

/// Whether `name` would lex as a single identifier name, ignoring reserved words.
pub fn is_identifier_name(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if is_id_start(first) => chars.all(is_id_continue),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::is_identifier_name;

  #[test]
  fn identifier_names() {
    assert!(is_identifier_name("_map2"));
    assert!(is_identifier_name("$"));
    assert!(is_identifier_name("café"));
    assert!(!is_identifier_name("2fast"));
    assert!(!is_identifier_name("is-nil"));
    assert!(!is_identifier_name(""));
  }
}
