//! Tokenizer. Most tokens are context free; the parser asks for a regular expression or a
//! template continuation explicitly where the grammar allows one.

use crate::char::is_id_continue;
use crate::char::is_id_start;
use crate::char::is_line_terminator;
use crate::char::is_whitespace;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::num::JsNumber;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::AhoCorasickKind;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use ahash::HashSet;
use memchr::memchr3;
use memchr::memmem;
use once_cell::sync::Lazy;


#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
  Eof,
  /// Identifiers and keywords alike. `escaped` words never act as keywords.
  Word {
    name: String,
    escaped: bool,
  },
  /// `#name`, without the `#`.
  PrivateName(String),
  Punct(&'static str),
  Number(JsNumber),
  /// Digits without separators or the `n` suffix; a radix prefix is kept.
  BigInt(String),
  Str {
    value: String,
    raw: Option<String>,
  },
  /// One piece of a template: from the backtick or `}` up to `${` or the closing backtick.
  Template {
    raw: String,
    tail: bool,
    valid_escapes: bool,
  },
  Regex {
    pattern: String,
    flags: String,
  },
}

#[derive(Clone, Debug)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: Loc,
  /// A line terminator separates this token from the previous one.
  pub nl_before: bool,
}

impl Token {
  pub fn describe(&self) -> String {
    match &self.kind {
      TokenKind::Eof => "end of input".into(),
      TokenKind::Word { name, .. } => format!("`{name}`"),
      TokenKind::PrivateName(name) => format!("`#{name}`"),
      TokenKind::Punct(p) => format!("`{p}`"),
      TokenKind::Number(_) => "number".into(),
      TokenKind::BigInt(_) => "bigint".into(),
      TokenKind::Str { .. } => "string".into(),
      TokenKind::Template { .. } => "template".into(),
      TokenKind::Regex { .. } => "regular expression".into(),
    }
  }
}

const PUNCTUATORS: &[&str] = &[
  "{", "}", "(", ")", "[", "]", ".", "...", ";", ",", "<", ">", "<=", ">=", "==", "!=", "===",
  "!==", "+", "-", "*", "%", "**", "++", "--", "<<", ">>", ">>>", "&", "|", "^", "!", "~", "&&",
  "||", "??", "?", "?.", ":", "=", "+=", "-=", "*=", "%=", "**=", "<<=", ">>=", ">>>=", "&=",
  "|=", "^=", "&&=", "||=", "??=", "=>", "/", "/=", "@",
];

static PUNCTUATOR_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
  AhoCorasickBuilder::new()
    .start_kind(StartKind::Anchored)
    .kind(Some(AhoCorasickKind::DFA))
    .match_kind(MatchKind::LeftmostLongest)
    .build(PUNCTUATORS)
    .unwrap()
});

static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
  [
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
    // Reserved in strict mode code, which all module code is.
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
  ]
  .into_iter()
  .collect()
});

/// Whether `name` can never be an identifier reference or binding in a module.
pub fn is_reserved_word(name: &str) -> bool {
  RESERVED_WORDS.contains(name)
}

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(source: &'a str) -> Lexer<'a> {
    Lexer { source, next: 0 }
  }

  pub fn source(&self) -> &'a str {
    self.source
  }

  pub fn next_offset(&self) -> usize {
    self.next
  }

  pub fn set_next(&mut self, offset: usize) {
    self.next = offset;
  }

  fn error(&self, kind: SyntaxErrorKind, start: usize) -> SyntaxError {
    SyntaxError::new(kind, Loc(start, self.next.max(start)), self.source)
  }

  fn rest(&self) -> &'a str {
    &self.source[self.next..]
  }

  fn peek(&self) -> Option<char> {
    self.rest().chars().next()
  }

  fn peek_byte(&self, ahead: usize) -> Option<u8> {
    self.source.as_bytes().get(self.next + ahead).copied()
  }

  fn bump_char(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.next += c.len_utf8();
    Some(c)
  }

  /// Consumes `#!...` at the very start of the source.
  pub fn hashbang(&mut self) -> Option<String> {
    if self.next != 0 || !self.source.starts_with("#!") {
      return None;
    };
    let end = self.line_end(2);
    let text = self.source[2..end].to_string();
    self.next = end;
    Some(text)
  }

  /// Offset of the first line terminator at or after `from`, or the end of the source.
  fn line_end(&self, from: usize) -> usize {
    let bytes = self.source.as_bytes();
    let mut i = from;
    // U+2028 and U+2029 both start with 0xE2 in UTF-8.
    while let Some(found) = memchr3(b'\n', b'\r', 0xE2, &bytes[i..]) {
      let at = i + found;
      if bytes[at] != 0xE2 || matches!(bytes.get(at + 1..at + 3), Some([0x80, 0xA8 | 0xA9])) {
        return at;
      };
      i = at + 1;
    }
    bytes.len()
  }

  /// Skips whitespace and comments, returning whether a line terminator was among them.
  fn skip_trivia(&mut self) -> SyntaxResult<bool> {
    let mut nl = false;
    loop {
      let Some(c) = self.peek() else {
        return Ok(nl);
      };
      if is_line_terminator(c) {
        nl = true;
        self.next += c.len_utf8();
      } else if is_whitespace(c) {
        self.next += c.len_utf8();
      } else if self.rest().starts_with("//") {
        self.next = self.line_end(self.next + 2);
      } else if self.rest().starts_with("/*") {
        let start = self.next;
        let Some(len) = memmem::find(self.rest()[2..].as_bytes(), b"*/") else {
          self.next = self.source.len();
          return Err(self.error(SyntaxErrorKind::Unterminated("comment"), start));
        };
        let body = &self.rest()[2..2 + len];
        nl |= body.chars().any(is_line_terminator);
        self.next += len + 4;
      } else {
        return Ok(nl);
      };
    }
  }

  pub fn next_token(&mut self) -> SyntaxResult<Token> {
    let nl_before = self.skip_trivia()?;
    let start = self.next;
    let kind = self.lex_kind(start)?;
    Ok(Token {
      kind,
      loc: Loc(start, self.next),
      nl_before,
    })
  }

  fn lex_kind(&mut self, start: usize) -> SyntaxResult<TokenKind> {
    let Some(c) = self.peek() else {
      return Ok(TokenKind::Eof);
    };
    match c {
      '"' | '\'' => self.lex_string(c),
      '`' => {
        self.next += 1;
        self.lex_template_chars(start)
      }
      '#' => {
        self.next += 1;
        match self.peek() {
          Some(c) if is_id_start(c) || c == '\\' => {
            let (name, _) = self.lex_word_chars()?;
            Ok(TokenKind::PrivateName(name))
          }
          _ => Err(self.error(SyntaxErrorKind::InvalidCharacter('#'), start)),
        }
      }
      '0'..='9' => self.lex_number(start),
      '.' if matches!(self.peek_byte(1), Some(b'0'..=b'9')) => self.lex_number(start),
      c if is_id_start(c) || c == '\\' => {
        let (name, escaped) = self.lex_word_chars()?;
        Ok(TokenKind::Word { name, escaped })
      }
      _ => {
        let input = Input::new(self.rest()).anchored(Anchored::Yes);
        let Some(m) = PUNCTUATOR_MATCHER.find(input) else {
          return Err(self.error(SyntaxErrorKind::InvalidCharacter(c), start));
        };
        let mut punct = PUNCTUATORS[m.pattern().as_usize()];
        // `a?.5:b` is a conditional.
        if punct == "?." && matches!(self.peek_byte(2), Some(b'0'..=b'9')) {
          punct = "?";
        };
        self.next += punct.len();
        Ok(TokenKind::Punct(punct))
      }
    }
  }

  fn lex_word_chars(&mut self) -> SyntaxResult<(String, bool)> {
    let mut name = String::new();
    let mut escaped = false;
    loop {
      let start = self.next;
      let c = match self.peek() {
        Some('\\') => {
          self.next += 1;
          if self.bump_char() != Some('u') {
            return Err(self.error(SyntaxErrorKind::InvalidEscape, start));
          };
          escaped = true;
          let valid = if name.is_empty() { is_id_start } else { is_id_continue };
          match char::from_u32(self.lex_unicode_escape(start)?) {
            Some(c) if valid(c) => c,
            _ => return Err(self.error(SyntaxErrorKind::InvalidEscape, start)),
          }
        }
        Some(c) if is_id_continue(c) => {
          self.next += c.len_utf8();
          c
        }
        _ => break,
      };
      name.push(c);
    }
    Ok((name, escaped))
  }

  /// Reads the part of `\u` escape after the `u`: four hex digits or a braced code point.
  fn lex_unicode_escape(&mut self, start: usize) -> SyntaxResult<u32> {
    let rest = self.rest();
    let (digits, consumed) = if let Some(braced) = rest.strip_prefix('{') {
      let Some(close) = braced.find('}') else {
        return Err(self.error(SyntaxErrorKind::InvalidEscape, start));
      };
      (&braced[..close], close + 2)
    } else {
      (rest.get(..4).unwrap_or(rest), 4)
    };
    if digits.is_empty()
      || (consumed == 4 && digits.len() != 4)
      || !digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
      return Err(self.error(SyntaxErrorKind::InvalidEscape, start));
    };
    self.next += consumed;
    match u32::from_str_radix(digits, 16) {
      Ok(cp) if cp <= 0x10FFFF => Ok(cp),
      _ => Err(self.error(SyntaxErrorKind::InvalidEscape, start)),
    }
  }

  /// Scans digits valid in `radix` with `_` separators between them, returning the end offset.
  fn scan_digits(&self, mut i: usize, radix: u32, start: usize) -> SyntaxResult<usize> {
    let bytes = self.source.as_bytes();
    let is_digit = |b: Option<&u8>| b.is_some_and(|b| char::from(*b).is_digit(radix));
    while let Some(&b) = bytes.get(i) {
      if b == b'_' {
        if i == 0 || !is_digit(bytes.get(i - 1)) || !is_digit(bytes.get(i + 1)) {
          return Err(SyntaxError::new(
            SyntaxErrorKind::InvalidNumber,
            Loc(start, i + 1),
            self.source,
          ));
        };
      } else if !char::from(b).is_digit(radix) {
        break;
      };
      i += 1;
    }
    Ok(i)
  }

  fn lex_number(&mut self, start: usize) -> SyntaxResult<TokenKind> {
    let source = self.source;
    let bytes = source.as_bytes();
    let invalid = |end: usize| {
      SyntaxError::new(SyntaxErrorKind::InvalidNumber, Loc(start, end), source)
    };
    let radix = match (bytes[start], bytes.get(start + 1).map(|b| b | 0x20)) {
      (b'0', Some(b'x')) => Some(16),
      (b'0', Some(b'o')) => Some(8),
      (b'0', Some(b'b')) => Some(2),
      _ => None,
    };
    let kind = if let Some(radix) = radix {
      let digits_start = start + 2;
      let end = self.scan_digits(digits_start, radix, start)?;
      let digits = source[digits_start..end].replace('_', "");
      if digits.is_empty() {
        return Err(invalid(end));
      };
      self.next = end;
      if bytes.get(end) == Some(&b'n') {
        self.next += 1;
        TokenKind::BigInt(source[start..end].replace('_', ""))
      } else {
        TokenKind::Number(JsNumber::from_radix(&digits, radix).ok_or_else(|| invalid(end))?)
      }
    } else {
      let mut end = if bytes[start] == b'.' {
        start
      } else {
        self.scan_digits(start, 10, start)?
      };
      let int_digits = source[start..end].to_string();
      // Legacy octal (`017`) and leading-zero decimal (`08`, `08.5`) literals are not allowed in
      // strict code.
      if int_digits.len() > 1 && int_digits.starts_with('0') {
        return Err(invalid(end));
      };
      let mut is_integer = true;
      if bytes.get(end) == Some(&b'.') {
        is_integer = false;
        end += 1;
        if bytes.get(end).is_some_and(u8::is_ascii_digit) {
          end = self.scan_digits(end, 10, start)?;
        };
      };
      if matches!(bytes.get(end), Some(b'e' | b'E')) {
        is_integer = false;
        end += 1;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
          end += 1;
        };
        if !bytes.get(end).is_some_and(u8::is_ascii_digit) {
          return Err(invalid(end));
        };
        end = self.scan_digits(end, 10, start)?;
      };
      self.next = end;
      if bytes.get(end) == Some(&b'n') {
        if !is_integer {
          return Err(invalid(end + 1));
        };
        self.next += 1;
        TokenKind::BigInt(int_digits.replace('_', ""))
      } else {
        let digits = source[start..end].replace('_', "");
        TokenKind::Number(JsNumber::from_decimal(&digits).ok_or_else(|| invalid(end))?)
      }
    };
    if let Some(c) = self.peek() {
      if is_id_start(c) || c.is_ascii_digit() || c == '\\' {
        return Err(invalid(self.next + c.len_utf8()));
      };
    };
    Ok(kind)
  }

  fn lex_string(&mut self, quote: char) -> SyntaxResult<TokenKind> {
    let start = self.next;
    self.next += 1;
    let mut value = String::new();
    let mut lone_surrogate = false;
    loop {
      let Some(c) = self.bump_char() else {
        return Err(self.error(SyntaxErrorKind::Unterminated("string literal"), start));
      };
      match c {
        c if c == quote => break,
        '\n' | '\r' => {
          return Err(self.error(SyntaxErrorKind::LineTerminatorInString, start));
        }
        '\\' => {
          let escape_start = self.next - 1;
          match self.lex_escape(escape_start)? {
            Escaped::Char(c) => value.push(c),
            Escaped::LoneSurrogate => {
              lone_surrogate = true;
              value.push(char::REPLACEMENT_CHARACTER);
            }
            Escaped::LineContinuation => {}
          }
        }
        c => value.push(c),
      }
    }
    let raw = lone_surrogate.then(|| self.source[start..self.next].to_string());
    Ok(TokenKind::Str { value, raw })
  }

  /// Reads one escape sequence after its backslash.
  fn lex_escape(&mut self, start: usize) -> SyntaxResult<Escaped> {
    let Some(c) = self.bump_char() else {
      return Err(self.error(SyntaxErrorKind::InvalidEscape, start));
    };
    let c = match c {
      '\r' => {
        if self.peek() == Some('\n') {
          self.next += 1;
        };
        return Ok(Escaped::LineContinuation);
      }
      c if is_line_terminator(c) => return Ok(Escaped::LineContinuation),
      'n' => '\n',
      't' => '\t',
      'r' => '\r',
      'b' => '\u{8}',
      'f' => '\u{C}',
      'v' => '\u{B}',
      '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => '\0',
      // Legacy octal escapes, and `\8` and `\9`.
      '0'..='9' => return Err(self.error(SyntaxErrorKind::InvalidEscape, start)),
      'x' => {
        let digits = self.rest().get(..2).unwrap_or("");
        let Some(cp) = (digits.len() == 2 && digits.bytes().all(|b| b.is_ascii_hexdigit()))
          .then(|| u32::from_str_radix(digits, 16).ok())
          .flatten()
        else {
          return Err(self.error(SyntaxErrorKind::InvalidEscape, start));
        };
        self.next += 2;
        char::from(cp as u8)
      }
      'u' => {
        let cp = self.lex_unicode_escape(start)?;
        if (0xD800..0xDC00).contains(&cp) && self.rest().starts_with("\\u") {
          let saved = self.next;
          self.next += 2;
          let low = self.lex_unicode_escape(self.next - 2);
          match low {
            Ok(low) if (0xDC00..0xE000).contains(&low) => {
              let combined = 0x10000 + ((cp - 0xD800) << 10) + (low - 0xDC00);
              return Ok(char::from_u32(combined).map_or(Escaped::LoneSurrogate, Escaped::Char));
            }
            _ => self.next = saved,
          };
        };
        return Ok(char::from_u32(cp).map_or(Escaped::LoneSurrogate, Escaped::Char));
      }
      c => c,
    };
    Ok(Escaped::Char(c))
  }

  /// Continues a template after the `}` that closes a substitution at `start`.
  pub fn template_continuation(&mut self, start: usize, nl_before: bool) -> SyntaxResult<Token> {
    self.next = start + 1;
    let kind = self.lex_template_chars(start)?;
    Ok(Token {
      kind,
      loc: Loc(start, self.next),
      nl_before,
    })
  }

  fn lex_template_chars(&mut self, start: usize) -> SyntaxResult<TokenKind> {
    let raw_start = self.next;
    let mut valid_escapes = true;
    loop {
      let Some(c) = self.bump_char() else {
        return Err(self.error(SyntaxErrorKind::Unterminated("template"), start));
      };
      match c {
        '`' => {
          return Ok(TokenKind::Template {
            raw: self.source[raw_start..self.next - 1].to_string(),
            tail: true,
            valid_escapes,
          });
        }
        '$' if self.peek() == Some('{') => {
          self.next += 1;
          return Ok(TokenKind::Template {
            raw: self.source[raw_start..self.next - 2].to_string(),
            tail: false,
            valid_escapes,
          });
        }
        '\\' => {
          // Tagged templates may hold malformed escapes, so keep going and let the parser decide.
          let escape_start = self.next - 1;
          if self.lex_escape(escape_start).is_err() {
            valid_escapes = false;
            // Resume right after the backslash so a closing backtick is never swallowed.
            self.next = escape_start + 1;
            if matches!(self.peek(), Some('`' | '\\' | '$')) {
              self.next += 1;
            };
          };
        }
        _ => {}
      }
    }
  }

  /// Rescans the `/` or `/=` at `start` as a regular expression literal.
  pub fn regex(&mut self, start: usize, nl_before: bool) -> SyntaxResult<Token> {
    self.next = start + 1;
    let mut in_class = false;
    loop {
      match self.bump_char() {
        None => return Err(self.error(SyntaxErrorKind::Unterminated("regular expression"), start)),
        Some(c) if is_line_terminator(c) => {
          return Err(self.error(SyntaxErrorKind::Unterminated("regular expression"), start));
        }
        Some('\\') => match self.bump_char() {
          Some(c) if !is_line_terminator(c) => {}
          _ => {
            return Err(self.error(SyntaxErrorKind::Unterminated("regular expression"), start));
          }
        },
        Some('[') => in_class = true,
        Some(']') => in_class = false,
        Some('/') if !in_class => break,
        Some(_) => {}
      }
    }
    let pattern = self.source[start + 1..self.next - 1].to_string();
    let flags_start = self.next;
    while self.peek().is_some_and(is_id_continue) {
      self.bump_char();
    }
    let flags = &self.source[flags_start..self.next];
    let mut seen = HashSet::default();
    let valid = flags.chars().all(|f| "dgimsuyv".contains(f) && seen.insert(f))
      && !(seen.contains(&'u') && seen.contains(&'v'));
    if !valid {
      return Err(self.error(SyntaxErrorKind::InvalidRegexFlags, flags_start));
    };
    Ok(Token {
      kind: TokenKind::Regex {
        pattern,
        flags: flags.to_string(),
      },
      loc: Loc(start, self.next),
      nl_before,
    })
  }
}

enum Escaped {
  Char(char),
  LoneSurrogate,
  LineContinuation,
}
