//! Token writer that keeps output as tight as possible.
//!
//! Every token goes through one of the typed writers, which remember what the last token ended
//! with. A space is only written when the next token would otherwise merge with it, e.g.
//! `return x`, `a+ +b`, `a- -b` or `a/ /b/`.

use crate::escape::escape_string;
use parse_js::char::is_id_continue;
use parse_js::char::is_id_start;
use parse_js::loc::Loc;
use std::error::Error;
use std::fmt;
use std::string::FromUtf8Error;

#[derive(Debug)]
pub enum EmitErrorKind {
  InvalidUtf8(FromUtf8Error),
  /// A name that would not lex back as a single identifier, e.g. one produced by a transform.
  InvalidIdentifier(String),
  Unsupported(&'static str),
}

#[derive(Debug)]
pub struct EmitError {
  pub kind: EmitErrorKind,
  /// The innermost statement being emitted when the error occurred.
  pub loc: Option<Loc>,
}

impl EmitError {
  pub(crate) fn unsupported(what: &'static str) -> EmitError {
    EmitError {
      kind: EmitErrorKind::Unsupported(what),
      loc: None,
    }
  }
}

impl fmt::Display for EmitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      EmitErrorKind::InvalidUtf8(err) => write!(f, "emitted code is not valid UTF-8: {err}")?,
      EmitErrorKind::InvalidIdentifier(name) => write!(f, "cannot emit {name:?} as an identifier")?,
      EmitErrorKind::Unsupported(what) => write!(f, "cannot emit {what}")?,
    };
    if let Some(Loc(start, end)) = self.loc {
      write!(f, " [{start}:{end}]")?;
    };
    Ok(())
  }
}

impl Error for EmitError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match &self.kind {
      EmitErrorKind::InvalidUtf8(err) => Some(err),
      _ => None,
    }
  }
}

pub type EmitResult<T = ()> = Result<T, EmitError>;

/// How the previous token ended, as far as merging with the next one goes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
enum Tail {
  #[default]
  Safe,
  /// Identifier, keyword, or a regex ending in flags.
  Word,
  Number,
  Plus,
  Minus,
  /// `--`, which also forms `-->` with a following `>`.
  Decrement,
  Slash,
  /// A `<` that could start `<!--`.
  Lt,
}

/// How the next token starts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Head {
  Word,
  Number,
  /// `.`, and numbers written like `.5`.
  Dot,
  Plus,
  Minus,
  Slash,
  Star,
  Bang,
  Gt,
  Other,
}

fn needs_space(tail: Tail, head: Head) -> bool {
  match tail {
    Tail::Safe => false,
    Tail::Word => matches!(head, Head::Word | Head::Number),
    Tail::Number => matches!(head, Head::Word | Head::Number | Head::Dot),
    Tail::Plus => head == Head::Plus,
    Tail::Minus => head == Head::Minus,
    Tail::Decrement => matches!(head, Head::Minus | Head::Gt),
    Tail::Slash => matches!(head, Head::Slash | Head::Star),
    Tail::Lt => head == Head::Bang,
  }
}

fn is_emittable_name(name: &str) -> bool {
  // Private names keep their `#`.
  let name = name.strip_prefix('#').unwrap_or(name);
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if is_id_start(first) => chars.all(is_id_continue),
    _ => false,
  }
}

/// Output buffer. Writes never fail on their own: the first problem is recorded and returned by
/// [`Emitter::finish`], so emission code doesn't thread results through every token.
#[derive(Debug, Default)]
pub struct Emitter {
  buf: Vec<u8>,
  tail: Tail,
  error: Option<EmitError>,
}

impl Emitter {
  pub fn new() -> Emitter {
    Emitter::default()
  }

  pub fn with_capacity(capacity: usize) -> Emitter {
    Emitter {
      buf: Vec::with_capacity(capacity),
      ..Emitter::default()
    }
  }

  pub(crate) fn fail(&mut self, err: EmitError) {
    self.error.get_or_insert(err);
  }

  /// Gives a pending error the location of the statement it was raised in, unless a nested
  /// statement already did.
  pub(crate) fn locate(&mut self, loc: Loc) {
    if let Some(err) = &mut self.error {
      err.loc.get_or_insert(loc);
    };
  }

  pub fn has_error(&self) -> bool {
    self.error.is_some()
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.buf
  }

  /// The code written so far, or the first error recorded.
  pub fn finish(self) -> EmitResult<String> {
    if let Some(err) = self.error {
      return Err(err);
    };
    String::from_utf8(self.buf).map_err(|err| EmitError {
      kind: EmitErrorKind::InvalidUtf8(err),
      loc: None,
    })
  }

  fn push(&mut self, head: Head, text: &str, tail: Tail) {
    if text.is_empty() {
      return;
    };
    if needs_space(self.tail, head) {
      self.buf.push(b' ');
    };
    self.buf.extend_from_slice(text.as_bytes());
    self.tail = tail;
  }

  pub fn keyword(&mut self, keyword: &str) {
    self.push(Head::Word, keyword, Tail::Word);
  }

  pub fn ident(&mut self, name: &str) {
    if !is_emittable_name(name) {
      self.fail(EmitError {
        kind: EmitErrorKind::InvalidIdentifier(name.to_string()),
        loc: None,
      });
      return;
    };
    self.push(Head::Word, name, Tail::Word);
  }

  pub fn number(&mut self, text: &str) {
    let head = if text.starts_with('.') {
      Head::Dot
    } else {
      Head::Number
    };
    self.push(head, text, Tail::Number);
  }

  pub fn punct(&mut self, punct: &str) {
    let head = match punct.as_bytes().first() {
      Some(b'+') => Head::Plus,
      Some(b'-') => Head::Minus,
      Some(b'/') => Head::Slash,
      Some(b'*') => Head::Star,
      Some(b'!') => Head::Bang,
      Some(b'>') => Head::Gt,
      Some(b'.') => Head::Dot,
      _ => Head::Other,
    };
    let tail = match punct {
      "+" | "++" => Tail::Plus,
      "-" => Tail::Minus,
      "--" => Tail::Decrement,
      "/" => Tail::Slash,
      "<" => Tail::Lt,
      _ => Tail::Safe,
    };
    self.push(head, punct, tail);
  }

  /// A string literal in double quotes.
  pub fn string(&mut self, value: &str) {
    let quoted = escape_string(value);
    self.push(Head::Other, &quoted, Tail::Safe);
  }

  /// Text that already is one complete token, e.g. a string literal kept as written.
  pub fn verbatim(&mut self, text: &str) {
    self.push(Head::Other, text, Tail::Safe);
  }

  pub fn line_break(&mut self) {
    self.buf.push(b'\n');
    self.tail = Tail::Safe;
  }

  pub fn regex(&mut self, pattern: &str, flags: &str) {
    self.push(Head::Slash, "/", Tail::Safe);
    self.buf.extend_from_slice(pattern.as_bytes());
    self.buf.push(b'/');
    self.buf.extend_from_slice(flags.as_bytes());
    self.tail = if flags.is_empty() {
      Tail::Slash
    } else {
      Tail::Word
    };
  }

  /// A template chunk between its delimiters, which are written by the caller.
  pub fn template_chunk(&mut self, raw: &str) {
    self.buf.extend_from_slice(raw.as_bytes());
    self.tail = Tail::Safe;
  }
}

#[cfg(test)]
mod tests {
  use super::EmitErrorKind;
  use super::Emitter;

  #[test]
  fn spaces_only_between_merging_tokens() {
    let mut out = Emitter::new();
    out.keyword("return");
    out.ident("x");
    out.punct("+");
    out.punct("++");
    out.ident("y");
    out.punct("-");
    out.punct("-");
    out.number("1");
    assert_eq!(out.finish().unwrap(), "return x+ ++y- -1");
  }

  #[test]
  fn punctuation_stays_tight() {
    let mut out = Emitter::new();
    out.keyword("import");
    out.ident("_map");
    out.keyword("from");
    out.string("nanoutils/lib/map");
    out.punct(";");
    assert_eq!(out.finish().unwrap(), r#"import _map from"nanoutils/lib/map";"#);
  }

  #[test]
  fn member_access_on_an_integer() {
    let mut out = Emitter::new();
    out.number("1");
    out.punct(".");
    out.ident("toString");
    assert_eq!(out.finish().unwrap(), "1 .toString");
  }

  #[test]
  fn keeps_the_first_bad_identifier() {
    let mut out = Emitter::new();
    out.ident("ok");
    out.ident("2fast");
    out.ident("");
    let err = out.finish().unwrap_err();
    assert!(matches!(err.kind, EmitErrorKind::InvalidIdentifier(name) if name == "2fast"));
  }

  #[test]
  fn never_forms_comments() {
    let mut out = Emitter::new();
    out.ident("a");
    out.punct("/");
    out.regex("b", "g");
    out.punct("<");
    out.punct("!");
    out.punct("--");
    out.ident("c");
    out.punct("--");
    out.punct(">");
    out.ident("d");
    assert_eq!(out.finish().unwrap(), "a/ /b/g< !--c-- >d");
  }
}
