use crate::loc::LineCol;
use crate::loc::Loc;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
  UnexpectedEnd,
  UnexpectedToken {
    found: String,
    expected: String,
  },
  InvalidCharacter(char),
  InvalidAssignmentTarget,
  InvalidEscape,
  InvalidNumber,
  InvalidRegexFlags,
  Unterminated(&'static str),
  LineTerminatorInString,
  ReservedWord(String),
  RestrictedBinding(String),
  Redeclaration(String),
  DuplicateExport(String),
  UndeclaredExport(String),
  DuplicateLabel(String),
  UnknownLabel(String),
  MixedNullish,
  UnparenthesizedUnaryBase,
  Invalid(&'static str),
}

impl Display for SyntaxErrorKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      SyntaxErrorKind::UnexpectedEnd => write!(f, "unexpected end of input"),
      SyntaxErrorKind::UnexpectedToken { found, expected } => {
        write!(f, "expected {expected} but found {found}")
      }
      SyntaxErrorKind::InvalidCharacter(c) => write!(f, "invalid character {c:?}"),
      SyntaxErrorKind::InvalidAssignmentTarget => write!(f, "invalid assignment target"),
      SyntaxErrorKind::InvalidEscape => write!(f, "invalid escape sequence"),
      SyntaxErrorKind::InvalidNumber => write!(f, "malformed number literal"),
      SyntaxErrorKind::InvalidRegexFlags => write!(f, "invalid regular expression flags"),
      SyntaxErrorKind::Unterminated(what) => write!(f, "unterminated {what}"),
      SyntaxErrorKind::LineTerminatorInString => {
        write!(f, "line terminator in string literal")
      }
      SyntaxErrorKind::ReservedWord(word) => write!(f, "`{word}` is a reserved word"),
      SyntaxErrorKind::RestrictedBinding(name) => {
        write!(f, "`{name}` cannot be declared or assigned in strict mode")
      }
      SyntaxErrorKind::Redeclaration(name) => write!(f, "`{name}` has already been declared"),
      SyntaxErrorKind::DuplicateExport(name) => write!(f, "`{name}` is exported more than once"),
      SyntaxErrorKind::UndeclaredExport(name) => write!(f, "exported `{name}` is not declared"),
      SyntaxErrorKind::DuplicateLabel(label) => write!(f, "label `{label}` is already in use"),
      SyntaxErrorKind::UnknownLabel(label) => write!(f, "undefined label `{label}`"),
      SyntaxErrorKind::MixedNullish => {
        write!(f, "`??` cannot be mixed with `||` or `&&` without parentheses")
      }
      SyntaxErrorKind::UnparenthesizedUnaryBase => {
        write!(f, "the base of `**` cannot be an unparenthesized unary expression")
      }
      SyntaxErrorKind::Invalid(message) => write!(f, "{message}"),
    }
  }
}

/// The first error found in a module. Parsing stops there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
  pub kind: SyntaxErrorKind,
  pub loc: Loc,
  pub position: LineCol,
}

impl SyntaxError {
  pub fn new(kind: SyntaxErrorKind, loc: Loc, source: &str) -> SyntaxError {
    SyntaxError {
      kind,
      loc,
      position: loc.start_line_col(source),
    }
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} at {}:{}",
      self.kind, self.position.line, self.position.column
    )
  }
}

impl Error for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[cfg(test)]
mod tests {
  use super::SyntaxError;
  use super::SyntaxErrorKind;
  use crate::loc::Loc;

  #[test]
  fn display_names_the_position() {
    let err = SyntaxError::new(
      SyntaxErrorKind::UnexpectedToken {
        found: "`;`".into(),
        expected: "`)`".into(),
      },
      Loc(6, 7),
      "f(a,\nb;",
    );
    assert_eq!(err.to_string(), "expected `)` but found `;` at 2:2");
  }
}
