//! Recursive descent parser over one token of lookahead. All input is parsed as module code, so
//! strict mode rules and their early errors always apply.

use crate::error::SyntaxError;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::lex::Lexer;
use crate::lex::Token;
use crate::lex::TokenKind;
use crate::loc::Loc;
use scope::DeclScope;
use std::mem;

mod expr;
mod func;
mod module;
mod pat;
mod scope;
mod stmt;
#[cfg(test)]
mod tests;

#[derive(Clone)]
struct Label {
  name: String,
  is_loop: bool,
  /// The labeled statement has not started yet. Stays set across further labels, e.g. `a` in
  /// `a: b: for (;;) {}` is a loop label.
  pending: bool,
}

/// What the innermost function (or module, or class static block) allows.
#[derive(Clone, Default)]
struct FnCtx {
  in_function: bool,
  is_async: bool,
  generator: bool,
  super_prop: bool,
  super_call: bool,
  new_target: bool,
  labels: Vec<Label>,
  loop_depth: u32,
  breakable_depth: u32,
}

impl FnCtx {
  fn module() -> FnCtx {
    // Top-level `await` is allowed.
    FnCtx {
      is_async: true,
      ..FnCtx::default()
    }
  }
}

/// Enough state to rewind after speculatively parsing arrow function parameters.
struct Checkpoint {
  next: usize,
  token: Token,
  prev_end: usize,
  cover_len: usize,
  scope_len: usize,
  ctx: FnCtx,
  no_in: bool,
}

pub struct Parser<'a> {
  lexer: Lexer<'a>,
  token: Token,
  prev_end: usize,
  hashbang: Option<String>,
  /// Locations of `{ a = 1 }` shorthand initializers not yet known to be inside a pattern.
  cover_inits: Vec<Loc>,
  ctx: FnCtx,
  scopes: Vec<DeclScope>,
  /// Set while parsing a `for` head, where `in` cannot be a binary operator.
  no_in: bool,
  exported: ahash::HashSet<String>,
  export_refs: Vec<(String, Loc)>,
}

impl<'a> Parser<'a> {
  pub fn new(source: &'a str) -> SyntaxResult<Parser<'a>> {
    let mut lexer = Lexer::new(source);
    let hashbang = lexer.hashbang();
    let token = lexer.next_token()?;
    Ok(Parser {
      lexer,
      token,
      prev_end: 0,
      hashbang,
      cover_inits: Vec::new(),
      ctx: FnCtx::module(),
      scopes: Vec::new(),
      no_in: false,
      exported: ahash::HashSet::default(),
      export_refs: Vec::new(),
    })
  }

  fn error(&self, kind: SyntaxErrorKind, loc: Loc) -> SyntaxError {
    SyntaxError::new(kind, loc, self.lexer.source())
  }

  fn unexpected(&self, expected: &str) -> SyntaxError {
    let kind = match self.token.kind {
      TokenKind::Eof => SyntaxErrorKind::UnexpectedEnd,
      _ => SyntaxErrorKind::UnexpectedToken {
        found: self.token.describe(),
        expected: expected.to_string(),
      },
    };
    self.error(kind, self.token.loc)
  }

  fn start(&self) -> usize {
    self.token.loc.0
  }

  /// From `start` to the end of the last consumed token.
  fn loc_from(&self, start: usize) -> Loc {
    Loc(start, self.prev_end.max(start))
  }

  fn bump(&mut self) -> SyntaxResult<Token> {
    let next = self.lexer.next_token()?;
    let token = mem::replace(&mut self.token, next);
    self.prev_end = token.loc.1;
    Ok(token)
  }

  /// The token after the current one, assuming it is not a regular expression or template
  /// continuation.
  fn peek_next(&mut self) -> SyntaxResult<Token> {
    let saved = self.lexer.next_offset();
    let token = self.lexer.next_token();
    self.lexer.set_next(saved);
    token
  }

  fn is_punct(&self, punct: &str) -> bool {
    matches!(self.token.kind, TokenKind::Punct(p) if p == punct)
  }

  fn eat_punct(&mut self, punct: &str) -> SyntaxResult<bool> {
    let found = self.is_punct(punct);
    if found {
      self.bump()?;
    };
    Ok(found)
  }

  fn expect_punct(&mut self, punct: &str) -> SyntaxResult<Loc> {
    if !self.is_punct(punct) {
      return Err(self.unexpected(&format!("`{punct}`")));
    };
    Ok(self.bump()?.loc)
  }

  fn punct(&self) -> Option<&'static str> {
    match self.token.kind {
      TokenKind::Punct(p) => Some(p),
      _ => None,
    }
  }

  fn is_any_word(&self) -> bool {
    matches!(self.token.kind, TokenKind::Word { .. })
  }

  /// Whether the current token is the unescaped word `word`.
  fn is_word(&self, word: &str) -> bool {
    matches!(&self.token.kind, TokenKind::Word { name, escaped: false } if name == word)
  }

  fn eat_word(&mut self, word: &str) -> SyntaxResult<bool> {
    let found = self.is_word(word);
    if found {
      self.bump()?;
    };
    Ok(found)
  }

  fn expect_word(&mut self, word: &str) -> SyntaxResult<Loc> {
    if !self.is_word(word) {
      return Err(self.unexpected(&format!("`{word}`")));
    };
    Ok(self.bump()?.loc)
  }

  /// `async function` with no line break in between.
  fn is_async_function(&mut self) -> SyntaxResult<bool> {
    if !self.is_word("async") {
      return Ok(false);
    };
    let next = self.peek_next()?;
    Ok(
      !next.nl_before
        && matches!(&next.kind, TokenKind::Word { name, escaped: false } if name == "function"),
    )
  }

  fn is_eof(&self) -> bool {
    self.token.kind == TokenKind::Eof
  }

  /// Ends a statement, inserting a semicolon where a line break, `}` or the end of input allows.
  fn consume_semicolon(&mut self) -> SyntaxResult<()> {
    if self.eat_punct(";")? || self.is_punct("}") || self.is_eof() || self.token.nl_before {
      return Ok(());
    };
    Err(self.unexpected("`;`"))
  }

  fn checkpoint(&self) -> Checkpoint {
    Checkpoint {
      next: self.lexer.next_offset(),
      token: self.token.clone(),
      prev_end: self.prev_end,
      cover_len: self.cover_inits.len(),
      scope_len: self.scopes.len(),
      ctx: self.ctx.clone(),
      no_in: self.no_in,
    }
  }

  fn restore(&mut self, cp: Checkpoint) {
    self.lexer.set_next(cp.next);
    self.token = cp.token;
    self.prev_end = cp.prev_end;
    self.cover_inits.truncate(cp.cover_len);
    self.scopes.truncate(cp.scope_len);
    self.ctx = cp.ctx;
    self.no_in = cp.no_in;
  }

  /// Runs `f` with `in` allowed as an operator again, e.g. inside brackets within a `for` head.
  fn with_in<T>(&mut self, f: impl FnOnce(&mut Self) -> SyntaxResult<T>) -> SyntaxResult<T> {
    let outer = mem::replace(&mut self.no_in, false);
    let result = f(self);
    self.no_in = outer;
    result
  }

  fn with_no_in<T>(&mut self, f: impl FnOnce(&mut Self) -> SyntaxResult<T>) -> SyntaxResult<T> {
    let outer = mem::replace(&mut self.no_in, true);
    let result = f(self);
    self.no_in = outer;
    result
  }

  /// Fails if a shorthand initializer recorded after `mark` never became part of a pattern.
  fn check_cover(&self, mark: usize) -> SyntaxResult<()> {
    match self.cover_inits.get(mark) {
      Some(loc) => Err(self.error(
        SyntaxErrorKind::Invalid("`=` in an object literal is only allowed when destructuring"),
        *loc,
      )),
      None => Ok(()),
    }
  }

  /// Runs `f` as the body of a new function context.
  fn with_ctx<T>(
    &mut self,
    ctx: FnCtx,
    f: impl FnOnce(&mut Self) -> SyntaxResult<T>,
  ) -> SyntaxResult<T> {
    let outer = mem::replace(&mut self.ctx, ctx);
    let outer_no_in = mem::replace(&mut self.no_in, false);
    let result = f(self);
    self.ctx = outer;
    self.no_in = outer_no_in;
    result
  }
}
