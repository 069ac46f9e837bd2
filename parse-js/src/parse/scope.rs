use super::Parser;
use crate::ast::class::PropKey;
use crate::ast::node::Node;
use crate::ast::pat::Pat;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::lex::is_reserved_word;
use crate::loc::Loc;
use ahash::HashSet;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) enum ScopeKind {
  Module,
  Function,
  Block,
}

/// Names declared directly in one scope, tracked only to report redeclarations.
pub(super) struct DeclScope {
  kind: ScopeKind,
  lexical: HashSet<String>,
  /// `var` names declared here or in a nested block, parameters, and functions declared at the
  /// top of a function body.
  var: HashSet<String>,
  catch_params: HashSet<String>,
}

impl DeclScope {
  fn new(kind: ScopeKind) -> DeclScope {
    DeclScope {
      kind,
      lexical: HashSet::default(),
      var: HashSet::default(),
      catch_params: HashSet::default(),
    }
  }

  pub(super) fn declares(&self, name: &str) -> bool {
    self.lexical.contains(name) || self.var.contains(name)
  }
}

/// Collects the names a pattern binds, in source order.
pub(super) fn bound_names(pat: &Node<Pat>, out: &mut Vec<(String, Loc)>) {
  match pat.stx.as_ref() {
    Pat::Ident(id) => out.push((id.stx.name.clone(), id.loc)),
    Pat::Array(arr) => {
      for elem in arr.stx.elements.iter().flatten() {
        bound_names(&elem.target, out);
      }
      if let Some(rest) = &arr.stx.rest {
        bound_names(rest, out);
      };
    }
    Pat::Object(obj) => {
      for prop in obj.stx.props.iter() {
        bound_names(&prop.stx.target, out);
      }
      if let Some(rest) = &obj.stx.rest {
        bound_names(rest, out);
      };
    }
    Pat::Member(_) => {}
  }
}

impl<'a> Parser<'a> {
  pub(super) fn push_scope(&mut self, kind: ScopeKind) {
    self.scopes.push(DeclScope::new(kind));
  }

  pub(super) fn pop_scope(&mut self) {
    self.scopes.pop();
  }

  fn current_scope(&mut self) -> SyntaxResult<&mut DeclScope> {
    let loc = self.token.loc;
    match self.scopes.len() {
      0 => Err(self.error(SyntaxErrorKind::Invalid("declaration outside of any scope"), loc)),
      len => Ok(&mut self.scopes[len - 1]),
    }
  }

  /// `let`, `const`, `class`, imports, and functions declared in blocks or at the top level.
  pub(super) fn declare_lexical(&mut self, name: &str, loc: Loc) -> SyntaxResult<()> {
    let scope = self.current_scope()?;
    if scope.declares(name) || scope.catch_params.contains(name) {
      return Err(self.error(SyntaxErrorKind::Redeclaration(name.to_string()), loc));
    };
    scope.lexical.insert(name.to_string());
    Ok(())
  }

  /// A `var` is visible up to the nearest function, so it conflicts with any lexical declaration
  /// of the same name on the way there.
  pub(super) fn declare_var(&mut self, name: &str, loc: Loc) -> SyntaxResult<()> {
    let source = self.lexer.source();
    for scope in self.scopes.iter_mut().rev() {
      if scope.lexical.contains(name) {
        let kind = SyntaxErrorKind::Redeclaration(name.to_string());
        return Err(SyntaxError::new(kind, loc, source));
      };
      scope.var.insert(name.to_string());
      if scope.kind != ScopeKind::Block {
        break;
      };
    }
    Ok(())
  }

  pub(super) fn declare_function(&mut self, name: &str, loc: Loc) -> SyntaxResult<()> {
    let scope = self.current_scope()?;
    if scope.kind != ScopeKind::Function {
      return self.declare_lexical(name, loc);
    };
    if scope.lexical.contains(name) {
      return Err(self.error(SyntaxErrorKind::Redeclaration(name.to_string()), loc));
    };
    scope.var.insert(name.to_string());
    Ok(())
  }

  /// Declares parameters in the function scope just pushed. Duplicates are never allowed in
  /// strict code.
  pub(super) fn declare_params(&mut self, names: Vec<(String, Loc)>) -> SyntaxResult<()> {
    for (name, loc) in names {
      let scope = self.current_scope()?;
      if !scope.var.insert(name.clone()) {
        return Err(self.error(SyntaxErrorKind::Redeclaration(name), loc));
      };
    }
    Ok(())
  }

  pub(super) fn declare_catch_params(&mut self, names: Vec<(String, Loc)>) -> SyntaxResult<()> {
    for (name, loc) in names {
      let scope = self.current_scope()?;
      if !scope.catch_params.insert(name.clone()) {
        return Err(self.error(SyntaxErrorKind::Redeclaration(name), loc));
      };
    }
    Ok(())
  }

  pub(super) fn declare_pattern(
    &mut self,
    pat: &Node<Pat>,
    declare: fn(&mut Self, &str, Loc) -> SyntaxResult<()>,
  ) -> SyntaxResult<()> {
    let mut names = Vec::new();
    bound_names(pat, &mut names);
    for (name, loc) in names {
      declare(self, &name, loc)?;
    }
    Ok(())
  }

  /// A name that is being declared.
  pub(super) fn check_binding_name(&self, name: &str, loc: Loc) -> SyntaxResult<()> {
    if is_reserved_word(name) {
      return Err(self.error(SyntaxErrorKind::ReservedWord(name.to_string()), loc));
    };
    self.check_assignable_name(name, loc)
  }

  /// A name that is being assigned to.
  pub(super) fn check_assignable_name(&self, name: &str, loc: Loc) -> SyntaxResult<()> {
    if name == "eval" || name == "arguments" {
      return Err(self.error(SyntaxErrorKind::RestrictedBinding(name.to_string()), loc));
    };
    Ok(())
  }

  /// A name that is being read.
  pub(super) fn check_reference_name(&self, name: &str, loc: Loc) -> SyntaxResult<()> {
    if is_reserved_word(name) {
      return Err(self.error(SyntaxErrorKind::ReservedWord(name.to_string()), loc));
    };
    Ok(())
  }

  pub(super) fn add_export(&mut self, name: &str, loc: Loc) -> SyntaxResult<()> {
    if !self.exported.insert(name.to_string()) {
      return Err(self.error(SyntaxErrorKind::DuplicateExport(name.to_string()), loc));
    };
    Ok(())
  }

  pub(super) fn add_exported_pattern(&mut self, pat: &Node<Pat>) -> SyntaxResult<()> {
    let mut names = Vec::new();
    bound_names(pat, &mut names);
    for (name, loc) in names {
      self.add_export(&name, loc)?;
    }
    Ok(())
  }

  /// Every local name in an `export { ... }` list must be declared somewhere in the module.
  pub(super) fn check_export_refs(&self) -> SyntaxResult<()> {
    let Some(module) = self.scopes.first() else {
      return Ok(());
    };
    for (name, loc) in self.export_refs.iter() {
      if !module.declares(name) {
        return Err(self.error(SyntaxErrorKind::UndeclaredExport(name.clone()), *loc));
      };
    }
    Ok(())
  }

  /// Rejects member names that classes reserve.
  pub(super) fn check_class_key(
    &self,
    key: &PropKey,
    is_static: bool,
    is_field: bool,
    loc: Loc,
  ) -> SyntaxResult<()> {
    let invalid = match key {
      PropKey::Private(name) if name == "constructor" => Some("`#constructor` is not allowed"),
      PropKey::Ident(name) | PropKey::Str(name) if is_field && name == "constructor" => {
        Some("a class field cannot be named `constructor`")
      }
      PropKey::Ident(name) | PropKey::Str(name) if is_field && is_static && name == "prototype" => {
        Some("a static class field cannot be named `prototype`")
      }
      _ => None,
    };
    match invalid {
      Some(message) => Err(self.error(SyntaxErrorKind::Invalid(message), loc)),
      None => Ok(()),
    }
  }
}
