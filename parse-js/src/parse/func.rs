use super::scope::bound_names;
use super::scope::ScopeKind;
use super::FnCtx;
use super::Parser;
use crate::ast::class::ClassMember;
use crate::ast::class::MethodKind;
use crate::ast::class::ObjectMember;
use crate::ast::class::PropKey;
use crate::ast::expr::AssignExpr;
use crate::ast::expr::ClassExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::FunctionExpr;
use crate::ast::expr::Ident;
use crate::ast::func::Function;
use crate::ast::func::FunctionBody;
use crate::ast::func::Param;
use crate::ast::node::Node;
use crate::ast::pat::BindingPat;
use crate::ast::pat::DeclName;
use crate::ast::pat::IdentPat;
use crate::ast::pat::Pat;
use crate::ast::stmt::ClassDecl;
use crate::ast::stmt::ExportMode;
use crate::ast::stmt::FunctionDecl;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::lex::TokenKind;
use crate::operator::AssignOp;

fn function_ctx(is_async: bool, generator: bool) -> FnCtx {
  FnCtx {
    in_function: true,
    is_async,
    generator,
    new_target: true,
    ..FnCtx::default()
  }
}

fn is_simple_param(param: &Node<Param>) -> bool {
  !param.stx.rest
    && param.stx.default.is_none()
    && matches!(param.stx.pat.stx.pat.stx.as_ref(), Pat::Ident(_))
}

fn has_use_strict(body: &[Node<Stmt>]) -> bool {
  body
    .iter()
    .map_while(|stmt| match stmt.stx.as_ref() {
      Stmt::Expr(expr) if !expr.stx.expr.is_parenthesized() => match expr.stx.expr.stx.as_ref() {
        Expr::Str(lit) => Some(lit.stx.value == "use strict"),
        _ => None,
      },
      _ => None,
    })
    .any(|is_use_strict| is_use_strict)
}

impl<'a> Parser<'a> {
  /// `(a, [b] = c, ...d)`.
  pub(super) fn parse_params(&mut self) -> SyntaxResult<Vec<Node<Param>>> {
    self.expect_punct("(")?;
    let params = self.with_in(|p| {
      let mut params = Vec::new();
      while !p.is_punct(")") {
        let start = p.start();
        let rest = p.eat_punct("...")?;
        let pat = p.parse_binding_pat()?;
        let pat = Node::new(pat.loc, BindingPat { pat });
        let default = if !rest && p.eat_punct("=")? {
          Some(p.parse_assignment()?)
        } else {
          None
        };
        params.push(Node::new(p.loc_from(start), Param { rest, pat, default }));
        if rest {
          break;
        };
        if !p.is_punct(")") {
          p.expect_punct(",")?;
        };
      }
      Ok(params)
    })?;
    self.expect_punct(")")?;
    Ok(params)
  }

  pub(super) fn declare_param_list(&mut self, params: &[Node<Param>]) -> SyntaxResult<()> {
    let mut names = Vec::new();
    for param in params {
      bound_names(&param.stx.pat.stx.pat, &mut names);
    }
    self.declare_params(names)
  }

  /// `{ ... }` of a function whose parameters are already declared in the current scope.
  pub(super) fn parse_function_body(
    &mut self,
    params: &[Node<Param>],
  ) -> SyntaxResult<Vec<Node<Stmt>>> {
    let open = self.expect_punct("{")?;
    let mut body = Vec::new();
    while !self.is_punct("}") {
      body.push(self.parse_statement_list_item()?);
    }
    self.expect_punct("}")?;
    if has_use_strict(&body) && !params.iter().all(is_simple_param) {
      return Err(self.error(
        SyntaxErrorKind::Invalid("\"use strict\" is not allowed with non-simple parameters"),
        open,
      ));
    };
    Ok(body)
  }

  /// Parameters and body of any non-arrow function, parsed in `ctx`.
  fn parse_function(
    &mut self,
    start: usize,
    ctx: FnCtx,
    kind: MethodKind,
  ) -> SyntaxResult<Node<Function>> {
    let is_async = ctx.is_async;
    let generator = ctx.generator;
    let (params, body) = self.with_ctx(ctx, |p| {
      let params_start = p.start();
      let params = p.parse_params()?;
      let valid_arity = match kind {
        MethodKind::Method => true,
        MethodKind::Getter => params.is_empty(),
        MethodKind::Setter => params.len() == 1 && !params[0].stx.rest,
      };
      if !valid_arity {
        return Err(p.error(
          SyntaxErrorKind::Invalid("wrong number of parameters for an accessor"),
          p.loc_from(params_start),
        ));
      };
      p.push_scope(ScopeKind::Function);
      p.declare_param_list(&params)?;
      let body = p.parse_function_body(&params)?;
      p.pop_scope();
      Ok((params, body))
    })?;
    Ok(Node::new(self.loc_from(start), Function {
      arrow: false,
      is_async,
      generator,
      params,
      body: FunctionBody::Block(body),
    }))
  }

  /// `[async] function [*]`, returning whether it is async and a generator.
  fn parse_function_keyword(&mut self) -> SyntaxResult<(bool, bool)> {
    let is_async = self.eat_word("async")?;
    self.expect_word("function")?;
    let generator = self.eat_punct("*")?;
    Ok((is_async, generator))
  }

  fn parse_decl_name(&mut self) -> SyntaxResult<Node<DeclName>> {
    let (name, loc) = self.parse_binding_ident()?;
    Ok(Node::new(loc, DeclName { name }))
  }

  pub(super) fn parse_function_decl(&mut self, export: ExportMode) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    let (is_async, generator) = self.parse_function_keyword()?;
    let name = if self.is_any_word() {
      let name = self.parse_decl_name()?;
      self.declare_function(&name.stx.name, name.loc)?;
      if export == ExportMode::Named {
        self.add_export(&name.stx.name, name.loc)?;
      };
      Some(name)
    } else if export == ExportMode::Default {
      None
    } else {
      return Err(self.unexpected("a function name"));
    };
    let func = self.parse_function(start, function_ctx(is_async, generator), MethodKind::Method)?;
    Ok(Node::new(self.loc_from(start), FunctionDecl { export, name, func }).into_wrapped())
  }

  pub(super) fn parse_function_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    let (is_async, generator) = self.parse_function_keyword()?;
    let name = if self.is_any_word() {
      Some(self.parse_decl_name()?)
    } else {
      None
    };
    let func = self.parse_function(start, function_ctx(is_async, generator), MethodKind::Method)?;
    Ok(Node::new(self.loc_from(start), FunctionExpr { name, func }).into_wrapped())
  }

  pub(super) fn parse_class_decl(&mut self, export: ExportMode) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.expect_word("class")?;
    let name = if self.is_any_word() && !self.is_word("extends") {
      let name = self.parse_decl_name()?;
      self.declare_lexical(&name.stx.name, name.loc)?;
      if export == ExportMode::Named {
        self.add_export(&name.stx.name, name.loc)?;
      };
      Some(name)
    } else if export == ExportMode::Default {
      None
    } else {
      return Err(self.unexpected("a class name"));
    };
    let (extends, members) = self.parse_class_tail()?;
    Ok(
      Node::new(self.loc_from(start), ClassDecl {
        export,
        name,
        extends,
        members,
      })
      .into_wrapped(),
    )
  }

  pub(super) fn parse_class_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    self.expect_word("class")?;
    let name = if self.is_any_word() && !self.is_word("extends") {
      Some(self.parse_decl_name()?)
    } else {
      None
    };
    let (extends, members) = self.parse_class_tail()?;
    Ok(
      Node::new(self.loc_from(start), ClassExpr {
        name,
        extends,
        members,
      })
      .into_wrapped(),
    )
  }

  fn parse_class_tail(
    &mut self,
  ) -> SyntaxResult<(Option<Node<Expr>>, Vec<Node<ClassMember>>)> {
    let extends = if self.eat_word("extends")? {
      Some(self.parse_lhs()?)
    } else {
      None
    };
    let derived = extends.is_some();
    self.expect_punct("{")?;
    let mut members = Vec::new();
    let mut has_constructor = false;
    while !self.is_punct("}") {
      if self.eat_punct(";")? {
        continue;
      };
      members.push(self.parse_class_member(derived, &mut has_constructor)?);
    }
    self.expect_punct("}")?;
    Ok((extends, members))
  }

  /// Whether a leading `static` is a modifier rather than the member's name.
  fn is_static_modifier(&mut self) -> SyntaxResult<bool> {
    if !self.is_word("static") {
      return Ok(false);
    };
    let next = self.peek_next()?;
    Ok(!matches!(
      next.kind,
      TokenKind::Punct("(" | "=" | ";" | "}") | TokenKind::Eof
    ))
  }

  fn parse_class_member(
    &mut self,
    derived: bool,
    has_constructor: &mut bool,
  ) -> SyntaxResult<Node<ClassMember>> {
    let start = self.start();
    let is_static = self.is_static_modifier()?;
    if is_static {
      self.bump()?;
      if self.is_punct("{") {
        let ctx = FnCtx {
          super_prop: true,
          new_target: true,
          ..FnCtx::default()
        };
        let body = self.with_ctx(ctx, |p| {
          p.bump()?;
          p.push_scope(ScopeKind::Function);
          let mut body = Vec::new();
          while !p.is_punct("}") {
            body.push(p.parse_statement_list_item()?);
          }
          p.pop_scope();
          p.expect_punct("}")?;
          Ok(body)
        })?;
        return Ok(Node::new(self.loc_from(start), ClassMember::StaticBlock { body }));
      };
    };
    let (is_async, generator, kind) = self.parse_method_modifiers()?;
    let key_loc = self.token.loc;
    let key = self.parse_prop_key(true)?;
    if self.is_punct("(") {
      let is_constructor = !is_static && key.static_name() == Some("constructor");
      if is_constructor {
        if kind != MethodKind::Method || is_async || generator {
          return Err(self.error(
            SyntaxErrorKind::Invalid("a class constructor must be a plain method"),
            key_loc,
          ));
        };
        if *has_constructor {
          return Err(self.error(
            SyntaxErrorKind::Invalid("a class may only have one constructor"),
            key_loc,
          ));
        };
        *has_constructor = true;
      };
      self.check_class_key(&key, is_static, false, key_loc)?;
      let ctx = FnCtx {
        super_prop: true,
        super_call: is_constructor && derived,
        ..function_ctx(is_async, generator)
      };
      let func = self.parse_function(self.start(), ctx, kind)?;
      return Ok(Node::new(self.loc_from(start), ClassMember::Method {
        is_static,
        key,
        kind,
        func,
      }));
    };
    if is_async || generator || kind != MethodKind::Method {
      return Err(self.unexpected("`(`"));
    };
    self.check_class_key(&key, is_static, true, key_loc)?;
    let value = if self.eat_punct("=")? {
      let ctx = FnCtx {
        super_prop: true,
        new_target: true,
        ..FnCtx::default()
      };
      Some(self.with_ctx(ctx, |p| p.parse_assignment())?)
    } else {
      None
    };
    self.consume_semicolon()?;
    Ok(Node::new(self.loc_from(start), ClassMember::Field {
      is_static,
      key,
      value,
    }))
  }

  /// `async`, `get`, `set` and `*` before a method name. The words are names themselves when no
  /// name follows them, e.g. `{ get: 1 }` or `{ async() {} }`.
  fn parse_method_modifiers(&mut self) -> SyntaxResult<(bool, bool, MethodKind)> {
    let mut is_async = false;
    let mut kind = MethodKind::Method;
    let is_async_word = self.is_word("async");
    if is_async_word || self.is_word("get") || self.is_word("set") {
      let next = self.peek_next()?;
      let names_follow = match next.kind {
        TokenKind::Punct(p) => p == "[" || (is_async_word && p == "*"),
        TokenKind::Eof => false,
        _ => true,
      };
      if names_follow && !(is_async_word && next.nl_before) {
        if is_async_word {
          is_async = true;
        } else if self.is_word("get") {
          kind = MethodKind::Getter;
        } else {
          kind = MethodKind::Setter;
        };
        self.bump()?;
      };
    };
    let generator = self.eat_punct("*")?;
    Ok((is_async, generator, kind))
  }

  pub(super) fn parse_prop_key(&mut self, allow_private: bool) -> SyntaxResult<PropKey> {
    let key = match &self.token.kind {
      TokenKind::Word { name, .. } => PropKey::Ident(name.clone()),
      TokenKind::Str { value, .. } => PropKey::Str(value.clone()),
      TokenKind::Number(value) => PropKey::Number(*value),
      TokenKind::BigInt(value) => PropKey::BigInt(value.clone()),
      TokenKind::PrivateName(name) if allow_private => PropKey::Private(name.clone()),
      TokenKind::Punct("[") => {
        self.bump()?;
        let expr = self.with_in(|p| p.parse_assignment())?;
        self.expect_punct("]")?;
        return Ok(PropKey::Computed(expr));
      }
      _ => return Err(self.unexpected("a property name")),
    };
    self.bump()?;
    Ok(key)
  }

  pub(super) fn parse_object_member(&mut self) -> SyntaxResult<Node<ObjectMember>> {
    let start = self.start();
    if self.eat_punct("...")? {
      let value = self.parse_assignment_cover()?;
      return Ok(Node::new(self.loc_from(start), ObjectMember::Spread { value }));
    };
    let (is_async, generator, kind) = self.parse_method_modifiers()?;
    let key_token = self.token.clone();
    let key = self.parse_prop_key(false)?;
    if is_async || generator || kind != MethodKind::Method || self.is_punct("(") {
      let ctx = FnCtx {
        super_prop: true,
        ..function_ctx(is_async, generator)
      };
      let func = self.parse_function(self.start(), ctx, kind)?;
      return Ok(Node::new(self.loc_from(start), ObjectMember::Method {
        key,
        kind,
        func,
      }));
    };
    if self.eat_punct(":")? {
      let value = self.parse_assignment_cover()?;
      return Ok(Node::new(self.loc_from(start), ObjectMember::Prop { key, value }));
    };
    let TokenKind::Word { name, .. } = key_token.kind else {
      return Err(self.unexpected("`:`"));
    };
    let id_loc = key_token.loc;
    self.check_reference_name(&name, id_loc)?;
    if !self.is_punct("=") {
      return Ok(Node::new(self.loc_from(start), ObjectMember::Shorthand {
        id: Node::new(id_loc, Ident { name }),
      }));
    };
    // `{ a = 1 }` is only valid once this literal turns out to be a pattern.
    self.check_assignable_name(&name, id_loc)?;
    self.bump()?;
    let default = self.parse_assignment()?;
    let loc = self.loc_from(start);
    self.cover_inits.push(loc);
    let target = Node::new(id_loc, IdentPat { name: name.clone() }).into_wrapped();
    let value = Node::new(loc, AssignExpr {
      op: AssignOp::Assign,
      target,
      value: default,
    })
    .into_wrapped();
    Ok(Node::new(loc, ObjectMember::Prop {
      key: PropKey::Ident(name),
      value,
    }))
  }
}
