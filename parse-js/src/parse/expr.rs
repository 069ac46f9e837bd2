use super::scope::ScopeKind;
use super::FnCtx;
use super::Parser;
use crate::ast::expr::Arg;
use crate::ast::expr::ArrayElem;
use crate::ast::expr::ArrayExpr;
use crate::ast::expr::ArrowExpr;
use crate::ast::expr::AssignExpr;
use crate::ast::expr::BigIntLit;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::BoolLit;
use crate::ast::expr::CallExpr;
use crate::ast::expr::ChainExpr;
use crate::ast::expr::CondExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::Ident;
use crate::ast::expr::ImportCall;
use crate::ast::expr::ImportMeta;
use crate::ast::expr::IndexExpr;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::NewExpr;
use crate::ast::expr::NewTarget;
use crate::ast::expr::NullLit;
use crate::ast::expr::NumberLit;
use crate::ast::expr::ObjectExpr;
use crate::ast::expr::RegexLit;
use crate::ast::expr::SeqExpr;
use crate::ast::expr::StrLit;
use crate::ast::expr::SuperExpr;
use crate::ast::expr::TaggedTemplateExpr;
use crate::ast::expr::TemplateLit;
use crate::ast::expr::TemplatePart;
use crate::ast::expr::ThisExpr;
use crate::ast::expr::UnaryExpr;
use crate::ast::expr::UpdateExpr;
use crate::ast::expr::YieldExpr;
use crate::ast::func::Function;
use crate::ast::func::FunctionBody;
use crate::ast::func::Param;
use crate::ast::node::Node;
use crate::ast::node::Parenthesized;
use crate::ast::pat::BindingPat;
use crate::ast::pat::IdentPat;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::lex::TokenKind;
use crate::loc::Loc;
use crate::operator::AssignOp;
use crate::operator::BinaryOp;
use crate::operator::UnaryOp;
use crate::operator::UpdateOp;

/// `a ?? b || c` and friends need parentheses around one side.
fn mixes_nullish(op: BinaryOp, operand: &Node<Expr>) -> bool {
  if operand.is_parenthesized() {
    return false;
  };
  match operand.stx.as_ref() {
    Expr::Binary(inner) => {
      let inner = inner.stx.op;
      (op == BinaryOp::Nullish && inner.is_logical_and_or())
        || (op.is_logical_and_or() && inner == BinaryOp::Nullish)
    }
    _ => false,
  }
}

impl<'a> Parser<'a> {
  pub(super) fn parse_expression(&mut self) -> SyntaxResult<Node<Expr>> {
    let mark = self.cover_inits.len();
    let expr = self.parse_expression_cover()?;
    self.check_cover(mark)?;
    Ok(expr)
  }

  /// An expression that may still turn out to be a pattern, e.g. the head of `for (... of x)`.
  pub(super) fn parse_expression_cover(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    let first = self.parse_assignment_cover()?;
    if !self.is_punct(",") {
      return Ok(first);
    };
    let mut exprs = vec![first];
    while self.eat_punct(",")? {
      exprs.push(self.parse_assignment()?);
    }
    Ok(Node::new(self.loc_from(start), SeqExpr { exprs }).into_wrapped())
  }

  pub(super) fn parse_assignment(&mut self) -> SyntaxResult<Node<Expr>> {
    let mark = self.cover_inits.len();
    let expr = self.parse_assignment_cover()?;
    self.check_cover(mark)?;
    Ok(expr)
  }

  /// Used for array elements and property values, which belong to an enclosing literal that may
  /// itself become a pattern.
  pub(super) fn parse_assignment_cover(&mut self) -> SyntaxResult<Node<Expr>> {
    if self.ctx.generator && self.is_word("yield") {
      return self.parse_yield();
    };
    if let Some(arrow) = self.try_parse_arrow()? {
      return Ok(arrow);
    };
    let start = self.start();
    let mark = self.cover_inits.len();
    let lhs = self.parse_conditional()?;
    let Some(op) = self.punct().and_then(AssignOp::from_token) else {
      return Ok(lhs);
    };
    let target = if op == AssignOp::Assign {
      let pat = self.expr_to_pat(lhs)?;
      self.cover_inits.truncate(mark);
      pat
    } else {
      self.simple_target(lhs)?
    };
    self.bump()?;
    let value = self.parse_assignment()?;
    Ok(Node::new(self.loc_from(start), AssignExpr { op, target, value }).into_wrapped())
  }

  fn parse_yield(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    self.bump()?;
    let delegate = !self.token.nl_before && self.eat_punct("*")?;
    let ends = self.token.nl_before
      || self.is_eof()
      || matches!(self.punct(), Some(")" | "]" | "}" | "," | ";" | ":"));
    let arg = if delegate || !ends {
      Some(self.parse_assignment()?)
    } else {
      None
    };
    Ok(Node::new(self.loc_from(start), YieldExpr { delegate, arg }).into_wrapped())
  }

  fn try_parse_arrow(&mut self) -> SyntaxResult<Option<Node<Expr>>> {
    let is_async = match &self.token.kind {
      TokenKind::Punct("(") => false,
      TokenKind::Word { .. } => {
        let next = self.peek_next()?;
        match next.kind {
          TokenKind::Punct("=>") => false,
          TokenKind::Word { .. } | TokenKind::Punct("(")
            if self.is_word("async") && !next.nl_before =>
          {
            true
          }
          _ => return Ok(None),
        }
      }
      _ => return Ok(None),
    };
    let start = self.start();
    let cp = self.checkpoint();
    match self.parse_arrow_head(is_async) {
      Ok(Some(params)) => self.parse_arrow_body(start, is_async, params).map(Some),
      Ok(None) | Err(_) => {
        self.restore(cp);
        Ok(None)
      }
    }
  }

  /// Parameters up to and including `=>`, or `None` if this is not an arrow function after all.
  fn parse_arrow_head(&mut self, is_async: bool) -> SyntaxResult<Option<Vec<Node<Param>>>> {
    if is_async {
      self.bump()?;
    };
    let params = if self.is_punct("(") {
      self.parse_params()?
    } else {
      let (name, loc) = self.parse_binding_ident()?;
      let pat = Node::new(loc, IdentPat { name }).into_wrapped();
      vec![Node::new(loc, Param {
        rest: false,
        pat: Node::new(loc, BindingPat { pat }),
        default: None,
      })]
    };
    if !self.is_punct("=>") || self.token.nl_before {
      return Ok(None);
    };
    self.bump()?;
    Ok(Some(params))
  }

  fn parse_arrow_body(
    &mut self,
    start: usize,
    is_async: bool,
    params: Vec<Node<Param>>,
  ) -> SyntaxResult<Node<Expr>> {
    // Arrow functions see the enclosing `super` and `new.target`.
    let ctx = FnCtx {
      in_function: true,
      is_async,
      super_prop: self.ctx.super_prop,
      super_call: self.ctx.super_call,
      new_target: self.ctx.new_target,
      ..FnCtx::default()
    };
    let no_in = self.no_in;
    let body = self.with_ctx(ctx, |p| {
      p.push_scope(ScopeKind::Function);
      p.declare_param_list(&params)?;
      let body = if p.is_punct("{") {
        FunctionBody::Block(p.parse_function_body(&params)?)
      } else {
        p.no_in = no_in;
        FunctionBody::Expr(p.parse_assignment()?)
      };
      p.pop_scope();
      Ok(body)
    })?;
    let func = Node::new(self.loc_from(start), Function {
      arrow: true,
      is_async,
      generator: false,
      params,
      body,
    });
    Ok(Node::new(self.loc_from(start), ArrowExpr { func }).into_wrapped())
  }

  fn parse_conditional(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    let test = self.parse_binary(BinaryOp::Or.prec())?;
    if !self.eat_punct("?")? {
      return Ok(test);
    };
    let consequent = self.with_in(|p| p.parse_assignment())?;
    self.expect_punct(":")?;
    let alternate = self.parse_assignment()?;
    Ok(
      Node::new(self.loc_from(start), CondExpr {
        test,
        consequent,
        alternate,
      })
      .into_wrapped(),
    )
  }

  fn binary_op(&self) -> Option<BinaryOp> {
    match &self.token.kind {
      TokenKind::Punct(p) => BinaryOp::from_token(p),
      TokenKind::Word {
        name,
        escaped: false,
      } if name == "instanceof" || (name == "in" && !self.no_in) => BinaryOp::from_token(name),
      _ => None,
    }
  }

  /// Precedence climbing over binary operators that bind at least as tightly as `min_prec`.
  fn parse_binary(&mut self, min_prec: u8) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    let mut left = self.parse_unary()?;
    while let Some(op) = self.binary_op() {
      let prec = op.prec();
      if prec < min_prec {
        break;
      };
      if op == BinaryOp::Exp
        && !left.is_parenthesized()
        && matches!(left.stx.as_ref(), Expr::Unary(_))
      {
        return Err(self.error(SyntaxErrorKind::UnparenthesizedUnaryBase, left.loc));
      };
      self.bump()?;
      let right = self.parse_binary(if op.is_right_assoc() { prec } else { prec + 1 })?;
      if mixes_nullish(op, &left) || mixes_nullish(op, &right) {
        return Err(self.error(SyntaxErrorKind::MixedNullish, Loc(start, right.loc.1)));
      };
      left = Node::new(self.loc_from(start), BinaryExpr { op, left, right }).into_wrapped();
    }
    Ok(left)
  }

  fn parse_unary(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    let op = match &self.token.kind {
      TokenKind::Punct(p) => UnaryOp::from_token(p),
      TokenKind::Word {
        name,
        escaped: false,
      } => match name.as_str() {
        "typeof" | "void" | "delete" => UnaryOp::from_token(name),
        "await" if self.ctx.is_async => Some(UnaryOp::Await),
        _ => None,
      },
      _ => None,
    };
    if let Some(op) = op {
      self.bump()?;
      let arg = self.parse_unary()?;
      if op == UnaryOp::Delete {
        self.check_delete(&arg)?;
      };
      return Ok(Node::new(self.loc_from(start), UnaryExpr { op, arg }).into_wrapped());
    };
    if let Some(op) = self.update_op() {
      self.bump()?;
      let arg = self.parse_unary()?;
      self.check_simple_target(&arg)?;
      return Ok(
        Node::new(self.loc_from(start), UpdateExpr {
          op,
          prefix: true,
          arg,
        })
        .into_wrapped(),
      );
    };
    let arg = self.parse_lhs()?;
    match self.update_op() {
      Some(op) if !self.token.nl_before => {
        self.check_simple_target(&arg)?;
        self.bump()?;
        Ok(
          Node::new(self.loc_from(start), UpdateExpr {
            op,
            prefix: false,
            arg,
          })
          .into_wrapped(),
        )
      }
      _ => Ok(arg),
    }
  }

  fn update_op(&self) -> Option<UpdateOp> {
    match self.punct() {
      Some("++") => Some(UpdateOp::Inc),
      Some("--") => Some(UpdateOp::Dec),
      _ => None,
    }
  }

  fn check_delete(&self, arg: &Node<Expr>) -> SyntaxResult<()> {
    let message = match arg.stx.as_ref() {
      Expr::Ident(_) => "cannot delete an identifier in strict mode",
      Expr::Member(member) if member.stx.prop.starts_with('#') => {
        "cannot delete a private field"
      }
      _ => return Ok(()),
    };
    Err(self.error(SyntaxErrorKind::Invalid(message), arg.loc))
  }

  /// Member accesses, calls and tagged templates, e.g. everything that can be assigned to.
  pub(super) fn parse_lhs(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    let base = self.parse_member_base()?;
    self.parse_call_tail(start, base, true)
  }

  fn parse_member_base(&mut self) -> SyntaxResult<Node<Expr>> {
    if self.is_word("new") {
      self.parse_new()
    } else if self.is_word("super") {
      self.parse_super()
    } else if self.is_word("import") {
      self.parse_import_expr()
    } else {
      self.parse_primary()
    }
  }

  fn parse_new(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    self.bump()?;
    if self.eat_punct(".")? {
      let loc = self.expect_word("target")?;
      if !self.ctx.new_target {
        return Err(self.error(
          SyntaxErrorKind::Invalid("`new.target` is only allowed in functions"),
          Loc(start, loc.1),
        ));
      };
      return Ok(Node::new(self.loc_from(start), NewTarget).into_wrapped());
    };
    if self.is_word("import") {
      return Err(self.error(
        SyntaxErrorKind::Invalid("`import` cannot be called with `new`"),
        self.token.loc,
      ));
    };
    let callee_start = self.start();
    let callee = self.parse_member_base()?;
    let callee = self.parse_call_tail(callee_start, callee, false)?;
    let args = if self.is_punct("(") {
      self.parse_args()?
    } else {
      Vec::new()
    };
    Ok(Node::new(self.loc_from(start), NewExpr { callee, args }).into_wrapped())
  }

  fn parse_super(&mut self) -> SyntaxResult<Node<Expr>> {
    let loc = self.bump()?.loc;
    let allowed = match self.punct() {
      Some("(") => self.ctx.super_call,
      Some("." | "[") => self.ctx.super_prop,
      _ => false,
    };
    if !allowed {
      return Err(self.error(SyntaxErrorKind::Invalid("`super` is not allowed here"), loc));
    };
    Ok(Node::new(loc, SuperExpr).into_wrapped())
  }

  fn parse_import_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    let loc = self.bump()?.loc;
    if self.eat_punct(".")? {
      self.expect_word("meta")?;
      return Ok(Node::new(self.loc_from(start), ImportMeta).into_wrapped());
    };
    if !self.eat_punct("(")? {
      return Err(self.error(
        SyntaxErrorKind::Invalid("import declarations may only appear at the top level"),
        loc,
      ));
    };
    let (module, options) = self.with_in(|p| {
      let module = p.parse_assignment()?;
      let options = if p.eat_punct(",")? && !p.is_punct(")") {
        let options = p.parse_assignment()?;
        p.eat_punct(",")?;
        Some(options)
      } else {
        None
      };
      Ok((module, options))
    })?;
    self.expect_punct(")")?;
    Ok(Node::new(self.loc_from(start), ImportCall { module, options }).into_wrapped())
  }

  /// Everything after the base of a member expression. A `new` callee cannot contain calls.
  fn parse_call_tail(
    &mut self,
    start: usize,
    mut expr: Node<Expr>,
    allow_calls: bool,
  ) -> SyntaxResult<Node<Expr>> {
    let mut in_chain = false;
    loop {
      let optional = self.is_punct("?.");
      if optional {
        if !allow_calls {
          return Err(self.error(
            SyntaxErrorKind::Invalid("an optional chain cannot be used with `new`"),
            self.token.loc,
          ));
        };
        self.bump()?;
        in_chain = true;
      };
      expr = match self.punct() {
        Some(".") if !optional => {
          self.bump()?;
          self.parse_member_prop(start, expr, false)?
        }
        Some("[") => {
          self.bump()?;
          let index = self.with_in(|p| p.parse_expression())?;
          self.expect_punct("]")?;
          Node::new(self.loc_from(start), IndexExpr {
            optional,
            object: expr,
            index,
          })
          .into_wrapped()
        }
        Some("(") if allow_calls => {
          let args = self.parse_args()?;
          Node::new(self.loc_from(start), CallExpr {
            optional,
            callee: expr,
            args,
          })
          .into_wrapped()
        }
        _ if optional => self.parse_member_prop(start, expr, true)?,
        _ if matches!(self.token.kind, TokenKind::Template { .. }) => {
          if in_chain {
            return Err(self.error(
              SyntaxErrorKind::Invalid("an optional chain cannot be used as a template tag"),
              self.token.loc,
            ));
          };
          let parts = self.parse_template_parts(true)?;
          Node::new(self.loc_from(start), TaggedTemplateExpr { tag: expr, parts }).into_wrapped()
        }
        _ => break,
      };
    }
    if in_chain {
      expr = Node::new(expr.loc, ChainExpr { expr }).into_wrapped();
    };
    Ok(expr)
  }

  fn parse_member_prop(
    &mut self,
    start: usize,
    object: Node<Expr>,
    optional: bool,
  ) -> SyntaxResult<Node<Expr>> {
    let prop = match &self.token.kind {
      TokenKind::Word { name, .. } => name.clone(),
      TokenKind::PrivateName(name) => format!("#{name}"),
      _ => return Err(self.unexpected("a property name")),
    };
    self.bump()?;
    Ok(
      Node::new(self.loc_from(start), MemberExpr {
        optional,
        object,
        prop,
      })
      .into_wrapped(),
    )
  }

  pub(super) fn parse_args(&mut self) -> SyntaxResult<Vec<Arg>> {
    self.expect_punct("(")?;
    let args = self.with_in(|p| {
      let mut args = Vec::new();
      while !p.is_punct(")") {
        let spread = p.eat_punct("...")?;
        let value = p.parse_assignment()?;
        args.push(Arg { spread, value });
        if !p.is_punct(")") {
          p.expect_punct(",")?;
        };
      }
      Ok(args)
    })?;
    self.expect_punct(")")?;
    Ok(args)
  }

  fn parse_primary(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    let loc = self.token.loc;
    match &self.token.kind {
      TokenKind::Word { name, escaped } => {
        let name = name.clone();
        if !*escaped {
          match name.as_str() {
            "this" => {
              self.bump()?;
              return Ok(Node::new(loc, ThisExpr).into_wrapped());
            }
            "null" => {
              self.bump()?;
              return Ok(Node::new(loc, NullLit).into_wrapped());
            }
            "true" | "false" => {
              self.bump()?;
              let value = name == "true";
              return Ok(Node::new(loc, BoolLit { value }).into_wrapped());
            }
            "function" => return self.parse_function_expr(),
            "class" => return self.parse_class_expr(),
            "async" if self.is_async_function()? => return self.parse_function_expr(),
            _ => {}
          };
        };
        self.check_reference_name(&name, loc)?;
        self.bump()?;
        Ok(Node::new(loc, Ident { name }).into_wrapped())
      }
      TokenKind::Number(value) => {
        let value = *value;
        self.bump()?;
        Ok(Node::new(loc, NumberLit { value }).into_wrapped())
      }
      TokenKind::BigInt(value) => {
        let value = value.clone();
        self.bump()?;
        Ok(Node::new(loc, BigIntLit { value }).into_wrapped())
      }
      TokenKind::Str { value, raw } => {
        let lit = StrLit {
          value: value.clone(),
          raw: raw.clone(),
        };
        self.bump()?;
        Ok(Node::new(loc, lit).into_wrapped())
      }
      TokenKind::Template { .. } => {
        let parts = self.parse_template_parts(false)?;
        Ok(Node::new(self.loc_from(start), TemplateLit { parts }).into_wrapped())
      }
      TokenKind::Punct("(") => self.parse_paren(),
      TokenKind::Punct("[") => self.parse_array(),
      TokenKind::Punct("{") => self.parse_object(),
      TokenKind::Punct("/" | "/=") => {
        let nl_before = self.token.nl_before;
        self.token = self.lexer.regex(start, nl_before)?;
        match self.bump()?.kind {
          TokenKind::Regex { pattern, flags } => {
            Ok(Node::new(self.loc_from(start), RegexLit { pattern, flags }).into_wrapped())
          }
          _ => Err(self.error(SyntaxErrorKind::Unterminated("regular expression"), loc)),
        }
      }
      _ => Err(self.unexpected("an expression")),
    }
  }

  fn parse_paren(&mut self) -> SyntaxResult<Node<Expr>> {
    self.bump()?;
    let mut expr = self.with_in(|p| p.parse_expression())?;
    self.expect_punct(")")?;
    expr.assoc.set(Parenthesized);
    Ok(expr)
  }

  fn parse_array(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    self.bump()?;
    let elements = self.with_in(|p| {
      let mut elements = Vec::new();
      while !p.is_punct("]") {
        if p.eat_punct(",")? {
          elements.push(ArrayElem::Hole);
          continue;
        };
        let elem = if p.eat_punct("...")? {
          ArrayElem::Spread(p.parse_assignment_cover()?)
        } else {
          ArrayElem::Single(p.parse_assignment_cover()?)
        };
        elements.push(elem);
        if !p.is_punct("]") {
          p.expect_punct(",")?;
        };
      }
      Ok(elements)
    })?;
    self.expect_punct("]")?;
    Ok(Node::new(self.loc_from(start), ArrayExpr { elements }).into_wrapped())
  }

  fn parse_object(&mut self) -> SyntaxResult<Node<Expr>> {
    let start = self.start();
    self.bump()?;
    let members = self.with_in(|p| {
      let mut members = Vec::new();
      while !p.is_punct("}") {
        members.push(p.parse_object_member()?);
        if !p.is_punct("}") {
          p.expect_punct(",")?;
        };
      }
      Ok(members)
    })?;
    self.expect_punct("}")?;
    Ok(Node::new(self.loc_from(start), ObjectExpr { members }).into_wrapped())
  }

  /// The chunks and substitutions of a template, starting at its first chunk. Only tagged
  /// templates may contain malformed escapes.
  pub(super) fn parse_template_parts(&mut self, tagged: bool) -> SyntaxResult<Vec<TemplatePart>> {
    let mut parts = Vec::new();
    loop {
      let (raw, tail, valid_escapes) = match &self.token.kind {
        TokenKind::Template {
          raw,
          tail,
          valid_escapes,
        } => (raw.clone(), *tail, *valid_escapes),
        _ => return Err(self.unexpected("a template")),
      };
      if !tagged && !valid_escapes {
        return Err(self.error(SyntaxErrorKind::InvalidEscape, self.token.loc));
      };
      self.bump()?;
      parts.push(TemplatePart::Raw(raw));
      if tail {
        return Ok(parts);
      };
      let expr = self.with_in(|p| p.parse_expression())?;
      parts.push(TemplatePart::Expr(expr));
      if !self.is_punct("}") {
        return Err(self.unexpected("`}`"));
      };
      let close = self.token.loc.0;
      let nl_before = self.token.nl_before;
      self.token = self.lexer.template_continuation(close, nl_before)?;
    }
  }
}
