use super::scope::bound_names;
use super::scope::ScopeKind;
use super::Label;
use super::Parser;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::pat::BindingPat;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::BreakStmt;
use crate::ast::stmt::CatchClause;
use crate::ast::stmt::ContinueStmt;
use crate::ast::stmt::DebuggerStmt;
use crate::ast::stmt::Declarator;
use crate::ast::stmt::DoWhileStmt;
use crate::ast::stmt::EmptyStmt;
use crate::ast::stmt::ExportMode;
use crate::ast::stmt::ExprStmt;
use crate::ast::stmt::ForHead;
use crate::ast::stmt::ForInStmt;
use crate::ast::stmt::ForInit;
use crate::ast::stmt::ForOfStmt;
use crate::ast::stmt::ForStmt;
use crate::ast::stmt::IfStmt;
use crate::ast::stmt::LabeledStmt;
use crate::ast::stmt::ReturnStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::SwitchCase;
use crate::ast::stmt::SwitchStmt;
use crate::ast::stmt::ThrowStmt;
use crate::ast::stmt::TryStmt;
use crate::ast::stmt::VarDecl;
use crate::ast::stmt::VarKind;
use crate::ast::stmt::WhileStmt;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::lex::TokenKind;
use crate::loc::Loc;

type Declare<'a> = fn(&mut Parser<'a>, &str, Loc) -> SyntaxResult<()>;

impl<'a> Parser<'a> {
  /// A statement or a declaration, as allowed directly in blocks and function bodies.
  pub(super) fn parse_statement_list_item(&mut self) -> SyntaxResult<Node<Stmt>> {
    if self.is_word("function") || self.is_async_function()? {
      self.parse_function_decl(ExportMode::Local)
    } else if self.is_word("class") {
      self.parse_class_decl(ExportMode::Local)
    } else if self.is_word("let") || self.is_word("const") {
      self.parse_var_stmt(false)
    } else {
      self.parse_statement()
    }
  }

  /// A statement where declarations other than `var` are not allowed, e.g. the body of `if`.
  pub(super) fn parse_statement(&mut self) -> SyntaxResult<Node<Stmt>> {
    if self.is_any_word() && self.peek_next()?.kind == TokenKind::Punct(":") {
      return self.parse_labeled();
    };
    let is_loop = self.is_word("for") || self.is_word("while") || self.is_word("do");
    for label in self.ctx.labels.iter_mut().rev() {
      if !label.pending {
        break;
      };
      label.pending = false;
      label.is_loop = is_loop;
    }

    let start = self.start();
    let is_async_function = self.is_async_function()?;
    let word = match &self.token.kind {
      TokenKind::Word {
        name,
        escaped: false,
      } => name.as_str(),
      TokenKind::Punct("{") => return Ok(self.parse_block()?.into_wrapped()),
      TokenKind::Punct(";") => {
        self.bump()?;
        return Ok(Node::new(self.loc_from(start), EmptyStmt).into_wrapped());
      }
      _ => "",
    };
    match word {
      "var" => self.parse_var_stmt(false),
      "if" => self.parse_if(),
      "for" => self.parse_for(),
      "while" => self.parse_while(),
      "do" => self.parse_do_while(),
      "break" | "continue" => self.parse_jump(),
      "return" => self.parse_return(),
      "switch" => self.parse_switch(),
      "throw" => self.parse_throw(),
      "try" => self.parse_try(),
      "debugger" => {
        self.bump()?;
        self.consume_semicolon()?;
        Ok(Node::new(self.loc_from(start), DebuggerStmt).into_wrapped())
      }
      "with" => Err(self.error(
        SyntaxErrorKind::Invalid("`with` is not allowed in strict mode"),
        self.token.loc,
      )),
      "function" | "class" | "let" | "const" => Err(self.error(
        SyntaxErrorKind::Invalid("a declaration is not allowed as the body of a statement"),
        self.token.loc,
      )),
      _ if is_async_function => Err(self.error(
        SyntaxErrorKind::Invalid("a declaration is not allowed as the body of a statement"),
        self.token.loc,
      )),
      _ => {
        let expr = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Node::new(self.loc_from(start), ExprStmt { expr }).into_wrapped())
      }
    }
  }

  fn parse_labeled(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    let loc = self.token.loc;
    let TokenKind::Word { name, .. } = self.bump()?.kind else {
      return Err(self.unexpected("a label"));
    };
    self.check_reference_name(&name, loc)?;
    self.expect_punct(":")?;
    if self.ctx.labels.iter().any(|label| label.name == name) {
      return Err(self.error(SyntaxErrorKind::DuplicateLabel(name), loc));
    };
    self.ctx.labels.push(Label {
      name: name.clone(),
      is_loop: false,
      pending: true,
    });
    let body = self.parse_statement();
    self.ctx.labels.pop();
    Ok(
      Node::new(self.loc_from(start), LabeledStmt {
        label: name,
        body: body?,
      })
      .into_wrapped(),
    )
  }

  pub(super) fn parse_block(&mut self) -> SyntaxResult<Node<BlockStmt>> {
    self.push_scope(ScopeKind::Block);
    let block = self.parse_block_in_scope()?;
    self.pop_scope();
    Ok(block)
  }

  /// `{ ... }` declaring into the current scope.
  fn parse_block_in_scope(&mut self) -> SyntaxResult<Node<BlockStmt>> {
    let start = self.start();
    self.expect_punct("{")?;
    let mut body = Vec::new();
    while !self.is_punct("}") {
      body.push(self.parse_statement_list_item()?);
    }
    self.expect_punct("}")?;
    Ok(Node::new(self.loc_from(start), BlockStmt { body }))
  }

  pub(super) fn parse_var_stmt(&mut self, export: bool) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    let mut decl = self.with_in(|p| p.parse_var_decl(export, true))?;
    self.consume_semicolon()?;
    decl.loc = self.loc_from(start);
    Ok(decl.into_wrapped())
  }

  /// `var`, `let` or `const` and its declarators. A `for` head is not `complete`, as it may still
  /// turn out to be the left side of `in` or `of`.
  fn parse_var_decl(&mut self, export: bool, complete: bool) -> SyntaxResult<Node<VarDecl>> {
    let start = self.start();
    let kind = if self.eat_word("var")? {
      VarKind::Var
    } else if self.eat_word("let")? {
      VarKind::Let
    } else {
      self.expect_word("const")?;
      VarKind::Const
    };
    let declare: Declare<'a> = match kind {
      VarKind::Var => Parser::declare_var,
      VarKind::Let | VarKind::Const => Parser::declare_lexical,
    };
    let mut declarators = Vec::new();
    loop {
      let pat = self.parse_binding_pat()?;
      self.declare_pattern(&pat, declare)?;
      if export {
        self.add_exported_pattern(&pat)?;
      };
      let init = if self.eat_punct("=")? {
        Some(self.parse_assignment()?)
      } else {
        None
      };
      let declarator = Declarator {
        pat: Node::new(pat.loc, BindingPat { pat }),
        init,
      };
      if complete {
        self.check_declarator_init(kind, &declarator)?;
      };
      declarators.push(declarator);
      if !self.eat_punct(",")? {
        break;
      };
    }
    Ok(Node::new(self.loc_from(start), VarDecl {
      export,
      kind,
      declarators,
    }))
  }

  fn check_declarator_init(&self, kind: VarKind, declarator: &Declarator) -> SyntaxResult<()> {
    if declarator.init.is_some() {
      return Ok(());
    };
    let message = if kind == VarKind::Const {
      "a `const` declaration needs an initializer"
    } else if declarator.pat.stx.ident_name().is_none() {
      "a destructuring declaration needs an initializer"
    } else {
      return Ok(());
    };
    Err(self.error(SyntaxErrorKind::Invalid(message), declarator.pat.loc))
  }

  fn parse_paren_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    self.expect_punct("(")?;
    let expr = self.with_in(|p| p.parse_expression())?;
    self.expect_punct(")")?;
    Ok(expr)
  }

  fn parse_if(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.bump()?;
    let test = self.parse_paren_expr()?;
    let consequent = self.parse_statement()?;
    let alternate = if self.eat_word("else")? {
      Some(self.parse_statement()?)
    } else {
      None
    };
    Ok(
      Node::new(self.loc_from(start), IfStmt {
        test,
        consequent,
        alternate,
      })
      .into_wrapped(),
    )
  }

  fn parse_loop_body(&mut self) -> SyntaxResult<Node<Stmt>> {
    self.ctx.loop_depth += 1;
    self.ctx.breakable_depth += 1;
    let body = self.parse_statement();
    self.ctx.loop_depth -= 1;
    self.ctx.breakable_depth -= 1;
    body
  }

  fn parse_while(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.bump()?;
    let test = self.parse_paren_expr()?;
    let body = self.parse_loop_body()?;
    Ok(Node::new(self.loc_from(start), WhileStmt { test, body }).into_wrapped())
  }

  fn parse_do_while(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.bump()?;
    let body = self.parse_loop_body()?;
    self.expect_word("while")?;
    let test = self.parse_paren_expr()?;
    // A semicolon is always inserted after `do ... while (...)`.
    self.eat_punct(";")?;
    Ok(Node::new(self.loc_from(start), DoWhileStmt { body, test }).into_wrapped())
  }

  fn parse_for(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.bump()?;
    let is_await = self.ctx.is_async && self.eat_word("await")?;
    self.expect_punct("(")?;
    // Declarations in the head are visible to the body only.
    self.push_scope(ScopeKind::Block);
    let stmt = self.parse_for_rest(start, is_await)?;
    self.pop_scope();
    Ok(stmt)
  }

  fn parse_for_rest(&mut self, start: usize, is_await: bool) -> SyntaxResult<Node<Stmt>> {
    let init = if self.is_punct(";") {
      ForInit::None
    } else if self.is_word("var") || self.is_word("let") || self.is_word("const") {
      let decl = self.with_no_in(|p| p.parse_var_decl(false, false))?;
      if self.is_word("of") || self.is_word("in") {
        let single = match decl.stx.declarators.as_slice() {
          [declarator] => declarator.init.is_none(),
          _ => false,
        };
        if !single {
          return Err(self.error(
            SyntaxErrorKind::Invalid(
              "the head of `for...in` or `for...of` declares one binding without an initializer",
            ),
            decl.loc,
          ));
        };
        return self.parse_for_in_of(start, is_await, ForHead::Var(decl));
      };
      for declarator in decl.stx.declarators.iter() {
        self.check_declarator_init(decl.stx.kind, declarator)?;
      }
      ForInit::Var(decl)
    } else {
      let mark = self.cover_inits.len();
      let expr = self.with_no_in(|p| p.parse_expression_cover())?;
      if self.is_word("of") || self.is_word("in") {
        let pat = self.expr_to_pat(expr)?;
        self.cover_inits.truncate(mark);
        return self.parse_for_in_of(start, is_await, ForHead::Pat(pat));
      };
      self.check_cover(mark)?;
      ForInit::Expr(expr)
    };
    if is_await {
      return Err(self.unexpected("`of`"));
    };
    self.expect_punct(";")?;
    let test = if self.is_punct(";") {
      None
    } else {
      Some(self.with_in(|p| p.parse_expression())?)
    };
    self.expect_punct(";")?;
    let update = if self.is_punct(")") {
      None
    } else {
      Some(self.with_in(|p| p.parse_expression())?)
    };
    self.expect_punct(")")?;
    let body = self.parse_loop_body()?;
    Ok(
      Node::new(self.loc_from(start), ForStmt {
        init,
        test,
        update,
        body,
      })
      .into_wrapped(),
    )
  }

  fn parse_for_in_of(
    &mut self,
    start: usize,
    is_await: bool,
    head: ForHead,
  ) -> SyntaxResult<Node<Stmt>> {
    if self.eat_word("of")? {
      let iterable = self.with_in(|p| p.parse_assignment())?;
      self.expect_punct(")")?;
      let body = self.parse_loop_body()?;
      return Ok(
        Node::new(self.loc_from(start), ForOfStmt {
          is_await,
          head,
          iterable,
          body,
        })
        .into_wrapped(),
      );
    };
    if is_await {
      return Err(self.unexpected("`of`"));
    };
    self.expect_word("in")?;
    let object = self.with_in(|p| p.parse_expression())?;
    self.expect_punct(")")?;
    let body = self.parse_loop_body()?;
    Ok(Node::new(self.loc_from(start), ForInStmt { head, object, body }).into_wrapped())
  }

  /// `break` and `continue`, with an optional label on the same line.
  fn parse_jump(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    let is_break = self.is_word("break");
    let keyword_loc = self.bump()?.loc;
    let label = match &self.token.kind {
      TokenKind::Word { name, .. } if !self.token.nl_before => {
        let name = name.clone();
        let loc = self.bump()?.loc;
        let target = self.ctx.labels.iter().find(|label| label.name == name);
        match target {
          Some(target) if is_break || target.is_loop => {}
          _ => return Err(self.error(SyntaxErrorKind::UnknownLabel(name), loc)),
        };
        Some(name)
      }
      _ => {
        let depth = if is_break {
          self.ctx.breakable_depth
        } else {
          self.ctx.loop_depth
        };
        if depth == 0 {
          let message = if is_break {
            "`break` is only allowed in a loop or `switch`"
          } else {
            "`continue` is only allowed in a loop"
          };
          return Err(self.error(SyntaxErrorKind::Invalid(message), keyword_loc));
        };
        None
      }
    };
    self.consume_semicolon()?;
    let loc = self.loc_from(start);
    Ok(if is_break {
      Node::new(loc, BreakStmt { label }).into_wrapped()
    } else {
      Node::new(loc, ContinueStmt { label }).into_wrapped()
    })
  }

  fn parse_return(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    let loc = self.bump()?.loc;
    if !self.ctx.in_function {
      return Err(self.error(
        SyntaxErrorKind::Invalid("`return` is only allowed in functions"),
        loc,
      ));
    };
    let value = if self.token.nl_before || self.is_eof() || self.is_punct(";") || self.is_punct("}")
    {
      None
    } else {
      Some(self.parse_expression()?)
    };
    self.consume_semicolon()?;
    Ok(Node::new(self.loc_from(start), ReturnStmt { value }).into_wrapped())
  }

  fn parse_switch(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.bump()?;
    let discriminant = self.parse_paren_expr()?;
    self.expect_punct("{")?;
    self.push_scope(ScopeKind::Block);
    self.ctx.breakable_depth += 1;
    let cases = self.parse_switch_cases();
    self.ctx.breakable_depth -= 1;
    self.pop_scope();
    let cases = cases?;
    self.expect_punct("}")?;
    Ok(
      Node::new(self.loc_from(start), SwitchStmt {
        discriminant,
        cases,
      })
      .into_wrapped(),
    )
  }

  fn parse_switch_cases(&mut self) -> SyntaxResult<Vec<Node<SwitchCase>>> {
    let mut cases = Vec::new();
    let mut has_default = false;
    while !self.is_punct("}") {
      let start = self.start();
      let test = if self.eat_word("case")? {
        Some(self.with_in(|p| p.parse_expression())?)
      } else {
        let loc = self.expect_word("default")?;
        if has_default {
          return Err(self.error(
            SyntaxErrorKind::Invalid("a `switch` may only have one `default`"),
            loc,
          ));
        };
        has_default = true;
        None
      };
      self.expect_punct(":")?;
      let mut body = Vec::new();
      while !self.is_punct("}") && !self.is_word("case") && !self.is_word("default") {
        body.push(self.parse_statement_list_item()?);
      }
      cases.push(Node::new(self.loc_from(start), SwitchCase { test, body }));
    }
    Ok(cases)
  }

  fn parse_throw(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.bump()?;
    if self.token.nl_before {
      return Err(self.error(
        SyntaxErrorKind::Invalid("no line break is allowed after `throw`"),
        self.token.loc,
      ));
    };
    let value = self.parse_expression()?;
    self.consume_semicolon()?;
    Ok(Node::new(self.loc_from(start), ThrowStmt { value }).into_wrapped())
  }

  fn parse_try(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.bump()?;
    let block = self.parse_block()?;
    let handler = if self.is_word("catch") {
      Some(self.parse_catch()?)
    } else {
      None
    };
    let finalizer = if self.eat_word("finally")? {
      Some(self.parse_block()?)
    } else {
      None
    };
    if handler.is_none() && finalizer.is_none() {
      return Err(self.unexpected("`catch` or `finally`"));
    };
    Ok(
      Node::new(self.loc_from(start), TryStmt {
        block,
        handler,
        finalizer,
      })
      .into_wrapped(),
    )
  }

  /// The parameter and the body of a `catch` share one scope, so `catch (e) { let e; }` is a
  /// redeclaration.
  fn parse_catch(&mut self) -> SyntaxResult<Node<CatchClause>> {
    let start = self.start();
    self.bump()?;
    self.push_scope(ScopeKind::Block);
    let param = if self.eat_punct("(")? {
      let pat = self.parse_binding_pat()?;
      self.expect_punct(")")?;
      let mut names = Vec::new();
      bound_names(&pat, &mut names);
      self.declare_catch_params(names)?;
      Some(Node::new(pat.loc, BindingPat { pat }))
    } else {
      None
    };
    let body = self.parse_block_in_scope()?;
    self.pop_scope();
    Ok(Node::new(self.loc_from(start), CatchClause { param, body }))
  }
}

