use super::scope::ScopeKind;
use super::Parser;
use crate::ast::module::ExportClause;
use crate::ast::module::ExportListStmt;
use crate::ast::module::ExportSpecifier;
use crate::ast::module::ImportAttribute;
use crate::ast::module::ImportClause;
use crate::ast::module::ImportSpecifier;
use crate::ast::module::ImportStmt;
use crate::ast::module::Module;
use crate::ast::module::ModuleName;
use crate::ast::node::Node;
use crate::ast::pat::IdentPat;
use crate::ast::stmt::ExportDefaultExpr;
use crate::ast::stmt::ExportMode;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::lex::TokenKind;
use crate::loc::Loc;

impl<'a> Parser<'a> {
  pub fn parse_module(mut self) -> SyntaxResult<Node<Module>> {
    self.push_scope(ScopeKind::Module);
    let mut body = Vec::new();
    while !self.is_eof() {
      body.push(self.parse_module_item()?);
    }
    self.check_export_refs()?;
    let loc = Loc(0, self.lexer.source().len());
    Ok(Node::new(loc, Module {
      hashbang: self.hashbang.take(),
      body,
    }))
  }

  fn parse_module_item(&mut self) -> SyntaxResult<Node<Stmt>> {
    if self.is_word("import") {
      let next = self.peek_next()?;
      if !matches!(next.kind, TokenKind::Punct("(" | ".")) {
        return self.parse_import_decl();
      };
    };
    if self.is_word("export") {
      return self.parse_export();
    };
    self.parse_statement_list_item()
  }

  fn parse_import_local(&mut self) -> SyntaxResult<Node<IdentPat>> {
    let (name, loc) = self.parse_binding_ident()?;
    self.declare_lexical(&name, loc)?;
    Ok(Node::new(loc, IdentPat { name }))
  }

  fn parse_import_decl(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.bump()?;
    let (default, clause) = if matches!(self.token.kind, TokenKind::Str { .. }) {
      (None, None)
    } else {
      let (default, clause) = self.parse_import_clause()?;
      self.expect_word("from")?;
      (default, clause)
    };
    let module = self.parse_module_specifier()?;
    let attributes = self.parse_import_attributes()?;
    self.consume_semicolon()?;
    Ok(
      Node::new(self.loc_from(start), ImportStmt {
        default,
        clause,
        module,
        attributes,
      })
      .into_wrapped(),
    )
  }

  /// Everything between `import` and `from`.
  fn parse_import_clause(
    &mut self,
  ) -> SyntaxResult<(Option<Node<IdentPat>>, Option<ImportClause>)> {
    let default = if self.is_any_word() {
      let default = self.parse_import_local()?;
      if !self.eat_punct(",")? {
        return Ok((Some(default), None));
      };
      Some(default)
    } else {
      None
    };
    if self.eat_punct("*")? {
      self.expect_word("as")?;
      let local = self.parse_import_local()?;
      return Ok((default, Some(ImportClause::Namespace(local))));
    };
    self.expect_punct("{")?;
    let mut specifiers = Vec::new();
    while !self.is_punct("}") {
      let start = self.start();
      let imported_loc = self.token.loc;
      let imported = self.parse_module_name()?;
      let local = if self.eat_word("as")? {
        self.parse_import_local()?
      } else {
        let ModuleName::Ident(name) = &imported else {
          return Err(self.unexpected("`as`"));
        };
        self.check_binding_name(name, imported_loc)?;
        self.declare_lexical(name, imported_loc)?;
        Node::new(imported_loc, IdentPat { name: name.clone() })
      };
      specifiers.push(Node::new(self.loc_from(start), ImportSpecifier {
        imported,
        local,
      }));
      if !self.is_punct("}") {
        self.expect_punct(",")?;
      };
    }
    self.expect_punct("}")?;
    Ok((default, Some(ImportClause::Named(specifiers))))
  }

  /// A name on the module side of an import or export list, which may be any word or a string.
  fn parse_module_name(&mut self) -> SyntaxResult<ModuleName> {
    let name = match &self.token.kind {
      TokenKind::Word { name, .. } => ModuleName::Ident(name.clone()),
      TokenKind::Str { value, raw: None } => ModuleName::Str(value.clone()),
      _ => return Err(self.unexpected("a name")),
    };
    self.bump()?;
    Ok(name)
  }

  fn parse_module_specifier(&mut self) -> SyntaxResult<String> {
    let TokenKind::Str { value, .. } = &self.token.kind else {
      return Err(self.unexpected("a module specifier"));
    };
    let value = value.clone();
    self.bump()?;
    Ok(value)
  }

  /// `with { type: "json" }`, or nothing.
  fn parse_import_attributes(&mut self) -> SyntaxResult<Vec<ImportAttribute>> {
    let mut attributes: Vec<ImportAttribute> = Vec::new();
    if self.token.nl_before || !self.eat_word("with")? {
      return Ok(attributes);
    };
    self.expect_punct("{")?;
    while !self.is_punct("}") {
      let key_loc = self.token.loc;
      let key = self.parse_module_name()?;
      if attributes.iter().any(|attr| attr.key == key) {
        return Err(self.error(
          SyntaxErrorKind::Invalid("duplicate import attribute"),
          key_loc,
        ));
      };
      self.expect_punct(":")?;
      let value = self.parse_module_specifier()?;
      attributes.push(ImportAttribute { key, value });
      if !self.is_punct("}") {
        self.expect_punct(",")?;
      };
    }
    self.expect_punct("}")?;
    Ok(attributes)
  }

  fn parse_export(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.start();
    self.bump()?;
    if self.eat_punct("*")? {
      let name = if self.eat_word("as")? {
        let loc = self.token.loc;
        let name = self.parse_module_name()?;
        self.add_export(name.as_str(), loc)?;
        Some(name)
      } else {
        None
      };
      self.expect_word("from")?;
      let from = self.parse_module_specifier()?;
      let attributes = self.parse_import_attributes()?;
      self.consume_semicolon()?;
      return Ok(
        Node::new(self.loc_from(start), ExportListStmt {
          clause: ExportClause::All(name),
          from: Some(from),
          attributes,
        })
        .into_wrapped(),
      );
    };
    if self.is_punct("{") {
      return self.parse_export_list(start);
    };
    if self.is_word("default") {
      let loc = self.bump()?.loc;
      self.add_export("default", loc)?;
      if self.is_word("function") || self.is_async_function()? {
        return self.parse_function_decl(ExportMode::Default);
      };
      if self.is_word("class") {
        return self.parse_class_decl(ExportMode::Default);
      };
      let expr = self.with_in(|p| p.parse_assignment())?;
      self.consume_semicolon()?;
      return Ok(Node::new(self.loc_from(start), ExportDefaultExpr { expr }).into_wrapped());
    };
    if self.is_word("var") || self.is_word("let") || self.is_word("const") {
      return self.parse_var_stmt(true);
    };
    if self.is_word("function") || self.is_async_function()? {
      return self.parse_function_decl(ExportMode::Named);
    };
    if self.is_word("class") {
      return self.parse_class_decl(ExportMode::Named);
    };
    Err(self.unexpected("a declaration or export list"))
  }

  /// `export { a, b as c }`, optionally re-exported `from` another module. Local names must be
  /// declared somewhere in this module unless they come from another one.
  fn parse_export_list(&mut self, start: usize) -> SyntaxResult<Node<Stmt>> {
    self.bump()?;
    let mut specifiers = Vec::new();
    let mut locals = Vec::new();
    while !self.is_punct("}") {
      let spec_start = self.start();
      let local_loc = self.token.loc;
      let local = self.parse_module_name()?;
      let (exported, exported_loc) = if self.eat_word("as")? {
        let loc = self.token.loc;
        (self.parse_module_name()?, loc)
      } else {
        (local.clone(), local_loc)
      };
      self.add_export(exported.as_str(), exported_loc)?;
      locals.push((local.clone(), local_loc));
      specifiers.push(Node::new(self.loc_from(spec_start), ExportSpecifier {
        local,
        exported,
      }));
      if !self.is_punct("}") {
        self.expect_punct(",")?;
      };
    }
    self.expect_punct("}")?;
    let from = if self.eat_word("from")? {
      Some(self.parse_module_specifier()?)
    } else {
      None
    };
    let attributes = if from.is_some() {
      self.parse_import_attributes()?
    } else {
      for (local, loc) in locals {
        let ModuleName::Ident(name) = local else {
          return Err(self.error(
            SyntaxErrorKind::Invalid("a string can only be exported from another module"),
            loc,
          ));
        };
        self.check_reference_name(&name, loc)?;
        self.export_refs.push((name, loc));
      }
      Vec::new()
    };
    self.consume_semicolon()?;
    Ok(
      Node::new(self.loc_from(start), ExportListStmt {
        clause: ExportClause::Named(specifiers),
        from,
        attributes,
      })
      .into_wrapped(),
    )
  }
}
