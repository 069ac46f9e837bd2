use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::pat::IdentPat;
use crate::ast::stmt::Stmt;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// A name in an import or export list, which can be a string: `export { a as "b-c" }`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub enum ModuleName {
  Ident(String),
  Str(String),
}

impl ModuleName {
  pub fn as_str(&self) -> &str {
    match self {
      ModuleName::Ident(name) | ModuleName::Str(name) => name,
    }
  }
}

/// `with { type: "json" }` on an import or re-export.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ImportAttribute {
  pub key: ModuleName,
  pub value: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportSpecifier {
  #[drive(skip)]
  pub imported: ModuleName,
  pub local: Node<IdentPat>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ImportClause {
  /// `* as local`.
  Namespace(Node<IdentPat>),
  /// `{ a, b as c }`.
  Named(Vec<Node<ImportSpecifier>>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportStmt {
  pub default: Option<Node<IdentPat>>,
  pub clause: Option<ImportClause>,
  #[drive(skip)]
  pub module: String,
  #[drive(skip)]
  pub attributes: Vec<ImportAttribute>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ExportSpecifier {
  /// The local binding, or the imported name of a re-export.
  #[drive(skip)]
  pub local: ModuleName,
  #[drive(skip)]
  pub exported: ModuleName,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ExportClause {
  /// `export *` and `export * as name`, which need a `from`.
  All(#[drive(skip)] Option<ModuleName>),
  Named(Vec<Node<ExportSpecifier>>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ExportListStmt {
  pub clause: ExportClause,
  #[drive(skip)]
  pub from: Option<String>,
  #[drive(skip)]
  pub attributes: Vec<ImportAttribute>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Module {
  #[drive(skip)]
  pub hashbang: Option<String>,
  pub body: Vec<Node<Stmt>>,
}

impl Module {
  /// Leading string literal statements, e.g. `"use strict";`, which must stay first.
  pub fn directive_count(&self) -> usize {
    self
      .body
      .iter()
      .take_while(|stmt| match stmt.stx.as_ref() {
        Stmt::Expr(expr) => {
          !expr.stx.expr.is_parenthesized()
            && matches!(expr.stx.expr.stx.as_ref(), Expr::Str(_))
        }
        _ => false,
      })
      .count()
  }
}
