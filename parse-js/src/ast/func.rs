use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::pat::BindingPat;
use crate::ast::stmt::Stmt;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Param {
  #[drive(skip)]
  pub rest: bool,
  pub pat: Node<BindingPat>,
  pub default: Option<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum FunctionBody {
  Block(Vec<Node<Stmt>>),
  /// The concise body of an arrow function.
  Expr(Node<Expr>),
}

/// What every function, arrow function, method, getter and setter shares.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Function {
  #[drive(skip)]
  pub arrow: bool,
  #[drive(skip)]
  pub is_async: bool,
  #[drive(skip)]
  pub generator: bool,
  pub params: Vec<Node<Param>>,
  pub body: FunctionBody,
}
