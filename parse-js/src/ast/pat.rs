use crate::ast::class::PropKey;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// A destructuring target. `Member` only appears in assignments, e.g. `[a.b] = c`; declarations
/// bind identifiers only.
#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum Pat {
  Ident(Node<IdentPat>),
  Array(Node<ArrayPat>),
  Object(Node<ObjectPat>),
  Member(Node<Expr>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct IdentPat {
  #[drive(skip)]
  pub name: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct PatElem {
  pub target: Node<Pat>,
  pub default: Option<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ArrayPat {
  /// `None` is a hole.
  pub elements: Vec<Option<PatElem>>,
  pub rest: Option<Node<Pat>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ObjectPatProp {
  pub key: PropKey,
  pub target: Node<Pat>,
  pub default: Option<Node<Expr>>,
}

impl ObjectPatProp {
  /// Written as `{ a }` or `{ a = 1 }`.
  pub fn is_shorthand(&self) -> bool {
    match (&self.key, self.target.stx.as_ref()) {
      (PropKey::Ident(key), Pat::Ident(target)) => *key == target.stx.name,
      _ => false,
    }
  }
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ObjectPat {
  pub props: Vec<Node<ObjectPatProp>>,
  pub rest: Option<Node<Pat>>,
}

/// A pattern that declares its identifiers: parameters, `catch` parameters, and declarators.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct BindingPat {
  pub pat: Node<Pat>,
}

impl BindingPat {
  pub fn ident_name(&self) -> Option<&str> {
    match self.pat.stx.as_ref() {
      Pat::Ident(id) => Some(id.stx.name.as_str()),
      _ => None,
    }
  }
}

/// The name of a function or class.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct DeclName {
  #[drive(skip)]
  pub name: String,
}
