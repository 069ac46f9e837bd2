use crate::ast::expr::Expr;
use crate::ast::expr::Ident;
use crate::ast::func::Function;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::num::JsNumber;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// The name of a property, method, or field.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum PropKey {
  Ident(#[drive(skip)] String),
  Str(#[drive(skip)] String),
  Number(#[drive(skip)] JsNumber),
  BigInt(#[drive(skip)] String),
  /// `#name`, stored without the `#`.
  Private(#[drive(skip)] String),
  Computed(Node<Expr>),
}

impl PropKey {
  /// The key's name when it is known without evaluating anything.
  pub fn static_name(&self) -> Option<&str> {
    match self {
      PropKey::Ident(name) | PropKey::Str(name) => Some(name.as_str()),
      _ => None,
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum MethodKind {
  Method,
  Getter,
  Setter,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ObjectMember {
  /// `key: value`.
  Prop { key: PropKey, value: Node<Expr> },
  Method {
    key: PropKey,
    #[drive(skip)]
    kind: MethodKind,
    func: Node<Function>,
  },
  /// `{ name }`, which reads the binding `name`.
  Shorthand { id: Node<Ident> },
  Spread { value: Node<Expr> },
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ClassMember {
  Method {
    #[drive(skip)]
    is_static: bool,
    key: PropKey,
    #[drive(skip)]
    kind: MethodKind,
    func: Node<Function>,
  },
  Field {
    #[drive(skip)]
    is_static: bool,
    key: PropKey,
    value: Option<Node<Expr>>,
  },
  StaticBlock { body: Vec<Node<Stmt>> },
}
