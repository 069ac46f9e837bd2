use crate::ast::class::ClassMember;
use crate::ast::class::ObjectMember;
use crate::ast::func::Function;
use crate::ast::node::Node;
use crate::ast::pat::DeclName;
use crate::ast::pat::Pat;
use crate::num::JsNumber;
use crate::operator::AssignOp;
use crate::operator::BinaryOp;
use crate::operator::UnaryOp;
use crate::operator::UpdateOp;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum Expr {
  Array(Node<ArrayExpr>),
  Arrow(Node<ArrowExpr>),
  Assign(Node<AssignExpr>),
  BigInt(Node<BigIntLit>),
  Binary(Node<BinaryExpr>),
  Bool(Node<BoolLit>),
  Call(Node<CallExpr>),
  Chain(Node<ChainExpr>),
  Class(Node<ClassExpr>),
  Cond(Node<CondExpr>),
  Function(Node<FunctionExpr>),
  Ident(Node<Ident>),
  Import(Node<ImportCall>),
  ImportMeta(Node<ImportMeta>),
  Index(Node<IndexExpr>),
  Member(Node<MemberExpr>),
  New(Node<NewExpr>),
  NewTarget(Node<NewTarget>),
  Null(Node<NullLit>),
  Number(Node<NumberLit>),
  Object(Node<ObjectExpr>),
  Regex(Node<RegexLit>),
  Seq(Node<SeqExpr>),
  Str(Node<StrLit>),
  Super(Node<SuperExpr>),
  TaggedTemplate(Node<TaggedTemplateExpr>),
  Template(Node<TemplateLit>),
  This(Node<ThisExpr>),
  Unary(Node<UnaryExpr>),
  Update(Node<UpdateExpr>),
  Yield(Node<YieldExpr>),
}

/// A reference to a binding.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Ident {
  #[drive(skip)]
  pub name: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ArrayElem {
  Hole,
  Single(Node<Expr>),
  Spread(Node<Expr>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ArrayExpr {
  pub elements: Vec<ArrayElem>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ArrowExpr {
  pub func: Node<Function>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct AssignExpr {
  #[drive(skip)]
  pub op: AssignOp,
  pub target: Node<Pat>,
  pub value: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct BinaryExpr {
  #[drive(skip)]
  pub op: BinaryOp,
  pub left: Node<Expr>,
  pub right: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Arg {
  #[drive(skip)]
  pub spread: bool,
  pub value: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct CallExpr {
  /// `f?.()`.
  #[drive(skip)]
  pub optional: bool,
  pub callee: Node<Expr>,
  pub args: Vec<Arg>,
}

/// An optional chain as a whole, e.g. all of `a?.b.c()`. Short-circuiting stops at its end, so
/// `(a?.b).c` is a member access on a chain.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ChainExpr {
  pub expr: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassExpr {
  pub name: Option<Node<DeclName>>,
  pub extends: Option<Node<Expr>>,
  pub members: Vec<Node<ClassMember>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct CondExpr {
  pub test: Node<Expr>,
  pub consequent: Node<Expr>,
  pub alternate: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct FunctionExpr {
  pub name: Option<Node<DeclName>>,
  pub func: Node<Function>,
}

/// `import(module)` and `import(module, options)`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportCall {
  pub module: Node<Expr>,
  pub options: Option<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportMeta;

/// `object[index]` and `object?.[index]`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct IndexExpr {
  #[drive(skip)]
  pub optional: bool,
  pub object: Node<Expr>,
  pub index: Node<Expr>,
}

/// `object.prop` and `object?.prop`. A private name keeps its `#`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct MemberExpr {
  #[drive(skip)]
  pub optional: bool,
  pub object: Node<Expr>,
  #[drive(skip)]
  pub prop: String,
}

/// `new callee(args)`; `new callee` has no arguments.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct NewExpr {
  pub callee: Node<Expr>,
  pub args: Vec<Arg>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct NewTarget;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ObjectExpr {
  pub members: Vec<Node<ObjectMember>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct SeqExpr {
  pub exprs: Vec<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct SuperExpr;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum TemplatePart {
  /// Source text between substitutions, exactly as written.
  Raw(#[drive(skip)] String),
  Expr(Node<Expr>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TaggedTemplateExpr {
  pub tag: Node<Expr>,
  pub parts: Vec<TemplatePart>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TemplateLit {
  pub parts: Vec<TemplatePart>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ThisExpr;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct UnaryExpr {
  #[drive(skip)]
  pub op: UnaryOp,
  pub arg: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct UpdateExpr {
  #[drive(skip)]
  pub op: UpdateOp,
  #[drive(skip)]
  pub prefix: bool,
  pub arg: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct YieldExpr {
  #[drive(skip)]
  pub delegate: bool,
  pub arg: Option<Node<Expr>>,
}

/// Digits of a BigInt literal as written, without separators or the `n` suffix.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct BigIntLit {
  #[drive(skip)]
  pub value: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct BoolLit {
  #[drive(skip)]
  pub value: bool,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct NullLit;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct NumberLit {
  #[drive(skip)]
  pub value: JsNumber,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct RegexLit {
  #[drive(skip)]
  pub pattern: String,
  #[drive(skip)]
  pub flags: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct StrLit {
  #[drive(skip)]
  pub value: String,
  /// The literal as written, kept when `value` cannot hold it, i.e. it has lone surrogates.
  #[drive(skip)]
  pub raw: Option<String>,
}

impl StrLit {
  pub fn new(value: impl Into<String>) -> StrLit {
    StrLit {
      value: value.into(),
      raw: None,
    }
  }
}

impl Expr {
  pub fn as_ident(&self) -> Option<&str> {
    match self {
      Expr::Ident(id) => Some(id.stx.name.as_str()),
      _ => None,
    }
  }
}
