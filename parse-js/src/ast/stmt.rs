use crate::ast::class::ClassMember;
use crate::ast::expr::Expr;
use crate::ast::func::Function;
use crate::ast::module::ExportListStmt;
use crate::ast::module::ImportStmt;
use crate::ast::node::Node;
use crate::ast::pat::BindingPat;
use crate::ast::pat::DeclName;
use crate::ast::pat::Pat;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum Stmt {
  Block(Node<BlockStmt>),
  Break(Node<BreakStmt>),
  Class(Node<ClassDecl>),
  Continue(Node<ContinueStmt>),
  Debugger(Node<DebuggerStmt>),
  DoWhile(Node<DoWhileStmt>),
  Empty(Node<EmptyStmt>),
  ExportDefault(Node<ExportDefaultExpr>),
  ExportList(Node<ExportListStmt>),
  Expr(Node<ExprStmt>),
  For(Node<ForStmt>),
  ForIn(Node<ForInStmt>),
  ForOf(Node<ForOfStmt>),
  Function(Node<FunctionDecl>),
  If(Node<IfStmt>),
  Import(Node<ImportStmt>),
  Labeled(Node<LabeledStmt>),
  Return(Node<ReturnStmt>),
  Switch(Node<SwitchStmt>),
  Throw(Node<ThrowStmt>),
  Try(Node<TryStmt>),
  Var(Node<VarDecl>),
  While(Node<WhileStmt>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct BlockStmt {
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct BreakStmt {
  #[drive(skip)]
  pub label: Option<String>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ContinueStmt {
  #[drive(skip)]
  pub label: Option<String>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct DebuggerStmt;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct DoWhileStmt {
  pub body: Node<Stmt>,
  pub test: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct EmptyStmt;

/// `export default` followed by an expression. Function and class declarations exported this way
/// are [`FunctionDecl`] and [`ClassDecl`] with [`ExportMode::Default`].
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ExportDefaultExpr {
  pub expr: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ExprStmt {
  pub expr: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ForInit {
  None,
  Expr(Node<Expr>),
  Var(Node<VarDecl>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ForStmt {
  pub init: ForInit,
  pub test: Option<Node<Expr>>,
  pub update: Option<Node<Expr>>,
  pub body: Node<Stmt>,
}

/// The left side of `for...in` and `for...of`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ForHead {
  Pat(Node<Pat>),
  /// Always a single declarator without an initializer.
  Var(Node<VarDecl>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ForInStmt {
  pub head: ForHead,
  pub object: Node<Expr>,
  pub body: Node<Stmt>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ForOfStmt {
  #[drive(skip)]
  pub is_await: bool,
  pub head: ForHead,
  pub iterable: Node<Expr>,
  pub body: Node<Stmt>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum ExportMode {
  Local,
  /// `export function f() {}`.
  Named,
  /// `export default function () {}`, where the name is optional.
  Default,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct FunctionDecl {
  #[drive(skip)]
  pub export: ExportMode,
  pub name: Option<Node<DeclName>>,
  pub func: Node<Function>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassDecl {
  #[drive(skip)]
  pub export: ExportMode,
  pub name: Option<Node<DeclName>>,
  pub extends: Option<Node<Expr>>,
  pub members: Vec<Node<ClassMember>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct IfStmt {
  pub test: Node<Expr>,
  pub consequent: Node<Stmt>,
  pub alternate: Option<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LabeledStmt {
  #[drive(skip)]
  pub label: String,
  pub body: Node<Stmt>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ReturnStmt {
  pub value: Option<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct SwitchCase {
  /// `None` for `default:`.
  pub test: Option<Node<Expr>>,
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct SwitchStmt {
  pub discriminant: Node<Expr>,
  pub cases: Vec<Node<SwitchCase>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ThrowStmt {
  pub value: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct CatchClause {
  pub param: Option<Node<BindingPat>>,
  pub body: Node<BlockStmt>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TryStmt {
  pub block: Node<BlockStmt>,
  pub handler: Option<Node<CatchClause>>,
  pub finalizer: Option<Node<BlockStmt>>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum VarKind {
  Var,
  Let,
  Const,
}

impl VarKind {
  pub fn as_str(self) -> &'static str {
    match self {
      VarKind::Var => "var",
      VarKind::Let => "let",
      VarKind::Const => "const",
    }
  }
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Declarator {
  pub pat: Node<BindingPat>,
  pub init: Option<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct VarDecl {
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub kind: VarKind,
  pub declarators: Vec<Declarator>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct WhileStmt {
  pub test: Node<Expr>,
  pub body: Node<Stmt>,
}
