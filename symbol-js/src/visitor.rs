use crate::symbol::DeclKind;
use crate::symbol::Scope;
use crate::symbol::ScopeKind;
use derive_visitor::VisitorMut;
use parse_js::ast::class::ClassMember;
use parse_js::ast::expr::ClassExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::FunctionExpr;
use parse_js::ast::expr::Ident;
use parse_js::ast::func::Function;
use parse_js::ast::func::Param;
use parse_js::ast::module::ImportClause;
use parse_js::ast::module::ImportStmt;
use parse_js::ast::node::Node;
use parse_js::ast::pat::BindingPat;
use parse_js::ast::pat::IdentPat;
use parse_js::ast::stmt::BlockStmt;
use parse_js::ast::stmt::CatchClause;
use parse_js::ast::stmt::ClassDecl;
use parse_js::ast::stmt::ForInStmt;
use parse_js::ast::stmt::ForOfStmt;
use parse_js::ast::stmt::ForStmt;
use parse_js::ast::stmt::FunctionDecl;
use parse_js::ast::stmt::SwitchStmt;
use parse_js::ast::stmt::VarDecl;
use parse_js::ast::stmt::VarKind;

type BindingPatNode = Node<BindingPat>;
type BlockStmtNode = Node<BlockStmt>;
type CatchClauseNode = Node<CatchClause>;
type ClassDeclNode = Node<ClassDecl>;
type ClassExprNode = Node<ClassExpr>;
type ClassMemberNode = Node<ClassMember>;
type ExprNode = Node<Expr>;
type ForInStmtNode = Node<ForInStmt>;
type ForOfStmtNode = Node<ForOfStmt>;
type ForStmtNode = Node<ForStmt>;
type FunctionDeclNode = Node<FunctionDecl>;
type FunctionExprNode = Node<FunctionExpr>;
type FunctionNode = Node<Function>;
type IdentNode = Node<Ident>;
type IdentPatNode = Node<IdentPat>;
type ImportStmtNode = Node<ImportStmt>;
type ParamNode = Node<Param>;
type SwitchStmtNode = Node<SwitchStmt>;
type VarDeclNode = Node<VarDecl>;

fn is_static_block(node: &ClassMemberNode) -> bool {
  matches!(node.stx.as_ref(), ClassMember::StaticBlock { .. })
}

/// Builds the scope tree of a module in one walk. Every binding is declared in the scope that owns
/// it, and every [`Ident`] and [`IdentPat`] node gets the scope it appears in as associated data.
///
/// Names should only be resolved once the walk is over: a function declared at the end of a block
/// still shadows outer bindings for the whole block.
#[derive(VisitorMut)]
#[visitor(
  BindingPatNode(enter, exit),
  BlockStmtNode(enter, exit),
  CatchClauseNode(enter, exit),
  ClassDeclNode(enter),
  ClassExprNode(enter, exit),
  ClassMemberNode(enter, exit),
  ExprNode(enter, exit),
  ForInStmtNode(enter, exit),
  ForOfStmtNode(enter, exit),
  ForStmtNode(enter, exit),
  FunctionDeclNode(enter),
  FunctionExprNode(enter, exit),
  FunctionNode(enter, exit),
  IdentNode(enter),
  IdentPatNode(enter),
  ImportStmtNode(enter, exit),
  ParamNode(enter, exit),
  SwitchStmtNode(enter, exit),
  VarDeclNode(enter, exit)
)]
pub struct ScopeBuilder {
  scope: Scope,
  // What the innermost declaring construct declares.
  decl_kinds: Vec<DeclKind>,
  // `Some` directly inside a binding pattern. An expression nested in one, such as a default
  // value, pushes `None` since identifiers there are references.
  binding_kinds: Vec<Option<DeclKind>>,
}

impl ScopeBuilder {
  pub fn new(module_scope: Scope) -> ScopeBuilder {
    ScopeBuilder {
      scope: module_scope,
      decl_kinds: Vec::new(),
      binding_kinds: Vec::new(),
    }
  }

  fn enter_scope(&mut self, kind: ScopeKind) {
    self.scope = self.scope.child(kind);
  }

  fn leave_scope(&mut self) {
    if let Some(parent) = self.scope.parent() {
      self.scope = parent;
    };
  }

  fn declare(&self, name: &str, kind: DeclKind) {
    let owner = if kind == DeclKind::Var {
      self.scope.var_target()
    } else {
      self.scope.clone()
    };
    owner.data_mut().declare(name, kind);
  }

  pub fn enter_binding_pat_node(&mut self, _node: &mut BindingPatNode) {
    self.binding_kinds.push(self.decl_kinds.last().copied());
  }

  pub fn exit_binding_pat_node(&mut self, _node: &mut BindingPatNode) {
    self.binding_kinds.pop();
  }

  pub fn enter_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.enter_scope(ScopeKind::Block);
  }

  pub fn exit_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.leave_scope();
  }

  // The parameter and the body block get separate scopes. The parser already rejects a body
  // redeclaring the parameter lexically.
  pub fn enter_catch_clause_node(&mut self, _node: &mut CatchClauseNode) {
    self.enter_scope(ScopeKind::Block);
    self.decl_kinds.push(DeclKind::Catch);
  }

  pub fn exit_catch_clause_node(&mut self, _node: &mut CatchClauseNode) {
    self.decl_kinds.pop();
    self.leave_scope();
  }

  pub fn enter_class_decl_node(&mut self, node: &mut ClassDeclNode) {
    if let Some(name) = &node.stx.name {
      self.declare(&name.stx.name, DeclKind::Class);
    };
  }

  // The name of a class expression is only bound inside its body.
  pub fn enter_class_expr_node(&mut self, node: &mut ClassExprNode) {
    self.enter_scope(ScopeKind::Block);
    if let Some(name) = &node.stx.name {
      self.declare(&name.stx.name, DeclKind::Class);
    };
  }

  pub fn exit_class_expr_node(&mut self, _node: &mut ClassExprNode) {
    self.leave_scope();
  }

  pub fn enter_class_member_node(&mut self, node: &mut ClassMemberNode) {
    if is_static_block(node) {
      self.enter_scope(ScopeKind::Function);
    };
  }

  pub fn exit_class_member_node(&mut self, node: &mut ClassMemberNode) {
    if is_static_block(node) {
      self.leave_scope();
    };
  }

  pub fn enter_expr_node(&mut self, _node: &mut ExprNode) {
    self.binding_kinds.push(None);
  }

  pub fn exit_expr_node(&mut self, _node: &mut ExprNode) {
    self.binding_kinds.pop();
  }

  pub fn enter_for_in_stmt_node(&mut self, _node: &mut ForInStmtNode) {
    self.enter_scope(ScopeKind::Block);
  }

  pub fn exit_for_in_stmt_node(&mut self, _node: &mut ForInStmtNode) {
    self.leave_scope();
  }

  pub fn enter_for_of_stmt_node(&mut self, _node: &mut ForOfStmtNode) {
    self.enter_scope(ScopeKind::Block);
  }

  pub fn exit_for_of_stmt_node(&mut self, _node: &mut ForOfStmtNode) {
    self.leave_scope();
  }

  pub fn enter_for_stmt_node(&mut self, _node: &mut ForStmtNode) {
    self.enter_scope(ScopeKind::Block);
  }

  pub fn exit_for_stmt_node(&mut self, _node: &mut ForStmtNode) {
    self.leave_scope();
  }

  // Modules are strict, so a function declared in a block belongs to that block.
  pub fn enter_function_decl_node(&mut self, node: &mut FunctionDeclNode) {
    if let Some(name) = &node.stx.name {
      self.declare(&name.stx.name, DeclKind::Function);
    };
  }

  pub fn enter_function_expr_node(&mut self, node: &mut FunctionExprNode) {
    self.enter_scope(ScopeKind::Block);
    if let Some(name) = &node.stx.name {
      self.declare(&name.stx.name, DeclKind::Function);
    };
  }

  pub fn exit_function_expr_node(&mut self, _node: &mut FunctionExprNode) {
    self.leave_scope();
  }

  pub fn enter_function_node(&mut self, node: &mut FunctionNode) {
    self.enter_scope(if node.stx.arrow {
      ScopeKind::Arrow
    } else {
      ScopeKind::Function
    });
  }

  pub fn exit_function_node(&mut self, _node: &mut FunctionNode) {
    self.leave_scope();
  }

  pub fn enter_ident_node(&mut self, node: &mut IdentNode) {
    node.assoc.set(self.scope.clone());
  }

  pub fn enter_ident_pat_node(&mut self, node: &mut IdentPatNode) {
    node.assoc.set(self.scope.clone());
    if let Some(Some(kind)) = self.binding_kinds.last() {
      self.declare(&node.stx.name, *kind);
    };
  }

  pub fn enter_import_stmt_node(&mut self, node: &mut ImportStmtNode) {
    self.binding_kinds.push(None);
    let import = node.stx.as_ref();
    if let Some(default) = &import.default {
      self.declare(&default.stx.name, DeclKind::ImportDefault);
    };
    match &import.clause {
      Some(ImportClause::Namespace(local)) => {
        self.declare(&local.stx.name, DeclKind::ImportNamespace);
      }
      Some(ImportClause::Named(specifiers)) => {
        for spec in specifiers {
          self.declare(&spec.stx.local.stx.name, DeclKind::ImportNamed);
        }
      }
      None => {}
    };
  }

  pub fn exit_import_stmt_node(&mut self, _node: &mut ImportStmtNode) {
    self.binding_kinds.pop();
  }

  pub fn enter_param_node(&mut self, _node: &mut ParamNode) {
    self.decl_kinds.push(DeclKind::Param);
  }

  pub fn exit_param_node(&mut self, _node: &mut ParamNode) {
    self.decl_kinds.pop();
  }

  // Cases share one scope.
  pub fn enter_switch_stmt_node(&mut self, _node: &mut SwitchStmtNode) {
    self.enter_scope(ScopeKind::Block);
  }

  pub fn exit_switch_stmt_node(&mut self, _node: &mut SwitchStmtNode) {
    self.leave_scope();
  }

  pub fn enter_var_decl_node(&mut self, node: &mut VarDeclNode) {
    self.decl_kinds.push(match node.stx.kind {
      VarKind::Var => DeclKind::Var,
      VarKind::Let => DeclKind::Let,
      VarKind::Const => DeclKind::Const,
    });
  }

  pub fn exit_var_decl_node(&mut self, _node: &mut VarDeclNode) {
    self.decl_kinds.pop();
  }
}
