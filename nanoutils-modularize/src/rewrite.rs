use crate::context::FileContext;
use crate::err::ModularizeError;
use crate::guard::is_tracked_function;
use crate::guard::is_tracked_namespace;
use crate::materialize::is_materialized;
use crate::materialize::materialize;
use crate::materialize::materialize_local;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;
use parse_js::ast::class::ObjectMember;
use parse_js::ast::class::PropKey;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::Ident;
use parse_js::ast::expr::NullLit;
use parse_js::ast::module::ExportClause;
use parse_js::ast::module::ExportListStmt;
use parse_js::ast::module::Module;
use parse_js::ast::module::ModuleName;
use parse_js::ast::node::Node;
use parse_js::loc::Loc;
use symbol_js::symbol::Scope;
use tracing::trace;

type ExportListStmtNode = Node<ExportListStmt>;
type ExprNode = Node<Expr>;
type ObjectMemberNode = Node<ObjectMember>;

// Set on the index of `obj[f]`, which is never rewritten.
struct ComputedMemberKey;

enum Target {
  Function(String),
  Null,
}

#[derive(VisitorMut)]
#[visitor(ExportListStmtNode(enter), ExprNode(enter), ObjectMemberNode(enter))]
struct RewriteVisitor<'c, 'r> {
  ctx: &'c mut FileContext<'r>,
  // The first error stops all further rewriting.
  error: Option<ModularizeError>,
}

impl<'c, 'r> RewriteVisitor<'c, 'r> {
  fn id_target(&self, id: &Node<Ident>) -> Option<Target> {
    if is_materialized(id) {
      return None;
    };
    let scope = id.assoc.get::<Scope>();
    if let Some(function) = is_tracked_function(self.ctx, scope, &id.stx.name) {
      return Some(Target::Function(function.to_string()));
    };
    is_tracked_namespace(self.ctx, scope, &id.stx.name).then_some(Target::Null)
  }

  fn is_namespace(&self, expr: &Node<Expr>) -> bool {
    match expr.stx.as_ref() {
      Expr::Ident(id) => {
        !is_materialized(id)
          && is_tracked_namespace(self.ctx, id.assoc.get::<Scope>(), &id.stx.name)
      }
      _ => false,
    }
  }

  fn expr_target(&self, node: &ExprNode) -> Result<Option<Target>, ModularizeError> {
    Ok(match node.stx.as_ref() {
      Expr::Ident(id) => {
        if node.assoc.has::<ComputedMemberKey>() {
          return Ok(None);
        };
        self.id_target(id)
      }
      // `ns.map` and `ns?.map`.
      Expr::Member(member) if self.is_namespace(&member.stx.object) => {
        Some(Target::Function(member.stx.prop.clone()))
      }
      // `ns["map"]`. Any other key can only be known at runtime.
      Expr::Index(index) if self.is_namespace(&index.stx.object) => {
        match index.stx.index.stx.as_ref() {
          Expr::Str(name) => Some(Target::Function(name.stx.value.clone())),
          _ => return Err(ModularizeError::unsupported("`ns[expr]`")),
        }
      }
      _ => None,
    })
  }

  fn build(&mut self, target: Target, loc: Loc) -> Option<Node<Expr>> {
    match target {
      Target::Function(name) => match materialize(self.ctx, &name, loc) {
        Ok(reference) => Some(reference),
        Err(err) => {
          self.error = Some(err);
          None
        }
      },
      Target::Null => Some(Node::new(loc, NullLit).into_wrapped()),
    }
  }

  fn enter_expr_node(&mut self, node: &mut ExprNode) {
    if self.error.is_some() || is_materialized(node) {
      return;
    };
    match self.expr_target(node) {
      Ok(Some(target)) => {
        if let Some(replacement) = self.build(target, node.loc) {
          trace!(loc = ?node.loc, "rewrote expression");
          *node = replacement;
        };
      }
      Ok(None) => {
        if let Expr::Index(index) = node.stx.as_mut() {
          index.stx.index.assoc.set(ComputedMemberKey);
        };
      }
      Err(err) => self.error = Some(err),
    };
  }

  // `{ map }` has no expression node for the value, so it is expanded to `{ map: _map }`.
  fn enter_object_member_node(&mut self, node: &mut ObjectMemberNode) {
    if self.error.is_some() {
      return;
    };
    let ObjectMember::Shorthand { id } = node.stx.as_ref() else {
      return;
    };
    let Some(target) = self.id_target(id) else {
      return;
    };
    let key = id.stx.name.clone();
    let loc = id.loc;
    let Some(value) = self.build(target, loc) else {
      return;
    };
    trace!(loc = ?loc, key = %key, "expanded shorthand member");
    *node.stx = ObjectMember::Prop {
      key: PropKey::Ident(key),
      value,
    };
  }

  // Only local lists; re-exports from nanoutils were redirected by the classifier.
  fn enter_export_list_stmt_node(&mut self, node: &mut ExportListStmtNode) {
    if self.error.is_some() || is_materialized(node) || node.stx.from.is_some() {
      return;
    };
    let ExportClause::Named(specifiers) = &mut node.stx.clause else {
      return;
    };
    let scope = self.ctx.module_scope.clone();
    for spec in specifiers.iter_mut() {
      let ModuleName::Ident(local) = &spec.stx.local else {
        continue;
      };
      let result = if let Some(function) = is_tracked_function(self.ctx, Some(&scope), local) {
        let function = function.to_string();
        materialize_local(self.ctx, &function, spec.loc).map(Some)
      } else if is_tracked_namespace(self.ctx, Some(&scope), local) {
        Err(ModularizeError::unsupported(format!(
          "`export {{ {local} }}` of a nanoutils namespace import"
        )))
      } else {
        Ok(None)
      };
      match result {
        Ok(Some(materialized)) => {
          trace!(loc = ?spec.loc, local = %materialized, "rewrote export specifier");
          spec.stx.local = ModuleName::Ident(materialized);
        }
        Ok(None) => {}
        Err(err) => {
          self.error = Some(err);
          return;
        }
      };
    }
  }
}

/// Rewrites every usage of a tracked binding in one pass. Nodes created here are marked and never
/// revisited.
pub fn rewrite(ctx: &mut FileContext<'_>, module: &mut Node<Module>) -> Result<(), ModularizeError> {
  let mut visitor = RewriteVisitor { ctx, error: None };
  module.drive_mut(&mut visitor);
  match visitor.error {
    Some(err) => Err(err),
    None => Ok(()),
  }
}
