use crate::context::FileContext;
use crate::err::ModularizeError;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::Ident;
use parse_js::ast::module::ImportStmt;
use parse_js::ast::node::Node;
use parse_js::ast::pat::IdentPat;
use parse_js::ast::stmt::Stmt;
use parse_js::loc::Loc;
use tracing::debug;

/// Marks identifiers this crate synthesized. They bind our own imports, so they are never matched
/// again.
#[derive(Clone, Copy, Debug)]
pub struct Materialized;

pub fn is_materialized<S>(node: &Node<S>) -> bool
where
  S: derive_visitor::Drive + derive_visitor::DriveMut,
{
  node.assoc.has::<Materialized>()
}

/// The local bound to `name`'s default import, queueing that import the first time `name` is seen
/// in the file.
pub fn materialize_local(
  ctx: &mut FileContext<'_>,
  name: &str,
  loc: Loc,
) -> Result<String, ModularizeError> {
  if let Some(local) = ctx.import_cache.get(name) {
    return Ok(local.clone());
  };
  let path = ctx.resolver.resolve(name)?;
  let local = ctx.fresh_local(name);
  debug!(name, local = %local, path = %path, "materialized import");
  ctx.pending_imports.push(default_import(&local, path, loc));
  ctx.import_cache.insert(name.to_string(), local.clone());
  Ok(local)
}

/// A new reference to the default import of `name`. Every call returns a distinct node.
pub fn materialize(
  ctx: &mut FileContext<'_>,
  name: &str,
  loc: Loc,
) -> Result<Node<Expr>, ModularizeError> {
  let local = materialize_local(ctx, name, loc)?;
  Ok(materialized_id(local, loc))
}

fn materialized_id(name: String, loc: Loc) -> Node<Expr> {
  let mut id = Node::new(loc, Ident { name });
  id.assoc.set(Materialized);
  let mut expr = id.into_wrapped::<Expr>();
  expr.assoc.set(Materialized);
  expr
}

fn default_import(local: &str, module: String, loc: Loc) -> Node<Stmt> {
  let mut default = Node::new(loc, IdentPat {
    name: local.to_string(),
  });
  default.assoc.set(Materialized);
  Node::new(loc, ImportStmt {
    default: Some(default),
    clause: None,
    module,
    attributes: Vec::new(),
  })
  .into_wrapped()
}
