use derive_visitor::DriveMut;
use parse_js::ast::module::Module;
use parse_js::ast::node::Node;
use symbol::Scope;
use visitor::ScopeBuilder;

pub mod symbol;
pub mod visitor;

/// Resolves the scopes of a parsed module. Each `Ident` and `IdentPat` node in the tree gets the
/// [`Scope`] it appears in attached to its associated data, and the module scope is returned.
pub fn analyze_module(module: &mut Node<Module>) -> Scope {
  let module_scope = Scope::new_module();
  module.drive_mut(&mut ScopeBuilder::new(module_scope.clone()));
  module_scope
}
