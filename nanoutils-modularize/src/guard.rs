use crate::context::FileContext;
use symbol_js::symbol::DeclKind;
use symbol_js::symbol::Scope;

// The binding `name` refers to at `scope` must be the module-level import the classifier saw;
// anything declared closer shadows it.
fn resolves_to_import(ctx: &FileContext<'_>, scope: &Scope, name: &str, kinds: &[DeclKind]) -> bool {
  match scope.resolve(name) {
    Some((owner, binding)) => owner == ctx.module_scope && kinds.contains(&binding.kind),
    None => false,
  }
}

/// The nanoutils function `name` was imported as, if `name` at `scope` still refers to that import.
pub fn is_tracked_function<'c>(
  ctx: &'c FileContext<'_>,
  scope: Option<&Scope>,
  name: &str,
) -> Option<&'c str> {
  let exported = ctx.named_bindings.get(name)?;
  let scope = scope?;
  resolves_to_import(ctx, scope, name, &[DeclKind::ImportNamed]).then_some(exported.as_str())
}

/// Whether `name` at `scope` refers to a default or namespace import of nanoutils.
pub fn is_tracked_namespace(ctx: &FileContext<'_>, scope: Option<&Scope>, name: &str) -> bool {
  if !ctx.namespace_bindings.contains(name) {
    return false;
  };
  let Some(scope) = scope else {
    return false;
  };
  // `import { default as N }` binds a named import.
  resolves_to_import(ctx, scope, name, &[
    DeclKind::ImportDefault,
    DeclKind::ImportNamespace,
    DeclKind::ImportNamed,
  ])
}
