use crate::context::FileContext;
use crate::err::ModularizeError;
use crate::materialize::materialize_local;
use crate::materialize::Materialized;
use crate::LIBRARY;
use parse_js::ast::module::ExportClause;
use parse_js::ast::module::ExportListStmt;
use parse_js::ast::module::ImportClause;
use parse_js::ast::module::ImportStmt;
use parse_js::ast::module::Module;
use parse_js::ast::module::ModuleName;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::Stmt;
use tracing::debug;

/// Records the bindings of every `import ... from "nanoutils"` and removes those imports, then
/// redirects `export { ... } from "nanoutils"` to per-function imports.
///
/// Must run before any usage is rewritten. On error the tree is left partially classified.
pub fn classify(ctx: &mut FileContext<'_>, module: &mut Node<Module>) -> Result<(), ModularizeError> {
  let body = std::mem::take(&mut module.stx.body);
  let mut kept = Vec::with_capacity(body.len());
  for mut stmt in body {
    match stmt.stx.as_mut() {
      Stmt::Import(import) if import.stx.module == LIBRARY => {
        record_import(ctx, import);
        debug!(loc = ?stmt.loc, "removed nanoutils import");
        continue;
      }
      Stmt::ExportList(export) if export.stx.from.as_deref() == Some(LIBRARY) => {
        redirect_reexport(ctx, export)?;
      }
      _ => {}
    };
    kept.push(stmt);
  }
  module.stx.body = kept;
  Ok(())
}

fn record_namespace(ctx: &mut FileContext<'_>, local: &str) {
  debug!(local, "classified namespace binding");
  ctx.namespace_bindings.insert(local.to_string());
}

fn record_import(ctx: &mut FileContext<'_>, import: &Node<ImportStmt>) {
  if let Some(default) = &import.stx.default {
    record_namespace(ctx, &default.stx.name);
  };
  match &import.stx.clause {
    Some(ImportClause::Namespace(local)) => record_namespace(ctx, &local.stx.name),
    Some(ImportClause::Named(specifiers)) => {
      for spec in specifiers {
        let local = spec.stx.local.stx.name.as_str();
        let imported = spec.stx.imported.as_str();
        if imported == "default" {
          record_namespace(ctx, local);
        } else {
          debug!(local, imported, "classified named binding");
          ctx
            .named_bindings
            .insert(local.to_string(), imported.to_string());
        };
      }
    }
    None => {}
  };
}

fn redirect_reexport(
  ctx: &mut FileContext<'_>,
  export: &mut Node<ExportListStmt>,
) -> Result<(), ModularizeError> {
  let specifiers = match &mut export.stx.clause {
    ExportClause::All(None) => {
      return Err(ModularizeError::unsupported(format!(
        r#"`export * from "{LIBRARY}"`"#
      )))
    }
    ExportClause::All(Some(name)) => {
      return Err(ModularizeError::unsupported(format!(
        r#"`export * as {} from "{LIBRARY}"`"#,
        name.as_str()
      )))
    }
    ExportClause::Named(specifiers) => specifiers,
  };
  for spec in specifiers.iter_mut() {
    let imported = spec.stx.local.as_str().to_string();
    let local = materialize_local(ctx, &imported, spec.loc)?;
    spec.stx.local = ModuleName::Ident(local);
  }
  export.stx.from = None;
  export.stx.attributes.clear();
  export.assoc.set(Materialized);
  debug!(loc = ?export.loc, "redirected nanoutils re-export");
  Ok(())
}
