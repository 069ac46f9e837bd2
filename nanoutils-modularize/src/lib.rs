use classify::classify;
use context::FileContext;
use emit_js::emit_js;
use parse_js::ast::node::Node;
use parse_js::ast::module::Module;
use rayon::prelude::*;
use rewrite::rewrite;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use symbol_js::analyze_module;
use tracing::debug;
use tracing::instrument;
use walkdir::WalkDir;

pub use err::ModularizeError;
pub use options::ModuleFormat;
pub use options::TransformOptions;
pub use resolver::ModuleResolver;

mod classify;
mod context;
mod err;
mod guard;
mod materialize;
mod options;
mod resolver;
mod rewrite;
#[cfg(test)]
mod tests;

/// The package whose imports are rewritten.
pub const LIBRARY: &str = "nanoutils";

/// Extensions of the files picked up when transforming a directory.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs"];

/// Rewrites a parsed module in place so that every nanoutils function it uses is imported from its
/// own module, e.g. `import { map } from "nanoutils"; map(f)` becomes
/// `import _map from "nanoutils/lib/map"; _map(f)`.
///
/// If this fails, the tree is left in an unspecified state and should be discarded.
pub fn modularize(
  resolver: &ModuleResolver,
  module: &mut Node<Module>,
) -> Result<(), ModularizeError> {
  // Scopes must be computed while the imports they resolve to are still in the tree.
  let module_scope = analyze_module(module);
  let mut ctx = FileContext::new(resolver, module_scope, module);
  classify(&mut ctx, module)?;
  if ctx.has_bindings() {
    rewrite(&mut ctx, module)?;
  };
  let imports = ctx.take_pending_imports();
  debug!(count = imports.len(), "inserting imports");
  let at = module.stx.directive_count();
  module.stx.body.splice(at..at, imports);
  Ok(())
}

/// Parses, modularizes and re-emits one module.
#[instrument(skip_all, fields(len = source.len()))]
pub fn transform(resolver: &ModuleResolver, source: &[u8]) -> Result<String, ModularizeError> {
  let source = std::str::from_utf8(source)?;
  let mut module = parse_js::parse(source)?;
  modularize(resolver, &mut module)?;
  let output = emit_js(&module)?;
  debug!(out_len = output.len(), "transformed");
  Ok(output)
}

#[instrument(skip(resolver))]
pub fn transform_file(resolver: &ModuleResolver, path: &Path) -> Result<String, ModularizeError> {
  let source = fs::read(path).map_err(|err| ModularizeError::io(path, err))?;
  transform(resolver, &source)
}

#[derive(Debug)]
pub struct FileOutcome {
  pub path: PathBuf,
  pub result: Result<String, ModularizeError>,
}

/// Transforms each file independently on the rayon pool. Results are in the same order as `paths`,
/// and one file failing has no effect on the others.
pub fn transform_files(resolver: &ModuleResolver, paths: &[PathBuf]) -> Vec<FileOutcome> {
  paths
    .par_iter()
    .map(|path| FileOutcome {
      path: path.clone(),
      result: transform_file(resolver, path),
    })
    .collect()
}

pub fn is_source_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Every source file under `root` in a stable order, skipping `node_modules`. A `root` that is a
/// file is returned as is, whatever its extension.
pub fn collect_sources(root: &Path) -> Result<Vec<PathBuf>, ModularizeError> {
  if root.is_file() {
    return Ok(vec![root.to_path_buf()]);
  };
  let mut files = Vec::new();
  let walker = WalkDir::new(root)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != "node_modules");
  for entry in walker {
    let entry = entry.map_err(|err| {
      let path = err.path().unwrap_or(root).to_path_buf();
      ModularizeError::io(path, err.into())
    })?;
    if entry.file_type().is_file() && is_source_file(entry.path()) {
      files.push(entry.into_path());
    };
  }
  debug!(root = %root.display(), count = files.len(), "collected sources");
  Ok(files)
}
