use crate::err::ModularizeError;
use crate::options::ModuleFormat;
use crate::options::TransformOptions;
use crate::LIBRARY;
use ahash::HashSet;
use ahash::HashSetExt;
use once_cell::sync::OnceCell;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// Maps logical nanoutils function names to the module path of their individual build.
///
/// The set of known names is read from `<root>/lib` the first time a name is resolved, and never
/// changes afterwards. A resolver is meant to be shared by every file of a run.
#[derive(Debug)]
pub struct ModuleResolver {
  root: PathBuf,
  format: ModuleFormat,
  table: OnceCell<HashSet<String>>,
}

impl ModuleResolver {
  /// A resolver for the library installed at `root`, e.g. `./node_modules/nanoutils`.
  pub fn new(root: impl Into<PathBuf>, options: TransformOptions) -> ModuleResolver {
    ModuleResolver {
      root: root.into(),
      format: options.module_format,
      table: OnceCell::new(),
    }
  }

  /// Finds `node_modules/nanoutils` in `start` or its closest ancestor that has one, the way node
  /// resolves a bare import.
  pub fn discover(start: &Path, options: TransformOptions) -> Result<ModuleResolver, ModularizeError> {
    let root = start
      .ancestors()
      .map(|dir| dir.join("node_modules").join(LIBRARY))
      .find(|candidate| candidate.is_dir())
      .ok_or_else(|| ModularizeError::LibraryNotFound {
        searched_from: start.to_path_buf(),
      })?;
    debug!(root = %root.display(), "discovered library");
    Ok(ModuleResolver::new(root, options))
  }

  /// A resolver with a fixed set of known names that never touches the file system.
  pub fn from_names<I, S>(names: I, options: TransformOptions) -> ModuleResolver
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let table = OnceCell::new();
    // A fresh cell cannot already be set.
    let _ = table.set(names.into_iter().map(Into::into).collect());
    ModuleResolver {
      root: PathBuf::new(),
      format: options.module_format,
      table,
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn format(&self) -> ModuleFormat {
    self.format
  }

  fn table(&self) -> Result<&HashSet<String>, ModularizeError> {
    self.table.get_or_try_init(|| scan_functions(&self.root.join("lib")))
  }

  pub fn is_known(&self, name: &str) -> Result<bool, ModularizeError> {
    Ok(self.table()?.contains(name))
  }

  /// The module path to import `name` from, e.g. `nanoutils/lib/map`.
  pub fn resolve(&self, name: &str) -> Result<String, ModularizeError> {
    if !self.is_known(name)? {
      return Err(ModularizeError::Resolution {
        name: name.to_string(),
      });
    };
    Ok(format!("{}/{}/{}", LIBRARY, self.format.directory(), name))
  }
}

fn scan_functions(dir: &Path) -> Result<HashSet<String>, ModularizeError> {
  let entries = fs::read_dir(dir).map_err(|err| ModularizeError::io(dir, err))?;
  let mut names = HashSet::new();
  for entry in entries {
    let entry = entry.map_err(|err| ModularizeError::io(dir, err))?;
    let path = entry.path();
    let file_type = entry
      .file_type()
      .map_err(|err| ModularizeError::io(&path, err))?;
    let name = if file_type.is_dir() {
      path.file_name()
    } else {
      path.file_stem()
    };
    let Some(name) = name.and_then(|n| n.to_str()) else {
      continue;
    };
    if name.is_empty() || name.starts_with('.') {
      continue;
    };
    names.insert(name.to_string());
  }
  debug!(dir = %dir.display(), count = names.len(), "read nanoutils function table");
  Ok(names)
}
