use ahash::HashMap;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::iter;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Identity of one declared binding. Two bindings with the same name in different scopes have
/// different symbols.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Symbol(u64);

impl Symbol {
  pub fn id(self) -> u64 {
    self.0
  }
}

/// Shared counter behind every scope of one module.
#[derive(Clone, Default)]
pub struct SymbolGenerator(Arc<AtomicU64>);

impl SymbolGenerator {
  pub fn new() -> SymbolGenerator {
    SymbolGenerator::default()
  }

  pub fn next(&self) -> Symbol {
    Symbol(self.0.fetch_add(1, Ordering::Relaxed))
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScopeKind {
  Module,
  /// A non-arrow function body, or a class static block.
  Function,
  Arrow,
  Block,
}

impl ScopeKind {
  /// `var` declarations stop at scopes of this kind.
  pub fn is_var_target(self) -> bool {
    self != ScopeKind::Block
  }
}

/// What introduced a binding.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeclKind {
  /// `import { a }` and `import { a as b }`.
  ImportNamed,
  /// `import a`.
  ImportDefault,
  /// `import * as a`.
  ImportNamespace,
  Var,
  Let,
  Const,
  Function,
  Class,
  Param,
  Catch,
}

impl DeclKind {
  pub fn is_import(self) -> bool {
    matches!(
      self,
      DeclKind::ImportNamed | DeclKind::ImportDefault | DeclKind::ImportNamespace
    )
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Binding {
  pub symbol: Symbol,
  pub kind: DeclKind,
}

pub struct ScopeData {
  generator: SymbolGenerator,
  parent: Option<Scope>,
  kind: ScopeKind,
  bindings: HashMap<String, Binding>,
  /// Names in declaration order.
  names: Vec<String>,
}

impl ScopeData {
  /// Declares `name` here and returns its symbol. Declaring a name again keeps the first binding.
  pub fn declare(&mut self, name: &str, kind: DeclKind) -> Symbol {
    if let Some(existing) = self.bindings.get(name) {
      return existing.symbol;
    };
    let symbol = self.generator.next();
    self.names.push(name.to_string());
    self.bindings.insert(name.to_string(), Binding { symbol, kind });
    symbol
  }

  pub fn binding(&self, name: &str) -> Option<Binding> {
    self.bindings.get(name).copied()
  }

  pub fn names(&self) -> &[String] {
    &self.names
  }

  pub fn kind(&self) -> ScopeKind {
    self.kind
  }
}

/// Shared handle to a scope. Scopes only point to their parents. Two handles are equal when they
/// refer to the same scope.
#[derive(Clone)]
pub struct Scope(Arc<RwLock<ScopeData>>);

impl Scope {
  pub fn new_module() -> Scope {
    Scope::new(SymbolGenerator::new(), None, ScopeKind::Module)
  }

  pub fn new(generator: SymbolGenerator, parent: Option<Scope>, kind: ScopeKind) -> Scope {
    Scope(Arc::new(RwLock::new(ScopeData {
      generator,
      parent,
      kind,
      bindings: HashMap::default(),
      names: Vec::new(),
    })))
  }

  pub fn data(&self) -> RwLockReadGuard<'_, ScopeData> {
    self.0.read()
  }

  pub fn data_mut(&self) -> RwLockWriteGuard<'_, ScopeData> {
    self.0.write()
  }

  pub fn parent(&self) -> Option<Scope> {
    self.data().parent.clone()
  }

  pub fn kind(&self) -> ScopeKind {
    self.data().kind
  }

  pub fn child(&self, kind: ScopeKind) -> Scope {
    let generator = self.data().generator.clone();
    Scope::new(generator, Some(self.clone()), kind)
  }

  /// This scope, then each enclosing one up to the module.
  pub fn chain(&self) -> impl Iterator<Item = Scope> {
    iter::successors(Some(self.clone()), Scope::parent)
  }

  /// Where a `var` declared in this scope lands.
  pub fn var_target(&self) -> Scope {
    self
      .chain()
      .find(|scope| scope.kind().is_var_target())
      .unwrap_or_else(|| self.clone())
  }

  /// The binding `name` refers to from here, with the scope that declares it.
  pub fn resolve(&self, name: &str) -> Option<(Scope, Binding)> {
    self.chain().find_map(|scope| {
      let binding = scope.data().binding(name)?;
      Some((scope, binding))
    })
  }

  pub fn resolve_binding(&self, name: &str) -> Option<Binding> {
    self.resolve(name).map(|(_, binding)| binding)
  }
}

impl PartialEq for Scope {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Scope {}

impl Hash for Scope {
  fn hash<H: Hasher>(&self, state: &mut H) {
    Arc::as_ptr(&self.0).hash(state);
  }
}

impl fmt::Debug for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let data = self.data();
    f.debug_struct("Scope")
      .field("kind", &data.kind)
      .field("names", &data.names)
      .finish()
  }
}
