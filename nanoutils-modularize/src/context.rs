use crate::resolver::ModuleResolver;
use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;
use ahash::HashSetExt;
use derive_visitor::Drive;
use derive_visitor::Visitor;
use parse_js::ast::expr::Ident;
use parse_js::ast::module::Module;
use parse_js::ast::node::Node;
use parse_js::ast::pat::DeclName;
use parse_js::ast::pat::IdentPat;
use parse_js::ast::stmt::Stmt;
use symbol_js::symbol::Scope;

/// State for transforming one file. Nothing in here outlives the file; only the resolver is
/// shared between files.
pub struct FileContext<'r> {
  pub(crate) resolver: &'r ModuleResolver,
  pub(crate) module_scope: Scope,
  // Locals bound by `import N from`, `import * as N from` and `import { default as N } from`.
  pub(crate) namespace_bindings: HashSet<String>,
  // Local name to the nanoutils function it was imported as.
  pub(crate) named_bindings: HashMap<String, String>,
  // Logical function name to the local bound by its synthesized import.
  pub(crate) import_cache: HashMap<String, String>,
  pub(crate) pending_imports: Vec<Node<Stmt>>,
  used_names: HashSet<String>,
}

impl<'r> FileContext<'r> {
  pub fn new(resolver: &'r ModuleResolver, module_scope: Scope, module: &Node<Module>) -> Self {
    FileContext {
      resolver,
      module_scope,
      namespace_bindings: HashSet::new(),
      named_bindings: HashMap::new(),
      import_cache: HashMap::new(),
      pending_imports: Vec::new(),
      used_names: collect_used_names(module),
    }
  }

  pub fn has_bindings(&self) -> bool {
    !self.namespace_bindings.is_empty() || !self.named_bindings.is_empty()
  }

  /// Picks a local for the import of `name` that collides with nothing in the file: `_map`, then
  /// `_map2`, `_map3` and so on.
  pub(crate) fn fresh_local(&mut self, name: &str) -> String {
    let base = format!("_{}", sanitize(name));
    let mut candidate = base.clone();
    let mut suffix = 2;
    while self.used_names.contains(&candidate) {
      candidate = format!("{base}{suffix}");
      suffix += 1;
    }
    self.used_names.insert(candidate.clone());
    candidate
  }

  pub(crate) fn take_pending_imports(&mut self) -> Vec<Node<Stmt>> {
    std::mem::take(&mut self.pending_imports)
  }
}

// Library file names like `is-nil` are not valid identifiers.
fn sanitize(name: &str) -> String {
  name
    .chars()
    .map(|c| match c {
      '$' | '_' => c,
      c if c.is_alphanumeric() => c,
      _ => '_',
    })
    .collect()
}

// Every identifier in the file, bound or not. A fresh local must not capture a global either.
fn collect_used_names(module: &Node<Module>) -> HashSet<String> {
  type DeclNameNode = Node<DeclName>;
  type IdentNode = Node<Ident>;
  type IdentPatNode = Node<IdentPat>;

  #[derive(Default, Visitor)]
  #[visitor(DeclNameNode(enter), IdentNode(enter), IdentPatNode(enter))]
  struct Names {
    seen: HashSet<String>,
  }

  impl Names {
    fn enter_decl_name_node(&mut self, node: &DeclNameNode) {
      self.seen.insert(node.stx.name.clone());
    }

    fn enter_ident_node(&mut self, node: &IdentNode) {
      self.seen.insert(node.stx.name.clone());
    }

    fn enter_ident_pat_node(&mut self, node: &IdentPatNode) {
      self.seen.insert(node.stx.name.clone());
    }
  }

  let mut names = Names::default();
  module.drive(&mut names);
  names.seen
}
