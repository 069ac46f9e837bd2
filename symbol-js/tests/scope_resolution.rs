use derive_visitor::Drive;
use derive_visitor::Visitor;
use parse_js::ast::expr::Ident;
use parse_js::ast::node::Node;
use parse_js::ast::pat::IdentPat;
use parse_js::parse;
use symbol_js::analyze_module;
use symbol_js::symbol::DeclKind;
use symbol_js::symbol::Scope;
use symbol_js::symbol::ScopeKind;

type IdentNode = Node<Ident>;
type IdentPatNode = Node<IdentPat>;

/// What each reference to `name` resolves to, in source order.
#[derive(Visitor)]
#[visitor(IdentNode(enter))]
struct References {
  name: &'static str,
  kinds: Vec<Option<DeclKind>>,
}

impl References {
  pub fn enter_ident_node(&mut self, node: &IdentNode) {
    if node.stx.name == self.name {
      let scope = node.assoc.get::<Scope>().unwrap();
      self
        .kinds
        .push(scope.resolve_binding(self.name).map(|binding| binding.kind));
    }
  }
}

fn resolve_references(source: &str, name: &'static str) -> Vec<Option<DeclKind>> {
  let mut module = parse(source).unwrap();
  analyze_module(&mut module);
  let mut refs = References {
    name,
    kinds: Vec::new(),
  };
  module.drive(&mut refs);
  refs.kinds
}

/// Scopes attached to the binding and the last reference named `value`.
#[derive(Default, Visitor)]
#[visitor(IdentPatNode(enter), IdentNode(enter))]
struct ValueScopes {
  binding: Option<Scope>,
  reference: Option<Scope>,
}

impl ValueScopes {
  pub fn enter_ident_pat_node(&mut self, node: &IdentPatNode) {
    if node.stx.name == "value" {
      self.binding = node.assoc.get::<Scope>().cloned();
    }
  }

  pub fn enter_ident_node(&mut self, node: &IdentNode) {
    if node.stx.name == "value" {
      self.reference = node.assoc.get::<Scope>().cloned();
    }
  }
}

#[test]
fn references_resolve_to_the_declaring_scope() {
  let mut module = parse(
    r#"
      function outer() {
        let value = 1;
        return function inner() {
          return value;
        };
      }
    "#,
  )
  .unwrap();
  let module_scope = analyze_module(&mut module);
  assert_eq!(module_scope.kind(), ScopeKind::Module);
  assert_eq!(
    module_scope.data().binding("outer").unwrap().kind,
    DeclKind::Function
  );

  let mut scopes = ValueScopes::default();
  module.drive(&mut scopes);
  let binding = scopes.binding.unwrap();
  let reference = scopes.reference.unwrap();
  assert_ne!(binding, reference);

  let (owner, resolved) = reference.resolve("value").unwrap();
  assert_eq!(owner, binding);
  assert_eq!(resolved.kind, DeclKind::Let);
}

#[test]
fn import_kinds() {
  let mut module =
    parse(r#"import nano, { map, filter as f } from "nanoutils"; import * as N from "nanoutils";"#)
      .unwrap();
  let module_scope = analyze_module(&mut module);
  let data = module_scope.data();
  assert_eq!(data.binding("nano").unwrap().kind, DeclKind::ImportDefault);
  assert_eq!(data.binding("map").unwrap().kind, DeclKind::ImportNamed);
  assert_eq!(data.binding("f").unwrap().kind, DeclKind::ImportNamed);
  assert!(data.binding("filter").is_none());
  assert_eq!(data.binding("N").unwrap().kind, DeclKind::ImportNamespace);
}

#[test]
fn shadowing_declarations_win() {
  let source = r#"
    import { map } from "nanoutils";
    map(a);
    function f(map) { map(a); }
    const g = ({ map }) => map(a);
    try {} catch (map) { map(a); }
    { let map = 1; map(a); }
    { class map {} map(a); }
    { function map() {} map(a); }
    for (const map of list) map(a);
    (function () { var b = () => map(a); { var map; } })();
    const h = function map() { map(a); };
    const k = (x = map) => x;
  "#;
  assert_eq!(resolve_references(source, "map"), vec![
    Some(DeclKind::ImportNamed),
    Some(DeclKind::Param),
    Some(DeclKind::Param),
    Some(DeclKind::Catch),
    Some(DeclKind::Let),
    Some(DeclKind::Class),
    Some(DeclKind::Function),
    Some(DeclKind::Const),
    Some(DeclKind::Var),
    Some(DeclKind::Function),
    Some(DeclKind::ImportNamed),
  ]);
}

#[test]
fn class_bodies_and_static_blocks() {
  let source = r#"
    import { map } from "nanoutils";
    const C = class map { m() { return map; } };
    class D { static { var map = 1; map(a); } field = map; }
  "#;
  assert_eq!(resolve_references(source, "map"), vec![
    Some(DeclKind::Class),
    Some(DeclKind::Var),
    Some(DeclKind::ImportNamed),
  ]);
}

#[test]
fn member_assignment_targets_are_references() {
  let source = r#"import { map } from "nanoutils"; map.x = 1; [map.y] = [2];"#;
  assert_eq!(resolve_references(source, "map"), vec![
    Some(DeclKind::ImportNamed),
    Some(DeclKind::ImportNamed),
  ]);
}

#[test]
fn default_values_are_not_declarations() {
  let source = "const { a = b } = c; [d = e] = f;";
  assert_eq!(resolve_references(source, "b"), vec![None]);
  let mut module = parse(source).unwrap();
  let module_scope = analyze_module(&mut module);
  assert_eq!(module_scope.data().names(), ["a".to_string()]);
}

#[test]
fn unresolved_names_are_globals() {
  assert_eq!(resolve_references("console.log(map);", "map"), vec![None]);
}
