use crate::ast::class::ClassMember;
use crate::ast::expr::Expr;
use crate::ast::func::FunctionBody;
use crate::ast::module::ExportClause;
use crate::ast::module::ImportClause;
use crate::ast::module::ModuleName;
use crate::ast::pat::Pat;
use crate::ast::stmt::ExportMode;
use crate::ast::stmt::ForHead;
use crate::ast::stmt::ForInit;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorKind;
use crate::parse;
use serde_json::json;

fn parse_stmts(source: &str) -> Vec<Stmt> {
  parse(source)
    .unwrap()
    .stx
    .body
    .into_iter()
    .map(|stmt| *stmt.stx)
    .collect()
}

fn parse_single(source: &str) -> Stmt {
  let mut stmts = parse_stmts(source);
  assert_eq!(stmts.len(), 1, "expected one statement in {source:?}");
  stmts.remove(0)
}

fn parse_expr(source: &str) -> Expr {
  match parse_single(source) {
    Stmt::Expr(stmt) => *stmt.stx.expr.stx,
    other => panic!("not an expression statement: {other:?}"),
  }
}

fn error_kind(source: &str) -> SyntaxErrorKind {
  match parse(source) {
    Ok(_) => panic!("{source:?} parsed without error"),
    Err(err) => err.kind,
  }
}

#[test]
fn parses_every_import_clause_shape() {
  let Stmt::Import(import) =
    parse_single(r#"import nano, { map, filter as f, "x-y" as xy } from "nanoutils";"#)
  else {
    panic!("not an import");
  };
  assert_eq!(import.stx.module, "nanoutils");
  assert_eq!(import.stx.default.as_ref().unwrap().stx.name, "nano");
  let Some(ImportClause::Named(names)) = &import.stx.clause else {
    panic!("expected named imports");
  };
  let pairs: Vec<_> = names
    .iter()
    .map(|n| (n.stx.imported.clone(), n.stx.local.stx.name.clone()))
    .collect();
  assert_eq!(pairs, vec![
    (ModuleName::Ident("map".into()), "map".into()),
    (ModuleName::Ident("filter".into()), "f".into()),
    (ModuleName::Str("x-y".into()), "xy".into()),
  ]);

  let Stmt::Import(import) = parse_single("import * as N from 'nanoutils'") else {
    panic!("not an import");
  };
  assert!(import.stx.default.is_none());
  assert!(matches!(&import.stx.clause, Some(ImportClause::Namespace(ns)) if ns.stx.name == "N"));

  let Stmt::Import(import) = parse_single("import 'side-effect' with { type: 'css' }") else {
    panic!("not an import");
  };
  assert_eq!(import.stx.module, "side-effect");
  assert!(import.stx.default.is_none() && import.stx.clause.is_none());
  assert_eq!(import.stx.attributes[0].value, "css");
}

#[test]
fn import_of_reserved_name_requires_alias() {
  assert_eq!(
    error_kind(r#"import { default } from "nanoutils";"#),
    SyntaxErrorKind::ReservedWord("default".into())
  );
  assert!(parse(r#"import { default as d, if as i } from "nanoutils";"#).is_ok());
}

#[test]
fn imported_names_cannot_be_redeclared() {
  assert_eq!(
    error_kind("import { map } from 'nanoutils';\nconst map = 1;"),
    SyntaxErrorKind::Redeclaration("map".into())
  );
  assert_eq!(
    error_kind("import a from 'a';\nimport * as a from 'b';"),
    SyntaxErrorKind::Redeclaration("a".into())
  );
}

#[test]
fn dynamic_import_and_import_meta_are_expressions() {
  let stmts = parse_stmts("import('nanoutils').then(x => x);\nimport.meta.url;");
  assert_eq!(stmts.len(), 2);
  assert!(stmts.iter().all(|s| matches!(s, Stmt::Expr(_))));
}

#[test]
fn parses_export_forms() {
  let stmts = parse_stmts(
    r#"
    const a = 1, b = 2;
    export { a, b as default };
    export * from "nanoutils";
    export * as ns from "nanoutils";
    export { map as m } from "nanoutils";
    export const c = 1, d = 2;
    export async function e() {}
    export class F {}
    "#,
  );
  assert_eq!(stmts.len(), 8);
  let Stmt::ExportList(list) = &stmts[1] else {
    panic!("not an export list");
  };
  assert!(list.stx.from.is_none());
  let ExportClause::Named(names) = &list.stx.clause else {
    panic!("expected named exports");
  };
  assert_eq!(names[1].stx.exported.as_str(), "default");
  assert!(matches!(&stmts[2], Stmt::ExportList(l) if matches!(l.stx.clause, ExportClause::All(None))));
  assert!(matches!(
    &stmts[3],
    Stmt::ExportList(l) if matches!(&l.stx.clause, ExportClause::All(Some(n)) if n.as_str() == "ns")
  ));
  assert!(matches!(&stmts[4], Stmt::ExportList(l) if l.stx.from.as_deref() == Some("nanoutils")));
  assert!(matches!(&stmts[5], Stmt::Var(v) if v.stx.export && v.stx.declarators.len() == 2));
  assert!(matches!(
    &stmts[6],
    Stmt::Function(f) if f.stx.export == ExportMode::Named && f.stx.func.stx.is_async
  ));
  assert!(matches!(&stmts[7], Stmt::Class(c) if c.stx.export == ExportMode::Named));

  let Stmt::Function(func) = parse_single("export default function () {}") else {
    panic!("not a function");
  };
  assert_eq!(func.stx.export, ExportMode::Default);
  assert!(func.stx.name.is_none());
  assert!(matches!(parse_single("export default map(x);"), Stmt::ExportDefault(_)));
}

#[test]
fn export_list_names_must_be_declared() {
  assert_eq!(
    error_kind("export { missing };"),
    SyntaxErrorKind::UndeclaredExport("missing".into())
  );
  // Declarations later in the module count.
  assert!(parse("export { later };\nfunction later() {}").is_ok());
  assert!(parse("export { map } from 'nanoutils';").is_ok());
}

#[test]
fn exported_names_must_be_unique() {
  assert_eq!(
    error_kind("export const a = 1;\nexport function a() {}"),
    SyntaxErrorKind::Redeclaration("a".into())
  );
  assert_eq!(
    error_kind("export default 1;\nexport default 2;"),
    SyntaxErrorKind::DuplicateExport("default".into())
  );
  assert_eq!(
    error_kind("const a = 1, b = 2;\nexport { a as x, b as x };"),
    SyntaxErrorKind::DuplicateExport("x".into())
  );
}

#[test]
fn export_star_requires_source() {
  assert!(parse("export * as ns;").is_err());
}

#[test]
fn parses_require_destructuring() {
  let Stmt::Var(decl) = parse_single(r#"const { map, filter: f, ...rest } = require("nanoutils");"#)
  else {
    panic!("not a declaration");
  };
  let declarator = &decl.stx.declarators[0];
  let Pat::Object(obj) = declarator.pat.stx.pat.stx.as_ref() else {
    panic!("expected an object pattern");
  };
  assert_eq!(obj.stx.props.len(), 2);
  assert!(obj.stx.props[0].stx.is_shorthand());
  assert!(!obj.stx.props[1].stx.is_shorthand());
  assert!(matches!(obj.stx.rest.as_ref().unwrap().stx.as_ref(), Pat::Ident(id) if id.stx.name == "rest"));
  assert!(matches!(
    declarator.init.as_ref().unwrap().stx.as_ref(),
    Expr::Call(_)
  ));
}

#[test]
fn chooses_the_right_for_loop() {
  let stmts = parse_stmts(
    "for (const k in o) {}\nfor await (const [a, b] of c) {}\nfor (let i = 0, j = 1; i < j; i++) x();\nfor (x of y);",
  );
  assert!(matches!(&stmts[0], Stmt::ForIn(f) if matches!(f.stx.head, ForHead::Var(_))));
  assert!(matches!(&stmts[1], Stmt::ForOf(f) if f.stx.is_await));
  assert!(matches!(&stmts[2], Stmt::For(f) if matches!(f.stx.init, ForInit::Var(_))));
  assert!(matches!(&stmts[3], Stmt::ForOf(f) if matches!(f.stx.head, ForHead::Pat(_))));
}

#[test]
fn in_is_an_operator_again_inside_a_for_head() {
  let Stmt::For(stmt) = parse_single("for (let i = (a in b) ? 1 : [c in d]; ; ) {}") else {
    panic!("not a for loop");
  };
  assert!(stmt.stx.test.is_none());
}

#[test]
fn member_expressions_are_assignment_targets() {
  for source in [
    "for (x.y of z);",
    "for (x.y in z);",
    "for (a[0] of z);",
    "for ([a.b, c[0]] of z);",
  ] {
    let head = match parse_single(source) {
      Stmt::ForOf(stmt) => stmt.stx.head,
      Stmt::ForIn(stmt) => stmt.stx.head,
      other => panic!("not a for...in/of loop: {other:?}"),
    };
    assert!(matches!(head, ForHead::Pat(_)), "{source}");
  }

  let Expr::Assign(assign) = parse_expr("[a.b] = c;") else {
    panic!("not an assignment");
  };
  let Pat::Array(arr) = assign.stx.target.stx.as_ref() else {
    panic!("expected an array pattern");
  };
  let target = &arr.stx.elements[0].as_ref().unwrap().target;
  assert!(matches!(target.stx.as_ref(), Pat::Member(m) if matches!(m.stx.as_ref(), Expr::Member(_))));

  let Expr::Assign(assign) = parse_expr("({ a: b.c } = d);") else {
    panic!("not an assignment");
  };
  let Pat::Object(obj) = assign.stx.target.stx.as_ref() else {
    panic!("expected an object pattern");
  };
  assert!(matches!(obj.stx.props[0].stx.target.stx.as_ref(), Pat::Member(_)));

  assert!(parse("({ a: b[0] = 1, ...c.d } = e);").is_ok());
  assert!(parse("a.b = 1; a[b] += 2; a.b++; --a[0];").is_ok());
}

#[test]
fn optional_chains_and_calls_are_not_assignment_targets() {
  for source in [
    "a?.b = 1;",
    "for (a?.b of c);",
    "[a?.[0]] = b;",
    "f() = 1;",
    "a + b = c;",
    "++a?.b;",
    "({ a }) = b;",
  ] {
    assert_eq!(error_kind(source), SyntaxErrorKind::InvalidAssignmentTarget, "{source}");
  }
  assert_eq!(error_kind("eval = 1;"), SyntaxErrorKind::RestrictedBinding("eval".into()));
}

#[test]
fn nullish_cannot_mix_with_logical_operators() {
  for source in ["a ?? b || c;", "a || b ?? c;", "a && b ?? c;", "a ?? b && c;"] {
    assert_eq!(error_kind(source), SyntaxErrorKind::MixedNullish, "{source}");
  }
  for source in ["(a ?? b) || c;", "a ?? (b || c);", "a ?? b ?? c;", "(a && b) ?? c;"] {
    assert!(parse(source).is_ok(), "{source}");
  }
}

#[test]
fn malformed_literals_are_syntax_errors() {
  assert_eq!(error_kind("x = 08.5;"), SyntaxErrorKind::InvalidNumber);
  assert_eq!(error_kind("x = 0755;"), SyntaxErrorKind::InvalidNumber);
  assert_eq!(error_kind(r#"x = "\u{110000}";"#), SyntaxErrorKind::InvalidEscape);
  assert_eq!(error_kind(r#"x = "\07";"#), SyntaxErrorKind::InvalidEscape);
}

#[test]
fn labels_cannot_shadow_enclosing_labels() {
  assert_eq!(
    error_kind("label: label: x;"),
    SyntaxErrorKind::DuplicateLabel("label".into())
  );
  assert_eq!(
    error_kind("a: { b: { a: x; } }"),
    SyntaxErrorKind::DuplicateLabel("a".into())
  );
  // Sibling labels and labels in nested functions are separate.
  assert!(parse("a: x;\na: y;\na: { (function () { a: z; }); }").is_ok());
}

#[test]
fn jumps_must_have_a_target() {
  assert!(parse("a: b: for (;;) { continue a; }").is_ok());
  assert!(parse("a: { break a; }").is_ok());
  assert!(parse("for (;;) { switch (x) { case 1: break; default: continue; } }").is_ok());
  assert_eq!(error_kind("a: { continue a; }"), SyntaxErrorKind::UnknownLabel("a".into()));
  assert_eq!(error_kind("while (x) break b;"), SyntaxErrorKind::UnknownLabel("b".into()));
  assert!(matches!(error_kind("break;"), SyntaxErrorKind::Invalid(_)));
  assert!(matches!(error_kind("switch (x) { case 1: continue; }"), SyntaxErrorKind::Invalid(_)));
}

#[test]
fn exponent_base_cannot_be_unary() {
  assert_eq!(error_kind("-a ** 2;"), SyntaxErrorKind::UnparenthesizedUnaryBase);
  assert!(parse("(-a) ** 2; a ** -b; 2 ** 3 ** 2;").is_ok());
}

#[test]
fn reports_redeclarations() {
  for (source, name) in [
    ("let a; let a;", "a"),
    ("const a = 1; var a;", "a"),
    ("function f() {} let f;", "f"),
    ("{ var a; } let a;", "a"),
    ("try {} catch (e) { let e; }", "e"),
    ("function f(a, a) {}", "a"),
    ("class C {} class C {}", "C"),
  ] {
    assert_eq!(error_kind(source), SyntaxErrorKind::Redeclaration(name.into()), "{source}");
  }
  for source in [
    "var a; var a;",
    "function f() { var a; { var a; } }",
    "let a; { let a; }",
    "try {} catch (e) { var e; }",
    "function f(a) { var a; }",
    "for (let i;;) {} for (let i;;) {}",
  ] {
    assert!(parse(source).is_ok(), "{source}");
  }
}

#[test]
fn applies_automatic_semicolon_insertion() {
  let stmts = parse_stmts("let a = 1\nlet b = a\nreturn_()\n{ a }\nthrow b");
  assert_eq!(stmts.len(), 5);

  let Stmt::Function(func) = parse_single("function f() { return\n1 }") else {
    panic!("not a function");
  };
  let FunctionBody::Block(body) = &func.stx.func.stx.body else {
    panic!("expected a block body");
  };
  // `1` becomes its own statement.
  assert_eq!(body.len(), 2);
  assert!(matches!(body[0].stx.as_ref(), Stmt::Return(ret) if ret.stx.value.is_none()));

  let stmts = parse_stmts("a\n++b");
  assert_eq!(stmts.len(), 2);
  assert!(parse("a b").is_err());
  assert!(parse("throw\nerr;").is_err());
}

#[test]
fn strict_mode_rules_always_apply() {
  for source in [
    "with (o) {}",
    "let.x = 1;",
    "var let = 1;",
    "delete x;",
    "if (a) function f() {}",
    "return 1;",
    "var yield;",
  ] {
    assert!(parse(source).is_err(), "{source}");
  }
}

#[test]
fn parses_statement_grab_bag() {
  let stmts = parse_stmts(
    r#"
    "use strict";
    label: while (true) { if (a) break label; else continue label; }
    do x++; while (x < 10)
    switch (x) { case 1: case 2: y(); break; default: z() }
    try { a() } catch ({ message }) { b(message) } finally { c() }
    try { a() } catch { }
    debugger;
    ;
    class A extends B { static x = 1; #y; get z() { return 1 } set z(v) {} static async *gen() {} static { this.w = 1 } }
    const f = async (a, { b } = {}, ...c) => a ? b : c;
    const t = tag`a${b}c`;
    "#,
  );
  assert_eq!(stmts.len(), 11);
  assert!(matches!(&stmts[1], Stmt::Labeled(_)));
  assert!(matches!(&stmts[3], Stmt::Switch(s) if s.stx.cases.len() == 3));
  assert!(matches!(&stmts[4], Stmt::Try(t) if t.stx.handler.is_some() && t.stx.finalizer.is_some()));
  assert!(matches!(&stmts[5], Stmt::Try(t) if t.stx.handler.as_ref().unwrap().stx.param.is_none()));
  let Stmt::Class(class) = &stmts[8] else {
    panic!("not a class");
  };
  assert_eq!(class.stx.members.len(), 6);
  assert!(matches!(class.stx.members[5].stx.as_ref(), ClassMember::StaticBlock { .. }));
}

#[test]
fn tells_arrow_functions_from_parenthesized_expressions() {
  assert!(matches!(parse_expr("(a, b) => a;"), Expr::Arrow(_)));
  assert!(matches!(parse_expr("(a, b);"), Expr::Seq(_)));
  assert!(matches!(parse_expr("async x => x;"), Expr::Arrow(_)));
  assert!(matches!(parse_expr("async (x);"), Expr::Call(_)));
  assert!(matches!(parse_expr("({ a = 1 }) => a;"), Expr::Arrow(_)));
  assert!(parse("(a, b)\n=> a;").is_err());
  assert!(parse("(a, a) => a;").is_err());
}

#[test]
fn shorthand_initializers_only_appear_in_patterns() {
  assert!(parse("({ a = 1 } = b);").is_ok());
  assert!(parse("[{ a = 1 }] = b;").is_ok());
  assert!(parse("for ({ a = 1 } of b);").is_ok());
  assert!(matches!(error_kind("({ a = 1 });"), SyntaxErrorKind::Invalid(_)));
  assert!(matches!(error_kind("f({ a = 1 });"), SyntaxErrorKind::Invalid(_)));
}

#[test]
fn wraps_optional_chains() {
  let Expr::Chain(chain) = parse_expr("a?.b.c();") else {
    panic!("not a chain");
  };
  assert!(matches!(chain.stx.expr.stx.as_ref(), Expr::Call(_)));
  // The parentheses end the chain.
  let Expr::Member(member) = parse_expr("(a?.b).c;") else {
    panic!("not a member access");
  };
  assert!(matches!(member.stx.object.stx.as_ref(), Expr::Chain(_)));
  assert!(parse("a?.b`c`;").is_err());
  assert!(parse("new a?.b();").is_err());
}

#[test]
fn class_members_follow_class_rules() {
  assert!(parse("class A { constructor() {} constructor() {} }").is_err());
  assert!(parse("class A { get constructor() {} }").is_err());
  assert!(parse("class A { #constructor() {} }").is_err());
  assert!(parse("class A { static prototype = 1 }").is_err());
  assert!(parse("class A { m() { super(); } }").is_err());
  assert!(parse("class A extends B { constructor() { super(); } }").is_ok());
  assert!(parse("class A { static = 1; get; set; async; static static() {} }").is_ok());
  assert!(parse("({ get: 1, set() {}, async *gen() {}, get [k]() { return 1 } });").is_ok());
}

#[test]
fn counts_directive_prologue() {
  let module = parse("'use strict';\n\"use client\";\nimport a from 'a';\n'not a directive';").unwrap();
  assert_eq!(module.stx.directive_count(), 2);
  assert_eq!(parse("a();'use strict'").unwrap().stx.directive_count(), 0);
}

#[test]
fn keeps_the_hashbang() {
  let module = parse("#!/usr/bin/env node\nrun();").unwrap();
  assert_eq!(module.stx.hashbang.as_deref(), Some("/usr/bin/env node"));
  assert_eq!(module.stx.body.len(), 1);
}

#[test]
fn serializes_by_variant_name() {
  let module = parse("import { map } from 'nanoutils';").unwrap();
  let value = serde_json::to_value(&module).unwrap();
  assert_eq!(value["body"][0]["Import"]["module"], json!("nanoutils"));
}

#[test]
fn reports_line_and_column() {
  let err = parse("let a = 1;\nlet b = );").unwrap_err();
  assert_eq!((err.position.line, err.position.column), (2, 9));
  assert_eq!(err.to_string(), "expected an expression but found `)` at 2:9");
}
