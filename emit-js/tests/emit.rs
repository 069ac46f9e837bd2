use emit_js::emit_js;
use emit_js::EmitErrorKind;
use parse_js::ast::module::ExportClause;
use parse_js::ast::stmt::Stmt;

fn emitted(source: &str) -> String {
  emit_js(&parse_js::parse(source).unwrap()).unwrap()
}

#[test]
fn emits_imports_and_exports_compactly() {
  assert_eq!(
    emitted(r#"import { map, filter as f } from "nanoutils";"#),
    r#"import{map,filter as f}from"nanoutils";"#
  );
  assert_eq!(
    emitted("import _map from 'nanoutils/lib/map';\n_map(x);"),
    r#"import _map from"nanoutils/lib/map";_map(x);"#
  );
  assert_eq!(emitted("import * as N from 'a'"), r#"import*as N from"a";"#);
  assert_eq!(emitted("import 'a'"), r#"import"a";"#);
  assert_eq!(emitted("export { _map as map, b };"), "export{_map as map,b};");
  assert_eq!(emitted("export * as ns from 'a';"), r#"export*as ns from"a";"#);
  assert_eq!(
    emitted("export default function () {}"),
    "export default function(){}"
  );
}

#[test]
fn parenthesises_statement_starts() {
  assert_eq!(emitted("(function () {})();"), "(function(){}());");
  assert_eq!(emitted("({ a } = b);"), "({a}=b);");
  assert_eq!(emitted("({}).x;"), "({}.x);");
}

#[test]
fn parenthesises_by_precedence() {
  assert_eq!(emitted("a = (b, c);"), "a=(b,c);");
  assert_eq!(emitted("x = (a + b) * c;"), "x=(a+b)*c;");
  assert_eq!(emitted("x = a + (b + c);"), "x=a+(b+c);");
  assert_eq!(emitted("x = (a ?? b) || c;"), "x=(a??b)||c;");
  assert_eq!(emitted("new (a.b())();"), "new(a.b())();");
  assert_eq!(emitted("x = a + +b - -c;"), "x=a+ +b- -c;");
}

#[test]
fn emits_statements() {
  assert_eq!(
    emitted("if (a) if (b) c(); else d();"),
    "if(a)if(b)c();else d();"
  );
  assert_eq!(
    emitted("if (a) { if (b) c(); } else d();"),
    "if(a){if(b)c();}else d();"
  );
  assert_eq!(
    emitted("label: for (;;) break label;"),
    "label:for(;;)break label;"
  );
  assert_eq!(
    emitted(r#"for (var i = ("x" in o); i;) {}"#),
    r#"for(var i=("x"in o);i;){}"#
  );
  assert_eq!(emitted("let x = 1, y; ;"), "let x=1,y;;");
  assert_eq!(
    emitted("try { a() } catch { } finally { b() }"),
    "try{a();}catch{}finally{b();}"
  );
  assert_eq!(emitted("do x++; while (x < 3)"), "do x++;while(x<3);");
  assert_eq!(emitted("f = () => { a(); };"), "f=()=>{a();};");
  assert_eq!(emitted("const s = 'it\\'s';"), r#"const s="it's";"#);
}

#[test]
fn keeps_source_details_that_change_meaning() {
  assert_eq!(emitted("#!/usr/bin/env node\nrun();"), "#!/usr/bin/env node\nrun();");
  assert_eq!(emitted(r#"("use strict");"#), r#"("use strict");"#);
  assert_eq!(emitted(r#"x = "\uD800";"#), r#"x="\uD800";"#);
  assert_eq!(emitted("x = { 'a-b': 1, 2: 3 };"), r#"x={"a-b":1,2:3};"#);
}

#[test]
fn rejects_unrepresentable_trees() {
  let mut module = parse_js::parse("export * from 'a';").unwrap();
  let Stmt::ExportList(list) = module.stx.body[0].stx.as_mut() else {
    panic!("not an export list");
  };
  list.stx.from = None;
  assert!(matches!(list.stx.clause, ExportClause::All(None)));
  let err = emit_js(&module).unwrap_err();
  assert!(matches!(err.kind, EmitErrorKind::Unsupported(_)));
  assert!(err.loc.is_some());
}
