use emit_js::emit_js;
use serde_json::to_string_pretty;
use serde_json::Value;
use similar::ChangeTag;
use similar::TextDiff;

fn syntax_value(source: &str) -> Value {
  let module = parse_js::parse(source).unwrap_or_else(|err| panic!("failed to parse {source:?}: {err}"));
  serde_json::to_value(&module).unwrap()
}

fn diff(expected: &Value, actual: &Value) -> String {
  let expected_fmt = to_string_pretty(expected).unwrap();
  let actual_fmt = to_string_pretty(actual).unwrap();
  let mut msg = String::new();
  for change in TextDiff::from_lines(&expected_fmt, &actual_fmt).iter_all_changes() {
    let sign = match change.tag() {
      ChangeTag::Delete => "-",
      ChangeTag::Insert => "+",
      ChangeTag::Equal => " ",
    };
    msg.push_str(sign);
    msg.push_str(change.as_str().unwrap());
  }
  msg
}

fn assert_roundtrips(source: &str) {
  let module = parse_js::parse(source).unwrap();
  let emitted = emit_js(&module).unwrap();
  let expected = serde_json::to_value(&module).unwrap();
  let actual = syntax_value(&emitted);
  if expected != actual {
    panic!(
      "roundtrip mismatch\nsource:\n{source}\nemitted:\n{emitted}\ndiff:\n{}",
      diff(&expected, &actual)
    );
  };
  // Emitting is stable once the tree is the same.
  assert_eq!(emit_js(&parse_js::parse(&emitted).unwrap()).unwrap(), emitted);
}

#[test]
fn roundtrips_modules() {
  assert_roundtrips(
    r#"
    "use strict";
    import nano, { map as m, "x-y" as xy } from "nanoutils";
    import * as N from "nanoutils";
    import "side-effect";
    export { m as map, xy };
    export * from "./a";
    export * as b from "./b";
    export { default as c } from "./c";
    export default (1, 2);
    export const d = N.map(m, [1, 2, 3]);
    export async function* e() { yield* d; }
    "#,
  );
  assert_roundtrips("export default class extends Base {}");
  assert_roundtrips("export default async function () { await x; }");
  assert_roundtrips("export default (function () {});");
}

#[test]
fn roundtrips_operators() {
  assert_roundtrips(
    r#"
    a = b ? c : d ? e : f;
    a = (b, c);
    x = a + b * c - (d - e) / f % g;
    x = (a + b) * c;
    x = a ** b ** c;
    x = (a ** b) ** c;
    x = (-a) ** b;
    x = (a ?? b) || c;
    x = a ?? (b && c);
    x = a + +b - -c + ++d - --e;
    x = a++ + ++b;
    x = !(a instanceof B) && typeof c === "string" && !("d" in e);
    x = void 0, delete a.b, ~c;
    x = a?.b?.[c]?.(d);
    new (a())();
    new (a.b().c)();
    new a.b.C(1, ...d);
    new (new A)();
    (new A)();
    x = a / b / c;
    x = a / /re/g.exec(b)[0];
    x = a < !b;
    x = 1 .toString() + 1.5.toFixed();
    x = `a${b + `c${d}`}e` + tag`x${y}`;
    x = async (a, { b, c: [d, , e] = f, ...g }, ...h) => ({ a, b });
    x = async function* () {};
    x = class C extends (a, B) { static #p = 1; get q() { return this.#p; } set q(v) {} ["r" + s]() {} 's'() {} 1() {} };
    x = { a, b: c, [d]: e, ...f, get g() { return 1; }, set g(v) {}, async *h() {}, "i-j": 1, 2: 3 };
    [a, , b = 1, ...c] = d;
    ({ a, b: { c } = {} } = d);
    x = yieldish => yieldish;
    x = (a) => { return a; };
    "#,
  );
}

#[test]
fn roundtrips_statements() {
  assert_roundtrips(
    r#"
    ({}).toString();
    (function () {})();
    (async function () {})();
    (class {});
    label: for (var i = 0, j = ("k" in o); i < j; i++) { if (i) continue label; else break label; }
    for (const k in o) x(k);
    for (x.y of z);
    for (;;) {}
    if (a) if (b) c(); else d();
    if (a) { b(); } else if (c) d(); else { e(); }
    while (a) b();
    do a(); while (b)
    do ; while (b);
    switch (a) { case 1: case 2: b(); break; default: c(); }
    try { a(); } catch ({ message }) { b(message); } finally { c(); }
    try { a(); } catch { }
    throw new Error("x\ny z\0");
    debugger;
    function f(a = 1, [b] = [], { c } = {}, ...d) { return; }
    function g2(a) { "use strict"; }
    class A { constructor() { super.x(); new.target; } }
    async function g() { for await (const x of y) { await x; } }
    x = import("./m").then(() => import.meta.url);
    "#,
  );
}

#[test]
fn roundtrips_literals() {
  assert_roundtrips(
    r#"
    x = [1, 0.5, 1e21, 1e-7, 0xff, 123456789012345680000, 10n, "\"quoted\"", 'single', "\\", /a\/b/gu, true, false, null, this];
    x = [, , 1, ,];
    x = "é ☃ \x7f \t";
    "#,
  );
}
