use crate::transform;
use crate::ModularizeError;
use crate::ModuleFormat;
use crate::ModuleResolver;
use crate::TransformOptions;

const FUNCTIONS: &[&str] = &["filter", "flatten", "map", "reduce"];

fn resolver(options: TransformOptions) -> ModuleResolver {
  ModuleResolver::from_names(FUNCTIONS.iter().copied(), options)
}

fn modularized(src: &str) -> String {
  transform(&resolver(TransformOptions::new()), src.as_bytes()).unwrap()
}

fn failed(src: &str) -> ModularizeError {
  transform(&resolver(TransformOptions::new()), src.as_bytes()).unwrap_err()
}

#[test]
fn rewrites_named_imports() {
  assert_eq!(
    modularized(r#"import { map } from "nanoutils"; map([1, 2], f);"#),
    r#"import _map from"nanoutils/lib/map";_map([1,2],f);"#
  );
  assert_eq!(
    modularized(r#"import { map as m, filter } from "nanoutils"; filter(m(xs, g), h);"#),
    r#"import _filter from"nanoutils/lib/filter";import _map from"nanoutils/lib/map";_filter(_map(xs,g),h);"#
  );
}

#[test]
fn rewrites_namespace_member_access() {
  assert_eq!(
    modularized(r#"import * as U from "nanoutils"; U.reduce(f, 0, xs); U.map(g);"#),
    r#"import _reduce from"nanoutils/lib/reduce";import _map from"nanoutils/lib/map";_reduce(f,0,xs);_map(g);"#
  );
  assert_eq!(
    modularized(r#"import N from "nanoutils"; N?.map(f); N["filter"](g);"#),
    r#"import _map from"nanoutils/lib/map";import _filter from"nanoutils/lib/filter";_map(f);_filter(g);"#
  );
  assert_eq!(
    modularized(r#"import { default as D } from "nanoutils"; D.flatten(x);"#),
    r#"import _flatten from"nanoutils/lib/flatten";_flatten(x);"#
  );
}

#[test]
fn bare_namespace_becomes_null() {
  assert_eq!(
    modularized(r#"import U from "nanoutils"; const x = U; f(U);"#),
    "const x=null;f(null);"
  );
  assert_eq!(
    modularized(r#"import * as U from "nanoutils"; g({ U });"#),
    "g({U:null});"
  );
}

#[test]
fn imports_each_function_once_in_first_use_order() {
  assert_eq!(
    modularized(
      r#"
        import { map, filter } from "nanoutils";
        import * as U from "nanoutils";
        filter(map(a), U.map(b), U.filter);
        map(c);
      "#
    ),
    r#"import _filter from"nanoutils/lib/filter";import _map from"nanoutils/lib/map";_filter(_map(a),_map(b),_filter);_map(c);"#
  );
}

#[test]
fn rewrites_every_expression_position() {
  assert_eq!(
    modularized(
      r#"
        import { map } from "nanoutils";
        export const api = { map, mapper: map, [map]: 1 };
        const g = () => { return typeof map; };
        export default map;
      "#
    ),
    r#"import _map from"nanoutils/lib/map";export const api={map:_map,mapper:_map,[_map]:1};const g=()=>{return typeof _map;};export default _map;"#
  );
}

#[test]
fn leaves_property_names_alone() {
  assert_eq!(
    modularized(r#"import { map } from "nanoutils"; obj.map; obj[map]; ({ map: 1 });"#),
    "obj.map;obj[map];({map:1});"
  );
}

#[test]
fn respects_shadowing() {
  assert_eq!(
    modularized(
      r#"
        import { map } from "nanoutils";
        import * as U from "nanoutils";
        function f(map, U) { return map(U); }
        { let map = 1; map; }
        map(2);
      "#
    ),
    r#"import _map from"nanoutils/lib/map";function f(map,U){return map(U);}{let map=1;map;}_map(2);"#
  );
}

#[test]
fn removes_unused_imports() {
  assert_eq!(
    modularized(r#"import { map } from "nanoutils"; import "nanoutils"; x();"#),
    "x();"
  );
}

#[test]
fn leaves_other_modules_alone() {
  assert_eq!(
    modularized(r#"import { map } from "lodash"; import f from "nanoutils/lib/filter"; map(f);"#),
    r#"import{map}from"lodash";import f from"nanoutils/lib/filter";map(f);"#
  );
}

#[test]
fn avoids_name_collisions() {
  assert_eq!(
    modularized(r#"import { map } from "nanoutils"; const _map = 1; map(_map);"#),
    r#"import _map2 from"nanoutils/lib/map";const _map=1;_map2(_map);"#
  );
}

#[test]
fn inserts_imports_after_directives() {
  assert_eq!(
    modularized(r#""use strict"; import { map } from "nanoutils"; map();"#),
    r#""use strict";import _map from"nanoutils/lib/map";_map();"#
  );
}

#[test]
fn redirects_reexports() {
  assert_eq!(
    modularized(r#"export { map as mapper, filter } from "nanoutils";"#),
    r#"import _map from"nanoutils/lib/map";import _filter from"nanoutils/lib/filter";export{_map as mapper,_filter as filter};"#
  );
}

#[test]
fn rewrites_local_exports() {
  assert_eq!(
    modularized(r#"import { map } from "nanoutils"; export { map, map as m2 };"#),
    r#"import _map from"nanoutils/lib/map";export{_map as map,_map as m2};"#
  );
}

#[test]
fn uses_esm_paths() {
  let options = TransformOptions::new().with_module_format(ModuleFormat::Esm);
  assert_eq!(
    transform(
      &resolver(options),
      br#"import { map } from "nanoutils"; map();"#
    )
    .unwrap(),
    r#"import _map from"nanoutils/es/map";_map();"#
  );
}

#[test]
fn rejects_unknown_functions() {
  for src in [
    r#"import { mapp } from "nanoutils"; mapp();"#,
    r#"import * as U from "nanoutils"; U.mapp();"#,
    r#"export { mapp } from "nanoutils";"#,
  ] {
    let err = failed(src);
    assert!(
      matches!(&err, ModularizeError::Resolution { name } if name == "mapp"),
      "{err:?}"
    );
    assert!(err.to_string().contains("file a bug"));
  }
  // Only used names are resolved.
  assert_eq!(modularized(r#"import { mapp } from "nanoutils";"#), "");
}

#[test]
fn rejects_wildcard_reexports() {
  for src in [
    r#"export * from "nanoutils";"#,
    r#"export * as U from "nanoutils";"#,
    r#"import * as U from "nanoutils"; export { U };"#,
  ] {
    let err = failed(src);
    assert!(
      matches!(err, ModularizeError::UnsupportedPattern { .. }),
      "{err:?}"
    );
  }
}

#[test]
fn rejects_computed_namespace_access() {
  for src in [
    r#"import * as U from "nanoutils"; U[k](1);"#,
    r#"import U from "nanoutils"; U?.[name];"#,
    r#"import { default as U } from "nanoutils"; U[`map`](1);"#,
  ] {
    let err = failed(src);
    assert!(
      matches!(&err, ModularizeError::UnsupportedPattern { pattern } if pattern == "`ns[expr]`"),
      "{err:?}"
    );
    assert!(err.to_string().starts_with("`ns[expr]` is not supported"));
  }
}

#[test]
fn reports_bad_input() {
  let err = failed("import {");
  assert!(matches!(err, ModularizeError::Syntax(_)));
  let message = err.to_string();
  assert!(
    message.starts_with("failed to parse source: ") && message.ends_with("at 1:9"),
    "{message}"
  );
  let err = transform(&resolver(TransformOptions::new()), b"\xff").unwrap_err();
  assert!(matches!(err, ModularizeError::InvalidUtf8(_)));
}

#[test]
fn accepts_member_assignment_targets() {
  assert_eq!(
    modularized(r#"import { map } from "nanoutils"; for (x.y of map(z, f)); [a.b, c[0]] = d;"#),
    r#"import _map from"nanoutils/lib/map";for(x.y of _map(z,f));[a.b,c[0]]=d;"#
  );
  assert_eq!(
    modularized("for (a[0] in o); ({ a: b.c } = d);"),
    "for(a[0]in o);({a:b.c}=d);"
  );
}

#[test]
fn never_turns_invalid_input_into_valid_output() {
  for src in ["a ?? b || c;", r#"x = "\u{110000}";"#, "x = 08.5;", "label: label: x;"] {
    assert!(matches!(failed(src), ModularizeError::Syntax(_)), "{src}");
  }
}

#[test]
fn mixed_named_and_namespace_imports() {
  assert_eq!(
    modularized(
      r#"
        import { map as m, filter as f } from "nanoutils";
        import * as U from "nanoutils";
        m(x, fn);
        f(y, g);
        const r = U.reduce;
        h(...xs, U);
      "#
    ),
    r#"import _map from"nanoutils/lib/map";import _filter from"nanoutils/lib/filter";import _reduce from"nanoutils/lib/reduce";_map(x,fn);_filter(y,g);const r=_reduce;h(...xs,null);"#
  );
}
