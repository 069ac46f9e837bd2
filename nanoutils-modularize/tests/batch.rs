use nanoutils_modularize::collect_sources;
use nanoutils_modularize::transform_files;
use nanoutils_modularize::ModularizeError;
use nanoutils_modularize::ModuleResolver;
use nanoutils_modularize::TransformOptions;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, contents).unwrap();
}

fn project() -> TempDir {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path();
  let lib = root.join("node_modules").join("nanoutils").join("lib");
  write(&lib.join("map.js"), "");
  fs::create_dir_all(lib.join("filter")).unwrap();

  let src = root.join("src");
  write(
    &src.join("a.js"),
    r#"import { map } from "nanoutils"; map(x);"#,
  );
  write(&src.join("bad.js"), r#"import { nope } from "nanoutils"; nope();"#);
  write(
    &src.join("nested").join("b.mjs"),
    r#"import * as U from "nanoutils"; U.filter(y);"#,
  );
  write(&src.join("notes.txt"), "map(x)");
  write(
    &src.join("node_modules").join("dep").join("index.js"),
    r#"import { map } from "nanoutils";"#,
  );
  dir
}

#[test]
fn collects_js_sources_outside_node_modules() {
  let dir = project();
  let src = dir.path().join("src");
  let files = collect_sources(&src).unwrap();
  assert_eq!(files, vec![
    src.join("a.js"),
    src.join("bad.js"),
    src.join("nested").join("b.mjs"),
  ]);
  // An explicit file is always taken.
  assert_eq!(collect_sources(&src.join("notes.txt")).unwrap(), vec![
    src.join("notes.txt")
  ]);
}

#[test]
fn transforms_files_independently() {
  let dir = project();
  let src = dir.path().join("src");
  let resolver = ModuleResolver::discover(&src, TransformOptions::new()).unwrap();
  let files = collect_sources(&src).unwrap();
  let outcomes = transform_files(&resolver, &files);

  assert_eq!(
    outcomes.iter().map(|o| o.path.clone()).collect::<Vec<_>>(),
    files
  );
  assert_eq!(
    outcomes[0].result.as_ref().unwrap(),
    r#"import _map from"nanoutils/lib/map";_map(x);"#
  );
  assert!(matches!(
    &outcomes[1].result,
    Err(ModularizeError::Resolution { name }) if name == "nope"
  ));
  assert_eq!(
    outcomes[2].result.as_ref().unwrap(),
    r#"import _filter from"nanoutils/lib/filter";_filter(y);"#
  );
}

#[test]
fn reports_unreadable_files() {
  let dir = project();
  let resolver = ModuleResolver::discover(dir.path(), TransformOptions::new()).unwrap();
  let missing = dir.path().join("missing.js");
  let outcomes = transform_files(&resolver, &[missing.clone()]);
  assert!(matches!(
    &outcomes[0].result,
    Err(ModularizeError::Io { path, .. }) if *path == missing
  ));
}
