use assert_cmd::Command;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn modularize_cli() -> Command {
  let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nanoutils-modularize-cli");
  cmd.timeout(Duration::from_secs(5));
  cmd.env_remove("RUST_LOG").env_remove("NANOUTILS_LOG");
  cmd
}

// A project with nanoutils installed under node_modules.
fn project() -> TempDir {
  let dir = tempfile::tempdir().unwrap();
  let lib = dir.path().join("node_modules").join("nanoutils").join("lib");
  fs::create_dir_all(lib.join("filter")).unwrap();
  fs::write(lib.join("map.js"), "").unwrap();
  dir
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
  String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

fn stderr_of(assert: &assert_cmd::assert::Assert) -> String {
  String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

#[test]
fn transforms_stdin_to_stdout() {
  let dir = project();
  let assert = modularize_cli()
    .current_dir(dir.path())
    .write_stdin(r#"import { map } from "nanoutils"; map(xs, f);"#)
    .assert()
    .success()
    .code(0);
  assert_eq!(
    stdout_of(&assert),
    r#"import _map from"nanoutils/lib/map";_map(xs,f);"#
  );
  assert!(stderr_of(&assert).is_empty(), "{}", stderr_of(&assert));
}

#[test]
fn module_format_flag_and_config() {
  let dir = project();
  let assert = modularize_cli()
    .current_dir(dir.path())
    .args(["--module-format", "esm"])
    .write_stdin(r#"import * as U from "nanoutils"; U.filter(x);"#)
    .assert()
    .success();
  assert_eq!(
    stdout_of(&assert),
    r#"import _filter from"nanoutils/es/filter";_filter(x);"#
  );

  let config = dir.path().join("nanoutils.json");
  fs::write(&config, r#"{"cjs": false}"#).unwrap();
  let assert = modularize_cli()
    .current_dir(dir.path())
    .arg("--config")
    .arg(&config)
    .write_stdin(r#"import { map } from "nanoutils"; map(x);"#)
    .assert()
    .success();
  assert_eq!(
    stdout_of(&assert),
    r#"import _map from"nanoutils/es/map";_map(x);"#
  );
}

#[test]
fn explicit_library_and_files() {
  let lib_dir = project();
  let work = tempfile::tempdir().unwrap();
  let input = work.path().join("in.js");
  let output = work.path().join("out.js");
  fs::write(&input, r#"import { map } from "nanoutils"; export { map };"#).unwrap();

  modularize_cli()
    .current_dir(work.path())
    .arg("--library")
    .arg(lib_dir.path().join("node_modules").join("nanoutils"))
    .arg("-i")
    .arg(&input)
    .arg("-o")
    .arg(&output)
    .assert()
    .success();
  assert_eq!(
    fs::read_to_string(&output).unwrap(),
    r#"import _map from"nanoutils/lib/map";export{_map as map};"#
  );
}

#[test]
fn transforms_directories() {
  let dir = project();
  let src = dir.path().join("src");
  let out = dir.path().join("out");
  fs::create_dir_all(src.join("nested")).unwrap();
  fs::write(src.join("a.js"), r#"import { map } from "nanoutils"; map(a);"#).unwrap();
  fs::write(
    src.join("nested").join("b.mjs"),
    r#"import N from "nanoutils"; N.filter(b);"#,
  )
  .unwrap();

  modularize_cli()
    .current_dir(dir.path())
    .arg("-i")
    .arg(&src)
    .arg("-o")
    .arg(&out)
    .args(["--jobs", "2"])
    .assert()
    .success();
  assert_eq!(
    fs::read_to_string(out.join("a.js")).unwrap(),
    r#"import _map from"nanoutils/lib/map";_map(a);"#
  );
  assert_eq!(
    fs::read_to_string(out.join("nested").join("b.mjs")).unwrap(),
    r#"import _filter from"nanoutils/lib/filter";_filter(b);"#
  );
}

#[test]
fn directory_failures_do_not_stop_other_files() {
  let dir = project();
  let src = dir.path().join("src");
  let out = dir.path().join("out");
  fs::create_dir_all(&src).unwrap();
  fs::write(src.join("bad.js"), r#"import { nope } from "nanoutils"; nope();"#).unwrap();
  fs::write(src.join("good.js"), r#"import { map } from "nanoutils"; map();"#).unwrap();

  let assert = modularize_cli()
    .current_dir(dir.path())
    .arg("-i")
    .arg(&src)
    .arg("-o")
    .arg(&out)
    .assert()
    .failure()
    .code(1);
  let stderr = stderr_of(&assert);
  assert!(stderr.contains("bad.js"), "{stderr}");
  assert!(stderr.contains("nope"), "{stderr}");
  assert!(!out.join("bad.js").exists());
  assert!(out.join("good.js").exists());
}

#[test]
fn reports_errors_on_stderr() {
  let dir = project();
  for (source, expected) in [
    (r#"import { mapp } from "nanoutils"; mapp();"#, "Nanoutils method mapp"),
    (r#"export * from "nanoutils";"#, "is not supported"),
    ("import {", "failed to parse"),
  ] {
    let assert = modularize_cli()
      .current_dir(dir.path())
      .write_stdin(source)
      .assert()
      .failure()
      .code(1);
    assert!(stdout_of(&assert).is_empty());
    let stderr = stderr_of(&assert);
    assert!(stderr.contains(expected), "{stderr}");
  }
}

#[test]
fn fails_without_an_installed_library() {
  let empty = tempfile::tempdir().unwrap();
  let assert = modularize_cli()
    .current_dir(empty.path())
    .write_stdin("x();")
    .assert()
    .failure()
    .code(1);
  assert!(stderr_of(&assert).contains("node_modules/nanoutils"));
}

#[test]
fn logs_only_when_asked() {
  let dir = project();
  let assert = modularize_cli()
    .current_dir(dir.path())
    .env("NANOUTILS_LOG", "debug")
    .write_stdin(r#"import { map } from "nanoutils"; map();"#)
    .assert()
    .success();
  assert_eq!(
    stdout_of(&assert),
    r#"import _map from"nanoutils/lib/map";_map();"#
  );
  assert!(stderr_of(&assert).contains("materialized import"));
}
