use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

fn mockable_js_cli() -> Command {
  assert_cmd::cargo::cargo_bin_cmd!("mockable-js-cli")
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
  String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn rewrites_stdin_to_stdout() {
  let assert = mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin("import {a} from 'a'; a();")
    .assert()
    .success()
    .code(0);

  let stdout = stdout_of(&assert);
  assert!(stdout.contains("$imports.a();"), "got: {stdout}");
  assert!(stdout.contains("export {$imports};"), "got: {stdout}");
  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );
}

#[test]
fn unchanged_module_is_passed_through() {
  let source = "const a = 1;\n  // formatting kept\nexport default a;\n";
  let assert = mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin(source)
    .assert()
    .success();
  assert_eq!(stdout_of(&assert), source);
}

#[test]
fn syntax_errors_exit_with_failure() {
  let assert = mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin("import {a from 'a';")
    .assert()
    .failure()
    .code(1);
  assert!(assert.get_output().stdout.is_empty());
  assert!(String::from_utf8_lossy(&assert.get_output().stderr).contains("<stdin>"));
}

#[test]
fn files_bindings_and_exclusions() {
  let dir = tempdir().unwrap();
  let src = dir.path().join("src");
  fs::create_dir(&src).unwrap();
  let input = src.join("load.js");
  let output = dir.path().join("out.js");
  let bindings = dir.path().join("bindings.json");
  fs::write(
    &input,
    "import fetch from './fetch'; const fs = require('fs'); export default () => fetch(fs);",
  )
  .unwrap();

  mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--input")
    .arg(&input)
    .arg("--output")
    .arg(&output)
    .arg("--bindings")
    .arg(&bindings)
    .arg("--exclude-import")
    .arg("fs")
    .assert()
    .success()
    .code(0);

  let code = fs::read_to_string(&output).unwrap();
  assert!(code.contains("$imports.fetch(fs)"), "got: {code}");
  let json: Value = serde_json::from_str(&fs::read_to_string(&bindings).unwrap()).unwrap();
  assert_eq!(
    json,
    serde_json::json!([{"alias": "fetch", "path": "./fetch", "symbol": "default"}])
  );

  // The input path puts the module under `src`, which is now excluded.
  let source = fs::read_to_string(&input).unwrap();
  let assert = mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--input")
    .arg(&input)
    .arg("--exclude-dir")
    .arg("src")
    .assert()
    .success();
  assert_eq!(stdout_of(&assert), source);

  // An explicit filename overrides the input path.
  let assert = mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--filename")
    .arg("lib/load.js")
    .arg("--exclude-dir")
    .arg("src")
    .write_stdin(source)
    .assert()
    .success();
  assert!(stdout_of(&assert).contains("$imports.fetch"));
}

#[test]
fn config_file() {
  let dir = tempdir().unwrap();
  let config = dir.path().join("mockable.json");
  fs::write(
    &config,
    r#"{"excludeImportsFromModules": [{"pattern": "^\\./generated/"}]}"#,
  )
  .unwrap();

  let assert = mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--config")
    .arg(&config)
    .write_stdin("import a from './generated/a'; import b from './b'; a(b);")
    .assert()
    .success();
  let stdout = stdout_of(&assert);
  assert!(stdout.contains("a($imports.b)"), "got: {stdout}");

  fs::write(&config, r#"{"excludeDirz": []}"#).unwrap();
  mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--config")
    .arg(&config)
    .write_stdin("")
    .assert()
    .failure()
    .code(1);
}

#[test]
fn verbose_logs_to_stderr() {
  let assert = mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--verbose")
    .write_stdin("import {a} from 'a'; a();")
    .assert()
    .success();
  assert!(!assert.get_output().stderr.is_empty());
  assert!(stdout_of(&assert).contains("$imports.a();"));
}

#[test]
fn writes_helper_module() {
  let dir = tempdir().unwrap();
  let helper = dir.path().join("helpers.js");
  let assert = mockable_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--write-helper")
    .arg(&helper)
    .assert()
    .success();
  assert!(assert.get_output().stdout.is_empty());
  let written = fs::read_to_string(&helper).unwrap();
  assert_eq!(written, mockable_js::registry::HELPER_SOURCE);
  assert!(written.contains("export class ImportMap"));
}
