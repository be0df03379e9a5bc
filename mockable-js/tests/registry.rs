use mockable_js::config::RewriteOptions;
use mockable_js::registry::ImportMeta;
use mockable_js::registry::Overlay;
use mockable_js::registry::Registry;
use mockable_js::registry::RegistryError;
use mockable_js::registry::Replacement;
use mockable_js::registry::RestoreSelection;
use mockable_js::transform;
use serde_json::json;
use serde_json::Value;

const MODULE: &str = r#"
  import render, {h as createElement} from "./vdom";
  import * as api from "./api";
  const fs = require("fs");
  const {join} = require("path");

  export function load(name) {
    return render(createElement(api.fetch(join("data", name)), fs));
  }
"#;

// Builds the registry a rewritten module would construct, with each binding's original value
// standing in for what the module system would have provided.
fn registry_for(source: &str) -> Registry<Value> {
  let out = transform(source, None, &RewriteOptions::default()).unwrap();
  Registry::new(out.outcome.bindings().iter().map(|b| {
    (b.alias.clone(), ImportMeta {
      path: b.path.clone(),
      symbol: b.symbol.clone(),
      value: json!(format!("original {}", b.alias)),
    })
  }))
}

#[test]
fn rewritten_module_bindings_populate_registry() {
  let registry = registry_for(MODULE);
  assert_eq!(registry.aliases().collect::<Vec<_>>(), vec![
    "render",
    "createElement",
    "api",
    "fs",
    "join",
  ]);
  let meta = registry
    .meta()
    .map(|(alias, meta)| (alias, meta.path.as_str(), meta.symbol.as_str()))
    .collect::<Vec<_>>();
  assert_eq!(meta, vec![
    ("render", "./vdom", "default"),
    ("createElement", "./vdom", "h"),
    ("api", "./api", "*"),
    ("fs", "fs", "<CJS>"),
    ("join", "path", "join"),
  ]);
}

#[test]
fn mock_and_restore_rewritten_module() {
  let mut registry = registry_for(MODULE);

  registry
    .mock(
      Overlay::modules()
        .with("./vdom", Replacement::Function(json!("fake render")))
        .with("./api", [("fetch", json!("fake fetch"))])
        .with("path", [("join", json!("fake join"))]),
    )
    .unwrap();
  assert_eq!(registry.get("render"), Some(&json!("fake render")));
  assert_eq!(registry.get("createElement"), Some(&json!("original createElement")));
  assert_eq!(registry.get("api"), Some(&json!({"fetch": "fake fetch"})));
  assert_eq!(registry.get("join"), Some(&json!("fake join")));

  registry.restore(&RestoreSelection::new().module("./api").symbol("path", "join"));
  assert_eq!(registry.get("api"), Some(&json!("original api")));
  assert_eq!(registry.get("join"), Some(&json!("original join")));
  assert_eq!(registry.get("render"), Some(&json!("fake render")));

  registry.restore_all();
  for alias in ["render", "createElement", "api", "fs", "join"] {
    assert_eq!(registry.get(alias), Some(&json!(format!("original {}", alias))));
  }
}

#[test]
fn mocking_import_the_module_does_not_use_fails() {
  let mut registry = registry_for(MODULE);
  let err = registry
    .mock(Overlay::modules().with("./vdom", [("Fragment", json!(null))]))
    .unwrap_err();
  assert_eq!(err, RegistryError::UnknownImport {
    path: "./vdom".to_string(),
    symbol: "Fragment".to_string(),
  });
  assert_eq!(
    err.to_string(),
    r#"module does not import "Fragment" from "./vdom""#
  );
  assert_eq!(registry.get("render"), Some(&json!("original render")));
}
