use super::ExportedSymbol;
use super::ADD_METHOD;
use super::HELPER_SOURCE;
use super::MOCK_METHOD;
use super::REGISTRY_CLASS;
use super::RESERVED_ALIASES;
use super::RESTORE_METHOD;
use super::ImportMeta;
use super::Overlay;
use super::Registry;
use super::RegistryError;
use super::Replacement;
use super::RestoreSelection;
use serde_json::json;
use serde_json::Value;

fn meta(path: &str, symbol: &str, value: Value) -> ImportMeta<Value> {
  ImportMeta {
    path: path.to_string(),
    symbol: ExportedSymbol::from(symbol),
    value,
  }
}

fn registry() -> Registry<Value> {
  Registry::new([
    ("foo", meta("./foo", "default", json!("foo"))),
    ("bar", meta("./bar", "bar", json!("bar"))),
    ("baz", meta("./bar", "baz", json!("baz"))),
    ("ns", meta("./ns", "*", json!({"a": 1}))),
    ("cjs", meta("./cjs", "<CJS>", json!({"b": 2}))),
  ])
}

#[test]
fn test_registration_exposes_values() {
  let registry = registry();
  assert_eq!(registry.len(), 5);
  assert_eq!(registry.get("foo"), Some(&json!("foo")));
  assert_eq!(registry.get("missing"), None);
  assert_eq!(
    registry.aliases().collect::<Vec<_>>(),
    vec!["foo", "bar", "baz", "ns", "cjs"]
  );
  let (alias, m) = registry.meta().nth(1).unwrap();
  assert_eq!(alias, "bar");
  assert_eq!(m, &meta("./bar", "bar", json!("bar")));
}

#[test]
fn test_reserved_aliases_are_ignored() {
  let mut registry = Registry::<Value>::default();
  assert!(registry.is_empty());
  assert!(!registry.register("$mock", "./m", "default", json!(1)));
  assert!(!registry.register("$meta", "./m", "default", json!(1)));
  assert!(registry.register("mock", "./m", "default", json!(1)));
  assert_eq!(registry.aliases().collect::<Vec<_>>(), vec!["mock"]);
}

#[test]
fn test_mock_and_restore_all() {
  let mut registry = registry();
  registry
    .mock(Overlay::modules().with("./bar", [("bar", json!("mocked"))]))
    .unwrap();
  assert_eq!(registry.get("bar"), Some(&json!("mocked")));
  assert_eq!(registry.get("baz"), Some(&json!("baz")));

  registry.restore_all();
  assert_eq!(registry.get("bar"), Some(&json!("bar")));
  // Nothing is mocked any more.
  registry.restore_all();
  assert_eq!(registry.get("bar"), Some(&json!("bar")));
}

#[test]
fn test_function_replacement_is_default_export() {
  let mut registry = registry();
  registry
    .mock(Overlay::modules().with("./foo", Replacement::Function(json!("fn"))))
    .unwrap();
  assert_eq!(registry.get("foo"), Some(&json!("fn")));
}

#[test]
fn test_whole_module_aliases_take_replacement_object() {
  let mut registry = registry();
  registry
    .mock(
      Overlay::modules()
        .with("./ns", [("a", json!(10)), ("other", json!(11))])
        .with("./cjs", [("b", json!(20))]),
    )
    .unwrap();
  assert_eq!(registry.get("ns"), Some(&json!({"a": 10, "other": 11})));
  assert_eq!(registry.get("cjs"), Some(&json!({"b": 20})));
}

#[test]
fn test_one_mock_fans_out_to_every_alias() {
  let mut registry = registry();
  registry.register("bar2", "./bar", "bar", json!("bar"));
  registry
    .mock(Overlay::modules().with("./bar", [("bar", json!(1))]))
    .unwrap();
  assert_eq!(registry.get("bar"), Some(&json!(1)));
  assert_eq!(registry.get("bar2"), Some(&json!(1)));
}

#[test]
fn test_unknown_import_is_an_error_and_changes_nothing() {
  let mut registry = registry();
  let err = registry
    .mock(Overlay::modules().with("./bar", [("bar", json!(1)), ("nope", json!(2))]))
    .unwrap_err();
  assert_eq!(err, RegistryError::UnknownImport {
    path: "./bar".to_string(),
    symbol: "nope".to_string(),
  });
  assert_eq!(
    err.to_string(),
    "module does not import \"nope\" from \"./bar\""
  );
  assert_eq!(registry.get("bar"), Some(&json!("bar")));

  let err = registry
    .mock(Overlay::modules().with("./unknown", [("x", json!(1))]))
    .unwrap_err();
  assert!(err.to_string().contains("./unknown"));
}

#[test]
fn test_mocks_compose() {
  let mut registry = registry();
  registry
    .mock(Overlay::modules().with("./bar", [("bar", json!(1)), ("baz", json!(2))]))
    .unwrap();
  registry
    .mock(Overlay::modules().with("./bar", [("baz", json!(3))]))
    .unwrap();
  assert_eq!(registry.get("bar"), Some(&json!(1)));
  assert_eq!(registry.get("baz"), Some(&json!(3)));
}

#[test]
fn test_selector_mocks_matching_aliases() {
  let mut registry = registry();
  let mut seen = Vec::new();
  registry
    .mock(Overlay::select(|path: &str, symbol: &ExportedSymbol, value: &Value| {
      seen.push((path.to_string(), symbol.clone()));
      match path {
        "./bar" => Some(json!(format!("mock {}", value.as_str().unwrap_or("?")))),
        "./ns" => Some(json!("ns")),
        _ => None,
      }
    }))
    .unwrap();
  assert_eq!(seen.len(), 5);
  assert_eq!(registry.get("bar"), Some(&json!("mock bar")));
  assert_eq!(registry.get("baz"), Some(&json!("mock baz")));
  assert_eq!(registry.get("ns"), Some(&json!("ns")));
  assert_eq!(registry.get("foo"), Some(&json!("foo")));
}

#[test]
fn test_selective_restore() {
  let mut registry = registry();
  registry
    .mock(
      Overlay::modules()
        .with("./foo", [("default", json!(1))])
        .with("./bar", [("bar", json!(2)), ("baz", json!(3))]),
    )
    .unwrap();

  registry.restore(&RestoreSelection::new().module("./foo"));
  assert_eq!(registry.get("foo"), Some(&json!("foo")));
  assert_eq!(registry.get("bar"), Some(&json!(2)));

  registry.restore(&RestoreSelection::new().symbol("./bar", "baz"));
  assert_eq!(registry.get("bar"), Some(&json!(2)));
  assert_eq!(registry.get("baz"), Some(&json!("baz")));

  // Selecting nothing, or restoring twice, is fine.
  registry.restore(&RestoreSelection::new().module("./unknown"));
  registry.restore(&RestoreSelection::new().symbol("./bar", "baz"));
  assert_eq!(registry.get("baz"), Some(&json!("baz")));
}

#[test]
fn test_restore_selection_from_json() {
  let selection: RestoreSelection =
    serde_json::from_str(r#"{"./foo": true, "./bar": {"bar": true, "baz": false}, "./ns": false}"#)
      .unwrap();
  assert!(selection.selects("./foo", &ExportedSymbol::Default));
  assert!(selection.selects("./bar", &ExportedSymbol::from("bar")));
  assert!(!selection.selects("./bar", &ExportedSymbol::from("baz")));
  assert!(!selection.selects("./ns", &ExportedSymbol::Namespace));
  assert!(!selection.selects("./other", &ExportedSymbol::Default));
}

#[test]
fn test_exported_symbol_spelling() {
  assert_eq!(ExportedSymbol::from("default"), ExportedSymbol::Default);
  assert_eq!(ExportedSymbol::from("*".to_string()), ExportedSymbol::Namespace);
  assert_eq!(ExportedSymbol::DynamicModule.as_str(), "<CJS>");
  assert_eq!(
    ExportedSymbol::from("namespace"),
    ExportedSymbol::Named("namespace".to_string())
  );
  assert_eq!(
    serde_json::to_string(&ExportedSymbol::Namespace).unwrap(),
    "\"*\""
  );
}

#[test]
fn test_helper_source_defines_registry_surface() {
  assert!(HELPER_SOURCE.contains(&format!("export class {} {{", REGISTRY_CLASS)));
  for method in [ADD_METHOD, MOCK_METHOD, RESTORE_METHOD] {
    assert!(
      HELPER_SOURCE.contains(&format!("\n  {}(", method)),
      "{} is not defined",
      method
    );
  }
  for name in RESERVED_ALIASES {
    assert!(HELPER_SOURCE.contains(&format!("\"{}\"", name)), "{} is not reserved", name);
  }
  // Misuse is reported the same way on both sides.
  let message = RegistryError::UnknownImport {
    path: "${path}".to_string(),
    symbol: "${name}".to_string(),
  }
  .to_string();
  assert!(HELPER_SOURCE.contains(&format!("`{}`", message)));
}
