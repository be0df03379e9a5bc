use mockable_js::config::RewriteOptions;
use mockable_js::emit::emit_js_string;
use mockable_js::parse;
use mockable_js::transform;
use similar::ChangeTag;
use similar::TextDiff;
use std::env::var;
use std::fs;
use std::path::Path;

// Both sides are printed by the same emitter, so fixtures don't need to match its formatting.
fn normalize(source: &str, name: &str) -> String {
  let top = parse(source).unwrap_or_else(|err| panic!("{} does not parse: {}", name, err));
  emit_js_string(&top)
}

fn diff(expected: &str, actual: &str) -> String {
  let mut msg = String::new();
  for change in TextDiff::from_lines(expected, actual).iter_all_changes() {
    let sign = match change.tag() {
      ChangeTag::Delete => "-",
      ChangeTag::Insert => "+",
      ChangeTag::Equal => " ",
    };
    msg.push_str(sign);
    msg.push_str(change.as_str().unwrap_or(""));
  }
  msg
}

/// Each directory under `tests/fixtures` holds an `input.js`, the `output.js` it should be
/// rewritten to, and optionally the `options.json` to rewrite it with. The module is rewritten as
/// if it were at `src/<directory>.js`.
#[test]
fn fixtures() {
  let base_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
  let mut cases = fs::read_dir(&base_dir)
    .unwrap()
    .map(|e| e.unwrap().path())
    .filter(|p| p.is_dir())
    .collect::<Vec<_>>();
  cases.sort();
  assert!(!cases.is_empty());

  let mut failures = Vec::new();
  for case in cases {
    let name = case.file_name().unwrap().to_str().unwrap().to_string();
    println!("Testing {}...", name);
    let input = fs::read_to_string(case.join("input.js")).unwrap();
    let options = match fs::read_to_string(case.join("options.json")) {
      Ok(json) => RewriteOptions::from_json(&json).unwrap(),
      Err(_) => RewriteOptions::default(),
    };
    let file = Path::new("src").join(format!("{}.js", name));
    let out = transform(&input, Some(&file), &options).unwrap();

    let output_path = case.join("output.js");
    let actual = normalize(&out.code, &name);
    let expected = normalize(&fs::read_to_string(&output_path).unwrap(), &name);
    if actual != expected {
      if var("MOCKABLEJS_REGENERATE_FIXTURES").is_ok_and(|v| v == "1") {
        fs::write(&output_path, &actual).unwrap();
      } else {
        failures.push(format!("Failed {}, got:\n{}", name, diff(&expected, &actual)));
      };
    };
  }
  assert!(failures.is_empty(), "{}", failures.join("\n"));
}
