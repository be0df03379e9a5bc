use super::rewrite_module;
use super::RewriteError;
use super::RewriteOutcome;
use crate::ast::expr::pat::ArrPat;
use crate::ast::node::Node;
use crate::ast::node::NodeAssocData;
use crate::ast::stmt::Stmt;
use crate::config::RewriteOptions;
use crate::emit::emit_js_string;
use crate::parse;
use crate::registry::ExportedSymbol;
use crate::symbol::compute_symbols;
use crate::symbol::AssocResolver;
use crate::symbol::BindingResolver;
use crate::symbol::Symbol;
use std::collections::HashMap;
use std::path::Path;

fn normalize(source: &str) -> String {
  emit_js_string(&parse(source).unwrap())
}

fn rewrite_with(source: &str, file: Option<&str>, options: &RewriteOptions) -> (String, RewriteOutcome) {
  let mut top = parse(source).unwrap();
  compute_symbols(&mut top);
  let outcome = rewrite_module(&mut top, &AssocResolver, file.map(Path::new), options).unwrap();
  (emit_js_string(&top), outcome)
}

fn rewrite(source: &str) -> (String, RewriteOutcome) {
  rewrite_with(source, Some("src/module.js"), &RewriteOptions::default())
}

#[track_caller]
fn check(source: &str, expected: &str) {
  let (actual, outcome) = rewrite(source);
  assert!(outcome.is_rewritten(), "not rewritten: {:?}", outcome);
  assert_eq!(actual, normalize(expected), "rewriting {:?}", source);
}

#[track_caller]
fn check_untouched(source: &str, expected_outcome: RewriteOutcome) {
  let (actual, outcome) = rewrite(source);
  assert_eq!(outcome, expected_outcome);
  assert_eq!(actual, normalize(source));
}

#[test]
fn test_named_import() {
  check(
    "import {ident} from 'a-module'; ident();",
    r#"
      import {ident} from "a-module";
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({ident: ["a-module", "ident", ident]});
      $imports.ident();
      export {$imports};
    "#,
  );
}

#[test]
fn test_import_specifier_forms() {
  let (actual, outcome) = rewrite(
    "import foo, * as ns from './foo'; import {a as b, 'c d' as e, default as f} from './m'; foo(ns, b, e, f);",
  );
  assert_eq!(
    actual,
    normalize(
      r#"
        import foo, * as ns from "./foo";
        import {a as b, "c d" as e, default as f} from "./m";
        import {ImportMap} from "mockable-js/helpers";
        const $imports = new ImportMap({
          foo: ["./foo", "default", foo],
          ns: ["./foo", "*", ns],
          b: ["./m", "a", b],
          e: ["./m", "c d", e],
          f: ["./m", "default", f],
        });
        $imports.foo($imports.ns, $imports.b, $imports.e, $imports.f);
        export {$imports};
      "#
    )
  );
  let symbols = outcome
    .bindings()
    .iter()
    .map(|b| (b.alias.as_str(), b.symbol.clone()))
    .collect::<Vec<_>>();
  assert_eq!(symbols, vec![
    ("foo", ExportedSymbol::Default),
    ("ns", ExportedSymbol::Namespace),
    ("b", ExportedSymbol::Named("a".to_string())),
    ("e", ExportedSymbol::Named("c d".to_string())),
    ("f", ExportedSymbol::Default),
  ]);
}

#[test]
fn test_registry_follows_last_import() {
  check(
    "import a from 'a'; a(); import b from 'b'; b();",
    r#"
      import a from "a";
      $imports.a();
      import b from "b";
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({a: ["a", "default", a], b: ["b", "default", b]});
      $imports.b();
      export {$imports};
    "#,
  );
}

#[test]
fn test_references_in_nested_positions() {
  check(
    r#"
      import foo from "./foo";
      export {foo};
      export default {foo};
      export const bar = () => foo.bar(`${foo}`);
      function shadowed(foo) {
        return foo;
      }
      class C extends foo {}
    "#,
    r#"
      import foo from "./foo";
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({foo: ["./foo", "default", foo]});
      export {foo};
      export default {foo: $imports.foo};
      export const bar = () => $imports.foo.bar(`${$imports.foo}`);
      function shadowed(foo) {
        return foo;
      }
      class C extends $imports.foo {}
      export {$imports};
    "#,
  );
}

#[test]
fn test_jsx_references() {
  check(
    "import Foo from './Foo'; import * as UI from './ui'; const x = <Foo title={UI.title}><UI.Button /></Foo>;",
    r#"
      import Foo from "./Foo";
      import * as UI from "./ui";
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({Foo: ["./Foo", "default", Foo], UI: ["./ui", "*", UI]});
      const x = <$imports.Foo title={$imports.UI.title}><$imports.UI.Button /></$imports.Foo>;
      export {$imports};
    "#,
  );
}

#[test]
fn test_require_with_module_exports() {
  check(
    "var foo = require('./foo'); module.exports = foo;",
    r#"
      var foo = require("./foo");
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({foo: ["./foo", "<CJS>", foo]});
      module.exports = $imports.foo;
      export {$imports};
      module.exports.$imports = $imports;
    "#,
  );
}

#[test]
fn test_require_shapes() {
  let (actual, outcome) = rewrite(
    r#"
      const a = require('a').b;
      const {c, d: e, f: {g}, h = 1, ...rest} = require('c');
      const i = (cov_1.s[0]++, require('i'));
      const j = require('j')['k'];
      const _helper = require('helper');
      use(a, c, e, g, h, i, j, _helper);
    "#,
  );
  assert_eq!(
    actual,
    normalize(
      r#"
        const a = require("a").b;
        const {c, d: e, f: {g}, h = 1, ...rest} = require("c");
        const i = (cov_1.s[0]++, require("i"));
        const j = require("j")["k"];
        import {ImportMap} from "mockable-js/helpers";
        const $imports = new ImportMap({
          a: ["a", "b", a],
          c: ["c", "c", c],
          e: ["c", "d", e],
          i: ["i", "<CJS>", i],
          j: ["j", "k", j],
        });
        const _helper = require("helper");
        use($imports.a, $imports.c, $imports.e, g, h, $imports.i, $imports.j, _helper);
        export {$imports};
      "#
    )
  );
  assert_eq!(outcome.bindings().len(), 5);
}

#[test]
fn test_require_numeric_property() {
  check(
    "const first = require('pair')[0]; const half = require('ratios')[0.5]; first(half);",
    r#"
      const first = require("pair")[0];
      const half = require("ratios")[0.5];
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({
        first: ["pair", "0", first],
        half: ["ratios", "0.5", half],
      });
      $imports.first($imports.half);
      export {$imports};
    "#,
  );
  let (_, outcome) = rewrite("const x = require('hex')[0x10]; x();");
  assert_eq!(
    outcome.bindings()[0].symbol,
    ExportedSymbol::Named("16".to_string())
  );
}

#[test]
fn test_underscore_imports_are_registered() {
  // Only `require` bindings are taken to be compiler helpers.
  check(
    "import _ from 'lodash'; import {_internal} from './util'; _.map(_internal);",
    r#"
      import _ from "lodash";
      import {_internal} from "./util";
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({
        _: ["lodash", "default", _],
        _internal: ["./util", "_internal", _internal],
      });
      $imports._.map($imports._internal);
      export {$imports};
    "#,
  );
}

#[test]
fn test_unrecognized_requires_are_skipped() {
  for source in [
    "function f() { const x = require('x'); return x; }",
    "function require() {} const x = require('x'); x();",
    "const x = require('x', 1); x();",
    "const x = require(name); x();",
    "const x = require?.('x'); x();",
    "const x = wrap(require('x')); x();",
    "const [x] = require('x'); x();",
    "const {x} = require('x').y; x();",
    "const p = require('proxyquire'); p();",
    "undeclared = require('x');",
  ] {
    check_untouched(source, RewriteOutcome::Unchanged);
  }
}

#[test]
fn test_assignment_form_require() {
  check(
    "let foo; foo = require('foo'); foo();",
    r#"
      let foo;
      foo = require("foo");
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({foo: ["foo", "<CJS>", foo]});
      $imports.foo();
      export {$imports};
    "#,
  );
}

#[test]
fn test_bindings_after_anchor_are_added() {
  check(
    "import a from 'a'; let foo; foo = require('foo'); const bar = require('bar'); a(foo, bar);",
    r#"
      import a from "a";
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({a: ["a", "default", a]});
      let foo;
      foo = require("foo");
      $imports.$add("foo", "foo", "<CJS>", foo);
      const bar = require("bar");
      $imports.$add("bar", "bar", "<CJS>", bar);
      $imports.a($imports.foo, $imports.bar);
      export {$imports};
    "#,
  );
}

#[test]
fn test_reassigned_require_is_registered_once() {
  let (_, outcome) = rewrite("var foo = require('foo'); foo = require('bar'); foo();");
  assert_eq!(outcome.bindings().len(), 1);
  assert_eq!(outcome.bindings()[0].path, "foo");
}

#[test]
fn test_reserved_name_aborts() {
  check_untouched(
    "import $imports from 'x'; import a from 'a'; a();",
    RewriteOutcome::ReservedNameConflict,
  );
  check_untouched(
    "import a from 'a'; const {$imports} = a; a();",
    RewriteOutcome::ReservedNameConflict,
  );
  check_untouched(
    "import a from 'a'; function $imports() {} a();",
    RewriteOutcome::ReservedNameConflict,
  );
}

#[test]
fn test_registry_operation_names_are_not_registered() {
  check(
    "import $mock from 'm'; import n from 'n'; $mock(n);",
    r#"
      import $mock from "m";
      import n from "n";
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({n: ["n", "default", n]});
      $mock($imports.n);
      export {$imports};
    "#,
  );
}

#[test]
fn test_excluded_modules_and_sources() {
  let source = "import a from 'a'; a();";
  let (actual, outcome) = rewrite_with(source, Some("src/__tests__/a.test.js"), &RewriteOptions::default());
  assert_eq!(outcome, RewriteOutcome::Excluded);
  assert_eq!(actual, normalize(source));

  // No location means no exclusion.
  let (_, outcome) = rewrite_with(source, None, &RewriteOptions::default());
  assert!(outcome.is_rewritten());

  let options = RewriteOptions::default().with_excluded_import("a");
  let (_, outcome) = rewrite_with(source, None, &options);
  assert_eq!(outcome, RewriteOutcome::Unchanged);

  check_untouched(
    "import {ImportMap} from 'mockable-js/helpers'; new ImportMap();",
    RewriteOutcome::Unchanged,
  );
}

#[test]
fn test_module_without_bindings_is_unchanged() {
  check_untouched(
    "const a = 1; export function f() { return a; }",
    RewriteOutcome::Unchanged,
  );
  check_untouched("import 'side-effect';", RewriteOutcome::Unchanged);
}

#[test]
fn test_unsupported_import_specifier() {
  let mut top = parse("import a from 'a';").unwrap();
  let Stmt::Import(import) = top.stx.body[0].stx.as_mut() else {
    panic!("expected import");
  };
  let default = import.stx.default.as_mut().unwrap();
  default.stx.pat = Node::new(default.loc, ArrPat {
    elements: Vec::new(),
    rest: None,
  })
  .into_wrapped();
  let err = rewrite_module(&mut top, &AssocResolver, None, &RewriteOptions::default()).unwrap_err();
  assert!(matches!(err, RewriteError::UnsupportedImportSpecifier { ref module, .. } if module == "a"));
}

/// Resolves by name alone, standing in for another scope analysis.
struct ByName(HashMap<&'static str, Symbol>);

impl BindingResolver for ByName {
  fn resolve(&self, name: &str, _assoc: &NodeAssocData) -> Option<Symbol> {
    self.0.get(name).copied()
  }
}

#[test]
fn test_injected_resolver_and_registration_alias() {
  // `renamed` refers to the same declaration as `foo`, as if a later pass had renamed it.
  let resolver = ByName(HashMap::from([
    ("foo", Symbol::from_raw(1)),
    ("renamed", Symbol::from_raw(1)),
  ]));
  let mut top = parse("import foo from 'foo'; renamed(); other();").unwrap();
  let outcome = rewrite_module(&mut top, &resolver, None, &RewriteOptions::default()).unwrap();
  assert_eq!(outcome.bindings().len(), 1);
  assert_eq!(outcome.bindings()[0].declaration, Symbol::from_raw(1));
  assert_eq!(
    emit_js_string(&top),
    normalize(
      r#"
        import foo from "foo";
        import {ImportMap} from "mockable-js/helpers";
        const $imports = new ImportMap({foo: ["foo", "default", foo]});
        $imports.foo();
        other();
        export {$imports};
      "#
    )
  );
}

#[test]
fn test_bindings_serialize() {
  let (_, outcome) = rewrite("import {a as b} from './m'; b();");
  let json = serde_json::to_value(outcome.bindings()).unwrap();
  assert_eq!(
    json,
    serde_json::json!([{"alias": "b", "path": "./m", "symbol": "a"}])
  );
}

#[test]
fn test_class_static_block_references() {
  check(
    "import {init} from './init'; class A { static { init(); } static { var init = 0; init++; } }",
    r#"
      import {init} from "./init";
      import {ImportMap} from "mockable-js/helpers";
      const $imports = new ImportMap({init: ["./init", "init", init]});
      class A {
        static {
          $imports.init();
        }
        static {
          var init = 0;
          init++;
        }
      }
      export {$imports};
    "#,
  );
}

#[test]
fn test_comments_survive_rewriting() {
  let source = "/** @jsx h */\n'use strict';\nimport {h} from 'preact';\n// keep me\nexport const el = <div />;";
  let out = crate::transform(source, None, &RewriteOptions::default()).unwrap();
  assert!(matches!(out.outcome, RewriteOutcome::Rewritten(_)));
  assert!(out.code.starts_with("/** @jsx h */\n"));
  assert!(out.code.contains("// keep me\nexport const el = <div />;"));
}
