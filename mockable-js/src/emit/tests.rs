use super::emit_js_string;
use crate::parse;

fn emit(source: &str) -> String {
  let top = parse(source).unwrap();
  emit_js_string(&top)
}

#[track_caller]
fn check(source: &str, expected: &str) {
  assert_eq!(emit(source), expected, "emitting {:?}", source);
}

/// Emitted output must parse back into a tree that emits identically.
#[track_caller]
fn check_stable(source: &str) {
  let first = emit(source);
  let second = emit(&first);
  assert_eq!(first, second, "re-emitting {:?}", source);
}

#[test]
fn test_emit_operator_precedence() {
  check("let x = 1 + 2 * 3", "let x = 1 + 2 * 3;\n");
  check("(1 + 2) * 3", "(1 + 2) * 3;\n");
  check("a - (b - c)", "a - (b - c);\n");
  check("(a - b) - c", "a - b - c;\n");
  check("a = b = c", "a = b = c;\n");
  check("(a ? b : c) ? d : e", "(a ? b : c) ? d : e;\n");
  check("x = (a, b)", "x = (a, b);\n");
  check("a ?? (b || c)", "a ?? (b || c);\n");
  check("(-a) ** 2", "(-a) ** 2;\n");
}

#[test]
fn test_emit_unary_spacing() {
  check("- -x", "- -x;\n");
  check("-(-x)", "- -x;\n");
  check("+ ++x", "+ ++x;\n");
  check("typeof x === 'string'", "typeof x === \"string\";\n");
  check("!a", "!a;\n");
}

#[test]
fn test_emit_statement_start_hazards() {
  check("({a: 1})", "({a: 1});\n");
  check("({a} = b)", "({a} = b);\n");
  check("const f = () => ({a: 1})", "const f = () => ({a: 1});\n");
  check("(function () {})()", "(function() {}());\n");
}

#[test]
fn test_emit_new_and_members() {
  check("new (foo())()", "new (foo())();\n");
  check("new Foo", "new Foo;\n");
  check("(new Foo).bar", "(new Foo).bar;\n");
  check("new Foo().bar", "new Foo().bar;\n");
  check("(1).toString()", "1..toString();\n");
  check("a?.b?.[c]?.(d)", "a?.b?.[c]?.(d);\n");
}

#[test]
fn test_emit_strings_and_templates() {
  check("'a\"b'", "\"a\\\"b\";\n");
  check("`a${b}c`", "`a${b}c`;\n");
  check("tag`x${y}`", "tag`x${y}`;\n");
}

#[test]
fn test_emit_blocks_and_control_flow() {
  check("if (a) { b() } else c()", "if (a) {\n  b();\n} else c();\n");
  check(
    "function f(a, b = 1, ...c) { return a }",
    "function f(a, b = 1, ...c) {\n  return a;\n}\n",
  );
  check("while (x) {}", "while (x) {}\n");
  check(
    "switch (x) { case 1: a(); break; default: b() }",
    "switch (x) {\n  case 1:\n    a();\n    break;\n  default:\n    b();\n}\n",
  );
  check(
    "try { a() } catch (e) { b(e) } finally { c() }",
    "try {\n  a();\n} catch (e) {\n  b(e);\n} finally {\n  c();\n}\n",
  );
}

#[test]
fn test_emit_dangling_else_gets_braces() {
  check(
    "if (a) { if (b) c(); } else d();",
    "if (a) {\n  if (b) c();\n} else d();\n",
  );
}

#[test]
fn test_emit_modules() {
  check(
    "import a, {b as c, d} from 'm'",
    "import a, {b as c, d} from \"m\";\n",
  );
  check("import * as ns from 'm'", "import * as ns from \"m\";\n");
  check("import 'side-effect'", "import \"side-effect\";\n");
  check("export {x as y, z}", "export {x as y, z};\n");
  check("export * from 'm'", "export * from \"m\";\n");
  check("export const a = 1", "export const a = 1;\n");
  check(
    "export default function () {}",
    "export default function() {}\n",
  );
  check("export default a + b", "export default a + b;\n");
}

#[test]
fn test_emit_classes() {
  check(
    "class A extends B { static x = 1; get y() { return 1 } }",
    "class A extends B {\n  static x = 1;\n  get y() {\n    return 1;\n  }\n}\n",
  );
  check(
    "class A { static { init(); } static {} }",
    "class A {\n  static {\n    init();\n  }\n  static {}\n}\n",
  );
}

#[test]
fn test_emit_objects_and_patterns() {
  check("x = {a, b: 1, 'c-d': 2, [e]: 3, ...f}", "x = {a, b: 1, \"c-d\": 2, [e]: 3, ...f};\n");
  check("const {a, b: c = 1, ...d} = e", "const {a, b: c = 1, ...d} = e;\n");
  check("const [a, , b = 2, ...c] = d", "const [a, , b = 2, ...c] = d;\n");
}

#[test]
fn test_emit_jsx() {
  check(
    "<Foo bar=\"1\" {...p}>hi {x}</Foo>",
    "<Foo bar=\"1\" {...p}>hi {x}</Foo>;\n",
  );
  check("<a.b />", "<a.b />;\n");
  check("<></>", "<></>;\n");
}

#[test]
fn test_emit_comments_between_statements() {
  check("/** @jsx h */\n'use strict';", "/** @jsx h */\n\"use strict\";\n");
  check("a(); // done\nb();", "a();\n// done\nb();\n");
  check(
    "function f() {\n  // body\n  return 1;\n}",
    "function f() {\n  // body\n  return 1;\n}\n",
  );
  check("a();\n/* end */\n", "a();\n/* end */\n");
}

#[test]
fn test_emit_comments_inside_expressions() {
  check(
    "f(/*#__PURE__*/ g(), // last\n x)",
    "f(/*#__PURE__*/ g(), /* last*/ x);\n",
  );
  check("x = // a */ b\n1", "x = /* a * / b*/ 1;\n");
  check_stable("const el = <div title={/* t */ t} />;");
}

#[test]
fn test_emit_is_stable() {
  for source in [
    "const a = async (x) => { await x; }",
    "function* g() { yield* other(); yield; }",
    "for (let i = 0; i < 3; i++) continue;",
    "for (const [k, v] of Object.entries(o)) console.log(k, v)",
    "for (k in o) delete o[k]",
    "label: for (;;) break label;",
    "do x++; while (x < 10)",
    "[, a, ,] = b",
    "x = /re/g.test(y) ? 1n : null",
    "class C { #p = 1; static async *m() {} set v(x) {} ['k']() {} }",
    "a = b => c => d",
    "a = (b, c) => (d, e)",
    "(async function () {})()",
    "const o = { get a() { return 1 }, set a(v) {}, async b() {}, *c() {} }",
    "if (a) b(); else if (c) d(); else { e() }",
    "x = `a${`b${c}`}`",
    "(a || b) ?? c",
    "new (a.b().c)",
    "var v = void 0, w = typeof v",
    "import {default as x, 'y z' as y} from 'm'; export {x, y};",
  ] {
    check_stable(source);
  }
}
