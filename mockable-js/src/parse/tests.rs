use super::Parser;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::jsx::JsxElemChild;
use crate::ast::expr::jsx::JsxElemName;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::Expr;
use crate::ast::import_export::ExportNames;
use crate::ast::import_export::ImportNames;
use crate::ast::import_export::ModuleExportImportName;
use crate::ast::node::Node;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::operator::OperatorName;
use crate::parse;
use crate::token::CommentKind;
use crate::token::Kw;
use crate::token::TT;

fn first_stmt(source: &str) -> Node<Stmt> {
  let mut top = parse(source).expect("expected parse success");
  assert!(!top.stx.body.is_empty(), "expected a statement");
  top.stx.body.remove(0)
}

fn first_expr(source: &str) -> Node<Expr> {
  let stmt = first_stmt(source);
  match *stmt.stx {
    Stmt::Expr(expr_stmt) => expr_stmt.stx.expr,
    other => panic!("expected expression statement, got {:?}", other),
  }
}

#[test]
fn test_parser_buffer() {
  let lexer = Lexer::new("let x = /a/ / 1;");
  let mut p = Parser::new(lexer);
  let cp = p.checkpoint();

  let t = p.peek();
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(p.buf.len(), 1);
  assert_eq!(t.typ, TT::Kw(Kw::Let));

  p.consume();
  let t = p.consume();
  assert_eq!(p.next_tok_i, 2);
  assert_eq!(t.typ, TT::Ident);

  p.restore_checkpoint(cp);
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(p.buf.len(), 2);

  // Peeking in a different mode relexes from that point.
  let t = p.peek_with_mode(LexMode::SlashIsRegex);
  assert_eq!(p.buf.len(), 1);
  assert_eq!(t.typ, TT::Kw(Kw::Let));
}

#[test]
fn test_precedence() {
  let expr = first_expr("a + b * c;");
  let Expr::Binary(add) = *expr.stx else {
    panic!("expected binary expression");
  };
  assert_eq!(add.stx.operator, OperatorName::Addition);
  let Expr::Binary(mul) = add.stx.right.stx.as_ref() else {
    panic!("expected right to be binary");
  };
  assert_eq!(mul.stx.operator, OperatorName::Multiplication);
}

#[test]
fn test_right_associative_assignment() {
  let expr = first_expr("a = b = c;");
  let Expr::Binary(outer) = *expr.stx else {
    panic!("expected assignment");
  };
  assert!(matches!(outer.stx.left.stx.as_ref(), Expr::IdPat(_)));
  assert!(matches!(outer.stx.right.stx.as_ref(), Expr::Binary(_)));
}

#[test]
fn test_regex_after_operator() {
  let expr = first_expr("x = /ab+c/g.test(y);");
  let Expr::Binary(assign) = *expr.stx else {
    panic!("expected assignment");
  };
  assert!(matches!(assign.stx.right.stx.as_ref(), Expr::Call(_)));
}

#[test]
fn test_require_call() {
  let stmt = first_stmt("const foo = require('./foo');");
  let Stmt::VarDecl(decl) = *stmt.stx else {
    panic!("expected var decl");
  };
  let init = decl.stx.declarators[0].initializer.as_ref().expect("initializer");
  let Expr::Call(call) = init.stx.as_ref() else {
    panic!("expected call");
  };
  assert_eq!(call.stx.arguments.len(), 1);
  let Expr::LitStr(arg) = call.stx.arguments[0].stx.value.stx.as_ref() else {
    panic!("expected string argument");
  };
  assert_eq!(arg.stx.value, "./foo");
}

#[test]
fn test_import_forms() {
  let stmt = first_stmt("import def, { a, b as c, default as d, \"x-y\" as e } from 'mod';");
  let Stmt::Import(import) = *stmt.stx else {
    panic!("expected import");
  };
  assert_eq!(import.stx.module, "mod");
  assert!(import.stx.default.is_some());
  let Some(ImportNames::Specific(names)) = &import.stx.names else {
    panic!("expected named imports");
  };
  let importables: Vec<_> = names.iter().map(|n| n.stx.importable.clone()).collect();
  assert_eq!(importables, vec![
    ModuleExportImportName::Ident("a".to_string()),
    ModuleExportImportName::Ident("b".to_string()),
    ModuleExportImportName::Ident("default".to_string()),
    ModuleExportImportName::Str("x-y".to_string()),
  ]);

  let stmt = first_stmt("import * as ns from 'mod'");
  let Stmt::Import(import) = *stmt.stx else {
    panic!("expected import");
  };
  assert!(matches!(import.stx.names, Some(ImportNames::All(_))));

  let stmt = first_stmt("import 'side-effect';");
  let Stmt::Import(import) = *stmt.stx else {
    panic!("expected import");
  };
  assert!(import.stx.default.is_none() && import.stx.names.is_none());
}

#[test]
fn test_dynamic_import_is_expression() {
  let expr = first_expr("import('./lazy').then(f);");
  assert!(matches!(*expr.stx, Expr::Call(_)));
}

#[test]
fn test_dynamic_import_trailing_comma() {
  let expr = first_expr("import('./lazy',);");
  let Expr::Import(import) = *expr.stx else {
    panic!("expected import expression");
  };
  assert!(matches!(*import.stx.module.stx, Expr::LitStr(_)));
  assert!(parse("import('./lazy',,);").is_err());
}

#[test]
fn test_comments_are_kept_in_source_order() {
  let top = parse("// a\nx = /* b */ /re/g; // c\n").unwrap();
  let texts = top.stx.comments.iter().map(|c| c.text.as_str()).collect::<Vec<_>>();
  assert_eq!(texts, ["// a", "/* b */", "// c"]);
  assert_eq!(top.stx.comments[1].kind, CommentKind::Block);
}

#[test]
fn test_export_forms() {
  let stmt = first_stmt("export { a, b as default };");
  let Stmt::ExportList(list) = *stmt.stx else {
    panic!("expected export list");
  };
  let ExportNames::Specific(names) = &list.stx.names else {
    panic!("expected specific names");
  };
  assert_eq!(names[1].stx.alias.as_str(), "default");

  let stmt = first_stmt("export * as ns from 'mod';");
  let Stmt::ExportList(list) = *stmt.stx else {
    panic!("expected export list");
  };
  assert_eq!(list.stx.from.as_deref(), Some("mod"));

  let stmt = first_stmt("export default function () {}");
  let Stmt::FunctionDecl(func) = *stmt.stx else {
    panic!("expected function declaration");
  };
  assert!(func.stx.export_default && func.stx.name.is_none());

  let stmt = first_stmt("export default a + b;");
  assert!(matches!(*stmt.stx, Stmt::ExportDefaultExpr(_)));
}

#[test]
fn test_asi() {
  let top = parse("let a = 1\nlet b = a\n++b\nreturn_()").expect("parse");
  assert_eq!(top.stx.body.len(), 4);
}

#[test]
fn test_arrow_functions() {
  let expr = first_expr("(a, { b }, ...c) => a;");
  let Expr::ArrowFunc(arrow) = *expr.stx else {
    panic!("expected arrow function");
  };
  assert_eq!(arrow.stx.func.stx.parameters.len(), 3);
  assert!(arrow.stx.func.stx.parameters[2].stx.rest);

  let expr = first_expr("async x => await x;");
  let Expr::ArrowFunc(arrow) = *expr.stx else {
    panic!("expected arrow function");
  };
  assert!(arrow.stx.func.stx.async_);

  let expr = first_expr("(a, b);");
  assert!(matches!(*expr.stx, Expr::Binary(_)));
}

#[test]
fn test_line_terminator_before_arrow() {
  let err = parse("(a)\n=> a").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters);
}

#[test]
fn test_destructuring_assignment() {
  let expr = first_expr("({ a, b: [c = 1] } = obj);");
  let Expr::Binary(assign) = *expr.stx else {
    panic!("expected assignment");
  };
  let Expr::ObjPat(pat) = assign.stx.left.stx.as_ref() else {
    panic!("expected object pattern");
  };
  assert_eq!(pat.stx.properties.len(), 2);
  assert!(pat.stx.properties[0].stx.shorthand);
  let Pat::Arr(arr) = pat.stx.properties[1].stx.target.stx.as_ref() else {
    panic!("expected array pattern");
  };
  assert!(arr.stx.elements[0].as_ref().is_some_and(|e| e.default_value.is_some()));
}

#[test]
fn test_invalid_assignment_target() {
  let err = parse("a + b = c;").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::InvalidAssigmentTarget);
}

#[test]
fn test_object_literal_members() {
  let expr = first_expr("({ a, b: 1, [c]: 2, get d() { return 1; }, async *e() {}, ...f });");
  let Expr::LitObj(obj) = *expr.stx else {
    panic!("expected object literal");
  };
  let members = &obj.stx.members;
  assert_eq!(members.len(), 6);
  assert!(matches!(members[0].stx.typ, ObjMemberType::Shorthand { .. }));
  assert!(matches!(members[3].stx.typ, ObjMemberType::Valued {
    val: ClassOrObjVal::Getter(_),
    ..
  }));
  let ObjMemberType::Valued {
    val: ClassOrObjVal::Method(method),
    ..
  } = &members[4].stx.typ
  else {
    panic!("expected method");
  };
  assert!(method.stx.func.stx.async_ && method.stx.func.stx.generator);
  assert!(matches!(members[5].stx.typ, ObjMemberType::Rest { .. }));
}

#[test]
fn test_class_members() {
  let stmt = first_stmt("class A extends B { static x = 1; #y; constructor() { super(); } get z() { return 1 } }");
  let Stmt::ClassDecl(class) = *stmt.stx else {
    panic!("expected class");
  };
  assert!(class.stx.extends.is_some());
  assert_eq!(class.stx.members.len(), 4);
  assert!(class.stx.members[0].stx.static_);
}

#[test]
fn test_class_static_blocks() {
  let stmt = first_stmt("class A { static { let x = 1; init(x); } static = 2; static() {} static {} }");
  let Stmt::ClassDecl(class) = *stmt.stx else {
    panic!("expected class");
  };
  let members = &class.stx.members;
  assert_eq!(members.len(), 4);
  let ClassOrObjVal::StaticBlock(block) = &members[0].stx.val else {
    panic!("expected static block");
  };
  assert!(members[0].stx.static_);
  assert_eq!(block.stx.body.len(), 2);
  assert!(matches!(members[1].stx.val, ClassOrObjVal::Prop(Some(_))));
  assert!(!members[1].stx.static_);
  assert!(matches!(members[2].stx.val, ClassOrObjVal::Method(_)));
  assert!(!members[2].stx.static_);
  assert!(matches!(&members[3].stx.val, ClassOrObjVal::StaticBlock(b) if b.stx.body.is_empty()));
  assert!(parse("class A { static { }").is_err());
}

#[test]
fn test_for_in_of() {
  let stmt = first_stmt("for (const [k, v] of entries) {}");
  let Stmt::ForOf(for_of) = *stmt.stx else {
    panic!("expected for-of");
  };
  assert!(matches!(for_of.stx.lhs, ForInOfLhs::Decl { .. }));

  let stmt = first_stmt("for (k in obj) ;");
  let Stmt::ForIn(for_in) = *stmt.stx else {
    panic!("expected for-in");
  };
  assert!(matches!(for_in.stx.lhs, ForInOfLhs::Assign(_)));

  let stmt = first_stmt("for (let i = 0, j = 1; i < 3; i++) {}");
  assert!(matches!(*stmt.stx, Stmt::ForTriple(_)));
}

#[test]
fn test_templates() {
  let expr = first_expr("`a${b}c${`d${e}`}`;");
  let Expr::LitTemplate(template) = *expr.stx else {
    panic!("expected template");
  };
  assert_eq!(template.stx.parts.len(), 5);

  let expr = first_expr("tag`x`;");
  assert!(matches!(*expr.stx, Expr::TaggedTemplate(_)));
}

#[test]
fn test_jsx() {
  let expr = first_expr("<Foo.Bar a=\"1\" {...rest}><div>{value} text</div><Baz /></Foo.Bar>;");
  let Expr::JsxElem(elem) = *expr.stx else {
    panic!("expected JSX element");
  };
  assert!(matches!(elem.stx.name, Some(JsxElemName::Member(_))));
  assert_eq!(elem.stx.attributes.len(), 2);
  assert_eq!(elem.stx.children.len(), 2);
  let JsxElemChild::Element(baz) = &elem.stx.children[1] else {
    panic!("expected element child");
  };
  assert!(matches!(baz.stx.name, Some(JsxElemName::Id(_))));

  let expr = first_expr("<>hi</>;");
  let Expr::JsxElem(fragment) = *expr.stx else {
    panic!("expected fragment");
  };
  assert!(fragment.stx.name.is_none());
}

#[test]
fn test_jsx_closing_tag_mismatch() {
  let err = parse("<a></b>;").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::JsxClosingTagMismatch);
}

#[test]
fn test_try_requires_handler() {
  let err = parse("try {}").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::TryStatementHasNoCatchOrFinally);
  assert!(parse("try {} catch {} finally {}").is_ok());
}

#[test]
fn test_throw_line_terminator() {
  let err = parse("throw\nerr").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::LineTerminatorAfterThrow);
}

#[test]
fn test_optional_chaining_and_new() {
  let expr = first_expr("a?.b?.[c]?.(d);");
  let Expr::Call(call) = *expr.stx else {
    panic!("expected call");
  };
  assert!(call.stx.optional_chaining);

  let expr = first_expr("new Foo.Bar(1).baz;");
  let Expr::Member(member) = *expr.stx else {
    panic!("expected member access");
  };
  assert!(matches!(member.stx.left.stx.as_ref(), Expr::New(_)));
}

#[test]
fn test_contextual_keywords_as_identifiers() {
  assert!(parse("var async = 1, of = 2, get = 3; async + of + get;").is_ok());
  assert!(parse("function* g() { yield 1; yield* g(); }").is_ok());
  assert!(parse("async function f() { await x; }").is_ok());
  assert!(parse("const x = await y;").is_ok());
}
