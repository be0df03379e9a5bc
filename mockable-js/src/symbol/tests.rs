use super::compute_symbols;
use super::declared_symbol;
use super::resolved_symbol;
use super::AssocResolver;
use super::BindingResolver;
use super::Scope;
use super::ScopeType;
use super::Symbol;
use super::SymbolGenerator;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::parse;
use derive_visitor::Drive;
use derive_visitor::Visitor;

type ClassOrFuncNameNode = Node<ClassOrFuncName>;
type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;

#[derive(Default, Visitor)]
#[visitor(ClassOrFuncNameNode(enter), IdExprNode(enter), IdPatNode(enter))]
struct Collect {
  // Name and declared symbol, in source order.
  decls: Vec<(String, Symbol)>,
  // Name and resolved symbol of every non-declaring identifier, in source order.
  uses: Vec<(String, Option<Symbol>)>,
}

impl Collect {
  fn enter_class_or_func_name_node(&mut self, node: &ClassOrFuncNameNode) {
    if let Some(symbol) = declared_symbol(&node.assoc) {
      self.decls.push((node.stx.name.clone(), symbol));
    };
  }

  fn enter_id_expr_node(&mut self, node: &IdExprNode) {
    self
      .uses
      .push((node.stx.name.clone(), resolved_symbol(&node.assoc)));
  }

  fn enter_id_pat_node(&mut self, node: &IdPatNode) {
    match declared_symbol(&node.assoc) {
      Some(symbol) => self.decls.push((node.stx.name.clone(), symbol)),
      None => self
        .uses
        .push((node.stx.name.clone(), resolved_symbol(&node.assoc))),
    };
  }
}

fn collect(source: &str) -> Collect {
  let mut top = parse(source).unwrap();
  compute_symbols(&mut top);
  let mut collect = Collect::default();
  top.drive(&mut collect);
  collect
}

impl Collect {
  fn decl(&self, name: &str, nth: usize) -> Symbol {
    self
      .decls
      .iter()
      .filter(|(n, _)| n == name)
      .nth(nth)
      .map(|(_, s)| *s)
      .unwrap_or_else(|| panic!("no declaration #{} of {}", nth, name))
  }

  fn uses_of(&self, name: &str) -> Vec<Option<Symbol>> {
    self
      .uses
      .iter()
      .filter(|(n, _)| n == name)
      .map(|(_, s)| *s)
      .collect()
  }
}

#[test]
fn test_find_symbol_walks_up_scopes() {
  let generator = SymbolGenerator::new();
  let module = Scope::new(generator, None, ScopeType::Module);
  let a = module.data_mut().add_symbol("a".into());
  let func = module.create_child_scope(ScopeType::NonArrowFunction);
  let block = func.create_child_scope(ScopeType::Block);
  let b = block.data_mut().add_symbol("b".into());

  assert_eq!(block.find_symbol("a"), Some(a));
  assert_eq!(block.find_symbol("b"), Some(b));
  assert_eq!(func.find_symbol("b"), None);
  assert_eq!(block.closest_closure(), func);
  let (scope, _) = block.find_symbol_with_scope("a").unwrap();
  assert_eq!(scope, module);
}

#[test]
fn test_redeclaring_in_same_scope_reuses_symbol() {
  let module = Scope::new(SymbolGenerator::new(), None, ScopeType::Module);
  let first = module.data_mut().add_symbol("x".into());
  let second = module.data_mut().add_symbol("x".into());
  assert_eq!(first, second);
  assert_eq!(module.data().symbol_names(), &vec!["x".to_string()]);
}

#[test]
fn test_shadowing_prefers_inner_bindings() {
  let c = collect("let a = 1; { let a = 2; a; } a;");
  let outer = c.decl("a", 0);
  let inner = c.decl("a", 1);
  assert_ne!(outer, inner);
  assert_eq!(c.uses_of("a"), vec![Some(inner), Some(outer)]);
}

#[test]
fn test_imports_and_later_declarations_resolve() {
  let c = collect("foo(); import foo from 'foo'; bar(); var bar = require('bar');");
  assert_eq!(c.uses_of("foo"), vec![Some(c.decl("foo", 0))]);
  assert_eq!(c.uses_of("bar"), vec![Some(c.decl("bar", 0))]);
  assert_eq!(c.uses_of("require"), vec![None]);
}

#[test]
fn test_var_is_hoisted_out_of_blocks() {
  let c = collect("function f() { if (x) { var v = 1; } return v; } v;");
  let v = c.decl("v", 0);
  assert_eq!(c.uses_of("v"), vec![Some(v), None]);
}

#[test]
fn test_parameters_and_catch_bindings() {
  let c = collect(
    "import x from 'x'; function f(x) { return x; } try {} catch (x) { x; } x;",
  );
  let import = c.decl("x", 0);
  let param = c.decl("x", 1);
  let catch = c.decl("x", 2);
  assert_eq!(c.uses_of("x"), vec![Some(param), Some(catch), Some(import)]);
}

#[test]
fn test_function_expression_name_is_local() {
  let c = collect("const g = function f() { return f; }; f;");
  let f = c.decl("f", 0);
  assert_eq!(c.uses_of("f"), vec![Some(f), None]);
}

#[test]
fn test_assignment_targets_resolve_to_declaration() {
  let c = collect("let foo; foo = 1; [foo] = [2]; ({foo} = {foo: 3});");
  let foo = c.decl("foo", 0);
  assert_eq!(c.uses_of("foo"), vec![Some(foo), Some(foo), Some(foo)]);
}

#[test]
fn test_export_list_is_not_a_reference() {
  let c = collect("import a from 'a'; let ns; export {a}; export * as ns from 'b';");
  assert!(c.uses_of("a").is_empty());
  // The re-export alias never resolves, even if a binding with that name exists.
  assert_eq!(c.uses_of("ns"), vec![None]);
  assert_eq!(c.decls.len(), 2);
}

#[test]
fn test_jsx_names_resolve() {
  let mut top = parse("import Foo from 'foo'; <Foo><div /></Foo>;").unwrap();
  compute_symbols(&mut top);
  let mut c = Collect::default();
  top.drive(&mut c);
  let foo = c.decl("Foo", 0);
  // The closing tag isn't a separate node.
  assert_eq!(c.uses_of("Foo"), vec![Some(foo)]);
  // Lowercase names are intrinsic elements, not references.
  assert!(c.uses_of("div").is_empty());
}

#[test]
fn test_assoc_resolver_is_stable() {
  let mut top = parse("import a from 'a'; a; a;").unwrap();
  compute_symbols(&mut top);
  let mut c = Collect::default();
  top.drive(&mut c);
  let a = c.decl("a", 0);
  let uses = c.uses_of("a");
  assert_eq!(uses, vec![Some(a), Some(a)]);
  let mut assoc = crate::ast::node::NodeAssocData::default();
  assoc.set(super::ResolvedSymbol(Some(a)));
  assert_eq!(AssocResolver.resolve("a", &assoc), Some(a));
  assert_eq!(AssocResolver.resolve("a", &assoc), Some(a));
}
