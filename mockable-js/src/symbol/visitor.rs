use super::scope::Scope;
use super::scope::ScopeType;
use super::scope::Symbol;
use crate::ast::class_or_object::ClassStaticBlock;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::ClassExpr;
use crate::ast::expr::FuncExpr;
use crate::ast::expr::IdExpr;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::node::NodeAssocData;
use crate::ast::stmt::decl::PatDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::CatchBlock;
use crate::ast::stmt::ExportListStmt;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForInStmt;
use crate::ast::stmt::ForOfStmt;
use crate::ast::stmt::ForTripleStmt;
use crate::ast::stmt::SwitchStmt;
use derive_visitor::VisitorMut;

/// Attached to a name node that declares a binding.
#[derive(Clone, Copy, Debug)]
pub struct DeclaredSymbol(pub Symbol);

/// Attached to every identifier node by the resolution pass; None if the name is not declared
/// anywhere in the module (a global, or something provided by the module system).
#[derive(Clone, Copy, Debug)]
pub struct ResolvedSymbol(pub Option<Symbol>);

pub fn declared_symbol(assoc: &NodeAssocData) -> Option<Symbol> {
  assoc.get::<DeclaredSymbol>().map(|d| d.0)
}

pub fn resolved_symbol(assoc: &NodeAssocData) -> Option<Symbol> {
  assoc.get::<ResolvedSymbol>().and_then(|r| r.0)
}

fn declare_pat(scope: &Scope, pat: &mut Node<Pat>) {
  match pat.stx.as_mut() {
    Pat::Id(id) => declare_id(scope, id),
    Pat::Arr(arr) => {
      for elem in arr.stx.elements.iter_mut().flatten() {
        declare_pat(scope, &mut elem.target);
      }
      if let Some(rest) = &mut arr.stx.rest {
        declare_pat(scope, rest);
      };
    }
    Pat::Obj(obj) => {
      for prop in obj.stx.properties.iter_mut() {
        declare_pat(scope, &mut prop.stx.target);
      }
      if let Some(rest) = &mut obj.stx.rest {
        declare_id(scope, rest);
      };
    }
  }
}

fn declare_id(scope: &Scope, id: &mut Node<IdPat>) {
  let symbol = scope.data_mut().add_symbol(id.stx.name.clone());
  id.assoc.set(DeclaredSymbol(symbol));
}

type BlockStmtNode = Node<BlockStmt>;
type CatchBlockNode = Node<CatchBlock>;
type ClassExprNode = Node<ClassExpr>;
type ClassOrFuncNameNode = Node<ClassOrFuncName>;
type ClassStaticBlockNode = Node<ClassStaticBlock>;
type ExportListStmtNode = Node<ExportListStmt>;
type ForInStmtNode = Node<ForInStmt>;
type ForOfStmtNode = Node<ForOfStmt>;
type ForTripleStmtNode = Node<ForTripleStmt>;
type FuncExprNode = Node<FuncExpr>;
type FuncNode = Node<Func>;
type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;
type PatDeclNode = Node<PatDecl>;
type SwitchStmtNode = Node<SwitchStmt>;
type VarDeclNode = Node<VarDecl>;

/// Builds the scope tree and declares every binding. References get the scope they appear in,
/// and are resolved in a second pass once all hoisted declarations are known.
#[derive(VisitorMut)]
#[visitor(
  BlockStmtNode(enter, exit),
  CatchBlockNode(enter, exit),
  ClassExprNode(enter, exit),
  ClassOrFuncNameNode(enter),
  ClassStaticBlockNode(enter, exit),
  ExportListStmtNode(enter, exit),
  ForInOfLhs(enter, exit),
  ForInStmtNode(enter, exit),
  ForOfStmtNode(enter, exit),
  ForTripleStmtNode(enter, exit),
  FuncExprNode(enter, exit),
  FuncNode(enter, exit),
  IdExprNode(enter),
  IdPatNode(enter),
  PatDeclNode(enter),
  SwitchStmtNode(enter, exit),
  VarDeclNode(enter, exit)
)]
pub struct DeclVisitor {
  scopes: Vec<Scope>,
  // The kind of the innermost enclosing variable declaration; None inside parameters, imports,
  // and catch clauses, which always declare in the current scope.
  var_modes: Vec<Option<VarDeclMode>>,
  in_export_list: bool,
}

impl DeclVisitor {
  pub fn new(top_level_scope: Scope) -> DeclVisitor {
    DeclVisitor {
      scopes: vec![top_level_scope],
      var_modes: vec![None],
      in_export_list: false,
    }
  }

  fn scope(&self) -> &Scope {
    // The top level scope is never popped.
    &self.scopes[self.scopes.len() - 1]
  }

  fn push_scope(&mut self, typ: ScopeType) {
    let child = self.scope().create_child_scope(typ);
    self.scopes.push(child);
  }

  fn pop_scope(&mut self) {
    if self.scopes.len() > 1 {
      self.scopes.pop();
    };
  }

  fn enter_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.push_scope(ScopeType::Block);
  }

  fn exit_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.pop_scope();
  }

  fn enter_catch_block_node(&mut self, _node: &mut CatchBlockNode) {
    self.push_scope(ScopeType::Block);
    self.var_modes.push(None);
  }

  fn exit_catch_block_node(&mut self, _node: &mut CatchBlockNode) {
    self.var_modes.pop();
    self.pop_scope();
  }

  fn enter_class_expr_node(&mut self, _node: &mut ClassExprNode) {
    self.push_scope(ScopeType::ClassOrFuncExprName);
  }

  fn exit_class_expr_node(&mut self, _node: &mut ClassExprNode) {
    self.pop_scope();
  }

  fn enter_func_expr_node(&mut self, _node: &mut FuncExprNode) {
    self.push_scope(ScopeType::ClassOrFuncExprName);
  }

  fn exit_func_expr_node(&mut self, _node: &mut FuncExprNode) {
    self.pop_scope();
  }

  // Declarations are lexically scoped in modules, so a function or class name belongs to the
  // current scope. For expressions, that is the scope created just for the name.
  fn enter_class_or_func_name_node(&mut self, node: &mut ClassOrFuncNameNode) {
    let symbol = self.scope().data_mut().add_symbol(node.stx.name.clone());
    node.assoc.set(DeclaredSymbol(symbol));
  }

  // `var` inside a static block stays in the block.
  fn enter_class_static_block_node(&mut self, _node: &mut ClassStaticBlockNode) {
    self.push_scope(ScopeType::NonArrowFunction);
    self.var_modes.push(None);
  }

  fn exit_class_static_block_node(&mut self, _node: &mut ClassStaticBlockNode) {
    self.var_modes.pop();
    self.pop_scope();
  }

  fn enter_export_list_stmt_node(&mut self, _node: &mut ExportListStmtNode) {
    self.in_export_list = true;
  }

  fn exit_export_list_stmt_node(&mut self, _node: &mut ExportListStmtNode) {
    self.in_export_list = false;
  }

  fn enter_for_in_of_lhs(&mut self, node: &mut ForInOfLhs) {
    self.var_modes.push(match node {
      ForInOfLhs::Decl { mode, .. } => Some(*mode),
      ForInOfLhs::Assign(_) => None,
    });
  }

  fn exit_for_in_of_lhs(&mut self, _node: &mut ForInOfLhs) {
    self.var_modes.pop();
  }

  fn enter_for_in_stmt_node(&mut self, _node: &mut ForInStmtNode) {
    self.push_scope(ScopeType::Block);
  }

  fn exit_for_in_stmt_node(&mut self, _node: &mut ForInStmtNode) {
    self.pop_scope();
  }

  fn enter_for_of_stmt_node(&mut self, _node: &mut ForOfStmtNode) {
    self.push_scope(ScopeType::Block);
  }

  fn exit_for_of_stmt_node(&mut self, _node: &mut ForOfStmtNode) {
    self.pop_scope();
  }

  fn enter_for_triple_stmt_node(&mut self, _node: &mut ForTripleStmtNode) {
    self.push_scope(ScopeType::Block);
  }

  fn exit_for_triple_stmt_node(&mut self, _node: &mut ForTripleStmtNode) {
    self.pop_scope();
  }

  fn enter_func_node(&mut self, node: &mut FuncNode) {
    self.push_scope(match node.stx.arrow {
      true => ScopeType::ArrowFunction,
      false => ScopeType::NonArrowFunction,
    });
    self.var_modes.push(None);
  }

  fn exit_func_node(&mut self, _node: &mut FuncNode) {
    self.var_modes.pop();
    self.pop_scope();
  }

  fn enter_id_expr_node(&mut self, node: &mut IdExprNode) {
    node.assoc.set(self.scope().clone());
  }

  fn enter_id_pat_node(&mut self, node: &mut IdPatNode) {
    // Declaring names were already handled by their PatDecl. What's left are assignment targets,
    // plus the `* as name` of a re-export, which is not a binding at all.
    if declared_symbol(&node.assoc).is_none() && !self.in_export_list {
      node.assoc.set(self.scope().clone());
    };
  }

  fn enter_pat_decl_node(&mut self, node: &mut PatDeclNode) {
    let scope = match self.var_modes.last() {
      Some(Some(VarDeclMode::Var)) => self.scope().closest_closure(),
      _ => self.scope().clone(),
    };
    declare_pat(&scope, &mut node.stx.pat);
  }

  // Case clauses share one block scope.
  fn enter_switch_stmt_node(&mut self, _node: &mut SwitchStmtNode) {
    self.push_scope(ScopeType::Block);
  }

  fn exit_switch_stmt_node(&mut self, _node: &mut SwitchStmtNode) {
    self.pop_scope();
  }

  fn enter_var_decl_node(&mut self, node: &mut VarDeclNode) {
    self.var_modes.push(Some(node.stx.mode));
  }

  fn exit_var_decl_node(&mut self, _node: &mut VarDeclNode) {
    self.var_modes.pop();
  }
}

/// Resolves every identifier against the scope it appears in.
#[derive(Default, VisitorMut)]
#[visitor(ClassOrFuncNameNode(enter), IdExprNode(enter), IdPatNode(enter))]
pub struct ResolveVisitor {
  pub resolved: usize,
  pub unresolved: usize,
}

impl ResolveVisitor {
  fn mark(&mut self, assoc: &mut NodeAssocData, symbol: Option<Symbol>) {
    assoc.set(ResolvedSymbol(symbol));
    match symbol {
      Some(_) => self.resolved += 1,
      None => self.unresolved += 1,
    };
  }

  fn resolve_use(&mut self, assoc: &mut NodeAssocData, name: &str) {
    let symbol = assoc
      .get::<Scope>()
      .and_then(|scope| scope.find_symbol(name));
    self.mark(assoc, symbol);
  }

  fn enter_class_or_func_name_node(&mut self, node: &mut ClassOrFuncNameNode) {
    let declared = declared_symbol(&node.assoc);
    self.mark(&mut node.assoc, declared);
  }

  fn enter_id_expr_node(&mut self, node: &mut IdExprNode) {
    self.resolve_use(&mut node.assoc, &node.stx.name);
  }

  fn enter_id_pat_node(&mut self, node: &mut IdPatNode) {
    match declared_symbol(&node.assoc) {
      Some(declared) => self.mark(&mut node.assoc, Some(declared)),
      None => self.resolve_use(&mut node.assoc, &node.stx.name),
    };
  }
}
