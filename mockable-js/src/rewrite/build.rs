//! Constructors for the nodes the rewriter inserts. Every node gets an empty location at the
//! offset it stands in for.

use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMember;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitArrExpr;
use crate::ast::expr::lit::LitObjExpr;
use crate::ast::expr::lit::LitStrExpr;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallArg;
use crate::ast::expr::CallExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::NewExpr;
use crate::ast::import_export::ExportName;
use crate::ast::import_export::ExportNames;
use crate::ast::import_export::ImportName;
use crate::ast::import_export::ImportNames;
use crate::ast::import_export::ModuleExportImportName;
use crate::ast::node::Node;
use crate::ast::stmt::decl::PatDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::decl::VarDeclarator;
use crate::ast::stmt::ExportListStmt;
use crate::ast::stmt::ExprStmt;
use crate::ast::stmt::ImportStmt;
use crate::ast::stmt::Stmt;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::registry::ADD_METHOD;
use crate::registry::HELPER_MODULE;
use crate::registry::REGISTRY_CLASS;
use crate::registry::REGISTRY_NAME;
use crate::token::TT;

use super::Binding;

pub fn id(loc: Loc, name: &str) -> Node<Expr> {
  Node::new(loc, IdExpr {
    name: name.to_string(),
  })
  .into_wrapped()
}

pub fn str_lit(loc: Loc, value: &str) -> Node<Expr> {
  Node::new(loc, LitStrExpr {
    value: value.to_string(),
  })
  .into_wrapped()
}

pub fn member(loc: Loc, left: Node<Expr>, right: &str) -> Node<Expr> {
  Node::new(loc, MemberExpr {
    optional_chaining: false,
    left,
    right: right.to_string(),
  })
  .into_wrapped()
}

/// `$imports.alias`.
pub fn registry_member(loc: Loc, alias: &str) -> Node<Expr> {
  member(loc, id(loc, REGISTRY_NAME), alias)
}

fn arg(value: Node<Expr>) -> Node<CallArg> {
  Node::new(value.loc, CallArg {
    spread: false,
    value,
  })
}

fn expr_stmt(expr: Node<Expr>) -> Node<Stmt> {
  Node::new(expr.loc, ExprStmt { expr }).into_wrapped()
}

fn pat_decl(loc: Loc, name: &str) -> Node<PatDecl> {
  let pat: Node<Pat> = Node::new(loc, IdPat {
    name: name.to_string(),
  })
  .into_wrapped();
  Node::new(loc, PatDecl { pat })
}

/// `import {ImportMap} from "mockable-js/helpers";`
pub fn import_registry_class(loc: Loc) -> Node<Stmt> {
  Node::new(loc, ImportStmt {
    default: None,
    names: Some(ImportNames::Specific(vec![Node::new(loc, ImportName {
      importable: ModuleExportImportName::Ident(REGISTRY_CLASS.to_string()),
      alias: pat_decl(loc, REGISTRY_CLASS),
    })])),
    module: HELPER_MODULE.to_string(),
  })
  .into_wrapped()
}

/// `["path", "symbol", alias]`, the registration record of a binding.
fn registration(loc: Loc, binding: &Binding) -> Node<Expr> {
  Node::new(loc, LitArrExpr {
    elements: vec![
      LitArrElem::Single(str_lit(loc, &binding.path)),
      LitArrElem::Single(str_lit(loc, binding.symbol.as_str())),
      LitArrElem::Single(id(loc, &binding.alias)),
    ],
  })
  .into_wrapped()
}

/// `const $imports = new ImportMap({alias: ["path", "symbol", alias], ...});`, or with no
/// arguments if there are no initial bindings.
pub fn construct_registry(loc: Loc, initial: &[&Binding]) -> Node<Stmt> {
  let arguments = match initial {
    [] => Vec::new(),
    initial => {
      let members = initial
        .iter()
        .map(|binding| {
          Node::new(loc, ObjMember {
            typ: ObjMemberType::Valued {
              key: ClassOrObjKey::Direct(Node::new(loc, ClassOrObjMemberDirectKey {
                key: binding.alias.clone(),
                tt: TT::Ident,
              })),
              val: ClassOrObjVal::Prop(Some(registration(loc, binding))),
            },
          })
        })
        .collect();
      vec![arg(Node::new(loc, LitObjExpr { members }).into_wrapped())]
    }
  };
  let new: Node<Expr> = Node::new(loc, NewExpr {
    callee: id(loc, REGISTRY_CLASS),
    arguments: Some(arguments),
  })
  .into_wrapped();
  Node::new(loc, VarDecl {
    export: false,
    mode: VarDeclMode::Const,
    declarators: vec![VarDeclarator {
      pattern: pat_decl(loc, REGISTRY_NAME),
      initializer: Some(new),
    }],
  })
  .into_wrapped()
}

/// `$imports.$add("alias", "path", "symbol", alias);`
pub fn register_binding(loc: Loc, binding: &Binding) -> Node<Stmt> {
  let call = Node::new(loc, CallExpr {
    optional_chaining: false,
    callee: member(loc, id(loc, REGISTRY_NAME), ADD_METHOD),
    arguments: vec![
      arg(str_lit(loc, &binding.alias)),
      arg(str_lit(loc, &binding.path)),
      arg(str_lit(loc, binding.symbol.as_str())),
      arg(id(loc, &binding.alias)),
    ],
  })
  .into_wrapped();
  expr_stmt(call)
}

/// `export {$imports};`
pub fn export_registry(loc: Loc) -> Node<Stmt> {
  let name = ModuleExportImportName::Ident(REGISTRY_NAME.to_string());
  Node::new(loc, ExportListStmt {
    names: ExportNames::Specific(vec![Node::new(loc, ExportName {
      exportable: name.clone(),
      alias: name,
    })]),
    from: None,
  })
  .into_wrapped()
}

/// `module.exports.$imports = $imports;`
pub fn republish_registry(loc: Loc) -> Node<Stmt> {
  let target = member(loc, member(loc, id(loc, "module"), "exports"), REGISTRY_NAME);
  let assign = Node::new(loc, BinaryExpr {
    operator: OperatorName::Assignment,
    left: target,
    right: id(loc, REGISTRY_NAME),
  })
  .into_wrapped();
  expr_stmt(assign)
}
