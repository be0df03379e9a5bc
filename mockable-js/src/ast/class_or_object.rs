use super::expr::Expr;
use super::expr::IdExpr;
use super::func::Func;
use super::node::Node;
use super::stmt::Stmt;
use crate::token::TT;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// This is a node as the key may not be the same as source[node.loc], due to decoding.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjMemberDirectKey {
  #[drive(skip)]
  pub key: String,
  // The original token type, to know whether the key must be quoted when written back.
  #[drive(skip)]
  pub tt: TT,
}

// Direct can't be represented with an IdExpr, as a key is not a usage of a variable.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ClassOrObjKey {
  // Identifier, keyword, private name, string, or number.
  Direct(Node<ClassOrObjMemberDirectKey>),
  Computed(Node<Expr>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjGetter {
  pub func: Node<Func>, // `parameters` is empty.
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjMethod {
  pub func: Node<Func>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjSetter {
  pub func: Node<Func>, // `parameters` contains exactly one ParamDecl.
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassStaticBlock {
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum ClassOrObjVal {
  Getter(Node<ClassOrObjGetter>),
  Setter(Node<ClassOrObjSetter>),
  Method(Node<ClassOrObjMethod>),
  // Always Some in an object literal; shorthands are ObjMemberType::Shorthand.
  Prop(Option<Node<Expr>>),
  // `static { ... }`. Only in classes, where the member's key is the `static` keyword.
  StaticBlock(Node<ClassStaticBlock>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ObjMemberType {
  Valued {
    key: ClassOrObjKey,
    val: ClassOrObjVal,
  },
  Shorthand {
    id: Node<IdExpr>,
  },
  Rest {
    val: Node<Expr>,
  },
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassMember {
  pub key: ClassOrObjKey,
  #[drive(skip)]
  pub static_: bool,
  pub val: ClassOrObjVal,
}

// A node rather than a bare enum so that a shorthand can be replaced by a `key: value` member.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ObjMember {
  pub typ: ObjMemberType,
}
