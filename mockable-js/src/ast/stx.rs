use super::node::Node;
use super::stmt::Stmt;
use crate::token::Comment;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TopLevel {
  pub body: Vec<Node<Stmt>>,
  /// Every comment in the module, in source order. The emitter puts each one back before the
  /// first node that follows it in the source.
  #[drive(skip)]
  #[serde(skip)]
  pub comments: Vec<Comment>,
}
