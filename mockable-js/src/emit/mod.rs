//! Prints an AST back to JavaScript source.
//!
//! Output is meant to be read, not minified: one statement per line, two spaces of indentation,
//! and spaces around binary operators. Parentheses are not stored in the AST, so they are
//! re-derived from operator precedence and from the places where an expression would be read as
//! something else (an object literal at the start of a statement, for example).
//!
//! Comments are written back before the first statement or expression that starts after them.
//! Between statements they keep their own line; inside an expression a line comment is turned
//! into a block comment so it can't swallow the code that follows.

mod escape;
mod expr;
mod precedence;
mod stmt;
#[cfg(test)]
mod tests;

use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::ast::stx::TopLevel;
use crate::token::Comment;
use crate::token::CommentKind;
pub use escape::emit_string_literal_double_quoted;
use std::fmt;

pub type EmitResult = fmt::Result;

pub struct JsEmitter<'a, W: fmt::Write> {
  out: &'a mut W,
  indent: usize,
  // Not yet written, in source order.
  comments: &'a [Comment],
}

impl<'a, W: fmt::Write> JsEmitter<'a, W> {
  pub fn new(out: &'a mut W) -> Self {
    Self {
      out,
      indent: 0,
      comments: &[],
    }
  }

  pub fn with_comments(out: &'a mut W, comments: &'a [Comment]) -> Self {
    Self {
      out,
      indent: 0,
      comments,
    }
  }

  fn newline(&mut self) -> EmitResult {
    self.out.write_char('\n')?;
    for _ in 0..self.indent {
      self.out.write_str("  ")?;
    }
    Ok(())
  }

  /// Writes the pending comments that start before `offset`. `inline` comments are followed by a
  /// space instead of a line break.
  pub(super) fn emit_comments_before(&mut self, offset: usize, inline: bool) -> EmitResult {
    loop {
      let pending = self.comments;
      let Some((comment, rest)) = pending.split_first() else {
        break;
      };
      if comment.loc.0 >= offset {
        break;
      };
      self.comments = rest;
      match (comment.kind, inline) {
        (CommentKind::Line, true) => {
          let body = comment.text.strip_prefix("//").unwrap_or(&comment.text);
          write!(self.out, "/*{}*/", body.replace("*/", "* /"))?;
        }
        _ => self.out.write_str(&comment.text)?,
      };
      if inline {
        self.out.write_char(' ')?;
      } else {
        self.newline()?;
      };
    }
    Ok(())
  }

  pub fn emit_top_level(&mut self, top: &Node<TopLevel>) -> EmitResult {
    for stmt in top.stx.body.iter() {
      self.emit_stmt(stmt)?;
      self.out.write_char('\n')?;
    }
    self.emit_comments_before(usize::MAX, false)
  }
}

pub fn emit_js<W: fmt::Write>(out: &mut W, top: &Node<TopLevel>) -> EmitResult {
  JsEmitter::with_comments(out, &top.stx.comments).emit_top_level(top)
}

/// Prints a whole module.
pub fn emit_js_string(top: &Node<TopLevel>) -> String {
  let mut out = String::new();
  // Writing to a String cannot fail.
  let _ = emit_js(&mut out, top);
  out
}

pub fn emit_stmt_string(stmt: &Node<Stmt>) -> String {
  let mut out = String::new();
  let _ = JsEmitter::new(&mut out).emit_stmt(stmt);
  out
}

pub fn emit_expr_string(expr: &Node<Expr>) -> String {
  let mut out = String::new();
  let _ = JsEmitter::new(&mut out).emit_expr(expr);
  out
}
