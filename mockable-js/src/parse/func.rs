use super::expr::pat::is_valid_pattern_identifier;
use super::ParseCtx;
use super::ParsePatternRules;
use super::Parser;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::FuncExpr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxResult;
use crate::token::Kw;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Parses a parenthesised parameter list, including the parentheses.
  pub fn func_params(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<ParamDecl>>> {
    self.require(TT::LParen)?;
    self.list_with_loc(TT::Comma, TT::RParen, |p| {
      let rest = p.consume_if(TT::Ellipsis).is_match();
      let pattern = p.pat_decl(ctx)?;
      let default_value = p
        .consume_if(TT::Assign)
        .and_then(|| p.assignment_expr(ctx, &[TT::Comma, TT::RParen]))?;
      Ok(ParamDecl {
        rest,
        pattern,
        default_value,
      })
    })
  }

  pub fn func_block_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<Stmt>>> {
    self.require(TT::LBrace)?;
    let body = self.stmts(ctx, TT::RBrace)?;
    self.require(TT::RBrace)?;
    Ok(body)
  }

  /// Parses the parameters and body of a non-arrow function, e.g. after `function name` or a
  /// method's key.
  pub fn func_after_name(
    &mut self,
    ctx: ParseCtx,
    async_: bool,
    generator: bool,
  ) -> SyntaxResult<Node<Func>> {
    let fn_ctx = ctx.with_rules(ParsePatternRules {
      await_allowed: !async_,
      yield_allowed: !generator,
    });
    self.with_loc(|p| {
      let parameters = p.func_params(fn_ctx)?;
      let body = FuncBody::Block(p.func_block_body(fn_ctx)?);
      Ok(Func {
        arrow: false,
        async_,
        generator,
        parameters,
        body,
      })
    })
  }

  /// Parses an optional function or class name. Whether `await` and `yield` can be names depends
  /// on the enclosing context.
  pub fn class_or_func_name(&mut self, ctx: ParseCtx) -> SyntaxResult<Option<Node<ClassOrFuncName>>> {
    let t = self.peek();
    if !is_valid_pattern_identifier(t.typ, ctx.rules) {
      return Ok(None);
    };
    self.consume();
    Ok(Some(Node::new(t.loc, ClassOrFuncName {
      name: self.string(t.loc),
    })))
  }

  /// Parses `[async] function [*] [name] (...) {...}`.
  pub fn func_signature_and_body(
    &mut self,
    ctx: ParseCtx,
  ) -> SyntaxResult<(Option<Node<ClassOrFuncName>>, Node<Func>)> {
    let async_ = self.consume_if_word("async");
    self.require(TT::Kw(Kw::Function))?;
    let generator = self.consume_if(TT::Star).is_match();
    let name = self.class_or_func_name(ctx)?;
    let function = self.func_after_name(ctx, async_, generator)?;
    Ok((name, function))
  }

  pub fn func_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<FuncExpr>> {
    self.with_loc(|p| {
      let (name, func) = p.func_signature_and_body(ctx)?;
      Ok(FuncExpr { name, func })
    })
  }
}
