pub mod jsx;
pub mod lit;
pub mod pat;

use super::operator::infix_operator;
use super::operator::prefix_operator;
use super::ParseCtx;
use super::ParsePatternRules;
use super::Parser;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::ArrowFuncExpr;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallArg;
use crate::ast::expr::CallExpr;
use crate::ast::expr::ComputedMemberExpr;
use crate::ast::expr::CondExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::ImportExpr;
use crate::ast::expr::ImportMeta;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::NewExpr;
use crate::ast::expr::NewTarget;
use crate::ast::expr::SuperExpr;
use crate::ast::expr::TaggedTemplateExpr;
use crate::ast::expr::ThisExpr;
use crate::ast::expr::UnaryExpr;
use crate::ast::expr::UnaryPostfixExpr;
use crate::ast::expr::YieldExpr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::decl::PatDecl;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::token::Token;
use crate::token::Kw;
use crate::token::TT;
use pat::is_valid_pattern_identifier;
use pat::lit_to_pat;

/// Converts the left side of an assignment into an assignment target.
fn lhs_expr_to_assign_target(lhs: Node<Expr>, operator: OperatorName) -> SyntaxResult<Node<Expr>> {
  let loc = lhs.loc;
  match *lhs.stx {
    Expr::Id(id) => Ok(Node::new(loc, IdPat { name: id.stx.name }).into_wrapped()),
    member @ (Expr::Member(_) | Expr::ComputedMember(_)) => Ok(Node::new(loc, member)),
    lit @ (Expr::LitArr(_) | Expr::LitObj(_)) if operator == OperatorName::Assignment => {
      Ok(lit_to_pat(Node::new(loc, lit))?.into_stx())
    }
    _ => Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None)),
  }
}

fn is_member_name(tt: TT) -> bool {
  tt == TT::Ident || tt == TT::PrivateName || tt.is_keyword()
}

impl<'a> Parser<'a> {
  /// Parses call arguments after the opening parenthesis, up to and including the closing one.
  pub fn call_args(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<CallArg>>> {
    self.list_with_loc(TT::Comma, TT::RParen, |p| {
      let spread = p.consume_if(TT::Ellipsis).is_match();
      let value = p.assignment_expr(ctx, &[TT::Comma, TT::RParen])?;
      Ok(CallArg { spread, value })
    })
  }

  pub fn expr(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, 1, terminators)
  }

  /// Parses an expression that can't be a comma sequence, e.g. an argument or initializer.
  pub fn assignment_expr(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, OPERATORS[&OperatorName::Assignment].precedence, terminators)
  }

  /// Parses a parenthesised expression like `(a + b)`.
  pub fn grouping(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    self.require(TT::LParen)?;
    let expr = self.expr(ctx, &[TT::RParen])?;
    self.require(TT::RParen)?;
    Ok(expr)
  }

  /// Parses everything of an arrow function up to and including the `=>`, returning None if the
  /// upcoming tokens aren't an arrow function.
  fn arrow_func_head(&mut self, ctx: ParseCtx) -> SyntaxResult<Option<Vec<Node<ParamDecl>>>> {
    self.rewindable(|p| {
      let parameters = if p.peek().typ == TT::LParen {
        match p.func_params(ctx) {
          Ok(params) => params,
          Err(_) => return Ok(None),
        }
      } else {
        let name = p.consume();
        if !is_valid_pattern_identifier(name.typ, ctx.rules) {
          return Ok(None);
        };
        let param_name = p.string(name.loc);
        let pattern = Node::new(name.loc, PatDecl {
          pat: Node::new(name.loc, IdPat { name: param_name }).into_wrapped(),
        });
        vec![Node::new(name.loc, ParamDecl {
          rest: false,
          pattern,
          default_value: None,
        })]
      };
      let arrow = p.peek();
      if arrow.typ != TT::Arrow {
        return Ok(None);
      };
      if arrow.preceded_by_line_terminator {
        return Err(arrow.error(SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters));
      };
      p.consume();
      Ok(Some(parameters))
    })
  }

  /// Parses an arrow function if one starts here. `async` must already have been consumed if
  /// `is_async`.
  fn maybe_arrow_func_expr(
    &mut self,
    ctx: ParseCtx,
    is_async: bool,
    terminators: &[TT],
  ) -> SyntaxResult<Option<Node<Expr>>> {
    let start = self.checkpoint();
    let fn_ctx = ctx.with_rules(ParsePatternRules {
      await_allowed: !is_async && ctx.rules.await_allowed,
      yield_allowed: ctx.rules.yield_allowed,
    });
    let Some(parameters) = self.arrow_func_head(fn_ctx)? else {
      return Ok(None);
    };
    let body = match self.peek().typ {
      TT::LBrace => FuncBody::Block(self.func_block_body(fn_ctx)?),
      _ => FuncBody::Expression(self.assignment_expr(fn_ctx, terminators)?),
    };
    let loc = self.since_checkpoint(&start);
    let func = Node::new(loc, Func {
      arrow: true,
      async_: is_async,
      generator: false,
      parameters,
      body,
    });
    Ok(Some(Node::new(loc, ArrowFuncExpr { func }).into_wrapped()))
  }

  fn arrow_function_or_grouping_expr(
    &mut self,
    ctx: ParseCtx,
    terminators: &[TT],
  ) -> SyntaxResult<Node<Expr>> {
    // Try to parse an arrow function signature first, and backtrack to a grouping if that fails.
    // After `=>` it's definitely an arrow function.
    match self.maybe_arrow_func_expr(ctx, false, terminators)? {
      Some(arrow) => Ok(arrow),
      None => self.grouping(ctx),
    }
  }

  /// Handles the contextual `async`, which might start an async function or arrow function, or
  /// might just be a variable named `async`.
  fn async_or_id_expr(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    let [_, next] = self.peek_n::<2>();
    if !next.preceded_by_line_terminator {
      if next.typ == TT::Kw(Kw::Function) {
        return Ok(self.func_expr(ctx)?.into_wrapped());
      };
      if next.typ == TT::LParen || is_valid_pattern_identifier(next.typ, ctx.rules) {
        let cp = self.checkpoint();
        self.consume();
        if let Some(arrow) = self.maybe_arrow_func_expr(ctx, true, terminators)? {
          return Ok(arrow);
        };
        self.restore_checkpoint(cp);
      };
    };
    self.id_or_arrow_expr(ctx, terminators)
  }

  fn id_or_arrow_expr(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    let [_, next] = self.peek_n::<2>();
    if next.typ == TT::Arrow {
      if let Some(arrow) = self.maybe_arrow_func_expr(ctx, false, terminators)? {
        return Ok(arrow);
      };
    };
    Ok(self.id_expr(ctx)?.into_wrapped())
  }

  pub fn id_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<IdExpr>> {
    let t = self.consume();
    if !is_valid_pattern_identifier(t.typ, ctx.rules) {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("identifier")));
    };
    Ok(Node::new(t.loc, IdExpr {
      name: self.string(t.loc),
    }))
  }

  fn yield_expr(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    let node = self.with_loc(|p| {
      p.require(TT::Kw(Kw::Yield))?;
      let delegate = p.consume_if(TT::Star).is_match();
      let next = p.peek_with_mode(LexMode::SlashIsRegex);
      let ends_here = next.preceded_by_line_terminator
        || terminators.contains(&next.typ)
        || matches!(
          next.typ,
          TT::RBrace
            | TT::RBracket
            | TT::Colon
            | TT::Comma
            | TT::Eof
            | TT::RParen
            | TT::Semicolon
        );
      let argument = if delegate || !ends_here {
        Some(p.assignment_expr(ctx, terminators)?)
      } else {
        None
      };
      Ok(YieldExpr { delegate, argument })
    })?;
    Ok(node.into_wrapped())
  }

  fn import_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let start = self.checkpoint();
    self.require(TT::Kw(Kw::Import))?;
    if self.consume_if(TT::Dot).is_match() {
      self.require_word("meta")?;
      return Ok(Node::new(self.since_checkpoint(&start), ImportMeta {}).into_wrapped());
    };
    self.require(TT::LParen)?;
    let module = self.assignment_expr(ctx, &[TT::RParen])?;
    let _ = self.consume_if(TT::Comma);
    self.require(TT::RParen)?;
    Ok(Node::new(self.since_checkpoint(&start), ImportExpr { module }).into_wrapped())
  }

  fn new_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let start = self.checkpoint();
    self.require(TT::Kw(Kw::New))?;
    if self.consume_if(TT::Dot).is_match() {
      self.require_word("target")?;
      return Ok(Node::new(self.since_checkpoint(&start), NewTarget {}).into_wrapped());
    };
    // The callee is a member expression; the first argument list belongs to `new`.
    let mut callee = match self.peek().typ {
      TT::Kw(Kw::New) => self.new_expr(ctx)?,
      _ => self.expr_operand(ctx, &[])?,
    };
    loop {
      let t = self.peek();
      callee = match t.typ {
        TT::Dot => {
          self.consume();
          self.member_access(callee, false)?
        }
        TT::LBracket => {
          self.consume();
          self.computed_member_access(ctx, callee, false)?
        }
        TT::TemplateChunk | TT::TemplateEnd => {
          let first = self.consume();
          self.tagged_template(ctx, callee, first)?
        }
        _ => break,
      };
    }
    let arguments = match self.consume_if(TT::LParen).is_match() {
      true => Some(self.call_args(ctx)?),
      false => None,
    };
    Ok(Node::new(self.since_checkpoint(&start), NewExpr { callee, arguments }).into_wrapped())
  }

  fn member_access(&mut self, left: Node<Expr>, optional_chaining: bool) -> SyntaxResult<Node<Expr>> {
    let name = self.consume();
    if !is_member_name(name.typ) {
      return Err(name.error(SyntaxErrorType::ExpectedSyntax("member name")));
    };
    let loc = left.loc + name.loc;
    Ok(Node::new(loc, MemberExpr {
      optional_chaining,
      left,
      right: self.string(name.loc),
    }).into_wrapped())
  }

  fn computed_member_access(
    &mut self,
    ctx: ParseCtx,
    object: Node<Expr>,
    optional_chaining: bool,
  ) -> SyntaxResult<Node<Expr>> {
    let member = self.expr(ctx, &[TT::RBracket])?;
    let end = self.require(TT::RBracket)?;
    let loc = object.loc + end.loc;
    Ok(Node::new(loc, ComputedMemberExpr {
      optional_chaining,
      object,
      member,
    }).into_wrapped())
  }

  fn tagged_template(
    &mut self,
    ctx: ParseCtx,
    function: Node<Expr>,
    first: Token,
  ) -> SyntaxResult<Node<Expr>> {
    let (parts, template_loc) = self.template_parts(ctx, first)?;
    let loc = function.loc + template_loc;
    Ok(Node::new(loc, TaggedTemplateExpr { function, parts }).into_wrapped())
  }

  fn expr_operand(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    let t = self.peek_with_mode(LexMode::SlashIsRegex);
    if let Some(operator) = prefix_operator(t.typ) {
      if t.typ != TT::Kw(Kw::Await) || !ctx.rules.await_allowed {
        let node = self.with_loc(|p| {
          p.consume_with_mode(LexMode::SlashIsRegex);
          let argument = p.expr_with_min_prec(ctx, operator.precedence, terminators)?;
          Ok(UnaryExpr {
            operator: operator.name,
            argument,
          })
        })?;
        return Ok(node.into_wrapped());
      };
    };
    match t.typ {
      TT::Kw(Kw::Yield) if !ctx.rules.yield_allowed => self.yield_expr(ctx, terminators),
      TT::Kw(Kw::New) => self.new_expr(ctx),
      TT::Kw(Kw::Import) => self.import_expr(ctx),
      TT::Lt => Ok(self.jsx_elem(ctx)?.into_wrapped()),
      TT::LParen => self.arrow_function_or_grouping_expr(ctx, terminators),
      TT::LBracket => Ok(self.lit_arr(ctx)?.into_wrapped()),
      TT::LBrace => Ok(self.lit_obj(ctx)?.into_wrapped()),
      TT::Kw(Kw::Function) => Ok(self.func_expr(ctx)?.into_wrapped()),
      TT::Kw(Kw::Class) => Ok(self.class_expr(ctx)?.into_wrapped()),
      TT::BigInt => Ok(self.lit_bigint()?.into_wrapped()),
      TT::Kw(Kw::False) | TT::Kw(Kw::True) => Ok(self.lit_bool()?.into_wrapped()),
      TT::Kw(Kw::Null) => Ok(self.lit_null()?.into_wrapped()),
      TT::Num => Ok(self.lit_num()?.into_wrapped()),
      TT::Regex => Ok(self.lit_regex()?.into_wrapped()),
      TT::Str => Ok(self.lit_str()?.into_wrapped()),
      TT::TemplateChunk | TT::TemplateEnd => {
        Ok(self.lit_template(ctx)?.into_wrapped())
      }
      TT::Kw(Kw::Super) => {
        let t = self.consume();
        Ok(Node::new(t.loc, SuperExpr {}).into_wrapped())
      }
      TT::Kw(Kw::This) => {
        let t = self.consume();
        Ok(Node::new(t.loc, ThisExpr {}).into_wrapped())
      }
      TT::Ident if self.str(t.loc) == "async" => self.async_or_id_expr(ctx, terminators),
      typ if is_valid_pattern_identifier(typ, ctx.rules) => self.id_or_arrow_expr(ctx, terminators),
      TT::Eof => Err(t.error(SyntaxErrorType::UnexpectedEnd)),
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("expression operand"))),
    }
  }

  pub fn expr_with_min_prec(
    &mut self,
    ctx: ParseCtx,
    min_prec: u8,
    terminators: &[TT],
  ) -> SyntaxResult<Node<Expr>> {
    let mut left = self.expr_operand(ctx, terminators)?;
    loop {
      let cp = self.checkpoint();
      let t = self.consume();
      if terminators.contains(&t.typ) {
        self.restore_checkpoint(cp);
        break;
      };

      if matches!(t.typ, TT::PlusPlus | TT::MinusMinus) {
        let operator = match t.typ {
          TT::PlusPlus => OperatorName::PostfixIncrement,
          _ => OperatorName::PostfixDecrement,
        };
        // A line terminator before a postfix operator ends the statement.
        if t.preceded_by_line_terminator || OPERATORS[&operator].precedence < min_prec {
          self.restore_checkpoint(cp);
          break;
        };
        let loc = left.loc + t.loc;
        left = Node::new(loc, UnaryPostfixExpr {
          operator,
          argument: left,
        }).into_wrapped();
        continue;
      };

      let Some(operator) = infix_operator(t.typ) else {
        self.restore_checkpoint(cp);
        break;
      };
      if operator.precedence < min_prec {
        self.restore_checkpoint(cp);
        break;
      };

      left = match operator.name {
        OperatorName::Call => match t.typ {
          TT::TemplateChunk | TT::TemplateEnd => {
            self.tagged_template(ctx, left, t)?
          }
          _ => {
            let arguments = self.call_args(ctx)?;
            let loc = left.loc + self.since_checkpoint(&cp);
            Node::new(loc, CallExpr {
              optional_chaining: false,
              callee: left,
              arguments,
            }).into_wrapped()
          }
        },
        OperatorName::OptionalChainingCall => {
          let arguments = self.call_args(ctx)?;
          let loc = left.loc + self.since_checkpoint(&cp);
          Node::new(loc, CallExpr {
            optional_chaining: true,
            callee: left,
            arguments,
          }).into_wrapped()
        }
        OperatorName::MemberAccess => self.member_access(left, false)?,
        OperatorName::OptionalChainingMemberAccess => self.member_access(left, true)?,
        OperatorName::ComputedMemberAccess => self.computed_member_access(ctx, left, false)?,
        OperatorName::OptionalChainingComputedMemberAccess => {
          self.computed_member_access(ctx, left, true)?
        }
        OperatorName::Conditional => {
          let consequent = self.assignment_expr(ctx, &[TT::Colon])?;
          self.require(TT::Colon)?;
          let alternate = self.assignment_expr(ctx, terminators)?;
          let loc = left.loc + alternate.loc;
          Node::new(loc, CondExpr {
            test: left,
            consequent,
            alternate,
          }).into_wrapped()
        }
        name => {
          let left = if name.is_assignment() {
            lhs_expr_to_assign_target(left, name)?
          } else {
            left
          };
          let right_min_prec = match operator.associativity {
            Associativity::Left => operator.precedence + 1,
            Associativity::Right => operator.precedence,
          };
          let right = self.expr_with_min_prec(ctx, right_min_prec, terminators)?;
          let loc = left.loc + right.loc;
          Node::new(loc, BinaryExpr {
            operator: name,
            left,
            right,
          }).into_wrapped()
        }
      };
    }
    Ok(left)
  }
}
