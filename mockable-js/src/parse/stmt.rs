use super::expr::pat::is_valid_pattern_identifier;
use super::expr::pat::lit_to_pat;
use super::ParseCtx;
use super::Parser;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ClassDecl;
use crate::ast::stmt::decl::FuncDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::decl::VarDeclarator;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::BreakStmt;
use crate::ast::stmt::CatchBlock;
use crate::ast::stmt::ContinueStmt;
use crate::ast::stmt::DebuggerStmt;
use crate::ast::stmt::DoWhileStmt;
use crate::ast::stmt::EmptyStmt;
use crate::ast::stmt::ExprStmt;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForInStmt;
use crate::ast::stmt::ForOfStmt;
use crate::ast::stmt::ForTripleStmt;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::IfStmt;
use crate::ast::stmt::LabelStmt;
use crate::ast::stmt::ReturnStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::SwitchBranch;
use crate::ast::stmt::SwitchStmt;
use crate::ast::stmt::ThrowStmt;
use crate::ast::stmt::TryStmt;
use crate::ast::stmt::WhileStmt;
use crate::ast::stmt::WithStmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::Kw;
use crate::token::TT;

/// Whether the token after `let` makes it a declaration rather than a variable named `let`.
fn let_starts_decl(next: TT) -> bool {
  matches!(
    next,
    TT::Ident
      | TT::LBracket
      | TT::LBrace
      | TT::Kw(Kw::Let)
      | TT::Kw(Kw::Yield)
      | TT::Kw(Kw::Await)
  )
}

impl<'a> Parser<'a> {
  /// Parses statements until `end`, which isn't consumed.
  pub fn stmts(&mut self, ctx: ParseCtx, end: TT) -> SyntaxResult<Vec<Node<Stmt>>> {
    let mut body = Vec::new();
    while self.peek().typ != end {
      if self.peek().typ == TT::Eof {
        return Err(self.peek().error(SyntaxErrorType::UnexpectedEnd));
      };
      body.push(self.stmt(ctx)?);
    }
    Ok(body)
  }

  pub fn block_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<BlockStmt>> {
    self.with_loc(|p| {
      p.require(TT::LBrace)?;
      let body = p.stmts(ctx, TT::RBrace)?;
      p.require(TT::RBrace)?;
      Ok(BlockStmt { body })
    })
  }

  fn var_decl_mode(&mut self) -> SyntaxResult<VarDeclMode> {
    let t = self.consume();
    Ok(match t.typ {
      TT::Kw(Kw::Var) => VarDeclMode::Var,
      TT::Kw(Kw::Let) => VarDeclMode::Let,
      TT::Kw(Kw::Const) => VarDeclMode::Const,
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("variable declaration"))),
    })
  }

  /// Parses `var`/`let`/`const` and its declarators, without the trailing semicolon.
  /// Initializers stop at `terminators`, e.g. `in` inside a `for` head.
  pub fn var_decl(
    &mut self,
    ctx: ParseCtx,
    export: bool,
    terminators: &[TT],
  ) -> SyntaxResult<Node<VarDecl>> {
    self.with_loc(|p| {
      let mode = p.var_decl_mode()?;
      let mut declarators = Vec::new();
      loop {
        let pattern = p.pat_decl(ctx)?;
        let mut initializer_terminators = vec![TT::Comma];
        initializer_terminators.extend_from_slice(terminators);
        let initializer = p
          .consume_if(TT::Assign)
          .and_then(|| p.assignment_expr(ctx, &initializer_terminators))?;
        declarators.push(VarDeclarator {
          pattern,
          initializer,
        });
        if !p.consume_if(TT::Comma).is_match() {
          break;
        };
      }
      Ok(VarDecl {
        export,
        mode,
        declarators,
      })
    })
  }

  pub fn func_decl(
    &mut self,
    ctx: ParseCtx,
    export: bool,
    export_default: bool,
  ) -> SyntaxResult<Node<FuncDecl>> {
    self.with_loc(|p| {
      let (name, function) = p.func_signature_and_body(ctx)?;
      if name.is_none() && !export_default {
        return Err(p.peek().error(SyntaxErrorType::ExpectedSyntax("function name")));
      };
      Ok(FuncDecl {
        export,
        export_default,
        name,
        function,
      })
    })
  }

  pub fn class_decl(
    &mut self,
    ctx: ParseCtx,
    export: bool,
    export_default: bool,
  ) -> SyntaxResult<Node<ClassDecl>> {
    self.with_loc(|p| {
      let (name, body) = p.class_signature_and_body(ctx)?;
      if name.is_none() && !export_default {
        return Err(p.peek().error(SyntaxErrorType::ExpectedSyntax("class name")));
      };
      Ok(ClassDecl {
        export,
        export_default,
        name,
        extends: body.extends,
        members: body.members,
      })
    })
  }

  fn paren_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    self.require(TT::LParen)?;
    let expr = self.expr(ctx, &[TT::RParen])?;
    self.require(TT::RParen)?;
    Ok(expr)
  }

  fn for_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.checkpoint();
    self.require(TT::Kw(Kw::For))?;
    let await_ = self.consume_if(TT::Kw(Kw::Await)).is_match();
    self.require(TT::LParen)?;

    let [first, second] = self.peek_n::<2>();
    let is_decl = match first.typ {
      TT::Kw(Kw::Var) | TT::Kw(Kw::Const) => true,
      TT::Kw(Kw::Let) => let_starts_decl(second.typ),
      _ => false,
    };
    let init = if is_decl {
      ForTripleStmtInit::Decl(self.var_decl(ctx, false, &[TT::Kw(Kw::In), TT::Semicolon])?)
    } else if first.typ == TT::Semicolon {
      ForTripleStmtInit::None
    } else {
      ForTripleStmtInit::Expr(self.expr(ctx, &[TT::Kw(Kw::In), TT::Semicolon])?)
    };

    let is_in = self.peek().typ == TT::Kw(Kw::In);
    if is_in || self.peek_is_word("of") {
      self.consume();
      let lhs = match init {
        ForTripleStmtInit::Decl(decl) => {
          let decl_loc = decl.loc;
          let decl = *decl.stx;
          let mode = decl.mode;
          let mut declarators = decl.declarators;
          if declarators.len() != 1 || declarators[0].initializer.is_some() {
            return Err(decl_loc.error(SyntaxErrorType::ExpectedSyntax("single binding"), None));
          };
          let declarator = declarators.remove(0);
          ForInOfLhs::Decl {
            mode,
            pattern: declarator.pattern,
          }
        }
        ForTripleStmtInit::Expr(expr) => ForInOfLhs::Assign(lit_to_pat(expr)?),
        ForTripleStmtInit::None => {
          return Err(first.error(SyntaxErrorType::ExpectedSyntax("for-in/of binding")));
        }
      };
      let rhs = match is_in {
        true => self.expr(ctx, &[TT::RParen])?,
        false => self.assignment_expr(ctx, &[TT::RParen])?,
      };
      self.require(TT::RParen)?;
      let body = self.stmt(ctx)?;
      let loc = self.since_checkpoint(&start);
      return Ok(match is_in {
        true => Node::new(loc, ForInStmt { lhs, rhs, body }).into_wrapped(),
        false => Node::new(loc, ForOfStmt {
          await_,
          lhs,
          rhs,
          body,
        })
        .into_wrapped(),
      });
    };

    self.require(TT::Semicolon)?;
    let cond = match self.peek().typ {
      TT::Semicolon => None,
      _ => Some(self.expr(ctx, &[TT::Semicolon])?),
    };
    self.require(TT::Semicolon)?;
    let post = match self.peek().typ {
      TT::RParen => None,
      _ => Some(self.expr(ctx, &[TT::RParen])?),
    };
    self.require(TT::RParen)?;
    let body = self.stmt(ctx)?;
    let loc = self.since_checkpoint(&start);
    Ok(Node::new(loc, ForTripleStmt {
      init,
      cond,
      post,
      body,
    }).into_wrapped())
  }

  fn peek_is_word(&mut self, word: &str) -> bool {
    let t = self.peek();
    t.typ == TT::Ident && self.str(t.loc) == word
  }

  /// The label of `break` or `continue`, which must be on the same line.
  fn jump_label(&mut self) -> Option<String> {
    let t = self.peek();
    if t.typ == TT::Ident && !t.preceded_by_line_terminator {
      self.consume();
      Some(self.string(t.loc))
    } else {
      None
    }
  }

  fn try_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<TryStmt>> {
    self.with_loc(|p| {
      let start = p.require(TT::Kw(Kw::Try))?;
      let wrapped = p.block_stmt(ctx)?;
      let catch = match p.consume_if(TT::Kw(Kw::Catch)).is_match() {
        true => Some(p.with_loc(|p| {
          let parameter = match p.consume_if(TT::LParen).is_match() {
            true => {
              let parameter = p.pat_decl(ctx)?;
              p.require(TT::RParen)?;
              Some(parameter)
            }
            false => None,
          };
          let block = p.block_stmt(ctx)?;
          let body = block.stx.body;
          Ok(CatchBlock { parameter, body })
        })?),
        false => None,
      };
      let finally = match p.consume_if(TT::Kw(Kw::Finally)).is_match() {
        true => Some(p.block_stmt(ctx)?),
        false => None,
      };
      if catch.is_none() && finally.is_none() {
        return Err(start.error(SyntaxErrorType::TryStatementHasNoCatchOrFinally));
      };
      Ok(TryStmt {
        wrapped,
        catch,
        finally,
      })
    })
  }

  fn switch_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<SwitchStmt>> {
    self.with_loc(|p| {
      p.require(TT::Kw(Kw::Switch))?;
      let test = p.paren_expr(ctx)?;
      p.require(TT::LBrace)?;
      let mut branches = Vec::new();
      while !p.consume_if(TT::RBrace).is_match() {
        branches.push(p.with_loc(|p| {
          let case = match p.consume_if(TT::Kw(Kw::Default)).is_match() {
            true => None,
            false => {
              p.require(TT::Kw(Kw::Case))?;
              Some(p.expr(ctx, &[TT::Colon])?)
            }
          };
          p.require(TT::Colon)?;
          let mut body = Vec::new();
          loop {
            let t = p.peek();
            match t.typ {
              TT::Kw(Kw::Case) | TT::Kw(Kw::Default) | TT::RBrace => break,
              TT::Eof => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
              _ => body.push(p.stmt(ctx)?),
            };
          }
          Ok(SwitchBranch { case, body })
        })?);
      }
      Ok(SwitchStmt { test, branches })
    })
  }

  fn expr_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      let expr = p.expr(ctx, &[])?;
      p.require_semicolon()?;
      Ok(ExprStmt { expr })
    })?;
    Ok(node.into_wrapped())
  }

  pub fn stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let [t, next] = self.peek_n::<2>();
    match t.typ {
      TT::LBrace => Ok(self.block_stmt(ctx)?.into_wrapped()),
      TT::Kw(Kw::Var) | TT::Kw(Kw::Const) => {
        let decl = self.var_decl(ctx, false, &[])?;
        self.require_semicolon()?;
        Ok(decl.into_wrapped())
      }
      TT::Kw(Kw::Let) if let_starts_decl(next.typ) => {
        let decl = self.var_decl(ctx, false, &[])?;
        self.require_semicolon()?;
        Ok(decl.into_wrapped())
      }
      TT::Kw(Kw::Function) => Ok(self.func_decl(ctx, false, false)?.into_wrapped()),
      TT::Ident
        if self.str(t.loc) == "async"
          && next.typ == TT::Kw(Kw::Function)
          && !next.preceded_by_line_terminator =>
      {
        Ok(self.func_decl(ctx, false, false)?.into_wrapped())
      }
      TT::Kw(Kw::Class) => Ok(self.class_decl(ctx, false, false)?.into_wrapped()),
      TT::Kw(Kw::Import) if !matches!(next.typ, TT::LParen | TT::Dot) => {
        Ok(self.import_stmt(ctx)?.into_wrapped())
      }
      TT::Kw(Kw::Export) => self.export_stmt(ctx),
      TT::Kw(Kw::For) => self.for_stmt(ctx),
      TT::Kw(Kw::If) => {
        let node = self.with_loc(|p| {
          p.require(TT::Kw(Kw::If))?;
          let test = p.paren_expr(ctx)?;
          let consequent = p.stmt(ctx)?;
          let alternate = p
            .consume_if(TT::Kw(Kw::Else))
            .and_then(|| p.stmt(ctx))?;
          Ok(IfStmt {
            test,
            consequent,
            alternate,
          })
        })?;
        Ok(node.into_wrapped())
      }
      TT::Kw(Kw::While) => {
        let node = self.with_loc(|p| {
          p.require(TT::Kw(Kw::While))?;
          let condition = p.paren_expr(ctx)?;
          let body = p.stmt(ctx)?;
          Ok(WhileStmt { condition, body })
        })?;
        Ok(node.into_wrapped())
      }
      TT::Kw(Kw::Do) => {
        let node = self.with_loc(|p| {
          p.require(TT::Kw(Kw::Do))?;
          let body = p.stmt(ctx)?;
          p.require(TT::Kw(Kw::While))?;
          let condition = p.paren_expr(ctx)?;
          // The semicolon after `do-while` can always be omitted.
          let _ = p.consume_if(TT::Semicolon);
          Ok(DoWhileStmt { condition, body })
        })?;
        Ok(node.into_wrapped())
      }
      TT::Kw(Kw::Return) => {
        let node = self.with_loc(|p| {
          p.require(TT::Kw(Kw::Return))?;
          let t = p.peek();
          let value = match t.typ {
            TT::Semicolon | TT::RBrace | TT::Eof => None,
            _ if t.preceded_by_line_terminator => None,
            _ => Some(p.expr(ctx, &[])?),
          };
          p.require_semicolon()?;
          Ok(ReturnStmt { value })
        })?;
        Ok(node.into_wrapped())
      }
      TT::Kw(Kw::Break) => {
        let node = self.with_loc(|p| {
          p.require(TT::Kw(Kw::Break))?;
          let label = p.jump_label();
          p.require_semicolon()?;
          Ok(BreakStmt { label })
        })?;
        Ok(node.into_wrapped())
      }
      TT::Kw(Kw::Continue) => {
        let node = self.with_loc(|p| {
          p.require(TT::Kw(Kw::Continue))?;
          let label = p.jump_label();
          p.require_semicolon()?;
          Ok(ContinueStmt { label })
        })?;
        Ok(node.into_wrapped())
      }
      TT::Kw(Kw::Throw) => {
        let node = self.with_loc(|p| {
          p.require(TT::Kw(Kw::Throw))?;
          let t = p.peek();
          if t.preceded_by_line_terminator {
            return Err(t.error(SyntaxErrorType::LineTerminatorAfterThrow));
          };
          let value = p.expr(ctx, &[])?;
          p.require_semicolon()?;
          Ok(ThrowStmt { value })
        })?;
        Ok(node.into_wrapped())
      }
      TT::Kw(Kw::Try) => Ok(self.try_stmt(ctx)?.into_wrapped()),
      TT::Kw(Kw::Switch) => Ok(self.switch_stmt(ctx)?.into_wrapped()),
      TT::Kw(Kw::With) => {
        let node = self.with_loc(|p| {
          p.require(TT::Kw(Kw::With))?;
          let object = p.paren_expr(ctx)?;
          let body = p.stmt(ctx)?;
          Ok(WithStmt { object, body })
        })?;
        Ok(node.into_wrapped())
      }
      TT::Kw(Kw::Debugger) => {
        let node = self.with_loc(|p| {
          p.require(TT::Kw(Kw::Debugger))?;
          p.require_semicolon()?;
          Ok(DebuggerStmt {})
        })?;
        Ok(node.into_wrapped())
      }
      TT::Semicolon => {
        let t = self.consume();
        Ok(Node::new(t.loc, EmptyStmt {}).into_wrapped())
      }
      typ if is_valid_pattern_identifier(typ, ctx.rules) && next.typ == TT::Colon => {
        let node = self.with_loc(|p| {
          let name = p.consume();
          p.require(TT::Colon)?;
          let statement = p.stmt(ctx)?;
          Ok(LabelStmt {
            name: p.string(name.loc),
            statement,
          })
        })?;
        Ok(node.into_wrapped())
      }
      _ => self.expr_stmt(ctx),
    }
  }
}
