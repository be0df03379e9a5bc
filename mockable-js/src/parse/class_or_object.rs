use super::ParseCtx;
use super::ParsePatternRules;
use super::Parser;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassOrObjGetter;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ClassOrObjMethod;
use crate::ast::class_or_object::ClassOrObjSetter;
use crate::ast::class_or_object::ClassStaticBlock;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::ClassExpr;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::token::Kw;
use crate::token::TT;

fn is_key_start(typ: TT, allow_private: bool) -> bool {
  match typ {
    TT::Ident | TT::Str | TT::Num | TT::BigInt | TT::LBracket | TT::Kw(_) => true,
    TT::PrivateName => allow_private,
    _ => false,
  }
}

pub struct ClassBody {
  pub extends: Option<Node<Expr>>,
  pub members: Vec<Node<ClassMember>>,
}

impl<'a> Parser<'a> {
  pub fn class_or_obj_key(&mut self, ctx: ParseCtx, allow_private: bool) -> SyntaxResult<ClassOrObjKey> {
    let t = self.peek();
    if t.typ == TT::LBracket {
      self.consume();
      let key = self.assignment_expr(ctx, &[TT::RBracket])?;
      self.require(TT::RBracket)?;
      return Ok(ClassOrObjKey::Computed(key));
    };
    if !is_key_start(t.typ, allow_private) {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("property key")));
    };
    let key = match t.typ {
      TT::Str => self.lit_str_val()?.1,
      _ => {
        self.consume();
        self.string(t.loc)
      }
    };
    Ok(ClassOrObjKey::Direct(Node::new(t.loc, ClassOrObjMemberDirectKey {
      key,
      tt: t.typ,
    })))
  }

  /// Parses a method, getter, or setter including its key, or returns None without consuming
  /// anything if the member isn't one.
  pub fn class_or_obj_method(
    &mut self,
    ctx: ParseCtx,
    allow_private: bool,
  ) -> SyntaxResult<Option<(ClassOrObjKey, ClassOrObjVal)>> {
    let [a, b] = self.peek_n::<2>();
    let word = match a.typ {
      TT::Ident => self.str(a.loc).to_string(),
      _ => String::new(),
    };
    let start = self.checkpoint();

    if (word == "get" || word == "set") && is_key_start(b.typ, allow_private) {
      self.consume();
      let key = self.class_or_obj_key(ctx, allow_private)?;
      let func = self.func_after_name(ctx, false, false)?;
      let loc = self.since_checkpoint(&start);
      let val = match word.as_str() {
        "get" => ClassOrObjVal::Getter(Node::new(loc, ClassOrObjGetter { func })),
        _ => ClassOrObjVal::Setter(Node::new(loc, ClassOrObjSetter { func })),
      };
      return Ok(Some((key, val)));
    };

    let is_async = word == "async"
      && !b.preceded_by_line_terminator
      && (b.typ == TT::Star || is_key_start(b.typ, allow_private));
    if is_async || a.typ == TT::Star {
      if is_async {
        self.consume();
      };
      let generator = self.consume_if(TT::Star).is_match();
      let key = self.class_or_obj_key(ctx, allow_private)?;
      let func = self.func_after_name(ctx, is_async, generator)?;
      let loc = self.since_checkpoint(&start);
      return Ok(Some((key, ClassOrObjVal::Method(Node::new(loc, ClassOrObjMethod { func })))));
    };

    if !is_key_start(a.typ, allow_private) {
      return Ok(None);
    };
    let key = self.class_or_obj_key(ctx, allow_private)?;
    if self.peek().typ != TT::LParen {
      self.restore_checkpoint(start);
      return Ok(None);
    };
    let func = self.func_after_name(ctx, false, false)?;
    let loc = self.since_checkpoint(&start);
    Ok(Some((key, ClassOrObjVal::Method(Node::new(loc, ClassOrObjMethod { func })))))
  }

  fn class_member(&mut self, ctx: ParseCtx) -> SyntaxResult<ClassMember> {
    let [a, b] = self.peek_n::<2>();
    if a.typ == TT::Ident && self.str(a.loc) == "static" && b.typ == TT::LBrace {
      self.consume();
      let key = ClassOrObjKey::Direct(Node::new(a.loc, ClassOrObjMemberDirectKey {
        key: self.string(a.loc),
        tt: a.typ,
      }));
      // The block's statements run like the body of a plain function.
      let block_ctx = ctx.with_rules(ParsePatternRules {
        await_allowed: true,
        yield_allowed: true,
      });
      let block = self.with_loc(|p| {
        let body = p.func_block_body(block_ctx)?;
        Ok(ClassStaticBlock { body })
      })?;
      return Ok(ClassMember {
        key,
        static_: true,
        val: ClassOrObjVal::StaticBlock(block),
      });
    };
    let static_ = a.typ == TT::Ident
      && self.str(a.loc) == "static"
      && !matches!(
        b.typ,
        TT::LParen | TT::Assign | TT::Semicolon | TT::RBrace
      );
    if static_ {
      self.consume();
    };
    if let Some((key, val)) = self.class_or_obj_method(ctx, true)? {
      return Ok(ClassMember { key, static_, val });
    };
    let key = self.class_or_obj_key(ctx, true)?;
    let value = self
      .consume_if(TT::Assign)
      .and_then(|| self.assignment_expr(ctx, &[TT::Semicolon, TT::RBrace]))?;
    self.require_semicolon()?;
    Ok(ClassMember {
      key,
      static_,
      val: ClassOrObjVal::Prop(value),
    })
  }

  /// Parses everything after the class name: the optional `extends` clause and the body.
  pub fn class_body(&mut self, ctx: ParseCtx) -> SyntaxResult<ClassBody> {
    let extends = match self.consume_if(TT::Kw(Kw::Extends)).is_match() {
      true => {
        // A left-hand-side expression; anything looser must be parenthesised.
        let min_prec = OPERATORS[&OperatorName::New].precedence;
        Some(self.expr_with_min_prec(ctx, min_prec, &[TT::LBrace])?)
      }
      false => None,
    };
    self.require(TT::LBrace)?;
    let mut members = Vec::new();
    loop {
      if self.consume_if(TT::Semicolon).is_match() {
        continue;
      };
      if self.consume_if(TT::RBrace).is_match() {
        break;
      };
      members.push(self.with_loc(|p| p.class_member(ctx))?);
    }
    Ok(ClassBody { extends, members })
  }

  /// Parses `class [name] [extends expr] {...}`.
  pub fn class_signature_and_body(
    &mut self,
    ctx: ParseCtx,
  ) -> SyntaxResult<(Option<Node<ClassOrFuncName>>, ClassBody)> {
    self.require(TT::Kw(Kw::Class))?;
    let name = self.class_or_func_name(ctx)?;
    let body = self.class_body(ctx)?;
    Ok((name, body))
  }

  pub fn class_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ClassExpr>> {
    self.with_loc(|p| {
      let (name, ClassBody { extends, members }) = p.class_signature_and_body(ctx)?;
      Ok(ClassExpr {
        name,
        extends,
        members,
      })
    })
  }
}
