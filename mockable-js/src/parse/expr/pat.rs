use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::pat::ArrPat;
use crate::ast::expr::pat::ArrPatElem;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::pat::ObjPat;
use crate::ast::expr::pat::ObjPatProp;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::decl::PatDecl;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::operator::OperatorName;
use crate::parse::ParseCtx;
use crate::parse::ParsePatternRules;
use crate::parse::Parser;
use crate::token::Kw;
use crate::token::TT;

pub fn is_valid_pattern_identifier(typ: TT, rules: ParsePatternRules) -> bool {
  match typ {
    TT::Ident | TT::Kw(Kw::Let) => true,
    TT::Kw(Kw::Await) => rules.await_allowed,
    TT::Kw(Kw::Yield) => rules.yield_allowed,
    _ => false,
  }
}

/// Splits `target = default` produced by the cover grammar into its parts.
fn split_default(node: Node<Expr>) -> SyntaxResult<(Node<Pat>, Option<Node<Expr>>)> {
  match *node.stx {
    Expr::Binary(bin) if bin.stx.operator == OperatorName::Assignment => {
      let bin = *bin.stx;
      Ok((lit_to_pat(bin.left)?, Some(bin.right)))
    }
    stx => Ok((lit_to_pat(Node::new(node.loc, stx))?, None)),
  }
}

/// Converts an array or object literal (or an identifier inside one) parsed as an expression into
/// the assignment pattern it actually is, e.g. the left of `[a, {b}] = value`.
pub fn lit_to_pat(node: Node<Expr>) -> SyntaxResult<Node<Pat>> {
  let loc = node.loc;
  match *node.stx {
    Expr::Id(id) => Ok(Node::new(loc, IdPat { name: id.stx.name }).into_wrapped()),
    Expr::IdPat(pat) => Ok(pat.into_wrapped()),
    Expr::ArrPat(pat) => Ok(pat.into_wrapped()),
    Expr::ObjPat(pat) => Ok(pat.into_wrapped()),
    Expr::LitArr(arr) => {
      let mut elements = Vec::new();
      let mut rest = None;
      for elem in arr.stx.elements {
        if rest.is_some() {
          return Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
        };
        match elem {
          LitArrElem::Empty => elements.push(None),
          LitArrElem::Single(value) => {
            let (target, default_value) = split_default(value)?;
            elements.push(Some(ArrPatElem {
              target,
              default_value,
            }));
          }
          LitArrElem::Rest(value) => rest = Some(lit_to_pat(value)?),
        };
      }
      Ok(Node::new(loc, ArrPat { elements, rest }).into_wrapped())
    }
    Expr::LitObj(obj) => {
      let mut properties = Vec::new();
      let mut rest = None;
      for member in obj.stx.members {
        if rest.is_some() {
          return Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
        };
        let member_loc = member.loc;
        match member.stx.typ {
          ObjMemberType::Valued {
            key,
            val: ClassOrObjVal::Prop(Some(value)),
          } => {
            let (target, default_value) = split_default(value)?;
            properties.push(Node::new(member_loc, ObjPatProp {
              key,
              target,
              shorthand: false,
              default_value,
            }));
          }
          ObjMemberType::Shorthand { id } => {
            let name = id.stx.name;
            properties.push(Node::new(member_loc, ObjPatProp {
              key: ClassOrObjKey::Direct(Node::new(id.loc, ClassOrObjMemberDirectKey {
                key: name.clone(),
                tt: TT::Ident,
              })),
              target: Node::new(id.loc, IdPat { name }).into_wrapped(),
              shorthand: true,
              default_value: None,
            }));
          }
          ObjMemberType::Rest { val } => match *val.stx {
            Expr::Id(id) => rest = Some(Node::new(val.loc, IdPat { name: id.stx.name })),
            _ => return Err(val.loc.error(SyntaxErrorType::InvalidAssigmentTarget, None)),
          },
          _ => return Err(member_loc.error(SyntaxErrorType::InvalidAssigmentTarget, None)),
        };
      }
      Ok(Node::new(loc, ObjPat { properties, rest }).into_wrapped())
    }
    _ => Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None)),
  }
}

impl<'a> Parser<'a> {
  pub fn id_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<IdPat>> {
    let t = self.consume();
    if !is_valid_pattern_identifier(t.typ, ctx.rules) {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("identifier")));
    };
    Ok(Node::new(t.loc, IdPat {
      name: self.string(t.loc),
    }))
  }

  fn pat_default(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Option<Node<Expr>>> {
    self
      .consume_if(TT::Assign)
      .and_then(|| self.assignment_expr(ctx, terminators))
  }

  fn arr_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ArrPat>> {
    self.with_loc(|p| {
      p.require(TT::LBracket)?;
      let mut elements = Vec::new();
      let mut rest = None;
      loop {
        if p.consume_if(TT::RBracket).is_match() {
          break;
        };
        if p.consume_if(TT::Comma).is_match() {
          elements.push(None);
          continue;
        };
        if p.consume_if(TT::Ellipsis).is_match() {
          rest = Some(p.pat(ctx)?);
          p.require(TT::RBracket)?;
          break;
        };
        let target = p.pat(ctx)?;
        let default_value = p.pat_default(ctx, &[TT::Comma, TT::RBracket])?;
        elements.push(Some(ArrPatElem {
          target,
          default_value,
        }));
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::RBracket)?;
          break;
        };
      }
      Ok(ArrPat { elements, rest })
    })
  }

  fn obj_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ObjPat>> {
    self.with_loc(|p| {
      p.require(TT::LBrace)?;
      let mut properties = Vec::new();
      let mut rest = None;
      loop {
        if p.consume_if(TT::RBrace).is_match() {
          break;
        };
        if p.consume_if(TT::Ellipsis).is_match() {
          rest = Some(p.id_pat(ctx)?);
          p.require(TT::RBrace)?;
          break;
        };
        let prop = p.with_loc(|p| {
          let key_token = p.peek();
          let key = p.class_or_obj_key(ctx, false)?;
          let (target, shorthand) = if p.consume_if(TT::Colon).is_match() {
            (p.pat(ctx)?, false)
          } else {
            let ClassOrObjKey::Direct(direct) = &key else {
              return Err(key_token.error(SyntaxErrorType::RequiredTokenNotFound(TT::Colon)));
            };
            if !is_valid_pattern_identifier(direct.stx.tt, ctx.rules) {
              return Err(key_token.error(SyntaxErrorType::RequiredTokenNotFound(TT::Colon)));
            };
            let target = Node::new(direct.loc, IdPat {
              name: direct.stx.key.clone(),
            });
            (target.into_wrapped(), true)
          };
          let default_value = p.pat_default(ctx, &[TT::Comma, TT::RBrace])?;
          Ok(ObjPatProp {
            key,
            target,
            shorthand,
            default_value,
          })
        })?;
        properties.push(prop);
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::RBrace)?;
          break;
        };
      }
      Ok(ObjPat { properties, rest })
    })
  }

  pub fn pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Pat>> {
    match self.peek().typ {
      TT::LBracket => Ok(self.arr_pat(ctx)?.into_wrapped()),
      TT::LBrace => Ok(self.obj_pat(ctx)?.into_wrapped()),
      _ => Ok(self.id_pat(ctx)?.into_wrapped()),
    }
  }

  pub fn pat_decl(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<PatDecl>> {
    let pat = self.pat(ctx)?;
    Ok(Node::new(pat.loc, PatDecl { pat }))
  }
}
