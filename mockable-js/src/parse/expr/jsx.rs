use crate::ast::expr::jsx::JsxAttr;
use crate::ast::expr::jsx::JsxAttrVal;
use crate::ast::expr::jsx::JsxElem;
use crate::ast::expr::jsx::JsxElemChild;
use crate::ast::expr::jsx::JsxElemName;
use crate::ast::expr::jsx::JsxExprContainer;
use crate::ast::expr::jsx::JsxMemberExpr;
use crate::ast::expr::jsx::JsxName;
use crate::ast::expr::jsx::JsxSpreadAttr;
use crate::ast::expr::jsx::JsxText;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::parse::ParseCtx;
use crate::parse::Parser;
use crate::token::TT;

impl<'a> Parser<'a> {
  fn jsx_name_part(&mut self) -> SyntaxResult<(Loc, String)> {
    let t = self.require_with_mode(TT::Ident, LexMode::JsxTag)?;
    Ok((t.loc, self.string(t.loc)))
  }

  /// Parses an attribute name, or a namespaced name like `xlink:href`.
  fn jsx_name(&mut self) -> SyntaxResult<Node<JsxName>> {
    self.with_loc(|p| {
      let (_, first) = p.jsx_name_part()?;
      if p.maybe_consume_with_mode(TT::Colon, LexMode::JsxTag).is_match() {
        let (_, name) = p.jsx_name_part()?;
        return Ok(JsxName {
          namespace: Some(first),
          name,
        });
      };
      Ok(JsxName {
        namespace: None,
        name: first,
      })
    })
  }

  fn jsx_elem_name(&mut self) -> SyntaxResult<Option<JsxElemName>> {
    if self.peek_with_mode(LexMode::JsxTag).typ == TT::Gt {
      return Ok(None);
    };
    let start = self.checkpoint();
    let (base_loc, base) = self.jsx_name_part()?;
    if self.maybe_consume_with_mode(TT::Colon, LexMode::JsxTag).is_match() {
      let (_, name) = self.jsx_name_part()?;
      let loc = self.since_checkpoint(&start);
      return Ok(Some(JsxElemName::Name(Node::new(loc, JsxName {
        namespace: Some(base),
        name,
      }))));
    };
    let mut path = Vec::new();
    while self.maybe_consume_with_mode(TT::Dot, LexMode::JsxTag).is_match() {
      path.push(self.jsx_name_part()?.1);
    }
    let loc = self.since_checkpoint(&start);
    if !path.is_empty() {
      return Ok(Some(JsxElemName::Member(Node::new(loc, JsxMemberExpr {
        base: Node::new(base_loc, IdExpr { name: base }),
        path,
      }))));
    };
    // Lowercase names are intrinsic elements and don't refer to variables.
    if base.starts_with(|c: char| c.is_ascii_lowercase()) || base.contains('-') {
      return Ok(Some(JsxElemName::Name(Node::new(loc, JsxName {
        namespace: None,
        name: base,
      }))));
    };
    Ok(Some(JsxElemName::Id(Node::new(loc, IdExpr { name: base }))))
  }

  fn jsx_expr_container(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<JsxExprContainer>> {
    self.with_loc(|p| {
      p.require(TT::LBrace)?;
      if p.consume_if(TT::RBrace).is_match() {
        return Ok(JsxExprContainer { value: None });
      };
      let value = p.expr(ctx, &[TT::RBrace])?;
      p.require(TT::RBrace)?;
      Ok(JsxExprContainer { value: Some(value) })
    })
  }

  fn jsx_attr(&mut self, ctx: ParseCtx) -> SyntaxResult<JsxAttr> {
    if self.peek_with_mode(LexMode::JsxTag).typ == TT::LBrace {
      let value = self.with_loc(|p| {
        p.require(TT::LBrace)?;
        p.require(TT::Ellipsis)?;
        let value = p.assignment_expr(ctx, &[TT::RBrace])?;
        p.require(TT::RBrace)?;
        Ok(JsxSpreadAttr { value })
      })?;
      return Ok(JsxAttr::Spread { value });
    };
    let name = self.jsx_name()?;
    if !self
      .maybe_consume_with_mode(TT::Assign, LexMode::JsxTag)
      .is_match()
    {
      return Ok(JsxAttr::Named { name, value: None });
    };
    let t = self.peek_with_mode(LexMode::JsxTag);
    let value = match t.typ {
      TT::Str => {
        self.consume_with_mode(LexMode::JsxTag);
        // Attribute strings have no escapes; keep the source including quotes.
        JsxAttrVal::Text(Node::new(t.loc, JsxText {
          value: self.string(t.loc),
        }))
      }
      TT::LBrace => JsxAttrVal::Expression(self.jsx_expr_container(ctx)?),
      TT::Lt => JsxAttrVal::Element(self.jsx_elem(ctx)?),
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("JSX attribute value"))),
    };
    Ok(JsxAttr::Named {
      name,
      value: Some(value),
    })
  }

  pub fn jsx_elem(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<JsxElem>> {
    self.with_loc(|p| {
      p.require(TT::Lt)?;
      let name = p.jsx_elem_name()?;
      let mut attributes = Vec::new();
      if name.is_some() {
        loop {
          let t = p.peek_with_mode(LexMode::JsxTag);
          match t.typ {
            TT::Gt | TT::Slash => break,
            TT::Eof => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
            _ => attributes.push(p.jsx_attr(ctx)?),
          };
        }
      };
      if p.maybe_consume_with_mode(TT::Slash, LexMode::JsxTag).is_match() {
        p.require_with_mode(TT::Gt, LexMode::JsxTag)?;
        return Ok(JsxElem {
          name,
          attributes,
          children: Vec::new(),
        });
      };
      p.require_with_mode(TT::Gt, LexMode::JsxTag)?;

      let mut children = Vec::new();
      let end = loop {
        let t = p.peek_with_mode(LexMode::JsxText);
        match t.typ {
          TT::JsxText => {
            p.consume_with_mode(LexMode::JsxText);
            children.push(JsxElemChild::Text(Node::new(t.loc, JsxText {
              value: p.string(t.loc),
            })));
          }
          TT::JsxCloseStart => break p.consume_with_mode(LexMode::JsxText),
          TT::LBrace => children.push(JsxElemChild::Expr(p.jsx_expr_container(ctx)?)),
          TT::Lt => children.push(JsxElemChild::Element(p.jsx_elem(ctx)?)),
          TT::Eof => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
          _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("JSX child"))),
        };
      };

      let end_name = p.jsx_elem_name()?;
      if end_name != name {
        return Err(end.error(SyntaxErrorType::JsxClosingTagMismatch));
      };
      p.require_with_mode(TT::Gt, LexMode::JsxTag)?;
      Ok(JsxElem {
        name,
        attributes,
        children,
      })
    })
  }
}
