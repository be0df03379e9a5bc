use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMember;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitArrExpr;
use crate::ast::expr::lit::LitBigIntExpr;
use crate::ast::expr::lit::LitBoolExpr;
use crate::ast::expr::lit::LitNullExpr;
use crate::ast::expr::lit::LitNumExpr;
use crate::ast::expr::lit::LitObjExpr;
use crate::ast::expr::lit::LitRegexExpr;
use crate::ast::expr::lit::LitStrExpr;
use crate::ast::expr::lit::LitTemplateExpr;
use crate::ast::expr::lit::LitTemplatePart;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::char::is_line_terminator;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::parse::expr::pat::is_valid_pattern_identifier;
use crate::parse::ParseCtx;
use crate::parse::Parser;
use crate::token::Token;
use crate::token::Kw;
use crate::token::TT;
use std::str::Chars;

fn hex_digits(chars: &mut Chars, n: usize) -> Option<u32> {
  let mut value = 0;
  for _ in 0..n {
    value = value * 16 + chars.next()?.to_digit(16)?;
  }
  Some(value)
}

/// Decodes the escapes of a string literal body, without the quotes.
fn decode_escapes(raw: &str) -> Option<String> {
  let mut out = String::with_capacity(raw.len());
  let mut chars = raw.chars();
  // Lone surrogate from a previous `\uXXXX`, waiting for its pair.
  let mut high_surrogate: Option<u32> = None;
  while let Some(c) = chars.next() {
    if c != '\\' {
      if high_surrogate.take().is_some() {
        out.push('\u{FFFD}');
      };
      out.push(c);
      continue;
    };
    let esc = chars.next()?;
    let code_unit = match esc {
      'u' => {
        let mut peek = chars.clone();
        let cp = if peek.next() == Some('{') {
          let inner: String = peek.by_ref().take_while(|&c| c != '}').collect();
          chars = peek;
          u32::from_str_radix(&inner, 16).ok()?
        } else {
          hex_digits(&mut chars, 4)?
        };
        Some(cp)
      }
      _ => None,
    };
    if let Some(cp) = code_unit {
      match (high_surrogate.take(), cp) {
        (Some(high), 0xDC00..=0xDFFF) => {
          let combined = 0x10000 + ((high - 0xD800) << 10) + (cp - 0xDC00);
          out.push(char::from_u32(combined)?);
        }
        (prev, 0xD800..=0xDBFF) => {
          if prev.is_some() {
            out.push('\u{FFFD}');
          };
          high_surrogate = Some(cp);
        }
        (prev, _) => {
          if prev.is_some() {
            out.push('\u{FFFD}');
          };
          out.push(char::from_u32(cp).unwrap_or('\u{FFFD}'));
        }
      };
      continue;
    };
    if high_surrogate.take().is_some() {
      out.push('\u{FFFD}');
    };
    match esc {
      'n' => out.push('\n'),
      't' => out.push('\t'),
      'r' => out.push('\r'),
      'b' => out.push('\x08'),
      'f' => out.push('\x0c'),
      'v' => out.push('\x0b'),
      'x' => out.push(char::from_u32(hex_digits(&mut chars, 2)?)?),
      '\r' => {
        // Line continuation; `\r\n` counts as one line terminator.
        let mut peek = chars.clone();
        if peek.next() == Some('\n') {
          chars = peek;
        };
      }
      c if is_line_terminator(c) => {}
      '0'..='7' => {
        // Legacy octal escape, or `\0`.
        let mut value = esc.to_digit(8)?;
        let max_len = if esc <= '3' { 3 } else { 2 };
        for _ in 1..max_len {
          let mut peek = chars.clone();
          match peek.next().and_then(|c| c.to_digit(8)) {
            Some(d) => {
              value = value * 8 + d;
              chars = peek;
            }
            None => break,
          };
        }
        out.push(char::from_u32(value)?);
      }
      c => out.push(c),
    };
  }
  if high_surrogate.is_some() {
    out.push('\u{FFFD}');
  };
  Some(out)
}

/// Strips the delimiters from the source of a template token: a leading backtick on the first
/// part, and a trailing backtick or `${`.
fn template_part_raw(raw: &str, first: bool, typ: TT) -> &str {
  let start = if first { 1 } else { 0 };
  let end = match typ {
    TT::TemplateChunk => raw.len().saturating_sub(2),
    _ => raw.len().saturating_sub(1),
  };
  raw.get(start..end.max(start)).unwrap_or("")
}

impl<'a> Parser<'a> {
  pub fn lit_str_val(&mut self) -> SyntaxResult<(Loc, String)> {
    let t = self.require(TT::Str)?;
    let raw = self.str(t.loc);
    let body = &raw[1..raw.len() - 1];
    let value = decode_escapes(body)
      .ok_or_else(|| t.error(SyntaxErrorType::InvalidCharacterEscape))?;
    Ok((t.loc, value))
  }

  pub fn lit_str(&mut self) -> SyntaxResult<Node<LitStrExpr>> {
    let (loc, value) = self.lit_str_val()?;
    Ok(Node::new(loc, LitStrExpr { value }))
  }

  pub fn lit_num_val(&mut self) -> SyntaxResult<(Loc, JsNumber)> {
    let t = self.require(TT::Num)?;
    let value = JsNumber::from_literal(self.str(t.loc))
      .ok_or_else(|| t.error(SyntaxErrorType::MalformedLiteralNumber))?;
    Ok((t.loc, value))
  }

  pub fn lit_num(&mut self) -> SyntaxResult<Node<LitNumExpr>> {
    let (loc, value) = self.lit_num_val()?;
    Ok(Node::new(loc, LitNumExpr { value }))
  }

  pub fn lit_bigint(&mut self) -> SyntaxResult<Node<LitBigIntExpr>> {
    let t = self.require(TT::BigInt)?;
    Ok(Node::new(t.loc, LitBigIntExpr {
      value: self.string(t.loc),
    }))
  }

  pub fn lit_bool(&mut self) -> SyntaxResult<Node<LitBoolExpr>> {
    let t = self.consume();
    let value = match t.typ {
      TT::Kw(Kw::True) => true,
      TT::Kw(Kw::False) => false,
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("boolean"))),
    };
    Ok(Node::new(t.loc, LitBoolExpr { value }))
  }

  pub fn lit_null(&mut self) -> SyntaxResult<Node<LitNullExpr>> {
    let t = self.require(TT::Kw(Kw::Null))?;
    Ok(Node::new(t.loc, LitNullExpr {}))
  }

  pub fn lit_regex(&mut self) -> SyntaxResult<Node<LitRegexExpr>> {
    let t = self.require_with_mode(TT::Regex, LexMode::SlashIsRegex)?;
    Ok(Node::new(t.loc, LitRegexExpr {
      value: self.string(t.loc),
    }))
  }

  /// Parses the rest of a template after its first token, which has already been consumed.
  /// Returns the parts and the location of the whole template.
  pub fn template_parts(
    &mut self,
    ctx: ParseCtx,
    first: Token,
  ) -> SyntaxResult<(Vec<LitTemplatePart>, Loc)> {
    let mut parts = Vec::new();
    let mut loc = first.loc;
    let mut t = first;
    let mut is_first = true;
    loop {
      let raw = template_part_raw(self.str(t.loc), is_first, t.typ).to_string();
      parts.push(LitTemplatePart::String(raw));
      loc.extend(t.loc);
      match t.typ {
        TT::TemplateEnd => break,
        TT::TemplateChunk => {
          let substitution = self.expr(ctx, &[TT::RBrace])?;
          parts.push(LitTemplatePart::Substitution(substitution));
          self.require(TT::RBrace)?;
          t = self.consume_with_mode(LexMode::TemplateContinue);
          is_first = false;
        }
        TT::Eof => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("template string"))),
      };
    }
    Ok((parts, loc))
  }

  pub fn lit_template(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitTemplateExpr>> {
    let first = self.consume();
    let (parts, loc) = self.template_parts(ctx, first)?;
    Ok(Node::new(loc, LitTemplateExpr { parts }))
  }

  pub fn lit_arr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitArrExpr>> {
    self.with_loc(|p| {
      p.require(TT::LBracket)?;
      let mut elements = Vec::new();
      loop {
        if p.consume_if(TT::RBracket).is_match() {
          break;
        };
        if p.consume_if(TT::Comma).is_match() {
          elements.push(LitArrElem::Empty);
          continue;
        };
        let rest = p.consume_if(TT::Ellipsis).is_match();
        let value = p.assignment_expr(ctx, &[TT::Comma, TT::RBracket])?;
        elements.push(match rest {
          true => LitArrElem::Rest(value),
          false => LitArrElem::Single(value),
        });
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::RBracket)?;
          break;
        };
      }
      Ok(LitArrExpr { elements })
    })
  }

  fn lit_obj_member(&mut self, ctx: ParseCtx) -> SyntaxResult<ObjMemberType> {
    if self.consume_if(TT::Ellipsis).is_match() {
      let val = self.assignment_expr(ctx, &[TT::Comma, TT::RBrace])?;
      return Ok(ObjMemberType::Rest { val });
    };
    if let Some((key, val)) = self.class_or_obj_method(ctx, false)? {
      return Ok(ObjMemberType::Valued { key, val });
    };
    let key_token = self.peek();
    let key = self.class_or_obj_key(ctx, false)?;
    if self.consume_if(TT::Colon).is_match() {
      let val = self.assignment_expr(ctx, &[TT::Comma, TT::RBrace])?;
      return Ok(ObjMemberType::Valued {
        key,
        val: ClassOrObjVal::Prop(Some(val)),
      });
    };
    let ClassOrObjKey::Direct(direct) = key else {
      return Err(key_token.error(SyntaxErrorType::RequiredTokenNotFound(TT::Colon)));
    };
    if !is_valid_pattern_identifier(direct.stx.tt, ctx.rules) {
      return Err(key_token.error(SyntaxErrorType::RequiredTokenNotFound(TT::Colon)));
    };
    let id = Node::new(direct.loc, IdExpr {
      name: direct.stx.key.clone(),
    });
    if self.consume_if(TT::Assign).is_match() {
      // Only valid once this literal is converted to a pattern, e.g. `({a = 1} = obj)`.
      let default_value = self.assignment_expr(ctx, &[TT::Comma, TT::RBrace])?;
      let target = Node::new(direct.loc, IdPat {
        name: direct.stx.key.clone(),
      });
      let loc = direct.loc + default_value.loc;
      let assignment = Node::new(loc, BinaryExpr {
        operator: OperatorName::Assignment,
        left: target.into_wrapped(),
        right: default_value,
      });
      let key = ClassOrObjKey::Direct(Node::new(direct.loc, ClassOrObjMemberDirectKey {
        key: direct.stx.key,
        tt: TT::Ident,
      }));
      return Ok(ObjMemberType::Valued {
        key,
        val: ClassOrObjVal::Prop(Some(assignment.into_wrapped())),
      });
    };
    Ok(ObjMemberType::Shorthand { id })
  }

  pub fn lit_obj(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitObjExpr>> {
    self.with_loc(|p| {
      p.require(TT::LBrace)?;
      let members = p.list_with_loc(TT::Comma, TT::RBrace, |p| {
        let typ = p.lit_obj_member(ctx)?;
        Ok(ObjMember { typ })
      })?;
      Ok(LitObjExpr { members })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::decode_escapes;

  #[test]
  fn test_decode_simple_escapes() {
    assert_eq!(decode_escapes(r"a\nb\tc").as_deref(), Some("a\nb\tc"));
    assert_eq!(decode_escapes(r#"say \"hi\""#).as_deref(), Some("say \"hi\""));
    assert_eq!(decode_escapes(r"\x41B\u{43}").as_deref(), Some("ABC"));
    assert_eq!(decode_escapes(r"\0").as_deref(), Some("\0"));
    assert_eq!(decode_escapes(r"\101").as_deref(), Some("A"));
  }

  #[test]
  fn test_decode_surrogates() {
    assert_eq!(decode_escapes(r"\uD83D\uDE00").as_deref(), Some("\u{1F600}"));
    assert_eq!(decode_escapes(r"\uD83Dx").as_deref(), Some("\u{FFFD}x"));
  }

  #[test]
  fn test_decode_line_continuation() {
    assert_eq!(decode_escapes("a\\\nb").as_deref(), Some("ab"));
    assert_eq!(decode_escapes("a\\\r\nb").as_deref(), Some("ab"));
  }

  #[test]
  fn test_decode_invalid() {
    assert_eq!(decode_escapes(r"\x4"), None);
    assert_eq!(decode_escapes(r"\u12"), None);
    assert_eq!(decode_escapes("\\"), None);
  }
}
