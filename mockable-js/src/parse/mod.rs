use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use derive_visitor::Drive;
use derive_visitor::DriveMut;

pub mod class_or_object;
pub mod expr;
pub mod func;
pub mod import_export;
pub mod operator;
pub mod stmt;
#[cfg(test)]
mod tests;

// Whether `await` and `yield` are plain identifiers in the current function. They are operators
// inside async functions and generators respectively; `await` is also an operator at the top level
// of a module.
#[derive(Clone, Copy)]
pub struct ParsePatternRules {
  pub await_allowed: bool,
  pub yield_allowed: bool,
}

// Passed by value to almost every parse_* function; the with_* methods create an altered copy for
// nested calls, so nothing needs to be unwound when a call returns.
#[derive(Clone, Copy)]
pub struct ParseCtx {
  pub rules: ParsePatternRules,
}

impl ParseCtx {
  pub fn with_rules(&self, rules: ParsePatternRules) -> ParseCtx {
    ParseCtx { rules, ..*self }
  }
}

#[derive(Debug)]
#[must_use]
pub struct MaybeToken {
  typ: TT,
  loc: Loc,
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<Loc> {
    if self.matched {
      Some(self.loc)
    } else {
      None
    }
  }

  pub fn error(&self, err: SyntaxErrorType) -> SyntaxError {
    debug_assert!(!self.matched);
    self.loc.error(err, Some(self.typ))
  }

  pub fn and_then<R, F: FnOnce() -> SyntaxResult<R>>(self, f: F) -> SyntaxResult<Option<R>> {
    Ok(if self.matched { Some(f()?) } else { None })
  }
}

#[derive(Clone, Copy)]
pub struct ParserCheckpoint {
  next_tok_i: usize,
}

struct BufferedToken {
  token: Token,
  lex_mode: LexMode,
}

pub struct Parser<'a> {
  lexer: Lexer<'a>,
  buf: Vec<BufferedToken>,
  next_tok_i: usize,
}

// Parsing is split across the submodules as further `impl Parser` blocks rather than free
// functions taking `&mut Parser`.
impl<'a> Parser<'a> {
  pub fn new(lexer: Lexer<'a>) -> Parser<'a> {
    Parser {
      lexer,
      buf: Vec::new(),
      next_tok_i: 0,
    }
  }

  pub fn source_range(&self) -> Loc {
    self.lexer.source_range()
  }

  pub fn str(&self, loc: Loc) -> &str {
    &self.lexer[loc]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      next_tok_i: self.next_tok_i,
    }
  }

  /// The range from the first token consumed after the checkpoint to the last token consumed.
  pub fn since_checkpoint(&self, checkpoint: &ParserCheckpoint) -> Loc {
    let start = self
      .buf
      .get(checkpoint.next_tok_i)
      .map(|t| t.token.loc.0)
      .unwrap_or_else(|| self.lexer.next());
    let end = match self.next_tok_i {
      i if i > checkpoint.next_tok_i => self.buf[i - 1].token.loc.1,
      _ => start,
    };
    Loc(start, end)
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.next_tok_i = checkpoint.next_tok_i;
  }

  fn reset_to(&mut self, n: usize) {
    self.next_tok_i = n;
    self.buf.truncate(n);
    let offset = self.buf.last().map_or(0, |t| t.token.loc.1);
    self.lexer.rewind(offset);
  }

  fn forward<K: FnOnce(&Token) -> bool>(&mut self, mode: LexMode, keep: K) -> (bool, Token) {
    if self
      .buf
      .get(self.next_tok_i)
      .is_some_and(|t| t.lex_mode != mode)
    {
      self.reset_to(self.next_tok_i);
    };
    if self.buf.len() == self.next_tok_i {
      let token = self.lexer.next_token(mode);
      self.buf.push(BufferedToken {
        token,
        lex_mode: mode,
      });
    };
    let t = self.buf[self.next_tok_i].token.clone();
    let k = keep(&t);
    if k {
      self.next_tok_i += 1;
    };
    (k, t)
  }

  pub fn consume_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| true).1
  }

  pub fn consume(&mut self) -> Token {
    self.consume_with_mode(LexMode::Standard)
  }

  pub fn peek_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| false).1
  }

  pub fn peek(&mut self) -> Token {
    self.peek_with_mode(LexMode::Standard)
  }

  pub fn peek_n<const N: usize>(&mut self) -> [Token; N] {
    let cp = self.checkpoint();
    let tokens = std::array::from_fn(|_| self.consume());
    self.restore_checkpoint(cp);
    tokens
  }

  pub fn maybe_consume_with_mode(&mut self, typ: TT, mode: LexMode) -> MaybeToken {
    let (matched, t) = self.forward(mode, |t| t.typ == typ);
    MaybeToken {
      typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn consume_if(&mut self, typ: TT) -> MaybeToken {
    self.maybe_consume_with_mode(typ, LexMode::Standard)
  }

  /// Consumes the next token if it's an identifier spelled `word`, e.g. the contextual `from`.
  pub fn consume_if_word(&mut self, word: &str) -> bool {
    let t = self.peek();
    if t.typ == TT::Ident && self.str(t.loc) == word {
      self.consume();
      true
    } else {
      false
    }
  }

  pub fn require_with_mode(&mut self, typ: TT, mode: LexMode) -> SyntaxResult<Token> {
    let t = self.consume_with_mode(mode);
    if t.typ != typ {
      Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    self.require_with_mode(typ, LexMode::Standard)
  }

  pub fn require_word(&mut self, word: &'static str) -> SyntaxResult<Token> {
    let t = self.consume();
    if t.typ != TT::Ident || self.str(t.loc) != word {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax(word)));
    };
    Ok(t)
  }

  pub fn with_loc<S: Drive + DriveMut, F>(&mut self, f: F) -> SyntaxResult<Node<S>>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<S>,
  {
    let start = self.checkpoint();
    let stx = f(self)?;
    Ok(Node::new(self.since_checkpoint(&start), stx))
  }

  /// Drives the parser with the closure and returns what it returns, undoing its changes if it returns None.
  pub fn rewindable<S, F>(&mut self, f: F) -> SyntaxResult<Option<S>>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<Option<S>>,
  {
    let checkpoint = self.checkpoint();
    let stx = f(self)?;
    if stx.is_none() {
      self.restore_checkpoint(checkpoint);
    };
    Ok(stx)
  }

  /// Parse a list of items separated by a delimiter until `close`, which will also be consumed.
  /// Allows for a trailing delimiter.
  pub fn list_with_loc<S: Drive + DriveMut, F>(
    &mut self,
    delim: TT,
    close: TT,
    f: F,
  ) -> SyntaxResult<Vec<Node<S>>>
  where
    F: Fn(&mut Self) -> SyntaxResult<S>,
  {
    let mut nodes = Vec::new();
    while !self.consume_if(close).is_match() {
      nodes.push(self.with_loc(&f)?);
      if !self.consume_if(delim).is_match() {
        self.require(close)?;
        break;
      };
    }
    Ok(nodes)
  }

  /// Ends a statement: a semicolon, or an inserted one before `}`, the end, or a new line.
  pub fn require_semicolon(&mut self) -> SyntaxResult<()> {
    let t = self.peek();
    match t.typ {
      TT::Semicolon => {
        self.consume();
        Ok(())
      }
      TT::RBrace | TT::Eof => Ok(()),
      _ if t.preceded_by_line_terminator => Ok(()),
      _ => Err(t.error(SyntaxErrorType::RequiredTokenNotFound(TT::Semicolon))),
    }
  }

  pub fn parse_top_level(&mut self) -> SyntaxResult<Node<TopLevel>> {
    let ctx = ParseCtx {
      rules: ParsePatternRules {
        // Top-level await.
        await_allowed: false,
        yield_allowed: true,
      },
    };
    let body = self.stmts(ctx, TT::Eof)?;
    self.require(TT::Eof)?;
    let comments = self.lexer.take_comments();
    Ok(Node::new(self.source_range(), TopLevel { body, comments }))
  }
}
