//! Reads tokens on demand. What a character starts depends on what the parser expects next (a `/`
//! after an operand divides, but starts a regex where an operand is expected), so each call to
//! [`Lexer::next_token`] names a [`LexMode`].

use crate::char::is_id_continue;
use crate::char::is_id_continue_jsx;
use crate::char::is_id_start;
use crate::char::is_line_terminator;
use crate::loc::Loc;
use crate::token::Comment;
use crate::token::CommentKind;
use crate::token::Kw;
use crate::token::Token;
use crate::token::PUNCTUATORS;
use crate::token::TT;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::AhoCorasickKind;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use core::ops::Index;
use memchr::memchr2;
use memchr::memchr3;
use memchr::memmem;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::mem::take;


#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexMode {
  /// Inside `<...>`. Names may contain `-`, keywords are plain names, and attribute strings have
  /// no escapes.
  JsxTag,
  /// Between JSX children, where text runs up to the next `{` or `<`.
  JsxText,
  /// Where an operand is expected, so `/` starts a regex.
  SlashIsRegex,
  Standard,
  /// Right after the `}` that closes a template substitution.
  TemplateContinue,
}

// Longest match wins, so `>>>=` is one token.
static PUNCTUATOR_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
  AhoCorasickBuilder::new()
    .start_kind(StartKind::Anchored)
    .kind(Some(AhoCorasickKind::DFA))
    .match_kind(MatchKind::LeftmostLongest)
    .build(PUNCTUATORS.iter().map(|(syntax, _)| syntax.as_bytes()))
    .unwrap()
});

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
  // Keyed by start offset, so reading a range again records its comments once.
  comments: BTreeMap<usize, Comment>,
}

impl<'a> Lexer<'a> {
  pub fn new(source: &'a str) -> Lexer<'a> {
    Lexer {
      source,
      next: 0,
      comments: BTreeMap::new(),
    }
  }

  pub fn next(&self) -> usize {
    self.next
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.source.len())
  }

  /// Moves back to `offset` so the rest can be read again, possibly in another mode. Comments
  /// from `offset` onwards are forgotten until they are read again.
  pub fn rewind(&mut self, offset: usize) {
    self.next = offset;
    self.comments.retain(|&start, _| start < offset);
  }

  /// The comments read so far, in source order.
  pub fn take_comments(&mut self) -> Vec<Comment> {
    take(&mut self.comments).into_values().collect()
  }

  fn rest(&self) -> &'a str {
    let source = self.source;
    &source[self.next..]
  }

  fn peek_char(&self) -> Option<char> {
    self.rest().chars().next()
  }

  fn peek_byte(&self, n: usize) -> Option<u8> {
    self.rest().as_bytes().get(n).copied()
  }

  fn advance(&mut self, bytes: usize) {
    self.next = (self.next + bytes).min(self.source.len());
  }

  fn bump(&mut self) -> Option<char> {
    let c = self.peek_char()?;
    self.next += c.len_utf8();
    Some(c)
  }

  fn eat(&mut self, c: char) -> bool {
    if self.peek_char() == Some(c) {
      self.next += c.len_utf8();
      true
    } else {
      false
    }
  }

  /// Returns how many bytes were consumed.
  fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
    let rest = self.rest();
    let len = rest
      .char_indices()
      .find(|(_, c)| !pred(*c))
      .map_or(rest.len(), |(i, _)| i);
    self.next += len;
    len
  }

  // The token is invalid and runs to the end of the source.
  fn unterminated(&mut self) -> Option<TT> {
    self.next = self.source.len();
    None
  }

  fn record_comment(&mut self, start: usize, kind: CommentKind) {
    let loc = Loc(start, self.next);
    let text = self[loc].to_string();
    self
      .comments
      .entry(start)
      .or_insert(Comment { loc, kind, text });
  }

  /// Skips whitespace and comments. Returns whether a line terminator was skipped.
  fn skip_trivia(&mut self) -> bool {
    let mut newline = false;
    loop {
      match self.peek_char() {
        Some(c) if is_line_terminator(c) => {
          newline = true;
          self.advance(c.len_utf8());
        }
        Some(c) if c.is_whitespace() || c == '\u{feff}' => self.advance(c.len_utf8()),
        Some('/') if self.peek_byte(1) == Some(b'/') => {
          let start = self.next;
          let len = self.rest().find(is_line_terminator).unwrap_or(self.rest().len());
          self.advance(len);
          self.record_comment(start, CommentKind::Line);
        }
        Some('/') if self.peek_byte(1) == Some(b'*') => {
          let start = self.next;
          // An unterminated comment runs to the end of the source.
          let len = memmem::find(&self.rest().as_bytes()[2..], b"*/")
            .map_or(self.rest().len(), |i| i + 4);
          self.advance(len);
          newline |= self.source[start..self.next].contains(is_line_terminator);
          self.record_comment(start, CommentKind::Block);
        }
        _ => return newline,
      };
    }
  }

  pub fn next_token(&mut self, mode: LexMode) -> Token {
    let preceded_by_line_terminator = match mode {
      LexMode::JsxText | LexMode::TemplateContinue => false,
      _ => self.skip_trivia(),
    };
    let start = self.next;
    let typ = match mode {
      LexMode::JsxText => self.jsx_text(),
      LexMode::TemplateContinue => self.template_chunk(),
      _ => self.token(mode),
    };
    Token {
      loc: Loc(start, self.next),
      typ: typ.unwrap_or(TT::Invalid),
      preceded_by_line_terminator,
    }
  }

  fn token(&mut self, mode: LexMode) -> Option<TT> {
    let Some(c) = self.peek_char() else {
      return Some(TT::Eof);
    };
    match c {
      '"' | '\'' if mode == LexMode::JsxTag => self.jsx_attr_string(c),
      '"' | '\'' => self.string(c),
      '`' => {
        self.advance(1);
        self.template_chunk()
      }
      '0'..='9' => self.number(),
      '.' if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) => self.number(),
      '#' => self.private_name(),
      '/' if mode == LexMode::SlashIsRegex => self.regex(),
      '\\' => self.word(mode),
      c if is_id_start(c) => self.word(mode),
      _ => self.punctuator(),
    }
  }

  fn punctuator(&mut self) -> Option<TT> {
    let input = Input::new(self.rest()).anchored(Anchored::Yes);
    let Some(m) = PUNCTUATOR_MATCHER.find(input) else {
      self.bump();
      return None;
    };
    let (_, typ) = PUNCTUATORS[m.pattern().as_usize()];
    // `a?.5:b` is a conditional followed by a number.
    if typ == TT::QuestionDot && self.peek_byte(2).is_some_and(|b| b.is_ascii_digit()) {
      self.advance(1);
      return Some(TT::Question);
    };
    self.advance(m.end());
    Some(typ)
  }

  fn word(&mut self, mode: LexMode) -> Option<TT> {
    let start = self.next;
    let continues = if mode == LexMode::JsxTag {
      is_id_continue_jsx
    } else {
      is_id_continue
    };
    let mut escaped = false;
    loop {
      if self.peek_char() == Some('\\') {
        self.unicode_escape()?;
        escaped = true;
      } else if self.eat_while(continues) == 0 {
        break;
      };
    }
    // `if` is the identifier `if`, not the keyword.
    if escaped || mode == LexMode::JsxTag {
      return Some(TT::Ident);
    };
    Some(Kw::from_word(&self.source[start..self.next]).map_or(TT::Ident, TT::Kw))
  }

  fn unicode_escape(&mut self) -> Option<()> {
    self.advance(1);
    if self.bump()? != 'u' {
      return None;
    };
    if self.eat('{') {
      if self.eat_while(|c| c.is_ascii_hexdigit()) == 0 || !self.eat('}') {
        return None;
      };
    } else {
      for _ in 0..4 {
        if !self.bump()?.is_ascii_hexdigit() {
          return None;
        };
      }
    };
    Some(())
  }

  fn private_name(&mut self) -> Option<TT> {
    self.advance(1);
    if !self.peek_char().is_some_and(is_id_start) {
      return None;
    };
    self.eat_while(is_id_continue);
    Some(TT::PrivateName)
  }

  fn number(&mut self) -> Option<TT> {
    let decimal = |c: char| c.is_ascii_digit() || c == '_';
    let radix = match (self.peek_byte(0), self.peek_byte(1)) {
      (Some(b'0'), Some(b'x' | b'X')) => Some(16),
      (Some(b'0'), Some(b'o' | b'O')) => Some(8),
      (Some(b'0'), Some(b'b' | b'B')) => Some(2),
      _ => None,
    };
    if let Some(radix) = radix {
      self.advance(2);
      self.eat_while(|c| c == '_' || c.is_digit(radix));
      return Some(if self.eat('n') { TT::BigInt } else { TT::Num });
    };
    let start = self.next;
    self.eat_while(decimal);
    if self.eat('n') {
      return Some(TT::BigInt);
    };
    // A legacy octal like `017` has no fraction, so a following `.` is member access.
    let int = &self.source[start..self.next];
    let legacy_octal =
      int.len() > 1 && int.starts_with('0') && int.bytes().all(|b| (b'0'..=b'7').contains(&b));
    if !legacy_octal && self.eat('.') {
      self.eat_while(decimal);
    };
    if matches!(self.peek_char(), Some('e' | 'E')) {
      self.advance(1);
      if matches!(self.peek_char(), Some('+' | '-')) {
        self.advance(1);
      };
      self.eat_while(decimal);
    };
    Some(TT::Num)
  }

  // Escapes are decoded, and rejected if malformed, by the parser.
  fn string(&mut self, quote: char) -> Option<TT> {
    self.advance(1);
    loop {
      let Some(i) = memchr3(quote as u8, b'\\', b'\n', self.rest().as_bytes()) else {
        return self.unterminated();
      };
      self.advance(i);
      match self.bump()? {
        '\\' => {
          // `\` followed by `\r\n` is a single line continuation.
          if self.bump()? == '\r' {
            self.eat('\n');
          };
        }
        '\n' => return None,
        _ => return Some(TT::Str),
      };
    }
  }

  fn jsx_attr_string(&mut self, quote: char) -> Option<TT> {
    self.advance(1);
    match self.rest().find(quote) {
      Some(i) => {
        self.advance(i + 1);
        Some(TT::Str)
      }
      None => self.unterminated(),
    }
  }

  /// Reads template text up to and including `${` or the closing backtick.
  fn template_chunk(&mut self) -> Option<TT> {
    loop {
      let Some(i) = memchr3(b'`', b'\\', b'$', self.rest().as_bytes()) else {
        return self.unterminated();
      };
      self.advance(i);
      match self.bump()? {
        '\\' => {
          self.bump()?;
        }
        '`' => return Some(TT::TemplateEnd),
        _ => {
          if self.eat('{') {
            return Some(TT::TemplateChunk);
          };
        }
      };
    }
  }

  fn regex(&mut self) -> Option<TT> {
    self.advance(1);
    let mut in_class = false;
    loop {
      match self.bump()? {
        '\\' => match self.bump() {
          Some(c) if !is_line_terminator(c) => {}
          _ => return None,
        },
        '/' if !in_class => break,
        '[' => in_class = true,
        ']' => in_class = false,
        c if is_line_terminator(c) => return None,
        _ => {}
      };
    }
    // Flags.
    self.eat_while(is_id_continue);
    Some(TT::Regex)
  }

  fn jsx_text(&mut self) -> Option<TT> {
    let rest = self.rest().as_bytes();
    match rest.first() {
      None => Some(TT::Eof),
      Some(b'{') => {
        self.advance(1);
        Some(TT::LBrace)
      }
      Some(b'<') if rest.get(1) == Some(&b'/') => {
        self.advance(2);
        Some(TT::JsxCloseStart)
      }
      Some(b'<') => {
        self.advance(1);
        Some(TT::Lt)
      }
      Some(_) => {
        self.advance(memchr2(b'{', b'<', rest).unwrap_or(rest.len()));
        Some(TT::JsxText)
      }
    }
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}
