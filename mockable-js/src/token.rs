use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use serde::Serialize;

/// Reserved words, plus `await`, `let` and `yield`, which are only reserved in some contexts.
/// Contextual words such as `as`, `from`, `of`, `get`, `set`, `static` and `async` are plain
/// identifiers that the parser recognizes from their source text.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum Kw {
  Await,
  Break,
  Case,
  Catch,
  Class,
  Const,
  Continue,
  Debugger,
  Default,
  Delete,
  Do,
  Else,
  Enum,
  Export,
  Extends,
  False,
  Finally,
  For,
  Function,
  If,
  Import,
  In,
  Instanceof,
  Let,
  New,
  Null,
  Return,
  Super,
  Switch,
  This,
  Throw,
  True,
  Try,
  Typeof,
  Var,
  Void,
  While,
  With,
  Yield,
}

impl Kw {
  pub fn from_word(word: &str) -> Option<Kw> {
    Some(match word {
      "await" => Kw::Await,
      "break" => Kw::Break,
      "case" => Kw::Case,
      "catch" => Kw::Catch,
      "class" => Kw::Class,
      "const" => Kw::Const,
      "continue" => Kw::Continue,
      "debugger" => Kw::Debugger,
      "default" => Kw::Default,
      "delete" => Kw::Delete,
      "do" => Kw::Do,
      "else" => Kw::Else,
      "enum" => Kw::Enum,
      "export" => Kw::Export,
      "extends" => Kw::Extends,
      "false" => Kw::False,
      "finally" => Kw::Finally,
      "for" => Kw::For,
      "function" => Kw::Function,
      "if" => Kw::If,
      "import" => Kw::Import,
      "in" => Kw::In,
      "instanceof" => Kw::Instanceof,
      "let" => Kw::Let,
      "new" => Kw::New,
      "null" => Kw::Null,
      "return" => Kw::Return,
      "super" => Kw::Super,
      "switch" => Kw::Switch,
      "this" => Kw::This,
      "throw" => Kw::Throw,
      "true" => Kw::True,
      "try" => Kw::Try,
      "typeof" => Kw::Typeof,
      "var" => Kw::Var,
      "void" => Kw::Void,
      "while" => Kw::While,
      "with" => Kw::With,
      "yield" => Kw::Yield,
      _ => return None,
    })
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  /// End of the source.
  Eof,
  /// Malformed source. The parser rejects it wherever it appears, so peeking never fails.
  Invalid,

  Ident,
  Kw(Kw),
  /// `#name`, including the hash.
  PrivateName,
  Num,
  BigInt,
  Str,
  Regex,
  /// A template literal's text up to and including `${`, starting at the backtick or `}`.
  TemplateChunk,
  /// A template literal's text up to and including the closing backtick.
  TemplateEnd,
  JsxText,
  /// `</`, which only starts a closing tag between JSX children.
  JsxCloseStart,

  Amp,
  AmpAmp,
  AmpAmpAssign,
  AmpAssign,
  Arrow,
  Assign,
  Bang,
  BangEq,
  BangEqEq,
  Caret,
  CaretAssign,
  Colon,
  Comma,
  Dot,
  Ellipsis,
  EqEq,
  EqEqEq,
  Gt,
  GtEq,
  GtGt,
  GtGtAssign,
  GtGtGt,
  GtGtGtAssign,
  LBrace,
  LBracket,
  LParen,
  Lt,
  LtEq,
  LtLt,
  LtLtAssign,
  Minus,
  MinusAssign,
  MinusMinus,
  Percent,
  PercentAssign,
  Pipe,
  PipeAssign,
  PipePipe,
  PipePipeAssign,
  Plus,
  PlusAssign,
  PlusPlus,
  Question,
  QuestionDot,
  QuestionDotLBracket,
  QuestionDotLParen,
  QuestionQuestion,
  QuestionQuestionAssign,
  RBrace,
  RBracket,
  RParen,
  Semicolon,
  Slash,
  SlashAssign,
  Star,
  StarAssign,
  StarStar,
  StarStarAssign,
  Tilde,
}

impl TT {
  /// Keywords can still be property names, JSX attribute names and import or export names.
  pub fn is_keyword(self) -> bool {
    matches!(self, TT::Kw(_))
  }
}

/// Every punctuator and its spelling. `/` and `/=` are regexes where an operand is expected.
pub const PUNCTUATORS: &[(&str, TT)] = &[
  ("&", TT::Amp),
  ("&&", TT::AmpAmp),
  ("&&=", TT::AmpAmpAssign),
  ("&=", TT::AmpAssign),
  ("=>", TT::Arrow),
  ("=", TT::Assign),
  ("!", TT::Bang),
  ("!=", TT::BangEq),
  ("!==", TT::BangEqEq),
  ("^", TT::Caret),
  ("^=", TT::CaretAssign),
  (":", TT::Colon),
  (",", TT::Comma),
  (".", TT::Dot),
  ("...", TT::Ellipsis),
  ("==", TT::EqEq),
  ("===", TT::EqEqEq),
  (">", TT::Gt),
  (">=", TT::GtEq),
  (">>", TT::GtGt),
  (">>=", TT::GtGtAssign),
  (">>>", TT::GtGtGt),
  (">>>=", TT::GtGtGtAssign),
  ("{", TT::LBrace),
  ("[", TT::LBracket),
  ("(", TT::LParen),
  ("<", TT::Lt),
  ("<=", TT::LtEq),
  ("<<", TT::LtLt),
  ("<<=", TT::LtLtAssign),
  ("-", TT::Minus),
  ("-=", TT::MinusAssign),
  ("--", TT::MinusMinus),
  ("%", TT::Percent),
  ("%=", TT::PercentAssign),
  ("|", TT::Pipe),
  ("|=", TT::PipeAssign),
  ("||", TT::PipePipe),
  ("||=", TT::PipePipeAssign),
  ("+", TT::Plus),
  ("+=", TT::PlusAssign),
  ("++", TT::PlusPlus),
  ("?", TT::Question),
  ("?.", TT::QuestionDot),
  ("?.[", TT::QuestionDotLBracket),
  ("?.(", TT::QuestionDotLParen),
  ("??", TT::QuestionQuestion),
  ("??=", TT::QuestionQuestionAssign),
  ("}", TT::RBrace),
  ("]", TT::RBracket),
  (")", TT::RParen),
  (";", TT::Semicolon),
  ("/", TT::Slash),
  ("/=", TT::SlashAssign),
  ("*", TT::Star),
  ("*=", TT::StarAssign),
  ("**", TT::StarStar),
  ("**=", TT::StarStarAssign),
  ("~", TT::Tilde),
];

#[derive(Clone, Debug)]
pub struct Token {
  pub loc: Loc,
  /// Whether a line terminator appears between this token and the previous one, including inside
  /// a block comment.
  pub preceded_by_line_terminator: bool,
  pub typ: TT,
}

impl Token {
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, Some(self.typ))
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CommentKind {
  /// `// ...`, excluding the line terminator.
  Line,
  /// `/* ... */`.
  Block,
}

/// A comment as it appears in the source, delimiters included.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Comment {
  pub loc: Loc,
  pub kind: CommentKind,
  pub text: String,
}
