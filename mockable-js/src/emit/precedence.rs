use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;

/// Wrapper around a precedence value with total ordering.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Prec(u8);

impl Prec {
  pub const LOWEST: Prec = Prec(0);

  pub const fn new(value: u8) -> Self {
    Prec(value)
  }

  pub const fn tighter(self) -> Self {
    Prec(self.0 + 1)
  }

  pub fn of(op: OperatorName) -> Self {
    Prec(OPERATORS[&op].precedence)
  }
}

/// Anything that may appear in an argument list, array element, initializer, or property value.
pub const ASSIGNMENT_PRECEDENCE: Prec = Prec::new(2);
/// Precedence for `new X` without an argument list.
pub const NEW_WITHOUT_ARGS_PRECEDENCE: Prec = Prec::new(17);
/// Precedence for member access, calls, and anything else that can be a callee.
pub const CALL_MEMBER_PRECEDENCE: Prec = Prec::new(18);
/// Precedence for atomic expressions (identifiers, literals, etc.).
pub const PRIMARY_PRECEDENCE: Prec = Prec::new(19);

#[derive(Clone, Copy, Debug)]
pub enum Side {
  Left,
  Right,
}

pub fn needs_parens(child_prec: Prec, min_prec: Prec) -> bool {
  child_prec < min_prec
}

pub fn child_min_prec_for_binary(op: OperatorName, side: Side) -> Prec {
  let operator = &OPERATORS[&op];
  let prec = Prec::new(operator.precedence);
  match (operator.associativity, side) {
    (Associativity::Left, Side::Left) | (Associativity::Right, Side::Right) => prec,
    (Associativity::Left, Side::Right) | (Associativity::Right, Side::Left) => prec.tighter(),
  }
}

/// The precedence of an expression, derived from the parser's operator table so that output
/// without the original parentheses parses back to the same tree.
pub fn expr_prec(expr: &Node<Expr>) -> Prec {
  match expr.stx.as_ref() {
    Expr::Binary(binary) => Prec::of(binary.stx.operator),
    Expr::Cond(_) => Prec::of(OperatorName::Conditional),
    Expr::Unary(unary) => Prec::of(unary.stx.operator),
    Expr::UnaryPostfix(unary) => Prec::of(unary.stx.operator),
    Expr::Yield(_) | Expr::ArrowFunc(_) => ASSIGNMENT_PRECEDENCE,
    Expr::New(new) => match new.stx.arguments {
      Some(_) => CALL_MEMBER_PRECEDENCE,
      None => NEW_WITHOUT_ARGS_PRECEDENCE,
    },
    Expr::Call(_)
    | Expr::Member(_)
    | Expr::ComputedMember(_)
    | Expr::TaggedTemplate(_)
    | Expr::Import(_) => CALL_MEMBER_PRECEDENCE,
    Expr::Class(_)
    | Expr::Func(_)
    | Expr::Id(_)
    | Expr::ImportMeta(_)
    | Expr::NewTarget(_)
    | Expr::Super(_)
    | Expr::This(_)
    | Expr::JsxElem(_)
    | Expr::LitArr(_)
    | Expr::LitBigInt(_)
    | Expr::LitBool(_)
    | Expr::LitNull(_)
    | Expr::LitNum(_)
    | Expr::LitObj(_)
    | Expr::LitRegex(_)
    | Expr::LitStr(_)
    | Expr::LitTemplate(_)
    | Expr::ArrPat(_)
    | Expr::IdPat(_)
    | Expr::ObjPat(_) => PRIMARY_PRECEDENCE,
  }
}

/// The expression that would be written first, following the leftmost operand down.
fn leftmost(expr: &Node<Expr>) -> &Node<Expr> {
  match expr.stx.as_ref() {
    Expr::Binary(binary) => leftmost(&binary.stx.left),
    Expr::Call(call) => leftmost(&call.stx.callee),
    Expr::Member(member) => leftmost(&member.stx.left),
    Expr::ComputedMember(member) => leftmost(&member.stx.object),
    Expr::TaggedTemplate(tagged) => leftmost(&tagged.stx.function),
    Expr::UnaryPostfix(unary) => leftmost(&unary.stx.argument),
    Expr::Cond(cond) => leftmost(&cond.stx.test),
    _ => expr,
  }
}

pub fn starts_with_brace(expr: &Node<Expr>) -> bool {
  matches!(leftmost(expr).stx.as_ref(), Expr::LitObj(_) | Expr::ObjPat(_))
}

/// Whether an expression statement written as is would be parsed as something else, such as a
/// block or a declaration.
pub fn is_ambiguous_stmt_start(expr: &Node<Expr>) -> bool {
  match leftmost(expr).stx.as_ref() {
    Expr::LitObj(_) | Expr::ObjPat(_) | Expr::Func(_) | Expr::Class(_) => true,
    Expr::Id(id) => id.stx.name == "let",
    _ => false,
  }
}

pub fn is_nullish(expr: &Node<Expr>) -> bool {
  matches!(
    expr.stx.as_ref(),
    Expr::Binary(binary) if binary.stx.operator == OperatorName::NullishCoalescing
  )
}

pub fn is_logical_and_or(expr: &Node<Expr>) -> bool {
  matches!(
    expr.stx.as_ref(),
    Expr::Binary(binary)
      if binary.stx.operator == OperatorName::LogicalAnd
        || binary.stx.operator == OperatorName::LogicalOr
  )
}

/// Whether a `new` callee contains a call that `new` would otherwise take as its argument list.
pub fn callee_contains_call(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::Call(_) => true,
    Expr::New(new) => new.stx.arguments.is_none(),
    Expr::Member(member) => callee_contains_call(&member.stx.left),
    Expr::ComputedMember(member) => callee_contains_call(&member.stx.object),
    Expr::TaggedTemplate(tagged) => callee_contains_call(&tagged.stx.function),
    _ => false,
  }
}

/// Whether an `in` operator appears outside any brackets, which would end a `for` initializer.
pub fn contains_bare_in(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::Binary(binary) => {
      binary.stx.operator == OperatorName::In
        || contains_bare_in(&binary.stx.left)
        || contains_bare_in(&binary.stx.right)
    }
    Expr::Cond(cond) => {
      contains_bare_in(&cond.stx.test)
        || contains_bare_in(&cond.stx.consequent)
        || contains_bare_in(&cond.stx.alternate)
    }
    Expr::Unary(unary) => contains_bare_in(&unary.stx.argument),
    Expr::UnaryPostfix(unary) => contains_bare_in(&unary.stx.argument),
    _ => false,
  }
}

/// A number written without a fraction or exponent needs a second dot before member access.
pub fn requires_trailing_dot(rendered: &str) -> bool {
  rendered.bytes().all(|b| b.is_ascii_digit())
}
