use crate::operator::Operator;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::token::Kw;
use crate::token::TT;

/// The operator a token denotes when it follows an operand. Calls, member access, tagged templates
/// and the conditional get their own parsing but still need a precedence.
pub fn infix_operator(tt: TT) -> Option<&'static Operator> {
  use OperatorName::*;
  let name = match tt {
    TT::Amp => BitwiseAnd,
    TT::AmpAmp => LogicalAnd,
    TT::AmpAmpAssign => AssignmentLogicalAnd,
    TT::AmpAssign => AssignmentBitwiseAnd,
    TT::Assign => Assignment,
    TT::BangEq => Inequality,
    TT::BangEqEq => StrictInequality,
    TT::Caret => BitwiseXor,
    TT::CaretAssign => AssignmentBitwiseXor,
    TT::Comma => Comma,
    TT::Dot => MemberAccess,
    TT::EqEq => Equality,
    TT::EqEqEq => StrictEquality,
    TT::Gt => GreaterThan,
    TT::GtEq => GreaterThanOrEqual,
    TT::GtGt => BitwiseRightShift,
    TT::GtGtAssign => AssignmentBitwiseRightShift,
    TT::GtGtGt => BitwiseUnsignedRightShift,
    TT::GtGtGtAssign => AssignmentBitwiseUnsignedRightShift,
    TT::Kw(Kw::In) => In,
    TT::Kw(Kw::Instanceof) => Instanceof,
    TT::LBracket => ComputedMemberAccess,
    TT::LParen | TT::TemplateChunk | TT::TemplateEnd => Call,
    TT::Lt => LessThan,
    TT::LtEq => LessThanOrEqual,
    TT::LtLt => BitwiseLeftShift,
    TT::LtLtAssign => AssignmentBitwiseLeftShift,
    TT::Minus => Subtraction,
    TT::MinusAssign => AssignmentSubtraction,
    TT::Percent => Remainder,
    TT::PercentAssign => AssignmentRemainder,
    TT::Pipe => BitwiseOr,
    TT::PipeAssign => AssignmentBitwiseOr,
    TT::PipePipe => LogicalOr,
    TT::PipePipeAssign => AssignmentLogicalOr,
    TT::Plus => Addition,
    TT::PlusAssign => AssignmentAddition,
    TT::Question => Conditional,
    TT::QuestionDot => OptionalChainingMemberAccess,
    TT::QuestionDotLBracket => OptionalChainingComputedMemberAccess,
    TT::QuestionDotLParen => OptionalChainingCall,
    TT::QuestionQuestion => NullishCoalescing,
    TT::QuestionQuestionAssign => AssignmentNullishCoalescing,
    TT::Slash => Division,
    TT::SlashAssign => AssignmentDivision,
    TT::Star => Multiplication,
    TT::StarAssign => AssignmentMultiplication,
    TT::StarStar => Exponentiation,
    TT::StarStarAssign => AssignmentExponentiation,
    _ => return None,
  };
  Some(&OPERATORS[&name])
}

/// The operator a token denotes before an operand. `new` and `yield` are parsed separately.
pub fn prefix_operator(tt: TT) -> Option<&'static Operator> {
  use OperatorName::*;
  let name = match tt {
    TT::Bang => LogicalNot,
    TT::Kw(Kw::Await) => Await,
    TT::Kw(Kw::Delete) => Delete,
    TT::Kw(Kw::Typeof) => Typeof,
    TT::Kw(Kw::Void) => Void,
    TT::Minus => UnaryNegation,
    TT::MinusMinus => PrefixDecrement,
    TT::Plus => UnaryPlus,
    TT::PlusPlus => PrefixIncrement,
    TT::Tilde => BitwiseNot,
    _ => return None,
  };
  Some(&OPERATORS[&name])
}

#[cfg(test)]
mod tests {
  use super::infix_operator;
  use super::prefix_operator;
  use crate::operator::OperatorName;
  use crate::token::Kw;
  use crate::token::TT;

  #[test]
  fn tokens_map_to_operators_by_position() {
    assert_eq!(infix_operator(TT::Minus).map(|o| o.name), Some(OperatorName::Subtraction));
    assert_eq!(prefix_operator(TT::Minus).map(|o| o.name), Some(OperatorName::UnaryNegation));
    assert_eq!(infix_operator(TT::TemplateChunk).map(|o| o.name), Some(OperatorName::Call));
    assert_eq!(infix_operator(TT::Kw(Kw::In)).map(|o| o.name), Some(OperatorName::In));
    assert!(prefix_operator(TT::Kw(Kw::New)).is_none());
    assert!(infix_operator(TT::Arrow).is_none());
  }
}
