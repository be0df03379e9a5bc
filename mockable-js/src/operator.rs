use ahash::HashMap;
use ahash::HashMapExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Associativity {
  Left,
  Right,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum OperatorName {
  Addition,
  Assignment,
  AssignmentAddition,
  AssignmentBitwiseAnd,
  AssignmentBitwiseLeftShift,
  AssignmentBitwiseOr,
  AssignmentBitwiseRightShift,
  AssignmentBitwiseUnsignedRightShift,
  AssignmentBitwiseXor,
  AssignmentDivision,
  AssignmentExponentiation,
  AssignmentLogicalAnd,
  AssignmentLogicalOr,
  AssignmentMultiplication,
  AssignmentNullishCoalescing,
  AssignmentRemainder,
  AssignmentSubtraction,
  Await,
  BitwiseAnd,
  BitwiseLeftShift,
  BitwiseNot,
  BitwiseOr,
  BitwiseRightShift,
  BitwiseUnsignedRightShift,
  BitwiseXor,
  Call,
  Comma,
  ComputedMemberAccess,
  Conditional,
  Delete,
  Division,
  Equality,
  Exponentiation,
  GreaterThan,
  GreaterThanOrEqual,
  In,
  Inequality,
  Instanceof,
  LessThan,
  LessThanOrEqual,
  LogicalAnd,
  LogicalNot,
  LogicalOr,
  MemberAccess,
  Multiplication,
  New,
  NullishCoalescing,
  OptionalChainingMemberAccess,
  OptionalChainingComputedMemberAccess,
  OptionalChainingCall,
  PostfixDecrement,
  PostfixIncrement,
  PrefixDecrement,
  PrefixIncrement,
  Remainder,
  StrictEquality,
  StrictInequality,
  Subtraction,
  Typeof,
  UnaryNegation,
  UnaryPlus,
  Void,
  Yield,
  YieldDelegated,
}

impl OperatorName {
  pub fn is_assignment(self) -> bool {
    matches!(
      self,
      OperatorName::Assignment
        | OperatorName::AssignmentAddition
        | OperatorName::AssignmentBitwiseAnd
        | OperatorName::AssignmentBitwiseLeftShift
        | OperatorName::AssignmentBitwiseOr
        | OperatorName::AssignmentBitwiseRightShift
        | OperatorName::AssignmentBitwiseUnsignedRightShift
        | OperatorName::AssignmentBitwiseXor
        | OperatorName::AssignmentDivision
        | OperatorName::AssignmentExponentiation
        | OperatorName::AssignmentLogicalAnd
        | OperatorName::AssignmentLogicalOr
        | OperatorName::AssignmentMultiplication
        | OperatorName::AssignmentNullishCoalescing
        | OperatorName::AssignmentRemainder
        | OperatorName::AssignmentSubtraction
    )
  }

  /// The source text of the operator, for operators that are written as a single token.
  pub fn syntax(self) -> Option<&'static str> {
    Some(match self {
      OperatorName::Addition => "+",
      OperatorName::Assignment => "=",
      OperatorName::AssignmentAddition => "+=",
      OperatorName::AssignmentBitwiseAnd => "&=",
      OperatorName::AssignmentBitwiseLeftShift => "<<=",
      OperatorName::AssignmentBitwiseOr => "|=",
      OperatorName::AssignmentBitwiseRightShift => ">>=",
      OperatorName::AssignmentBitwiseUnsignedRightShift => ">>>=",
      OperatorName::AssignmentBitwiseXor => "^=",
      OperatorName::AssignmentDivision => "/=",
      OperatorName::AssignmentExponentiation => "**=",
      OperatorName::AssignmentLogicalAnd => "&&=",
      OperatorName::AssignmentLogicalOr => "||=",
      OperatorName::AssignmentMultiplication => "*=",
      OperatorName::AssignmentNullishCoalescing => "??=",
      OperatorName::AssignmentRemainder => "%=",
      OperatorName::AssignmentSubtraction => "-=",
      OperatorName::Await => "await",
      OperatorName::BitwiseAnd => "&",
      OperatorName::BitwiseLeftShift => "<<",
      OperatorName::BitwiseNot => "~",
      OperatorName::BitwiseOr => "|",
      OperatorName::BitwiseRightShift => ">>",
      OperatorName::BitwiseUnsignedRightShift => ">>>",
      OperatorName::BitwiseXor => "^",
      OperatorName::Comma => ",",
      OperatorName::Delete => "delete",
      OperatorName::Division => "/",
      OperatorName::Equality => "==",
      OperatorName::Exponentiation => "**",
      OperatorName::GreaterThan => ">",
      OperatorName::GreaterThanOrEqual => ">=",
      OperatorName::In => "in",
      OperatorName::Inequality => "!=",
      OperatorName::Instanceof => "instanceof",
      OperatorName::LessThan => "<",
      OperatorName::LessThanOrEqual => "<=",
      OperatorName::LogicalAnd => "&&",
      OperatorName::LogicalNot => "!",
      OperatorName::LogicalOr => "||",
      OperatorName::Multiplication => "*",
      OperatorName::NullishCoalescing => "??",
      OperatorName::PostfixDecrement | OperatorName::PrefixDecrement => "--",
      OperatorName::PostfixIncrement | OperatorName::PrefixIncrement => "++",
      OperatorName::Remainder => "%",
      OperatorName::StrictEquality => "===",
      OperatorName::StrictInequality => "!==",
      OperatorName::Subtraction => "-",
      OperatorName::Typeof => "typeof",
      OperatorName::UnaryNegation => "-",
      OperatorName::UnaryPlus => "+",
      OperatorName::Void => "void",
      _ => return None,
    })
  }
}

pub struct Operator {
  pub name: OperatorName,
  pub precedence: u8,
  pub associativity: Associativity,
}

#[rustfmt::skip]
pub static OPERATORS: Lazy<HashMap<OperatorName, Operator>> = Lazy::new(|| {
  let mut map = HashMap::<OperatorName, Operator>::new();
  let mut add = |name: OperatorName, precedence: u8, associativity: Associativity| {
    map.insert(name, Operator { name, precedence, associativity });
  };
  use Associativity::*;
  use OperatorName::*;
  add(Comma, 1, Left);
  for name in [
    Assignment, AssignmentAddition, AssignmentBitwiseAnd, AssignmentBitwiseLeftShift,
    AssignmentBitwiseOr, AssignmentBitwiseRightShift, AssignmentBitwiseUnsignedRightShift,
    AssignmentBitwiseXor, AssignmentDivision, AssignmentExponentiation, AssignmentLogicalAnd,
    AssignmentLogicalOr, AssignmentMultiplication, AssignmentNullishCoalescing,
    AssignmentRemainder, AssignmentSubtraction, Yield, YieldDelegated,
  ] {
    add(name, 2, Right);
  }
  add(Conditional, 3, Right);
  add(LogicalOr, 4, Left);
  add(NullishCoalescing, 4, Left);
  add(LogicalAnd, 5, Left);
  add(BitwiseOr, 6, Left);
  add(BitwiseXor, 7, Left);
  add(BitwiseAnd, 8, Left);
  for name in [Equality, Inequality, StrictEquality, StrictInequality] {
    add(name, 9, Left);
  }
  for name in [LessThan, LessThanOrEqual, GreaterThan, GreaterThanOrEqual, In, Instanceof] {
    add(name, 10, Left);
  }
  for name in [BitwiseLeftShift, BitwiseRightShift, BitwiseUnsignedRightShift] {
    add(name, 11, Left);
  }
  add(Addition, 12, Left);
  add(Subtraction, 12, Left);
  add(Multiplication, 13, Left);
  add(Division, 13, Left);
  add(Remainder, 13, Left);
  add(Exponentiation, 14, Right);
  for name in [
    Await, BitwiseNot, Delete, LogicalNot, PrefixDecrement, PrefixIncrement, Typeof,
    UnaryNegation, UnaryPlus, Void,
  ] {
    add(name, 15, Right);
  }
  add(PostfixDecrement, 16, Left);
  add(PostfixIncrement, 16, Left);
  add(New, 17, Right);
  for name in [
    Call, ComputedMemberAccess, MemberAccess, OptionalChainingCall,
    OptionalChainingComputedMemberAccess, OptionalChainingMemberAccess,
  ] {
    add(name, 18, Left);
  }
  map
});
