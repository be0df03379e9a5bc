use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;
use std::cmp::{max, min};
use std::ops::{Add, AddAssign};

/// A location within the current source file expressed as UTF-8 byte offsets.
///
/// Nodes created by the rewriter don't exist in the source; they get an empty location at the
/// point where they are spliced in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  /// An empty location at `offset`.
  pub fn at(offset: usize) -> Loc {
    Loc(offset, offset)
  }

  pub fn error(self, typ: SyntaxErrorType, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual_token)
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }

  pub fn add_option(self, rhs: Option<Loc>) -> Loc {
    let mut new = self;
    if let Some(rhs) = rhs {
      new.extend(rhs);
    };
    new
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}

#[cfg(test)]
mod tests {
  use super::Loc;

  #[test]
  fn adding_locs_covers_both() {
    assert_eq!(Loc(4, 6) + Loc(1, 3), Loc(1, 6));
    let mut loc = Loc(2, 3);
    loc += Loc(2, 9);
    assert_eq!(loc, Loc(2, 9));
    assert_eq!(Loc(5, 5).add_option(None), Loc(5, 5));
  }

  #[test]
  fn empty_locs() {
    assert!(Loc::at(7).is_empty());
    assert_eq!(Loc::at(7).len(), 0);
    assert_eq!(Loc(3, 8).len(), 5);
  }
}
