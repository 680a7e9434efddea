#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use core::ops::{Neg, Not};
use std::fmt::{Display, Formatter};

pub type Variable = u32;

/// A signed propositional literal using the DIMACS sign convention: a positive
/// value asserts the variable, a negative value asserts its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Literal(i32);

impl Literal {
    /// # Panics
    ///
    /// If `var` does not fit in an `i32`.
    #[must_use]
    pub fn new(var: Variable, polarity: bool) -> Self {
        let var = i32::try_from(var).expect("literal variable overflowed");

        if polarity { Self(var) } else { Self(-var) }
    }

    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.unsigned_abs()
    }

    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn negated(self) -> Self {
        Self(-self.0)
    }

    /// Dense index used by per-literal tables: `2 * var` for the positive
    /// literal and `2 * var + 1` for the negative one.
    #[must_use]
    pub const fn index(self) -> usize {
        let var = self.variable() as usize;
        if self.polarity() { var * 2 } else { var * 2 + 1 }
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::from_i32(value)
    }
}

impl From<Literal> for i32 {
    fn from(lit: Literal) -> Self {
        lit.to_i32()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_neg() {
        assert_eq!(Literal::new(1, false).negated(), Literal::new(1, true));
        assert_eq!(!Literal::new(1, true), Literal::new(1, false));
        assert_eq!(-Literal::from_i32(-7), Literal::from_i32(7));
    }

    #[test]
    fn test_literal_parts() {
        let lit = Literal::from_i32(-12);
        assert_eq!(lit.variable(), 12);
        assert!(!lit.polarity());
        assert_eq!(lit.to_i32(), -12);
    }

    #[test]
    fn test_index_is_dense_and_distinct() {
        assert_eq!(Literal::new(3, true).index(), 6);
        assert_eq!(Literal::new(3, false).index(), 7);
        assert_ne!(Literal::new(4, true).index(), Literal::new(3, false).index());
    }
}
