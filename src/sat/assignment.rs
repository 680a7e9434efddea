#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::literal::{Literal, Variable};
use core::ops::Index;

#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash)]
pub enum VarState {
    #[default]
    Unassigned,
    Assigned(bool),
}

impl VarState {
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    #[must_use]
    pub const fn value(self) -> Option<bool> {
        match self {
            Self::Assigned(b) => Some(b),
            Self::Unassigned => None,
        }
    }
}

/// Current truth value of every variable, indexed by variable (slot 0 unused).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl Assignment {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars + 1])
    }

    pub fn grow(&mut self, num_vars: usize) {
        if self.0.len() < num_vars + 1 {
            self.0.resize(num_vars + 1, VarState::Unassigned);
        }
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn assign(&mut self, lit: Literal) {
        self.0[lit.variable() as usize] = VarState::Assigned(lit.polarity());
    }

    pub fn unassign(&mut self, var: Variable) {
        self.0[var as usize] = VarState::Unassigned;
    }

    #[must_use]
    pub fn is_assigned(&self, var: Variable) -> bool {
        self[var].is_assigned()
    }

    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        self.0.get(var as usize).and_then(|s| s.value())
    }

    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(lit.variable()).map(|b| b == lit.polarity())
    }

    /// Signed literals for every variable; unassigned variables are reported false.
    #[must_use]
    pub fn model(&self) -> Vec<i32> {
        self.0
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, s)| {
                let var = i32::try_from(i).unwrap_or(i32::MAX);
                if s.value() == Some(true) { var } else { -var }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_value() {
        let mut a = Assignment::new(3);
        a.assign(Literal::from(-2));
        assert_eq!(a.literal_value(Literal::from(2)), Some(false));
        assert_eq!(a.literal_value(Literal::from(-2)), Some(true));
        assert_eq!(a.literal_value(Literal::from(1)), None);

        a.unassign(2);
        assert!(!a.is_assigned(2));
    }

    #[test]
    fn test_model_lists_every_variable() {
        let mut a = Assignment::new(3);
        a.assign(Literal::from(1));
        a.assign(Literal::from(-3));
        assert_eq!(a.model(), vec![1, -2, -3]);
    }
}
