#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::planning::error::ValidationError;
use crate::planning::problem::Problem;
use crate::planning::state::State;
use std::fmt::{Display, Formatter};

/// A sequential plan: action indices, earliest first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Plan(Vec<usize>);

impl Plan {
    #[must_use]
    pub const fn new(actions: Vec<usize>) -> Self {
        Self(actions)
    }

    #[must_use]
    pub fn actions(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Runs the plan from the initial state.
    ///
    /// # Errors
    ///
    /// `ValidationError` naming the first step whose action is unknown or not
    /// applicable, or `GoalNotReached` if the final state misses the goal.
    ///
    /// # Returns
    ///
    /// The final state.
    pub fn validate(&self, problem: &Problem) -> Result<State, ValidationError> {
        let mut state = problem.initial_state().clone();
        for (step, index) in self.iter().enumerate() {
            let action = problem
                .action(index)
                .ok_or(ValidationError::UnknownAction {
                    step,
                    action: index,
                })?;
            if !action.is_applicable(&state) {
                return Err(ValidationError::NotApplicable {
                    step,
                    action: action.name().to_string(),
                });
            }
            state = action.successor(&state);
        }

        if state.satisfies(problem.goal()) {
            Ok(state)
        } else {
            Err(ValidationError::GoalNotReached)
        }
    }

    /// Renders the plan with action names, one step per line.
    #[must_use]
    pub const fn display<'a>(&'a self, problem: &'a Problem) -> PlanDisplay<'a> {
        PlanDisplay {
            plan: self,
            problem,
        }
    }
}

impl From<Vec<usize>> for Plan {
    fn from(actions: Vec<usize>) -> Self {
        Self(actions)
    }
}

impl FromIterator<usize> for Plan {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Why a strategy stopped without a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPlanReason {
    /// Every reachable state was expanded.
    Exhausted,
    Timeout,
    /// No plan with at most this many steps exists.
    HorizonExhausted { max_horizon: usize },
}

impl Display for NoPlanReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted => write!(f, "search space exhausted"),
            Self::Timeout => write!(f, "time budget exceeded"),
            Self::HorizonExhausted { max_horizon } => {
                write!(f, "no plan within {max_horizon} steps")
            }
        }
    }
}

/// Result of a planning run that completed without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    Found(Plan),
    NoPlan(NoPlanReason),
}

impl PlanOutcome {
    #[must_use]
    pub const fn plan(&self) -> Option<&Plan> {
        match self {
            Self::Found(plan) => Some(plan),
            Self::NoPlan(_) => None,
        }
    }

    #[must_use]
    pub fn into_plan(self) -> Option<Plan> {
        match self {
            Self::Found(plan) => Some(plan),
            Self::NoPlan(_) => None,
        }
    }
}

pub struct PlanDisplay<'a> {
    plan: &'a Plan,
    problem: &'a Problem,
}

impl Display for PlanDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = self.plan.len().saturating_sub(1).to_string().len();
        for (step, index) in self.plan.iter().enumerate() {
            match self.problem.action(index) {
                Some(action) => writeln!(f, "{step:>width$}: ({})", action.name())?,
                None => writeln!(f, "{step:>width$}: (#{index})")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::action::Action;
    use crate::planning::condition::{Condition, ConditionalEffect, Effect};

    fn light() -> Problem {
        let turn_on = Action::new(
            "turn-on",
            Condition::new([], [0]),
            vec![ConditionalEffect::unconditional(Effect::new([0], []))],
        );
        Problem::new(
            vec!["on".to_string()],
            vec![turn_on],
            State::new(1),
            Condition::new([0], []),
        )
        .unwrap()
    }

    #[test]
    fn test_validate() {
        let problem = light();
        assert!(Plan::new(vec![0]).validate(&problem).unwrap().holds(0));
        assert_eq!(
            Plan::default().validate(&problem),
            Err(ValidationError::GoalNotReached)
        );
        assert_eq!(
            Plan::new(vec![0, 0]).validate(&problem),
            Err(ValidationError::NotApplicable {
                step: 1,
                action: "turn-on".to_string()
            })
        );
        assert_eq!(
            Plan::new(vec![3]).validate(&problem),
            Err(ValidationError::UnknownAction { step: 0, action: 3 })
        );
    }

    #[test]
    fn test_display() {
        let problem = light();
        assert_eq!(Plan::new(vec![0]).display(&problem).to_string(), "0: (turn-on)\n");
        assert_eq!(Plan::default().display(&problem).to_string(), "");
    }
}
