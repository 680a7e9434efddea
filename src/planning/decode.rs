#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::planning::encoding::{VarKind, VariableMap};
use crate::planning::error::DecodingError;
use crate::planning::plan::Plan;

/// Reads the plan out of a satisfying assignment.
///
/// For every step the true action variables are collected: none is an idle
/// step and is skipped, one is appended to the plan, more than one is an error.
/// Fluent variables and variables beyond the mapping are ignored, so a solver
/// may reserve more variables than the encoding uses.
///
/// # Arguments
///
/// * `model` - signed literals as returned by `SatSolver::model`.
/// * `variables` - the mapping the model's formula was built with.
///
/// # Errors
///
/// `DecodingError::MutexViolation` if two actions are true at the same step.
pub fn decode_model(model: &[i32], variables: &VariableMap) -> Result<Plan, DecodingError> {
    let mut chosen: Vec<Option<usize>> = vec![None; variables.horizon()];

    for &lit in model.iter().filter(|&&lit| lit > 0) {
        if let Some(VarKind::Action { action, step }) = variables.decode(lit.unsigned_abs()) {
            if let Some(first) = chosen[step] {
                return Err(DecodingError::MutexViolation {
                    step,
                    first,
                    second: action,
                });
            }
            chosen[step] = Some(action);
        }
    }

    Ok(chosen.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    // two fluents, two actions, horizon 3: action(a, t) = 4t + 3 + a, 14 variables
    fn map() -> VariableMap {
        VariableMap::new(2, 2, 3)
    }

    #[test]
    fn test_idle_steps_are_skipped() {
        let model: Vec<i32> = (1..=14)
            .map(|v| if v == 4 || v == 11 { v } else { -v })
            .collect();
        assert_eq!(decode_model(&model, &map()), Ok(Plan::new(vec![1, 0])));
    }

    #[test]
    fn test_fluents_are_ignored() {
        let model = vec![1, 2, 5, 6, 13, 14];
        assert_eq!(decode_model(&model, &map()), Ok(Plan::default()));
    }

    #[test]
    fn test_two_actions_at_one_step() {
        let model = vec![7, 8];
        assert_eq!(
            decode_model(&model, &map()),
            Err(DecodingError::MutexViolation {
                step: 1,
                first: 0,
                second: 1
            })
        );
    }

    #[test]
    fn test_variables_beyond_the_mapping_are_ignored() {
        assert_eq!(
            decode_model(&[3, -15, 99, 0, 1_000_000], &map()),
            Ok(Plan::new(vec![0]))
        );
    }
}
