#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::sat::assignment::Assignment;
use crate::sat::literal::Variable;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::ops::Index;

const DEFAULT_DECAY: f64 = 0.95;
const RESCALE_LIMIT: f64 = 1e100;

/// Activity-based decision heuristic.
///
/// Variables seen during conflict analysis are bumped by a growing increment,
/// so recent conflicts weigh more than old ones without touching every score on
/// decay. Unassigned variables live in a lazily maintained max-heap: stale
/// entries are discarded when popped.
#[derive(Debug, Clone)]
pub struct Vsids {
    activity: Vec<f64>,
    increment: f64,
    heap: BinaryHeap<(OrderedFloat<f64>, Reverse<Variable>)>,
}

impl Index<Variable> for Vsids {
    type Output = f64;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.activity[index as usize]
    }
}

impl Default for Vsids {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Vsids {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        let mut vsids = Self {
            activity: Vec::new(),
            increment: 1.0,
            heap: BinaryHeap::new(),
        };
        vsids.grow(num_vars);
        vsids
    }

    pub fn grow(&mut self, num_vars: usize) {
        let old = self.activity.len().max(1);
        if self.activity.len() < num_vars + 1 {
            self.activity.resize(num_vars + 1, 0.0);
            for var in old..=num_vars {
                self.push(var_of(var));
            }
        }
    }

    fn push(&mut self, var: Variable) {
        self.heap
            .push((OrderedFloat(self.activity[var as usize]), Reverse(var)));
    }

    pub fn bump(&mut self, var: Variable) {
        self.activity[var as usize] += self.increment;
        if self.activity[var as usize] > RESCALE_LIMIT {
            self.rescale();
        }
        self.push(var);
    }

    pub fn decay(&mut self) {
        self.increment /= DEFAULT_DECAY;
    }

    /// Puts a variable back among the candidates after it was unassigned.
    pub fn reinsert(&mut self, var: Variable) {
        self.push(var);
    }

    /// Highest-activity unassigned variable, ties broken by lowest index.
    #[allow(clippy::float_cmp)]
    pub fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        if self.heap.len() > 8 * self.activity.len() {
            self.rebuild(assignment);
        }

        while let Some((activity, Reverse(var))) = self.heap.pop() {
            if assignment.is_assigned(var) || activity.0 != self.activity[var as usize] {
                continue;
            }
            return Some(var);
        }
        None
    }

    fn rescale(&mut self) {
        for activity in &mut self.activity {
            *activity /= RESCALE_LIMIT;
        }
        self.increment /= RESCALE_LIMIT;

        let vars: Vec<Variable> = self.heap.drain().map(|(_, Reverse(v))| v).collect();
        for var in vars {
            self.push(var);
        }
    }

    fn rebuild(&mut self, assignment: &Assignment) {
        self.heap.clear();
        for var in 1..self.activity.len() {
            let var = var_of(var);
            if !assignment.is_assigned(var) {
                self.push(var);
            }
        }
    }
}

fn var_of(index: usize) -> Variable {
    Variable::try_from(index).unwrap_or(Variable::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::Literal;

    #[test]
    fn test_pick_prefers_bumped() {
        let assignment = Assignment::new(4);
        let mut vsids = Vsids::new(4);
        vsids.bump(3);
        vsids.decay();
        vsids.bump(2);
        vsids.bump(2);
        assert_eq!(vsids.pick(&assignment), Some(2));
        assert_eq!(vsids.pick(&assignment), Some(3));
        assert_eq!(vsids.pick(&assignment), Some(1));
    }

    #[test]
    fn test_pick_skips_assigned_and_reinserts() {
        let mut assignment = Assignment::new(2);
        let mut vsids = Vsids::new(2);
        assignment.assign(Literal::from(1));
        assert_eq!(vsids.pick(&assignment), Some(2));
        assignment.assign(Literal::from(2));
        assert_eq!(vsids.pick(&assignment), None);

        assignment.unassign(1);
        vsids.reinsert(1);
        assert_eq!(vsids.pick(&assignment), Some(1));
    }

    #[test]
    fn test_rescale_keeps_order() {
        let assignment = Assignment::new(2);
        let mut vsids = Vsids::new(2);
        vsids.activity[1] = RESCALE_LIMIT;
        vsids.bump(1);
        assert!(vsids[1] <= 2.0);
        assert_eq!(vsids.pick(&assignment), Some(1));
    }
}
