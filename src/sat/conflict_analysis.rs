#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::sat::clause::{Clause, LiteralStorage};
use crate::sat::literal::{Literal, Variable};
use crate::sat::trail::{Reason, Trail};
use smallvec::smallvec;

/// Result of analysing a conflict at a non-root decision level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Asserting clause: position 0 holds the negated first UIP, position 1 (if
    /// any) a literal of the highest remaining decision level.
    pub learnt: LiteralStorage,
    pub backtrack_level: usize,
    /// Variables taking part in the resolution, to be bumped.
    pub involved: Vec<Variable>,
}

/// First-UIP conflict analysis.
///
/// Resolves the conflicting clause with the reasons of current-level literals,
/// walking the trail backwards, until exactly one current-level literal is left.
///
/// `seen` must have one slot per variable and be all `false`; it is left that way.
///
/// # Panics
///
/// If called at decision level 0, or if the trail and reasons are inconsistent
/// (a decision literal reached while more than one current-level literal is open).
#[must_use]
pub fn analyse_conflict(
    clauses: &[Clause],
    trail: &Trail,
    seen: &mut [bool],
    conflict: usize,
) -> Analysis {
    let level = trail.decision_level();
    assert!(level > 0, "conflict analysis at the root level");

    let mut learnt: LiteralStorage = smallvec![Literal::default()];
    let mut involved = Vec::new();
    let mut open = 0_usize;
    let mut index = trail.len();
    let mut clause = &clauses[conflict];
    let mut skip = 0;

    let uip = loop {
        for &lit in clause.iter().skip(skip) {
            let var = lit.variable();
            if seen[var as usize] || trail.level(var) == 0 {
                continue;
            }
            seen[var as usize] = true;
            involved.push(var);
            if trail.level(var) >= level {
                open += 1;
            } else {
                learnt.push(lit);
            }
        }

        let lit = loop {
            index -= 1;
            if seen[trail[index].variable() as usize] {
                break trail[index];
            }
        };
        seen[lit.variable() as usize] = false;
        open -= 1;
        if open == 0 {
            break lit;
        }

        match trail.reason(lit.variable()) {
            Reason::Clause(reason) => {
                clause = &clauses[reason];
                skip = 1;
            }
            Reason::Decision | Reason::Unit => unreachable!("resolved past a decision"),
        }
    };
    learnt[0] = !uip;

    for lit in learnt.iter().skip(1) {
        seen[lit.variable() as usize] = false;
    }

    let mut backtrack_level = 0;
    if learnt.len() > 1 {
        let (best, max_level) = learnt
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, l)| (i, trail.level(l.variable())))
            .max_by_key(|&(_, l)| l)
            .unwrap_or((1, 0));
        learnt.swap(1, best);
        backtrack_level = max_level;
    }

    Analysis {
        learnt,
        backtrack_level,
        involved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_uip_clause() {
        // (¬1 ∨ 2), (¬1 ∨ 3), (¬2 ∨ ¬3 ∨ ¬4) with 4 decided at level 1 and 1 at level 2.
        let clauses = vec![
            Clause::from(vec![2, -1]),
            Clause::from(vec![3, -1]),
            Clause::from(vec![-2, -3, -4]),
        ];
        let mut trail = Trail::new(4);
        trail.new_decision_level();
        trail.push(Literal::from(4), Reason::Decision);
        trail.new_decision_level();
        trail.push(Literal::from(1), Reason::Decision);
        trail.push(Literal::from(2), Reason::Clause(0));
        trail.push(Literal::from(3), Reason::Clause(1));

        let mut seen = vec![false; 5];
        let analysis = analyse_conflict(&clauses, &trail, &mut seen, 2);

        assert_eq!(analysis.learnt[0], Literal::from(-1));
        assert_eq!(analysis.learnt[1], Literal::from(-4));
        assert_eq!(analysis.learnt.len(), 2);
        assert_eq!(analysis.backtrack_level, 1);
        assert!(seen.iter().all(|&s| !s));
    }

    #[test]
    fn test_unit_learnt_clause_backtracks_to_root() {
        // (¬1 ∨ 2), (¬1 ∨ ¬2) with 1 decided at level 1.
        let clauses = vec![Clause::from(vec![2, -1]), Clause::from(vec![-1, -2])];
        let mut trail = Trail::new(2);
        trail.new_decision_level();
        trail.push(Literal::from(1), Reason::Decision);
        trail.push(Literal::from(2), Reason::Clause(0));

        let mut seen = vec![false; 3];
        let analysis = analyse_conflict(&clauses, &trail, &mut seen, 1);

        assert_eq!(analysis.learnt.as_slice(), &[Literal::from(-1)]);
        assert_eq!(analysis.backtrack_level, 0);
    }
}
