//! A classical planner for grounded STRIPS-style problems with conditional
//! effects.
//!
//! Plans are found either by weighted A* over the explicit state space or by
//! encoding bounded plan existence as CNF and handing it to a CDCL solver.

/// Problem model, heuristics, forward search and the planning-as-SAT pipeline.
pub mod planning;

/// The CDCL SAT solver and its CNF and DIMACS types.
pub mod sat;
