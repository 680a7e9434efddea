#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Grounded classical planning: problem model, forward search and the SAT
//! encoding.

pub mod action;
pub mod condition;
pub mod config;
pub mod decode;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod heuristic;
pub mod node;
pub mod open_list;
pub mod parser;
pub mod plan;
pub mod problem;
pub mod sat_plan;
pub mod search;
pub mod state;

pub use action::Action;
pub use condition::{Condition, ConditionalEffect, Effect};
pub use config::{SatConfig, SearchConfig};
pub use error::PlanningError;
pub use heuristic::{Heuristic, HeuristicType};
pub use parser::{parse_problem, parse_problem_file};
pub use plan::{NoPlanReason, Plan, PlanOutcome};
pub use problem::Problem;
pub use sat_plan::solve_plan_via_sat;
pub use search::search_plan;
pub use state::State;
