#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A line-oriented text format for grounded planning problems.
//!
//! ```text
//! c a light switch
//! fluent on
//! init
//! goal on
//! action turn-on
//! pre -on
//! eff on
//! end
//! ```
//!
//! Directives:
//! - `c ...` is a comment; blank lines are ignored;
//! - `fluent <name>...` declares fluents, in index order;
//! - `init <name>...` lists the fluents true initially, all others are false;
//! - `goal <lit>...` adds literals to the goal;
//! - `action <name>` opens an action block, closed by `end`;
//! - inside a block, `pre <lit>...` adds precondition literals, `eff <lit>...`
//!   adds an unconditional effect and `when <lit>... => <lit>...` a conditional
//!   one.
//!
//! A literal is a declared fluent name, negated by a leading `-`. Fluents must be
//! declared before they are used.

use crate::planning::action::Action;
use crate::planning::condition::{Condition, ConditionalEffect, Effect};
use crate::planning::error::ProblemError;
use crate::planning::problem::Problem;
use crate::planning::state::{FluentId, State};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read problem: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: unknown directive `{directive}`")]
    UnknownDirective { line: usize, directive: String },
    #[error("line {line}: `{directive}` is only allowed inside an action block")]
    OutsideAction { line: usize, directive: String },
    #[error("line {line}: `{directive}` is not allowed inside an action block")]
    InsideAction { line: usize, directive: String },
    #[error("line {line}: unknown fluent `{name}`")]
    UnknownFluent { line: usize, name: String },
    #[error("line {line}: fluent `{name}` declared twice")]
    DuplicateFluent { line: usize, name: String },
    #[error("line {line}: `{name}` is not a valid fluent name")]
    InvalidFluentName { line: usize, name: String },
    #[error("line {line}: action `{name}` declared twice")]
    DuplicateAction { line: usize, name: String },
    #[error("line {line}: missing name after `{directive}`")]
    MissingName { line: usize, directive: String },
    #[error("line {line}: conditional effect needs `=>` between guard and effect")]
    MissingArrow { line: usize },
    #[error("line {line}: initial state lists fluents only, found `{name}`")]
    NegativeInit { line: usize, name: String },
    #[error("action `{name}` opened on line {line} has no `end`")]
    UnterminatedAction { line: usize, name: String },
    #[error(transparent)]
    Problem(#[from] ProblemError),
}

#[derive(Default)]
struct Literals {
    positive: Vec<FluentId>,
    negative: Vec<FluentId>,
}

impl Literals {
    fn condition(&self) -> Condition {
        Condition::new(self.positive.iter().copied(), self.negative.iter().copied())
    }

    fn effect(&self) -> Effect {
        Effect::new(self.positive.iter().copied(), self.negative.iter().copied())
    }
}

struct ActionBlock {
    name: String,
    line: usize,
    precondition: Literals,
    effects: Vec<ConditionalEffect>,
}

#[derive(Default)]
struct Builder {
    fluents: Vec<String>,
    index: FxHashMap<String, FluentId>,
    init: Vec<FluentId>,
    goal: Literals,
    actions: Vec<Action>,
    action_names: FxHashSet<String>,
}

impl Builder {
    fn literals<'a>(
        &self,
        line: usize,
        tokens: impl Iterator<Item = &'a str>,
    ) -> Result<Literals, ParseError> {
        let mut literals = Literals::default();
        for token in tokens {
            let (name, positive) = token
                .strip_prefix('-')
                .map_or((token, true), |name| (name, false));
            let fluent = *self.index.get(name).ok_or_else(|| ParseError::UnknownFluent {
                line,
                name: name.to_string(),
            })?;
            if positive {
                literals.positive.push(fluent);
            } else {
                literals.negative.push(fluent);
            }
        }
        Ok(literals)
    }

    fn declare(&mut self, line: usize, name: &str) -> Result<(), ParseError> {
        if name.starts_with('-') || name == "=>" {
            return Err(ParseError::InvalidFluentName {
                line,
                name: name.to_string(),
            });
        }
        if self.index.contains_key(name) {
            return Err(ParseError::DuplicateFluent {
                line,
                name: name.to_string(),
            });
        }
        self.index.insert(name.to_string(), self.fluents.len());
        self.fluents.push(name.to_string());
        Ok(())
    }
}

/// Parses a problem from a `BufRead` source.
///
/// # Errors
///
/// `ParseError` with the offending line number for malformed input, or
/// `ParseError::Io` if reading fails.
pub fn parse_problem<R: BufRead>(reader: R) -> Result<Problem, ParseError> {
    let mut builder = Builder::default();
    let mut block: Option<ActionBlock> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_str = line?;
        let line = index + 1;
        let mut parts = line_str.split_whitespace();

        let Some(directive) = parts.next() else {
            continue;
        };

        match (directive, block.as_mut()) {
            ("c", _) => {}
            ("fluent" | "init" | "goal" | "action", Some(_)) => {
                return Err(ParseError::InsideAction {
                    line,
                    directive: directive.to_string(),
                });
            }
            ("pre" | "eff" | "when" | "end", None) => {
                return Err(ParseError::OutsideAction {
                    line,
                    directive: directive.to_string(),
                });
            }
            ("fluent", None) => {
                for name in parts {
                    builder.declare(line, name)?;
                }
            }
            ("init", None) => {
                let literals = builder.literals(line, parts)?;
                if let Some(&fluent) = literals.negative.first() {
                    return Err(ParseError::NegativeInit {
                        line,
                        name: format!("-{}", builder.fluents[fluent]),
                    });
                }
                builder.init.extend(literals.positive);
            }
            ("goal", None) => {
                let literals = builder.literals(line, parts)?;
                builder.goal.positive.extend(literals.positive);
                builder.goal.negative.extend(literals.negative);
            }
            ("action", None) => {
                let name = parts.next().ok_or_else(|| ParseError::MissingName {
                    line,
                    directive: directive.to_string(),
                })?;
                if !builder.action_names.insert(name.to_string()) {
                    return Err(ParseError::DuplicateAction {
                        line,
                        name: name.to_string(),
                    });
                }
                block = Some(ActionBlock {
                    name: name.to_string(),
                    line,
                    precondition: Literals::default(),
                    effects: Vec::new(),
                });
            }
            ("pre", Some(current)) => {
                let literals = builder.literals(line, parts)?;
                current.precondition.positive.extend(literals.positive);
                current.precondition.negative.extend(literals.negative);
            }
            ("eff", Some(current)) => {
                let effect = builder.literals(line, parts)?.effect();
                current.effects.push(ConditionalEffect::unconditional(effect));
            }
            ("when", Some(current)) => {
                let tokens: Vec<&str> = parts.collect();
                let arrow = tokens
                    .iter()
                    .position(|&t| t == "=>")
                    .ok_or(ParseError::MissingArrow { line })?;
                let guard = builder.literals(line, tokens[..arrow].iter().copied())?;
                let effect = builder.literals(line, tokens[arrow + 1..].iter().copied())?;
                current
                    .effects
                    .push(ConditionalEffect::new(guard.condition(), effect.effect()));
            }
            ("end", Some(_)) => {
                if let Some(done) = block.take() {
                    builder.actions.push(Action::new(
                        done.name,
                        done.precondition.condition(),
                        done.effects,
                    ));
                }
            }
            (other, _) => {
                return Err(ParseError::UnknownDirective {
                    line,
                    directive: other.to_string(),
                });
            }
        }
    }

    if let Some(open) = block {
        return Err(ParseError::UnterminatedAction {
            line: open.line,
            name: open.name,
        });
    }

    let num_fluents = builder.fluents.len();
    let problem = Problem::new(
        builder.fluents,
        builder.actions,
        State::from_fluents(num_fluents, builder.init),
        builder.goal.condition(),
    )?;
    Ok(problem)
}

/// Opens and parses a problem file.
///
/// # Errors
///
/// See [`parse_problem`].
pub fn parse_problem_file(path: &Path) -> Result<Problem, ParseError> {
    let file = File::open(path)?;
    parse_problem(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LIGHT: &str = "\
c a light switch
fluent on

init
goal on
action turn-on
  pre -on
  eff on
end
";

    fn parse(input: &str) -> Result<Problem, ParseError> {
        parse_problem(Cursor::new(input))
    }

    #[test]
    fn test_parse_light() {
        let problem = parse(LIGHT).unwrap();
        assert_eq!(problem.num_fluents(), 1);
        assert_eq!(problem.num_actions(), 1);
        assert!(!problem.initial_state().holds(0));
        assert_eq!(problem.goal(), &Condition::new([0], []));

        let action = &problem.actions()[0];
        assert_eq!(action.name(), "turn-on");
        assert_eq!(action.precondition(), &Condition::new([], [0]));
        assert_eq!(action.effects().len(), 1);
        assert!(action.effects()[0].is_unconditional());
    }

    #[test]
    fn test_parse_conditional_effects() {
        let input = "\
fluent a b c
init a
goal c -a
action go
when a -b => c -a
when => b
end
";
        let problem = parse(input).unwrap();
        let effects = problem.actions()[0].effects();
        assert_eq!(effects[0].guard, Condition::new([0], [1]));
        assert_eq!(effects[0].effect, Effect::new([2], [0]));
        assert!(effects[1].is_unconditional());
        assert_eq!(problem.goal(), &Condition::new([2], [0]));
        assert_eq!(problem.initial_state(), &State::from_fluents(3, [0]));
    }

    #[test]
    fn test_unknown_fluent() {
        let err = parse("fluent a\ngoal b\n").unwrap_err();
        assert!(matches!(err, ParseError::UnknownFluent { line: 2, ref name } if name == "b"));
    }

    #[test]
    fn test_duplicates() {
        assert!(matches!(
            parse("fluent a a\n").unwrap_err(),
            ParseError::DuplicateFluent { line: 1, .. }
        ));
        assert!(matches!(
            parse("fluent a\naction x\nend\naction x\nend\n").unwrap_err(),
            ParseError::DuplicateAction { line: 4, .. }
        ));
    }

    #[test]
    fn test_block_structure() {
        assert!(matches!(
            parse("fluent a\npre a\n").unwrap_err(),
            ParseError::OutsideAction { line: 2, .. }
        ));
        assert!(matches!(
            parse("fluent a\naction x\ngoal a\n").unwrap_err(),
            ParseError::InsideAction { line: 3, .. }
        ));
        assert!(matches!(
            parse("fluent a\naction x\neff a\n").unwrap_err(),
            ParseError::UnterminatedAction { line: 2, .. }
        ));
        assert!(matches!(
            parse("action\n").unwrap_err(),
            ParseError::MissingName { line: 1, .. }
        ));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            parse("fluent a\naction x\nwhen a a\nend\n").unwrap_err(),
            ParseError::MissingArrow { line: 3 }
        ));
        assert!(matches!(
            parse("fluent a\ninit -a\n").unwrap_err(),
            ParseError::NegativeInit { line: 2, .. }
        ));
        assert!(matches!(
            parse("fluent -a\n").unwrap_err(),
            ParseError::InvalidFluentName { line: 1, .. }
        ));
        assert!(matches!(
            parse("bogus\n").unwrap_err(),
            ParseError::UnknownDirective { line: 1, .. }
        ));
    }
}
