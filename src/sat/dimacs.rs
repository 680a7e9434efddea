#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading and writing the DIMACS CNF format.
//!
//! The format is line based:
//! - comment lines start with `c`;
//! - a problem line `p cnf <num_variables> <num_clauses>` precedes the clauses;
//! - every other line holds whitespace separated signed integers terminated by `0`.
//!
//! Encodings are exported in this format so they can be handed to any external
//! solver, and the reader is used to load small formulas when testing the solver.

use crate::sat::cnf::Cnf;
use itertools::Itertools;
use std::fmt::{self, Formatter};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("failed to read DIMACS input: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: `{token}` is not a literal")]
    InvalidLiteral { line: usize, token: String },
}

/// Renders a formula as DIMACS text, header first.
///
/// # Errors
///
/// Propagates formatter errors.
pub fn format_dimacs(cnf: &Cnf, f: &mut Formatter<'_>) -> fmt::Result {
    writeln!(f, "p cnf {} {}", cnf.num_vars(), cnf.len())?;
    for clause in cnf.iter() {
        writeln!(f, "{} 0", clause.iter().join(" "))?;
    }
    Ok(())
}

/// Writes a formula in DIMACS format to `path`, creating or truncating the file.
///
/// # Errors
///
/// Returns any I/O error raised while creating or writing the file.
pub fn write_dimacs_file(cnf: &Cnf, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write!(writer, "{cnf}")?;
    writer.flush()
}

/// Parses DIMACS formatted data from a `BufRead` source.
///
/// Comment and problem lines are skipped; the variable count is taken from the
/// clauses themselves. A `%` line ends the input.
///
/// # Errors
///
/// `DimacsError::Io` if a line cannot be read, `DimacsError::InvalidLiteral` if
/// a clause line holds a token that is not an integer.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf, DimacsError> {
    let mut cnf = Cnf::new(0);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None | Some(&"c" | &"p") => {}
            Some(_) => {
                let literals = parts
                    .map(|token| {
                        token.parse::<i32>().map_err(|_| DimacsError::InvalidLiteral {
                            line: index + 1,
                            token: token.to_string(),
                        })
                    })
                    .filter_ok(|&lit| lit != 0)
                    .collect::<Result<Vec<_>, _>>()?;

                cnf.add_clause(literals);
            }
        }
    }

    Ok(cnf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_dimacs() {
        let input = "c comment\np cnf 3 2\n1 -3 0\n2 3 -1 0\n";
        let cnf = parse_dimacs(Cursor::new(input)).unwrap();
        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf.num_vars(), 3);
        assert_eq!(cnf[1].len(), 3);
    }

    #[test]
    fn test_parse_dimacs_stops_at_percent() {
        let input = "1 2 0\n%\n0\n";
        let cnf = parse_dimacs(Cursor::new(input)).unwrap();
        assert_eq!(cnf.len(), 1);
    }

    #[test]
    fn test_parse_dimacs_rejects_garbage() {
        let err = parse_dimacs(Cursor::new("1 x 0\n")).unwrap_err();
        assert!(matches!(err, DimacsError::InvalidLiteral { line: 1, .. }));
    }

    #[test]
    fn test_display_writes_header_and_terminators() {
        let cnf = Cnf::from(vec![vec![1, -2], vec![3]]);
        assert_eq!(cnf.to_string(), "p cnf 3 2\n1 -2 0\n3 0\n");
    }
}
