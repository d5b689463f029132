use std::fs;
use std::path::{Path, PathBuf};

use dimacs::{parse_dimacs, Instance, Loc, Sign};
use thiserror::Error;

use crate::cdcl::Literal;

/// A CNF formula as read from a DIMACS file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
    pub num_vars: usize,
    pub clauses: Vec<Vec<Literal>>,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("line {line}: literal {literal} is outside the {num_vars} declared variables")]
    LiteralOutOfRange {
        line: u64,
        literal: i64,
        num_vars: usize,
    },

    #[error("expected a CNF instance, found a SAT formula")]
    NotCnf,
}

pub fn read_from_file<P: AsRef<Path>>(dimacs_filename: P) -> Result<Cnf, FormatError> {
    let path = dimacs_filename.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_from_string(&contents)
}

pub fn read_from_string(contents: &str) -> Result<Cnf, FormatError> {
    let (num_vars, clauses) = match parse_dimacs(contents) {
        Ok(Instance::Cnf { num_vars, clauses }) => (num_vars as usize, clauses),
        Ok(Instance::Sat { .. }) => return Err(FormatError::NotCnf),
        Err(err) => {
            return Err(FormatError::Malformed {
                line: line_of(&err.loc),
                message: format!("{:?}", err.kind),
            })
        }
    };
    check_literal_range(contents, num_vars)?;

    let mut cnf_vec: Vec<Vec<Literal>> = Vec::with_capacity(clauses.len());
    for clause in clauses.iter() {
        let mut clause_vec = Vec::with_capacity(clause.lits().len());
        for l in clause.lits().iter() {
            let variable = l.var().to_u64() as usize;
            let polarity = match l.sign() {
                Sign::Neg => false,
                Sign::Pos => true,
            };
            clause_vec.push(Literal::new(variable, polarity));
        }
        cnf_vec.push(clause_vec);
    }
    Ok(Cnf {
        num_vars,
        clauses: cnf_vec,
    })
}

// `Loc` does not expose its fields; its derived Debug form is
// `Loc { line: L, col: C }`.
fn line_of(loc: &Loc) -> u64 {
    let debug = format!("{loc:?}");
    debug
        .split_once("line:")
        .and_then(|(_, rest)| {
            rest.trim_start()
                .split(|c: char| !c.is_ascii_digit())
                .next()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// Walks the clause lines of an input `parse_dimacs` accepted and rejects the
/// first literal over a variable outside `1..=num_vars`.
fn check_literal_range(contents: &str, num_vars: usize) -> Result<(), FormatError> {
    for (i, line) in contents.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('c') || trimmed.starts_with('p') {
            continue;
        }
        // "- 3" lexes as the literal -3
        let mut negate = false;
        for token in trimmed.split_whitespace() {
            if token == "-" {
                negate = true;
                continue;
            }
            let Ok(value) = token.parse::<i64>() else {
                negate = false;
                continue;
            };
            let literal = if negate { -value } else { value };
            negate = false;
            if literal.unsigned_abs() > num_vars as u64 {
                return Err(FormatError::LiteralOutOfRange {
                    line: i as u64 + 1,
                    literal,
                    num_vars,
                });
            }
        }
    }
    Ok(())
}
