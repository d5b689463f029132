//! A conflict-driven clause learning SAT solver.
//!
//! [`cdcl`] holds the solver core; [`parser`] reads DIMACS CNF files into
//! clauses the core accepts.

pub mod cdcl;
pub mod parser;

pub use cdcl::{CdclError, Literal, Model, SolveResult, Solver, SolverConfig};
pub use parser::{Cnf, FormatError};
