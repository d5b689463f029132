use thiserror::Error;

/// Failures raised inside the solver core.
///
/// Only `EmptyClause` and `UnknownVariable` are caused by the caller.
/// `RootConflict` is consumed by the search loop and turned into an
/// unsatisfiable verdict; the other variants are broken invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CdclError {
    #[error("variable {variable} is already assigned the opposite value")]
    Conflict { variable: usize },

    #[error("conflict at decision level 0")]
    RootConflict,

    #[error("clause is empty after simplification")]
    EmptyClause,

    #[error("variable {variable} is outside 1..={num_vars}")]
    UnknownVariable { variable: usize, num_vars: usize },

    #[error("implied variable {variable} has no reason clause")]
    MissingReason { variable: usize },
}

pub type Result<T> = std::result::Result<T, CdclError>;
