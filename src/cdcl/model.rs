use std::fmt;

use super::literal::Literal;

/// Satisfying assignment, one value per variable `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub fn new(values: Vec<bool>) -> Model {
        Model { values }
    }

    pub fn num_vars(&self) -> usize {
        self.values.len()
    }

    /// Value of `variable`, `None` outside `1..=N`.
    pub fn value(&self, variable: usize) -> Option<bool> {
        variable
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .copied()
    }

    pub fn satisfies(&self, literal: Literal) -> bool {
        self.value(literal.variable) == Some(literal.polarity)
    }

    pub fn satisfies_clause(&self, clause: &[Literal]) -> bool {
        clause.iter().any(|&l| self.satisfies(l))
    }

    pub fn satisfies_all<'a, I>(&self, clauses: I) -> bool
    where
        I: IntoIterator<Item = &'a Vec<Literal>>,
    {
        clauses.into_iter().all(|c| self.satisfies_clause(c))
    }

    /// The model as true literals, in variable order.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &b)| Literal::new(i + 1, b))
    }
}

/// DIMACS value line: `v 1 -2 3 0`.
impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v")?;
        for lit in self.literals() {
            write!(f, " {}", lit)?;
        }
        write!(f, " 0")
    }
}

/// Verdict of one `solve` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Satisfiable(Model),
    Unsatisfiable,
    /// Stopped by the interrupt flag or the conflict budget.
    Interrupted,
}

impl SolveResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveResult::Satisfiable(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SolveResult::Unsatisfiable)
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            SolveResult::Satisfiable(model) => Some(model),
            _ => None,
        }
    }
}

/// Solver statistics, accumulated over every `solve` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
    pub restarts: u64,
    pub learned_clauses: u64,
    pub deleted_clauses: u64,
    pub reductions: u64,
}
