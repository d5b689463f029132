use super::restart::{Geometric, Luby, RestartStrategy};

/// Restart schedule, in conflicts between restarts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestartPolicy {
    /// `unit` times the Luby sequence.
    Luby { unit: u64 },
    /// `first`, then each limit multiplied by `factor`.
    Geometric { first: u64, factor: f64 },
}

impl RestartPolicy {
    pub fn build(self) -> Box<dyn RestartStrategy + Send> {
        match self {
            RestartPolicy::Luby { unit } => Box::new(Luby::new(unit)),
            RestartPolicy::Geometric { first, factor } => Box::new(Geometric::new(first, factor)),
        }
    }
}

/// Tuning knobs of the search.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// VSIDS decay factor, in (0, 1).
    pub var_decay: f64,
    /// Learned clause activity decay factor, in (0, 1).
    pub clause_decay: f64,
    pub restart: RestartPolicy,
    /// Initial learned clause limit as a fraction of the original clauses.
    pub learned_ratio: f64,
    /// Lower bound for the initial learned clause limit.
    pub min_learned: usize,
    /// Growth of the learned clause limit after each reduction.
    pub learned_growth: f64,
    /// Conflicts allowed per `solve` call before giving up.
    pub max_conflicts: Option<u64>,
    /// Seed for randomised heuristics.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            var_decay: 0.95,
            clause_decay: 0.999,
            restart: RestartPolicy::Luby { unit: 100 },
            learned_ratio: 1.0 / 3.0,
            min_learned: 2000,
            learned_growth: 1.1,
            max_conflicts: None,
            seed: 0,
        }
    }
}
