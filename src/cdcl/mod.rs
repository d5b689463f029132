//! Conflict-driven clause learning core.
//!
//! Everything the search mutates lives in one [`Solver`] value: the clause
//! database, the watch lists, the assignment trail and the heuristic state.
//! The implication graph is never materialised. Reasons are clause indices
//! stored on the trail and conflict analysis walks the trail by position.

pub mod analysis;
pub mod assignment;
pub mod clause;
pub mod clause_db;
pub mod config;
pub mod decide_heuristics;
pub mod error;
pub mod literal;
pub mod model;
pub mod propagation;
pub mod restart;
pub mod search;
pub mod trail;
pub mod watchlist;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use analysis::Learned;
pub use assignment::Assignment;
pub use clause::Clause;
pub use clause_db::ClauseDatabase;
pub use config::{RestartPolicy, SolverConfig};
pub use decide_heuristics::{DecideHeuristic, MockDecideHeuristic, RandomDecideHeuristic, Vsids};
pub use error::{CdclError, Result};
pub use literal::Literal;
pub use model::{Model, SolveResult, SolverStats};
pub use search::SearchState;
pub use trail::Trail;

use restart::RestartStrategy;
use watchlist::WatchLists;

/// Position of a clause in the [`ClauseDatabase`].
pub type ClauseIndex = usize;

/// Cloneable flag that asks a running search to stop at its next decision.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    pub fn interrupt(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// A CDCL solver instance over variables `1..=num_vars`.
pub struct Solver<H: DecideHeuristic = Vsids> {
    num_vars: usize,
    clauses: ClauseDatabase,
    watches: WatchLists,
    trail: Trail,
    heuristic: H,
    restarts: Box<dyn RestartStrategy + Send>,
    config: SolverConfig,
    stats: SolverStats,
    /// Set once the clauses are known to be contradictory.
    unsat: bool,
    /// Scratch marks for conflict analysis, indexed by variable.
    seen: Vec<bool>,
    learned_limit: Option<f64>,
    conflicts_since_restart: u64,
    interrupt: InterruptHandle,
}

impl Solver<Vsids> {
    pub fn new(num_vars: usize) -> Self {
        Solver::with_config(num_vars, SolverConfig::default())
    }

    pub fn with_config(num_vars: usize, config: SolverConfig) -> Self {
        let heuristic = Vsids::new(num_vars, config.var_decay);
        Solver::with_heuristic(num_vars, config, heuristic)
    }
}

impl<H: DecideHeuristic> Solver<H> {
    pub fn with_heuristic(num_vars: usize, config: SolverConfig, heuristic: H) -> Self {
        Solver {
            num_vars,
            clauses: ClauseDatabase::new(config.clause_decay),
            watches: WatchLists::new(num_vars),
            trail: Trail::new(num_vars),
            heuristic,
            restarts: config.restart.build(),
            stats: SolverStats::default(),
            unsat: false,
            seen: vec![false; num_vars + 1],
            learned_limit: None,
            conflicts_since_restart: 0,
            interrupt: InterruptHandle::default(),
            config,
        }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn clauses(&self) -> &ClauseDatabase {
        &self.clauses
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    /// `false` once the clauses added so far are known to be contradictory.
    pub fn is_consistent(&self) -> bool {
        !self.unsat
    }

    fn check_variable(&self, variable: usize) -> Result<()> {
        if variable == 0 || variable > self.num_vars {
            return Err(CdclError::UnknownVariable {
                variable,
                num_vars: self.num_vars,
            });
        }
        Ok(())
    }

    /// Adds an original clause at decision level 0.
    ///
    /// Tautologies and clauses already satisfied at level 0 are dropped, and
    /// literals false at level 0 are removed. A clause left empty makes the
    /// solver permanently unsatisfiable and is reported as `EmptyClause`.
    /// A clause left with one literal becomes a level-0 fact.
    pub fn add_clause<I>(&mut self, literals: I) -> Result<()>
    where
        I: IntoIterator<Item = Literal>,
    {
        let mut lits = Vec::new();
        for lit in literals {
            self.check_variable(lit.variable)?;
            lits.push(lit);
        }
        if self.unsat {
            return Ok(());
        }
        self.backtrack_to(0);

        lits.sort();
        lits.dedup();
        if lits.windows(2).any(|w| w[0].variable == w[1].variable) {
            return Ok(());
        }
        if lits.iter().any(|&l| self.trail.value(l) == Some(true)) {
            return Ok(());
        }
        lits.retain(|&l| self.trail.value(l).is_none());

        match lits.len() {
            0 => {
                self.unsat = true;
                Err(CdclError::EmptyClause)
            }
            1 => self.trail.assign(lits[0], None),
            _ => {
                let index = self.clauses.add_clause(lits, false)?;
                self.watch_clause(index);
                Ok(())
            }
        }
    }

    fn watch_clause(&mut self, index: ClauseIndex) {
        if let Some(clause) = self.clauses.get(index) {
            for lit in clause.watched() {
                self.watches.add_clause_to_lit(index, lit);
            }
        }
    }

    /// Opens a new decision level and makes `literal` true on it.
    pub fn decide(&mut self, literal: Literal) -> Result<()> {
        self.check_variable(literal.variable)?;
        self.trail.new_level();
        self.trail.assign(literal, None)
    }

    /// Undoes every assignment above `level` and hands the freed variables
    /// back to the heuristic.
    pub fn backtrack_to(&mut self, level: usize) {
        let heuristic = &mut self.heuristic;
        self.trail
            .backtrack_to(level, |lit| heuristic.variable_unassigned_signal(lit));
    }

    /// Stores a learned clause and asserts its first literal. The trail must
    /// already be at `learned.backtrack_level`.
    pub fn learn(&mut self, learned: Learned) -> Result<()> {
        let Learned { literals, .. } = learned;
        let asserting = literals[0];
        self.stats.learned_clauses += 1;
        tracing::trace!(clause = ?literals, level = self.trail.current_level(), "learned");

        if literals.len() == 1 {
            self.heuristic
                .clause_added_signal(&Clause::new(literals, true));
            self.trail.assign(asserting, None)?;
        } else {
            let index = self.clauses.add_clause(literals, true)?;
            self.watch_clause(index);
            if let Some(clause) = self.clauses.get(index) {
                self.heuristic.clause_added_signal(clause);
            }
            self.trail.assign(asserting, Some(index))?;
        }
        self.heuristic.decay();
        self.clauses.decay_activity();
        Ok(())
    }

    /// Forgets the less active half of the learned clauses, keeping reasons.
    pub fn reduce_db(&mut self) {
        let trail = &self.trail;
        let removed = self.clauses.reduce(|index, clause| {
            trail.reason_of(clause.literals[0].variable) == Some(index)
        });
        let count = removed.iter().filter(|&&r| r).count() as u64;
        self.watches.remove_clauses(&removed);

        self.stats.reductions += 1;
        self.stats.deleted_clauses += count;
        if let Some(limit) = self.learned_limit.as_mut() {
            *limit *= self.config.learned_growth;
        }
        tracing::debug!(
            deleted = count,
            kept = self.clauses.num_learned(),
            "reduced learned clauses"
        );
    }

    fn learned_limit(&mut self) -> f64 {
        let config = &self.config;
        let original = self.clauses.num_original();
        *self.learned_limit.get_or_insert_with(|| {
            (original as f64 * config.learned_ratio).max(config.min_learned as f64)
        })
    }

    /// Current assignment as a model; unassigned variables read as false.
    fn model(&self) -> Model {
        Model::new(
            self.trail.assignments()[1..]
                .iter()
                .map(|a| a.map_or(false, |a| a.polarity))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: i64) -> Literal {
        Literal::from_dimacs(v).unwrap()
    }

    fn clause(v: &[i64]) -> Vec<Literal> {
        v.iter().map(|&x| lit(x)).collect()
    }

    #[test]
    fn unit_clause_becomes_a_root_fact() {
        let mut solver = Solver::new(2);
        solver.add_clause(clause(&[-2])).unwrap();
        assert_eq!(solver.trail().value(lit(2)), Some(false));
        assert_eq!(solver.trail().level_of(2), Some(0));
        assert!(solver.clauses().is_empty());
    }

    #[test]
    fn tautologies_are_not_stored() {
        let mut solver = Solver::new(2);
        solver.add_clause(clause(&[1, -1, 2])).unwrap();
        assert!(solver.clauses().is_empty());
    }

    #[test]
    fn root_false_literals_are_removed() {
        let mut solver = Solver::new(3);
        solver.add_clause(clause(&[-3])).unwrap();
        solver.add_clause(clause(&[1, 2, 3])).unwrap();
        let (_, stored) = solver.clauses().iter().next().unwrap();
        assert_eq!(stored.literals, clause(&[1, 2]));
    }

    #[test]
    fn contradicting_units_leave_an_empty_clause() {
        let mut solver = Solver::new(1);
        solver.add_clause(clause(&[1])).unwrap();
        assert_eq!(solver.add_clause(clause(&[-1])), Err(CdclError::EmptyClause));
        assert!(!solver.is_consistent());
    }

    #[test]
    fn unknown_variables_are_rejected() {
        let mut solver = Solver::new(2);
        assert_eq!(
            solver.add_clause(clause(&[1, 3])),
            Err(CdclError::UnknownVariable {
                variable: 3,
                num_vars: 2
            })
        );
    }

    #[test]
    fn stored_clauses_are_watched_on_their_first_two_literals() {
        let mut solver = Solver::new(3);
        solver.add_clause(clause(&[3, 1, 2])).unwrap();
        assert_eq!(solver.watches.get(lit(1)), &vec![0]);
        assert_eq!(solver.watches.get(lit(2)), &vec![0]);
        assert!(solver.watches.get(lit(3)).is_empty());
    }

    #[test]
    fn learning_a_unit_asserts_it_at_level_zero() {
        let mut solver = Solver::new(2);
        solver
            .learn(Learned {
                literals: clause(&[-1]),
                backtrack_level: 0,
            })
            .unwrap();
        assert_eq!(solver.trail().value(lit(1)), Some(false));
        assert_eq!(solver.trail().reason_of(1), None);
        assert_eq!(solver.stats().learned_clauses, 1);
        assert_eq!(solver.heuristic().activity(1), 1.0);
    }

    #[test]
    fn reduce_keeps_clauses_that_are_reasons() {
        let mut solver = Solver::new(6);
        solver.decide(lit(-5)).unwrap();
        solver.decide(lit(-6)).unwrap();
        solver
            .learn(Learned {
                literals: clause(&[1, 5, 6]),
                backtrack_level: 2,
            })
            .unwrap();
        solver.backtrack_to(0);
        solver.decide(lit(-4)).unwrap();
        solver.decide(lit(-6)).unwrap();
        solver
            .learn(Learned {
                literals: clause(&[2, 4, 6]),
                backtrack_level: 2,
            })
            .unwrap();

        solver.reduce_db();

        let reason = solver.trail().reason_of(2).unwrap();
        assert!(solver.clauses().get(reason).is_some());
        assert_eq!(solver.clauses().num_learned(), 1);
        assert_eq!(solver.stats().deleted_clauses, 1);
        assert!(solver.watches.get(lit(1)).is_empty());
    }
}
