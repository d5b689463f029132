use tracing::{debug, info, trace};

use super::analysis::Learned;
use super::decide_heuristics::DecideHeuristic;
use super::error::{CdclError, Result};
use super::literal::Literal;
use super::model::SolveResult;
use super::{ClauseIndex, Solver};

/// States of the search loop driven by [`Solver::solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Deciding,
    Propagating,
    Conflict(ClauseIndex),
    Backtracking(Learned),
    Restarting,
    Sat,
    Unsat,
    Interrupted,
}

impl<H: DecideHeuristic> Solver<H> {
    /// Searches for a model in which every added clause and every assumption
    /// holds.
    ///
    /// Assumptions only constrain this call: each one is decided on its own
    /// level before the heuristic is asked for anything. `Err` means an
    /// internal invariant broke; the verdicts are all in `SolveResult`.
    pub fn solve(&mut self, assumptions: &[Literal]) -> Result<SolveResult> {
        for a in assumptions {
            self.check_variable(a.variable)?;
        }
        if self.unsat {
            return Ok(SolveResult::Unsatisfiable);
        }
        self.backtrack_to(0);
        let learned_limit = self.learned_limit();
        debug!(
            vars = self.num_vars,
            clauses = self.clauses.num_original(),
            learned_limit,
            assumptions = assumptions.len(),
            "search started"
        );

        let first_conflict = self.stats.conflicts;
        let mut state = SearchState::Propagating;
        let result = loop {
            state = match state {
                SearchState::Propagating => match self.propagate()? {
                    Some(conflict) => SearchState::Conflict(conflict),
                    None if self.restarts.is_restart_required(self.conflicts_since_restart) => {
                        SearchState::Restarting
                    }
                    None => SearchState::Deciding,
                },
                SearchState::Conflict(conflict) => {
                    self.stats.conflicts += 1;
                    self.conflicts_since_restart += 1;
                    match self.analyze(conflict) {
                        Ok(learned) => SearchState::Backtracking(learned),
                        Err(CdclError::RootConflict) => {
                            self.unsat = true;
                            SearchState::Unsat
                        }
                        Err(e) => return Err(e),
                    }
                }
                SearchState::Backtracking(learned) => {
                    self.backtrack_to(learned.backtrack_level);
                    self.learn(learned)?;
                    if self.clauses.num_learned() as f64 > self.learned_limit() {
                        self.reduce_db();
                    }
                    SearchState::Propagating
                }
                SearchState::Restarting => {
                    self.stats.restarts += 1;
                    self.conflicts_since_restart = 0;
                    self.restarts.set_next_limit();
                    self.backtrack_to(0);
                    debug!(
                        restarts = self.stats.restarts,
                        conflicts = self.stats.conflicts,
                        learned = self.clauses.num_learned(),
                        "restart"
                    );
                    SearchState::Deciding
                }
                SearchState::Deciding => {
                    let spent = self.stats.conflicts - first_conflict;
                    let over_budget = self.config.max_conflicts.map_or(false, |max| spent >= max);
                    if self.interrupt.is_interrupted() || over_budget {
                        SearchState::Interrupted
                    } else {
                        self.decide_next(assumptions)?
                    }
                }
                SearchState::Sat => break SolveResult::Satisfiable(self.model()),
                SearchState::Unsat => break SolveResult::Unsatisfiable,
                SearchState::Interrupted => break SolveResult::Interrupted,
            };
        };

        self.backtrack_to(0);
        self.interrupt.clear();
        info!(
            result = verdict(&result),
            decisions = self.stats.decisions,
            conflicts = self.stats.conflicts,
            propagations = self.stats.propagations,
            restarts = self.stats.restarts,
            "search finished"
        );
        Ok(result)
    }

    /// Pushes the next assumption or heuristic decision.
    fn decide_next(&mut self, assumptions: &[Literal]) -> Result<SearchState> {
        while let Some(&assumption) = assumptions.get(self.trail.current_level()) {
            match self.trail.value(assumption) {
                // already implied: keep the level numbering aligned with the assumptions
                Some(true) => self.trail.new_level(),
                Some(false) => {
                    debug!(%assumption, "assumption falsified");
                    return Ok(SearchState::Unsat);
                }
                None => {
                    self.stats.decisions += 1;
                    self.decide(assumption)?;
                    return Ok(SearchState::Propagating);
                }
            }
        }

        match self.heuristic.pick_literal(self.trail.assignments()) {
            None => Ok(SearchState::Sat),
            Some(literal) => {
                self.stats.decisions += 1;
                self.decide(literal)?;
                trace!(%literal, level = self.trail.current_level(), "decide");
                Ok(SearchState::Propagating)
            }
        }
    }
}

fn verdict(result: &SolveResult) -> &'static str {
    match result {
        SolveResult::Satisfiable(_) => "sat",
        SolveResult::Unsatisfiable => "unsat",
        SolveResult::Interrupted => "interrupted",
    }
}
