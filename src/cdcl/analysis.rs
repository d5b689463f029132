use super::decide_heuristics::DecideHeuristic;
use super::error::{CdclError, Result};
use super::literal::Literal;
use super::{ClauseIndex, Solver};

/// Clause derived from a conflict, ready to be asserted.
///
/// `literals[0]` is the negated first UIP. When the clause has more than one
/// literal, `literals[1]` is assigned at `backtrack_level`, the highest level
/// among the remaining literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Learned {
    pub literals: Vec<Literal>,
    pub backtrack_level: usize,
}

impl<H: DecideHeuristic> Solver<H> {
    /// First-UIP conflict analysis.
    ///
    /// Resolves the conflicting clause with the reasons of current-level
    /// literals, walking the trail backwards, until a single current-level
    /// literal is left. Fails with `RootConflict` at decision level 0.
    pub fn analyze(&mut self, conflict: ClauseIndex) -> Result<Learned> {
        let level = self.trail.current_level();
        if level == 0 {
            return Err(CdclError::RootConflict);
        }

        let mut tail: Vec<Literal> = Vec::new();
        let mut pending = 0usize;
        let mut resolved: Option<Literal> = None;
        let mut reason = conflict;
        let mut index = self.trail.len();

        let uip = loop {
            self.clauses.bump_activity(reason);
            let clause = self
                .clauses
                .get(reason)
                .ok_or(CdclError::MissingReason {
                    variable: resolved.map_or(0, |l| l.variable),
                })?;

            for &q in &clause.literals {
                let v = q.variable;
                if self.seen[v] || resolved.map_or(false, |p| p.variable == v) {
                    continue;
                }
                match self.trail.level_of(v) {
                    Some(0) | None => {}
                    Some(l) => {
                        self.seen[v] = true;
                        if l >= level {
                            pending += 1;
                        } else {
                            tail.push(q);
                        }
                    }
                }
            }

            let p = loop {
                index -= 1;
                let candidate = self.trail.literals()[index];
                if self.seen[candidate.variable] {
                    break candidate;
                }
            };
            self.seen[p.variable] = false;
            pending -= 1;
            if pending == 0 {
                break p;
            }
            reason = self
                .trail
                .reason_of(p.variable)
                .ok_or(CdclError::MissingReason {
                    variable: p.variable,
                })?;
            resolved = Some(p);
        };

        let mut literals = Vec::with_capacity(tail.len() + 1);
        literals.push(!uip);
        for &q in &tail {
            if !self.is_redundant(q) {
                literals.push(q);
            }
        }
        for q in &tail {
            self.seen[q.variable] = false;
        }

        let backtrack_level = self.place_backtrack_literal(&mut literals);
        Ok(Learned {
            literals,
            backtrack_level,
        })
    }

    /// A literal is redundant when its reason only mentions literals that are
    /// already in the learned clause or fixed at level 0.
    fn is_redundant(&self, literal: Literal) -> bool {
        let Some(reason) = self.trail.reason_of(literal.variable) else {
            return false;
        };
        let Some(clause) = self.clauses.get(reason) else {
            return false;
        };
        clause.literals.iter().all(|q| {
            q.variable == literal.variable
                || self.seen[q.variable]
                || self.trail.level_of(q.variable) == Some(0)
        })
    }

    /// Moves the literal with the highest level after position 0 to
    /// position 1 and returns that level.
    fn place_backtrack_literal(&self, literals: &mut [Literal]) -> usize {
        let deepest = literals
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, l)| (i, self.trail.level_of(l.variable).unwrap_or(0)))
            .max_by_key(|&(_, level)| level);
        match deepest {
            Some((i, level)) => {
                literals.swap(1, i);
                level
            }
            None => 0,
        }
    }
}
