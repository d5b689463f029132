use super::clause::Clause;
use super::error::{CdclError, Result};
use super::literal::Literal;
use super::ClauseIndex;

const RESCALE_LIMIT: f64 = 1e20;

/// Arena of original and learned clauses addressed by `ClauseIndex`.
///
/// Slots freed by `reduce` are handed out again by later `add_clause` calls,
/// so an index is only meaningful while the clause it names is alive.
#[derive(Debug)]
pub struct ClauseDatabase {
    clauses: Vec<Option<Clause>>,
    free: Vec<ClauseIndex>,
    num_original: usize,
    num_learned: usize,
    increment: f64,
    decay: f64,
}

impl ClauseDatabase {
    pub fn new(decay: f64) -> ClauseDatabase {
        ClauseDatabase {
            clauses: Vec::new(),
            free: Vec::new(),
            num_original: 0,
            num_learned: 0,
            increment: 1.0,
            decay,
        }
    }

    /// Stores a clause after sorting and removing duplicate literals.
    pub fn add_clause(&mut self, mut literals: Vec<Literal>, learned: bool) -> Result<ClauseIndex> {
        if !learned {
            literals.sort();
            literals.dedup();
        }
        if literals.is_empty() {
            return Err(CdclError::EmptyClause);
        }
        if learned {
            self.num_learned += 1;
        } else {
            self.num_original += 1;
        }
        let clause = Clause::new(literals, learned);
        match self.free.pop() {
            Some(index) => {
                self.clauses[index] = Some(clause);
                Ok(index)
            }
            None => {
                self.clauses.push(Some(clause));
                Ok(self.clauses.len() - 1)
            }
        }
    }

    pub fn get(&self, index: ClauseIndex) -> Option<&Clause> {
        self.clauses.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: ClauseIndex) -> Option<&mut Clause> {
        self.clauses.get_mut(index).and_then(Option::as_mut)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClauseIndex, &Clause)> + '_ {
        self.clauses
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (i, c)))
    }

    pub fn num_original(&self) -> usize {
        self.num_original
    }

    pub fn num_learned(&self) -> usize {
        self.num_learned
    }

    pub fn len(&self) -> usize {
        self.num_original + self.num_learned
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewards a learned clause for taking part in a conflict.
    pub fn bump_activity(&mut self, index: ClauseIndex) {
        let increment = self.increment;
        let overflow = match self.get_mut(index) {
            Some(clause) if clause.is_learned() => clause.bump(increment) > RESCALE_LIMIT,
            _ => false,
        };
        if overflow {
            self.rescale();
        }
    }

    /// Makes future bumps weigh more than past ones.
    pub fn decay_activity(&mut self) {
        self.increment /= self.decay;
        if self.increment > RESCALE_LIMIT {
            self.rescale();
        }
    }

    fn rescale(&mut self) {
        let factor = 1.0 / RESCALE_LIMIT;
        for clause in self.clauses.iter_mut().flatten() {
            clause.rescale(factor);
        }
        self.increment *= factor;
    }

    /// Deletes the less active half of the learned clauses. Clauses for which
    /// `is_locked` holds (current reasons) and original clauses are kept.
    ///
    /// Returns a mask over clause indices marking the deleted slots.
    pub fn reduce<F>(&mut self, is_locked: F) -> Vec<bool>
    where
        F: Fn(ClauseIndex, &Clause) -> bool,
    {
        let mut candidates: Vec<(ClauseIndex, f64)> = self
            .iter()
            .filter(|(i, c)| c.is_learned() && c.len() > 2 && !is_locked(*i, c))
            .map(|(i, c)| (i, c.activity()))
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut removed = vec![false; self.clauses.len()];
        let target = self.num_learned / 2;
        for &(index, _) in candidates.iter().take(target) {
            self.clauses[index] = None;
            self.free.push(index);
            self.num_learned -= 1;
            removed[index] = true;
        }
        removed
    }
}
