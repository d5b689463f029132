use std::mem;

use super::literal::Literal;
use super::ClauseIndex;

/// For each literal, the clauses that currently watch it.
#[derive(Debug, Default)]
pub struct WatchLists {
    pub positive: Vec<Vec<ClauseIndex>>, // positive[k]: clauses watching +k
    pub negative: Vec<Vec<ClauseIndex>>, // negative[k]: clauses watching -k
}

impl WatchLists {
    pub fn new(n: usize) -> WatchLists {
        WatchLists {
            positive: vec![Vec::new(); n + 1], // one extra slot so variables index from 1
            negative: vec![Vec::new(); n + 1],
        }
    }

    /// Moves the list for `lit` out, leaving an empty one behind.
    pub fn take(&mut self, lit: Literal) -> Vec<ClauseIndex> {
        mem::take(self.get_mut(lit))
    }

    pub fn give_to(&mut self, clause_lists: Vec<ClauseIndex>, lit: Literal) {
        *self.get_mut(lit) = clause_lists;
    }

    pub fn get(&self, lit: Literal) -> &Vec<ClauseIndex> {
        if lit.polarity {
            &self.positive[lit.variable]
        } else {
            &self.negative[lit.variable]
        }
    }

    pub fn get_mut(&mut self, lit: Literal) -> &mut Vec<ClauseIndex> {
        if lit.polarity {
            &mut self.positive[lit.variable]
        } else {
            &mut self.negative[lit.variable]
        }
    }

    pub fn add_clause_to_lit(&mut self, clause: ClauseIndex, lit: Literal) {
        self.get_mut(lit).push(clause);
    }

    /// Drops every watch on the given clauses. `removed[c]` marks clause `c`.
    pub fn remove_clauses(&mut self, removed: &[bool]) {
        let is_removed = |c: &ClauseIndex| removed.get(*c).copied().unwrap_or(false);
        for list in self.positive.iter_mut().chain(self.negative.iter_mut()) {
            list.retain(|c| !is_removed(c));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_split_by_polarity() {
        let mut watches = WatchLists::new(3);
        watches.add_clause_to_lit(0, Literal::positive(2));
        watches.add_clause_to_lit(1, Literal::negative(2));
        watches.add_clause_to_lit(2, Literal::positive(2));

        assert_eq!(watches.get(Literal::positive(2)), &vec![0, 2]);
        assert_eq!(watches.get(Literal::negative(2)), &vec![1]);
    }

    #[test]
    fn take_then_give_back_restores_the_list() {
        let mut watches = WatchLists::new(1);
        watches.add_clause_to_lit(5, Literal::negative(1));
        let list = watches.take(Literal::negative(1));
        assert!(watches.get(Literal::negative(1)).is_empty());
        watches.give_to(list, Literal::negative(1));
        assert_eq!(watches.get(Literal::negative(1)), &vec![5]);
    }

    #[test]
    fn remove_clauses_purges_every_list() {
        let mut watches = WatchLists::new(2);
        watches.add_clause_to_lit(0, Literal::positive(1));
        watches.add_clause_to_lit(1, Literal::positive(1));
        watches.add_clause_to_lit(1, Literal::negative(2));

        watches.remove_clauses(&[false, true]);

        assert_eq!(watches.get(Literal::positive(1)), &vec![0]);
        assert!(watches.get(Literal::negative(2)).is_empty());
    }
}
