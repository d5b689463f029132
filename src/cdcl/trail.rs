use super::assignment::Assignment;
use super::error::{CdclError, Result};
use super::literal::Literal;
use super::ClauseIndex;

/// Assignment trail: literals in assignment order, cut into decision levels.
///
/// `assignments` is indexed by variable (slot 0 is unused) and mirrors the
/// trail, so the value of any literal is one lookup away.
#[derive(Debug, Clone)]
pub struct Trail {
    literals: Vec<Literal>,
    assignments: Vec<Option<Assignment>>,
    /// `level_starts[l - 1]` is the trail length when level `l` was opened.
    level_starts: Vec<usize>,
    /// Number of trail entries already handed to propagation.
    propagated: usize,
}

impl Trail {
    pub fn new(num_vars: usize) -> Trail {
        Trail {
            literals: Vec::with_capacity(num_vars),
            assignments: vec![None; num_vars + 1],
            level_starts: Vec::new(),
            propagated: 0,
        }
    }

    pub fn current_level(&self) -> usize {
        self.level_starts.len()
    }

    pub fn new_level(&mut self) {
        self.level_starts.push(self.literals.len());
    }

    /// Records `literal` as true at the current level.
    pub fn assign(&mut self, literal: Literal, reason: Option<ClauseIndex>) -> Result<()> {
        match self.assignments[literal.variable] {
            Some(a) if a.holds(literal) => Ok(()),
            Some(_) => Err(CdclError::Conflict {
                variable: literal.variable,
            }),
            None => {
                self.assignments[literal.variable] = Some(Assignment::new(
                    literal.polarity,
                    self.current_level(),
                    reason,
                ));
                self.literals.push(literal);
                Ok(())
            }
        }
    }

    /// Undoes every assignment made above `level`, newest first. `on_unassign`
    /// sees each literal as it leaves the trail.
    pub fn backtrack_to<F>(&mut self, level: usize, mut on_unassign: F)
    where
        F: FnMut(Literal),
    {
        if level >= self.current_level() {
            return;
        }
        let keep = self.level_starts[level];
        while self.literals.len() > keep {
            if let Some(lit) = self.literals.pop() {
                self.assignments[lit.variable] = None;
                on_unassign(lit);
            }
        }
        self.level_starts.truncate(level);
        self.propagated = self.propagated.min(keep);
    }

    /// `Some(true)` if `literal` holds, `Some(false)` if its negation holds.
    pub fn value(&self, literal: Literal) -> Option<bool> {
        self.assignments[literal.variable].map(|a| a.holds(literal))
    }

    pub fn level_of(&self, variable: usize) -> Option<usize> {
        self.assignments[variable].map(|a| a.level)
    }

    pub fn reason_of(&self, variable: usize) -> Option<ClauseIndex> {
        self.assignments[variable].and_then(|a| a.reason)
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn assignments(&self) -> &[Option<Assignment>] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Next literal whose consequences have not been propagated yet.
    pub fn next_to_propagate(&mut self) -> Option<Literal> {
        let lit = self.literals.get(self.propagated).copied()?;
        self.propagated += 1;
        Some(lit)
    }

    /// Drops the rest of the propagation queue after a conflict.
    pub fn skip_propagation(&mut self) {
        self.propagated = self.literals.len();
    }

    pub fn fully_propagated(&self) -> bool {
        self.propagated == self.literals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: i64) -> Literal {
        Literal::from_dimacs(v).unwrap()
    }

    #[test]
    fn assign_records_level_and_reason() {
        let mut trail = Trail::new(3);
        trail.assign(lit(1), None).unwrap();
        trail.new_level();
        trail.assign(lit(-2), Some(4)).unwrap();

        assert_eq!(trail.current_level(), 1);
        assert_eq!(trail.level_of(1), Some(0));
        assert_eq!(trail.level_of(2), Some(1));
        assert_eq!(trail.reason_of(2), Some(4));
        assert_eq!(trail.value(lit(2)), Some(false));
        assert_eq!(trail.value(lit(-2)), Some(true));
        assert_eq!(trail.value(lit(3)), None);
    }

    #[test]
    fn assigning_the_opposite_polarity_fails() {
        let mut trail = Trail::new(2);
        trail.assign(lit(2), None).unwrap();
        assert_eq!(
            trail.assign(lit(-2), None),
            Err(CdclError::Conflict { variable: 2 })
        );
        // same polarity is harmless
        assert_eq!(trail.assign(lit(2), None), Ok(()));
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn backtrack_keeps_lower_levels_and_reports_undone_literals() {
        let mut trail = Trail::new(4);
        trail.assign(lit(1), None).unwrap();
        trail.new_level();
        trail.assign(lit(2), None).unwrap();
        trail.new_level();
        trail.assign(lit(-3), None).unwrap();
        trail.assign(lit(4), Some(0)).unwrap();

        let mut undone = vec![];
        trail.backtrack_to(1, |l| undone.push(l));

        assert_eq!(undone, vec![lit(4), lit(-3)]);
        assert_eq!(trail.current_level(), 1);
        assert_eq!(trail.literals(), &[lit(1), lit(2)]);
        assert_eq!(trail.value(lit(3)), None);
        assert_eq!(trail.reason_of(4), None);
    }

    #[test]
    fn backtrack_to_zero_never_undoes_root_facts() {
        let mut trail = Trail::new(2);
        trail.assign(lit(-1), None).unwrap();
        trail.new_level();
        trail.assign(lit(2), None).unwrap();
        trail.backtrack_to(0, |_| {});
        assert_eq!(trail.literals(), &[lit(-1)]);
        assert_eq!(trail.current_level(), 0);
    }

    #[test]
    fn backtrack_rewinds_the_propagation_queue() {
        let mut trail = Trail::new(3);
        trail.new_level();
        trail.assign(lit(1), None).unwrap();
        trail.new_level();
        trail.assign(lit(2), None).unwrap();
        while trail.next_to_propagate().is_some() {}
        assert!(trail.fully_propagated());

        trail.backtrack_to(1, |_| {});
        trail.assign(lit(3), None).unwrap();
        assert_eq!(trail.next_to_propagate(), Some(lit(3)));
        assert_eq!(trail.next_to_propagate(), None);
    }
}
