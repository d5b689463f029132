use super::clause::Watcher;
use super::decide_heuristics::DecideHeuristic;
use super::error::Result;
use super::{ClauseIndex, Solver};

impl<H: DecideHeuristic> Solver<H> {
    /// Boolean constraint propagation over the two-watched-literal index.
    ///
    /// Consumes the propagation queue until it is empty (`Ok(None)`) or a
    /// clause is falsified (`Ok(Some(conflict))`). On conflict the rest of the
    /// queue is dropped; backtracking rewinds it.
    pub fn propagate(&mut self) -> Result<Option<ClauseIndex>> {
        while let Some(p) = self.trail.next_to_propagate() {
            self.stats.propagations += 1;
            let falsified = !p;
            let watchers = self.watches.take(falsified);
            let mut kept = Vec::with_capacity(watchers.len());
            let mut outcome = Ok(None);

            let mut pending = watchers.into_iter();
            for index in pending.by_ref() {
                let Some(clause) = self.clauses.get_mut(index) else {
                    continue;
                };
                match clause.watch(falsified, &self.trail) {
                    Watcher::Satisfied => kept.push(index),
                    Watcher::NewWatched(lit) => self.watches.add_clause_to_lit(index, lit),
                    Watcher::Unit(lit) => {
                        kept.push(index);
                        if let Err(e) = self.trail.assign(lit, Some(index)) {
                            outcome = Err(e);
                            break;
                        }
                    }
                    Watcher::Conflict => {
                        kept.push(index);
                        outcome = Ok(Some(index));
                        break;
                    }
                }
            }
            kept.extend(pending);
            self.watches.give_to(kept, falsified);

            if !matches!(outcome, Ok(None)) {
                self.trail.skip_propagation();
                return outcome;
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crate::cdcl::{Literal, Solver};

    fn lit(v: i64) -> Literal {
        Literal::from_dimacs(v).unwrap()
    }

    fn clause(v: &[i64]) -> Vec<Literal> {
        v.iter().map(|&x| lit(x)).collect()
    }

    #[test]
    fn propagate_processes_everything_until_a_fixed_point_is_reached() {
        let mut solver = Solver::new(3);
        solver.add_clause(clause(&[1, -2, -3])).unwrap();
        solver.add_clause(clause(&[2, -3])).unwrap();

        solver.decide(lit(3)).unwrap();
        assert_eq!(solver.propagate(), Ok(None));

        assert_eq!(solver.trail().literals(), &[lit(3), lit(2), lit(1)]);
        assert_eq!(solver.trail().reason_of(2), Some(1));
        assert_eq!(solver.trail().reason_of(1), Some(0));
        assert_eq!(solver.trail().level_of(1), Some(1));
        assert!(solver.trail().fully_propagated());
    }

    #[test]
    fn propagate_stops_when_a_conflict_is_detected() {
        let mut solver = Solver::new(3);
        solver.add_clause(clause(&[1, -2, -3])).unwrap();
        solver.add_clause(clause(&[2, -3])).unwrap();
        solver.add_clause(clause(&[-1, -3])).unwrap();

        solver.decide(lit(3)).unwrap();
        let conflict = solver.propagate().unwrap();

        let falsified = solver.clauses().get(conflict.unwrap()).unwrap();
        assert!(falsified
            .literals
            .iter()
            .all(|&l| solver.trail().value(l) == Some(false)));
        assert!(solver.trail().fully_propagated());
    }

    #[test]
    fn propagate_finds_a_non_trivial_conflict() {
        /*-
         * a ------------------------------------/--- c
         *                                      /
         *     /------- e ---- f --- -b --- -h +
         *    /                    /           \
         * d /-- g ---------------/             \--- -c
         */
        let mut solver = Solver::new(8);
        solver.add_clause(clause(&[1, -8, 3])).unwrap(); // c0
        solver.add_clause(clause(&[1, 4, -5])).unwrap(); // c1
        solver.add_clause(clause(&[5, -6, 7])).unwrap(); // c2
        solver.add_clause(clause(&[6, 2, 7])).unwrap(); // c3
        solver.add_clause(clause(&[4, -7])).unwrap(); // c4
        solver.add_clause(clause(&[-2, 8])).unwrap(); // c5
        solver.add_clause(clause(&[-8, -3])).unwrap(); // c6

        solver.decide(lit(-1)).unwrap();
        assert_eq!(solver.propagate(), Ok(None));
        solver.decide(lit(-4)).unwrap();

        let conflict = solver.propagate().unwrap();
        assert!(conflict == Some(0) || conflict == Some(6));
    }

    #[test]
    fn watches_move_away_from_false_literals() {
        let mut solver = Solver::new(4);
        solver.add_clause(clause(&[1, 2, 3, 4])).unwrap();

        solver.decide(lit(-1)).unwrap();
        assert_eq!(solver.propagate(), Ok(None));

        assert!(solver.watches.get(lit(1)).is_empty());
        assert_eq!(solver.watches.get(lit(3)), &vec![0]);
        assert_eq!(solver.trail().len(), 1);
    }

    #[test]
    fn root_units_propagate_at_level_zero() {
        let mut solver = Solver::new(2);
        solver.add_clause(clause(&[-1, 2])).unwrap();
        solver.add_clause(clause(&[1])).unwrap();

        assert_eq!(solver.propagate(), Ok(None));
        assert_eq!(solver.trail().value(lit(2)), Some(true));
        assert_eq!(solver.trail().level_of(2), Some(0));
    }
}
