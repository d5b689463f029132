use std::cmp::Ordering;

use priority_queue::PriorityQueue;

// For random Heuristic
use rand::prelude::IteratorRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// For Testing
use mockall::*;

use super::assignment::Assignment;
use super::clause::Clause;
use super::literal::Literal;

/// Defines an interface for decision heuristics.
/// Provides methods to choose the next branching variable and its polarity.
#[automock]
pub trait DecideHeuristic {
    /// Polarity to try first for `variable`
    fn next_polarity(&mut self, variable: usize) -> bool;
    /// Gets an unassigned variable, if any exist
    fn next_variable(&mut self, model: &[Option<Assignment>]) -> Option<usize>;
    /// Next decision literal; `None` once every variable has a value
    fn pick_literal(&mut self, model: &[Option<Assignment>]) -> Option<Literal> {
        let variable = self.next_variable(model)?;
        Some(Literal::new(variable, self.next_polarity(variable)))
    }
    /// Called with every clause learned from a conflict
    fn clause_added_signal(&mut self, _clause: &Clause) {}
    /// Called once per conflict, after the learned clause was signalled
    fn decay(&mut self) {}
    /// Called for every literal removed from the trail by backtracking
    fn variable_unassigned_signal(&mut self, _literal: Literal) {}
}

/// Implements a random decision heuristic.
/// Uses a seeded RNG so that runs can be replayed.
pub struct RandomDecideHeuristic {
    rng: StdRng,
}

impl RandomDecideHeuristic {
    pub fn new(seed: u64) -> Self {
        RandomDecideHeuristic {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DecideHeuristic for RandomDecideHeuristic {
    fn next_polarity(&mut self, _variable: usize) -> bool {
        self.rng.gen()
    }

    fn next_variable(&mut self, model: &[Option<Assignment>]) -> Option<usize> {
        // Slot 0 of the model does not name a variable
        model
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, value)| value.is_none().then_some(index))
            .choose(&mut self.rng)
    }
}

const RESCALE_LIMIT: f64 = 1e100;

/// Activity score with a total order, so it can prioritise the heap.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Activity(f64);

impl Eq for Activity {}

impl Ord for Activity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Activity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Variable State Independent Decaying Sum (VSIDS):
/// (1) Each variable has an activity, initialized to 0.
/// (2) Every variable of a learned clause is bumped by the current increment.
/// (3) The unassigned variable with the highest activity is chosen at each
/// decision, with the polarity it last held (phase saving).
/// (4) After each conflict the increment grows by `1 / decay`, which ranks
/// recent bumps above old ones exactly like multiplying all scores by `decay`.
pub struct Vsids {
    activity: Vec<f64>,
    /// Candidate variables. Assigned variables are skipped when popped.
    queue: PriorityQueue<usize, Activity>,
    saved_phase: Vec<bool>,
    increment: f64,
    decay: f64,
}

impl Vsids {
    #[must_use]
    pub fn new(variables: usize, decay: f64) -> Self {
        let mut queue = PriorityQueue::with_capacity(variables);
        for variable in 1..=variables {
            queue.push(variable, Activity(0.0));
        }
        Vsids {
            activity: vec![0.0; variables + 1],
            queue,
            saved_phase: vec![false; variables + 1],
            increment: 1.0,
            decay,
        }
    }

    pub fn activity(&self, variable: usize) -> f64 {
        self.activity[variable]
    }

    fn bump(&mut self, variable: usize) {
        self.activity[variable] += self.increment;
        if self.activity[variable] > RESCALE_LIMIT {
            self.rescale();
        } else {
            self.queue
                .change_priority(&variable, Activity(self.activity[variable]));
        }
    }

    fn rescale(&mut self) {
        for a in self.activity.iter_mut() {
            *a /= RESCALE_LIMIT;
        }
        self.increment /= RESCALE_LIMIT;
        let queued: Vec<usize> = self.queue.iter().map(|(v, _)| *v).collect();
        for variable in queued {
            self.queue
                .change_priority(&variable, Activity(self.activity[variable]));
        }
    }
}

impl DecideHeuristic for Vsids {
    fn next_polarity(&mut self, variable: usize) -> bool {
        self.saved_phase[variable]
    }

    fn next_variable(&mut self, model: &[Option<Assignment>]) -> Option<usize> {
        while let Some((variable, _)) = self.queue.pop() {
            if model[variable].is_none() {
                return Some(variable);
            }
        }
        None
    }

    fn clause_added_signal(&mut self, clause: &Clause) {
        for lit in &clause.literals {
            self.bump(lit.variable);
        }
    }

    fn decay(&mut self) {
        self.increment /= self.decay;
        if self.increment > RESCALE_LIMIT {
            self.rescale();
        }
    }

    fn variable_unassigned_signal(&mut self, literal: Literal) {
        self.saved_phase[literal.variable] = literal.polarity;
        self.queue
            .push(literal.variable, Activity(self.activity[literal.variable]));
    }
}
