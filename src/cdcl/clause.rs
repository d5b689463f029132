use std::fmt;

use super::literal::Literal;
use super::trail::Trail;

/// Outcome of visiting a clause after one of its watched literals became false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watcher {
    /// The other watch is true; the clause keeps its current watches.
    Satisfied,
    /// The clause now watches this literal instead of the falsified one.
    NewWatched(Literal),
    /// Every other literal is false; this one is forced.
    Unit(Literal),
    /// Every literal is false.
    Conflict,
}

use Watcher::*;

/// A disjunction of literals. Positions 0 and 1 hold the watched literals.
#[derive(Clone)]
pub struct Clause {
    pub literals: Vec<Literal>,
    learned: bool,
    activity: f64,
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lit) in self.literals.iter().enumerate() {
            if i < 2 {
                write!(f, "•")?;
            }
            write!(f, "{:?},", lit)?;
        }
        if self.learned {
            write!(f, " (learned)")?;
        }
        Ok(())
    }
}

impl Clause {
    pub fn new(literals: Vec<Literal>, learned: bool) -> Clause {
        Clause {
            literals,
            learned,
            activity: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_learned(&self) -> bool {
        self.learned
    }

    pub fn activity(&self) -> f64 {
        self.activity
    }

    pub(crate) fn bump(&mut self, increment: f64) -> f64 {
        self.activity += increment;
        self.activity
    }

    pub(crate) fn rescale(&mut self, factor: f64) {
        self.activity *= factor;
    }

    /// The two literals this clause is registered under in the watch lists.
    pub fn watched(&self) -> [Literal; 2] {
        [self.literals[0], self.literals[1]]
    }

    /// Reacts to `falsified` (one of the two watches) becoming false.
    ///
    /// The falsified watch is moved to slot 1 first, so that a forced literal
    /// always ends up in slot 0 where conflict analysis expects it.
    pub fn watch(&mut self, falsified: Literal, trail: &Trail) -> Watcher {
        if self.literals[0] == falsified {
            self.literals.swap(0, 1);
        }
        debug_assert_eq!(self.literals[1], falsified);

        let other = self.literals[0];
        if trail.value(other) == Some(true) {
            return Satisfied;
        }

        for k in 2..self.literals.len() {
            let candidate = self.literals[k];
            if trail.value(candidate) != Some(false) {
                self.literals.swap(1, k);
                return NewWatched(candidate);
            }
        }

        match trail.value(other) {
            None => Unit(other),
            _ => Conflict,
        }
    }
}
