/// Decides when the search should drop its trail and start again from level 0.
pub trait RestartStrategy {
    /// Tells whether the solver should restart given `conflicts` since the last restart
    fn is_restart_required(&self, conflicts: u64) -> bool;

    /// Moves on to the next conflict limit, called on every restart
    fn set_next_limit(&mut self);
}

/// Restart limits following the Luby sequence (1, 1, 2, 1, 1, 2, 4, ...)
/// times a unit run, generated with Knuth's reluctant doubling. A unit of 0
/// is treated as 1.
#[derive(Debug, Clone)]
pub struct Luby {
    u: i64,
    v: i64,
    unit: u64,
    current: u64,
}

impl Luby {
    pub fn new(unit: u64) -> Luby {
        let mut luby = Luby {
            u: 1,
            v: 1,
            unit: unit.max(1),
            current: 1,
        };
        luby.current = luby.luby();
        luby
    }

    fn luby(&mut self) -> u64 {
        let res = self.v;
        if self.u & -self.u == self.v {
            self.u += 1;
            self.v = 1;
        } else {
            self.v *= 2;
        }
        res as u64
    }

    pub fn limit(&self) -> u64 {
        self.unit * self.current
    }
}

impl RestartStrategy for Luby {
    fn is_restart_required(&self, conflicts: u64) -> bool {
        conflicts >= self.limit()
    }

    fn set_next_limit(&mut self) {
        self.current = self.luby();
    }
}

/// Restart limits growing by a constant factor, never below one conflict.
#[derive(Debug, Clone)]
pub struct Geometric {
    limit: f64,
    factor: f64,
}

impl Geometric {
    pub fn new(first: u64, factor: f64) -> Geometric {
        Geometric {
            limit: first.max(1) as f64,
            factor,
        }
    }

    pub fn limit(&self) -> u64 {
        (self.limit as u64).max(1)
    }
}

impl RestartStrategy for Geometric {
    fn is_restart_required(&self, conflicts: u64) -> bool {
        conflicts >= self.limit()
    }

    fn set_next_limit(&mut self) {
        self.limit *= self.factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luby_generates_luby_sequence() {
        let mut tested = Luby::new(1);
        let mut limits = vec![tested.limit()];
        for _ in 0..14 {
            tested.set_next_limit();
            limits.push(tested.limit());
        }
        assert_eq!(limits, vec![1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8]);
    }

    #[test]
    fn luby_limits_are_scaled_by_the_unit_run() {
        let mut tested = Luby::new(100);
        assert!(!tested.is_restart_required(99));
        assert!(tested.is_restart_required(100));

        tested.set_next_limit();
        tested.set_next_limit();
        assert!(!tested.is_restart_required(199));
        assert!(tested.is_restart_required(200));
    }

    #[test]
    fn geometric_limits_grow_by_the_factor() {
        let mut tested = Geometric::new(100, 1.5);
        assert!(tested.is_restart_required(100));
        tested.set_next_limit();
        assert_eq!(tested.limit(), 150);
        tested.set_next_limit();
        assert_eq!(tested.limit(), 225);
        assert!(!tested.is_restart_required(224));
    }

    #[test]
    fn zero_intervals_still_require_a_conflict() {
        let luby = Luby::new(0);
        assert_eq!(luby.limit(), 1);
        assert!(!luby.is_restart_required(0));

        let mut geometric = Geometric::new(0, 1.5);
        assert!(!geometric.is_restart_required(0));
        let mut shrinking = Geometric::new(2, 0.1);
        shrinking.set_next_limit();
        assert_eq!(shrinking.limit(), 1);
        geometric.set_next_limit();
        assert!(geometric.is_restart_required(1));
    }
}
