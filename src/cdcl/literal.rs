use std::cmp::Ordering;
use std::fmt;
use std::ops::Not;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub variable: usize,
    pub polarity: bool,
}

impl Literal {
    pub fn new(variable: usize, polarity: bool) -> Self {
        Literal { variable, polarity }
    }

    pub fn positive(variable: usize) -> Self {
        Literal::new(variable, true)
    }

    pub fn negative(variable: usize) -> Self {
        Literal::new(variable, false)
    }

    /// Reads a DIMACS integer. `0` is the clause terminator, not a literal.
    pub fn from_dimacs(val: i64) -> Option<Self> {
        if val == 0 {
            return None;
        }
        Some(Literal {
            variable: val.unsigned_abs() as usize,
            polarity: val > 0,
        })
    }

    pub fn to_dimacs(self) -> i64 {
        let val = self.variable as i64;
        if self.polarity {
            val
        } else {
            -val
        }
    }

    // Method to return the negation of the literal
    pub fn negate(self) -> Self {
        Literal {
            variable: self.variable,
            polarity: !self.polarity,
        }
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        self.negate()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.polarity {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "¬{}", self.variable)
        }
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.variable
            .cmp(&other.variable)
            .then(self.polarity.cmp(&other.polarity))
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
