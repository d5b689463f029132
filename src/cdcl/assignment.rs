use super::literal::Literal;
use super::ClauseIndex;

/// Value of one variable on the trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub polarity: bool,
    pub level: usize,
    /// Clause that implied this value, `None` for decisions and level-0 facts.
    pub reason: Option<ClauseIndex>,
}

impl Assignment {
    pub fn new(polarity: bool, level: usize, reason: Option<ClauseIndex>) -> Assignment {
        Assignment {
            polarity,
            level,
            reason,
        }
    }

    /// Whether `literal`, which must be over this variable, is made true.
    pub fn holds(&self, literal: Literal) -> bool {
        self.polarity == literal.polarity
    }

    pub fn is_decision(&self) -> bool {
        self.reason.is_none() && self.level > 0
    }
}
