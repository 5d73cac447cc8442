//! Small value types shared between the term model and the diagram engine.

use std::fmt;
use std::str::FromStr;

/// Relation between a weighted sum and its right-hand side.
///
/// Used by linear (threshold/voting) constraints `Σ cᵢ·xᵢ ⋈ rhs`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Comparator {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparator {
    pub const ALL: [Comparator; 5] = [Comparator::Eq, Comparator::Gt, Comparator::Ge, Comparator::Lt, Comparator::Le];

    /// Textual symbol used by the term notation.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
        }
    }

    /// Check whether `lhs ⋈ rhs` holds.
    pub fn holds<T: Ord>(self, lhs: T, rhs: T) -> bool {
        match self {
            Comparator::Eq => lhs == rhs,
            Comparator::Gt => lhs > rhs,
            Comparator::Ge => lhs >= rhs,
            Comparator::Lt => lhs < rhs,
            Comparator::Le => lhs <= rhs,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Comparator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparator::ALL.into_iter().find(|c| c.symbol() == s).ok_or(())
    }
}
