use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// A handle to a diagram node, possibly complemented.
///
/// The absolute value is the index of the node in the manager's table,
/// the sign marks a complemented (negated) edge.
/// Handles are plain values: nodes are immutable and hash-consed,
/// so copying a handle never invalidates it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ref(i32);

impl Ref {
    pub const fn new(index: i32) -> Self {
        Self(index)
    }

    pub const fn positive(index: u32) -> Self {
        Self(index as i32)
    }

    pub const fn is_negated(&self) -> bool {
        self.0 < 0
    }

    pub const fn negate(self) -> Self {
        Self(-self.0)
    }

    /// Return the internal representation of the reference.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Return the index of the referenced node.
    pub const fn index(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Non-negative key suitable for pairing-based hashing.
    pub(crate) const fn unsigned(self) -> u32 {
        (self.0.unsigned_abs() << 1) + (self.0 < 0) as u32
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", if self.is_negated() { "~" } else { "" }, self.index())
    }
}
