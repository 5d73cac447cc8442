use std::fmt::{Display, Formatter};

/// Result of an iterative numerical procedure.
///
/// Hitting an iteration cap is not an error: `value` still holds the best
/// estimate available, and `converged` is `false`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl Estimate {
    pub fn converged(value: f64, iterations: usize) -> Self {
        Self {
            value,
            iterations,
            converged: true,
        }
    }

    pub fn diverged(value: f64, iterations: usize) -> Self {
        Self {
            value,
            iterations,
            converged: false,
        }
    }

    pub fn nan() -> Self {
        Self::diverged(f64::NAN, 0)
    }
}

impl Display for Estimate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)?;
        if !self.converged {
            write!(f, " (not converged after {} iterations)", self.iterations)?;
        }
        Ok(())
    }
}
