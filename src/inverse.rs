//! Inversion of reliability functions by bisection.

use log::{debug, warn};

use crate::distribution::Distribution;
use crate::estimate::Estimate;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InverseConfig {
    /// Stop once `|R(x) - y|` is below `epsilon * y`.
    pub epsilon: f64,
    /// How many times the initial bracket `[0, 1]` may be doubled.
    pub max_doublings: usize,
    pub max_iterations: usize,
}

impl InverseConfig {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            ..Self::default()
        }
    }

    pub fn with_max_doublings(mut self, max_doublings: usize) -> Self {
        self.max_doublings = max_doublings;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for InverseConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            max_doublings: 64,
            max_iterations: 200,
        }
    }
}

/// Finds the time `x` at which a reliability function reaches a target value.
///
/// Assumes the function is non-increasing. For a function that is not, the
/// result is some crossing of the target, not necessarily the first one.
#[derive(Debug, Default, Copy, Clone)]
pub struct InverseEvaluator {
    config: InverseConfig,
}

impl InverseEvaluator {
    pub fn new(config: InverseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InverseConfig {
        &self.config
    }

    /// Solve `R(x) = y`.
    ///
    /// `y = 1` gives `0` and `y = 0` gives infinity; a target outside `[0, 1]`
    /// gives `NaN`, as does a reliability that is undefined on the way.
    pub fn evaluate<D>(&self, distribution: &D, y: f64) -> Estimate
    where
        D: Distribution + ?Sized,
    {
        if !(0.0..=1.0).contains(&y) {
            return Estimate::nan();
        }
        if y == 1.0 {
            return Estimate::converged(0.0, 0);
        }
        if y == 0.0 {
            return Estimate::converged(f64::INFINITY, 0);
        }

        let mut lower = 0.0;
        let mut upper = 1.0;
        let mut doublings = 0;
        loop {
            let r = distribution.reliability(upper);
            if r.is_nan() {
                warn!("inverse: R({}) is undefined", upper);
                return Estimate::nan();
            }
            if r < y {
                break;
            }
            if doublings == self.config.max_doublings {
                warn!("inverse: R(x) stays above {} up to x = {}", y, upper);
                return Estimate::diverged(upper, doublings);
            }
            lower = upper;
            upper *= 2.0;
            doublings += 1;
        }
        debug!("inverse: target {} bracketed by [{}, {}]", y, lower, upper);

        let mut mid = 0.5 * (lower + upper);
        for i in 1..=self.config.max_iterations {
            mid = 0.5 * (lower + upper);
            let r = distribution.reliability(mid);
            if r.is_nan() {
                warn!("inverse: R({}) is undefined", mid);
                return Estimate::nan();
            }
            if (r - y).abs() < self.config.epsilon * y {
                return Estimate::converged(mid, i);
            }
            if r > y {
                lower = mid;
            } else {
                upper = mid;
            }
            // Bracket collapsed: the target falls on a jump of R.
            if upper - lower <= f64::EPSILON * upper {
                return Estimate::converged(mid, i);
            }
        }

        warn!(
            "inverse: no convergence for target {} after {} iterations, estimate {}",
            y, self.config.max_iterations, mid
        );
        Estimate::diverged(mid, self.config.max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::distribution::{Constant, Exponential, Sampled, Weibull};

    #[test]
    fn test_exponential_roundtrip() {
        let d = Exponential::new(0.3).unwrap();
        let evaluator = InverseEvaluator::default();
        for t in [0.01, 0.5, 1.0, 3.7, 10.0, 250.0] {
            let estimate = evaluator.evaluate(&d, d.reliability(t));
            assert!(estimate.converged);
            assert!((estimate.value - t).abs() < 1e-6 * t.max(1.0), "t = {}: {}", t, estimate);
        }
    }

    #[test]
    fn test_weibull_median() {
        let d = Weibull::new(1.5, 4.0).unwrap();
        let x = InverseEvaluator::default().evaluate(&d, 0.5).value;
        let expected = 4.0 * std::f64::consts::LN_2.powf(1.0 / 1.5);
        assert!((x - expected).abs() < 1e-8);
    }

    #[test]
    fn test_edge_targets() {
        let d = Exponential::new(1.0).unwrap();
        let evaluator = InverseEvaluator::default();
        assert_eq!(evaluator.evaluate(&d, 1.0).value, 0.0);
        assert_eq!(evaluator.evaluate(&d, 0.0).value, f64::INFINITY);
        assert!(evaluator.evaluate(&d, 1.5).value.is_nan());
        assert!(evaluator.evaluate(&d, -0.5).value.is_nan());
        assert!(evaluator.evaluate(&d, f64::NAN).value.is_nan());
    }

    #[test]
    fn test_never_reached() {
        let d = Constant::new(0.9).unwrap();
        let evaluator = InverseEvaluator::new(InverseConfig::default().with_max_doublings(10));
        let estimate = evaluator.evaluate(&d, 0.5);
        assert!(!estimate.converged);
        assert_eq!(estimate.value, 1024.0);
    }

    #[test]
    fn test_flat_segment() {
        // R drops from 1 to 0.5 on [0, 1], stays flat up to 3, then drops to 0 at 4.
        let d = Sampled::new(vec![(0.0, 1.0), (1.0, 0.5), (3.0, 0.5), (4.0, 0.0)]).unwrap();
        let evaluator = InverseEvaluator::default();
        let x = evaluator.evaluate(&d, 0.25).value;
        assert!((x - 3.5).abs() < 1e-9);
        let x = evaluator.evaluate(&d, 0.75).value;
        assert!((x - 0.5).abs() < 1e-9);
    }

    /// Exponential with rate 1, undefined on `(0.5, 1)` or everywhere.
    struct Undefined {
        everywhere: bool,
    }

    impl Distribution for Undefined {
        fn reliability(&self, x: f64) -> f64 {
            if self.everywhere || (x > 0.5 && x < 1.0) {
                f64::NAN
            } else {
                (-x).exp()
            }
        }
    }

    #[test]
    fn test_undefined_reliability() {
        let evaluator = InverseEvaluator::default();

        let estimate = evaluator.evaluate(&Undefined { everywhere: true }, 0.5);
        assert!(estimate.value.is_nan());
        assert!(!estimate.converged);

        let estimate = evaluator.evaluate(&Undefined { everywhere: false }, 0.5);
        assert!(estimate.value.is_nan());
        assert!(!estimate.converged);

        let estimate = evaluator.evaluate(&Undefined { everywhere: false }, 0.9);
        assert!(estimate.converged);
        assert!((estimate.value - 0.9f64.ln().abs()).abs() < 1e-9);
    }
}
