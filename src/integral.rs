//! Romberg integration and moments of lifetime distributions.

use log::{debug, warn};

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::estimate::Estimate;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RombergConfig {
    /// Absolute tolerance between the last two diagonal entries.
    pub epsilon: f64,
    /// Number of refinements performed before convergence is tested.
    pub min_steps: usize,
    /// Maximum number of refinements (the finest row has `2^max_steps` panels).
    pub max_steps: usize,
}

impl RombergConfig {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            ..Self::default()
        }
    }

    pub fn with_min_steps(mut self, min_steps: usize) -> Self {
        self.min_steps = min_steps;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

impl Default for RombergConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-10,
            min_steps: 4,
            max_steps: 20,
        }
    }
}

/// Integrate `f` over `[a, b]` by Romberg's method.
///
/// Row `n` of the tableau starts with the trapezoid rule on `2^n` panels;
/// column `m` applies Richardson extrapolation to the one before it.
/// Stops once two consecutive diagonal entries differ by less than `epsilon`.
pub fn romberg<F>(mut f: F, a: f64, b: f64, config: &RombergConfig) -> Estimate
where
    F: FnMut(f64) -> f64,
{
    if a == b {
        return Estimate::converged(0.0, 0);
    }

    let mut h = b - a;
    let mut previous = vec![0.5 * h * (f(a) + f(b))];

    for n in 1..=config.max_steps {
        h *= 0.5;
        let panels = 1usize << (n - 1);
        let sum: f64 = (1..=panels).map(|k| f(a + (2 * k - 1) as f64 * h)).sum();

        let mut current = Vec::with_capacity(n + 1);
        current.push(0.5 * previous[0] + h * sum);
        let mut factor = 1.0;
        for m in 1..=n {
            factor *= 4.0;
            let value = current[m - 1] + (current[m - 1] - previous[m - 1]) / (factor - 1.0);
            current.push(value);
        }

        let delta = (current[n] - current[n - 1]).abs();
        if !current[n].is_finite() {
            warn!("romberg: non-finite estimate on [{}, {}] after {} steps", a, b, n);
            return Estimate::diverged(current[n], n);
        }
        if n >= config.min_steps && delta < config.epsilon {
            debug!("romberg: converged on [{}, {}] after {} steps", a, b, n);
            return Estimate::converged(current[n], n);
        }
        previous = current;
    }

    let value = previous[config.max_steps];
    warn!(
        "romberg: no convergence on [{}, {}] within {} steps, estimate {}",
        a, b, config.max_steps, value
    );
    Estimate::diverged(value, config.max_steps)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MomentConfig {
    /// First guess for the upper integration bound.
    pub initial_bound: f64,
    /// The bound is doubled until the integrand falls below this value.
    pub threshold: f64,
    pub max_doublings: usize,
    /// Romberg tolerance, scaled by `bound^n` once the upper bound is known.
    pub epsilon: f64,
    pub romberg: RombergConfig,
}

impl MomentConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_initial_bound(mut self, initial_bound: f64) -> Self {
        self.initial_bound = initial_bound;
        self
    }

    pub fn with_romberg(mut self, romberg: RombergConfig) -> Self {
        self.romberg = romberg;
        self
    }
}

impl Default for MomentConfig {
    fn default() -> Self {
        Self {
            initial_bound: 1.0,
            threshold: 1e-10,
            max_doublings: 50,
            epsilon: 1e-11,
            romberg: RombergConfig::default(),
        }
    }
}

/// The `n`-th moment `E[X^n] = ∫₀^∞ n·x^(n-1)·R(x) dx` of the lifetime whose
/// reliability function is `distribution`.
///
/// The infinite range is cut at the first doubling of `initial_bound` where the
/// integrand drops below `threshold`. Fails for `n < 1`.
pub fn moment<D>(distribution: &D, n: i32, config: &MomentConfig) -> Result<Estimate>
where
    D: Distribution + ?Sized,
{
    if n < 1 {
        return Err(Error::InvalidArgument(format!("moment order must be at least 1, got {}", n)));
    }
    Ok(integrate_moment(distribution, n, config))
}

fn integrate_moment<D>(distribution: &D, n: i32, config: &MomentConfig) -> Estimate
where
    D: Distribution + ?Sized,
{
    let integrand = |x: f64| {
        if x == 0.0 {
            if n == 1 {
                distribution.reliability(0.0)
            } else {
                0.0
            }
        } else {
            n as f64 * x.powi(n - 1) * distribution.reliability(x)
        }
    };

    let mut bound = config.initial_bound;
    let mut bounded = false;
    for _ in 0..=config.max_doublings {
        if !(integrand(bound) > config.threshold) {
            bounded = true;
            break;
        }
        bound *= 2.0;
    }
    if !bounded {
        warn!(
            "moment: integrand of order {} still above {} at x = {}",
            n, config.threshold, bound
        );
    }
    debug!("moment: order {} integrated over [0, {}]", n, bound);

    let romberg_config = RombergConfig {
        epsilon: config.epsilon * bound.powi(n).max(1.0),
        ..config.romberg
    };
    let estimate = romberg(integrand, 0.0, bound, &romberg_config);

    Estimate {
        converged: estimate.converged && bounded,
        ..estimate
    }
}

/// Mean time to failure: the first moment.
pub fn mean<D>(distribution: &D, config: &MomentConfig) -> Estimate
where
    D: Distribution + ?Sized,
{
    integrate_moment(distribution, 1, config)
}

/// `E[X²] − E[X]²`.
pub fn variance<D>(distribution: &D, config: &MomentConfig) -> Estimate
where
    D: Distribution + ?Sized,
{
    let first = mean(distribution, config);
    let second = integrate_moment(distribution, 2, config);
    Estimate {
        value: second.value - first.value * first.value,
        iterations: first.iterations + second.iterations,
        converged: first.converged && second.converged,
    }
}
