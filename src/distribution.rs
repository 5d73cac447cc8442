//! Component lifetime distributions.
//!
//! A [`Distribution`] is a reliability function `x ↦ R(x) = P(T > x)`.
//! Distributions that can be sampled also implement [`Simulatable`], which adds
//! the inverse `y ↦ x` with `R(x) = y`. Lifetime distributions return `NaN`
//! for negative or `NaN` time, and every inverse returns `NaN` outside `[0, 1]`.

use std::fmt::Debug;
use std::sync::Arc;

use log::debug;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Error, Result};
use crate::integral::{romberg, RombergConfig};
use crate::inverse::InverseEvaluator;

pub trait Distribution {
    /// Probability of surviving past time `x`.
    fn reliability(&self, x: f64) -> f64;

    /// Probability of having failed by time `x`.
    fn unreliability(&self, x: f64) -> f64 {
        1.0 - self.reliability(x)
    }
}

/// A distribution whose lifetimes can be drawn by inverse transform sampling.
pub trait Simulatable: Distribution {
    /// The time `x` with `R(x) = y`.
    fn inverse(&self, y: f64) -> f64;
}

impl<D: Distribution + ?Sized> Distribution for &D {
    fn reliability(&self, x: f64) -> f64 {
        (**self).reliability(x)
    }
}

impl<D: Simulatable + ?Sized> Simulatable for &D {
    fn inverse(&self, y: f64) -> f64 {
        (**self).inverse(y)
    }
}

impl<D: Distribution + ?Sized> Distribution for Arc<D> {
    fn reliability(&self, x: f64) -> f64 {
        (**self).reliability(x)
    }
}

impl<D: Simulatable + ?Sized> Simulatable for Arc<D> {
    fn inverse(&self, y: f64) -> f64 {
        (**self).inverse(y)
    }
}

fn invalid_time(x: f64) -> bool {
    x.is_nan() || x < 0.0
}

fn invalid_probability(y: f64) -> bool {
    !(0.0..=1.0).contains(&y)
}

fn positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidArgument(format!("{} must be positive and finite, got {}", name, value)))
    }
}

/// Constant failure rate: `R(x) = exp(-λx)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    pub fn new(rate: f64) -> Result<Self> {
        Ok(Self {
            rate: positive("rate", rate)?,
        })
    }

    /// Exponential distribution with the given mean time to failure.
    pub fn with_mean(mean: f64) -> Result<Self> {
        Self::new(1.0 / positive("mean", mean)?)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Distribution for Exponential {
    fn reliability(&self, x: f64) -> f64 {
        if invalid_time(x) {
            return f64::NAN;
        }
        (-self.rate * x).exp()
    }
}

impl Simulatable for Exponential {
    fn inverse(&self, y: f64) -> f64 {
        if invalid_probability(y) {
            return f64::NAN;
        }
        -y.ln() / self.rate
    }
}

/// `R(x) = exp(-(x/scale)^shape)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Weibull {
    shape: f64,
    scale: f64,
}

impl Weibull {
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        Ok(Self {
            shape: positive("shape", shape)?,
            scale: positive("scale", scale)?,
        })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Distribution for Weibull {
    fn reliability(&self, x: f64) -> f64 {
        if invalid_time(x) {
            return f64::NAN;
        }
        (-(x / self.scale).powf(self.shape)).exp()
    }
}

impl Simulatable for Weibull {
    fn inverse(&self, y: f64) -> f64 {
        if invalid_probability(y) {
            return f64::NAN;
        }
        self.scale * (-y.ln()).powf(1.0 / self.shape)
    }
}

/// Lifetime whose logarithm is normal with mean `mu` and deviation `sigma`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LogNormal {
    mu: f64,
    sigma: f64,
    normal: Normal,
}

impl LogNormal {
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() {
            return Err(Error::InvalidArgument(format!("mu must be finite, got {}", mu)));
        }
        let sigma = positive("sigma", sigma)?;
        let normal = Normal::new(mu, sigma).map_err(Error::invalid)?;
        Ok(Self { mu, sigma, normal })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Distribution for LogNormal {
    fn reliability(&self, x: f64) -> f64 {
        if invalid_time(x) {
            return f64::NAN;
        }
        if x == 0.0 {
            return 1.0;
        }
        self.normal.sf(x.ln())
    }
}

impl Simulatable for LogNormal {
    fn inverse(&self, y: f64) -> f64 {
        if invalid_probability(y) {
            return f64::NAN;
        }
        if y == 0.0 {
            return f64::INFINITY;
        }
        if y == 1.0 {
            return 0.0;
        }
        self.normal.inverse_cdf(1.0 - y).exp()
    }
}

/// Time-independent probability, e.g. for a component that is either
/// present or absent. It has no lifetime and cannot be simulated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Result<Self> {
        if invalid_probability(value) {
            return Err(Error::InvalidArgument(format!("probability must lie in [0, 1], got {}", value)));
        }
        Ok(Self { value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Distribution for Constant {
    fn reliability(&self, x: f64) -> f64 {
        if invalid_time(x) {
            return f64::NAN;
        }
        self.value
    }
}

/// Piecewise-linear reliability curve through sampled points.
///
/// Before the first point the curve keeps the first value, after the last
/// point it keeps the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampled {
    points: Vec<(f64, f64)>,
}

impl Sampled {
    /// Points must be non-empty, with non-negative non-decreasing times and
    /// non-increasing probabilities in `[0, 1]`.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidArgument("sampled curve needs at least one point".to_string()));
        }
        for (i, &(x, y)) in points.iter().enumerate() {
            if invalid_time(x) || !x.is_finite() {
                return Err(Error::InvalidArgument(format!("invalid time {} at point {}", x, i)));
            }
            if invalid_probability(y) {
                return Err(Error::InvalidArgument(format!("invalid probability {} at point {}", y, i)));
            }
            if i > 0 {
                let (px, py) = points[i - 1];
                if x < px {
                    return Err(Error::InvalidArgument(format!("times decrease at point {}", i)));
                }
                if y > py {
                    return Err(Error::InvalidArgument(format!("probabilities increase at point {}", i)));
                }
            }
        }
        Ok(Self { points })
    }

    /// Empirical reliability curve of observed lifetimes.
    ///
    /// The curve starts at `(0, 1)` and steps down by `1/n` at each observation,
    /// interpolating linearly in between.
    pub fn empirical(lifetimes: &[f64]) -> Result<Self> {
        if lifetimes.is_empty() {
            return Err(Error::InvalidArgument("no lifetimes to build a curve from".to_string()));
        }
        let mut sorted = lifetimes.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len() as f64;
        let mut points = Vec::with_capacity(sorted.len() + 1);
        points.push((0.0, 1.0));
        for (i, &t) in sorted.iter().enumerate() {
            points.push((t, 1.0 - (i + 1) as f64 / n));
        }
        debug!("empirical: {} lifetimes up to {}", sorted.len(), sorted[sorted.len() - 1]);
        Self::new(points)
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

impl Distribution for Sampled {
    fn reliability(&self, x: f64) -> f64 {
        if invalid_time(x) {
            return f64::NAN;
        }
        // First point strictly after `x`.
        let j = self.points.partition_point(|&(px, _)| px <= x);
        if j == 0 {
            return self.points[0].1;
        }
        if j == self.points.len() {
            return self.points[j - 1].1;
        }
        let (x0, y0) = self.points[j - 1];
        let (x1, y1) = self.points[j];
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

impl Simulatable for Sampled {
    fn inverse(&self, y: f64) -> f64 {
        if invalid_probability(y) {
            return f64::NAN;
        }
        let (first_x, first_y) = self.points[0];
        if y >= first_y {
            return first_x;
        }
        // First point at or below `y`.
        let j = self.points.partition_point(|&(_, py)| py > y);
        if j == self.points.len() {
            return self.points[j - 1].0;
        }
        let (x0, y0) = self.points[j - 1];
        let (x1, y1) = self.points[j];
        x0 + (x1 - x0) * (y0 - y) / (y0 - y1)
    }
}

/// Lifetime of components that all must work: the minimum of their lifetimes.
#[derive(Clone)]
pub struct Series {
    components: Vec<Arc<dyn Distribution>>,
    inverse: InverseEvaluator,
}

impl Series {
    pub fn new(components: Vec<Arc<dyn Distribution>>) -> Self {
        Self {
            components,
            inverse: InverseEvaluator::default(),
        }
    }

    pub fn components(&self) -> &[Arc<dyn Distribution>] {
        &self.components
    }
}

impl Distribution for Series {
    fn reliability(&self, x: f64) -> f64 {
        if invalid_time(x) {
            return f64::NAN;
        }
        self.components.iter().map(|d| d.reliability(x)).product()
    }
}

impl Simulatable for Series {
    fn inverse(&self, y: f64) -> f64 {
        self.inverse.evaluate(self, y).value
    }
}

/// Lifetime of redundant components: the maximum of their lifetimes.
#[derive(Clone)]
pub struct Parallel {
    components: Vec<Arc<dyn Distribution>>,
    inverse: InverseEvaluator,
}

impl Parallel {
    pub fn new(components: Vec<Arc<dyn Distribution>>) -> Self {
        Self {
            components,
            inverse: InverseEvaluator::default(),
        }
    }

    pub fn components(&self) -> &[Arc<dyn Distribution>] {
        &self.components
    }
}

impl Distribution for Parallel {
    fn reliability(&self, x: f64) -> f64 {
        if invalid_time(x) {
            return f64::NAN;
        }
        1.0 - self.components.iter().map(|d| d.unreliability(x)).product::<f64>()
    }
}

impl Simulatable for Parallel {
    fn inverse(&self, y: f64) -> f64 {
        self.inverse.evaluate(self, y).value
    }
}

/// Lifetime of a cold standby pair: `first` runs until it fails, then `second` takes over.
///
/// `R(x) = R₁(x) + ∫₀ˣ f₁(t)·R₂(x − t) dt`, with the density `f₁` taken by
/// finite differences and the convolution integrated with Romberg's method.
#[derive(Clone)]
pub struct Sum {
    first: Arc<dyn Distribution>,
    second: Arc<dyn Distribution>,
    romberg: RombergConfig,
    inverse: InverseEvaluator,
}

impl Sum {
    pub fn new(first: Arc<dyn Distribution>, second: Arc<dyn Distribution>) -> Self {
        Self {
            first,
            second,
            romberg: RombergConfig::new(1e-9).with_max_steps(16),
            inverse: InverseEvaluator::default(),
        }
    }

    pub fn with_romberg(mut self, config: RombergConfig) -> Self {
        self.romberg = config;
        self
    }
}

/// `-dR/dx` by central differences, or forward differences near the origin.
pub(crate) fn density<D>(distribution: &D, x: f64) -> f64
where
    D: Distribution + ?Sized,
{
    if invalid_time(x) {
        return f64::NAN;
    }
    let h = 1e-6 * x.abs().max(1.0);
    if x < h {
        (distribution.reliability(x) - distribution.reliability(x + h)) / h
    } else {
        (distribution.reliability(x - h) - distribution.reliability(x + h)) / (2.0 * h)
    }
}

impl Distribution for Sum {
    fn reliability(&self, x: f64) -> f64 {
        if invalid_time(x) {
            return f64::NAN;
        }
        let survival = self.first.reliability(x);
        let handover = romberg(
            |t| density(self.first.as_ref(), t) * self.second.reliability(x - t),
            0.0,
            x,
            &self.romberg,
        );
        (survival + handover.value).clamp(0.0, 1.0)
    }
}

impl Simulatable for Sum {
    fn inverse(&self, y: f64) -> f64 {
        self.inverse.evaluate(self, y).value
    }
}

impl Debug for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Series").field("components", &self.components.len()).finish()
    }
}

impl Debug for Parallel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parallel").field("components", &self.components.len()).finish()
    }
}

impl Debug for Sum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sum").field("romberg", &self.romberg).finish()
    }
}
