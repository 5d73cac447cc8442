//! Reliability of a whole system as a function of time.

use std::collections::HashMap;
use std::sync::Arc;

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::distribution::{density, Distribution, Simulatable};
use crate::error::{Error, Result};
use crate::estimate::Estimate;
use crate::eval::TopEventEvaluator;
use crate::integral::{self, MomentConfig};
use crate::inverse::{InverseConfig, InverseEvaluator};
use crate::montecarlo::{MonteCarloConfig, MonteCarloEvaluator};
use crate::reference::Ref;

/// `R(x)` of a structure function whose variables fail according to
/// per-variable distributions.
///
/// Each query runs one top-event evaluation at the requested time.
/// The function is itself a [`Distribution`], so it can be integrated,
/// inverted, or composed further.
pub struct ReliabilityFunction<'a, D: ?Sized + Distribution = dyn Distribution> {
    evaluator: TopEventEvaluator<'a>,
    distributions: HashMap<u32, Arc<D>>,
    moments: MomentConfig,
    inverse: InverseEvaluator,
}

impl<'a, D> ReliabilityFunction<'a, D>
where
    D: Distribution + ?Sized,
{
    /// Fails if a variable of `root` has no distribution.
    pub fn new(bdd: &'a Bdd, root: Ref, distributions: HashMap<u32, Arc<D>>) -> Result<Self> {
        if let Some(v) = bdd.support(root).into_iter().find(|v| !distributions.contains_key(v)) {
            return Err(Error::InvalidArgument(format!("no distribution for variable x{}", v)));
        }
        Ok(Self {
            evaluator: TopEventEvaluator::new(bdd, root),
            distributions,
            moments: MomentConfig::default(),
            inverse: InverseEvaluator::default(),
        })
    }

    pub fn with_moment_config(mut self, config: MomentConfig) -> Self {
        self.moments = config;
        self
    }

    pub fn with_inverse_config(mut self, config: InverseConfig) -> Self {
        self.inverse = InverseEvaluator::new(config);
        self
    }

    pub fn bdd(&self) -> &'a Bdd {
        self.evaluator.bdd()
    }

    pub fn root(&self) -> Ref {
        self.evaluator.root()
    }

    pub fn distributions(&self) -> &HashMap<u32, Arc<D>> {
        &self.distributions
    }

    pub fn reliability_at(&self, x: f64) -> f64 {
        if x.is_nan() || x < 0.0 {
            return f64::NAN;
        }
        self.evaluator.evaluate(&self.distributions, x)
    }

    pub fn unreliability_at(&self, x: f64) -> f64 {
        1.0 - self.reliability_at(x)
    }

    /// Failure density `-dR/dx`, by finite differences.
    pub fn density_at(&self, x: f64) -> f64 {
        density(self, x)
    }

    /// Hazard rate `f(x) / R(x)`.
    pub fn failure_rate_at(&self, x: f64) -> f64 {
        self.density_at(x) / self.reliability_at(x)
    }

    /// Mean time to failure.
    pub fn mttf(&self) -> Estimate {
        integral::mean(self, &self.moments)
    }

    pub fn moment(&self, n: i32) -> Result<Estimate> {
        integral::moment(self, n, &self.moments)
    }

    pub fn variance(&self) -> Estimate {
        integral::variance(self, &self.moments)
    }

    /// Time at which the reliability drops to `target`.
    pub fn mission_time(&self, target: f64) -> Estimate {
        self.inverse.evaluate(self, target)
    }

    /// Number of component state vectors over the variables `1..=num_vars`
    /// in which the system works.
    pub fn working_states(&self) -> BigUint {
        let bdd = self.bdd();
        bdd.sat_count(self.root(), bdd.num_vars() as usize)
    }
}

impl<'a, D> ReliabilityFunction<'a, D>
where
    D: Simulatable + ?Sized,
{
    /// Monte-Carlo estimator over the same diagram and distributions.
    pub fn monte_carlo(&self, config: MonteCarloConfig) -> MonteCarloEvaluator<'a, D> {
        MonteCarloEvaluator::from_parts(self.bdd(), self.root(), self.distributions.clone(), config)
    }
}

impl<D> Distribution for ReliabilityFunction<'_, D>
where
    D: Distribution + ?Sized,
{
    fn reliability(&self, x: f64) -> f64 {
        self.reliability_at(x)
    }
}

impl<D> Simulatable for ReliabilityFunction<'_, D>
where
    D: Distribution + ?Sized,
{
    fn inverse(&self, y: f64) -> f64 {
        self.mission_time(y).value
    }
}

impl<D> std::fmt::Debug for ReliabilityFunction<'_, D>
where
    D: Distribution + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReliabilityFunction")
            .field("root", &self.root())
            .field("variables", &self.distributions.len())
            .finish()
    }
}
