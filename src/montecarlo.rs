//! Monte-Carlo estimation of the mean time to failure.
//!
//! Each run draws one lifetime per component by inverse transform sampling,
//! then fails the components in order of their lifetimes, fixing each one to
//! false, until the diagram can no longer be satisfied. The time of that last
//! failure is the system lifetime of the run. Runs only read the diagram, so
//! the manager does not grow however many runs are made.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bdd::Bdd;
use crate::distribution::{Sampled, Simulatable};
use crate::error::{Error, Result};
use crate::estimate::Estimate;
use crate::reference::Ref;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MonteCarloConfig {
    /// Stop when adding a run changes the running mean by less than this fraction.
    pub epsilon: f64,
    /// Runs performed before the stopping rule is applied.
    pub min_runs: usize,
    pub max_runs: usize,
    /// Random seed (None for random)
    pub seed: Option<u64>,
}

impl MonteCarloConfig {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            ..Self::default()
        }
    }

    pub fn with_min_runs(mut self, min_runs: usize) -> Self {
        self.min_runs = min_runs;
        self
    }

    pub fn with_max_runs(mut self, max_runs: usize) -> Self {
        self.max_runs = max_runs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            min_runs: 10_000,
            max_runs: 1_000_000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonteCarloResult {
    /// Estimated mean time to failure.
    pub mean: f64,
    pub runs: usize,
    pub converged: bool,
    /// Sampled system lifetimes, one per run.
    pub samples: Vec<f64>,
}

impl MonteCarloResult {
    pub fn estimate(&self) -> Estimate {
        Estimate {
            value: self.mean,
            iterations: self.runs,
            converged: self.converged,
        }
    }

    /// Standard error of the mean.
    pub fn std_error(&self) -> f64 {
        let n = self.samples.len() as f64;
        if n < 2.0 {
            return f64::NAN;
        }
        let variance = self.samples.iter().map(|&t| (t - self.mean).powi(2)).sum::<f64>() / (n - 1.0);
        (variance / n).sqrt()
    }

    /// Empirical reliability curve of the sampled lifetimes.
    pub fn empirical(&self) -> Result<Sampled> {
        Sampled::empirical(&self.samples)
    }
}

/// Simulates system lifetimes over a diagram with simulatable component distributions.
pub struct MonteCarloEvaluator<'a, D: ?Sized + Simulatable = dyn Simulatable> {
    bdd: &'a Bdd,
    root: Ref,
    distributions: HashMap<u32, Arc<D>>,
    variables: Vec<u32>,
    config: MonteCarloConfig,
}

impl<'a, D> MonteCarloEvaluator<'a, D>
where
    D: Simulatable + ?Sized,
{
    /// Fails if a variable of `root` has no distribution.
    pub fn new(bdd: &'a Bdd, root: Ref, distributions: HashMap<u32, Arc<D>>, config: MonteCarloConfig) -> Result<Self> {
        if let Some(v) = bdd.support(root).into_iter().find(|v| !distributions.contains_key(v)) {
            return Err(Error::InvalidArgument(format!("no distribution for variable x{}", v)));
        }
        Ok(Self::from_parts(bdd, root, distributions, config))
    }

    pub(crate) fn from_parts(
        bdd: &'a Bdd,
        root: Ref,
        distributions: HashMap<u32, Arc<D>>,
        config: MonteCarloConfig,
    ) -> Self {
        let variables = bdd.support(root);
        Self {
            bdd,
            root,
            distributions,
            variables,
            config,
        }
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Run the simulation with a generator seeded from `config.seed`, or from
    /// the thread-local generator when no seed is set.
    pub fn evaluate(&self) -> MonteCarloResult {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        self.evaluate_with_rng(&mut rng)
    }

    pub fn evaluate_with_rng<R: Rng>(&self, rng: &mut R) -> MonteCarloResult {
        if self.bdd.is_terminal(self.root) {
            let mean = if self.bdd.is_zero(self.root) {
                0.0
            } else {
                warn!("monte-carlo: the system never fails");
                f64::INFINITY
            };
            return MonteCarloResult {
                mean,
                runs: 0,
                converged: true,
                samples: Vec::new(),
            };
        }

        let mut samples = Vec::new();
        let mut mean = 0.0;
        let mut converged = false;

        while samples.len() < self.config.max_runs {
            let lifetime = self.run(rng);
            samples.push(lifetime);

            let previous = mean;
            let n = samples.len() as f64;
            mean += (lifetime - mean) / n;

            if samples.len() >= self.config.min_runs {
                let change = if mean == previous {
                    0.0
                } else {
                    ((mean - previous) / mean).abs()
                };
                if change < self.config.epsilon {
                    converged = true;
                    break;
                }
            }
        }

        if converged {
            debug!("monte-carlo: mean {} after {} runs", mean, samples.len());
        } else {
            warn!(
                "monte-carlo: no convergence after {} runs, estimate {}",
                samples.len(),
                mean
            );
        }

        MonteCarloResult {
            mean,
            runs: samples.len(),
            converged,
            samples,
        }
    }

    /// One simulated system lifetime.
    fn run<R: Rng>(&self, rng: &mut R) -> f64 {
        let mut failures: Vec<(u32, f64)> = self
            .variables
            .iter()
            .map(|&v| {
                // `1 - u` lies in (0, 1], avoiding an infinite lifetime.
                let y = 1.0 - rng.random::<f64>();
                let t = match self.distributions.get(&v) {
                    Some(d) => d.inverse(y),
                    None => f64::NAN,
                };
                (v, t)
            })
            .collect();
        failures.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut failed = vec![false; self.variables.last().map_or(0, |&v| v as usize + 1)];
        for &(v, t) in &failures {
            failed[v as usize] = true;
            if !self.bdd.is_satisfiable_with(self.root, |u| failed[u as usize]) {
                trace!("monte-carlo: failed at {} by x{}", t, v);
                return t;
            }
        }

        debug!("monte-carlo: system survived all component failures");
        0.0
    }
}

impl<D> std::fmt::Debug for MonteCarloEvaluator<'_, D>
where
    D: Simulatable + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonteCarloEvaluator")
            .field("root", &self.root)
            .field("variables", &self.variables)
            .field("config", &self.config)
            .finish()
    }
}
