//! Weighted threshold constraints `Σ cᵢ·fᵢ ⋈ rhs` over diagrams.
//!
//! The constraint is built by Shannon expansion over the operands in order,
//! memoized on `(position, partial sum)`. A branch collapses to a terminal as
//! soon as the remaining operands can no longer change the outcome.
//!
//! Partial sums are kept in `i128`, which holds any sum of `i64` weights.

use std::collections::HashMap;

use log::debug;

use crate::bdd::Bdd;
use crate::error::{Error, Result};
use crate::reference::Ref;
use crate::types::Comparator;

struct Threshold<'a> {
    coefficients: &'a [i64],
    nodes: &'a [Ref],
    comparator: Comparator,
    rhs: i128,
    /// `rest[i]` is the (min, max) sum reachable by operands `i..`.
    rest: Vec<(i128, i128)>,
    cache: HashMap<(usize, i128), Ref>,
}

impl Bdd {
    /// Diagram of `Σ coefficients[i]·[nodes[i]] ⋈ rhs`, each operand counting as 0 or 1.
    ///
    /// Fails with [`Error::InvalidArgument`] if the lists differ in length.
    pub fn apply_threshold(&self, coefficients: &[i64], nodes: &[Ref], comparator: Comparator, rhs: i64) -> Result<Ref> {
        debug!(
            "apply_threshold(coefficients = {:?}, nodes = {:?}, {} {})",
            coefficients, nodes, comparator, rhs
        );

        if coefficients.len() != nodes.len() {
            return Err(Error::InvalidArgument(format!(
                "threshold has {} coefficients but {} operands",
                coefficients.len(),
                nodes.len()
            )));
        }

        let mut rest = vec![(0, 0); nodes.len() + 1];
        for i in (0..nodes.len()).rev() {
            let c = coefficients[i] as i128;
            let (lo, hi) = rest[i + 1];
            rest[i] = (lo + c.min(0), hi + c.max(0));
        }

        let mut threshold = Threshold {
            coefficients,
            nodes,
            comparator,
            rhs: rhs as i128,
            rest,
            cache: HashMap::new(),
        };
        Ok(self.threshold_(&mut threshold, 0, 0))
    }

    fn threshold_(&self, t: &mut Threshold<'_>, i: usize, sum: i128) -> Ref {
        let (lo, hi) = t.rest[i];
        if let Some(decided) = decide(t.comparator, sum + lo, sum + hi, t.rhs) {
            return if decided { self.one } else { self.zero };
        }
        assert!(i < t.nodes.len());

        if let Some(&res) = t.cache.get(&(i, sum)) {
            return res;
        }

        let high = self.threshold_(t, i + 1, sum + t.coefficients[i] as i128);
        let low = self.threshold_(t, i + 1, sum);
        let res = self.apply_ite(t.nodes[i], high, low);
        t.cache.insert((i, sum), res);
        res
    }
}

/// Outcome of `s ⋈ rhs` if it is the same for every `s` in `lo..=hi`.
fn decide(comparator: Comparator, lo: i128, hi: i128, rhs: i128) -> Option<bool> {
    match comparator {
        Comparator::Eq => {
            if rhs < lo || rhs > hi {
                Some(false)
            } else if lo == hi {
                Some(true)
            } else {
                None
            }
        }
        _ => {
            let a = comparator.holds(lo, rhs);
            let b = comparator.holds(hi, rhs);
            if a == b {
                Some(a)
            } else {
                None
            }
        }
    }
}
