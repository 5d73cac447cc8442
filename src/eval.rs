//! Exact top-event probability by Shannon decomposition.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, trace};

use crate::bdd::Bdd;
use crate::distribution::Distribution;
use crate::reference::Ref;

/// Evaluates the probability that a diagram is true, given the probability
/// of each of its variables being true.
///
/// The first evaluation linearizes the diagram (children before parents) and
/// caches the order; every evaluation after that is a single pass over it.
/// Values computed during one evaluation are never reused by another.
#[derive(Debug)]
pub struct TopEventEvaluator<'a> {
    bdd: &'a Bdd,
    root: Ref,
    order: OnceCell<Vec<u32>>,
}

impl<'a> TopEventEvaluator<'a> {
    pub fn new(bdd: &'a Bdd, root: Ref) -> Self {
        Self {
            bdd,
            root,
            order: OnceCell::new(),
        }
    }

    pub fn bdd(&self) -> &'a Bdd {
        self.bdd
    }

    pub fn root(&self) -> Ref {
        self.root
    }

    /// Whether the topological order has been computed.
    pub fn is_sorted(&self) -> bool {
        self.order.get().is_some()
    }

    /// Non-terminal node indices reachable from the root, each after both of its children.
    pub fn order(&self) -> &[u32] {
        self.order.get_or_init(|| self.linearize())
    }

    fn linearize(&self) -> Vec<u32> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        // (node index, children already pushed)
        let mut stack = vec![(self.root.index(), false)];

        while let Some((i, expanded)) = stack.pop() {
            if self.bdd.is_terminal(Ref::positive(i)) {
                continue;
            }
            if expanded {
                order.push(i);
                continue;
            }
            if !visited.insert(i) {
                continue;
            }
            stack.push((i, true));
            // Low is pushed first so that high is visited first.
            stack.push((self.bdd.low(i).index(), false));
            stack.push((self.bdd.high(i).index(), false));
        }

        debug!("linearize: {} nodes below {}", order.len(), self.root);
        order
    }

    /// Evaluate with `reliability(v)` giving the probability that variable `v` is true.
    ///
    /// `reliability` is called at most once per variable.
    pub fn evaluate_by<F>(&self, mut reliability: F) -> f64
    where
        F: FnMut(u32) -> f64,
    {
        if self.bdd.is_one(self.root) {
            return 1.0;
        }
        if self.bdd.is_zero(self.root) {
            return 0.0;
        }

        let mut per_variable: HashMap<u32, f64> = HashMap::new();
        let mut memo: HashMap<u32, f64> = HashMap::with_capacity(self.order().len());

        let value_of = |memo: &HashMap<u32, f64>, node: Ref| -> f64 {
            let value = if self.bdd.is_terminal(node) {
                1.0
            } else {
                memo[&node.index()]
            };
            if node.is_negated() {
                1.0 - value
            } else {
                value
            }
        };

        for &i in self.order() {
            let v = self.bdd.variable(i);
            let r = *per_variable.entry(v).or_insert_with(|| reliability(v));
            let high = value_of(&memo, self.bdd.high(i));
            let low = value_of(&memo, self.bdd.low(i));
            let value = r * high + (1.0 - r) * low;
            trace!("node {} (x{}): r = {}, value = {}", i, v, r, value);
            memo.insert(i, value);
        }

        value_of(&memo, self.root)
    }

    /// Evaluate with precomputed per-variable values. Missing variables yield `NaN`.
    pub fn evaluate_values(&self, values: &HashMap<u32, f64>) -> f64 {
        self.evaluate_by(|v| values.get(&v).copied().unwrap_or(f64::NAN))
    }

    /// Evaluate at time `x`, with each variable's reliability taken from its distribution.
    /// Missing variables yield `NaN`.
    pub fn evaluate<D>(&self, distributions: &HashMap<u32, Arc<D>>, x: f64) -> f64
    where
        D: Distribution + ?Sized,
    {
        self.evaluate_by(|v| match distributions.get(&v) {
            Some(d) => d.reliability(x),
            None => f64::NAN,
        })
    }
}
