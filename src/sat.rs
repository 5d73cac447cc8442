use std::collections::{HashMap, HashSet};

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::reference::Ref;

impl Bdd {
    /// Number of assignments to variables `1..=num_vars` satisfying `node`.
    ///
    /// For a structure function this is the number of component state
    /// vectors in which the system works.
    pub fn sat_count(&self, node: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(2u32).pow(num_vars as u32);
        self.sat_count_(node, &max, &mut cache)
    }

    fn sat_count_(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let low = self.low(node.index());
        let high = self.high(node.index());

        let count_low = self.sat_count_(low, max, cache);
        let count_high = self.sat_count_(high, max, cache);

        let count: BigUint = (count_low + count_high) >> 1;
        let count = if node.is_negated() { max - count } else { count };

        cache.insert(node, count.clone());
        count
    }

    /// Whether `node` stays satisfiable when every variable `v` with
    /// `is_false(v)` is fixed to false and the others remain free.
    ///
    /// Walks the diagram without creating nodes.
    pub fn is_satisfiable_with<F>(&self, node: Ref, is_false: F) -> bool
    where
        F: Fn(u32) -> bool,
    {
        let mut visited = HashSet::new();
        let mut stack = vec![node];

        while let Some(f) = stack.pop() {
            if self.is_one(f) {
                return true;
            }
            if self.is_zero(f) || !visited.insert(f) {
                continue;
            }
            stack.push(self.low_node(f));
            if !is_false(self.variable(f.index())) {
                stack.push(self.high_node(f));
            }
        }

        false
    }
}
