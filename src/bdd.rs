//! The decision-diagram engine.
//!
//! [`Bdd`] is a manager owning a hash-consed node table and an operation cache.
//! Every Boolean function is a [`Ref`] into that table: a signed node index,
//! where the sign marks a complemented edge. There is a single terminal node
//! (index 1): `one` is its positive reference, `zero` its complement.
//!
//! Variables are 1-indexed and ordered by index: smaller indices sit closer to the root.
//!
//! All operations take `&self` and never modify existing nodes, so a handle stays
//! valid for the whole lifetime of the manager. The `*_assign` variants overwrite
//! the left operand in place for callers that do not need to keep it.

use std::cell::{Cell, RefCell};
use std::cmp::min;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::reference::Ref;
use crate::table::Table;
use crate::utils::{pairing3, MyHash};

/// Default hard cap on the number of variables.
pub const DEFAULT_MAX_VARIABLES: u32 = 1 << 16;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Node {
    variable: u32,
    low: Ref,
    high: Ref,
}

#[allow(clippy::derivable_impls)]
impl Default for Node {
    fn default() -> Self {
        Self {
            variable: 0,
            low: Ref::new(0),
            high: Ref::new(0),
        }
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(self.variable as u64, self.low.unsigned() as u64, self.high.unsigned() as u64)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpKey {
    Ite(Ref, Ref, Ref),
}

pub struct Bdd {
    storage: RefCell<Table<Node>>,
    cache: RefCell<Cache<OpKey, Ref>>,
    size_cache: RefCell<Cache<Ref, u64>>,
    num_vars: Cell<u32>,
    max_vars: u32,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    /// Create a manager with initial room for `2^storage_bits` nodes.
    ///
    /// The node table doubles on demand, so `storage_bits` only sizes the first allocation.
    pub fn new(storage_bits: usize) -> Self {
        assert!(storage_bits <= 31, "Storage bits should be in the range 0..=31");

        let cache_bits = min(storage_bits, 16);

        let mut storage = Table::new(storage_bits.max(1));

        // Allocate the terminal node:
        let one = storage.put(Node::default());
        assert_eq!(one, 1); // Make sure the terminal node is (1).
        let one = Ref::positive(one as u32);
        let zero = -one;

        Self {
            storage: RefCell::new(storage),
            cache: RefCell::new(Cache::new(cache_bits)),
            size_cache: RefCell::new(Cache::new(cache_bits)),
            num_vars: Cell::new(0),
            max_vars: DEFAULT_MAX_VARIABLES,
            zero,
            one,
        }
    }

    /// Set the hard cap on the number of variables.
    pub fn with_max_variables(mut self, max_vars: u32) -> Self {
        assert!(max_vars > 0, "Maximum number of variables should be positive");
        self.max_vars = max_vars;
        self
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(16)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Bdd")
            .field("capacity", &storage.capacity())
            .field("size", &storage.size())
            .field("num_vars", &self.num_vars.get())
            .field("max_vars", &self.max_vars)
            .finish()
    }
}

impl Bdd {
    pub fn cache(&self) -> std::cell::Ref<'_, Cache<OpKey, Ref>> {
        self.cache.borrow()
    }

    /// Number of nodes allocated so far, including the terminal.
    pub fn num_nodes(&self) -> usize {
        self.storage.borrow().size()
    }

    /// Largest variable index created so far.
    pub fn num_vars(&self) -> u32 {
        self.num_vars.get()
    }

    /// Hard cap on variable indices.
    pub fn max_variables(&self) -> u32 {
        self.max_vars
    }

    pub fn variable(&self, index: u32) -> u32 {
        self.storage.borrow()[index as usize].variable
    }
    pub fn low(&self, index: u32) -> Ref {
        self.storage.borrow()[index as usize].low
    }
    pub fn high(&self, index: u32) -> Ref {
        self.storage.borrow()[index as usize].high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        self.is_zero(node) || self.is_one(node)
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        assert_ne!(v, 0, "Variable index should not be zero");

        // Handle canonicity
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        // Handle duplicates
        if low == high {
            return low;
        }

        let i = self.storage.borrow_mut().put(Node { variable: v, low, high });
        Ref::positive(i as u32)
    }

    /// The diagram of the `v`-th variable.
    pub fn mk_var(&self, v: u32) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");
        assert!(
            v <= self.max_vars,
            "Variable index {} exceeds the maximum of {}",
            v,
            self.max_vars
        );
        if v > self.num_vars.get() {
            self.num_vars.set(v);
        }
        self.mk_node(v, self.zero, self.one)
    }

    /// Conjunction of signed literals (DIMACS-style: `-v` means `v = false`).
    pub fn cube(&self, literals: impl IntoIterator<Item = i32>) -> Ref {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort_by_key(|&v| v.abs());
        debug!("cube(literals = {:?})", literals);
        literals.reverse();
        let mut current = self.one;
        for lit in literals {
            assert_ne!(lit, 0, "Variable index should not be zero");
            self.mk_var(lit.unsigned_abs());
            current = if lit < 0 {
                self.mk_node(lit.unsigned_abs(), current, self.zero)
            } else {
                self.mk_node(lit.unsigned_abs(), self.zero, current)
            };
        }
        current
    }

    fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        assert_ne!(v, 0, "Variable index should not be zero");

        let i = node.index();
        if self.is_terminal(node) || v < self.variable(i) {
            return (node, node);
        }
        assert_eq!(v, self.variable(i));
        if node.is_negated() {
            (-self.low(i), -self.high(i))
        } else {
            (self.low(i), self.high(i))
        }
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_reliability::bdd::Bdd;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.mk_var(1);
    /// let y = bdd.mk_var(2);
    /// let z = bdd.mk_var(3);
    /// let f = bdd.apply_ite(x, y, z);
    /// let x_and_y = bdd.apply_and(x, y);
    /// let not_x_and_z = bdd.apply_and(-x, z);
    /// assert_eq!(f, bdd.apply_or(x_and_y, not_x_and_z));
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }

        // From now on, F is known not to be a constant
        assert!(!self.is_terminal(f));

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        //   ite(F,1,~F) => 1
        //   ite(F,F,1) => 1
        //   ite(F,~F,0) => 0
        //   ite(F,0,F) => F
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }
        if self.is_one(g) && h == -f {
            return self.one;
        }
        if g == f && self.is_one(h) {
            return self.one;
        }
        if g == -f && self.is_zero(h) {
            return self.zero;
        }
        if self.is_zero(g) && h == f {
            return f;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, self.one, h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero);
        }
        if g == -f {
            return self.apply_ite(f, self.zero, h);
        }
        if h == -f {
            return self.apply_ite(f, g, self.one);
        }

        let i = self.variable(f.index());
        let j = self.variable(g.index());
        let k = self.variable(h.index());
        assert_ne!(i, 0);

        // Equivalent pairs:
        //   ite(F,1,H) == ite(H,1,F) == F ∨ H
        //   ite(F,G,0) == ite(G,F,0) == F ∧ G
        //   ite(F,G,1) == ite(~G,~F,1) == F -> G
        //   ite(F,0,H) == ite(~H,0,~F) == ~F ∧ H
        //   ite(F,G,~G) == ite(G,F,~F)
        // (choose the one with the lowest variable)
        if self.is_one(g) && k < i {
            assert_ne!(k, 0);
            return self.apply_ite(h, self.one, f);
        }
        if self.is_zero(h) && j < i {
            assert_ne!(j, 0);
            return self.apply_ite(g, f, self.zero);
        }
        if self.is_one(h) && j < i {
            assert_ne!(j, 0);
            return self.apply_ite(-g, -f, self.one);
        }
        if self.is_zero(g) && k < i {
            assert_ne!(k, 0);
            return self.apply_ite(-h, self.zero, -f);
        }
        if g == -h && j < i {
            assert_ne!(j, 0);
            return self.apply_ite(g, f, -f);
        }

        // Make sure the first two pointers (f and g) are regular (not negated)
        let (mut f, mut g, mut h) = (f, g, h);

        // ite(~F,G,H) => ite(F,H,G)
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = OpKey::Ite(f, g, h);
        if let Some(res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return if n { -res } else { res };
        }

        // Determine the top variable:
        let mut m = self.variable(f.index());
        let j = self.variable(g.index());
        let k = self.variable(h.index());
        if j != 0 {
            m = m.min(j);
        }
        if k != 0 {
            m = m.min(k);
        }
        assert_ne!(m, 0);

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);

        let res = self.mk_node(m, e, t);
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        if n {
            -res
        } else {
            res
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, -v)
    }

    pub fn apply_imply(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.one)
    }

    /// `f := f ∧ g`
    pub fn and_assign(&self, f: &mut Ref, g: Ref) {
        *f = self.apply_and(*f, g);
    }

    /// `f := f ∨ g`
    pub fn or_assign(&self, f: &mut Ref, g: Ref) {
        *f = self.apply_or(*f, g);
    }

    // f|v<-b
    pub fn substitute(&self, f: Ref, v: u32, b: bool) -> Ref {
        let mut cache = HashMap::new();
        self.substitute_(f, v, b, &mut cache)
    }

    fn substitute_(&self, f: Ref, v: u32, b: bool, cache: &mut HashMap<Ref, Ref>) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");

        if self.is_terminal(f) {
            return f;
        }

        let i = self.variable(f.index());

        if v < i {
            // 'f' does not depend on 'v'
            return f;
        }

        if v == i {
            return if b { self.high_node(f) } else { self.low_node(f) };
        }

        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let low = self.substitute_(self.low_node(f), v, b, cache);
        let high = self.substitute_(self.high_node(f), v, b, cache);
        let res = self.mk_node(i, low, high);
        cache.insert(f, res);
        res
    }

    pub fn restrict_multi(&self, f: Ref, values: &HashMap<u32, bool>) -> Ref {
        let mut cache = HashMap::new();
        self.restrict_multi_(f, values, &mut cache)
    }

    fn restrict_multi_(&self, f: Ref, values: &HashMap<u32, bool>, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) || values.is_empty() {
            return f;
        }

        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let i = self.variable(f.index());
        let res = match values.get(&i) {
            Some(true) => self.restrict_multi_(self.high_node(f), values, cache),
            Some(false) => self.restrict_multi_(self.low_node(f), values, cache),
            None => {
                let low = self.restrict_multi_(self.low_node(f), values, cache);
                let high = self.restrict_multi_(self.high_node(f), values, cache);
                self.mk_node(i, low, high)
            }
        };
        cache.insert(f, res);
        res
    }

    /// Restrict `f` by the assignment encoded in `cube` (a conjunction of literals).
    pub fn restrict(&self, f: Ref, cube: Ref) -> Ref {
        debug!("restrict(f = {}, cube = {})", f, cube);
        assert!(!self.is_zero(cube), "Assignment cube should be satisfiable");

        let mut values = HashMap::new();
        let mut current = cube;
        while !self.is_one(current) {
            let v = self.variable(current.index());
            let low = self.low_node(current);
            let high = self.high_node(current);
            if self.is_zero(low) {
                values.insert(v, true);
                current = high;
            } else if self.is_zero(high) {
                values.insert(v, false);
                current = low;
            } else {
                panic!("Assignment {} is not a cube", cube);
            }
        }
        self.restrict_multi(f, &values)
    }

    /// `f := f|cube`
    pub fn restrict_assign(&self, f: &mut Ref, cube: Ref) {
        *f = self.restrict(*f, cube);
    }

    /// Existential quantification `∃v. f`.
    pub fn exists(&self, f: Ref, v: u32) -> Ref {
        let f0 = self.substitute(f, v, false);
        let f1 = self.substitute(f, v, true);
        self.apply_or(f0, f1)
    }

    /// Universal quantification `∀v. f`.
    pub fn for_all(&self, f: Ref, v: u32) -> Ref {
        let f0 = self.substitute(f, v, false);
        let f1 = self.substitute(f, v, true);
        self.apply_and(f0, f1)
    }

    /// Indices of all nodes reachable from `nodes`, including the terminal.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<u32> {
        let mut visited = HashSet::new();
        visited.insert(self.one.index());
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            let i = node.index();
            if visited.insert(i) {
                queue.push_back(self.low(i));
                queue.push_back(self.high(i));
            }
        }

        visited
    }

    /// Number of nodes in `f`, terminal included.
    pub fn size(&self, f: Ref) -> u64 {
        if let Some(size) = self.size_cache.borrow_mut().get(&f) {
            return size;
        }
        let size = self.descendants([f]).len() as u64;
        self.size_cache.borrow_mut().insert(f, size);
        size
    }

    /// Variables that `f` depends on, in increasing order.
    pub fn support(&self, f: Ref) -> Vec<u32> {
        let vars: BTreeSet<u32> = self
            .descendants([f])
            .into_iter()
            .filter(|&i| i != self.one.index())
            .map(|i| self.variable(i))
            .collect();
        vars.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);

        assert_eq!(bdd.variable(x.index()), 1);
        assert_eq!(bdd.high_node(x), bdd.one);
        assert_eq!(bdd.low_node(x), bdd.zero);
        assert_eq!(bdd.num_vars(), 1);
    }

    #[test]
    fn test_not_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let not_x = -x;

        assert_eq!(bdd.variable(not_x.index()), 1);
        assert_eq!(bdd.high_node(not_x), bdd.zero);
        assert_eq!(bdd.low_node(not_x), bdd.one);
    }

    #[test]
    fn test_terminal() {
        let bdd = Bdd::default();

        assert!(bdd.is_terminal(bdd.zero));
        assert!(bdd.is_zero(bdd.zero));
        assert!(!bdd.is_one(bdd.zero));

        assert!(bdd.is_terminal(bdd.one));
        assert!(!bdd.is_zero(bdd.one));
        assert!(bdd.is_one(bdd.one));

        assert_eq!(bdd.variable(bdd.one.index()), 0);
    }

    #[test]
    fn test_cube() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_and(bdd.apply_and(x1, x2), x3);
        assert_eq!(f, bdd.cube([1, 2, 3]));

        let f = bdd.apply_and(bdd.apply_and(x1, -x2), -x3);
        assert_eq!(f, bdd.cube([1, -2, -3]));
    }

    #[test]
    fn test_de_morgan() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);

        assert_eq!(-bdd.apply_and(x, y), bdd.apply_or(-x, -y));
        assert_eq!(-bdd.apply_or(x, y), bdd.apply_and(-x, -y));
    }

    #[test]
    fn test_xor() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let f = bdd.apply_and(x, y);

        assert_eq!(bdd.apply_xor(f, f), bdd.zero);
        assert_eq!(bdd.apply_xor(f, -f), bdd.one);
    }

    #[test]
    fn test_apply_ite() {
        let bdd = Bdd::default();

        // Terminal cases
        let g = bdd.mk_var(2);
        let h = bdd.mk_var(3);
        assert_eq!(bdd.apply_ite(bdd.one, g, h), g);
        assert_eq!(bdd.apply_ite(bdd.zero, g, h), h);

        // Functions
        let f = bdd.mk_node(4, bdd.one, h);
        assert_eq!(bdd.apply_ite(f, f, h), bdd.apply_or(f, h));
        assert_eq!(bdd.apply_ite(f, g, f), bdd.apply_and(f, g));
        assert_eq!(bdd.apply_ite(f, -g, bdd.one), -bdd.apply_and(f, g));
        assert_eq!(bdd.apply_ite(f, bdd.zero, -h), -bdd.apply_or(f, h));

        // Constants
        let f = bdd.mk_var(5);
        assert_eq!(bdd.apply_ite(f, g, g), g);
        assert_eq!(bdd.apply_ite(f, bdd.one, bdd.zero), f);
        assert_eq!(bdd.apply_ite(f, bdd.zero, bdd.one), -f);
    }

    #[test]
    fn test_assign_variants() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);

        let mut f = x;
        bdd.and_assign(&mut f, y);
        assert_eq!(f, bdd.apply_and(x, y));

        let mut g = x;
        bdd.or_assign(&mut g, y);
        assert_eq!(g, bdd.apply_or(x, y));

        bdd.restrict_assign(&mut g, -bdd.mk_var(1));
        assert_eq!(g, y);
    }

    #[test]
    fn test_substitute() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_or(bdd.apply_eq(x1, x2), x3);
        let f_x2_zero = bdd.substitute(f, 2, false);
        assert_eq!(f_x2_zero, bdd.apply_or(-x1, x3));
    }

    #[test]
    fn test_restrict_multi() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);
        let x4 = bdd.mk_var(4);

        let values = HashMap::from([(2, true), (4, false)]);
        let f = bdd.apply_and(bdd.apply_and(-x1, x2), bdd.apply_and(x3, -x4));
        let g = bdd.restrict_multi(f, &values);
        assert_eq!(g, bdd.apply_and(-x1, x3));
    }

    #[test]
    fn test_restrict_by_cube() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        // 2-out-of-3
        let f = bdd.apply_or(bdd.apply_or(bdd.apply_and(x1, x2), bdd.apply_and(x1, x3)), bdd.apply_and(x2, x3));

        assert_eq!(bdd.restrict(f, bdd.cube([-1])), bdd.apply_and(x2, x3));
        assert_eq!(bdd.restrict(f, bdd.cube([1])), bdd.apply_or(x2, x3));
        assert!(bdd.is_zero(bdd.restrict(f, bdd.cube([-1, -2]))));
        assert!(bdd.is_one(bdd.restrict(f, bdd.cube([1, 3]))));
    }

    #[test]
    fn test_quantification() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let f = bdd.apply_and(x, y);

        assert_eq!(bdd.exists(f, 1), y);
        assert_eq!(bdd.for_all(f, 1), bdd.zero);
        assert_eq!(bdd.for_all(bdd.apply_or(x, y), 1), y);
        assert_eq!(bdd.exists(bdd.apply_xor(x, y), 2), bdd.one);
    }

    #[test]
    fn test_size_and_support() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x3 = bdd.mk_var(3);
        let f = bdd.apply_or(x1, x3);

        // two decision nodes plus the terminal
        assert_eq!(bdd.size(f), 3);
        assert_eq!(bdd.support(f), vec![1, 3]);
        assert!(bdd.support(bdd.one).is_empty());
    }

    #[test]
    fn test_storage_grows() {
        let bdd = Bdd::new(2);
        let vars: Vec<Ref> = (1..=64).map(|v| bdd.mk_var(v)).collect();
        let any = vars.iter().fold(bdd.zero, |acc, &x| bdd.apply_or(acc, x));
        let f = bdd.apply_xor(any, vars[10]);
        assert!(bdd.num_nodes() > 4);
        assert_eq!(bdd.support(f).len(), 64);
    }

    #[test]
    #[should_panic(expected = "exceeds the maximum")]
    fn test_variable_cap() {
        let bdd = Bdd::default().with_max_variables(4);
        bdd.mk_var(5);
    }
}
