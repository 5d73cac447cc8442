//! Analysis session: one diagram manager and the registry of its variables.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use log::debug;

use crate::bdd::Bdd;
use crate::distribution::{Distribution, Simulatable};
use crate::error::{Error, Result};
use crate::function::ReliabilityFunction;
use crate::montecarlo::{MonteCarloConfig, MonteCarloEvaluator};
use crate::reference::Ref;
use crate::registry::VariableRegistry;
use crate::term::{Linear, Term, MAX_DEPTH};

/// Owns a [`Bdd`] manager and maps component identifiers of type `T` to its variables.
///
/// All diagrams compiled in a session share the manager, so compiling the
/// same identifier twice yields the same variable.
#[derive(Debug)]
pub struct Session<T> {
    bdd: Bdd,
    registry: VariableRegistry<T>,
}

impl<T> Default for Session<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Session<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_bdd(Bdd::default())
    }

    /// Use a preconfigured manager, e.g. one built with [`Bdd::with_max_variables`].
    pub fn with_bdd(bdd: Bdd) -> Self {
        let registry = VariableRegistry::new(bdd.max_variables());
        Self { bdd, registry }
    }

    pub fn bdd(&self) -> &Bdd {
        &self.bdd
    }

    pub fn registry(&self) -> &VariableRegistry<T> {
        &self.registry
    }

    /// Variable index of `id`, registering it if unseen.
    pub fn register(&mut self, id: T) -> Result<u32> {
        self.registry.register(id)
    }

    /// Lower `term` into a diagram.
    ///
    /// Fails with [`Error::InvalidArgument`] if operations are nested deeper than [`MAX_DEPTH`].
    pub fn compile(&mut self, term: &Term<T>) -> Result<Ref> {
        let depth = term.depth();
        if depth > MAX_DEPTH {
            return Err(Error::InvalidArgument(format!(
                "term is nested {} levels deep, at most {} are supported",
                depth, MAX_DEPTH
            )));
        }
        let f = self.lower(term)?;
        debug!(
            "compile: {} with {} nodes over {} variables",
            f,
            self.bdd.size(f),
            self.registry.len()
        );
        Ok(f)
    }

    fn lower(&mut self, term: &Term<T>) -> Result<Ref> {
        match term {
            Term::Literal(id) => {
                let v = self.registry.register(id.clone())?;
                Ok(self.bdd.mk_var(v))
            }
            Term::And(children) => {
                let mut f = self.bdd.one;
                for child in children {
                    let g = self.lower(child)?;
                    self.bdd.and_assign(&mut f, g);
                }
                Ok(f)
            }
            Term::Or(children) => {
                let mut f = self.bdd.zero;
                for child in children {
                    let g = self.lower(child)?;
                    self.bdd.or_assign(&mut f, g);
                }
                Ok(f)
            }
            Term::Not(child) => {
                let g = self.lower(child)?;
                Ok(self.bdd.apply_not(g))
            }
            Term::Linear(linear) => self.lower_linear(linear),
            Term::True => Ok(self.bdd.one),
            Term::False => Ok(self.bdd.zero),
        }
    }

    fn lower_linear(&mut self, linear: &Linear<T>) -> Result<Ref> {
        let nodes = linear
            .terms()
            .iter()
            .map(|t| self.lower(t))
            .collect::<Result<Vec<_>>>()?;
        self.bdd
            .apply_threshold(linear.coefficients(), &nodes, linear.comparator(), linear.rhs())
    }

    /// Resolve identifier-keyed distributions against the registry.
    fn resolve<D>(&self, root: Ref, distributions: &HashMap<T, Arc<D>>) -> Result<HashMap<u32, Arc<D>>>
    where
        D: ?Sized,
    {
        let mut resolved = HashMap::new();
        for v in self.bdd.support(root) {
            let d = self
                .registry
                .id(v)
                .and_then(|id| distributions.get(id))
                .ok_or_else(|| Error::InvalidArgument(format!("no distribution for variable x{}", v)))?;
            resolved.insert(v, Arc::clone(d));
        }
        Ok(resolved)
    }

    /// Reliability function of `root` with a distribution for each component.
    ///
    /// Fails if a component of `root` has no distribution. Extra entries are ignored.
    pub fn reliability_function<D>(
        &self,
        root: Ref,
        distributions: &HashMap<T, Arc<D>>,
    ) -> Result<ReliabilityFunction<'_, D>>
    where
        D: Distribution + ?Sized,
    {
        ReliabilityFunction::new(&self.bdd, root, self.resolve(root, distributions)?)
    }

    /// Monte-Carlo lifetime simulation of `root`.
    pub fn monte_carlo<D>(
        &self,
        root: Ref,
        distributions: &HashMap<T, Arc<D>>,
        config: MonteCarloConfig,
    ) -> Result<MonteCarloEvaluator<'_, D>>
    where
        D: Simulatable + ?Sized,
    {
        MonteCarloEvaluator::new(&self.bdd, root, self.resolve(root, distributions)?, config)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::bdd::DEFAULT_MAX_VARIABLES;
    use crate::distribution::Exponential;
    use crate::parser::parse;
    use crate::types::Comparator;

    fn lit(s: &str) -> Term<String> {
        Term::literal(s.to_string())
    }

    #[test]
    fn test_compile_basic() {
        let mut session = Session::new();
        let f = session
            .compile(&Term::and([lit("a"), Term::or([lit("b"), Term::not(lit("c"))])]))
            .unwrap();
        let bdd = session.bdd();
        let (a, b, c) = (bdd.mk_var(1), bdd.mk_var(2), bdd.mk_var(3));
        assert_eq!(f, bdd.apply_and(a, bdd.apply_or(b, -c)));
        assert_eq!(session.registry().index(&"c".to_string()), Some(3));
    }

    #[test]
    fn test_compile_constants() {
        let mut session: Session<String> = Session::new();
        assert_eq!(session.compile(&Term::True).unwrap(), session.bdd().one);
        assert_eq!(session.compile(&Term::False).unwrap(), session.bdd().zero);
        assert_eq!(session.compile(&Term::And(vec![])).unwrap(), session.bdd().one);
        assert_eq!(session.compile(&Term::Or(vec![])).unwrap(), session.bdd().zero);
        assert_eq!(session.compile(&Term::not(Term::False)).unwrap(), session.bdd().one);
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_compile_shares_variables() {
        let mut session = Session::new();
        let f = session.compile(&Term::or([lit("a"), lit("b")])).unwrap();
        let g = session.compile(&Term::or([lit("b"), lit("a")])).unwrap();
        assert_eq!(f, g);
        assert_eq!(session.registry().len(), 2);
    }

    #[test]
    fn test_compile_linear() {
        let mut session = Session::new();
        let voter = session
            .compile(&parse(r#"(OR (AND "c1" "c2") (AND "c1" "c3") (AND "c2" "c3"))"#).unwrap())
            .unwrap();
        let linear = session
            .compile(&Term::at_least(2, vec![lit("c1"), lit("c2"), lit("c3")]))
            .unwrap();
        assert_eq!(voter, linear);

        let exactly_one = session
            .compile(&Term::linear(vec![1, 1], vec![lit("c1"), lit("c2")], Comparator::Eq, 1).unwrap())
            .unwrap();
        let bdd = session.bdd();
        assert_eq!(exactly_one, bdd.apply_xor(bdd.mk_var(1), bdd.mk_var(2)));
    }

    #[test]
    fn test_compile_depth_limit() {
        let nested = |depth: usize| (0..depth).fold(lit("a"), |t, _| Term::not(t));

        let mut session = Session::new();
        let f = session.compile(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(f, session.bdd().mk_var(1));

        let err = session.compile(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_extreme_linear_weights() {
        let mut session = Session::new();
        let f = session
            .compile(&parse(r#"(>= "1" "9223372036854775807" "a" "9223372036854775807" "b")"#).unwrap())
            .unwrap();
        let bdd = session.bdd();
        assert_eq!(f, bdd.apply_or(bdd.mk_var(1), bdd.mk_var(2)));
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut session = Session::with_bdd(Bdd::default().with_max_variables(3));
        let term = Term::and((0..4).map(Term::literal));
        let err = session.compile(&term).unwrap_err();
        assert_eq!(err, Error::CapacityExceeded { requested: 4, limit: 3 });

        let session: Session<u8> = Session::new();
        assert_eq!(session.registry().capacity(), 16);
        assert_eq!(session.bdd().max_variables(), DEFAULT_MAX_VARIABLES);
    }

    #[test]
    fn test_reliability_function() {
        let mut session = Session::new();
        let f = session.compile(&Term::and([lit("a"), lit("b")])).unwrap();
        let distributions = HashMap::from([
            ("a".to_string(), Arc::new(Exponential::new(1.0).unwrap())),
            ("b".to_string(), Arc::new(Exponential::new(2.0).unwrap())),
            ("unused".to_string(), Arc::new(Exponential::new(3.0).unwrap())),
        ]);
        let r = session.reliability_function(f, &distributions).unwrap();
        assert!((r.reliability_at(1.0) - (-3.0f64).exp()).abs() < 1e-12);

        let partial = HashMap::from([("a".to_string(), Arc::new(Exponential::new(1.0).unwrap()))]);
        assert!(matches!(
            session.reliability_function(f, &partial),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            session.monte_carlo(f, &partial, MonteCarloConfig::default()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_reregister_keeps_diagram() {
        let mut session = Session::new();
        let f = session.compile(&Term::literal("pump".to_string())).unwrap();
        let v = session.register("pump".to_string()).unwrap();
        assert_eq!(session.bdd().support(f), vec![v]);
    }
}
