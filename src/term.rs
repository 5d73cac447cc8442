//! Structure functions as Boolean terms.
//!
//! A [`Term`] is an immutable tree over component identifiers of type `T`.
//! Its [`Display`] implementation prints the canonical prefix notation
//! understood by [`crate::parser`]:
//!
//! ```text
//! (AND "Sensor1" (OR "Pump1" "Pump2"))
//! (>= "2" "1" "c1" "1" "c2" "1" "c3")
//! ```

use std::fmt::{self, Display, Formatter};

use crate::error::{Error, Result};
use crate::types::Comparator;

/// Deepest nesting of operations accepted by the parser and the compiler.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term<T> {
    Literal(T),
    And(Vec<Term<T>>),
    Or(Vec<Term<T>>),
    Not(Box<Term<T>>),
    Linear(Linear<T>),
    True,
    False,
}

/// Threshold constraint `Σ cᵢ·termᵢ ⋈ rhs`, with each sub-term counting as 0 or 1.
///
/// Coefficients and terms are positionally paired; the constructor enforces equal lengths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Linear<T> {
    coefficients: Vec<i64>,
    terms: Vec<Term<T>>,
    comparator: Comparator,
    rhs: i64,
}

impl<T> Linear<T> {
    pub fn new(coefficients: Vec<i64>, terms: Vec<Term<T>>, comparator: Comparator, rhs: i64) -> Result<Self> {
        if coefficients.len() != terms.len() {
            return Err(Error::InvalidArgument(format!(
                "linear term has {} coefficients but {} terms",
                coefficients.len(),
                terms.len()
            )));
        }
        Ok(Self {
            coefficients,
            terms,
            comparator,
            rhs,
        })
    }

    pub fn coefficients(&self) -> &[i64] {
        &self.coefficients
    }
    pub fn terms(&self) -> &[Term<T>] {
        &self.terms
    }
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }
    pub fn rhs(&self) -> i64 {
        self.rhs
    }
}

impl<T> Term<T> {
    pub fn literal(id: T) -> Self {
        Term::Literal(id)
    }

    pub fn and(children: impl IntoIterator<Item = Term<T>>) -> Self {
        Term::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Term<T>>) -> Self {
        Term::Or(children.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Term<T>) -> Self {
        Term::Not(Box::new(child))
    }

    pub fn linear(coefficients: Vec<i64>, terms: Vec<Term<T>>, comparator: Comparator, rhs: i64) -> Result<Self> {
        Linear::new(coefficients, terms, comparator, rhs).map(Term::Linear)
    }

    /// `k`-out-of-`n` voting over the given terms.
    pub fn at_least(k: i64, terms: Vec<Term<T>>) -> Self {
        let coefficients = vec![1; terms.len()];
        Term::Linear(Linear {
            coefficients,
            terms,
            comparator: Comparator::Ge,
            rhs: k,
        })
    }

    /// Number of nested operations on the longest path from the root.
    ///
    /// Identifiers and constants have depth 0.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0)];
        while let Some((term, d)) = stack.pop() {
            let children: &[Term<T>] = match term {
                Term::And(children) | Term::Or(children) => children,
                Term::Not(child) => std::slice::from_ref(child.as_ref()),
                Term::Linear(linear) => &linear.terms,
                Term::Literal(_) | Term::True | Term::False => {
                    max = max.max(d);
                    continue;
                }
            };
            max = max.max(d + 1);
            stack.extend(children.iter().map(|c| (c, d + 1)));
        }
        max
    }

    /// Distinct identifiers in order of first appearance.
    pub fn literals(&self) -> Vec<&T>
    where
        T: PartialEq,
    {
        let mut result: Vec<&T> = Vec::new();
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term {
                Term::Literal(id) => {
                    if !result.contains(&id) {
                        result.push(id);
                    }
                }
                Term::And(children) | Term::Or(children) => stack.extend(children.iter().rev()),
                Term::Not(child) => stack.push(child),
                Term::Linear(linear) => stack.extend(linear.terms.iter().rev()),
                Term::True | Term::False => {}
            }
        }
        result
    }
}

fn write_operands<T: Display>(f: &mut Formatter<'_>, operator: &str, children: &[Term<T>]) -> fmt::Result {
    write!(f, "({}", operator)?;
    for child in children {
        write!(f, " {}", child)?;
    }
    write!(f, ")")
}

impl<T: Display> Display for Term<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Term::Literal(id) => write!(f, "\"{}\"", id),
            Term::And(children) => write_operands(f, "AND", children),
            Term::Or(children) => write_operands(f, "OR", children),
            Term::Not(child) => write!(f, "(NOT {})", child),
            Term::Linear(linear) => {
                write!(f, "({} \"{}\"", linear.comparator, linear.rhs)?;
                for (c, t) in linear.coefficients.iter().zip(&linear.terms) {
                    write!(f, " \"{}\" {}", c, t)?;
                }
                write!(f, ")")
            }
            Term::True => write!(f, "(TRUE)"),
            Term::False => write!(f, "(FALSE)"),
        }
    }
}
