//! # bdd-reliability: Time-dependent reliability analysis with BDDs
//!
//! **`bdd-reliability`** computes reliability measures of a technical system whose working state
//! is a Boolean **structure function** of its components' states.
//! The structure function is compiled into a **Binary Decision Diagram**, and the probability of
//! the system working at time `x` is obtained by Shannon decomposition over that diagram.
//!
//! ## Key Features
//!
//! - **Term Model**: Structure functions as [`Term`][crate::term::Term] trees (AND, OR, NOT, weighted thresholds, constants), with a round-trip stable prefix notation ([`parser`]).
//! - **Manager-Centric Diagrams**: All diagrams of an analysis live in one [`Bdd`][crate::bdd::Bdd] manager, owned by a [`Session`][crate::session::Session] together with the registry of component variables.
//! - **Exact Evaluation**: The [`TopEventEvaluator`][crate::eval::TopEventEvaluator] sorts a diagram once and evaluates it in a single bottom-up pass per time point.
//! - **Derived Measures**: Density, failure rate, MTTF and higher moments (Romberg integration, [`integral`]), mission time (bisection, [`inverse`]).
//! - **Simulation Cross-Check**: A [`MonteCarloEvaluator`][crate::montecarlo::MonteCarloEvaluator] samples component lifetimes and replays them against the diagram.
//!
//! ## Basic Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use bdd_reliability::distribution::Exponential;
//! use bdd_reliability::parser::parse;
//! use bdd_reliability::session::Session;
//!
//! // 1. Describe the system: two out of three components must work
//! let term = parse(r#"(OR (AND "c1" "c2") (AND "c1" "c3") (AND "c2" "c3"))"#).unwrap();
//!
//! // 2. Compile it into a diagram
//! let mut session = Session::new();
//! let f = session.compile(&term).unwrap();
//!
//! // 3. Attach component lifetimes
//! let distributions: HashMap<String, Arc<Exponential>> = ["c1", "c2", "c3"]
//!     .iter()
//!     .map(|c| (c.to_string(), Arc::new(Exponential::new(0.1).unwrap())))
//!     .collect();
//! let r = session.reliability_function(f, &distributions).unwrap();
//!
//! // 4. Query it
//! let p = (-0.1f64 * 5.0).exp();
//! assert!((r.reliability_at(5.0) - (3.0 * p * p - 2.0 * p * p * p)).abs() < 1e-12);
//!
//! let mttf = r.mttf();
//! assert!((mttf.value - 5.0 / 6.0 * 10.0).abs() < 1e-6);
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: The diagram manager, with [`sat`] (model counting) and [`threshold`] (weighted threshold constructor).
//! - **[`session`]**: Compilation of terms into diagrams.
//! - **[`function`]**: The reliability function and its numeric surface.
//! - **[`distribution`]**: Component lifetime distributions.

pub mod bdd;
pub mod cache;
pub mod distribution;
pub mod error;
pub mod estimate;
pub mod eval;
pub mod function;
pub mod integral;
pub mod inverse;
pub mod montecarlo;
pub mod parser;
pub mod reference;
pub mod registry;
pub mod sat;
pub mod session;
pub mod table;
pub mod term;
pub mod threshold;
pub mod types;
pub mod utils;
