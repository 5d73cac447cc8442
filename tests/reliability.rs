//! End-to-end tests: parsing, compilation and the reliability measures.

use std::collections::HashMap;
use std::sync::Arc;

use bdd_reliability::bdd::Bdd;
use bdd_reliability::distribution::{Distribution, Exponential, Simulatable, Weibull};
use bdd_reliability::error::Error;
use bdd_reliability::eval::TopEventEvaluator;
use bdd_reliability::integral::{moment, romberg, MomentConfig, RombergConfig};
use bdd_reliability::inverse::InverseEvaluator;
use bdd_reliability::montecarlo::MonteCarloConfig;
use bdd_reliability::parser::parse;
use bdd_reliability::registry::{VariableRegistry, INITIAL_CAPACITY};
use bdd_reliability::session::Session;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn exponentials(rates: &[(&str, f64)]) -> HashMap<String, Arc<Exponential>> {
    rates
        .iter()
        .map(|&(id, rate)| (id.to_string(), Arc::new(Exponential::new(rate).unwrap())))
        .collect()
}

/// Top-event value of `text` with fixed per-component probabilities.
fn top_event(text: &str, values: &[(&str, f64)]) -> f64 {
    let mut session = Session::new();
    let f = session.compile(&parse(text).unwrap()).unwrap();
    let by_var: HashMap<u32, f64> = values
        .iter()
        .filter_map(|&(id, r)| session.registry().index(&id.to_string()).map(|v| (v, r)))
        .collect();
    TopEventEvaluator::new(session.bdd(), f).evaluate_values(&by_var)
}

// ─── Terms ─────────────────────────────────────────────────────────────────────

#[test]
fn print_parse_roundtrip() {
    let texts = [
        r#""Pump1""#,
        r#"(AND "Sensor1" (OR "Pump1" "Pump2"))"#,
        r#"(OR (AND "c1" "c2") (AND "c1" "c3") (AND "c2" "c3"))"#,
        r#"(NOT (AND (TRUE) "x"))"#,
        r#"(>= "2" "1" "c1" "1" "c2" "1" "c3")"#,
        r#"(> "0" "2" (OR "a" "b") "-3" (NOT "c"))"#,
        "(FALSE)",
    ];
    for text in texts {
        assert_eq!(parse(text).unwrap().to_string(), text);
    }
}

#[test]
fn whitespace_is_insignificant() {
    let compact = parse(r#"(AND "Sensor1" (OR "Pump1" "Pump2"))"#).unwrap();
    let spread = parse("(AND\n  \"Sensor1\"\n  (OR \"Pump1\"\t\"Pump2\")  )").unwrap();
    assert_eq!(compact, spread);
}

#[test]
fn syntax_errors() {
    for text in [
        r#"(AND "a" "b""#,
        r#"(XOR "a" "b")"#,
        r#"(NOT "a" "b")"#,
        r#"(OR "a" "b)"#,
    ] {
        assert!(matches!(parse(text), Err(Error::Syntax { .. })), "{}", text);
    }
}

// ─── Top-event evaluation ──────────────────────────────────────────────────────

#[test]
fn terminal_diagrams() {
    let bdd = Bdd::default();
    let nothing: HashMap<u32, Arc<Exponential>> = HashMap::new();
    for x in [0.0, 1.0, 1e6] {
        assert_eq!(TopEventEvaluator::new(&bdd, bdd.one).evaluate(&nothing, x), 1.0);
        assert_eq!(TopEventEvaluator::new(&bdd, bdd.zero).evaluate(&nothing, x), 0.0);
    }

    let mut session: Session<String> = Session::new();
    let f = session.compile(&parse(r#"(OR "a" (NOT "a"))"#).unwrap()).unwrap();
    assert!(session.bdd().is_one(f));
}

#[test]
fn and_or_of_independent_components() {
    for &(r1, r2) in &[(0.9, 0.8), (0.5, 0.5), (0.01, 0.99), (0.3, 0.7)] {
        let and = top_event(r#"(AND "a" "b")"#, &[("a", r1), ("b", r2)]);
        assert!((and - r1 * r2).abs() < 1e-12);
        let or = top_event(r#"(OR "a" "b")"#, &[("a", r1), ("b", r2)]);
        assert!((or - (1.0 - (1.0 - r1) * (1.0 - r2))).abs() < 1e-12);
    }
}

#[test]
fn or_is_symmetric() {
    for &(r1, r2) in &[(0.9, 0.8), (0.2, 0.6), (0.45, 0.05)] {
        let ab = top_event(r#"(OR "a" "b")"#, &[("a", r1), ("b", r2)]);
        let ba = top_event(r#"(OR "b" "a")"#, &[("a", r1), ("b", r2)]);
        assert_eq!(ab, ba);
    }
}

#[test]
fn two_out_of_three_voter() {
    let voter = r#"(OR (AND "c1" "c2") (AND "c1" "c3") (AND "c2" "c3"))"#;
    let threshold = r#"(>= "2" "1" "c1" "1" "c2" "1" "c3")"#;
    for r in [0.05, 0.3, 0.5, 0.77, 0.99] {
        let expected = 3.0 * r * r - 2.0 * r * r * r;
        let values = [("c1", r), ("c2", r), ("c3", r)];
        assert!((top_event(voter, &values) - expected).abs() < 1e-12);
        assert!((top_event(threshold, &values) - expected).abs() < 1e-12);
    }
}

// ─── Derived measures ──────────────────────────────────────────────────────────

#[test]
fn romberg_accuracy() {
    let estimate = romberg(|x| (-0.01 * x).exp(), 0.0, 2.0, &RombergConfig::default());
    assert!(estimate.converged);
    assert!((estimate.value - 1.98013).abs() < 1e-5);
}

#[test]
fn inverse_consistency() {
    let evaluator = InverseEvaluator::default();
    for rate in [0.01, 0.5, 3.0] {
        let d = Exponential::new(rate).unwrap();
        for t in [0.1, 1.0, 2.5, 20.0] {
            let x = evaluator.evaluate(&d, d.reliability(t)).value;
            assert!((x - t).abs() < 1e-6 * t.max(1.0), "rate {}, t {}: {}", rate, t, x);
        }
    }
}

#[test]
fn exponential_moment() {
    for rate in [0.1, 1.0, 4.0] {
        let d = Exponential::new(rate).unwrap();
        let m = moment(&d, 1, &MomentConfig::default()).unwrap();
        assert!((m.value - 1.0 / rate).abs() < 1e-6 / rate);
    }
    let d = Exponential::new(1.0).unwrap();
    assert!(matches!(
        moment(&d, 0, &MomentConfig::default()),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn system_measures() {
    let mut session = Session::new();
    let f = session
        .compile(&parse(r#"(AND "Sensor1" (OR "Pump1" "Pump2"))"#).unwrap())
        .unwrap();
    let distributions = exponentials(&[("Sensor1", 0.01), ("Pump1", 0.1), ("Pump2", 0.1)]);
    let r = session.reliability_function(f, &distributions).unwrap();

    let x: f64 = 7.0;
    let sensor = (-0.01 * x).exp();
    let pump = (-0.1 * x).exp();
    let expected = sensor * (1.0 - (1.0 - pump) * (1.0 - pump));
    assert!((r.reliability_at(x) - expected).abs() < 1e-12);
    assert!((r.unreliability_at(x) - (1.0 - expected)).abs() < 1e-12);

    // R(x) = 2·exp(-0.11x) - exp(-0.21x)
    let mttf = r.mttf();
    assert!(mttf.converged);
    assert!((mttf.value - (2.0 / 0.11 - 1.0 / 0.21)).abs() < 1e-5);

    let t = r.mission_time(0.5).value;
    assert!((r.reliability_at(t) - 0.5).abs() < 1e-9);

    let rate = r.failure_rate_at(x);
    assert!((rate - r.density_at(x) / r.reliability_at(x)).abs() < 1e-12);
    assert!(rate > 0.0);
    assert!(r.reliability_at(-1.0).is_nan());
}

// ─── Monte-Carlo ───────────────────────────────────────────────────────────────

#[test]
fn monte_carlo_single_component() {
    let rate = 0.5;
    let mut session = Session::new();
    let f = session.compile(&parse(r#""pump""#).unwrap()).unwrap();
    let distributions = exponentials(&[("pump", rate)]);
    let evaluator = session
        .monte_carlo(f, &distributions, MonteCarloConfig::default())
        .unwrap();

    for seed in 0..5 {
        let result = evaluator.evaluate_with_rng(&mut ChaCha8Rng::seed_from_u64(seed));
        assert!(result.converged);
        assert!(
            (result.mean - 1.0 / rate).abs() < 0.1 / rate,
            "seed {}: {}",
            seed,
            result.mean
        );
    }
}

#[test]
fn monte_carlo_agrees_with_exact() {
    let mut session = Session::new();
    let f = session
        .compile(&parse(r#"(OR (AND "c1" "c2") (AND "c1" "c3") (AND "c2" "c3"))"#).unwrap())
        .unwrap();
    let d: Arc<dyn Simulatable> = Arc::new(Weibull::new(2.0, 10.0).unwrap());
    let distributions: HashMap<String, Arc<dyn Simulatable>> =
        ["c1", "c2", "c3"].iter().map(|c| (c.to_string(), d.clone())).collect();

    let exact = session.reliability_function(f, &distributions).unwrap().mttf().value;
    let simulated = session
        .monte_carlo(f, &distributions, MonteCarloConfig::default())
        .unwrap()
        .evaluate_with_rng(&mut ChaCha8Rng::seed_from_u64(2024))
        .mean;
    assert!((simulated - exact).abs() < 0.1 * exact, "{} vs {}", simulated, exact);
}

// ─── Registry ──────────────────────────────────────────────────────────────────

#[test]
fn registry_grows() {
    let mut registry = VariableRegistry::new(1 << 10);
    let n = 5 * INITIAL_CAPACITY;
    for i in 0..n {
        assert_eq!(registry.register(i).unwrap(), i + 1);
    }
    assert!(registry.capacity() >= n);

    let mut small = VariableRegistry::new(INITIAL_CAPACITY + 1);
    for i in 0..=INITIAL_CAPACITY {
        small.register(i).unwrap();
    }
    assert!(matches!(small.register(1000), Err(Error::CapacityExceeded { .. })));
}

#[test]
fn compiling_many_components() {
    let mut session = Session::new();
    let ids: Vec<String> = (0..100).map(|i| format!("c{}", i)).collect();
    let text = format!(
        "(OR {})",
        ids.iter().map(|id| format!("\"{}\"", id)).collect::<Vec<_>>().join(" ")
    );
    let f = session.compile(&parse(&text).unwrap()).unwrap();
    assert_eq!(session.registry().len(), 100);
    assert_eq!(session.bdd().support(f).len(), 100);
}
