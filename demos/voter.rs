use std::collections::HashMap;
use std::sync::Arc;

use clap::Parser;

use bdd_reliability::distribution::{Exponential, Simulatable};
use bdd_reliability::montecarlo::MonteCarloConfig;
use bdd_reliability::parser::parse;
use bdd_reliability::session::Session;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Structure function in prefix notation.
    #[arg(
        value_name = "TERM",
        default_value = r#"(OR (AND "c1" "c2") (AND "c1" "c3") (AND "c2" "c3"))"#
    )]
    term: String,

    /// Failure rate of every component.
    #[clap(long, value_name = "FLOAT", default_value = "0.001")]
    rate: f64,

    /// Time at which to report the reliability.
    #[clap(long, value_name = "FLOAT", default_value = "100")]
    time: f64,

    /// Target reliability for the mission time.
    #[clap(long, value_name = "FLOAT", default_value = "0.9")]
    target: f64,

    /// Seed for the Monte-Carlo cross-check.
    #[clap(long, value_name = "INT")]
    seed: Option<u64>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let term = parse(&args.term)?;
    println!("term = {}", term);

    let mut session = Session::new();
    let f = session.compile(&term)?;
    println!("bdd = {:?}", session.bdd());
    println!("diagram has {} nodes", session.bdd().size(f));
    for (v, id) in session.registry().iter() {
        println!("x{} = {}", v, id);
    }
    {
        let cache = session.bdd().cache();
        println!("cache: {} entries, {} hits, {} misses", cache.len(), cache.hits(), cache.misses());
    }

    let component: Arc<dyn Simulatable> = Arc::new(Exponential::new(args.rate)?);
    let distributions: HashMap<String, Arc<dyn Simulatable>> = term
        .literals()
        .into_iter()
        .map(|id| (id.clone(), component.clone()))
        .collect();
    println!("components: {}", distributions.len());

    let r = session.reliability_function(f, &distributions)?;
    println!("working states: {}", r.working_states());
    println!("R({}) = {}", args.time, r.reliability_at(args.time));
    println!("F({}) = {}", args.time, r.unreliability_at(args.time));
    println!("f({}) = {}", args.time, r.density_at(args.time));
    println!("h({}) = {}", args.time, r.failure_rate_at(args.time));
    println!("MTTF = {}", r.mttf());
    println!("mission time for R = {}: {}", args.target, r.mission_time(args.target));

    let mut config = MonteCarloConfig::default();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let simulated = r.monte_carlo(config).evaluate();
    println!(
        "Monte-Carlo MTTF = {} ± {} ({} runs)",
        simulated.estimate(),
        simulated.std_error(),
        simulated.runs
    );

    let time_total = time_total.elapsed();
    println!("\nAll done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
