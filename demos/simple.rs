use std::time::Instant;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};

use bdd_count::bdd::Bdd;
use bdd_count::config::{CounterConfig, Traversal};
use bdd_count::cube::build_models;
use bdd_count::observation::ObservationSet;
use bdd_count::sat::ModelCounter;

#[derive(Parser, Debug)]
#[command(name = "simple")]
#[command(about = "Count the k-of-n models, optionally under observations")]
struct Args {
    /// Number of variables
    #[arg(short, long, default_value_t = 5)]
    n: u32,

    /// Number of variables set in each model
    #[arg(short, long, default_value_t = 2)]
    k: u32,

    /// Observations, as `index=value` (e.g. `-o 0=0 -o 2=1`)
    #[arg(short, long = "observe")]
    observations: Vec<String>,

    /// Use the explicit-stack traversal
    #[arg(short, long)]
    iterative: bool,
}

fn parse_observation(s: &str) -> color_eyre::Result<(u32, bool)> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| eyre!("expected `index=value`, got `{}`", s))?;
    let index = index
        .trim()
        .parse()
        .wrap_err_with(|| format!("bad index in `{}`", s))?;
    let value = match value.trim() {
        "0" | "false" => false,
        "1" | "true" => true,
        other => return Err(eyre!("bad value `{}` in `{}`", other, s)),
    };
    Ok((index, value))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Args::parse();
    if args.n > 20 {
        return Err(eyre!("n = {} is too large to enumerate models", args.n));
    }

    let models: Vec<Vec<bool>> = (0..1u32 << args.n)
        .filter(|bits| bits.count_ones() == args.k)
        .map(|bits| (0..args.n).map(|i| bits >> i & 1 == 1).collect())
        .collect();
    println!("{} models of {} ones over {} variables", models.len(), args.k, args.n);

    let bdd = Bdd::default();
    let f = build_models(&bdd, &models)?;
    println!("bdd size = {}", bdd.size(f));

    let traversal = if args.iterative {
        Traversal::Iterative
    } else {
        Traversal::Recursive
    };
    let config = CounterConfig::default().with_traversal(traversal);
    let mut counter = ModelCounter::with_config(&bdd, args.n, config);

    let time = Instant::now();
    let count = counter.count(f)?;
    println!("count = {} in {:.3}s", count, time.elapsed().as_secs_f64());

    if !args.observations.is_empty() {
        let mut pairs = args
            .observations
            .iter()
            .map(|s| parse_observation(s))
            .collect::<color_eyre::Result<Vec<_>>>()?;
        pairs.sort_unstable();
        let observations = ObservationSet::from_pairs(pairs, args.n)?;

        let time = Instant::now();
        let count = counter.count_observed(f, &observations)?;
        println!(
            "count({:?} = {:?}) = {} in {:.3}s",
            observations.indices(),
            observations.values(),
            count,
            time.elapsed().as_secs_f64()
        );
    }

    println!(
        "table: {} entries, {} hits, {} misses",
        counter.table().len(),
        counter.table().hits(),
        counter.table().misses()
    );

    Ok(())
}
