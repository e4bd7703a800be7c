#![deny(warnings)]
use log::{info, LevelFilter};
use std::convert::TryFrom;
use std::time::{Duration, Instant};
use structopt::StructOpt;

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use redpath::graph::{GraphOrder, Node};
use redpath::random_models::gnp::generate_red_gnp;
use redpath::result::Status;
use redpath::solver::{solve_with_stats, SolverConfig, Strategy};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "bench-red-path",
    about = "Solves random instances with red nodes and reports status, value and timing"
)]
struct Opt {
    /// Smallest number of nodes
    #[structopt(long, default_value = "10")]
    min_nodes: Node,

    /// Largest number of nodes
    #[structopt(long, default_value = "100")]
    max_nodes: Node,

    /// Step between consecutive orders
    #[structopt(long, default_value = "10")]
    step: Node,

    /// Expected out-degree of a node
    #[structopt(short, long, default_value = "3")]
    avg_deg: f64,

    /// Probability of a node being red
    #[structopt(short, long, default_value = "0.3")]
    red_probability: f64,

    /// Probability of an edge being directed
    #[structopt(short, long, default_value = "0.5")]
    directed_probability: f64,

    /// Instances per order
    #[structopt(short, long, default_value = "5")]
    instances: usize,

    /// Strategy for general graphs: 'auto', 'exact', 'heuristic' or 'improve'
    #[structopt(long, default_value = "auto")]
    strategy: String,

    /// Deadline per instance in milliseconds
    #[structopt(short = "t", long, default_value = "1000")]
    timeout_ms: u64,

    /// Run beam search and greedy walks in parallel
    #[structopt(short, long)]
    parallel: bool,

    /// Treat every edge as directed in its declared orientation
    #[structopt(long)]
    force_directed: bool,

    /// Seed value
    #[structopt(short, long, default_value = "123")]
    seed: u64,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> Result<(), String> {
    let opt = Opt::from_args();
    redpath::log::build_logger_for_verbosity(LevelFilter::Warn, opt.verbose);

    for p in [opt.red_probability, opt.directed_probability] {
        if !(0.0..=1.0).contains(&p) {
            return Err(format!("Probability {} has to be in interval [0, 1]", p));
        }
    }

    let config = SolverConfig::default()
        .with_strategy(Strategy::try_from(opt.strategy.as_str())?)
        .with_deadline(Duration::from_millis(opt.timeout_ms))
        .with_parallel_heuristics(opt.parallel)
        .with_force_directed(opt.force_directed)
        .with_seed(opt.seed);

    let mut gen = Pcg64Mcg::seed_from_u64(opt.seed);

    println!("n,m,optimal,best_effort,no_path,unsolved,avg_value,avg_bnb_iterations,avg_time_ms");
    for n in (opt.min_nodes.max(2)..=opt.max_nodes).step_by(opt.step.max(1) as usize) {
        let start = Instant::now();
        let mut counts = [0usize; 4];
        let mut edges = 0;
        let mut values = 0;
        let mut iterations = 0;

        for _ in 0..opt.instances {
            let p = (opt.avg_deg / n as f64).min(1.0);
            let graph = generate_red_gnp(
                &mut gen,
                n,
                p,
                opt.red_probability,
                opt.directed_probability,
            );
            edges += graph.number_of_edges();

            let (result, stats) = solve_with_stats(&graph, &config);
            info!("n={} tier={} result={}", graph.len(), stats.tier, result);

            counts[match result.status() {
                Status::Optimal => 0,
                Status::BestEffort => 1,
                Status::NoPath => 2,
                Status::Unsolved => 3,
            }] += 1;
            values += result.reds().unwrap_or(0) as usize;
            iterations += stats.bnb_iterations;
        }

        let iters = opt.instances.max(1) as f64;
        println!(
            "{},{},{},{},{},{},{},{},{}",
            n,
            edges as f64 / iters,
            counts[0],
            counts[1],
            counts[2],
            counts[3],
            values as f64 / iters,
            iterations as f64 / iters,
            start.elapsed().as_millis() as f64 / iters
        );
    }

    Ok(())
}
