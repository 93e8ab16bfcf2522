//! Clonevo command-line interface.
//!
//! Runs a batch of independent clonal-evolution replicates and writes one
//! tabular file plus one final snapshot per replicate into the output
//! directory.

use anyhow::{bail, Context, Result};
use clap::Parser;
use clonevo::simulation::{run_all, RunConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use std::path::PathBuf;

/// Simulates clonal evolution of a growing cell population under mutation
/// and selection.
#[derive(Parser, Debug)]
#[command(name = "clonevo")]
#[command(author, version, about = "Simulates clonal evolution in an expanding cell population", long_about = None)]
struct Cli {
    /// Final population size
    #[arg(short = 'N', long, default_value_t = 1_000_000_000)]
    final_size: u64,

    /// Initial population size
    #[arg(short = 'n', long, default_value_t = 1)]
    initial_size: u64,

    /// Driver mutation rate u (per locus per generation)
    #[arg(short = 'u', long, default_value_t = 1e-7)]
    driver_rate: f64,

    /// Passenger mutation rate v (defaults to the driver rate)
    #[arg(short = 'v', long)]
    passenger_rate: Option<f64>,

    /// Selective advantage s per driver mutation
    #[arg(short = 's', long, default_value_t = 1e-2)]
    selection: f64,

    /// Selective advantage of other drivers (defaults to 1.5 s)
    #[arg(short = 't', long)]
    other_selection: Option<f64>,

    /// Number of generations
    #[arg(short = 'g', long, default_value_t = 1800)]
    generations: u32,

    /// Number of replicate runs
    #[arg(short = 'R', long, default_value_t = 1)]
    replicates: u32,

    /// Number of passenger loci
    #[arg(short = 'p', long, default_value_t = 0)]
    passenger_loci: u32,

    /// Number of other-driver loci
    #[arg(short = 'q', long, default_value_t = 0)]
    other_driver_loci: u32,

    /// Total number of loci
    #[arg(long, default_value_t = 1_000_000)]
    loci: u32,

    /// Maximum mutations per genotype
    #[arg(long, default_value_t = 1000)]
    max_mutations: usize,

    /// Maximum live genotype records
    #[arg(long, default_value_t = 1_000_000)]
    capacity: usize,

    /// Run full deduplication every this many generations
    #[arg(long, default_value_t = 10)]
    dedup_every: u32,

    /// Write tabular output every this many generations
    #[arg(long, default_value_t = 10)]
    record_every: u32,

    /// Random seed (default: from entropy)
    #[arg(short = 'r', long)]
    seed: Option<u64>,

    /// Output directory (must exist)
    #[arg(short = 'f', long)]
    output: PathBuf,

    /// Verbose diagnostics
    #[arg(short = 'd', long)]
    verbose: bool,

    /// Number of threads for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(long)]
    threads: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    fn to_config(&self) -> RunConfig {
        RunConfig {
            initial_size: self.initial_size,
            final_size: self.final_size,
            generations: self.generations,
            driver_rate: self.driver_rate,
            passenger_rate: self.passenger_rate,
            selection: self.selection,
            other_selection: self.other_selection,
            replicates: self.replicates,
            total_loci: self.loci,
            passenger_loci: self.passenger_loci,
            other_driver_loci: self.other_driver_loci,
            max_mutations: self.max_mutations,
            capacity: self.capacity,
            dedup_every: self.dedup_every,
            record_every: self.record_every,
            seed: self.seed,
            verbose: self.verbose,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let config = cli.to_config();
    config.validate().context("Invalid configuration")?;

    if !cli.output.is_dir() {
        bail!(
            "Output directory {} does not exist",
            cli.output.display()
        );
    }

    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());

    let growth = clonevo::evolution::GrowthSchedule::new(
        config.initial_size,
        config.final_size,
        config.generations,
    );
    println!("a = {:.6}", growth.rate());
    println!("doubling time = {:.2} generations", growth.doubling_time());
    println!("seed = {base_seed}");

    let total_steps = u64::from(config.replicates) * u64::from(config.generations);
    let progress = if cli.no_progress {
        None
    } else {
        let pb = ProgressBar::new(total_steps);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .expect("static progress template")
                .progress_chars("#>-"),
        );
        Some(pb)
    };

    let mut last_replicate = 0;
    let outcomes = run_all(&config, base_seed, &cli.output, |replicate, _generation| {
        if replicate != last_replicate {
            last_replicate = replicate;
            if let Some(pb) = &progress {
                pb.println(format!("Sample {replicate}/{}", config.replicates));
            } else {
                println!("Sample {replicate}/{}", config.replicates);
            }
        }
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    })
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    for outcome in &outcomes {
        println!(
            "Replicate {}: {} cells in {} genotypes after {} generations",
            outcome.replicate, outcome.final_size, outcome.genotypes, outcome.generations
        );
    }
    println!("Results written to {}", cli.output.display());

    Ok(())
}
