//! The run driver: iterates generations for each independent replicate,
//! records output on the configured cadence and flushes current state before
//! a fatal termination.
//!
//! Replicates share no mutable state: each owns a private store, a private
//! random stream and private output files.

use crate::errors::SimulationError;
use crate::simulation::{RunConfig, Simulation};
use crate::storage::{write_config_json, GenerationRecorder};
use crate::store::deduplicate;
use log::{info, warn};
use std::path::Path;

/// Summary of one finished replicate.
#[derive(Debug, Clone)]
pub struct ReplicateOutcome {
    /// 1-based replicate number
    pub replicate: u32,
    /// Generations completed
    pub generations: u32,
    /// Population size at the end of the run
    pub final_size: u64,
    /// Live genotype records at the end of the run
    pub genotypes: usize,
}

/// Derive a replicate's private seed from the base seed.
pub fn replicate_seed(base: u64, replicate: u32) -> u64 {
    base.wrapping_add(u64::from(replicate))
}

/// Run one replicate to completion, recording tabular output on the record
/// cadence and the R-style snapshot at the end.
///
/// On a fatal condition (capacity or population overflow) the current store
/// state is flushed to the tabular file best-effort before the error
/// propagates.
pub fn run_replicate(
    config: &RunConfig,
    replicate: u32,
    base_seed: u64,
    out_dir: &Path,
    mut on_generation: impl FnMut(u32),
) -> Result<ReplicateOutcome, SimulationError> {
    let mut sim = Simulation::new(config, replicate_seed(base_seed, replicate))?;
    let mut recorder = GenerationRecorder::create(out_dir, replicate)?;

    for generation in 1..=config.generations {
        if let Err(e) = sim.step() {
            warn!("replicate {replicate} terminated at generation {generation}: {e}");
            if recorder.write_generation(sim.store(), generation).is_ok() {
                let _ = recorder.flush();
            }
            return Err(e);
        }
        if generation % config.record_every == 0 {
            recorder.write_generation(sim.store(), generation)?;
        }
        on_generation(generation);
    }

    // Final snapshot: merged, most abundant genotype first.
    deduplicate(sim.store_mut());
    sim.store_mut().sort_by_count_desc();
    recorder.write_snapshot(sim.store())?;
    recorder.flush()?;

    info!(
        "replicate {replicate} finished: {} cells in {} genotypes",
        sim.store().total_count(),
        sim.store().len()
    );
    Ok(ReplicateOutcome {
        replicate,
        generations: sim.generation(),
        final_size: sim.target_size(),
        genotypes: sim.store().len(),
    })
}

/// Run all configured replicates sequentially, writing the effective
/// configuration next to the results.
///
/// `on_generation` receives (replicate, generation) after every completed
/// generation, for progress reporting.
pub fn run_all(
    config: &RunConfig,
    base_seed: u64,
    out_dir: &Path,
    mut on_generation: impl FnMut(u32, u32),
) -> Result<Vec<ReplicateOutcome>, SimulationError> {
    write_config_json(out_dir, config)?;
    let mut outcomes = Vec::with_capacity(config.replicates as usize);
    for replicate in 1..=config.replicates {
        let outcome = run_replicate(config, replicate, base_seed, out_dir, |generation| {
            on_generation(replicate, generation)
        })?;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
