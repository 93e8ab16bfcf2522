//! The generation update engine.
//!
//! A `Simulation` owns one replicate's mutable state: the genotype store, a
//! private random stream and the growth schedule. `step` advances exactly one
//! generation through the fixed phase sequence Growth, Selection, Resampling,
//! Mutation, Cleanup; no generation begins until the previous one's cleanup
//! has run.

use crate::base::FitnessModel;
use crate::errors::{ConfigError, SimulationError};
use crate::evolution::{sampling, GrowthSchedule, MutationModel};
use crate::simulation::RunConfig;
use crate::store::{deduplicate, GenotypeStore};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

/// One replicate's simulation context.
#[derive(Debug)]
pub struct Simulation {
    store: GenotypeStore,
    fitness: FitnessModel,
    mutation: MutationModel,
    growth: GrowthSchedule,
    /// Full deduplication cadence in generations
    dedup_every: u32,
    /// Generations completed so far
    generation: u32,
    /// Total generations the run is configured for
    total_generations: u32,
    /// Target size N(t) of the last completed generation
    target_size: u64,
    rng: Xoshiro256PlusPlus,
}

impl Simulation {
    /// Build a simulation from a validated configuration and a seed.
    ///
    /// The store starts with a single founder genotype (no mutations) at the
    /// initial population size.
    pub fn new(config: &RunConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let partition = config.partition()?;
        let fitness = FitnessModel::new(config.selection, config.other_selection(), partition);
        let mutation = MutationModel::new(
            &partition,
            config.driver_rate,
            config.passenger_rate(),
            config.max_mutations,
        );
        let growth = GrowthSchedule::new(config.initial_size, config.final_size, config.generations);
        Ok(Self {
            store: GenotypeStore::with_root(config.capacity, config.initial_size),
            fitness,
            mutation,
            growth,
            dedup_every: config.dedup_every,
            generation: 0,
            total_generations: config.generations,
            target_size: config.initial_size,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        })
    }

    pub fn store(&self) -> &GenotypeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GenotypeStore {
        &mut self.store
    }

    /// Generations completed so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Target population size of the current generation.
    pub fn target_size(&self) -> u64 {
        self.target_size
    }

    pub fn growth(&self) -> &GrowthSchedule {
        &self.growth
    }

    pub fn fitness(&self) -> &FitnessModel {
        &self.fitness
    }

    /// Selection weights for every live genotype, in slot order.
    ///
    /// Read-only over the store, computed in parallel.
    fn selection_weights(&self) -> Vec<f64> {
        let fitness = &self.fitness;
        self.store
            .records()
            .par_iter()
            .map(|g| fitness.weight(g))
            .collect()
    }

    /// Advance the simulation by one generation.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        self.generation += 1;

        // Growth: the deterministic size schedule.
        let target = self.growth.advance()?;
        self.target_size = target;

        // Selection + Resampling: one joint multinomial draw replaces all
        // counts atomically, so the counts sum to N(t) exactly.
        let weights = self.selection_weights();
        let counts = sampling::multinomial(&mut self.rng, target, &weights)?;
        for (slot, count) in counts.into_iter().enumerate() {
            self.store.get_mut(slot).set_count(count);
        }
        // Low-frequency genotypes are likely not sampled at all; purge them
        // before mutation has to scan the store.
        self.store.purge_zeros();

        // Mutation: both classes, then the per-generation fast cleanup.
        self.mutation.apply(&mut self.store, &mut self.rng)?;
        self.store.purge_zeros();

        if self.generation % self.dedup_every == 0 {
            deduplicate(&mut self.store);
        }
        Ok(())
    }

    /// Run all configured generations without recording output.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        for _ in self.generation..self.total_generations {
            self.step()?;
        }
        Ok(())
    }

    /// Run a specific number of generations.
    pub fn run_for(&mut self, generations: u32) -> Result<(), SimulationError> {
        for _ in 0..generations {
            self.step()?;
        }
        Ok(())
    }
}
