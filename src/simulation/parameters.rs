//! Run configuration and validation.
//!
//! All parameters are immutable for the duration of a run. Validation happens
//! before any simulation work; every violation maps to a `ConfigError`.

use crate::base::LocusPartition;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest population size the sampler can resolve exactly: beyond 2^53 the
/// f64 weight arithmetic of the multinomial draw loses integer precision.
pub const RNG_SAMPLING_MAX: u64 = 1 << 53;

/// The full configuration of a simulation run.
///
/// Serializes to JSON so the effective configuration can be stored alongside
/// the run's output for reproducibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Initial population size N0
    pub initial_size: u64,
    /// Final population size the growth schedule targets
    pub final_size: u64,
    /// Number of generations G
    pub generations: u32,
    /// Driver-region mutation rate u (per locus per generation)
    pub driver_rate: f64,
    /// Passenger-region mutation rate v; defaults to u when absent
    pub passenger_rate: Option<f64>,
    /// Selective advantage s per ordinary driver mutation
    pub selection: f64,
    /// Selective advantage s1 per other-driver mutation; defaults to 1.5 s
    pub other_selection: Option<f64>,
    /// Number of independent replicate runs
    pub replicates: u32,
    /// Total number of loci D
    pub total_loci: u32,
    /// Passenger loci d0
    pub passenger_loci: u32,
    /// Other-driver loci d1
    pub other_driver_loci: u32,
    /// Maximum mutations per genotype K
    pub max_mutations: usize,
    /// Maximum live genotype records
    pub capacity: usize,
    /// Run full deduplication every this many generations
    pub dedup_every: u32,
    /// Emit tabular output every this many generations
    pub record_every: u32,
    /// Base random seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Verbose diagnostics
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            initial_size: 1,
            final_size: 1_000_000_000,
            generations: 1800,
            driver_rate: 1e-7,
            passenger_rate: None,
            selection: 1e-2,
            other_selection: None,
            replicates: 1,
            total_loci: 1_000_000,
            passenger_loci: 0,
            other_driver_loci: 0,
            max_mutations: 1000,
            capacity: 1_000_000,
            dedup_every: 10,
            record_every: 10,
            seed: None,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// Effective passenger rate: v, falling back to the driver rate.
    pub fn passenger_rate(&self) -> f64 {
        self.passenger_rate.unwrap_or(self.driver_rate)
    }

    /// Effective other-driver selection: s1, falling back to 1.5 s.
    pub fn other_selection(&self) -> f64 {
        self.other_selection.unwrap_or(1.5 * self.selection)
    }

    /// The locus partition implied by the configured counts.
    pub fn partition(&self) -> Result<LocusPartition, ConfigError> {
        LocusPartition::new(self.total_loci, self.passenger_loci, self.other_driver_loci)
    }

    /// Check every parameter. A rate of zero is a valid degenerate model (no
    /// mutation in that class); negative values and rates of one or more are
    /// not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_size == 0 {
            return Err(ConfigError::NonPositive("initial population size"));
        }
        if self.final_size == 0 {
            return Err(ConfigError::NonPositive("final population size"));
        }
        if self.generations == 0 {
            return Err(ConfigError::NonPositive("generations"));
        }
        if self.replicates == 0 {
            return Err(ConfigError::NonPositive("replicates"));
        }
        if self.capacity == 0 {
            return Err(ConfigError::NonPositive("genotype capacity"));
        }
        if self.max_mutations == 0 {
            return Err(ConfigError::NonPositive("maximum mutations"));
        }
        if self.dedup_every == 0 {
            return Err(ConfigError::NonPositive("deduplication cadence"));
        }
        if self.record_every == 0 {
            return Err(ConfigError::NonPositive("record cadence"));
        }
        if !(0.0..1.0).contains(&self.driver_rate) {
            return Err(ConfigError::InvalidRate("u", self.driver_rate));
        }
        let v = self.passenger_rate();
        if !(0.0..1.0).contains(&v) {
            return Err(ConfigError::InvalidRate("v", v));
        }
        if self.selection < 0.0 || !self.selection.is_finite() {
            return Err(ConfigError::NegativeSelection("s", self.selection));
        }
        let s1 = self.other_selection();
        if s1 < 0.0 || !s1.is_finite() {
            return Err(ConfigError::NegativeSelection("s1", s1));
        }
        self.partition()?;
        if self.final_size >= RNG_SAMPLING_MAX {
            return Err(ConfigError::PopulationTooLarge {
                requested: self.final_size,
                max: RNG_SAMPLING_MAX,
            });
        }
        Ok(())
    }
}
