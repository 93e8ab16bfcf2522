//! Deterministic geometric growth schedule for the population size.
//!
//! The per-generation growth factor is chosen once so that the population
//! reaches the final size after the configured number of generations:
//! a = exp((ln N_final - ln N_init) / G). The expected size is carried in
//! floating point and rounded to the nearest integer each generation.

use crate::errors::GrowthError;

/// Hard ceiling on the scheduled population size. Exceeding it is fatal and
/// guards against runaway growth from malformed parameters.
pub const POPULATION_CEILING: u64 = 2_000_000_000;

/// Per-run growth schedule. Advancing it yields the target size N(t).
#[derive(Debug, Clone)]
pub struct GrowthSchedule {
    rate: f64,
    expected: f64,
}

impl GrowthSchedule {
    pub fn new(initial_size: u64, final_size: u64, generations: u32) -> Self {
        let rate = (((final_size as f64).ln() - (initial_size as f64).ln())
            / f64::from(generations))
        .exp();
        Self {
            rate,
            expected: initial_size as f64,
        }
    }

    /// The per-generation growth factor a.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Generations needed to double the population under this schedule.
    pub fn doubling_time(&self) -> f64 {
        std::f64::consts::LN_2 / self.rate.ln()
    }

    /// Advance one generation and return the new target size, rounded to the
    /// nearest integer.
    pub fn advance(&mut self) -> Result<u64, GrowthError> {
        self.expected *= self.rate;
        let size = (self.expected + 0.5).floor();
        if size > POPULATION_CEILING as f64 {
            return Err(GrowthError::PopulationOverflow {
                size: size as u64,
                ceiling: POPULATION_CEILING,
            });
        }
        Ok(size as u64)
    }
}
