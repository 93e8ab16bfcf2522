//! Multiplicative fitness over mutated loci.
//!
//! Each ordinary driver mutation multiplies a genotype's fitness by (1+s),
//! each other-driver mutation by (1+s1); passenger mutations are neutral.
//! Selection acts through a weight proportional to fitness times abundance.

use crate::base::{Genotype, LocusClass, LocusPartition};
use serde::{Deserialize, Serialize};

/// Fitness schedule for a run: selection coefficients over the locus partition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitnessModel {
    /// Selective advantage per ordinary driver mutation
    s: f64,
    /// Selective advantage per other-driver mutation
    s1: f64,
    partition: LocusPartition,
}

impl FitnessModel {
    pub fn new(s: f64, s1: f64, partition: LocusPartition) -> Self {
        Self { s, s1, partition }
    }

    pub fn selection(&self) -> f64 {
        self.s
    }

    pub fn other_selection(&self) -> f64 {
        self.s1
    }

    pub fn partition(&self) -> &LocusPartition {
        &self.partition
    }

    /// Multiplicative fitness of a genotype: the product over its mutations of
    /// the per-class factors.
    pub fn fitness(&self, genotype: &Genotype) -> f64 {
        let mut drivers = 0i32;
        let mut other_drivers = 0i32;
        for &locus in genotype.mutations() {
            match self.partition.classify(locus) {
                LocusClass::Driver => drivers += 1,
                LocusClass::OtherDriver => other_drivers += 1,
                LocusClass::Passenger => {}
            }
        }
        (1.0 + self.s).powi(drivers) * (1.0 + self.s1).powi(other_drivers)
    }

    /// Selection weight: fitness times abundance. Weights are relative; the
    /// resampler does not require them normalized.
    pub fn weight(&self, genotype: &Genotype) -> f64 {
        self.fitness(genotype) * genotype.count() as f64
    }
}
