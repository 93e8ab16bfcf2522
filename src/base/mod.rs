//! Core value types: genotypes, the locus partition and the fitness model.

pub mod fitness;
pub mod genotype;
pub mod loci;

pub use fitness::FitnessModel;
pub use genotype::{Genotype, LocusId};
pub use loci::{LocusClass, LocusPartition, LocusWindow};
