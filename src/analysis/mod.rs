//! Read-only analyses over a stable snapshot of the genotype store.
//!
//! None of these run concurrently with resampling or mutation; they take the
//! store by shared reference between generations.

pub mod detection;
pub mod diversity;

pub use detection::{detect, DetectionReport};
pub use diversity::{expected_pairwise_distance, genotype_frequencies, set_distance};
