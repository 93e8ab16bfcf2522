//! Detection-threshold summary of a population snapshot.
//!
//! Models what a sequencing assay with detection sensitivity delta would see:
//! a locus is observable when the fraction of cells carrying it exceeds
//! delta. The report combines the mutation-count distribution with the
//! distance of each clone to the "consensus observed" genotype built from the
//! observable loci.

use crate::analysis::diversity::expected_pairwise_distance;
use crate::base::LocusId;
use crate::store::GenotypeStore;
use std::collections::HashMap;

/// Summary statistics of a store snapshot under a detection threshold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionReport {
    /// Smallest mutation count carried by any cell
    pub k_min: usize,
    /// Largest mutation count carried by any cell
    pub k_max: usize,
    /// Mean mutation count per cell
    pub k_mean: f64,
    /// Modal mutation count (ties resolved toward the smaller k)
    pub k_modal: usize,
    /// Fraction of the cells at the modal k that belong to its dominant clone
    pub modal_homogeneity: f64,
    /// Number of loci whose aggregate frequency exceeds the threshold
    pub k_observed: usize,
    /// Expected distance from a random cell to the consensus observed genotype
    pub expected_distance_to_observed: f64,
    /// Expected number of carried mutations not observable in the population
    pub expected_excess: f64,
    /// Expected number of observable mutations a cell does not carry
    pub expected_missing: f64,
    /// Probability that a cell carries at least one unobservable mutation
    pub prob_unobserved_mutation: f64,
    /// Expected pairwise Hamming distance across the population
    pub expected_pairwise_distance: f64,
}

/// Compute the detection report for a threshold `delta` in [0, 1].
///
/// Read-only pass over the store; the store must be a stable snapshot (no
/// concurrent resampling or mutation).
pub fn detect(store: &GenotypeStore, delta: f64) -> DetectionReport {
    let total = store.total_count();
    if store.is_empty() || total == 0 {
        return DetectionReport::default();
    }
    let total_f = total as f64;

    // Mutation-count distribution and per-locus aggregate counts.
    let max_k = store
        .records()
        .iter()
        .map(|g| g.len())
        .max()
        .unwrap_or(0);
    let mut k_freq = vec![0u64; max_k + 1];
    let mut locus_counts: HashMap<LocusId, u64> = HashMap::new();
    for genotype in store.records() {
        k_freq[genotype.len()] += genotype.count();
        for &locus in genotype.mutations() {
            *locus_counts.entry(locus).or_insert(0) += genotype.count();
        }
    }

    let k_min = k_freq.iter().position(|&c| c > 0).unwrap_or(0);
    let k_max = k_freq.iter().rposition(|&c| c > 0).unwrap_or(0);
    let k_mean = k_freq
        .iter()
        .enumerate()
        .map(|(k, &c)| k as f64 * c as f64)
        .sum::<f64>()
        / total_f;
    // Smallest k with the maximal cell count.
    let mut k_modal = 0;
    let mut modal_count = k_freq[0];
    for (k, &count) in k_freq.iter().enumerate().skip(1) {
        if count > modal_count {
            modal_count = count;
            k_modal = k;
        }
    }

    let modal_cells = modal_count;
    let dominant = store
        .records()
        .iter()
        .filter(|g| g.len() == k_modal)
        .map(|g| g.count())
        .max()
        .unwrap_or(0);
    let modal_homogeneity = if modal_cells > 0 {
        dominant as f64 / modal_cells as f64
    } else {
        0.0
    };

    // Consensus observed genotype: loci above the detection threshold.
    let mut observed: Vec<LocusId> = locus_counts
        .iter()
        .filter(|&(_, &count)| count as f64 > delta * total_f)
        .map(|(&locus, _)| locus)
        .collect();
    observed.sort_unstable();

    let mut expected_distance_to_observed = 0.0;
    let mut expected_excess = 0.0;
    let mut expected_missing = 0.0;
    let mut prob_unobserved_mutation = 0.0;
    for genotype in store.records() {
        let (excess, missing) = split_difference(genotype.mutations(), &observed);
        let frac = genotype.count() as f64 / total_f;
        expected_distance_to_observed += frac * (excess + missing) as f64;
        expected_excess += frac * excess as f64;
        expected_missing += frac * missing as f64;
        if excess > 0 {
            prob_unobserved_mutation += frac;
        }
    }

    DetectionReport {
        k_min,
        k_max,
        k_mean,
        k_modal,
        modal_homogeneity,
        k_observed: observed.len(),
        expected_distance_to_observed,
        expected_excess,
        expected_missing,
        prob_unobserved_mutation,
        expected_pairwise_distance: expected_pairwise_distance(store),
    }
}

/// Count loci present only in `carried` (excess) and only in `observed`
/// (missing), walking both sorted lists once.
fn split_difference(carried: &[LocusId], observed: &[LocusId]) -> (usize, usize) {
    let mut i = 0;
    let mut j = 0;
    let mut excess = 0;
    let mut missing = 0;
    while i < carried.len() && j < observed.len() {
        match carried[i].cmp(&observed[j]) {
            std::cmp::Ordering::Less => {
                excess += 1;
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                missing += 1;
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    (excess + carried.len() - i, missing + observed.len() - j)
}
