//! Genetic distance and diversity over the genotype store.
//!
//! The distance between two genotypes is the Hamming distance over the locus
//! space, which for duplicate-free sorted mutation sets is the size of their
//! symmetric difference. A merge walk over the two sorted lists computes it
//! in O(k1 + k2) instead of materializing locus bitmaps.

use crate::base::Genotype;
use crate::store::GenotypeStore;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Relative frequency of every genotype, in slot order.
pub fn genotype_frequencies(store: &GenotypeStore) -> Vec<f64> {
    let total = store.total_count();
    if total == 0 {
        return vec![0.0; store.len()];
    }
    let total = total as f64;
    store
        .records()
        .iter()
        .map(|g| g.count() as f64 / total)
        .collect()
}

/// Hamming distance between two normalized genotypes: the number of loci
/// mutated in exactly one of them.
pub fn set_distance(a: &Genotype, b: &Genotype) -> u64 {
    let xs = a.mutations();
    let ys = b.mutations();
    let mut i = 0;
    let mut j = 0;
    let mut dist = 0u64;
    while i < xs.len() && j < ys.len() {
        match xs[i].cmp(&ys[j]) {
            Ordering::Less => {
                dist += 1;
                i += 1;
            }
            Ordering::Greater => {
                dist += 1;
                j += 1;
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    dist + (xs.len() - i) as u64 + (ys.len() - j) as u64
}

/// Expected Hamming distance between two individuals drawn uniformly at
/// random, as the frequency-weighted sum over all unordered genotype pairs.
/// Each pair contributes 2 f_i f_j d_ij since either draw order realizes it.
///
/// Quadratic in the number of live genotypes; rows are computed in parallel.
pub fn expected_pairwise_distance(store: &GenotypeStore) -> f64 {
    let freq = genotype_frequencies(store);
    let records = store.records();
    (0..records.len())
        .into_par_iter()
        .map(|i| {
            let mut acc = 0.0;
            for j in (i + 1)..records.len() {
                acc += 2.0 * freq[i] * freq[j] * set_distance(&records[i], &records[j]) as f64;
            }
            acc
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(records: Vec<Genotype>) -> GenotypeStore {
        let mut store = GenotypeStore::empty(records.len() + 1);
        for g in records {
            store.push(g).unwrap();
        }
        store
    }

    #[test]
    fn test_distance_to_founder() {
        let a = Genotype::root(1);
        let b = Genotype::new(vec![1], 1);
        assert_eq!(set_distance(&a, &b), 1);
    }

    #[test]
    fn test_distance_disjoint_sets() {
        let a = Genotype::new(vec![1, 3], 1);
        let b = Genotype::new(vec![2, 4], 1);
        assert_eq!(set_distance(&a, &b), 4);
    }

    #[test]
    fn test_distance_overlapping_sets() {
        let a = Genotype::new(vec![1, 2, 3], 1);
        let b = Genotype::new(vec![2, 3, 4], 1);
        assert_eq!(set_distance(&a, &b), 2);
    }

    #[test]
    fn test_distance_identical_sets() {
        let a = Genotype::new(vec![5, 9], 1);
        assert_eq!(set_distance(&a, &a.clone()), 0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Genotype::new(vec![1, 7, 9], 1);
        let b = Genotype::new(vec![2, 7], 1);
        assert_eq!(set_distance(&a, &b), set_distance(&b, &a));
    }

    #[test]
    fn test_frequencies_sum_to_one() {
        let store = store_of(vec![
            Genotype::new(vec![1], 25),
            Genotype::new(vec![2], 75),
        ]);
        let freq = genotype_frequencies(&store);
        assert!((freq.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((freq[0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_expected_distance_two_equal_clones() {
        // Two genotypes at 0.5/0.5 differing at one locus: a random pair of
        // individuals differs with probability 1/2, so the expectation is 0.5.
        let store = store_of(vec![Genotype::root(5), Genotype::new(vec![1], 5)]);
        assert!((expected_pairwise_distance(&store) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_expected_distance_monomorphic_is_zero() {
        let store = store_of(vec![Genotype::new(vec![4], 100)]);
        assert_eq!(expected_pairwise_distance(&store), 0.0);
    }
}
