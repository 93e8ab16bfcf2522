//! The genotype store: the sole mutable state of a simulation run.
//!
//! A capacity-bounded arena of genotype records indexed by slot. Records are
//! mutated in place during resampling, new records are appended (or reuse an
//! exhausted source slot) during mutation, and zero-count records are purged
//! by swapping in the last live record.

pub mod dedup;

pub use dedup::{deduplicate, mutation_order};

use crate::base::Genotype;
use crate::errors::CapacityError;

/// Capacity-bounded collection of genotype records.
///
/// Invariant between operations: the sum of all record counts equals the
/// current population size. Zero-count records may exist transiently inside
/// an operation but never across a generation boundary after cleanup.
#[derive(Debug, Clone)]
pub struct GenotypeStore {
    records: Vec<Genotype>,
    capacity: usize,
}

impl GenotypeStore {
    /// Create a store holding only the founder genotype at the initial size.
    pub fn with_root(capacity: usize, initial_size: u64) -> Self {
        let mut records = Vec::new();
        records.push(Genotype::root(initial_size));
        Self { records, capacity }
    }

    /// Create an empty store (used by tests and analysis fixtures).
    pub fn empty(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity,
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hard record capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, slot: usize) -> &Genotype {
        &self.records[slot]
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut Genotype {
        &mut self.records[slot]
    }

    pub fn records(&self) -> &[Genotype] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Genotype] {
        &mut self.records
    }

    /// Total population size: sum of all record counts.
    pub fn total_count(&self) -> u64 {
        self.records.iter().map(Genotype::count).sum()
    }

    /// Fail fast if adding `extra` records would exceed the capacity.
    ///
    /// Capacity overflow is fatal for the run; callers flush current state to
    /// output before terminating.
    pub fn ensure_room(&self, extra: usize) -> Result<(), CapacityError> {
        if self.records.len() + extra > self.capacity {
            return Err(CapacityError {
                live: self.records.len(),
                requested: extra,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append a record, enforcing the capacity bound.
    pub fn push(&mut self, genotype: Genotype) -> Result<usize, CapacityError> {
        self.ensure_room(1)?;
        self.records.push(genotype);
        Ok(self.records.len() - 1)
    }

    /// Split one cell off the genotype in `source` as a new record with
    /// count 1, and return the slot holding the new record.
    ///
    /// The source count is decremented. If that exhausts the source, the new
    /// record reuses the source slot in place instead of allocating a fresh
    /// one, so the store never grows on the last split of a genotype.
    pub fn split_mutant(&mut self, source: usize) -> Result<usize, CapacityError> {
        self.records[source].decrement();
        if self.records[source].is_extinct() {
            self.records[source].set_count(1);
            Ok(source)
        } else {
            let copy = Genotype::new(self.records[source].mutations().to_vec(), 1);
            self.push(copy)
        }
    }

    /// Fast purge: remove zero-count records by swapping in the last live
    /// record. Order is not preserved.
    pub fn purge_zeros(&mut self) {
        let mut i = 0;
        while i < self.records.len() {
            if self.records[i].count() != 0 {
                i += 1;
                continue;
            }
            while self.records.last().is_some_and(Genotype::is_extinct) {
                self.records.pop();
            }
            if i < self.records.len() {
                self.records.swap_remove(i);
                i += 1;
            }
        }
    }

    /// Sort records by abundance, most frequent first (used for the final
    /// snapshot).
    pub fn sort_by_count_desc(&mut self) {
        self.records.sort_by(|a, b| b.count().cmp(&a.count()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_with_root() {
        let store = GenotypeStore::with_root(10, 100);
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_count(), 100);
        assert!(store.get(0).is_empty());
    }

    #[test]
    fn test_capacity_check() {
        let mut store = GenotypeStore::with_root(2, 5);
        assert!(store.ensure_room(1).is_ok());
        store.push(Genotype::new(vec![1], 1)).unwrap();
        let err = store.push(Genotype::new(vec![2], 1)).unwrap_err();
        assert_eq!(err.live, 2);
        assert_eq!(err.capacity, 2);
    }

    #[test]
    fn test_split_mutant_appends() {
        let mut store = GenotypeStore::with_root(10, 3);
        let slot = store.split_mutant(0).unwrap();
        assert_eq!(slot, 1);
        assert_eq!(store.get(0).count(), 2);
        assert_eq!(store.get(1).count(), 1);
        assert_eq!(store.total_count(), 3);
    }

    #[test]
    fn test_split_mutant_reuses_exhausted_slot() {
        let mut store = GenotypeStore::with_root(10, 1);
        let slot = store.split_mutant(0).unwrap();
        assert_eq!(slot, 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).count(), 1);
    }

    #[test]
    fn test_purge_zeros_swaps_last() {
        let mut store = GenotypeStore::empty(10);
        store.push(Genotype::new(vec![1], 5)).unwrap();
        store.push(Genotype::new(vec![2], 0)).unwrap();
        store.push(Genotype::new(vec![3], 7)).unwrap();
        store.push(Genotype::new(vec![4], 0)).unwrap();
        store.purge_zeros();
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_count(), 12);
        assert!(store.records().iter().all(|g| g.count() > 0));
    }

    #[test]
    fn test_purge_zeros_all_dead() {
        let mut store = GenotypeStore::empty(4);
        store.push(Genotype::new(vec![1], 0)).unwrap();
        store.push(Genotype::new(vec![2], 0)).unwrap();
        store.purge_zeros();
        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_zeros_keeps_live_only_store() {
        let mut store = GenotypeStore::empty(4);
        store.push(Genotype::new(vec![1], 2)).unwrap();
        store.push(Genotype::new(vec![2], 3)).unwrap();
        store.purge_zeros();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_sort_by_count_desc() {
        let mut store = GenotypeStore::empty(4);
        store.push(Genotype::new(vec![1], 2)).unwrap();
        store.push(Genotype::new(vec![2], 9)).unwrap();
        store.push(Genotype::new(vec![3], 4)).unwrap();
        store.sort_by_count_desc();
        let counts: Vec<u64> = store.records().iter().map(Genotype::count).collect();
        assert_eq!(counts, vec![9, 4, 2]);
    }
}
