//! Deduplication: merge genotype records that carry identical mutation sets.
//!
//! Repeated independent mutation events keep creating records that are in
//! fact the same genotype; merging them on a cadence bounds memory growth.
//! The pass is: normalize every record (parallel), sort the whole store by a
//! total order under which duplicates are adjacent (parallel, stable), merge
//! each record into its successor when equal, purge the zeroed donors.

use crate::base::Genotype;
use crate::store::GenotypeStore;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Total order making mutation-identical records adjacent: mutation-count
/// descending, then lexicographic over the sorted mutation list.
pub fn mutation_order(a: &Genotype, b: &Genotype) -> Ordering {
    b.len()
        .cmp(&a.len())
        .then_with(|| a.mutations().cmp(b.mutations()))
}

/// Merge all mutation-identical records, leaving a store with unique
/// normalized mutation sets, exact summed counts and no zero-count records.
///
/// The merge is deterministic and commutative: when several records collapse,
/// the survivor's count is their exact sum regardless of merge order. Running
/// the pass twice in a row is a no-op.
pub fn deduplicate(store: &mut GenotypeStore) {
    store
        .records_mut()
        .par_iter_mut()
        .for_each(Genotype::normalize);

    // Stable sort keeps the pass deterministic for a given input order.
    store.records_mut().par_sort_by(mutation_order);

    let records = store.records_mut();
    for i in 0..records.len().saturating_sub(1) {
        let (head, tail) = records.split_at_mut(i + 1);
        let donor = &mut head[i];
        let heir = &mut tail[0];
        if donor.mutations() == heir.mutations() {
            heir.add_count(donor.take_count());
        }
    }

    store.purge_zeros();
}
