//! Mutation injection: split mutated cells off into new genotype records.
//!
//! Two independent mutation classes act each generation: driver-region
//! mutations at rate `u` over the driver window, passenger mutations at rate
//! `v` over the passenger window. For a genotype with abundance c the number
//! of cells acquiring at least one mutation in a class is
//! Binomial(c, 1 - (1-mu)^L) with L the window length. Each mutated cell
//! becomes a new record with count 1 carrying one uniformly drawn locus, and
//! possibly a second from the same window.

use crate::base::{LocusPartition, LocusWindow};
use crate::errors::SimulationError;
use crate::evolution::sampling;
use crate::store::GenotypeStore;
use log::{debug, warn};
use rand::Rng;

/// One mutation class: a per-locus rate acting on a window of loci.
#[derive(Debug, Clone, Copy)]
pub struct MutationClass {
    name: &'static str,
    rate: f64,
    window: LocusWindow,
}

impl MutationClass {
    pub fn new(name: &'static str, rate: f64, window: LocusWindow) -> Self {
        Self { name, rate, window }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn window(&self) -> LocusWindow {
        self.window
    }

    /// Probability that a cell escapes the class entirely: (1-mu)^L.
    fn miss_probability(&self) -> f64 {
        (1.0 - self.rate).powf(self.window.len() as f64)
    }

    /// Probability of at least one mutation in the class: 1 - (1-mu)^L.
    fn hit_probability(&self) -> f64 {
        1.0 - self.miss_probability()
    }
}

/// The per-run mutation model: the driver and passenger classes plus the
/// per-genotype mutation-count ceiling.
#[derive(Debug, Clone)]
pub struct MutationModel {
    driver: MutationClass,
    passenger: MutationClass,
    max_mutations: usize,
}

impl MutationModel {
    /// Build the model from the locus partition and the two class rates.
    pub fn new(
        partition: &LocusPartition,
        driver_rate: f64,
        passenger_rate: f64,
        max_mutations: usize,
    ) -> Self {
        Self {
            driver: MutationClass::new("driver", driver_rate, partition.driver_window()),
            passenger: MutationClass::new(
                "passenger",
                passenger_rate,
                partition.passenger_window(),
            ),
            max_mutations,
        }
    }

    pub fn max_mutations(&self) -> usize {
        self.max_mutations
    }

    /// Run both mutation classes over the store, driver class first.
    ///
    /// Preserves the total population size: every mutated cell is moved, not
    /// created. Capacity overflow is fatal and propagates so the caller can
    /// flush state before terminating.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        store: &mut GenotypeStore,
        rng: &mut R,
    ) -> Result<(), SimulationError> {
        self.apply_class(&self.driver, store, rng)?;
        self.apply_class(&self.passenger, store, rng)?;
        Ok(())
    }

    fn apply_class<R: Rng + ?Sized>(
        &self,
        class: &MutationClass,
        store: &mut GenotypeStore,
        rng: &mut R,
    ) -> Result<(), SimulationError> {
        if class.window.is_empty() || class.rate <= 0.0 {
            debug!("mutation class {} inactive, skipped", class.name);
            return Ok(());
        }
        let p_hit = class.hit_probability();
        let p_miss = class.miss_probability();

        // Records appended during this pass land at the end and are scanned
        // by the same pass, so the length is re-read every iteration.
        let mut i = 0;
        while i < store.len() {
            let mutants = sampling::binomial(rng, store.get(i).count(), p_hit)?;
            if mutants > 0 {
                store.ensure_room(mutants as usize)?;
            }
            for _ in 0..mutants {
                let slot = store.split_mutant(i)?;
                let genotype = store.get_mut(slot);

                if genotype.len() + 2 > self.max_mutations {
                    warn!(
                        "genotype at {} mutations would exceed the maximum of {}, clamping",
                        genotype.len(),
                        self.max_mutations
                    );
                    genotype.truncate(self.max_mutations.saturating_sub(2));
                }

                genotype.push_locus(class.window.sample(rng));
                // A second mutation in the same event, thresholded on the
                // zero-additional-mutation probability of the class.
                if rng.random::<f64>() > p_miss {
                    genotype.push_locus(class.window.sample(rng));
                }
                genotype.normalize();
            }
            i += 1;
        }
        Ok(())
    }
}
