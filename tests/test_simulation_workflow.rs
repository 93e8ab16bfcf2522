//! Integration tests for end-to-end simulation workflows.
//! Exercises the invariants the engine must hold across whole runs.

use clonevo::analysis::{detect, expected_pairwise_distance};
use clonevo::simulation::{run_replicate, RunConfig, Simulation};
use clonevo::store::deduplicate;
use clonevo::{Genotype, GenotypeStore};

fn base_config() -> RunConfig {
    RunConfig {
        initial_size: 100,
        final_size: 10_000,
        generations: 40,
        driver_rate: 1e-5,
        passenger_rate: Some(5e-6),
        selection: 0.02,
        other_selection: None,
        replicates: 1,
        total_loci: 50_000,
        passenger_loci: 5_000,
        other_driver_loci: 500,
        max_mutations: 1000,
        capacity: 262_144,
        dedup_every: 10,
        record_every: 10,
        seed: Some(42),
        verbose: false,
    }
}

#[test]
fn test_resampling_count_invariant_across_seeds() {
    for seed in [1u64, 99, 2024] {
        let mut sim = Simulation::new(&base_config(), seed).unwrap();
        for _ in 0..40 {
            sim.step().unwrap();
            assert_eq!(
                sim.store().total_count(),
                sim.target_size(),
                "sum of counts diverged from N(t) under seed {seed}"
            );
        }
    }
}

#[test]
fn test_store_stays_within_capacity() {
    let mut sim = Simulation::new(&base_config(), 3).unwrap();
    sim.run().unwrap();
    assert!(sim.store().len() <= sim.store().capacity());
}

#[test]
fn test_dedup_preserves_population_and_uniqueness() {
    // A small locus space under a hot mutation rate makes independent
    // identical mutation events (and hence duplicate records) likely.
    let config = RunConfig {
        initial_size: 500,
        final_size: 500,
        generations: 7,
        driver_rate: 0.02,
        passenger_rate: Some(0.0),
        total_loci: 100,
        passenger_loci: 0,
        other_driver_loci: 0,
        max_mutations: 50,
        capacity: 65_536,
        dedup_every: 100,
        ..base_config()
    };
    let mut sim = Simulation::new(&config, 17).unwrap();
    // Stop before the cadence so the store still carries duplicates.
    sim.run_for(7).unwrap();
    let before = sim.store().total_count();

    let mut store = sim.store().clone();
    deduplicate(&mut store);

    assert_eq!(store.total_count(), before);
    let mut sets: Vec<Vec<u32>> = store
        .records()
        .iter()
        .map(|g| g.mutations().to_vec())
        .collect();
    sets.sort();
    let unique = sets.len();
    sets.dedup();
    assert_eq!(sets.len(), unique);

    // Idempotence: a second pass changes nothing.
    let once = store.clone();
    deduplicate(&mut store);
    assert_eq!(store.records(), once.records());
}

#[test]
fn test_single_cell_no_mutation_scenario() {
    let config = RunConfig {
        initial_size: 1,
        final_size: 1,
        generations: 1,
        driver_rate: 0.0,
        passenger_rate: Some(0.0),
        ..base_config()
    };
    let mut sim = Simulation::new(&config, 5).unwrap();
    sim.run().unwrap();
    assert_eq!(sim.store().len(), 1);
    assert_eq!(sim.store().get(0).count(), 1);
    assert!(sim.store().get(0).is_empty());
}

#[test]
fn test_constant_population_neutral_scenario() {
    let config = RunConfig {
        initial_size: 100,
        final_size: 100,
        generations: 10,
        driver_rate: 0.0,
        passenger_rate: Some(0.0),
        selection: 0.0,
        other_selection: Some(0.0),
        ..base_config()
    };
    let mut sim = Simulation::new(&config, 11).unwrap();
    for _ in 0..10 {
        sim.step().unwrap();
        assert_eq!(sim.store().total_count(), 100);
        assert_eq!(sim.store().len(), 1);
    }
}

#[test]
fn test_mutation_count_never_exceeds_maximum() {
    // A tiny locus space and a huge rate force repeated mutation of the same
    // genotypes; the per-genotype ceiling must clamp, not crash.
    let config = RunConfig {
        initial_size: 200,
        final_size: 200,
        generations: 30,
        driver_rate: 0.3,
        passenger_rate: Some(0.0),
        total_loci: 12,
        passenger_loci: 0,
        other_driver_loci: 0,
        max_mutations: 8,
        capacity: 65_536,
        ..base_config()
    };
    let mut sim = Simulation::new(&config, 23).unwrap();
    sim.run().unwrap();
    for genotype in sim.store().records() {
        assert!(genotype.len() <= 8);
    }
}

#[test]
fn test_validation_happens_before_any_work() {
    let config = RunConfig {
        final_size: 1 << 53,
        ..base_config()
    };
    assert!(Simulation::new(&config, 1).is_err());
}

#[test]
fn test_tabular_output_is_deterministic() {
    let config = RunConfig {
        generations: 20,
        ..base_config()
    };
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    run_replicate(&config, 1, 42, dir_a.path(), |_| {}).unwrap();
    run_replicate(&config, 1, 42, dir_b.path(), |_| {}).unwrap();

    let a = std::fs::read(dir_a.path().join("r001.tsv")).unwrap();
    let b = std::fs::read(dir_b.path().join("r001.tsv")).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn test_analysis_on_final_population() {
    let config = RunConfig {
        initial_size: 50,
        final_size: 500,
        generations: 15,
        driver_rate: 1e-4,
        passenger_rate: Some(1e-4),
        total_loci: 2_000,
        passenger_loci: 200,
        other_driver_loci: 20,
        capacity: 65_536,
        ..base_config()
    };
    let mut sim = Simulation::new(&config, 8).unwrap();
    sim.run().unwrap();

    let diversity = expected_pairwise_distance(sim.store());
    assert!(diversity >= 0.0);

    let report = detect(sim.store(), 0.5);
    assert!(report.k_min <= report.k_modal);
    assert!(report.k_modal <= report.k_max);
    assert!(report.k_mean >= report.k_min as f64);
    assert!(report.k_mean <= report.k_max as f64);
    assert!((0.0..=1.0).contains(&report.modal_homogeneity));
    assert!((0.0..=1.0).contains(&report.prob_unobserved_mutation));
    assert!(
        (report.expected_distance_to_observed
            - (report.expected_excess + report.expected_missing))
            .abs()
            < 1e-9
    );
}

#[test]
fn test_dedup_merges_specified_scenario() {
    // Two records of {42} with counts 3 and 7 merge into one with count 10.
    let mut store = GenotypeStore::empty(8);
    store.push(Genotype::new(vec![42], 3)).unwrap();
    store.push(Genotype::new(vec![42], 7)).unwrap();
    deduplicate(&mut store);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).mutations(), &[42]);
    assert_eq!(store.get(0).count(), 10);
}
