//! Sampling primitives: binomial draws and the joint multinomial draw that
//! resamples the whole population in one step.

use crate::errors::SamplingError;
use rand::Rng;
use rand_distr::{Binomial, Distribution};

/// Draw from Binomial(n, p).
pub fn binomial<R: Rng + ?Sized>(rng: &mut R, n: u64, p: f64) -> Result<u64, SamplingError> {
    if !(0.0..=1.0).contains(&p) || p.is_nan() {
        return Err(SamplingError::InvalidProbability(p));
    }
    if n == 0 || p == 0.0 {
        return Ok(0);
    }
    if p >= 1.0 {
        return Ok(n);
    }
    let dist = Binomial::new(n, p).map_err(|_| SamplingError::InvalidProbability(p))?;
    Ok(dist.sample(rng))
}

/// Draw a joint abundance vector from a multinomial distribution with
/// `trials` total draws and per-category probabilities proportional to
/// `weights` (which need not be normalized).
///
/// Uses the conditional binomial decomposition: category k receives a
/// binomial share of the trials still unassigned, conditioned on the weight
/// mass still in play. The returned counts always sum to `trials` exactly,
/// which is what keeps the population-size invariant under resampling. The
/// draw is joint, not per-category independent, so competition between
/// categories for finite `trials` is captured.
pub fn multinomial<R: Rng + ?Sized>(
    rng: &mut R,
    trials: u64,
    weights: &[f64],
) -> Result<Vec<u64>, SamplingError> {
    let mut total = 0.0f64;
    for &w in weights {
        if w < 0.0 || !w.is_finite() {
            return Err(SamplingError::InvalidWeight(w));
        }
        total += w;
    }
    if weights.is_empty() || total <= 0.0 {
        return Err(SamplingError::DegenerateWeights);
    }

    let last_positive = weights
        .iter()
        .rposition(|&w| w > 0.0)
        .expect("total > 0 implies a positive weight");

    let mut counts = vec![0u64; weights.len()];
    let mut remaining = trials;
    let mut weight_left = total;

    for (k, &w) in weights.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        if w <= 0.0 {
            continue;
        }
        if k == last_positive {
            // The final category takes everything still unassigned; this is
            // the p = 1 binomial and keeps the sum exact under rounding.
            counts[k] = remaining;
            remaining = 0;
            break;
        }
        let p = (w / weight_left).clamp(0.0, 1.0);
        let n = binomial(rng, remaining, p)?;
        counts[k] = n;
        remaining -= n;
        weight_left -= w;
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng(seed: u64) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    #[test]
    fn test_binomial_edge_cases() {
        let mut r = rng(1);
        assert_eq!(binomial(&mut r, 0, 0.5).unwrap(), 0);
        assert_eq!(binomial(&mut r, 10, 0.0).unwrap(), 0);
        assert_eq!(binomial(&mut r, 10, 1.0).unwrap(), 10);
        assert!(binomial(&mut r, 10, 1.5).is_err());
        assert!(binomial(&mut r, 10, -0.1).is_err());
    }

    #[test]
    fn test_binomial_bounded_by_n() {
        let mut r = rng(2);
        for _ in 0..100 {
            let n = binomial(&mut r, 50, 0.3).unwrap();
            assert!(n <= 50);
        }
    }

    #[test]
    fn test_multinomial_sum_invariant() {
        let mut r = rng(42);
        let weights = vec![1.0, 2.5, 0.0, 7.1, 0.4];
        for trials in [0u64, 1, 100, 123_456] {
            let counts = multinomial(&mut r, trials, &weights).unwrap();
            assert_eq!(counts.iter().sum::<u64>(), trials);
            assert_eq!(counts[2], 0);
        }
    }

    #[test]
    fn test_multinomial_single_category() {
        let mut r = rng(3);
        let counts = multinomial(&mut r, 1000, &[3.7]).unwrap();
        assert_eq!(counts, vec![1000]);
    }

    #[test]
    fn test_multinomial_rejects_degenerate_weights() {
        let mut r = rng(4);
        assert!(multinomial(&mut r, 10, &[]).is_err());
        assert!(multinomial(&mut r, 10, &[0.0, 0.0]).is_err());
        assert!(multinomial(&mut r, 10, &[1.0, -2.0]).is_err());
        assert!(multinomial(&mut r, 10, &[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_multinomial_tracks_weights() {
        // With one dominant weight the dominant category should take most
        // draws; a loose sanity bound keeps this robust to seeds.
        let mut r = rng(5);
        let counts = multinomial(&mut r, 100_000, &[99.0, 1.0]).unwrap();
        assert!(counts[0] > 90_000, "dominant category got {}", counts[0]);
    }

    #[test]
    fn test_multinomial_deterministic_for_seed() {
        let weights = vec![1.0, 2.0, 3.0];
        let a = multinomial(&mut rng(7), 5000, &weights).unwrap();
        let b = multinomial(&mut rng(7), 5000, &weights).unwrap();
        assert_eq!(a, b);
    }
}
