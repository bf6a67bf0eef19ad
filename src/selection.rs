//! Fitness-proportionate (roulette-wheel) parent selection.
//!
//! Raw tour lengths are turned into fitness with `max(d) - d_i`, so the
//! shortest tour of a generation scores highest and the longest scores zero.
//! Fitness is then normalized into a categorical distribution. When every
//! tour costs the same the fitness sum is zero and the wheel falls back to a
//! uniform distribution.

use crate::error::{GaError, GaResult};
use crate::population::Tour;
use rand::Rng;
use tracing::warn;

/// Allowed deviation of the probability sum from one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Converts raw tour costs into non-negative fitness scores.
pub fn fitness_scores(costs: &[f64]) -> Vec<f64> {
    let max_cost = costs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    costs.iter().map(|&cost| max_cost - cost).collect()
}

/// Normalizes fitness scores into selection probabilities.
pub fn selection_probabilities(fitness: &[f64]) -> GaResult<Vec<f64>> {
    if fitness.is_empty() {
        return Err(GaError::InvalidInput(
            "cannot build selection probabilities for an empty population".to_string(),
        ));
    }

    let total: f64 = fitness.iter().sum();
    let probabilities: Vec<f64> = if total == 0.0 {
        warn!(
            individuals = fitness.len(),
            "all tours share the same cost, selecting uniformly"
        );
        vec![1.0 / fitness.len() as f64; fitness.len()]
    } else {
        fitness.iter().map(|&f| f / total).collect()
    };

    let sum: f64 = probabilities.iter().sum();
    // Written so that a NaN sum fails the check.
    if !((sum - 1.0).abs() <= PROBABILITY_TOLERANCE) {
        return Err(GaError::FitnessNormalization {
            sum,
            tolerance: PROBABILITY_TOLERANCE,
        });
    }

    Ok(probabilities)
}

/// Cumulative distribution over the individuals of one generation.
#[derive(Clone, Debug)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
    last_positive: usize,
}

impl RouletteWheel {
    pub fn from_probabilities(probabilities: &[f64]) -> GaResult<Self> {
        let last_positive = probabilities
            .iter()
            .rposition(|&p| p > 0.0)
            .ok_or_else(|| {
                GaError::InvalidInput("selection probabilities contain no positive entry".into())
            })?;

        let cumulative = probabilities
            .iter()
            .scan(0.0, |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect();

        Ok(Self {
            cumulative,
            last_positive,
        })
    }

    /// Builds the wheel straight from raw tour costs.
    pub fn from_costs(costs: &[f64]) -> GaResult<Self> {
        Self::from_probabilities(&selection_probabilities(&fitness_scores(costs))?)
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Draws one index, with replacement.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u = rng.gen::<f64>();
        // Rounding can leave the last cumulative value a hair below one.
        self.cumulative
            .partition_point(|&c| c <= u)
            .min(self.last_positive)
    }
}

/// Draws one parent from `population` according to `wheel`.
pub fn select_parent<'a, R: Rng + ?Sized>(
    population: &'a [Tour],
    wheel: &RouletteWheel,
    rng: &mut R,
) -> &'a Tour {
    &population[wheel.sample(rng)]
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Probabilities sum to one for any finite cost vector, ties included.
        #[test]
        fn prop_probabilities_sum_to_one(costs in prop::collection::vec(0.0f64..1e6, 1..200)) {
            let probabilities = selection_probabilities(&fitness_scores(&costs)).unwrap();
            let sum: f64 = probabilities.iter().sum();
            prop_assert!((sum - 1.0).abs() <= PROBABILITY_TOLERANCE);
            prop_assert!(probabilities.iter().all(|&p| p >= 0.0));
        }

        #[test]
        fn prop_uniform_when_all_equal(cost in 0.0f64..1e6, k in 1usize..100) {
            let probabilities = selection_probabilities(&fitness_scores(&vec![cost; k])).unwrap();
            for p in probabilities {
                prop_assert!((p - 1.0 / k as f64).abs() < 1e-12);
            }
        }

        #[test]
        fn prop_sample_in_range(costs in prop::collection::vec(0.0f64..1e3, 1..50), seed in any::<u64>()) {
            let wheel = RouletteWheel::from_costs(&costs).unwrap();
            let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(seed);
            for _ in 0..20 {
                prop_assert!(wheel.sample(&mut rng) < costs.len());
            }
        }
    }
}
