use crate::error::{GaError, GaResult};
use crate::operators::CrossoverKind;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    pub population_size: usize,
    /// When set, must match the number of supplied cities.
    pub num_cities: Option<usize>,
    pub mutation_rate: f64,
    /// Swaps applied to a child once mutation fires.
    pub mutation_swaps: usize,
    /// Hard cap on evaluated epochs. Always active.
    pub max_epochs: usize,
    /// Stop after this many consecutive epochs without a new best distance.
    pub stagnation_limit: Option<usize>,
    /// Stop once the best distance is at or below this value.
    pub target_distance: Option<f64>,
    pub random_seed: u64,
    /// Carry the best tour of each epoch unchanged into the next one.
    pub elitism: bool,
    pub crossover: CrossoverKind,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            num_cities: None,
            mutation_rate: 0.02,
            mutation_swaps: 1,
            max_epochs: 500,
            stagnation_limit: None,
            target_distance: None,
            random_seed: 42,
            elitism: false,
            crossover: CrossoverKind::Order,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = Some(limit);
        self
    }

    pub fn with_target_distance(mut self, target: f64) -> Self {
        self.target_distance = Some(target);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    pub fn with_crossover(mut self, crossover: CrossoverKind) -> Self {
        self.crossover = crossover;
        self
    }

    /// Checks every parameter against the number of cities the run will use.
    pub fn validate(&self, num_cities: usize) -> GaResult<()> {
        let invalid = |message: String| Err(GaError::InvalidConfiguration(message));

        if self.population_size < 2 {
            return invalid(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            ));
        }
        if let Some(expected) = self.num_cities {
            if expected != num_cities {
                return invalid(format!(
                    "num_cities is {} but {} cities were supplied",
                    expected, num_cities
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid(format!(
                "mutation_rate must be within [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if self.mutation_swaps == 0 {
            return invalid("mutation_swaps must be at least 1".to_string());
        }
        if self.max_epochs == 0 {
            return invalid("max_epochs must be at least 1".to_string());
        }
        if self.stagnation_limit == Some(0) {
            return invalid("stagnation_limit must be at least 1 when set".to_string());
        }
        if let Some(target) = self.target_distance {
            if !target.is_finite() || target < 0.0 {
                return invalid(format!(
                    "target_distance must be finite and non-negative, got {}",
                    target
                ));
            }
        }

        Ok(())
    }
}
