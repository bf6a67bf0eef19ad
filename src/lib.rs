//! Genetic algorithm for the travelling salesman problem over permutation
//! chromosomes.
//!
//! ```no_run
//! use tsp_genetic::{solve, City, GaConfig};
//!
//! let cities = vec![
//!     City::new(0.0, 0.0),
//!     City::new(0.0, 1.0),
//!     City::new(1.0, 1.0),
//!     City::new(1.0, 0.0),
//! ];
//! let outcome = solve(&cities, &GaConfig::default().with_max_epochs(50)).unwrap();
//! println!("{:?} {}", outcome.best.genes, outcome.best_distance());
//! ```

pub mod config;
pub mod demo_data;
pub mod distance;
pub mod error;
pub mod genetic_algorithm;
pub mod genetic_optimizer;
pub mod operators;
pub mod population;
pub mod reporter;
pub mod selection;

pub use config::GaConfig;
pub use distance::{City, DistanceModel};
pub use error::{GaError, GaResult, Operator};
pub use genetic_algorithm::{Chromosome, Evaluator, Optimizer};
pub use genetic_optimizer::{
    solve, GaRng, GeneticOptimizer, RunOutcome, Termination, TerminationReason, TspAlgorithm,
};
pub use operators::CrossoverKind;
pub use population::{Population, Tour};
pub use reporter::{EpochRecord, RunHistory};
