//! Error types for the GA engine.

use crate::operators::CrossoverKind;
use std::fmt;
use thiserror::Error;

/// Result type alias for engine operations.
pub type GaResult<T> = Result<T, GaError>;

/// The genetic operator (or stage) that produced a chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Initialization,
    Crossover(CrossoverKind),
    Mutation,
    Elitism,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Initialization => write!(f, "initialization"),
            Operator::Crossover(kind) => write!(f, "{} crossover", kind),
            Operator::Mutation => write!(f, "swap mutation"),
            Operator::Elitism => write!(f, "elitism"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GaError {
    /// Bad or missing parameters. Raised before any generation runs.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Unusable city data. Raised before any generation runs.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Selection probabilities did not sum to one.
    #[error("fitness probabilities sum to {sum}, expected 1 within {tolerance:e}")]
    FitnessNormalization { sum: f64, tolerance: f64 },

    /// A chromosome stopped being a permutation of the city indices. Fatal.
    #[error("{operator} produced an invalid tour in epoch {epoch}: {detail}")]
    InvariantViolation {
        epoch: usize,
        operator: Operator,
        detail: String,
    },

    #[error("history record for epoch {found} is out of order, expected epoch {expected}")]
    HistoryOutOfOrder { expected: usize, found: usize },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
