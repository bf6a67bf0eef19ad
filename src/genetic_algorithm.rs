use crate::error::GaResult;
use crate::genetic_optimizer::{RunOutcome, TerminationReason};
use std::fmt::Debug;

// This trait represents a chromosome - a single candidate tour
// over the city indices
pub trait Chromosome: Send + Sync + Debug + Clone {
    fn genes(&self) -> &[usize];
    fn distance(&self) -> f64;
    fn fitness(&self) -> f64;
}

// This trait represents the stopping condition of the algorithm.
// It is consulted once per epoch, after evaluation.
pub trait Evaluator<C: Chromosome>: Send + Sync + Debug {
    fn can_terminate(&mut self, best: &C, generation: usize) -> Option<TerminationReason>;
}

// This trait encapsulates the optimizer logic
pub trait Optimizer<C: Chromosome>: Send + Sync + Debug {
    fn optimize(&mut self, eval: &mut dyn Evaluator<C>) -> GaResult<RunOutcome<C>>;
}
