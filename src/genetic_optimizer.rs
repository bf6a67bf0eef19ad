use crate::config::GaConfig;
use crate::distance::{City, DistanceModel};
use crate::error::{GaError, GaResult, Operator};
use crate::genetic_algorithm::{Chromosome, Evaluator, Optimizer};
use crate::operators::{check_offspring, crossover, swap_mutation};
use crate::population::{Population, Tour};
use crate::reporter::RunHistory;
use crate::selection::{fitness_scores, select_parent, selection_probabilities, RouletteWheel};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Seedable random source threaded through every stochastic step.
pub type GaRng = ChaCha8Rng;

/// A new best distance must beat the previous one by more than this.
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    MaxEpochs,
    Stagnation,
    TargetReached,
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TerminationReason::MaxEpochs => "max epochs reached",
            TerminationReason::Stagnation => "stagnation",
            TerminationReason::TargetReached => "target distance reached",
            TerminationReason::Cancelled => "cancelled",
        };
        f.write_str(reason)
    }
}

#[derive(Clone, Debug)]
pub struct RunOutcome<C: Chromosome> {
    /// Best chromosome evaluated during the whole run.
    pub best: C,
    /// Number of evaluated epochs.
    pub epochs: usize,
    pub reason: TerminationReason,
    pub history: RunHistory,
}

impl<C: Chromosome> RunOutcome<C> {
    pub fn best_distance(&self) -> f64 {
        self.best.distance()
    }

    pub fn best_genes(&self) -> &[usize] {
        self.best.genes()
    }
}

/// Stopping rule built from the configured epoch cap, stagnation limit and
/// target distance. The first satisfied condition wins.
#[derive(Clone, Debug)]
pub struct Termination {
    pub max_epochs: usize,
    pub stagnation_limit: Option<usize>,
    pub target_distance: Option<f64>,
    pub best_distance: f64,
    pub stale_epochs: usize,
}

impl Termination {
    pub fn from_config(config: &GaConfig) -> Self {
        Self {
            max_epochs: config.max_epochs,
            stagnation_limit: config.stagnation_limit,
            target_distance: config.target_distance,
            best_distance: f64::INFINITY,
            stale_epochs: 0,
        }
    }
}

impl<C: Chromosome> Evaluator<C> for Termination {
    fn can_terminate(&mut self, best: &C, generation: usize) -> Option<TerminationReason> {
        let distance = best.distance();

        if distance < self.best_distance - IMPROVEMENT_EPSILON {
            self.best_distance = distance;
            self.stale_epochs = 0;
        } else {
            self.stale_epochs += 1;
        }

        if matches!(self.target_distance, Some(target) if distance <= target) {
            Some(TerminationReason::TargetReached)
        } else if matches!(self.stagnation_limit, Some(limit) if self.stale_epochs >= limit) {
            Some(TerminationReason::Stagnation)
        } else if generation + 1 >= self.max_epochs {
            Some(TerminationReason::MaxEpochs)
        } else {
            None
        }
    }
}

/// TSP instance of the genetic algorithm: a validated configuration plus
/// the distance model it scores tours with.
#[derive(Debug)]
pub struct TspAlgorithm {
    pub config: GaConfig,
    pub model: DistanceModel,
}

impl TspAlgorithm {
    /// Validates cities and configuration before anything runs.
    pub fn new(config: GaConfig, cities: Vec<City>) -> GaResult<Self> {
        config.validate(cities.len())?;
        let model = DistanceModel::new(cities)?;
        Ok(Self { config, model })
    }

    pub fn generate(&self, rng: &mut GaRng) -> GaResult<Population> {
        let population =
            Population::initialize(self.config.population_size, self.model.num_cities(), rng)?;

        for tour in population.tours() {
            check_offspring(&tour.genes, self.model.num_cities(), 0, Operator::Initialization)?;
        }

        Ok(population)
    }

    /// Scores every tour, caches distance and fitness, and returns the
    /// selection wheel for this generation.
    pub fn evaluate(&self, tours: &mut [Tour]) -> GaResult<RouletteWheel> {
        tours.par_iter_mut().for_each(|tour| {
            tour.distance = self.model.tour_length(&tour.genes);
        });

        let costs: Vec<f64> = tours.iter().map(|tour| tour.distance).collect();
        let fitness = fitness_scores(&costs);
        for (tour, &score) in tours.iter_mut().zip(&fitness) {
            tour.fitness = score;
        }

        RouletteWheel::from_probabilities(&selection_probabilities(&fitness)?)
    }

    /// Produces one child: two roulette draws, crossover, then maybe mutation.
    pub fn breed(
        &self,
        parents: &[Tour],
        wheel: &RouletteWheel,
        epoch: usize,
        rng: &mut GaRng,
    ) -> GaResult<Tour> {
        let n = self.model.num_cities();
        let parent_1 = select_parent(parents, wheel, rng);
        let parent_2 = select_parent(parents, wheel, rng);

        let genes = crossover(self.config.crossover, &parent_1.genes, &parent_2.genes, rng);
        check_offspring(&genes, n, epoch, Operator::Crossover(self.config.crossover))?;

        let mut child = Tour::new(genes);
        if rng.gen_bool(self.config.mutation_rate) {
            self.mutate(&mut child, rng);
            check_offspring(&child.genes, n, epoch, Operator::Mutation)?;
        }

        Ok(child)
    }

    pub fn mutate(&self, chromosome: &mut Tour, rng: &mut GaRng) {
        for _ in 0..self.config.mutation_swaps {
            swap_mutation(&mut chromosome.genes, rng);
        }
        chromosome.invalidate();
    }

    /// Breeds `count` children in parallel. Each child gets its own RNG seeded
    /// from `rng`, so the result does not depend on the thread count.
    pub fn reproduce(
        &self,
        parents: &[Tour],
        wheel: &RouletteWheel,
        count: usize,
        epoch: usize,
        rng: &mut GaRng,
    ) -> GaResult<Vec<Tour>> {
        let seeds: Vec<u64> = (0..count).map(|_| rng.gen()).collect();

        seeds
            .into_par_iter()
            .map(|seed| {
                let mut child_rng = GaRng::seed_from_u64(seed);
                self.breed(parents, wheel, epoch, &mut child_rng)
            })
            .collect()
    }

    pub fn elitism(&self, population: &Population) -> Option<Tour> {
        if !self.config.elitism {
            return None;
        }
        population.best().cloned()
    }
}

#[derive(Debug)]
pub struct GeneticOptimizer {
    pub algorithm: TspAlgorithm,
    stop: Option<Arc<AtomicBool>>,
}

impl GeneticOptimizer {
    pub fn new(algorithm: TspAlgorithm) -> Self {
        Self {
            algorithm,
            stop: None,
        }
    }

    /// Registers a flag that ends the run at the next epoch boundary once set.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|stop| stop.load(Ordering::Relaxed))
    }

    fn next_generation(
        &self,
        population: &Population,
        wheel: &RouletteWheel,
        epoch: usize,
        rng: &mut GaRng,
    ) -> GaResult<(Vec<Tour>, Operator)> {
        let elite = self.algorithm.elitism(population);
        let count = population.len() - usize::from(elite.is_some());

        let mut next = Vec::with_capacity(population.len());
        let operator = match elite {
            Some(elite) => {
                next.push(elite);
                Operator::Elitism
            }
            None => Operator::Crossover(self.algorithm.config.crossover),
        };
        next.extend(
            self.algorithm
                .reproduce(population.tours(), wheel, count, epoch, rng)?,
        );

        Ok((next, operator))
    }
}

impl Optimizer<Tour> for GeneticOptimizer {
    #[instrument(skip_all, fields(
        seed = self.algorithm.config.random_seed,
        cities = self.algorithm.model.num_cities(),
        population = self.algorithm.config.population_size,
    ))]
    fn optimize(&mut self, eval: &mut dyn Evaluator<Tour>) -> GaResult<RunOutcome<Tour>> {
        let mut rng = GaRng::seed_from_u64(self.algorithm.config.random_seed);
        let mut population = self.algorithm.generate(&mut rng)?;
        let mut history = RunHistory::new();
        let mut best_ever: Option<Tour> = None;
        let mut epoch = 0;

        info!("starting evolution");

        let reason = loop {
            let wheel = self.algorithm.evaluate(population.tours_mut())?;

            let best = population
                .best()
                .cloned()
                .ok_or_else(|| GaError::InvalidConfiguration("population is empty".into()))?;
            let average = population.average_distance();
            history.record(epoch, best.distance, average)?;

            debug!(
                epoch,
                best_distance = best.distance(),
                best_fitness = best.fitness(),
                average_distance = average,
                "evaluated generation"
            );

            if best_ever
                .as_ref()
                .map_or(true, |current| best.distance < current.distance)
            {
                best_ever = Some(best.clone());
            }

            if let Some(reason) = eval.can_terminate(&best, epoch) {
                break reason;
            }
            if self.stop_requested() {
                break TerminationReason::Cancelled;
            }

            let (next, operator) = self
                .next_generation(&population, &wheel, epoch, &mut rng)
                .map_err(|err| {
                    error!(epoch, %err, "aborting run");
                    err
                })?;
            population.replace(next, epoch, operator)?;

            epoch += 1;
        };

        let best = best_ever
            .ok_or_else(|| GaError::InvalidConfiguration("no epoch was evaluated".into()))?;

        info!(
            epochs = history.len(),
            best_distance = best.distance,
            %reason,
            "evolution finished"
        );

        Ok(RunOutcome {
            best,
            epochs: history.len(),
            reason,
            history,
        })
    }
}

/// Runs the GA on `cities` with the termination rule described by `config`.
pub fn solve(cities: &[City], config: &GaConfig) -> GaResult<RunOutcome<Tour>> {
    let algorithm = TspAlgorithm::new(config.clone(), cities.to_vec())?;
    let mut evaluator = Termination::from_config(config);
    GeneticOptimizer::new(algorithm).optimize(&mut evaluator)
}
