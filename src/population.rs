//! Candidate tours and the generation that owns them.

use crate::error::{GaError, GaResult, Operator};
use crate::genetic_algorithm::Chromosome;
use rand::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
    pub genes: Vec<usize>,
    pub distance: f64,
    pub fitness: f64,
}

impl Tour {
    /// A tour whose cost has not been evaluated yet.
    pub fn new(genes: Vec<usize>) -> Self {
        Self {
            genes,
            distance: f64::NAN,
            fitness: 0.0,
        }
    }

    /// Drops cached cost after the genes changed.
    pub fn invalidate(&mut self) {
        self.distance = f64::NAN;
        self.fitness = 0.0;
    }
}

impl Chromosome for Tour {
    fn genes(&self) -> &[usize] {
        &self.genes
    }

    fn distance(&self) -> f64 {
        self.distance
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// Explains why `genes` is not a permutation of `0..n`, or `None` if it is.
pub fn permutation_defect(genes: &[usize], n: usize) -> Option<String> {
    if genes.len() != n {
        return Some(format!("expected {} genes, found {}", n, genes.len()));
    }

    let mut seen = vec![false; n];
    for &gene in genes {
        if gene >= n {
            return Some(format!("gene {} is outside 0..{}", gene, n));
        }
        if seen[gene] {
            return Some(format!("gene {} appears more than once", gene));
        }
        seen[gene] = true;
    }

    None
}

pub fn is_permutation(genes: &[usize], n: usize) -> bool {
    permutation_defect(genes, n).is_none()
}

/// One generation of tours. Its size never changes over a run.
#[derive(Clone, Debug)]
pub struct Population {
    tours: Vec<Tour>,
    num_cities: usize,
}

impl Population {
    /// Creates `size` independent, uniformly shuffled permutations of `0..num_cities`.
    pub fn initialize<R: Rng + ?Sized>(
        size: usize,
        num_cities: usize,
        rng: &mut R,
    ) -> GaResult<Self> {
        if size < 2 {
            return Err(GaError::InvalidConfiguration(format!(
                "population_size must be at least 2, got {}",
                size
            )));
        }
        if num_cities < 2 {
            return Err(GaError::InvalidInput(format!(
                "at least 2 cities are required, got {}",
                num_cities
            )));
        }

        let tours = (0..size)
            .map(|_| {
                let mut genes: Vec<usize> = (0..num_cities).collect();
                genes.shuffle(rng);
                Tour::new(genes)
            })
            .collect();

        Ok(Self { tours, num_cities })
    }

    /// Swaps in the next generation. Nothing changes unless every tour is valid.
    pub fn replace(&mut self, next: Vec<Tour>, epoch: usize, operator: Operator) -> GaResult<()> {
        if next.len() != self.tours.len() {
            return Err(GaError::InvariantViolation {
                epoch,
                operator,
                detail: format!(
                    "next generation has {} tours, expected {}",
                    next.len(),
                    self.tours.len()
                ),
            });
        }

        if let Some(detail) = next
            .iter()
            .find_map(|tour| permutation_defect(&tour.genes, self.num_cities))
        {
            return Err(GaError::InvariantViolation {
                epoch,
                operator,
                detail,
            });
        }

        self.tours = next;
        Ok(())
    }

    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    pub fn tours_mut(&mut self) -> &mut [Tour] {
        &mut self.tours
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    pub fn num_cities(&self) -> usize {
        self.num_cities
    }

    /// Shortest evaluated tour of this generation.
    pub fn best(&self) -> Option<&Tour> {
        self.tours
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    pub fn average_distance(&self) -> f64 {
        if self.tours.is_empty() {
            return f64::NAN;
        }
        self.tours.iter().map(|tour| tour.distance).sum::<f64>() / self.tours.len() as f64
    }
}
