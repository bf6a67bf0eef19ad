//! Euclidean distances between cities and closed-tour lengths.

use crate::error::{GaError, GaResult};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Euclidean distance between two cities.
pub fn distance(a: &City, b: &City) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Read-only city set with a precomputed distance matrix.
///
/// Cities are indexed `0..n` in the order they were supplied.
#[derive(Clone, Debug)]
pub struct DistanceModel {
    cities: Vec<City>,
    matrix: Vec<f64>,
}

impl DistanceModel {
    pub fn new(cities: Vec<City>) -> GaResult<Self> {
        if cities.len() < 2 {
            return Err(GaError::InvalidInput(format!(
                "at least 2 cities are required, got {}",
                cities.len()
            )));
        }

        if let Some((index, city)) = cities.iter().find_position(|city| !city.is_finite()) {
            return Err(GaError::InvalidInput(format!(
                "city {} has non-finite coordinates ({}, {})",
                index, city.x, city.y
            )));
        }

        let n = cities.len();
        let mut matrix = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = distance(&cities[i], &cities[j]);
                matrix[i * n + j] = d;
                matrix[j * n + i] = d;
            }
        }

        // A tour sums n edges, so n times the longest edge must stay finite.
        let longest = matrix.iter().copied().fold(0.0, f64::max);
        if matrix.iter().any(|d| !d.is_finite()) || !(longest * n as f64).is_finite() {
            return Err(GaError::InvalidInput(format!(
                "coordinates span too wide a range, tour lengths over {} cities overflow",
                n
            )));
        }

        Ok(Self { cities, matrix })
    }

    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }

    pub fn between(&self, a: usize, b: usize) -> f64 {
        self.matrix[a * self.cities.len() + b]
    }

    /// Length of the closed tour visiting `genes` in order and returning to the first city.
    pub fn tour_length(&self, genes: &[usize]) -> f64 {
        genes
            .iter()
            .copied()
            .circular_tuple_windows::<(usize, usize)>()
            .map(|(a, b)| self.between(a, b))
            .sum()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn cities_and_tour() -> impl Strategy<Value = (Vec<City>, Vec<usize>, usize)> {
        (2usize..30).prop_flat_map(|n| {
            (
                prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), n),
                Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
                0..n,
            )
        })
        .prop_map(|(coords, tour, k)| {
            let cities = coords.into_iter().map(|(x, y)| City::new(x, y)).collect();
            (cities, tour, k)
        })
    }

    proptest! {
        /// Closed tours are undirected cycles: rotation and reversal keep the length.
        #[test]
        fn prop_tour_length_rotation_and_reversal((cities, tour, k) in cities_and_tour()) {
            let model = DistanceModel::new(cities).unwrap();
            let length = model.tour_length(&tour);

            let mut rotated = tour.clone();
            rotated.rotate_left(k);
            let mut reversed = tour.clone();
            reversed.reverse();

            let tolerance = 1e-9 * length.max(1.0);
            prop_assert!((length - model.tour_length(&rotated)).abs() <= tolerance);
            prop_assert!((length - model.tour_length(&reversed)).abs() <= tolerance);
        }

        #[test]
        fn prop_tour_length_is_non_negative((cities, tour, _k) in cities_and_tour()) {
            let model = DistanceModel::new(cities).unwrap();
            let length = model.tour_length(&tour);
            prop_assert!(length.is_finite());
            prop_assert!(length >= 0.0);
        }
    }
}
