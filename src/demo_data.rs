use crate::distance::City;
use crate::error::{GaError, GaResult};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, Uniform};

/// Side length of the square the demo cities are scattered over.
pub const MAP_SIZE: f64 = 1000.0;

pub fn random_cities(n: usize, seed: u64) -> Vec<City> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let range = Uniform::new(0.0, MAP_SIZE);

    (0..n)
        .map(|_| City::new(range.sample(&mut rng), range.sample(&mut rng)))
        .collect()
}

pub fn clustered_cities(n: usize, clusters: usize, spread: f64, seed: u64) -> GaResult<Vec<City>> {
    if clusters == 0 {
        return Err(GaError::InvalidInput("at least one cluster is required".into()));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, spread)
        .map_err(|err| GaError::InvalidInput(format!("invalid cluster spread {}: {}", spread, err)))?;

    // Keep cluster centres away from the border
    let centres: Vec<City> = (0..clusters)
        .map(|_| {
            City::new(
                rng.gen_range(0.1 * MAP_SIZE..0.9 * MAP_SIZE),
                rng.gen_range(0.1 * MAP_SIZE..0.9 * MAP_SIZE),
            )
        })
        .collect();

    Ok((0..n)
        .map(|i| {
            let centre = centres[i % clusters];
            City::new(
                (centre.x + noise.sample(&mut rng)).clamp(0.0, MAP_SIZE),
                (centre.y + noise.sample(&mut rng)).clamp(0.0, MAP_SIZE),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_cities_are_seeded_and_in_range() {
        let a = random_cities(50, 3);
        let b = random_cities(50, 3);

        assert_eq!(a, b);
        assert!(a
            .iter()
            .all(|c| (0.0..MAP_SIZE).contains(&c.x) && (0.0..MAP_SIZE).contains(&c.y)));
        assert_ne!(a, random_cities(50, 4));
    }

    #[test]
    fn test_clustered_cities() {
        let cities = clustered_cities(40, 4, 15.0, 1).unwrap();
        assert_eq!(cities.len(), 40);
        assert!(cities.iter().all(City::is_finite));
    }

    #[test]
    fn test_clustered_cities_rejects_bad_parameters() {
        assert!(clustered_cities(10, 0, 1.0, 1).is_err());
        assert!(clustered_cities(10, 2, -1.0, 1).is_err());
    }
}
