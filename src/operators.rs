//! Permutation-preserving crossover and mutation.
//!
//! Both parents are permutations, so splicing positional segments from each
//! would duplicate some cities and drop others. The crossovers here keep the
//! prefix `[0, cut)` of the first parent and take the remaining cities from the
//! second parent in a way that always yields a permutation.

use crate::error::{GaError, GaResult, Operator};
use crate::population::permutation_defect;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverKind {
    /// Order crossover (OX).
    #[default]
    Order,
    /// Partially mapped crossover (PMX).
    PartiallyMapped,
}

impl fmt::Display for CrossoverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossoverKind::Order => write!(f, "order"),
            CrossoverKind::PartiallyMapped => write!(f, "partially mapped"),
        }
    }
}

/// Single-cut order crossover.
///
/// Copies `parent_1[..cut]` verbatim, then walks `parent_2` starting at `cut`
/// (wrapping around) and appends every city not placed yet. Where the tail of
/// `parent_2` does not clash with the prefix, the child equals the plain splice.
pub fn order_crossover(parent_1: &[usize], parent_2: &[usize], cut: usize) -> Vec<usize> {
    let n = parent_1.len();
    debug_assert_eq!(n, parent_2.len());
    debug_assert!(cut <= n);

    let mut placed = vec![false; n];
    let mut child = Vec::with_capacity(n);

    for &gene in &parent_1[..cut] {
        placed[gene] = true;
        child.push(gene);
    }

    for offset in 0..n {
        let gene = parent_2[(cut + offset) % n];
        if !placed[gene] {
            placed[gene] = true;
            child.push(gene);
        }
    }

    child
}

/// Single-cut partially mapped crossover.
///
/// Starts from a copy of `parent_2` and, for each position before `cut`,
/// swaps `parent_1`'s city into place. Cities after the cut keep their
/// `parent_2` position unless a swap displaced them.
pub fn partially_mapped_crossover(parent_1: &[usize], parent_2: &[usize], cut: usize) -> Vec<usize> {
    let n = parent_1.len();
    debug_assert_eq!(n, parent_2.len());
    debug_assert!(cut <= n);

    let mut child = parent_2.to_vec();
    let mut position = vec![0; n];
    for (i, &gene) in child.iter().enumerate() {
        position[gene] = i;
    }

    for i in 0..cut {
        let j = position[parent_1[i]];
        if i != j {
            child.swap(i, j);
            position[child[i]] = i;
            position[child[j]] = j;
        }
    }

    child
}

/// Draws a cut point in `[1, n - 1]` and recombines two parents.
pub fn crossover<R: Rng + ?Sized>(
    kind: CrossoverKind,
    parent_1: &[usize],
    parent_2: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    let n = parent_1.len();
    if n < 2 {
        return parent_1.to_vec();
    }

    let cut = rng.gen_range(1..n);
    match kind {
        CrossoverKind::Order => order_crossover(parent_1, parent_2, cut),
        CrossoverKind::PartiallyMapped => partially_mapped_crossover(parent_1, parent_2, cut),
    }
}

/// Exchanges the cities at two distinct, uniformly chosen positions.
pub fn swap_mutation<R: Rng + ?Sized>(genes: &mut [usize], rng: &mut R) {
    let n = genes.len();
    if n < 2 {
        return;
    }

    let i = rng.gen_range(0..n);
    let mut j = rng.gen_range(0..n - 1);
    if j >= i {
        j += 1;
    }

    genes.swap(i, j);
}

/// Fails with an invariant violation naming `operator` if `genes` is not a
/// permutation of `0..num_cities`.
pub fn check_offspring(
    genes: &[usize],
    num_cities: usize,
    epoch: usize,
    operator: Operator,
) -> GaResult<()> {
    match permutation_defect(genes, num_cities) {
        None => Ok(()),
        Some(detail) => Err(GaError::InvariantViolation {
            epoch,
            operator,
            detail,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_order_crossover_repairs_duplicates() {
        let child = order_crossover(&[0, 1, 2, 3, 4], &[4, 3, 2, 1, 0], 2);
        assert_eq!(child, vec![0, 1, 2, 4, 3]);
    }

    #[test]
    fn test_order_crossover_matches_splice_without_clash() {
        let child = order_crossover(&[0, 1, 2, 3, 4], &[1, 0, 4, 2, 3], 2);
        assert_eq!(child, vec![0, 1, 4, 2, 3]);
    }

    #[test]
    fn test_partially_mapped_crossover() {
        let child = partially_mapped_crossover(&[0, 1, 2, 3, 4], &[4, 3, 2, 1, 0], 2);
        assert_eq!(child, vec![0, 1, 2, 3, 4]);

        let child = partially_mapped_crossover(&[2, 4, 0, 1, 3], &[0, 1, 2, 3, 4], 2);
        assert_eq!(child, vec![2, 4, 0, 3, 1]);
    }

    #[test]
    fn test_identical_parents_give_same_child() {
        let parent = vec![3, 1, 4, 0, 2];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for kind in [CrossoverKind::Order, CrossoverKind::PartiallyMapped] {
            assert_eq!(crossover(kind, &parent, &parent, &mut rng), parent);
        }
    }

    #[test]
    fn test_swap_mutation_touches_two_positions() {
        let original: Vec<usize> = (0..10).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        for _ in 0..200 {
            let mut genes = original.clone();
            swap_mutation(&mut genes, &mut rng);
            let changed = genes.iter().zip(&original).filter(|(a, b)| a != b).count();
            assert_eq!(changed, 2);
        }
    }

    #[test]
    fn test_swap_mutation_on_two_cities() {
        let mut genes = vec![0, 1];
        swap_mutation(&mut genes, &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(genes, vec![1, 0]);
    }

    #[test]
    fn test_check_offspring_reports_operator() {
        assert!(check_offspring(&[1, 0, 2], 3, 0, Operator::Mutation).is_ok());

        let err = check_offspring(
            &[0, 1, 1],
            3,
            12,
            Operator::Crossover(CrossoverKind::PartiallyMapped),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GaError::InvariantViolation {
                epoch: 12,
                operator: Operator::Crossover(CrossoverKind::PartiallyMapped),
                ..
            }
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::population::is_permutation;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn parents_and_cut() -> impl Strategy<Value = (Vec<usize>, Vec<usize>, usize)> {
        (2usize..60).prop_flat_map(|n| {
            let base: Vec<usize> = (0..n).collect();
            (
                Just(base.clone()).prop_shuffle(),
                Just(base).prop_shuffle(),
                1..n,
            )
        })
    }

    proptest! {
        #[test]
        fn prop_order_crossover_is_permutation((p1, p2, cut) in parents_and_cut()) {
            let child = order_crossover(&p1, &p2, cut);
            prop_assert!(is_permutation(&child, p1.len()));
            prop_assert_eq!(&child[..cut], &p1[..cut]);
        }

        #[test]
        fn prop_partially_mapped_crossover_is_permutation((p1, p2, cut) in parents_and_cut()) {
            let child = partially_mapped_crossover(&p1, &p2, cut);
            prop_assert!(is_permutation(&child, p1.len()));
            prop_assert_eq!(&child[..cut], &p1[..cut]);
        }

        #[test]
        fn prop_random_crossover_is_permutation((p1, p2, _cut) in parents_and_cut(), seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for kind in [CrossoverKind::Order, CrossoverKind::PartiallyMapped] {
                let child = crossover(kind, &p1, &p2, &mut rng);
                prop_assert!(is_permutation(&child, p1.len()));
            }
        }

        #[test]
        fn prop_swap_mutation_is_permutation((p1, _p2, _cut) in parents_and_cut(), seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut genes = p1.clone();
            swap_mutation(&mut genes, &mut rng);
            prop_assert!(is_permutation(&genes, p1.len()));
            prop_assert_ne!(genes, p1);
        }
    }
}
