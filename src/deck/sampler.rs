//! Draw sampling without replacement.

use rand::Rng;
use thiserror::Error;

use super::Card;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("requested {requested} cards but the pool only has {available}")]
    NotEnoughCards { requested: usize, available: usize },
}

/// Draw `k` distinct cards from `pool`, uniformly over k-subsets.
///
/// Partial Fisher-Yates over an index scratchpad: only the first `k`
/// positions are shuffled, so a draw costs O(k) swaps regardless of pool
/// size, and every k-permutation is equally likely given a fair `rng`.
/// Each call draws independently; repeats across calls are expected.
pub fn sample<R: Rng>(pool: &[Card], k: usize, rng: &mut R) -> Result<Vec<Card>, SampleError> {
    if k > pool.len() {
        return Err(SampleError::NotEnoughCards {
            requested: k,
            available: pool.len(),
        });
    }

    let mut indices: Vec<usize> = (0..pool.len()).collect();
    for i in 0..k {
        let j = rng.random_range(i..indices.len());
        indices.swap(i, j);
    }

    Ok(indices[..k].iter().map(|&i| pool[i].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn pool(n: u32) -> Vec<Card> {
        (1..=n)
            .map(|id| Card {
                id,
                title: format!("card {id}"),
                text: format!("prompt {id}"),
                emoji: "🂠".to_string(),
                affirmation: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_draw_is_distinct_and_from_pool() {
        let pool = pool(16);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let draw = sample(&pool, 3, &mut rng).unwrap();
            assert_eq!(draw.len(), 3);

            let ids: HashSet<u32> = draw.iter().map(|c| c.id).collect();
            assert_eq!(ids.len(), 3, "draw contains a duplicate: {draw:?}");
            assert!(ids.iter().all(|id| (1..=16).contains(id)));
        }
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let pool = pool(16);

        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            assert_eq!(sample(&pool, 3, &mut a), sample(&pool, 3, &mut b));
        }
    }

    #[test]
    fn test_zero_and_full_draw() {
        let pool = pool(5);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(sample(&pool, 0, &mut rng).unwrap().is_empty());

        // k = n is a permutation of the whole pool
        let draw = sample(&pool, 5, &mut rng).unwrap();
        let ids: HashSet<u32> = draw.iter().map(|c| c.id).collect();
        assert_eq!(ids, (1u32..=5).collect::<HashSet<u32>>());
    }

    #[test]
    fn test_oversized_draw_fails() {
        let pool = pool(2);
        let mut rng = StdRng::seed_from_u64(1);

        let err = sample(&pool, 3, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SampleError::NotEnoughCards {
                requested: 3,
                available: 2
            }
        );

        let err = sample(&[], 1, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SampleError::NotEnoughCards {
                requested: 1,
                available: 0
            }
        );
    }

    #[test]
    fn test_every_card_is_reachable() {
        // 2000 draws of 3-of-16: expected ~375 appearances per card.
        // A comparator-based shuffle skews this badly; Fisher-Yates keeps
        // every card inside a generous band.
        let pool = pool(16);
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = [0u32; 16];

        for _ in 0..2000 {
            for card in sample(&pool, 3, &mut rng).unwrap() {
                counts[(card.id - 1) as usize] += 1;
            }
        }

        for (i, &count) in counts.iter().enumerate() {
            assert!(
                (250..=500).contains(&count),
                "card {} drawn {} times, expected roughly 375",
                i + 1,
                count
            );
        }
    }
}
