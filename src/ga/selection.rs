//! Fitness-proportional parent selection.
//!
//! # Algorithm
//! The wheel stores the cumulative distribution of `fitness / total`. A
//! draw `u ∈ [0, 1)` picks the first index whose cumulative value exceeds
//! `u`; an individual with zero fitness adds an empty interval and can
//! never be picked. When every fitness is zero the wheel spins uniformly.
//!
//! Distinct draws retry duplicates a bounded number of times, then draw
//! the rest proportionally among the positive slots not yet picked. A
//! zero-fitness slot is only returned once every positive slot is taken.
//!
//! Negative fitness values are treated as zero.

use rand::seq::SliceRandom;
use rand::Rng;

/// Duplicate draws tolerated by [`RouletteWheel::select_distinct`] before
/// the remaining picks are drawn without replacement.
pub const MAX_SELECTION_RETRIES: usize = 32;

/// Roulette wheel over a population's fitness values.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    len: usize,
    /// Empty when the total fitness is zero.
    cumulative: Vec<f64>,
    last_positive: usize,
}

impl RouletteWheel {
    /// Builds the wheel from fitness values in population order.
    pub fn new(fitness: &[i64]) -> Self {
        let total: f64 = fitness.iter().map(|&f| f.max(0) as f64).sum();
        let mut wheel = Self {
            len: fitness.len(),
            cumulative: Vec::new(),
            last_positive: 0,
        };
        if total <= 0.0 {
            return wheel;
        }

        let mut acc = 0.0;
        wheel.cumulative = fitness
            .iter()
            .map(|&f| {
                acc += f.max(0) as f64 / total;
                acc
            })
            .collect();
        wheel.last_positive = fitness.iter().rposition(|&f| f > 0).unwrap_or(0);
        wheel
    }

    /// Number of slots on the wheel.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the wheel has no slots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every fitness was zero, so draws are uniform.
    pub fn is_uniform(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Draws one index, or `None` on an empty wheel.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        if self.is_uniform() {
            return Some(rng.random_range(0..self.len));
        }
        let u: f64 = rng.random();
        let i = self.cumulative.partition_point(|&c| c <= u);
        // rounding can leave the last cumulative value just below 1.0
        Some(i.min(self.last_positive))
    }

    /// Draws `k` distinct indices (fewer if the wheel is smaller).
    ///
    /// Duplicates are redrawn up to [`MAX_SELECTION_RETRIES`] times; after
    /// that the missing indices are drawn proportionally from the unpicked
    /// positive slots, and uniformly from the zero slots only when no
    /// positive slot is left.
    pub fn select_distinct<R: Rng>(&self, k: usize, rng: &mut R) -> Vec<usize> {
        let k = k.min(self.len);
        let mut picked = Vec::with_capacity(k);
        let mut retries = 0;

        while picked.len() < k && retries < MAX_SELECTION_RETRIES {
            let Some(i) = self.spin(rng) else {
                break;
            };
            if picked.contains(&i) {
                retries += 1;
            } else {
                picked.push(i);
            }
        }

        if picked.len() < k {
            self.draw_without_replacement(&mut picked, k, rng);
        }
        picked
    }

    /// Share of the wheel held by slot `i`; zero on a uniform wheel.
    fn weight(&self, i: usize) -> f64 {
        match (i, self.cumulative.get(i)) {
            (_, None) => 0.0,
            (0, Some(&c)) => c,
            (_, Some(&c)) => c - self.cumulative[i - 1],
        }
    }

    fn draw_without_replacement<R: Rng>(&self, picked: &mut Vec<usize>, k: usize, rng: &mut R) {
        let mut candidates: Vec<(usize, f64)> = (0..self.len)
            .filter(|i| !picked.contains(i))
            .map(|i| (i, self.weight(i)))
            .filter(|&(_, w)| w > 0.0)
            .collect();

        while picked.len() < k && !candidates.is_empty() {
            let total: f64 = candidates.iter().map(|&(_, w)| w).sum();
            let mut u = rng.random::<f64>() * total;
            let mut chosen = candidates.len() - 1;
            for (pos, &(_, w)) in candidates.iter().enumerate() {
                if u < w {
                    chosen = pos;
                    break;
                }
                u -= w;
            }
            picked.push(candidates.swap_remove(chosen).0);
        }

        if picked.len() < k {
            let missing = k - picked.len();
            let mut rest: Vec<usize> = (0..self.len).filter(|i| !picked.contains(i)).collect();
            rest.shuffle(rng);
            picked.extend(rest.into_iter().take(missing));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_fitness_never_spun() {
        let wheel = RouletteWheel::new(&[0, 5, 0, 3, 0]);
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..2000 {
            let i = wheel.spin(&mut rng).unwrap();
            assert!(i == 1 || i == 3, "picked zero-fitness index {i}");
        }
    }

    #[test]
    fn test_proportional() {
        let wheel = RouletteWheel::new(&[1, 99]);
        let mut rng = SmallRng::seed_from_u64(1);
        let hits = (0..1000).filter(|_| wheel.spin(&mut rng) == Some(1)).count();
        assert!(hits > 950, "hits = {hits}");
    }

    #[test]
    fn test_uniform_when_all_zero() {
        let wheel = RouletteWheel::new(&[0, 0, 0, 0]);
        assert!(wheel.is_uniform());
        let mut rng = SmallRng::seed_from_u64(9);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[wheel.spin(&mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_select_distinct_skips_zero_fitness() {
        let wheel = RouletteWheel::new(&[0, 1000, 1]);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            let mut picked = wheel.select_distinct(2, &mut rng);
            picked.sort_unstable();
            assert_eq!(picked, vec![1, 2]);
        }

        let wheel = RouletteWheel::new(&[0, 5, 0, 3, 0]);
        for _ in 0..200 {
            let mut picked = wheel.select_distinct(2, &mut rng);
            picked.sort_unstable();
            assert_eq!(picked, vec![1, 3]);
        }
    }

    #[test]
    fn test_select_distinct_with_single_positive() {
        // only one positive slot: the second pick has to be a zero slot
        let wheel = RouletteWheel::new(&[0, 0, 7, 0]);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            let picked = wheel.select_distinct(2, &mut rng);
            assert_eq!(picked.len(), 2);
            assert_eq!(picked[0], 2);
            assert_ne!(picked[1], 2);
        }
    }

    #[test]
    fn test_select_distinct_bounds() {
        let wheel = RouletteWheel::new(&[4, 4]);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut picked = wheel.select_distinct(5, &mut rng);
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1]);
        assert!(RouletteWheel::new(&[]).spin(&mut rng).is_none());
    }
}
