//! Population member.

use crate::models::Schedule;

/// A schedule together with its fitness.
///
/// Higher fitness = better schedule (maximization convention; the rule
/// set's `max_eval` is the best attainable value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    /// The team×week grid.
    pub schedule: Schedule,
    /// Fitness under the run's rule set.
    pub fitness: i64,
}

impl Individual {
    /// Wraps an evaluated schedule.
    pub fn new(schedule: Schedule, fitness: i64) -> Self {
        Self { schedule, fitness }
    }
}

/// Index of the fittest individual; ties go to the lowest index.
pub fn best_index(population: &[Individual]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, i64)>, (i, ind)| match best {
            Some((_, f)) if f >= ind.fitness => best,
            _ => Some((i, ind.fitness)),
        })
        .map(|(i, _)| i)
}

/// Arithmetic mean of the population's fitness.
pub fn mean_fitness(population: &[Individual]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.iter().map(|i| i.fitness as f64).sum::<f64>() / population.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, SlotKind};

    fn ind(fitness: i64) -> Individual {
        Individual::new(Schedule::filled(2, 2, Cell::new(1, SlotKind::None)), fitness)
    }

    #[test]
    fn test_best_index_prefers_first_on_ties() {
        let pop = vec![ind(3), ind(9), ind(9), ind(1)];
        assert_eq!(best_index(&pop), Some(1));
        assert_eq!(best_index(&[]), None);
    }

    #[test]
    fn test_mean_fitness() {
        let pop = vec![ind(2), ind(4), ind(9)];
        assert!((mean_fitness(&pop) - 5.0).abs() < 1e-9);
        assert_eq!(mean_fitness(&[]), 0.0);
    }
}
