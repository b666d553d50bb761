//! Generational GA driver.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──run()──▶ Populating ──▶ Evolving ──▶ Terminated
//! ```
//!
//! One generation: the best individual is copied unchanged, then pairs of
//! distinct parents are drawn from a [`RouletteWheel`], crossed over with
//! probability `crossover_rate`, each child mutated with probability
//! `mutation_rate`, repaired and evaluated, until the population is full.
//!
//! The run stops at the first of: best fitness equals the rule set's
//! maximum, the generation budget is spent, or the time limit has passed.
//! The deadline is checked once per generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::chromosome::{best_index, mean_fitness, Individual};
use super::problem::SeasonProblem;
use super::selection::RouletteWheel;
use crate::error::ConfigError;
use crate::evaluation::RuleSet;
use crate::models::{Schedule, SeasonInstance};
use crate::result::RunResult;

/// Default number of individuals.
pub const DEFAULT_POPULATION_SIZE: usize = 50;

/// Default wall-clock budget.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(60);

/// Optimizer settings.
///
/// # Example
/// ```
/// use gridiron_schedule::ga::GaConfig;
/// use std::time::Duration;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_time_limit(Duration::from_secs(5))
///     .with_max_generations(Some(100));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation (at least 2).
    pub population_size: usize,
    /// Wall-clock budget of a run.
    pub time_limit: Duration,
    /// Generation budget; `None` runs until the deadline or optimality.
    pub max_generations: Option<usize>,
    /// Probability that a parent pair is crossed over.
    pub crossover_rate: f64,
    /// Probability that a child is mutated.
    pub mutation_rate: f64,
    /// Record statistics every this many generations.
    pub sample_every: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            time_limit: DEFAULT_TIME_LIMIT,
            max_generations: None,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            sample_every: 1,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, generations: Option<usize>) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the statistics sampling interval.
    pub fn with_sample_every(mut self, generations: usize) -> Self {
        self.sample_every = generations;
        self
    }

    /// Checks the preconditions of a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        if self.sample_every == 0 {
            return Err(ConfigError::ZeroSampleInterval);
        }
        Ok(())
    }
}

/// Lifecycle state of a [`GeneticOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerState {
    /// No run started yet.
    Uninitialized,
    /// Building the initial population.
    Populating,
    /// Running generations.
    Evolving,
    /// The last run finished.
    Terminated,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Optimal,
    GenerationBudget,
    Deadline,
}

/// Genetic optimizer for one season and rule set.
///
/// # Example
/// ```
/// use gridiron_schedule::evaluation::{Rule, RuleSet};
/// use gridiron_schedule::ga::{GaConfig, GeneticOptimizer, OptimizerState};
/// use gridiron_schedule::models::{Fixture, SeasonBuilder, Stadium, Team, TimeZoneBand};
///
/// let season = SeasonBuilder::new()
///     .with_num_weeks(2)
///     .with_team(Team::new(0, "AAA"))
///     .with_team(Team::new(1, "BBB"))
///     .with_stadium(Stadium::new(0, TimeZoneBand::Est))
///     .with_fixture(Fixture::new(0, 0, 1, 0, 1))
///     .with_weeks_without_fixed_slots([0, 1])
///     .build()
///     .unwrap();
/// let rules = RuleSet::new(&season, vec![Rule::WellFormed]).unwrap();
/// let config = GaConfig::default().with_population_size(4);
///
/// let mut optimizer = GeneticOptimizer::new(&season, &rules, config);
/// let result = optimizer.run(42).unwrap();
/// assert!(result.is_optimal);
/// assert_eq!(optimizer.state(), OptimizerState::Terminated);
/// ```
#[derive(Debug)]
pub struct GeneticOptimizer<'a> {
    problem: SeasonProblem<'a>,
    config: GaConfig,
    state: OptimizerState,
    population: Vec<Individual>,
}

impl<'a> GeneticOptimizer<'a> {
    /// Creates an optimizer; nothing runs until [`run`](Self::run).
    pub fn new(season: &'a SeasonInstance, rules: &'a RuleSet, config: GaConfig) -> Self {
        Self {
            problem: SeasonProblem::new(season, rules),
            config,
            state: OptimizerState::Uninitialized,
            population: Vec::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> OptimizerState {
        self.state
    }

    /// Settings.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Population of the last generation.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Fittest individual of the last generation.
    pub fn best(&self) -> Option<&Individual> {
        best_index(&self.population).map(|i| &self.population[i])
    }

    fn transition(&mut self, next: OptimizerState) {
        tracing::debug!(from = ?self.state, to = ?next, "optimizer state change");
        self.state = next;
    }

    /// Runs the GA from a fresh population seeded by `seed`.
    ///
    /// Fails only if the configuration is invalid; in that case the state
    /// is left untouched.
    pub fn run(&mut self, seed: u64) -> Result<RunResult, ConfigError> {
        self.config.validate()?;

        let start = Instant::now();
        let deadline = start.checked_add(self.config.time_limit);
        let mut rng = StdRng::seed_from_u64(seed);
        let max_eval = self.problem.rules().max_eval();

        self.transition(OptimizerState::Populating);
        self.population = (0..self.config.population_size)
            .map(|_| self.problem.create_individual(&mut rng))
            .collect();

        let mut best_history = Vec::new();
        let mut mean_history = Vec::new();
        self.sample(0, &mut best_history, &mut mean_history);

        self.transition(OptimizerState::Evolving);
        let mut generation = 0;
        let reason = loop {
            if self.best_fitness() >= max_eval {
                break StopReason::Optimal;
            }
            if self.config.max_generations.is_some_and(|max| generation >= max) {
                break StopReason::GenerationBudget;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break StopReason::Deadline;
            }

            self.population = self.next_generation(&mut rng);
            generation += 1;
            if generation % self.config.sample_every == 0 {
                self.sample(generation, &mut best_history, &mut mean_history);
            }
        };
        self.transition(OptimizerState::Terminated);

        let best_schedule = self
            .best()
            .map(|ind| ind.schedule.to_flat())
            .unwrap_or_default();
        let result = RunResult {
            seed,
            elapsed_seconds: start.elapsed().as_secs_f64(),
            is_optimal: self.best_fitness() >= max_eval,
            generation_count: generation,
            best_schedule,
            best_fitness: self.best_fitness(),
            best_fitness_per_generation: best_history,
            mean_fitness_per_generation: mean_history,
        };

        tracing::info!(
            seed,
            generations = generation,
            best = result.best_fitness,
            max_eval,
            reason = ?reason,
            elapsed = result.elapsed_seconds,
            "run finished"
        );
        Ok(result)
    }

    fn best_fitness(&self) -> i64 {
        self.best().map_or(0, |ind| ind.fitness)
    }

    fn sample(&self, generation: usize, best: &mut Vec<i64>, mean: &mut Vec<f64>) {
        let b = self.best_fitness();
        let m = mean_fitness(&self.population);
        tracing::info!(generation, best = b, mean = m, "generation");
        best.push(b);
        mean.push(m);
    }

    fn next_generation(&self, rng: &mut StdRng) -> Vec<Individual> {
        let size = self.config.population_size;
        let mut next = Vec::with_capacity(size);

        if let Some(elite) = self.best() {
            next.push(elite.clone());
        }

        let fitness: Vec<i64> = self.population.iter().map(|i| i.fitness).collect();
        let wheel = RouletteWheel::new(&fitness);

        while next.len() < size {
            let parents = wheel.select_distinct(2, rng);
            let &[a, b] = parents.as_slice() else {
                break;
            };
            let (p1, p2) = (&self.population[a], &self.population[b]);

            let children: [Schedule; 2] = if rng.random_bool(self.config.crossover_rate) {
                self.problem.crossover(p1, p2, rng)
            } else {
                [p1.schedule.clone(), p2.schedule.clone()]
            };

            for mut child in children {
                if next.len() >= size {
                    break;
                }
                if rng.random_bool(self.config.mutation_rate) {
                    self.problem.mutate(&mut child, rng);
                }
                let fitness = self.problem.evaluate(&child);
                next.push(Individual::new(child, fitness));
            }
        }
        next
    }
}
