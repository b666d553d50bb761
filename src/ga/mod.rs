//! GA-based season optimization.
//!
//! Implements a generational genetic algorithm over the dense team×week
//! grid. Offspring are structurally repaired before evaluation, so the
//! search moves between (nearly) consistent schedules.
//!
//! # Encoding
//!
//! - **Fixture grid**: `team × week → fixture id` (or BYE). Each row is a
//!   permutation of the team's fixtures plus one BYE.
//! - **Slot grid**: `team × week → slot kind`. Each column holds the week's
//!   template slots, two teams per primetime game.
//!
//! # Submodules
//!
//! - [`operators`]: Row-cut crossover with OX1 slot reindexing, swap mutation
//! - [`selection`]: Roulette-wheel parent selection
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains" (OX1)

mod chromosome;
pub mod operators;
mod optimizer;
mod problem;
pub mod selection;

pub use chromosome::{best_index, mean_fitness, Individual};
pub use optimizer::{
    GaConfig, GeneticOptimizer, OptimizerState, DEFAULT_POPULATION_SIZE, DEFAULT_TIME_LIMIT,
};
pub use problem::SeasonProblem;
pub use selection::RouletteWheel;
