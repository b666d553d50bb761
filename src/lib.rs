//! Season scheduling with a repair-based genetic algorithm.
//!
//! Searches for league schedules: which fixture every team plays in every
//! week, and in which broadcast slot. The search is a generational GA over
//! a dense team×week grid; offspring are repaired back to structural
//! consistency and scored by a closed set of hard and soft rules.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `SeasonInstance`, `Team`, `Fixture`,
//!   `Stadium`, `SlotKind`, `Schedule`
//! - **`validation`**: Input integrity checks (id layout, references, fixture counts)
//! - **`loader`**: Line-oriented season file parser
//! - **`evaluation`**: `Rule` and `RuleSet`, maximization fitness
//! - **`repair`**: Row and column repair, random schedule construction
//! - **`ga`**: Crossover, mutation, roulette selection, `GeneticOptimizer`
//! - **`result`**: `RunResult` records and `ResultSink`s
//! - **`error`**: Error types
//!
//! # Example
//!
//! ```
//! use gridiron_schedule::evaluation::RuleSet;
//! use gridiron_schedule::ga::{GaConfig, GeneticOptimizer};
//! use gridiron_schedule::loader::parse_season_with;
//! use gridiron_schedule::models::SeasonBuilder;
//!
//! let text = "0 AAA AFC East 0 0\n1 BBB AFC East 0 0\n\n0 EST\n\n0 0 1 0 5\n\n0\n1 D\n";
//! let season = parse_season_with(
//!     text,
//!     SeasonBuilder::new().with_num_weeks(2).with_weeks_without_fixed_slots([0, 1]),
//! )
//! .unwrap();
//! let rules = RuleSet::standard(&season);
//! let config = GaConfig::default().with_population_size(4).with_max_generations(Some(5));
//!
//! let result = GeneticOptimizer::new(&season, &rules, config).run(7).unwrap();
//! assert_eq!(result.best_schedule.len(), 2 * 2 * 2);
//! ```
//!
//! # References
//!
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Kendall et al. (2010), "Scheduling in sports: An annotated bibliography"

pub mod error;
pub mod evaluation;
pub mod ga;
pub mod loader;
pub mod models;
pub mod repair;
pub mod result;
pub mod validation;
