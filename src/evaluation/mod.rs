//! Rule-based fitness evaluation.
//!
//! A [`RuleSet`] combines [`Rule`]s into a single scalar in maximization
//! form: `fitness = max_eval - Σ penalty`, so a perfect schedule scores
//! exactly `max_eval`.
//!
//! # Weighting
//! Hard rules contribute `raw × hard_weight`. The weight starts at
//! [`HARD_PENALTY`] and is raised above the combined soft maximum when
//! needed, so one hard violation always outweighs every soft penalty.
//!
//! # Usage
//!
//! ```
//! use gridiron_schedule::evaluation::{Rule, RuleSet};
//! use gridiron_schedule::models::{Fixture, Schedule, SeasonBuilder, Stadium, Team, TimeZoneBand};
//!
//! let season = SeasonBuilder::new()
//!     .with_num_weeks(2)
//!     .with_team(Team::new(0, "AAA"))
//!     .with_team(Team::new(1, "BBB"))
//!     .with_stadium(Stadium::new(0, TimeZoneBand::Est))
//!     .with_fixture(Fixture::new(0, 0, 1, 0, 1))
//!     .with_weeks_without_fixed_slots([0, 1])
//!     .build()
//!     .unwrap();
//! let rules = RuleSet::new(&season, vec![Rule::WellFormed]).unwrap();
//! let grid = Schedule::from_fixture_rows(&[vec![0, 1], vec![0, 1]], 2, season.bye());
//! assert_eq!(rules.fitness(&season, &grid), rules.max_eval());
//! ```

mod rules;

pub use rules::{
    Rule, BYE_WINDOW_END, BYE_WINDOW_START, DEFAULT_THANKSGIVING_HOSTS, EARLY_WEEKS,
    MAX_BYES_PER_WEEK, MAX_PRIMETIME_APPEARANCES, MAX_THURSDAY_BANDS,
};

use serde::Serialize;
use std::fmt;

use crate::error::ConfigError;
use crate::models::{Schedule, SeasonInstance};

/// Base multiplier for hard-rule penalties.
///
/// [`RuleSet::new`] raises the weight to `soft_max + 1` whenever the soft
/// maxima reach this value. `Rule::PrimetimeRating` alone is bounded by
/// the best rating times the template slot count, so every standard season
/// ends up with the raised weight; see [`RuleSet::hard_weight`].
pub const HARD_PENALTY: i64 = 100;

#[derive(Debug, Clone)]
struct WeightedRule {
    rule: Rule,
    max_raw: i64,
}

/// An ordered set of rules scoring schedules of one season.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<WeightedRule>,
    hard_weight: i64,
    max_eval: i64,
}

impl RuleSet {
    /// Builds a rule set for `season`.
    ///
    /// Fails with [`ConfigError::EmptyRuleSet`] if `rules` is empty.
    pub fn new(season: &SeasonInstance, rules: Vec<Rule>) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet);
        }

        let rules: Vec<WeightedRule> = rules
            .into_iter()
            .map(|rule| WeightedRule {
                max_raw: rule.max_raw_penalty(season).max(0),
                rule,
            })
            .collect();

        let soft_max: i64 = rules
            .iter()
            .filter(|r| !r.rule.is_hard())
            .map(|r| r.max_raw)
            .sum();
        let hard_weight = if soft_max >= HARD_PENALTY {
            tracing::warn!(
                soft_max,
                base = HARD_PENALTY,
                "soft rules can outweigh a hard violation; raising hard weight to {}",
                soft_max + 1
            );
            soft_max + 1
        } else {
            HARD_PENALTY
        };

        let max_eval = rules
            .iter()
            .map(|r| Self::weight_of(&r.rule, hard_weight) * r.max_raw)
            .sum();

        tracing::debug!(rules = rules.len(), hard_weight, max_eval, "rule set ready");

        Ok(Self {
            rules,
            hard_weight,
            max_eval,
        })
    }

    /// The 13 built-in rules.
    pub fn standard(season: &SeasonInstance) -> Self {
        // Rule::standard is never empty
        match Self::new(season, Rule::standard(season)) {
            Ok(set) => set,
            Err(_) => unreachable!("standard rule list is non-empty"),
        }
    }

    #[inline]
    fn weight_of(rule: &Rule, hard_weight: i64) -> i64 {
        if rule.is_hard() {
            hard_weight
        } else {
            1
        }
    }

    /// Best attainable fitness.
    #[inline]
    pub fn max_eval(&self) -> i64 {
        self.max_eval
    }

    /// Multiplier applied to hard-rule penalties.
    #[inline]
    pub fn hard_weight(&self) -> i64 {
        self.hard_weight
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(|r| &r.rule)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false: empty sets are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn weighted(&self, r: &WeightedRule, season: &SeasonInstance, schedule: &Schedule) -> (i64, i64) {
        let raw = r.rule.raw_penalty(season, schedule).clamp(0, r.max_raw);
        (raw, raw * Self::weight_of(&r.rule, self.hard_weight))
    }

    /// Weighted penalty sum.
    pub fn penalty(&self, season: &SeasonInstance, schedule: &Schedule) -> i64 {
        self.rules
            .iter()
            .map(|r| self.weighted(r, season, schedule).1)
            .sum()
    }

    /// Fitness in maximization form, within `0..=max_eval`.
    pub fn fitness(&self, season: &SeasonInstance, schedule: &Schedule) -> i64 {
        self.max_eval - self.penalty(season, schedule)
    }

    /// Whether every hard rule is satisfied.
    pub fn is_feasible(&self, season: &SeasonInstance, schedule: &Schedule) -> bool {
        self.rules
            .iter()
            .filter(|r| r.rule.is_hard())
            .all(|r| self.weighted(r, season, schedule).0 == 0)
    }

    /// Per-rule breakdown for diagnostics.
    pub fn analyze(&self, season: &SeasonInstance, schedule: &Schedule) -> Analysis {
        let rules: Vec<RuleReport> = self
            .rules
            .iter()
            .map(|r| {
                let (raw, penalty) = self.weighted(r, season, schedule);
                RuleReport {
                    name: r.rule.name(),
                    hard: r.rule.is_hard(),
                    max_eval: r.max_raw * Self::weight_of(&r.rule, self.hard_weight),
                    raw_penalty: raw,
                    penalty,
                }
            })
            .collect();
        let total: i64 = rules.iter().map(|r| r.penalty).sum();
        Analysis {
            rules,
            max_eval: self.max_eval,
            fitness: self.max_eval - total,
        }
    }
}

/// One rule's line in an [`Analysis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    /// Rule name.
    pub name: &'static str,
    /// Hard or soft.
    pub hard: bool,
    /// Maximum weighted penalty.
    pub max_eval: i64,
    /// Penalty before weighting.
    pub raw_penalty: i64,
    /// Weighted penalty.
    pub penalty: i64,
}

/// Per-rule fitness breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Rule lines in evaluation order.
    pub rules: Vec<RuleReport>,
    /// Best attainable fitness.
    pub max_eval: i64,
    /// Fitness of the analyzed schedule.
    pub fitness: i64,
}

impl Analysis {
    /// Rules with a non-zero penalty.
    pub fn violated(&self) -> impl Iterator<Item = &RuleReport> {
        self.rules.iter().filter(|r| r.penalty > 0)
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.rules {
            writeln!(
                f,
                "{:<20} {:<4} max={:<8} penalty={}",
                r.name,
                if r.hard { "hard" } else { "soft" },
                r.max_eval,
                r.penalty
            )?;
        }
        write!(f, "max_eval={} fitness={}", self.max_eval, self.fitness)
    }
}
