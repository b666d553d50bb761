//! Error types.
//!
//! Only construction-time work can fail: loading a season, parsing a
//! solution, validating optimizer settings and writing results. Repair and
//! rule evaluation are total over any grid of the right shape.

use thiserror::Error;

use crate::validation::ValidationError;

/// Failure to build a [`SeasonInstance`](crate::models::SeasonInstance).
///
/// Loading is atomic: no partially built season is ever returned.
#[derive(Debug, Error)]
pub enum SeasonError {
    /// A line of the season file could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
    /// The file ended before a required block or line.
    #[error("unexpected end of season file: missing {0}")]
    UnexpectedEof(&'static str),
    /// The data parsed but is structurally inconsistent.
    #[error("invalid season data ({} problem(s)): {}", .0.len(), summarize(.0))]
    Invalid(Vec<ValidationError>),
    /// The season file could not be read.
    #[error("failed to read season file: {0}")]
    Io(#[from] std::io::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure to decode a schedule from its flat integer interchange form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleParseError {
    /// A token was not a non-negative integer.
    #[error("token {index} is not an integer: {token:?}")]
    NotAnInteger {
        /// Position of the token in the sequence.
        index: usize,
        /// The offending token.
        token: String,
    },
    /// The number of values does not match `num_teams * num_weeks * 2`.
    #[error("expected {expected} values, found {found}")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// A fixture id outside `0..=BYE`.
    #[error("fixture id {fixture} out of range at team {team}, week {week}")]
    FixtureOutOfRange {
        /// Team row.
        team: usize,
        /// Week column.
        week: usize,
        /// Offending id.
        fixture: u32,
    },
    /// An unknown slot code.
    #[error("unknown slot code {code} at team {team}, week {week}")]
    UnknownSlot {
        /// Team row.
        team: usize,
        /// Week column.
        week: usize,
        /// Offending code.
        code: u32,
    },
}

/// Precondition violations in optimizer or rule set setup.
///
/// These are programming errors: they are reported once and never retried.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Roulette selection needs two distinct parents.
    #[error("population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    /// A probability outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidRate {
        /// Which rate.
        name: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// Statistics sampling interval of zero.
    #[error("sample interval must be positive")]
    ZeroSampleInterval,
    /// A rule set without rules has no meaningful fitness.
    #[error("rule set must contain at least one rule")]
    EmptyRuleSet,
}

/// Failure to hand a run result to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Serialization failed.
    #[error("failed to serialize run result: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Writing failed.
    #[error("failed to write run result: {0}")]
    Io(#[from] std::io::Error),
}
