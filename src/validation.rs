//! Input validation for season data.
//!
//! Checks structural integrity of teams, fixtures and stadiums before a
//! [`SeasonInstance`](crate::models::SeasonInstance) is handed out. Detects:
//! - Ids that are not contiguous from zero (ids double as indices)
//! - Fixtures referencing unknown teams or stadiums
//! - Fixtures a team plays against itself
//! - Teams whose fixture count leaves other than exactly one bye
//! - Holiday weeks outside the season
//!
//! All problems are collected; validation never stops at the first one.

use std::collections::HashSet;

use crate::models::{Fixture, Stadium, Team};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An entity id does not match its position.
    NonContiguousId,
    /// Two entities share the same id.
    DuplicateId,
    /// A fixture references a team that doesn't exist.
    InvalidTeamReference,
    /// A fixture references a stadium that doesn't exist.
    InvalidStadiumReference,
    /// Home and away team are the same.
    SelfFixture,
    /// A team does not have exactly `num_weeks - 1` fixtures.
    WrongFixtureCount,
    /// A holiday week lies outside the season.
    WeekOutOfRange,
    /// The season has no teams.
    EmptySeason,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates season data.
///
/// Checks:
/// 1. At least one team
/// 2. Team, stadium and fixture ids are unique and equal their position
/// 3. Fixtures reference existing teams and stadiums, home ≠ away
/// 4. Every team plays exactly `num_weeks - 1` fixtures (one bye)
/// 5. Thanksgiving and Christmas weeks lie inside the season
///
/// `teams[*].fixture_ids` must already be cross-referenced from `fixtures`.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_season(
    teams: &[Team],
    fixtures: &[Fixture],
    stadiums: &[Stadium],
    num_weeks: usize,
    thanksgiving_week: usize,
    christmas_week: usize,
) -> ValidationResult {
    let mut errors = Vec::new();

    if teams.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptySeason,
            "Season has no teams",
        ));
    }

    check_ids(teams.iter().map(|t| t.id), "team", &mut errors);
    check_ids(stadiums.iter().map(|s| s.id), "stadium", &mut errors);
    check_ids(fixtures.iter().map(|f| f.id), "fixture", &mut errors);

    for f in fixtures {
        for side in [f.home, f.away] {
            if side >= teams.len() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTeamReference,
                    format!("Fixture {} references unknown team {}", f.id, side),
                ));
            }
        }
        if f.stadium >= stadiums.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidStadiumReference,
                format!("Fixture {} references unknown stadium {}", f.id, f.stadium),
            ));
        }
        if f.home == f.away {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfFixture,
                format!("Fixture {} has team {} playing itself", f.id, f.home),
            ));
        }
    }

    let expected = num_weeks.saturating_sub(1);
    for team in teams {
        if team.fixture_ids.len() != expected {
            errors.push(ValidationError::new(
                ValidationErrorKind::WrongFixtureCount,
                format!(
                    "Team '{}' has {} fixtures, expected {}",
                    team.acronym,
                    team.fixture_ids.len(),
                    expected
                ),
            ));
        }
    }

    for (name, week) in [("Thanksgiving", thanksgiving_week), ("Christmas", christmas_week)] {
        if week >= num_weeks {
            errors.push(ValidationError::new(
                ValidationErrorKind::WeekOutOfRange,
                format!("{name} week {week} is outside a {num_weeks}-week season"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_ids(ids: impl Iterator<Item = usize>, entity: &str, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for (position, id) in ids.enumerate() {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        } else if id != position {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonContiguousId,
                format!("{entity} ID {id} found at position {position}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeZoneBand;

    fn with_fixture_lists(mut teams: Vec<Team>, fixtures: &[Fixture]) -> Vec<Team> {
        for f in fixtures {
            for side in [f.home, f.away] {
                if let Some(t) = teams.get_mut(side) {
                    t.fixture_ids.push(f.id);
                }
            }
        }
        teams
    }

    fn sample() -> (Vec<Team>, Vec<Fixture>, Vec<Stadium>) {
        let fixtures = vec![
            Fixture::new(0, 0, 1, 0, 3),
            Fixture::new(1, 1, 2, 0, 3),
            Fixture::new(2, 2, 0, 1, 3),
        ];
        let teams = with_fixture_lists(
            vec![Team::new(0, "AAA"), Team::new(1, "BBB"), Team::new(2, "CCC")],
            &fixtures,
        );
        let stadiums = vec![
            Stadium::new(0, TimeZoneBand::Est),
            Stadium::new(1, TimeZoneBand::Pst),
        ];
        (teams, fixtures, stadiums)
    }

    #[test]
    fn test_valid_input() {
        let (teams, fixtures, stadiums) = sample();
        assert!(validate_season(&teams, &fixtures, &stadiums, 3, 0, 2).is_ok());
    }

    #[test]
    fn test_empty_season() {
        let errors = validate_season(&[], &[], &[], 18, 0, 0).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptySeason));
    }

    #[test]
    fn test_duplicate_team_id() {
        let (mut teams, fixtures, stadiums) = sample();
        teams[2].id = 1;
        let errors = validate_season(&teams, &fixtures, &stadiums, 3, 0, 2).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("team")));
    }

    #[test]
    fn test_non_contiguous_stadium_id() {
        let (teams, fixtures, mut stadiums) = sample();
        stadiums[1].id = 7;
        let errors = validate_season(&teams, &fixtures, &stadiums, 3, 0, 2).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NonContiguousId));
    }

    #[test]
    fn test_invalid_references() {
        let (teams, mut fixtures, stadiums) = sample();
        fixtures[0].away = 9;
        fixtures[1].stadium = 5;
        let errors = validate_season(&teams, &fixtures, &stadiums, 3, 0, 2).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidTeamReference));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidStadiumReference));
    }

    #[test]
    fn test_self_fixture() {
        let (teams, mut fixtures, stadiums) = sample();
        fixtures[0].away = 0;
        let errors = validate_season(&teams, &fixtures, &stadiums, 3, 0, 2).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::SelfFixture));
    }

    #[test]
    fn test_wrong_fixture_count() {
        let (teams, fixtures, stadiums) = sample();
        // 4 weeks need 3 fixtures per team, each team has 2
        let errors = validate_season(&teams, &fixtures, &stadiums, 4, 0, 2).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::WrongFixtureCount)
                .count(),
            3
        );
    }

    #[test]
    fn test_holiday_out_of_range() {
        let (teams, fixtures, stadiums) = sample();
        let errors = validate_season(&teams, &fixtures, &stadiums, 3, 3, 2).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::WeekOutOfRange && e.message.contains("Thanksgiving")));
    }

    #[test]
    fn test_multiple_errors() {
        let (teams, mut fixtures, stadiums) = sample();
        fixtures[0].home = 1;
        fixtures[0].away = 1;
        fixtures[2].stadium = 9;
        let errors = validate_season(&teams, &fixtures, &stadiums, 3, 0, 9).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
