//! Season file loader.
//!
//! # Format
//!
//! Line oriented, blocks separated by blank lines:
//!
//! ```text
//! # teams: id acronym conference division priorByeWeek threeRoadFlag
//! 0 DAL NFC East 2 0
//! 1 DET NFC North 5 1
//!
//! # stadiums: id band
//! 0 CST
//!
//! # fixtures: id home away stadium rating
//! 0 0 1 0 9
//!
//! # Thanksgiving week, then Christmas week and weekday
//! 1
//! 2 V
//! ```
//!
//! Lines starting with `#` are ignored. Flags accept `0`, `1`, `true` and
//! `false`. Weekdays accept `L M X J V S D` or English names.
//!
//! Loading is atomic: any malformed line yields [`SeasonError::Parse`] with
//! its 1-based line number, and structural problems found by
//! [`validation`](crate::validation) yield [`SeasonError::Invalid`].

use std::path::Path;
use std::str::FromStr;

use crate::error::SeasonError;
use crate::models::{Fixture, SeasonBuilder, SeasonInstance, Stadium, Team, TimeZoneBand, Weekday};

/// Parses a season with the default 18-week calendar.
pub fn parse_season(text: &str) -> Result<SeasonInstance, SeasonError> {
    parse_season_with(text, SeasonBuilder::new())
}

/// Parses a season into a pre-configured builder.
///
/// The builder supplies what the file does not carry: the number of weeks
/// and the weeks without fixed primetime slots.
pub fn parse_season_with(text: &str, builder: SeasonBuilder) -> Result<SeasonInstance, SeasonError> {
    let mut cursor = Cursor::new(text);
    let mut builder = builder;

    let teams = cursor.block("team block")?;
    for &(line, content) in &teams {
        builder = builder.with_team(parse_team(line, content)?);
    }

    let stadiums = cursor.block("stadium block")?;
    for &(line, content) in &stadiums {
        builder = builder.with_stadium(parse_stadium(line, content)?);
    }

    let fixtures = cursor.block("fixture block")?;
    for &(line, content) in &fixtures {
        builder = builder.with_fixture(parse_fixture(line, content)?);
    }

    let (line, content) = cursor.line("Thanksgiving week")?;
    let [week] = fields(line, content, "Thanksgiving week")?;
    builder = builder.with_thanksgiving_week(number(line, week, "Thanksgiving week")?);

    let (line, content) = cursor.line("Christmas week")?;
    let [week, weekday] = fields(line, content, "Christmas line")?;
    let week = number(line, week, "Christmas week")?;
    let weekday = Weekday::from_str(weekday).map_err(|message| SeasonError::Parse { line, message })?;
    builder = builder.with_christmas(week, weekday);

    if let Some((line, _)) = cursor.next_content() {
        return Err(SeasonError::Parse {
            line,
            message: "unexpected content after the Christmas line".to_string(),
        });
    }

    let season = builder.build()?;
    tracing::debug!(
        teams = season.num_teams(),
        fixtures = season.num_fixtures(),
        stadiums = season.stadiums().len(),
        "season loaded"
    );
    Ok(season)
}

/// Reads and parses a season file with the default calendar.
pub fn load_season(path: impl AsRef<Path>) -> Result<SeasonInstance, SeasonError> {
    let text = std::fs::read_to_string(path)?;
    parse_season(&text)
}

/// Numbered, comment-free lines with block navigation.
struct Cursor<'t> {
    lines: Vec<(usize, &'t str)>,
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn new(text: &'t str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.starts_with('#'))
            .collect();
        Self { lines, pos: 0 }
    }

    fn skip_blank(&mut self) {
        while self.lines.get(self.pos).is_some_and(|(_, l)| l.is_empty()) {
            self.pos += 1;
        }
    }

    /// Next non-empty run of lines.
    fn block(&mut self, what: &'static str) -> Result<Vec<(usize, &'t str)>, SeasonError> {
        self.skip_blank();
        let start = self.pos;
        while self.lines.get(self.pos).is_some_and(|(_, l)| !l.is_empty()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(SeasonError::UnexpectedEof(what));
        }
        Ok(self.lines[start..self.pos].to_vec())
    }

    fn next_content(&mut self) -> Option<(usize, &'t str)> {
        self.skip_blank();
        let line = self.lines.get(self.pos).copied();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    fn line(&mut self, what: &'static str) -> Result<(usize, &'t str), SeasonError> {
        self.next_content().ok_or(SeasonError::UnexpectedEof(what))
    }
}

fn fields<'l, const N: usize>(line: usize, content: &'l str, what: &str) -> Result<[&'l str; N], SeasonError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let found = tokens.len();
    tokens.try_into().map_err(|_| SeasonError::Parse {
        line,
        message: format!("expected {N} fields for {what}, found {found}"),
    })
}

fn number<T: FromStr>(line: usize, token: &str, what: &str) -> Result<T, SeasonError> {
    token.parse().map_err(|_| SeasonError::Parse {
        line,
        message: format!("{what} is not a number: {token:?}"),
    })
}

fn flag(line: usize, token: &str) -> Result<bool, SeasonError> {
    match token.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(SeasonError::Parse {
            line,
            message: format!("expected a flag (0/1/true/false), found {token:?}"),
        }),
    }
}

fn parse_team(line: usize, content: &str) -> Result<Team, SeasonError> {
    let [id, acronym, conference, division, prior_bye, three_road] = fields(line, content, "a team")?;
    Ok(Team::new(number(line, id, "team id")?, acronym)
        .with_division(conference, division)
        .with_prior_bye_week(number(line, prior_bye, "prior bye week")?)
        .with_three_road_streak(flag(line, three_road)?))
}

fn parse_stadium(line: usize, content: &str) -> Result<Stadium, SeasonError> {
    let [id, band] = fields(line, content, "a stadium")?;
    let band = TimeZoneBand::from_str(band).map_err(|message| SeasonError::Parse { line, message })?;
    Ok(Stadium::new(number(line, id, "stadium id")?, band))
}

fn parse_fixture(line: usize, content: &str) -> Result<Fixture, SeasonError> {
    let [id, home, away, stadium, rating] = fields(line, content, "a fixture")?;
    Ok(Fixture::new(
        number(line, id, "fixture id")?,
        number(line, home, "home team")?,
        number(line, away, "away team")?,
        number(line, stadium, "stadium")?,
        number(line, rating, "rating")?,
    ))
}
