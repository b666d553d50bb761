//! Season instance model.
//!
//! A season is the static input of the optimizer: teams, the fixtures each
//! team must play, stadiums and the two holiday weeks that alter the
//! primetime template. It is immutable once built.
//!
//! # Identifiers
//! Teams, fixtures and stadiums are identified by their index. Fixture ids
//! span `0..num_fixtures`; the sentinel [`SeasonInstance::bye`] equals
//! `num_fixtures` and marks a week without a game.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::SeasonError;
use crate::validation;

/// Team index.
pub type TeamId = usize;
/// Fixture index (`BYE == num_fixtures`).
pub type FixtureId = usize;
/// Stadium index.
pub type StadiumId = usize;

/// Weeks in a regular season.
pub const DEFAULT_NUM_WEEKS: usize = 18;

/// Weeks (0-indexed) where no primetime template is fixed in advance.
pub const DEFAULT_WEEKS_WITHOUT_FIXED_SLOTS: [usize; 2] = [14, 17];

/// Broadcast slot of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SlotKind {
    /// Regular, non-primetime slot.
    #[default]
    None,
    /// Monday Night Football.
    MondayNight,
    /// Thursday Night Football.
    ThursdayNight,
    /// Sunday Night Football.
    SundayNight,
    /// Christmas game.
    Christmas,
    /// Thanksgiving game.
    Thanksgiving,
}

impl SlotKind {
    /// All slot kinds in code order.
    pub const ALL: [SlotKind; 6] = [
        SlotKind::None,
        SlotKind::MondayNight,
        SlotKind::ThursdayNight,
        SlotKind::SundayNight,
        SlotKind::Christmas,
        SlotKind::Thanksgiving,
    ];

    /// Small integer code used by the flat solution format.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Whether this is a primetime slot (anything but `None`).
    #[inline]
    pub fn is_primetime(self) -> bool {
        self != SlotKind::None
    }

    /// Short broadcast label.
    pub fn label(self) -> &'static str {
        match self {
            SlotKind::None => "NONE",
            SlotKind::MondayNight => "MNF",
            SlotKind::ThursdayNight => "TNF",
            SlotKind::SundayNight => "SNF",
            SlotKind::Christmas => "XMAS",
            SlotKind::Thanksgiving => "TDAY",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Time-zone band of a stadium, ordered west to east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeZoneBand {
    /// Pacific.
    Pst,
    /// Mountain.
    Mst,
    /// Central.
    Cst,
    /// Eastern.
    Est,
}

impl TimeZoneBand {
    /// Position from west (0) to east (3).
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Number of bands crossed travelling between two bands.
    #[inline]
    pub fn distance(self, other: Self) -> usize {
        self.ordinal().abs_diff(other.ordinal())
    }
}

impl FromStr for TimeZoneBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PST" => Ok(TimeZoneBand::Pst),
            "MST" => Ok(TimeZoneBand::Mst),
            "CST" => Ok(TimeZoneBand::Cst),
            "EST" => Ok(TimeZoneBand::Est),
            other => Err(format!("unknown time-zone band '{other}'")),
        }
    }
}

/// Day of the week Christmas falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl FromStr for Weekday {
    type Err = String;

    /// Accepts the single-letter codes `L M X J V S D` used by season
    /// files as well as English names and three-letter abbreviations.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.to_ascii_uppercase().as_str() {
            "L" | "MON" | "MONDAY" => Weekday::Monday,
            "M" | "TUE" | "TUESDAY" => Weekday::Tuesday,
            "X" | "WED" | "WEDNESDAY" => Weekday::Wednesday,
            "J" | "THU" | "THURSDAY" => Weekday::Thursday,
            "V" | "FRI" | "FRIDAY" => Weekday::Friday,
            "S" | "SAT" | "SATURDAY" => Weekday::Saturday,
            "D" | "SUN" | "SUNDAY" => Weekday::Sunday,
            other => return Err(format!("unknown weekday '{other}'")),
        };
        Ok(day)
    }
}

/// A franchise taking part in the season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Team index.
    pub id: TeamId,
    /// Short name, e.g. `DAL`.
    pub acronym: String,
    /// Conference name.
    pub conference: String,
    /// Division name (unique within a conference).
    pub division: String,
    /// Bye week of the previous season (0-indexed).
    pub prior_bye_week: usize,
    /// Whether the team had three consecutive road games last season.
    pub had_three_road_streak: bool,
    /// Fixtures this team plays, filled in by cross-reference at build time.
    pub fixture_ids: Vec<FixtureId>,
}

impl Team {
    /// Creates a team with empty conference/division.
    pub fn new(id: TeamId, acronym: impl Into<String>) -> Self {
        Self {
            id,
            acronym: acronym.into(),
            conference: String::new(),
            division: String::new(),
            prior_bye_week: 0,
            had_three_road_streak: false,
            fixture_ids: Vec::new(),
        }
    }

    /// Sets conference and division.
    pub fn with_division(mut self, conference: impl Into<String>, division: impl Into<String>) -> Self {
        self.conference = conference.into();
        self.division = division.into();
        self
    }

    /// Sets last season's bye week.
    pub fn with_prior_bye_week(mut self, week: usize) -> Self {
        self.prior_bye_week = week;
        self
    }

    /// Sets last season's three-road-games flag.
    pub fn with_three_road_streak(mut self, flag: bool) -> Self {
        self.had_three_road_streak = flag;
        self
    }

    /// Whether two teams share conference and division.
    pub fn same_division(&self, other: &Team) -> bool {
        self.conference == other.conference && self.division == other.division
    }
}

/// A single game between two teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Fixture index.
    pub id: FixtureId,
    /// Home team.
    pub home: TeamId,
    /// Away team.
    pub away: TeamId,
    /// Venue.
    pub stadium: StadiumId,
    /// Viewer-interest rating.
    pub rating: i64,
}

impl Fixture {
    /// Creates a fixture.
    pub fn new(id: FixtureId, home: TeamId, away: TeamId, stadium: StadiumId, rating: i64) -> Self {
        Self {
            id,
            home,
            away,
            stadium,
            rating,
        }
    }
}

/// A venue and its time-zone band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stadium {
    /// Stadium index.
    pub id: StadiumId,
    /// Time-zone band.
    pub band: TimeZoneBand,
}

impl Stadium {
    /// Creates a stadium.
    pub fn new(id: StadiumId, band: TimeZoneBand) -> Self {
        Self { id, band }
    }
}

/// Immutable description of a season.
///
/// Built through [`SeasonBuilder`] (or the text [`loader`](crate::loader)),
/// which validates the data before handing out an instance.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonInstance {
    num_weeks: usize,
    teams: Vec<Team>,
    fixtures: Vec<Fixture>,
    stadiums: Vec<Stadium>,
    thanksgiving_week: usize,
    christmas: (usize, Weekday),
    weeks_without_fixed_slots: BTreeSet<usize>,
    max_fixture_rating: i64,
}

impl SeasonInstance {
    /// Number of teams.
    #[inline]
    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    /// Number of weeks.
    #[inline]
    pub fn num_weeks(&self) -> usize {
        self.num_weeks
    }

    /// Number of fixtures.
    #[inline]
    pub fn num_fixtures(&self) -> usize {
        self.fixtures.len()
    }

    /// The "no game this week" sentinel.
    #[inline]
    pub fn bye(&self) -> FixtureId {
        self.fixtures.len()
    }

    /// All teams, indexed by id.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// All fixtures, indexed by id.
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// All stadiums, indexed by id.
    pub fn stadiums(&self) -> &[Stadium] {
        &self.stadiums
    }

    /// A team by id.
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    /// A fixture by id (`None` for BYE).
    pub fn fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.get(id)
    }

    /// Finds a team by acronym.
    pub fn team_by_acronym(&self, acronym: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.acronym == acronym)
    }

    /// Thanksgiving week (0-indexed).
    pub fn thanksgiving_week(&self) -> usize {
        self.thanksgiving_week
    }

    /// Christmas week and weekday.
    pub fn christmas(&self) -> (usize, Weekday) {
        self.christmas
    }

    /// Weeks where no primetime template applies.
    pub fn weeks_without_fixed_slots(&self) -> &BTreeSet<usize> {
        &self.weeks_without_fixed_slots
    }

    /// Highest fixture rating.
    pub fn max_fixture_rating(&self) -> i64 {
        self.max_fixture_rating
    }

    /// The other team of a fixture.
    ///
    /// Returns `None` for BYE or an unknown fixture; never panics.
    pub fn opponent_of(&self, team: TeamId, fixture: FixtureId) -> Option<TeamId> {
        let f = self.fixtures.get(fixture)?;
        Some(if f.home != team { f.home } else { f.away })
    }

    /// Whether `team` is the home side of `fixture`.
    #[inline]
    pub fn is_home(&self, team: TeamId, fixture: FixtureId) -> bool {
        self.fixtures.get(fixture).is_some_and(|f| f.home == team)
    }

    /// Time-zone band of the stadium hosting `fixture`.
    pub fn stadium_band_of_fixture(&self, fixture: FixtureId) -> Option<TimeZoneBand> {
        let f = self.fixtures.get(fixture)?;
        self.stadiums.get(f.stadium).map(|s| s.band)
    }

    /// Whether both teams of `fixture` play in the same division.
    pub fn is_intra_division(&self, fixture: FixtureId) -> bool {
        let Some(f) = self.fixtures.get(fixture) else {
            return false;
        };
        match (self.teams.get(f.home), self.teams.get(f.away)) {
            (Some(h), Some(a)) => h.same_division(a),
            _ => false,
        }
    }

    /// Primetime slots that must be filled in `week`.
    ///
    /// | Week | Slots |
    /// |------|-------|
    /// | without fixed slots | none |
    /// | regular | MNF, TNF, SNF |
    /// | Thanksgiving | MNF, SNF, TDAY×3 |
    /// | Christmas on Saturday | current list + XMAS×3 |
    /// | Christmas on Sunday | MNF, TNF, XMAS×3 |
    /// | Christmas on Monday | TNF, XMAS×3 |
    pub fn template_slots_for_week(&self, week: usize) -> Vec<SlotKind> {
        use SlotKind::*;

        if week >= self.num_weeks || self.weeks_without_fixed_slots.contains(&week) {
            return Vec::new();
        }

        let mut slots = vec![MondayNight, ThursdayNight, SundayNight];

        if week == self.thanksgiving_week {
            slots = vec![MondayNight, SundayNight, Thanksgiving, Thanksgiving, Thanksgiving];
        }

        let (christmas_week, weekday) = self.christmas;
        if week == christmas_week {
            match weekday {
                Weekday::Saturday => slots.extend([Christmas; 3]),
                Weekday::Sunday => slots = vec![MondayNight, ThursdayNight, Christmas, Christmas, Christmas],
                Weekday::Monday => slots = vec![ThursdayNight, Christmas, Christmas, Christmas],
                _ => {}
            }
        }

        slots
    }

    /// Total number of template slots across the season.
    pub fn total_template_slots(&self) -> usize {
        (0..self.num_weeks)
            .map(|w| self.template_slots_for_week(w).len())
            .sum()
    }
}

/// Builder for [`SeasonInstance`].
///
/// # Example
/// ```
/// use gridiron_schedule::models::{Fixture, SeasonBuilder, Stadium, Team, TimeZoneBand, Weekday};
///
/// let season = SeasonBuilder::new()
///     .with_num_weeks(2)
///     .with_team(Team::new(0, "AAA"))
///     .with_team(Team::new(1, "BBB"))
///     .with_stadium(Stadium::new(0, TimeZoneBand::Est))
///     .with_fixture(Fixture::new(0, 0, 1, 0, 5))
///     .with_thanksgiving_week(0)
///     .with_christmas(1, Weekday::Friday)
///     .with_weeks_without_fixed_slots([0, 1])
///     .build()
///     .unwrap();
/// assert_eq!(season.bye(), 1);
/// assert_eq!(season.opponent_of(0, 0), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct SeasonBuilder {
    num_weeks: usize,
    teams: Vec<Team>,
    fixtures: Vec<Fixture>,
    stadiums: Vec<Stadium>,
    thanksgiving_week: usize,
    christmas: (usize, Weekday),
    weeks_without_fixed_slots: BTreeSet<usize>,
}

impl Default for SeasonBuilder {
    fn default() -> Self {
        Self {
            num_weeks: DEFAULT_NUM_WEEKS,
            teams: Vec::new(),
            fixtures: Vec::new(),
            stadiums: Vec::new(),
            thanksgiving_week: 0,
            christmas: (0, Weekday::Monday),
            weeks_without_fixed_slots: DEFAULT_WEEKS_WITHOUT_FIXED_SLOTS.into_iter().collect(),
        }
    }
}

impl SeasonBuilder {
    /// Creates a builder for an 18-week season.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of weeks.
    pub fn with_num_weeks(mut self, weeks: usize) -> Self {
        self.num_weeks = weeks;
        self
    }

    /// Adds a team. Any `fixture_ids` on it are recomputed at build time.
    pub fn with_team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    /// Adds a fixture.
    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.fixtures.push(fixture);
        self
    }

    /// Adds a stadium.
    pub fn with_stadium(mut self, stadium: Stadium) -> Self {
        self.stadiums.push(stadium);
        self
    }

    /// Sets the Thanksgiving week.
    pub fn with_thanksgiving_week(mut self, week: usize) -> Self {
        self.thanksgiving_week = week;
        self
    }

    /// Sets the Christmas week and weekday.
    pub fn with_christmas(mut self, week: usize, weekday: Weekday) -> Self {
        self.christmas = (week, weekday);
        self
    }

    /// Replaces the set of weeks without a fixed primetime template.
    pub fn with_weeks_without_fixed_slots(mut self, weeks: impl IntoIterator<Item = usize>) -> Self {
        self.weeks_without_fixed_slots = weeks.into_iter().collect();
        self
    }

    /// Validates the data and builds the instance.
    ///
    /// Fixture lists of the teams are derived from the fixtures.
    pub fn build(mut self) -> Result<SeasonInstance, SeasonError> {
        for team in &mut self.teams {
            team.fixture_ids.clear();
        }
        for fixture in &self.fixtures {
            for side in [fixture.home, fixture.away] {
                if let Some(team) = self.teams.get_mut(side) {
                    team.fixture_ids.push(fixture.id);
                }
            }
        }

        validation::validate_season(
            &self.teams,
            &self.fixtures,
            &self.stadiums,
            self.num_weeks,
            self.thanksgiving_week,
            self.christmas.0,
        )
        .map_err(SeasonError::Invalid)?;

        let max_fixture_rating = self.fixtures.iter().map(|f| f.rating).max().unwrap_or(0);

        Ok(SeasonInstance {
            num_weeks: self.num_weeks,
            teams: self.teams,
            fixtures: self.fixtures,
            stadiums: self.stadiums,
            thanksgiving_week: self.thanksgiving_week,
            christmas: self.christmas,
            weeks_without_fixed_slots: self.weeks_without_fixed_slots,
            max_fixture_rating,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Single round robin for `n` (even) teams over `n` weeks: each team has
    /// `n - 1` fixtures and one bye. Teams alternate between two divisions and
    /// two time-zone bands.
    pub(crate) fn round_robin_season(n: usize) -> SeasonInstance {
        let mut builder = SeasonBuilder::new()
            .with_num_weeks(n)
            .with_thanksgiving_week(1)
            .with_christmas(n - 2, Weekday::Sunday)
            .with_weeks_without_fixed_slots([n - 1])
            .with_stadium(Stadium::new(0, TimeZoneBand::Pst))
            .with_stadium(Stadium::new(1, TimeZoneBand::Est));

        for t in 0..n {
            let acronym = match t {
                0 => "DAL".to_string(),
                1 => "DET".to_string(),
                _ => format!("T{t:02}"),
            };
            let division = if t % 2 == 0 { "East" } else { "North" };
            builder = builder.with_team(
                Team::new(t, acronym)
                    .with_division("NFC", division)
                    .with_prior_bye_week(t % n),
            );
        }

        let mut id = 0;
        for a in 0..n {
            for b in (a + 1)..n {
                let (home, away) = if (a + b) % 2 == 0 { (a, b) } else { (b, a) };
                builder = builder.with_fixture(Fixture::new(id, home, away, home % 2, ((a * b) % 7) as i64 + 1));
                id += 1;
            }
        }

        builder.build().expect("round robin season is valid")
    }

    #[test]
    fn test_fixture_lists_cross_referenced() {
        let season = round_robin_season(6);
        assert_eq!(season.num_teams(), 6);
        assert_eq!(season.num_fixtures(), 15);
        assert_eq!(season.bye(), 15);
        for team in season.teams() {
            assert_eq!(team.fixture_ids.len(), season.num_weeks() - 1);
        }
        // every fixture appears in exactly two lists
        let mut counts = vec![0; season.num_fixtures()];
        for team in season.teams() {
            for &f in &team.fixture_ids {
                counts[f] += 1;
            }
        }
        assert!(counts.iter().all(|&c| c == 2));
    }

    #[test]
    fn test_opponent_of() {
        let season = round_robin_season(4);
        let f = &season.fixtures()[0];
        assert_eq!(season.opponent_of(f.home, 0), Some(f.away));
        assert_eq!(season.opponent_of(f.away, 0), Some(f.home));
        assert_eq!(season.opponent_of(0, season.bye()), None);
        assert_eq!(season.opponent_of(0, 999), None);
    }

    #[test]
    fn test_template_regular_and_empty_weeks() {
        let season = round_robin_season(6);
        assert_eq!(
            season.template_slots_for_week(0),
            vec![SlotKind::MondayNight, SlotKind::ThursdayNight, SlotKind::SundayNight]
        );
        assert!(season.template_slots_for_week(5).is_empty());
        assert!(season.template_slots_for_week(99).is_empty());
    }

    #[test]
    fn test_template_thanksgiving() {
        let season = round_robin_season(6);
        let slots = season.template_slots_for_week(1);
        assert_eq!(slots.len(), 5);
        assert_eq!(slots.iter().filter(|s| **s == SlotKind::Thanksgiving).count(), 3);
        assert!(!slots.contains(&SlotKind::ThursdayNight));
    }

    fn christmas_slots(weekday: Weekday) -> Vec<SlotKind> {
        let season = SeasonBuilder::new()
            .with_num_weeks(2)
            .with_team(Team::new(0, "A"))
            .with_team(Team::new(1, "B"))
            .with_stadium(Stadium::new(0, TimeZoneBand::Cst))
            .with_fixture(Fixture::new(0, 0, 1, 0, 1))
            .with_thanksgiving_week(0)
            .with_christmas(1, weekday)
            .with_weeks_without_fixed_slots(Vec::<usize>::new())
            .build()
            .unwrap();
        season.template_slots_for_week(1)
    }

    #[test]
    fn test_template_christmas_variants() {
        use SlotKind::*;
        assert_eq!(
            christmas_slots(Weekday::Saturday),
            vec![MondayNight, ThursdayNight, SundayNight, Christmas, Christmas, Christmas]
        );
        assert_eq!(
            christmas_slots(Weekday::Sunday),
            vec![MondayNight, ThursdayNight, Christmas, Christmas, Christmas]
        );
        assert_eq!(
            christmas_slots(Weekday::Monday),
            vec![ThursdayNight, Christmas, Christmas, Christmas]
        );
        assert_eq!(
            christmas_slots(Weekday::Wednesday),
            vec![MondayNight, ThursdayNight, SundayNight]
        );
    }

    #[test]
    fn test_slot_codes() {
        for slot in SlotKind::ALL {
            assert_eq!(SlotKind::from_code(slot.code()), Some(slot));
        }
        assert_eq!(SlotKind::from_code(6), None);
        assert_eq!(SlotKind::default(), SlotKind::None);
        assert!(!SlotKind::None.is_primetime());
    }

    #[test]
    fn test_band_and_weekday_parsing() {
        assert_eq!("pst".parse::<TimeZoneBand>(), Ok(TimeZoneBand::Pst));
        assert_eq!(TimeZoneBand::Pst.distance(TimeZoneBand::Est), 3);
        assert!("GMT".parse::<TimeZoneBand>().is_err());
        assert_eq!("S".parse::<Weekday>(), Ok(Weekday::Saturday));
        assert_eq!("D".parse::<Weekday>(), Ok(Weekday::Sunday));
        assert_eq!("monday".parse::<Weekday>(), Ok(Weekday::Monday));
    }

    #[test]
    fn test_intra_division_and_rating() {
        let season = round_robin_season(4);
        // teams 0 and 2 share "East"
        let f02 = season
            .fixtures()
            .iter()
            .find(|f| (f.home, f.away) == (0, 2) || (f.home, f.away) == (2, 0))
            .unwrap();
        assert!(season.is_intra_division(f02.id));
        assert!(!season.is_intra_division(season.bye()));
        assert!(season.max_fixture_rating() >= 1);
    }
}
