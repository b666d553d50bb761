//! Built-in scheduling rules.
//!
//! # Categories
//!
//! - **Hard**: well-formedness, Thanksgiving hosts, primetime cap,
//!   four-game road trips, bye window, byes per week, primetime on a bye
//! - **Soft**: three-game road trips, primetime ratings, primetime for
//!   everyone, repeated early byes, early divisional games, Thursday travel
//!
//! # Penalty Convention
//! Every rule returns a non-negative raw penalty; zero means satisfied.
//! [`RuleSet`](super::RuleSet) clamps it to the rule's maximum and applies
//! the hard weight.

use serde::{Deserialize, Serialize};

use crate::models::{FixtureId, Schedule, SeasonInstance, SlotKind, TeamId};

/// Teams that host the Thanksgiving games by tradition.
pub const DEFAULT_THANKSGIVING_HOSTS: [&str; 2] = ["DET", "DAL"];

/// Primetime appearances a team may have before the cap is violated.
pub const MAX_PRIMETIME_APPEARANCES: usize = 5;

/// First week (inclusive) a bye may fall in.
pub const BYE_WINDOW_START: usize = 4;

/// Last week (inclusive) a bye may fall in.
pub const BYE_WINDOW_END: usize = 13;

/// Maximum teams on a bye in the same week.
pub const MAX_BYES_PER_WEEK: usize = 6;

/// Weeks counted as "early season" by the soft rules.
pub const EARLY_WEEKS: usize = 9;

/// Band distance a Thursday-night traveller may cover.
pub const MAX_THURSDAY_BANDS: usize = 2;

/// A scheduling rule.
///
/// The set is closed: adding a rule means adding a variant and its arms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    // ======================== Hard rules ========================
    /// Every fixture is placed in the same week, with the same slot, by both
    /// of its teams.
    WellFormed,
    /// The designated teams play in a Thanksgiving slot that week.
    ThanksgivingHosts {
        /// Resolved host team ids.
        hosts: Vec<TeamId>,
    },
    /// No team has six or more primetime appearances.
    PrimetimeCap,
    /// No team plays four or more road games in a row.
    NoFourAwayInARow,
    /// Byes fall between weeks 4 and 13.
    ByeWindow,
    /// At most six teams rest in the same week.
    ByesPerWeek,
    /// Teams on a bye hold no primetime slot.
    NoPrimetimeOnBye,

    // ======================== Soft rules ========================
    /// No team plays three or more road games in a row.
    NoThreeAwayInARow,
    /// Primetime slots go to highly rated fixtures.
    PrimetimeRating,
    /// Every team gets at least one primetime game.
    EveryTeamPrimetime,
    /// A team with an early bye last season does not get another one.
    NoRepeatedEarlyBye,
    /// Divisional games are kept for the second half.
    DivisionalGamesLate,
    /// Thursday-night games do not follow a cross-country trip.
    ThursdayTravel,
}

impl Rule {
    /// Thanksgiving rule for the traditional hosts (`DET`, `DAL`).
    ///
    /// Acronyms missing from the season are skipped.
    pub fn thanksgiving_hosts(season: &SeasonInstance) -> Self {
        Self::thanksgiving_hosts_for(season, &DEFAULT_THANKSGIVING_HOSTS)
    }

    /// Thanksgiving rule for an explicit list of host acronyms.
    pub fn thanksgiving_hosts_for(season: &SeasonInstance, acronyms: &[&str]) -> Self {
        let hosts = acronyms
            .iter()
            .filter_map(|a| season.team_by_acronym(a).map(|t| t.id))
            .collect();
        Rule::ThanksgivingHosts { hosts }
    }

    /// All built-in rules for a season, hard rules first.
    pub fn standard(season: &SeasonInstance) -> Vec<Rule> {
        vec![
            Rule::WellFormed,
            Rule::thanksgiving_hosts(season),
            Rule::PrimetimeCap,
            Rule::NoFourAwayInARow,
            Rule::ByeWindow,
            Rule::ByesPerWeek,
            Rule::NoPrimetimeOnBye,
            Rule::NoThreeAwayInARow,
            Rule::PrimetimeRating,
            Rule::EveryTeamPrimetime,
            Rule::NoRepeatedEarlyBye,
            Rule::DivisionalGamesLate,
            Rule::ThursdayTravel,
        ]
    }

    /// Rule name.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::WellFormed => "WellFormed",
            Rule::ThanksgivingHosts { .. } => "ThanksgivingHosts",
            Rule::PrimetimeCap => "PrimetimeCap",
            Rule::NoFourAwayInARow => "NoFourAwayInARow",
            Rule::ByeWindow => "ByeWindow",
            Rule::ByesPerWeek => "ByesPerWeek",
            Rule::NoPrimetimeOnBye => "NoPrimetimeOnBye",
            Rule::NoThreeAwayInARow => "NoThreeAwayInARow",
            Rule::PrimetimeRating => "PrimetimeRating",
            Rule::EveryTeamPrimetime => "EveryTeamPrimetime",
            Rule::NoRepeatedEarlyBye => "NoRepeatedEarlyBye",
            Rule::DivisionalGamesLate => "DivisionalGamesLate",
            Rule::ThursdayTravel => "ThursdayTravel",
        }
    }

    /// Rule description.
    pub fn description(&self) -> &'static str {
        match self {
            Rule::WellFormed => "Both teams of a fixture place it in the same week and slot",
            Rule::ThanksgivingHosts { .. } => "Traditional hosts play on Thanksgiving",
            Rule::PrimetimeCap => "No team with six or more primetime games",
            Rule::NoFourAwayInARow => "No four consecutive road games",
            Rule::ByeWindow => "Byes between weeks 4 and 13",
            Rule::ByesPerWeek => "No more than six byes in a week",
            Rule::NoPrimetimeOnBye => "No primetime slot on a bye",
            Rule::NoThreeAwayInARow => "No three consecutive road games",
            Rule::PrimetimeRating => "Highly rated fixtures in primetime",
            Rule::EveryTeamPrimetime => "Every team plays in primetime",
            Rule::NoRepeatedEarlyBye => "No second early bye in a row",
            Rule::DivisionalGamesLate => "Divisional games late in the season",
            Rule::ThursdayTravel => "Thursday games within two time-zone bands",
        }
    }

    /// Whether violations must be driven to zero for feasibility.
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            Rule::WellFormed
                | Rule::ThanksgivingHosts { .. }
                | Rule::PrimetimeCap
                | Rule::NoFourAwayInARow
                | Rule::ByeWindow
                | Rule::ByesPerWeek
                | Rule::NoPrimetimeOnBye
        )
    }

    /// Upper bound of the raw penalty for a season.
    ///
    /// Bounds may be loose; they only need to hold.
    pub fn max_raw_penalty(&self, season: &SeasonInstance) -> i64 {
        let teams = season.num_teams() as i64;
        let weeks = season.num_weeks() as i64;
        match self {
            Rule::WellFormed => season.num_fixtures() as i64,
            Rule::ThanksgivingHosts { hosts } => hosts.len() as i64,
            Rule::PrimetimeCap => teams * (weeks - MAX_PRIMETIME_APPEARANCES as i64).max(0),
            Rule::NoFourAwayInARow => teams * (weeks - 3).max(0),
            Rule::ByeWindow | Rule::ByesPerWeek | Rule::NoPrimetimeOnBye => teams,
            Rule::NoThreeAwayInARow => teams * (weeks - 2).max(0),
            Rule::PrimetimeRating => {
                season.max_fixture_rating().max(0) * season.total_template_slots() as i64
            }
            Rule::EveryTeamPrimetime | Rule::NoRepeatedEarlyBye => teams,
            Rule::DivisionalGamesLate => (0..season.num_fixtures())
                .filter(|&f| season.is_intra_division(f))
                .count() as i64,
            Rule::ThursdayTravel => teams * weeks,
        }
    }

    /// Raw (unweighted, unclamped) penalty of a schedule.
    pub fn raw_penalty(&self, season: &SeasonInstance, schedule: &Schedule) -> i64 {
        match self {
            Rule::WellFormed => inconsistent_fixtures(season, schedule),
            Rule::ThanksgivingHosts { hosts } => {
                let week = season.thanksgiving_week();
                if week >= schedule.num_weeks() {
                    return 0;
                }
                hosts
                    .iter()
                    .filter(|&&t| t < schedule.num_teams())
                    .filter(|&&t| schedule.slot(t, week) != SlotKind::Thanksgiving)
                    .count() as i64
            }
            Rule::PrimetimeCap => (0..schedule.num_teams())
                .map(|t| schedule.primetime_count(t).saturating_sub(MAX_PRIMETIME_APPEARANCES) as i64)
                .sum(),
            Rule::NoFourAwayInARow => away_run_excess(season, schedule, 3),
            Rule::ByeWindow => {
                let bye = season.bye();
                (0..schedule.num_teams())
                    .flat_map(|t| schedule.row(t).iter().enumerate())
                    .filter(|(w, c)| {
                        c.fixture == bye && !(BYE_WINDOW_START..=BYE_WINDOW_END).contains(w)
                    })
                    .count() as i64
            }
            Rule::ByesPerWeek => {
                let bye = season.bye();
                (0..schedule.num_weeks())
                    .map(|w| {
                        let byes = (0..schedule.num_teams())
                            .filter(|&t| schedule.fixture(t, w) == bye)
                            .count();
                        byes.saturating_sub(MAX_BYES_PER_WEEK) as i64
                    })
                    .sum()
            }
            Rule::NoPrimetimeOnBye => {
                let bye = season.bye();
                (0..schedule.num_teams())
                    .flat_map(|t| schedule.row(t).iter())
                    .filter(|c| c.fixture == bye && c.slot.is_primetime())
                    .count() as i64
            }
            Rule::NoThreeAwayInARow => away_run_excess(season, schedule, 2),
            Rule::PrimetimeRating => {
                let potential = self.max_raw_penalty(season);
                let achieved: i64 = (0..schedule.num_teams())
                    .flat_map(|t| schedule.row(t).iter().map(move |c| (t, c)))
                    .filter(|(t, c)| c.slot.is_primetime() && season.is_home(*t, c.fixture))
                    .filter_map(|(_, c)| season.fixture(c.fixture).map(|f| f.rating))
                    .sum();
                (potential - achieved).max(0)
            }
            Rule::EveryTeamPrimetime => (0..schedule.num_teams())
                .filter(|&t| schedule.primetime_count(t) == 0)
                .count() as i64,
            Rule::NoRepeatedEarlyBye => {
                let bye = season.bye();
                season
                    .teams()
                    .iter()
                    .filter(|team| team.id < schedule.num_teams() && team.prior_bye_week < EARLY_WEEKS)
                    .filter(|team| {
                        schedule
                            .row(team.id)
                            .iter()
                            .take(EARLY_WEEKS)
                            .any(|c| c.fixture == bye)
                    })
                    .count() as i64
            }
            Rule::DivisionalGamesLate => (0..schedule.num_teams())
                .flat_map(|t| {
                    schedule
                        .row(t)
                        .iter()
                        .take(EARLY_WEEKS)
                        .map(move |c| (t, c.fixture))
                })
                .filter(|&(t, f)| season.is_home(t, f) && season.is_intra_division(f))
                .count() as i64,
            Rule::ThursdayTravel => thursday_travel(season, schedule),
        }
    }
}

/// Fixtures not mirrored by both teams in one week with one slot.
fn inconsistent_fixtures(season: &SeasonInstance, schedule: &Schedule) -> i64 {
    let placed = |team: TeamId, fixture: FixtureId| {
        if team < schedule.num_teams() {
            schedule.week_of(team, fixture)
        } else {
            None
        }
    };
    season
        .fixtures()
        .iter()
        .filter(|f| match (placed(f.home, f.id), placed(f.away, f.id)) {
            (Some(wh), Some(wa)) => wh != wa || schedule.slot(f.home, wh) != schedule.slot(f.away, wa),
            _ => true,
        })
        .count() as i64
}

/// Sum of `run - allowed` over road runs longer than `allowed`.
///
/// A run is broken by a home game or a bye and is closed at season end.
fn away_run_excess(season: &SeasonInstance, schedule: &Schedule, allowed: usize) -> i64 {
    let bye = season.bye();
    let mut penalty = 0;
    for team in 0..schedule.num_teams() {
        let mut run = 0usize;
        for cell in schedule.row(team) {
            if cell.fixture == bye || season.is_home(team, cell.fixture) {
                penalty += run.saturating_sub(allowed);
                run = 0;
            } else {
                run += 1;
            }
        }
        penalty += run.saturating_sub(allowed);
    }
    penalty as i64
}

/// Thursday games played more than two bands away from last week's stadium.
fn thursday_travel(season: &SeasonInstance, schedule: &Schedule) -> i64 {
    let bye = season.bye();
    let mut penalty = 0;
    for team in 0..schedule.num_teams() {
        for week in 1..schedule.num_weeks() {
            if season.weeks_without_fixed_slots().contains(&week) {
                continue;
            }
            let cell = schedule.cell(team, week);
            if cell.slot != SlotKind::ThursdayNight || cell.fixture == bye {
                continue;
            }
            let previous = schedule.fixture(team, week - 1);
            let bands = (
                season.stadium_band_of_fixture(previous),
                season.stadium_band_of_fixture(cell.fixture),
            );
            if let (Some(from), Some(to)) = bands {
                if from.distance(to) > MAX_THURSDAY_BANDS {
                    penalty += 1;
                }
            }
        }
    }
    penalty
}
