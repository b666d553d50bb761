//! Schedule (search individual) model.
//!
//! A schedule is a dense team×week grid. Each cell holds the fixture a team
//! plays that week (or BYE) and the broadcast slot of that game. The grid
//! is deliberately unconstrained so that crossover and mutation stay plain
//! array operations; [`repair`](crate::repair) restores consistency.
//!
//! # Feasibility
//! A repaired schedule satisfies:
//! 1. Each row holds the team's fixtures plus exactly one BYE.
//! 2. A fixture at (team, week) is also at (opponent, week).
//! 3. Both sides of a fixture carry the same slot.
//! 4. Per week, slots match the week's template, one fixture per slot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{FixtureId, SeasonInstance, SlotKind, TeamId};
use crate::error::ScheduleParseError;

/// One grid cell: what a team plays in a week and in which slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Fixture id, or the season's BYE sentinel.
    pub fixture: FixtureId,
    /// Broadcast slot.
    pub slot: SlotKind,
}

impl Cell {
    /// Creates a cell.
    pub fn new(fixture: FixtureId, slot: SlotKind) -> Self {
        Self { fixture, slot }
    }
}

/// Team×week grid.
///
/// Row-major: `cells[team * num_weeks + week]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schedule {
    num_teams: usize,
    num_weeks: usize,
    cells: Vec<Cell>,
}

impl Schedule {
    /// Creates a grid filled with `fill`.
    pub fn filled(num_teams: usize, num_weeks: usize, fill: Cell) -> Self {
        Self {
            num_teams,
            num_weeks,
            cells: vec![fill; num_teams * num_weeks],
        }
    }

    /// Creates a grid of BYE/`None` cells shaped for `season`.
    pub fn empty(season: &SeasonInstance) -> Self {
        Self::filled(
            season.num_teams(),
            season.num_weeks(),
            Cell::new(season.bye(), SlotKind::None),
        )
    }

    /// Builds a grid from per-team rows of fixture ids; all slots `None`.
    ///
    /// Rows shorter than `num_weeks` are padded with `pad`, longer rows are
    /// truncated.
    pub fn from_fixture_rows(rows: &[Vec<FixtureId>], num_weeks: usize, pad: FixtureId) -> Self {
        let mut schedule = Self::filled(rows.len(), num_weeks, Cell::new(pad, SlotKind::None));
        for (team, row) in rows.iter().enumerate() {
            for (week, &fixture) in row.iter().take(num_weeks).enumerate() {
                schedule.set_fixture(team, week, fixture);
            }
        }
        schedule
    }

    /// Number of team rows.
    #[inline]
    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    /// Number of week columns.
    #[inline]
    pub fn num_weeks(&self) -> usize {
        self.num_weeks
    }

    #[inline]
    fn index(&self, team: TeamId, week: usize) -> usize {
        debug_assert!(team < self.num_teams && week < self.num_weeks);
        team * self.num_weeks + week
    }

    /// Cell at (team, week).
    #[inline]
    pub fn cell(&self, team: TeamId, week: usize) -> Cell {
        self.cells[self.index(team, week)]
    }

    /// Fixture at (team, week).
    #[inline]
    pub fn fixture(&self, team: TeamId, week: usize) -> FixtureId {
        self.cell(team, week).fixture
    }

    /// Slot at (team, week).
    #[inline]
    pub fn slot(&self, team: TeamId, week: usize) -> SlotKind {
        self.cell(team, week).slot
    }

    /// Overwrites the fixture at (team, week).
    #[inline]
    pub fn set_fixture(&mut self, team: TeamId, week: usize, fixture: FixtureId) {
        let i = self.index(team, week);
        self.cells[i].fixture = fixture;
    }

    /// Overwrites the slot at (team, week).
    #[inline]
    pub fn set_slot(&mut self, team: TeamId, week: usize, slot: SlotKind) {
        let i = self.index(team, week);
        self.cells[i].slot = slot;
    }

    /// Swaps the fixtures (not the slots) of one team between two weeks.
    #[inline]
    pub fn swap_fixtures(&mut self, team: TeamId, week_a: usize, week_b: usize) {
        let a = self.index(team, week_a);
        let b = self.index(team, week_b);
        let tmp = self.cells[a].fixture;
        self.cells[a].fixture = self.cells[b].fixture;
        self.cells[b].fixture = tmp;
    }

    /// Swaps the slots of two teams within one week.
    #[inline]
    pub fn swap_slots(&mut self, week: usize, team_a: TeamId, team_b: TeamId) {
        let a = self.index(team_a, week);
        let b = self.index(team_b, week);
        let tmp = self.cells[a].slot;
        self.cells[a].slot = self.cells[b].slot;
        self.cells[b].slot = tmp;
    }

    /// The cells of one team, week by week.
    pub fn row(&self, team: TeamId) -> &[Cell] {
        let start = team * self.num_weeks;
        &self.cells[start..start + self.num_weeks]
    }

    /// Copies whole rows `[from, to)` from `other` (same shape).
    pub fn copy_rows_from(&mut self, other: &Schedule, from: TeamId, to: TeamId) {
        debug_assert_eq!(self.num_weeks, other.num_weeks);
        let start = from * self.num_weeks;
        let end = to * self.num_weeks;
        self.cells[start..end].copy_from_slice(&other.cells[start..end]);
    }

    /// Slots of one week, team by team.
    pub fn week_slots(&self, week: usize) -> Vec<SlotKind> {
        (0..self.num_teams).map(|t| self.slot(t, week)).collect()
    }

    /// Week in which `team` plays `fixture`, scanning the row.
    pub fn week_of(&self, team: TeamId, fixture: FixtureId) -> Option<usize> {
        self.row(team).iter().position(|c| c.fixture == fixture)
    }

    /// Whether the fixture at (team, week) is mirrored by the opponent.
    ///
    /// BYE cells are never paired.
    pub fn is_paired(&self, season: &SeasonInstance, team: TeamId, week: usize) -> bool {
        let fixture = self.fixture(team, week);
        season
            .opponent_of(team, fixture)
            .is_some_and(|opp| opp < self.num_teams && self.fixture(opp, week) == fixture)
    }

    /// Per-week count of each slot kind.
    pub fn slot_counts(&self, week: usize) -> BTreeMap<SlotKind, usize> {
        let mut counts = BTreeMap::new();
        for team in 0..self.num_teams {
            *counts.entry(self.slot(team, week)).or_insert(0) += 1;
        }
        counts
    }

    /// Number of primetime appearances of a team.
    pub fn primetime_count(&self, team: TeamId) -> usize {
        self.row(team).iter().filter(|c| c.slot.is_primetime()).count()
    }

    /// Bye week of a team (first BYE in the row).
    pub fn bye_week(&self, team: TeamId, bye: FixtureId) -> Option<usize> {
        self.week_of(team, bye)
    }

    /// Flattens the grid row-major over (team, week, [fixture, slot]).
    pub fn to_flat(&self) -> Vec<u32> {
        self.cells
            .iter()
            .flat_map(|c| [c.fixture as u32, c.slot.code()])
            .collect()
    }

    /// Inverse of [`to_flat`](Self::to_flat) for a given season.
    pub fn from_flat(season: &SeasonInstance, values: &[u32]) -> Result<Self, ScheduleParseError> {
        let num_teams = season.num_teams();
        let num_weeks = season.num_weeks();
        let expected = num_teams * num_weeks * 2;
        if values.len() != expected {
            return Err(ScheduleParseError::WrongLength {
                expected,
                found: values.len(),
            });
        }

        let mut cells = Vec::with_capacity(num_teams * num_weeks);
        for (i, pair) in values.chunks_exact(2).enumerate() {
            let (team, week) = (i / num_weeks, i % num_weeks);
            let fixture = pair[0] as usize;
            if fixture > season.bye() {
                return Err(ScheduleParseError::FixtureOutOfRange {
                    team,
                    week,
                    fixture: pair[0],
                });
            }
            let slot = SlotKind::from_code(pair[1]).ok_or(ScheduleParseError::UnknownSlot {
                team,
                week,
                code: pair[1],
            })?;
            cells.push(Cell::new(fixture, slot));
        }

        Ok(Self {
            num_teams,
            num_weeks,
            cells,
        })
    }

    /// Whitespace-separated flat form.
    pub fn to_text(&self) -> String {
        self.to_flat()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parses the whitespace-separated flat form.
    pub fn from_text(season: &SeasonInstance, text: &str) -> Result<Self, ScheduleParseError> {
        let values = text
            .split_whitespace()
            .enumerate()
            .map(|(index, token)| {
                token
                    .parse::<u32>()
                    .map_err(|_| ScheduleParseError::NotAnInteger {
                        index,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_flat(season, &values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::season::tests::round_robin_season;

    fn paired_schedule() -> (SeasonInstance, Schedule) {
        // 4 teams: weeks built from a circle method so every fixture is mirrored
        let season = round_robin_season(4);
        let bye = season.bye();
        let mut s = Schedule::empty(&season);
        let rounds = [[(0, 1), (2, 3)], [(0, 2), (1, 3)], [(0, 3), (1, 2)]];
        for (week, pairs) in rounds.iter().enumerate() {
            for &(a, b) in pairs {
                let f = season
                    .fixtures()
                    .iter()
                    .find(|f| (f.home == a && f.away == b) || (f.home == b && f.away == a))
                    .unwrap()
                    .id;
                s.set_fixture(a, week, f);
                s.set_fixture(b, week, f);
            }
        }
        for team in 0..4 {
            s.set_fixture(team, 3, bye);
        }
        (season, s)
    }

    #[test]
    fn test_accessors_and_pairing() {
        let (season, s) = paired_schedule();
        assert_eq!(s.num_teams(), 4);
        assert_eq!(s.num_weeks(), 4);
        for team in 0..4 {
            for week in 0..3 {
                assert!(s.is_paired(&season, team, week));
            }
            assert!(!s.is_paired(&season, team, 3));
            assert_eq!(s.bye_week(team, season.bye()), Some(3));
        }
    }

    #[test]
    fn test_swaps() {
        let (_, mut s) = paired_schedule();
        let before = s.fixture(0, 0);
        s.swap_fixtures(0, 0, 2);
        assert_eq!(s.fixture(0, 2), before);

        s.set_slot(0, 1, SlotKind::MondayNight);
        s.swap_slots(1, 0, 3);
        assert_eq!(s.slot(3, 1), SlotKind::MondayNight);
        assert_eq!(s.slot(0, 1), SlotKind::None);
    }

    #[test]
    fn test_slot_counts_and_primetime() {
        let (_, mut s) = paired_schedule();
        s.set_slot(0, 0, SlotKind::SundayNight);
        s.set_slot(1, 0, SlotKind::SundayNight);
        let counts = s.slot_counts(0);
        assert_eq!(counts[&SlotKind::SundayNight], 2);
        assert_eq!(counts[&SlotKind::None], 2);
        assert_eq!(s.primetime_count(0), 1);
        assert_eq!(s.primetime_count(2), 0);
    }

    #[test]
    fn test_flat_round_trip() {
        let (season, mut s) = paired_schedule();
        s.set_slot(2, 1, SlotKind::Thanksgiving);
        let flat = s.to_flat();
        assert_eq!(flat.len(), 4 * 4 * 2);
        let back = Schedule::from_text(&season, &s.to_text()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_from_flat_errors() {
        let (season, s) = paired_schedule();
        assert_eq!(
            Schedule::from_flat(&season, &[1, 2, 3]),
            Err(ScheduleParseError::WrongLength {
                expected: 32,
                found: 3
            })
        );

        let mut flat = s.to_flat();
        flat[1] = 42;
        assert!(matches!(
            Schedule::from_flat(&season, &flat),
            Err(ScheduleParseError::UnknownSlot { code: 42, .. })
        ));

        let mut flat = s.to_flat();
        flat[0] = (season.bye() + 1) as u32;
        assert!(matches!(
            Schedule::from_flat(&season, &flat),
            Err(ScheduleParseError::FixtureOutOfRange { team: 0, week: 0, .. })
        ));

        assert!(matches!(
            Schedule::from_text(&season, "1 2 x"),
            Err(ScheduleParseError::NotAnInteger { index: 2, .. })
        ));
    }

    #[test]
    fn test_copy_rows() {
        let (season, a) = paired_schedule();
        let mut b = Schedule::empty(&season);
        b.copy_rows_from(&a, 1, 3);
        assert_eq!(b.row(1), a.row(1));
        assert_eq!(b.row(2), a.row(2));
        assert_ne!(b.row(0), a.row(0));
    }
}
