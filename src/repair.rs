//! Structural repair of schedules.
//!
//! Genetic operators work on the raw grid and routinely break the pairing
//! between a fixture's two teams. [`ScheduleRepairer`] restores it:
//!
//! - **Row repair** moves fixture ids inside a team's row. An unpaired cell
//!   starts a displacement chain: the opponent swaps the fixture into the
//!   week, which displaces another fixture, whose opponent is visited next.
//! - **Column repair** moves slots inside a week column so both teams of a
//!   fixture carry the same slot, then moves primetime slots off byes.
//!
//! Neither phase adds or removes anything: row multisets and per-week slot
//! multisets are invariant. Both are total; what cannot be fixed is left in
//! place, reported in [`RepairReport::unresolved`], and scored by the rules.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{FixtureId, Schedule, SeasonInstance, SlotKind, TeamId};

/// Full row-repair passes before giving up.
pub const MAX_REPAIR_PASSES: usize = 3;

/// Counters of one repair call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Fixture and slot swaps performed.
    pub swaps: usize,
    /// Row-repair passes run.
    pub passes: usize,
    /// Unpaired cells plus mismatched fixture slots left behind.
    pub unresolved: usize,
}

impl RepairReport {
    /// Whether the schedule came out structurally consistent.
    pub fn is_clean(&self) -> bool {
        self.unresolved == 0
    }
}

/// Repairs schedules of one season.
#[derive(Debug, Clone)]
pub struct ScheduleRepairer<'a> {
    season: &'a SeasonInstance,
    max_passes: usize,
}

impl<'a> ScheduleRepairer<'a> {
    /// Creates a repairer running up to [`MAX_REPAIR_PASSES`] passes.
    pub fn new(season: &'a SeasonInstance) -> Self {
        Self {
            season,
            max_passes: MAX_REPAIR_PASSES,
        }
    }

    /// Overrides the number of passes (at least one).
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes.max(1);
        self
    }

    /// The season this repairer works on.
    pub fn season(&self) -> &'a SeasonInstance {
        self.season
    }

    /// Creates a random schedule.
    ///
    /// Each row is a shuffle of the team's fixtures plus one BYE. After row
    /// repair, the week's consistent fixture pairs are shuffled and receive
    /// the template slots in order; template slots left over go to leftover
    /// teams two at a time. Everyone else plays in the `None` slot.
    pub fn random_schedule<R: Rng>(&self, rng: &mut R) -> Schedule {
        let season = self.season;
        let bye = season.bye();
        let mut schedule = Schedule::empty(season);

        for team in season.teams() {
            let mut row: Vec<FixtureId> = team.fixture_ids.clone();
            row.push(bye);
            row.shuffle(rng);
            for (week, fixture) in row.into_iter().take(season.num_weeks()).enumerate() {
                schedule.set_fixture(team.id, week, fixture);
            }
        }

        let mut report = RepairReport::default();
        self.repair_rows(&mut schedule, 0, &mut report);
        for week in 0..schedule.num_weeks() {
            self.fill_week_slots(&mut schedule, week, rng);
        }

        tracing::trace!(
            swaps = report.swaps,
            unresolved = report.unresolved,
            "random schedule"
        );
        schedule
    }

    /// Full repair: row repair from the first team, then column repair.
    pub fn repair(&self, schedule: &mut Schedule) -> RepairReport {
        self.repair_from_team(schedule, 0)
    }

    /// Row repair whose first pass starts at `team`, then column repair.
    ///
    /// Used after a mutation touched a single row.
    pub fn repair_from_team(&self, schedule: &mut Schedule, team: TeamId) -> RepairReport {
        let mut report = RepairReport::default();
        self.repair_rows(schedule, team, &mut report);
        self.repair_columns(schedule, &mut report);
        tracing::trace!(
            start = team,
            swaps = report.swaps,
            passes = report.passes,
            unresolved = report.unresolved,
            "schedule repaired"
        );
        report
    }

    // ---- rows ----

    fn repair_rows(&self, schedule: &mut Schedule, start: TeamId, report: &mut RepairReport) {
        let num_teams = schedule.num_teams();
        let num_weeks = schedule.num_weeks();
        let start = start.min(num_teams);
        let max_steps = num_teams * num_weeks;

        let mut index: Vec<HashMap<FixtureId, usize>> = (0..num_teams)
            .map(|t| {
                schedule
                    .row(t)
                    .iter()
                    .enumerate()
                    .map(|(w, c)| (c.fixture, w))
                    .collect()
            })
            .collect();

        for _ in 0..self.max_passes {
            report.passes += 1;
            let mut moved = 0;
            for team in (start..num_teams).chain(0..start) {
                for week in 0..num_weeks {
                    moved += self.follow_chain(schedule, &mut index, team, week, max_steps);
                }
            }
            report.swaps += moved;
            if moved == 0 {
                break;
            }
        }

        let bye = self.season.bye();
        report.unresolved += (0..num_teams)
            .flat_map(|t| (0..num_weeks).map(move |w| (t, w)))
            .filter(|&(t, w)| schedule.fixture(t, w) != bye && !schedule.is_paired(self.season, t, w))
            .count();
    }

    /// Walks one displacement chain from (team, week). Returns swaps made.
    fn follow_chain(
        &self,
        schedule: &mut Schedule,
        index: &mut [HashMap<FixtureId, usize>],
        team: TeamId,
        week: usize,
        max_steps: usize,
    ) -> usize {
        let bye = self.season.bye();
        let origin = schedule.fixture(team, week);
        let (mut team, mut week) = (team, week);
        let mut swaps = 0;

        for _ in 0..max_steps {
            let fixture = schedule.fixture(team, week);
            if fixture == bye || schedule.is_paired(self.season, team, week) {
                break;
            }
            let Some(opp) = self
                .season
                .opponent_of(team, fixture)
                .filter(|&o| o < schedule.num_teams())
            else {
                break;
            };
            let Some(&other) = index[opp].get(&fixture) else {
                break;
            };
            if other == week || schedule.fixture(opp, other) != fixture {
                break;
            }

            let displaced = schedule.fixture(opp, week);
            schedule.swap_fixtures(opp, week, other);
            index[opp].insert(fixture, week);
            index[opp].insert(displaced, other);
            swaps += 1;

            if displaced == origin {
                tracing::trace!(team, week, "chain returned to its starting fixture");
                break;
            }
            team = opp;
            week = other;
        }
        swaps
    }

    // ---- columns ----

    fn repair_columns(&self, schedule: &mut Schedule, report: &mut RepairReport) {
        for week in 0..schedule.num_weeks() {
            let mut holders = SlotHolders::new(schedule, week);

            for _ in 0..self.max_passes {
                let mut moved = 0;
                for team in 0..schedule.num_teams() {
                    moved += self.align_pair(schedule, week, team, &mut holders);
                }
                report.swaps += moved;
                if moved == 0 {
                    break;
                }
            }

            report.swaps += self.sweep_byes(schedule, week, &mut holders);
            report.unresolved += (0..schedule.num_teams())
                .filter(|&t| self.is_mismatched(schedule, week, t))
                .count()
                / 2;
        }
    }

    /// Gives both teams of `team`'s fixture the same slot, if possible.
    fn align_pair(
        &self,
        schedule: &mut Schedule,
        week: usize,
        team: TeamId,
        holders: &mut SlotHolders,
    ) -> usize {
        if !self.is_mismatched(schedule, week, team) {
            return 0;
        }
        let Some(opp) = self.season.opponent_of(team, schedule.fixture(team, week)) else {
            return 0;
        };
        let mine = schedule.slot(team, week);
        let theirs = schedule.slot(opp, week);

        if let Some(h) = self.pick_holder(schedule, week, holders, mine, team, opp) {
            holders.swap(schedule, week, opp, h);
            1
        } else if let Some(h) = self.pick_holder(schedule, week, holders, theirs, team, opp) {
            holders.swap(schedule, week, team, h);
            1
        } else {
            0
        }
    }

    /// A holder of `slot` other than `a` and `b`, preferring teams whose
    /// slot can change without breaking a consistent pair.
    fn pick_holder(
        &self,
        schedule: &Schedule,
        week: usize,
        holders: &SlotHolders,
        slot: SlotKind,
        a: TeamId,
        b: TeamId,
    ) -> Option<TeamId> {
        let mut fallback = None;
        for h in holders.of(slot).filter(|&h| h != a && h != b) {
            if self.is_free(schedule, week, h) {
                return Some(h);
            }
            if fallback.is_none() {
                fallback = Some(h);
            }
        }
        fallback
    }

    fn is_free(&self, schedule: &Schedule, week: usize, team: TeamId) -> bool {
        schedule.fixture(team, week) == self.season.bye()
            || !schedule.is_paired(self.season, team, week)
            || self.is_mismatched(schedule, week, team)
    }

    fn is_mismatched(&self, schedule: &Schedule, week: usize, team: TeamId) -> bool {
        if !schedule.is_paired(self.season, team, week) {
            return false;
        }
        self.season
            .opponent_of(team, schedule.fixture(team, week))
            .is_some_and(|opp| schedule.slot(opp, week) != schedule.slot(team, week))
    }

    /// Moves primetime slots held by two byes onto a `None`/`None` pair.
    fn sweep_byes(&self, schedule: &mut Schedule, week: usize, holders: &mut SlotHolders) -> usize {
        let bye = self.season.bye();
        let mut swaps = 0;
        loop {
            let on_byes = SlotKind::ALL
                .into_iter()
                .filter(|k| k.is_primetime())
                .find_map(|kind| {
                    let mut byes = holders
                        .of(kind)
                        .filter(|&t| schedule.fixture(t, week) == bye);
                    Some((byes.next()?, byes.next()?))
                });
            let Some((b1, b2)) = on_byes else {
                break;
            };
            let Some((x, y)) = self.idle_pair(schedule, week) else {
                break;
            };
            holders.swap(schedule, week, b1, x);
            holders.swap(schedule, week, b2, y);
            swaps += 2;
        }
        swaps
    }

    /// A consistently paired fixture whose teams both hold `None`.
    fn idle_pair(&self, schedule: &Schedule, week: usize) -> Option<(TeamId, TeamId)> {
        (0..schedule.num_teams()).find_map(|t| {
            if schedule.slot(t, week) != SlotKind::None || !schedule.is_paired(self.season, t, week) {
                return None;
            }
            let opp = self.season.opponent_of(t, schedule.fixture(t, week))?;
            (schedule.slot(opp, week) == SlotKind::None).then_some((t, opp))
        })
    }

    fn fill_week_slots<R: Rng>(&self, schedule: &mut Schedule, week: usize, rng: &mut R) {
        let num_teams = schedule.num_teams();
        let mut taken = vec![false; num_teams];
        let mut pairs = Vec::new();

        for team in 0..num_teams {
            if taken[team] || !schedule.is_paired(self.season, team, week) {
                continue;
            }
            if let Some(opp) = self.season.opponent_of(team, schedule.fixture(team, week)) {
                taken[team] = true;
                taken[opp] = true;
                pairs.push((team, opp));
            }
        }
        pairs.shuffle(rng);

        let leftover: Vec<TeamId> = (0..num_teams).filter(|&t| !taken[t]).collect();
        let leftover_pairs = leftover.chunks_exact(2).map(|c| (c[0], c[1]));

        for team in 0..num_teams {
            schedule.set_slot(team, week, SlotKind::None);
        }
        let template = self.season.template_slots_for_week(week);
        for (slot, (a, b)) in template.into_iter().zip(pairs.into_iter().chain(leftover_pairs)) {
            schedule.set_slot(a, week, slot);
            schedule.set_slot(b, week, slot);
        }
    }
}

/// Slot → holders lookup for one week column, kept in sync with swaps.
struct SlotHolders {
    by_slot: BTreeMap<SlotKind, BTreeSet<TeamId>>,
}

impl SlotHolders {
    fn new(schedule: &Schedule, week: usize) -> Self {
        let mut by_slot: BTreeMap<SlotKind, BTreeSet<TeamId>> = BTreeMap::new();
        for team in 0..schedule.num_teams() {
            by_slot.entry(schedule.slot(team, week)).or_default().insert(team);
        }
        Self { by_slot }
    }

    fn of(&self, slot: SlotKind) -> impl Iterator<Item = TeamId> + '_ {
        self.by_slot.get(&slot).into_iter().flatten().copied()
    }

    fn swap(&mut self, schedule: &mut Schedule, week: usize, a: TeamId, b: TeamId) {
        let (sa, sb) = (schedule.slot(a, week), schedule.slot(b, week));
        if sa == sb {
            return;
        }
        schedule.swap_slots(week, a, b);
        if let Some(set) = self.by_slot.get_mut(&sa) {
            set.remove(&a);
            set.insert(b);
        }
        if let Some(set) = self.by_slot.get_mut(&sb) {
            set.remove(&b);
            set.insert(a);
        }
    }
}
