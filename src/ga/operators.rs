//! Genetic operators on the schedule grid.
//!
//! Operators only rearrange cells; they never consult the season. The
//! offspring they produce are usually inconsistent and must be passed
//! through [`ScheduleRepairer`](crate::repair::ScheduleRepairer).
//!
//! # Crossover
//! A random team range `[m, n)` is exchanged between the parents as whole
//! rows. Each week's slot column is then reindexed OX1-style so the child
//! keeps its own parent's slot multiset:
//!
//! 1. The slots of the exchanged rows stay where they are.
//! 2. The own parent's column, minus one occurrence of each exchanged slot,
//!    fills the remaining rows in order.
//!
//! # Mutation
//! One team's fixtures are swapped between two distinct weeks.
//!
//! # Usage
//!
//! ```
//! use gridiron_schedule::ga::operators::crossover_with_cut;
//! use gridiron_schedule::models::{Cell, Schedule, SlotKind};
//!
//! let a = Schedule::filled(3, 2, Cell::new(0, SlotKind::None));
//! let b = Schedule::filled(3, 2, Cell::new(1, SlotKind::None));
//! let (c1, c2) = crossover_with_cut(&a, &b, 1, 2);
//! assert_eq!(c1.fixture(1, 0), 1);
//! assert_eq!(c2.fixture(1, 0), 0);
//! ```

use rand::Rng;

use crate::models::{Schedule, SlotKind, TeamId};

/// Row-cut crossover with a random non-empty team range.
///
/// Parents with fewer than two teams are returned unchanged.
pub fn row_cut_crossover<R: Rng>(p1: &Schedule, p2: &Schedule, rng: &mut R) -> (Schedule, Schedule) {
    let n = p1.num_teams();
    if n < 2 {
        return (p1.clone(), p2.clone());
    }
    let a = rng.random_range(0..=n);
    let mut b = rng.random_range(0..n);
    if b >= a {
        b += 1;
    }
    crossover_with_cut(p1, p2, a.min(b), a.max(b))
}

/// Row-cut crossover exchanging team rows `[from, to)`.
pub fn crossover_with_cut(p1: &Schedule, p2: &Schedule, from: TeamId, to: TeamId) -> (Schedule, Schedule) {
    let to = to.min(p1.num_teams());
    let from = from.min(to);

    let mut c1 = p1.clone();
    c1.copy_rows_from(p2, from, to);
    let mut c2 = p2.clone();
    c2.copy_rows_from(p1, from, to);

    for week in 0..p1.num_weeks() {
        reindex_week_slots(&mut c1, p1, week, from, to);
        reindex_week_slots(&mut c2, p2, week, from, to);
    }
    (c1, c2)
}

/// OX1 reindexing of one week column of `child` against its own parent.
///
/// Rows `[from, to)` keep their slots; the other rows take what is left of
/// `own`'s column, in order. If the exchanged rows hold a slot the own
/// column lacks, the trailing rows fall back to `None`.
pub fn reindex_week_slots(child: &mut Schedule, own: &Schedule, week: usize, from: TeamId, to: TeamId) {
    let mut pool = own.week_slots(week);
    for team in from..to {
        let kept = child.slot(team, week);
        if let Some(pos) = pool.iter().position(|&s| s == kept) {
            pool.remove(pos);
        }
    }

    let mut rest = pool.into_iter();
    for team in (0..from).chain(to..child.num_teams()) {
        child.set_slot(team, week, rest.next().unwrap_or(SlotKind::None));
    }
}

/// Swap mutation: exchanges one team's fixtures between two distinct weeks.
///
/// Returns the mutated team so the caller can run a targeted repair.
pub fn swap_mutation<R: Rng>(schedule: &mut Schedule, rng: &mut R) -> TeamId {
    let team = rng.random_range(0..schedule.num_teams().max(1));
    let weeks = schedule.num_weeks();
    if weeks < 2 || schedule.num_teams() == 0 {
        return team;
    }
    let a = rng.random_range(0..weeks);
    let mut b = rng.random_range(0..weeks - 1);
    if b >= a {
        b += 1;
    }
    schedule.swap_fixtures(team, a, b);
    team
}
