//! Season scheduling domain models.
//!
//! Provides the static season description and the grid-encoded schedule
//! that the optimizer evolves.
//!
//! # Domain Mappings
//!
//! | gridiron-schedule | League | Grid encoding |
//! |-------------------|--------|---------------|
//! | Team | Franchise | Row |
//! | Fixture | Game | Cell value (layer 0) |
//! | SlotKind | Broadcast window | Cell value (layer 1) |
//! | Week | Round | Column |

mod schedule;
pub(crate) mod season;

pub use schedule::{Cell, Schedule};
pub use season::{
    DEFAULT_NUM_WEEKS, DEFAULT_WEEKS_WITHOUT_FIXED_SLOTS, Fixture, FixtureId, SeasonBuilder,
    SeasonInstance, SlotKind, Stadium, StadiumId, Team, TeamId, TimeZoneBand, Weekday,
};
