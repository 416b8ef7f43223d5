/// MCP tools over the tracker facade
///
/// Each tool takes typed parameters (deserialized from the tool call
/// arguments, with a JSON schema derived for `tools/list`) and returns a
/// serializable response carrying a human-readable `message`.

pub mod calendar;
pub mod habits;
pub mod profile;
pub mod relaxation;
pub mod smoke_free;

pub use calendar::*;
pub use habits::*;
pub use profile::*;
pub use relaxation::*;
pub use smoke_free::*;

use crate::domain::{CalendarDate, DomainError, HabitId};
use crate::storage::DocumentStore;
use crate::tracker::ClearAirTracker;

/// Parse a habit id argument, rejecting blanks before the UUID check
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::InvalidHabitId("Habit ID cannot be empty".to_string()));
    }
    HabitId::parse(raw.trim())
}

/// Parse an optional date argument, defaulting to today in the tracker's zone
pub(crate) fn parse_day<S: DocumentStore>(
    tracker: &ClearAirTracker<S>,
    raw: Option<&str>,
) -> Result<CalendarDate, DomainError> {
    match raw {
        Some(s) if !s.trim().is_empty() => CalendarDate::parse(s, &tracker.config().utc_offset),
        _ => Ok(tracker.today()),
    }
}
