/// In-memory owners of tracker state
///
/// `HabitStore` owns the habit collection and `ProfileStreakTracker` owns the
/// profile and smoke-free days. Both mutate in memory first and then write the
/// affected documents through a `DocumentStore` passed in by the caller, so a
/// failed write leaves the new state visible and reports the error.

pub mod habits;
pub mod smoke_free;

pub use habits::HabitStore;
pub use smoke_free::{ProfileStreakTracker, SmokeFreeToggle};
