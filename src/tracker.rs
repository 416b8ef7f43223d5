/// Collaborator-facing facade over the tracker core
///
/// `ClearAirTracker` is constructed once at startup with an explicit storage
/// handle and configuration, then passed to whatever presentation layer drives
/// it. Every command mutates, persists, and only then publishes a
/// `ChangeEvent`, so subscribers always observe persisted state. There is no
/// teardown: each mutation is already durable when its command returns.

use tokio::sync::broadcast;

use crate::analytics::MilestoneProgress;
use crate::config::TrackerConfig;
use crate::domain::{
    month_title, move_month, AppTheme, CalendarDate, CalendarGridBuilder, CalendarGridCell,
    DateSet, Habit, HabitId, ProfileUpdate, StreakSummary, UserProfile,
};
use crate::storage::DocumentStore;
use crate::store::{HabitStore, ProfileStreakTracker, SmokeFreeToggle};
use crate::TrackerError;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Published after a command and its persistence succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    HabitAdded { habit_id: HabitId },
    HabitUpdated { habit_id: HabitId },
    HabitDeleted { habit_id: HabitId },
    HabitDayToggled {
        habit_id: HabitId,
        day: CalendarDate,
        completed: bool,
    },
    SmokeFreeDayToggled {
        day: CalendarDate,
        smoke_free: bool,
        max_streak: u32,
    },
    ProfileSaved,
}

pub struct ClearAirTracker<S: DocumentStore> {
    storage: S,
    config: TrackerConfig,
    habits: HabitStore,
    profile: ProfileStreakTracker,
    calendar: CalendarGridBuilder,
    events: broadcast::Sender<ChangeEvent>,
}

impl<S: DocumentStore> ClearAirTracker<S> {
    /// Load all persisted state from `storage`
    ///
    /// Malformed documents fall back to defaults individually; storage read
    /// failures abort the open.
    pub fn open(storage: S, config: TrackerConfig) -> Result<Self, TrackerError> {
        let habits = HabitStore::load(&storage, config.utc_offset)?;
        let profile = ProfileStreakTracker::load(&storage, config.utc_offset)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            storage,
            config,
            habits,
            profile,
            calendar: CalendarGridBuilder::new(config.week_start),
            events,
        })
    }

    /// Receive a `ChangeEvent` after every successful command
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current calendar day in the configured timezone
    pub fn today(&self) -> CalendarDate {
        CalendarDate::today(&self.config.utc_offset)
    }

    // Queries

    pub fn list_habits(&self) -> &[Habit] {
        self.habits.list()
    }

    pub fn habit(&self, id: &HabitId) -> Result<&Habit, TrackerError> {
        self.habits.get(id).ok_or_else(|| TrackerError::HabitNotFound {
            habit_id: id.to_string(),
        })
    }

    pub fn habit_current_streak(&self, id: &HabitId) -> Result<u32, TrackerError> {
        self.habit_current_streak_on(id, self.today())
    }

    pub fn habit_current_streak_on(
        &self,
        id: &HabitId,
        today: CalendarDate,
    ) -> Result<u32, TrackerError> {
        Ok(self.habit(id)?.current_streak(today))
    }

    pub fn habit_summary(&self, id: &HabitId) -> Result<StreakSummary, TrackerError> {
        Ok(self.habit(id)?.summary(self.today(), &self.config.utc_offset))
    }

    pub fn is_habit_completed(
        &self,
        id: &HabitId,
        day: CalendarDate,
    ) -> Result<bool, TrackerError> {
        Ok(self.habit(id)?.is_completed(day))
    }

    pub fn smoke_free_days(&self) -> &DateSet {
        self.profile.smoke_free_days()
    }

    pub fn is_smoke_free(&self, day: CalendarDate) -> bool {
        self.profile.is_smoke_free(day)
    }

    pub fn smoke_free_current_streak(&self) -> u32 {
        self.smoke_free_current_streak_on(self.today())
    }

    pub fn smoke_free_current_streak_on(&self, today: CalendarDate) -> u32 {
        self.profile.current_streak(today)
    }

    pub fn max_streak(&self) -> u32 {
        self.profile.max_streak()
    }

    pub fn profile(&self) -> &UserProfile {
        self.profile.profile()
    }

    /// Health milestones reached and pending for the current smoke-free streak
    pub fn milestone_progress(&self) -> MilestoneProgress {
        MilestoneProgress::for_streak(self.smoke_free_current_streak())
    }

    pub fn month_grid(&self, anchor: CalendarDate) -> Vec<CalendarGridCell> {
        self.calendar.build_month_grid(anchor)
    }

    pub fn calendar(&self) -> &CalendarGridBuilder {
        &self.calendar
    }

    pub fn move_month(&self, anchor: CalendarDate, delta: i32) -> CalendarDate {
        move_month(anchor, delta)
    }

    pub fn month_title(&self, anchor: CalendarDate) -> String {
        month_title(anchor)
    }

    // Commands

    pub fn add_habit(
        &mut self,
        title: String,
        description: Option<String>,
    ) -> Result<Habit, TrackerError> {
        let habit = self.habits.add(&self.storage, title, description)?;
        self.publish(ChangeEvent::HabitAdded {
            habit_id: habit.id.clone(),
        });
        Ok(habit)
    }

    pub fn update_habit(&mut self, habit: Habit) -> Result<(), TrackerError> {
        let habit_id = habit.id.clone();
        self.habits.update(&self.storage, habit)?;
        self.publish(ChangeEvent::HabitUpdated { habit_id });
        Ok(())
    }

    /// Returns whether a habit was removed; unknown ids publish nothing
    pub fn delete_habit(&mut self, id: &HabitId) -> Result<bool, TrackerError> {
        let removed = self.habits.delete(&self.storage, id)?;
        if removed {
            self.publish(ChangeEvent::HabitDeleted {
                habit_id: id.clone(),
            });
        }
        Ok(removed)
    }

    pub fn toggle_habit_day(
        &mut self,
        id: &HabitId,
        day: CalendarDate,
    ) -> Result<bool, TrackerError> {
        let completed = self.habits.toggle_completion(&self.storage, id, day)?;
        self.publish(ChangeEvent::HabitDayToggled {
            habit_id: id.clone(),
            day,
            completed,
        });
        Ok(completed)
    }

    pub fn toggle_smoke_free_day(
        &mut self,
        day: CalendarDate,
    ) -> Result<SmokeFreeToggle, TrackerError> {
        let outcome = self.profile.toggle_smoke_free_day(&self.storage, day)?;
        self.publish(ChangeEvent::SmokeFreeDayToggled {
            day,
            smoke_free: outcome.smoke_free,
            max_streak: self.profile.max_streak(),
        });
        Ok(outcome)
    }

    pub fn set_theme(&mut self, theme: AppTheme) -> Result<(), TrackerError> {
        self.profile.set_theme(&self.storage, theme)?;
        self.publish(ChangeEvent::ProfileSaved);
        Ok(())
    }

    pub fn save_profile(&mut self, update: ProfileUpdate) -> Result<(), TrackerError> {
        self.profile.save_profile(&self.storage, update)?;
        self.publish(ChangeEvent::ProfileSaved);
        Ok(())
    }

    fn publish(&self, event: ChangeEvent) {
        // No subscribers is not an error
        if self.events.send(event).is_err() {
            tracing::trace!("Change event dropped, no subscribers");
        }
    }
}
