/// Smoke-free days and the profile's best-streak cache
///
/// `max_streak` on the profile is a cache of the smoke-free set's historical
/// best. It is recomputed after every toggle and only ever raised, so removing
/// days later never lowers it. A profile change whose write failed stays
/// pending and rides along with the next successful write.

use chrono::FixedOffset;

use crate::domain::{
    current_streak, max_streak, AppTheme, CalendarDate, DateSet, ProfileUpdate, UserProfile,
};
use crate::storage::{documents, DocumentStore, StorageError};
use crate::TrackerError;

/// Outcome of toggling one smoke-free day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmokeFreeToggle {
    /// Whether the day is marked smoke-free afterwards
    pub smoke_free: bool,
    /// Whether this toggle set a new best streak
    pub max_streak_raised: bool,
}

/// Owns the user profile and the smoke-free day set
#[derive(Debug, Clone)]
pub struct ProfileStreakTracker {
    profile: UserProfile,
    days: DateSet,
    /// In-memory profile differs from the stored one
    profile_unsaved: bool,
}

impl ProfileStreakTracker {
    pub fn new(profile: UserProfile, days: DateSet) -> Self {
        Self {
            profile,
            days,
            profile_unsaved: false,
        }
    }

    /// Load profile and smoke-free days, reconciling a stale best streak
    ///
    /// A stored best below the longest run in the stored days means the cache
    /// was never computed (fresh profile, reset install) or its write was
    /// lost; it is raised and written back. `offset` only applies to day
    /// instants that are not stored at UTC midnight.
    pub fn load<S: DocumentStore + ?Sized>(
        store: &S,
        offset: FixedOffset,
    ) -> Result<Self, StorageError> {
        let profile = documents::load_profile(store)?;
        let days = documents::load_smoke_free_days(store, &offset)?;
        let mut tracker = Self::new(profile, days);

        let stored = tracker.profile.max_streak;
        if tracker.profile.raise_max_streak(max_streak(&tracker.days)) {
            documents::save_profile(store, &tracker.profile)?;
            tracing::info!(
                "Reconciled max streak from {} to {} using {} stored day(s)",
                stored,
                tracker.profile.max_streak,
                tracker.days.len()
            );
        }

        tracing::info!(
            "Loaded profile with {} smoke-free day(s), max streak {}",
            tracker.days.len(),
            tracker.profile.max_streak
        );
        Ok(tracker)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn smoke_free_days(&self) -> &DateSet {
        &self.days
    }

    pub fn is_smoke_free(&self, day: CalendarDate) -> bool {
        self.days.contains(day)
    }

    /// Always recomputed from the live day set
    pub fn current_streak(&self, today: CalendarDate) -> u32 {
        current_streak(&self.days, today)
    }

    /// The cached best streak
    pub fn max_streak(&self) -> u32 {
        self.profile.max_streak
    }

    /// Toggle one day and refresh the best-streak cache
    ///
    /// The day set is always written; the profile is written in the same
    /// transaction when the best streak went up or an earlier profile write
    /// failed. On a write error the toggle stays applied in memory.
    pub fn toggle_smoke_free_day<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        day: CalendarDate,
    ) -> Result<SmokeFreeToggle, TrackerError> {
        let smoke_free = self.days.toggle(day);
        let max_streak_raised = self.profile.raise_max_streak(max_streak(&self.days));
        self.profile_unsaved |= max_streak_raised;

        let changed_profile = self.profile_unsaved.then_some(&self.profile);
        documents::save_smoke_free_state(store, &self.days, changed_profile)?;
        self.profile_unsaved = false;

        tracing::debug!(
            "Smoke-free {}: {} (max streak {}{})",
            day,
            smoke_free,
            self.profile.max_streak,
            if max_streak_raised { ", new record" } else { "" }
        );
        Ok(SmokeFreeToggle {
            smoke_free,
            max_streak_raised,
        })
    }

    /// Overwrite the editable profile fields
    pub fn save_profile<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        update: ProfileUpdate,
    ) -> Result<(), TrackerError> {
        self.profile.apply(update)?;
        self.persist_profile(store)?;
        tracing::debug!("Saved profile for '{}'", self.profile.name);
        Ok(())
    }

    pub fn set_theme<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        theme: AppTheme,
    ) -> Result<(), TrackerError> {
        self.profile.theme = theme;
        self.persist_profile(store)?;
        tracing::debug!("Theme set to {}", theme.display_name());
        Ok(())
    }

    fn persist_profile<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<(), StorageError> {
        self.profile_unsaved = true;
        documents::save_profile(store, &self.profile)?;
        self.profile_unsaved = false;
        Ok(())
    }
}
