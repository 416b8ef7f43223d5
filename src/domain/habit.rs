/// Habit entity and related functionality
///
/// This module defines the Habit struct that represents something the user
/// wants to do daily, together with the set of days it was completed.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{current_streak, CalendarDate, DateSet, DomainError, HabitId, StreakSummary};

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// A habit and its completion history
///
/// The habit exclusively owns its completion set; deleting the habit deletes
/// the history with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier, fixed for the lifetime of the habit
    pub id: HabitId,
    /// Display title (e.g., "Morning walk")
    pub title: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Days on which the habit was completed
    pub completions: DateSet,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// Generates a fresh id and stamps the creation time with now.
    pub fn new(title: String, description: Option<String>) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        let description = normalize_description(description);
        Self::validate_description(&description)?;

        Ok(Self {
            id: HabitId::new(),
            title: title.trim().to_string(),
            description,
            created_at: Utc::now(),
            completions: DateSet::new(),
        })
    }

    /// Create a habit from existing data (used when loading from storage)
    ///
    /// This constructor assumes data is already validated.
    pub fn from_existing(
        id: HabitId,
        title: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        completions: DateSet,
    ) -> Self {
        Self {
            id,
            title,
            description,
            created_at,
            completions,
        }
    }

    /// Update the editable fields with validation
    ///
    /// `None` leaves a field unchanged; `Some(None)` clears the description.
    pub fn update(
        &mut self,
        title: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_title) = title {
            Self::validate_title(new_title)?;
        }
        let description = description.map(normalize_description);
        if let Some(ref new_desc) = description {
            Self::validate_description(new_desc)?;
        }

        if let Some(new_title) = title {
            self.title = new_title.trim().to_string();
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }

        Ok(())
    }

    /// Check the editable fields of a whole replacement record
    pub fn validate(&self) -> Result<(), DomainError> {
        Self::validate_title(&self.title)?;
        Self::validate_description(&self.description)
    }

    /// Flip completion for `day`, returning whether it is now completed
    pub fn toggle_completion(&mut self, day: CalendarDate) -> bool {
        self.completions.toggle(day)
    }

    pub fn is_completed(&self, day: CalendarDate) -> bool {
        self.completions.contains(day)
    }

    pub fn current_streak(&self, today: CalendarDate) -> u32 {
        current_streak(&self.completions, today)
    }

    /// Full streak statistics, with the creation day taken in `offset`
    pub fn summary(&self, today: CalendarDate, offset: &FixedOffset) -> StreakSummary {
        let created = CalendarDate::from_instant(&self.created_at, offset);
        StreakSummary::calculate(&self.completions, created, today)
    }

    /// Completion flags for the `count` days ending at `today`, oldest first
    pub fn recent_days(&self, today: CalendarDate, count: u32) -> Vec<(CalendarDate, bool)> {
        (0..count as i64)
            .rev()
            .filter_map(|back| today.add_days(-back))
            .map(|day| (day, self.is_completed(day)))
            .collect()
    }

    // Validation helper methods

    /// Titles must be non-empty after trimming and reasonably short
    fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitTitle(
                "Habit title cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::InvalidHabitTitle(format!(
                "Habit title cannot be longer than {} characters", MAX_TITLE_LEN
            )));
        }

        Ok(())
    }

    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::Validation {
                    message: format!(
                        "Description cannot be longer than {} characters", MAX_DESCRIPTION_LEN
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Blank descriptions are stored as absent
fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
