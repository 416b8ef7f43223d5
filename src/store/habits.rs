/// Habit collection with write-all-on-change persistence

use chrono::FixedOffset;

use crate::domain::{CalendarDate, Habit, HabitId};
use crate::storage::{documents, DocumentStore, StorageError};
use crate::TrackerError;

/// Owns every habit in insertion order
#[derive(Debug, Clone, Default)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

impl HabitStore {
    /// Empty store, nothing persisted yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted collection
    ///
    /// A malformed habit document loads as an empty collection. `offset` only
    /// applies to completion instants that are not stored at UTC midnight.
    pub fn load<S: DocumentStore + ?Sized>(
        store: &S,
        offset: FixedOffset,
    ) -> Result<Self, StorageError> {
        let habits = documents::load_habits(store, &offset)?;
        tracing::info!("Loaded {} habit(s)", habits.len());
        Ok(Self { habits })
    }

    pub fn list(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| &h.id == id)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Create and persist a new habit, returning a copy of it
    pub fn add<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        title: String,
        description: Option<String>,
    ) -> Result<Habit, TrackerError> {
        let habit = Habit::new(title, description)?;
        self.habits.push(habit.clone());
        self.persist(store)?;

        tracing::debug!("Created habit: {} ({})", habit.title, habit.id);
        Ok(habit)
    }

    /// Replace the habit with the same id
    pub fn update<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        habit: Habit,
    ) -> Result<(), TrackerError> {
        habit.validate()?;
        let slot = self
            .habits
            .iter_mut()
            .find(|h| h.id == habit.id)
            .ok_or_else(|| TrackerError::HabitNotFound {
                habit_id: habit.id.to_string(),
            })?;

        tracing::debug!("Updated habit: {} ({})", habit.title, habit.id);
        *slot = habit;
        self.persist(store)?;
        Ok(())
    }

    /// Remove a habit and its history
    ///
    /// Deleting an unknown id is a no-op and writes nothing. Returns whether a
    /// habit was removed.
    pub fn delete<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        id: &HabitId,
    ) -> Result<bool, TrackerError> {
        let before = self.habits.len();
        self.habits.retain(|h| &h.id != id);
        if self.habits.len() == before {
            tracing::debug!("Delete ignored, no habit {}", id);
            return Ok(false);
        }

        self.persist(store)?;
        tracing::debug!("Deleted habit: {}", id);
        Ok(true)
    }

    /// Flip completion of `day` for one habit
    ///
    /// Returns whether the day is completed afterwards.
    pub fn toggle_completion<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        id: &HabitId,
        day: CalendarDate,
    ) -> Result<bool, TrackerError> {
        let habit = self
            .habits
            .iter_mut()
            .find(|h| &h.id == id)
            .ok_or_else(|| TrackerError::HabitNotFound {
                habit_id: id.to_string(),
            })?;

        let completed = habit.toggle_completion(day);
        self.persist(store)?;

        tracing::debug!("Habit {} on {}: completed={}", id, day, completed);
        Ok(completed)
    }

    fn persist<S: DocumentStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        documents::save_habits(store, &self.habits)
    }
}
