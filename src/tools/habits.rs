/// Habit tools: habit_list, habit_add, habit_update, habit_delete and
/// habit_toggle_day

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{days_text, CalendarDate, Habit};
use crate::storage::DocumentStore;
use crate::tools::{parse_day, parse_habit_id};
use crate::tracker::ClearAirTracker;
use crate::TrackerError;

const DEFAULT_RECENT_DAYS: u32 = 7;
const MAX_RECENT_DAYS: u32 = 31;

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Length of the recent-days strip per habit (default 7, max 31)
    pub recent_days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RecentDay {
    pub date: CalendarDate,
    pub completed: bool,
}

/// One habit with its streak statistics
#[derive(Debug, Serialize)]
pub struct HabitView {
    pub habit_id: String,
    pub title: String,
    pub description: Option<String>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    pub completion_rate: f64,
    pub completed_today: bool,
    pub recent: Vec<RecentDay>,
}

#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitView>,
    pub message: String,
}

pub fn list_habits<S: DocumentStore>(
    tracker: &ClearAirTracker<S>,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, TrackerError> {
    let today = tracker.today();
    let strip = params
        .recent_days
        .unwrap_or(DEFAULT_RECENT_DAYS)
        .clamp(1, MAX_RECENT_DAYS);

    let habits: Vec<HabitView> = tracker
        .list_habits()
        .iter()
        .map(|habit| habit_view(habit, today, strip, tracker))
        .collect();

    let message = if habits.is_empty() {
        "No habits yet. Add your first habit to start a streak!".to_string()
    } else {
        let lines = habits
            .iter()
            .map(|h| {
                let strip: String = h
                    .recent
                    .iter()
                    .map(|d| if d.completed { '●' } else { '○' })
                    .collect();
                format!(
                    "🎯 **{}** {} | 🔥 {} | 🏆 best {} | ✅ {:.0}%\n   ID: {}",
                    h.title,
                    strip,
                    days_text(h.current_streak),
                    days_text(h.longest_streak),
                    h.completion_rate * 100.0,
                    h.habit_id
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("📋 **Habits** ({})\n\n{}", habits.len(), lines)
    };

    Ok(ListHabitsResponse { habits, message })
}

fn habit_view<S: DocumentStore>(
    habit: &Habit,
    today: CalendarDate,
    strip: u32,
    tracker: &ClearAirTracker<S>,
) -> HabitView {
    let summary = habit.summary(today, &tracker.config().utc_offset);
    HabitView {
        habit_id: habit.id.to_string(),
        title: habit.title.clone(),
        description: habit.description.clone(),
        current_streak: summary.current_streak,
        longest_streak: summary.longest_streak,
        total_completions: summary.total_completions,
        completion_rate: summary.completion_rate,
        completed_today: habit.is_completed(today),
        recent: habit
            .recent_days(today, strip)
            .into_iter()
            .map(|(date, completed)| RecentDay { date, completed })
            .collect(),
    }
}

/// Parameters for adding a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddHabitParams {
    /// Habit title, 1 to 100 characters
    pub title: String,
    /// Optional description, up to 500 characters
    pub description: Option<String>,
}

/// Response from add, update and delete
#[derive(Debug, Serialize)]
pub struct HabitChangeResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

pub fn add_habit<S: DocumentStore>(
    tracker: &mut ClearAirTracker<S>,
    params: AddHabitParams,
) -> Result<HabitChangeResponse, TrackerError> {
    let habit = tracker.add_habit(params.title, params.description)?;

    Ok(HabitChangeResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("✅ Added habit '{}'! Ready to start your streak!", habit.title),
    })
}

/// Parameters for editing a habit; omitted fields stay unchanged
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    pub habit_id: String,
    pub title: Option<String>,
    /// New description; an empty string clears it
    pub description: Option<String>,
}

pub fn update_habit<S: DocumentStore>(
    tracker: &mut ClearAirTracker<S>,
    params: UpdateHabitParams,
) -> Result<HabitChangeResponse, TrackerError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = tracker.habit(&habit_id)?.clone();
    habit.update(params.title, params.description.map(Some))?;

    let title = habit.title.clone();
    tracker.update_habit(habit)?;

    Ok(HabitChangeResponse {
        success: true,
        habit_id: habit_id.to_string(),
        message: format!("✏️ Updated habit '{}'", title),
    })
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    pub habit_id: String,
}

/// Deleting an id that does not exist succeeds with `success: false`
pub fn delete_habit<S: DocumentStore>(
    tracker: &mut ClearAirTracker<S>,
    params: DeleteHabitParams,
) -> Result<HabitChangeResponse, TrackerError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let removed = tracker.delete_habit(&habit_id)?;

    let message = if removed {
        "🗑️ Deleted habit and its history".to_string()
    } else {
        format!("No habit with ID {}, nothing deleted", habit_id)
    };
    Ok(HabitChangeResponse {
        success: removed,
        habit_id: habit_id.to_string(),
        message,
    })
}

/// Parameters for toggling one habit day
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleHabitDayParams {
    pub habit_id: String,
    /// Day to toggle (YYYY-MM-DD or RFC 3339); defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleHabitDayResponse {
    pub habit_id: String,
    pub date: CalendarDate,
    pub completed: bool,
    pub current_streak: u32,
    pub message: String,
}

pub fn toggle_habit_day<S: DocumentStore>(
    tracker: &mut ClearAirTracker<S>,
    params: ToggleHabitDayParams,
) -> Result<ToggleHabitDayResponse, TrackerError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = parse_day(tracker, params.date.as_deref())?;

    let completed = tracker.toggle_habit_day(&habit_id, date)?;
    let current_streak = tracker.habit_current_streak(&habit_id)?;

    let message = if completed {
        format!("🔥 Marked {} done! Current streak: {}", date, days_text(current_streak))
    } else {
        format!("↩️ Unmarked {}. Current streak: {}", date, days_text(current_streak))
    };
    Ok(ToggleHabitDayResponse {
        habit_id: habit_id.to_string(),
        date,
        completed,
        current_streak,
        message,
    })
}
