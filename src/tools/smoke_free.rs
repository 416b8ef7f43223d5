/// Smoke-free tools: smoke_free_toggle_day and smoke_free_status

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::MilestoneProgress;
use crate::domain::{days_text, CalendarDate};
use crate::storage::DocumentStore;
use crate::tools::parse_day;
use crate::tracker::ClearAirTracker;
use crate::TrackerError;

/// Parameters for toggling a smoke-free day
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ToggleSmokeFreeDayParams {
    /// Day to toggle (YYYY-MM-DD or RFC 3339); defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleSmokeFreeDayResponse {
    pub date: CalendarDate,
    pub smoke_free: bool,
    pub current_streak: u32,
    pub max_streak: u32,
    pub max_streak_raised: bool,
    pub message: String,
}

pub fn toggle_smoke_free_day<S: DocumentStore>(
    tracker: &mut ClearAirTracker<S>,
    params: ToggleSmokeFreeDayParams,
) -> Result<ToggleSmokeFreeDayResponse, TrackerError> {
    let date = parse_day(tracker, params.date.as_deref())?;
    let outcome = tracker.toggle_smoke_free_day(date)?;

    let current_streak = tracker.smoke_free_current_streak();
    let max_streak = tracker.max_streak();

    let mut message = if outcome.smoke_free {
        format!("🚭 {} marked smoke-free. Current streak: {}", date, days_text(current_streak))
    } else {
        format!("↩️ {} unmarked. Current streak: {}", date, days_text(current_streak))
    };
    if outcome.max_streak_raised {
        message.push_str(&format!("\n🏆 New record: {}!", days_text(max_streak)));
    }

    Ok(ToggleSmokeFreeDayResponse {
        date,
        smoke_free: outcome.smoke_free,
        current_streak,
        max_streak,
        max_streak_raised: outcome.max_streak_raised,
        message,
    })
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SmokeFreeStatusParams {
    /// Include the health milestone ladder (default true)
    pub include_milestones: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SmokeFreeStatusResponse {
    pub current_streak: u32,
    pub max_streak: u32,
    pub smoke_free_today: bool,
    pub total_days: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestones: Option<MilestoneProgress>,
    pub message: String,
}

pub fn smoke_free_status<S: DocumentStore>(
    tracker: &ClearAirTracker<S>,
    params: SmokeFreeStatusParams,
) -> Result<SmokeFreeStatusResponse, TrackerError> {
    let today = tracker.today();
    let current_streak = tracker.smoke_free_current_streak();
    let max_streak = tracker.max_streak();
    let smoke_free_today = tracker.is_smoke_free(today);

    let mut message = format!(
        "🚭 **Smoke-free status**\n- Current streak: {}\n- Best streak: {}\n- Today: {}",
        days_text(current_streak),
        days_text(max_streak),
        if smoke_free_today { "smoke-free ✅" } else { "not marked yet" }
    );

    let milestones = if params.include_milestones.unwrap_or(true) {
        let progress = tracker.milestone_progress();
        if let Some(latest) = progress.latest() {
            message.push_str(&format!(
                "\n\n{} **{}**: {}",
                latest.icon, latest.title, latest.description
            ));
        }
        message.push_str(&format!("\n{}", progress.headline()));
        Some(progress)
    } else {
        None
    };

    Ok(SmokeFreeStatusResponse {
        current_streak,
        max_streak,
        smoke_free_today,
        total_days: tracker.smoke_free_days().len(),
        milestones,
        message,
    })
}
