/// Profile tools: profile_get, profile_save and theme_set

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{days_text, AppTheme, CalendarDate, Gender, ProfileUpdate, UserProfile};
use crate::storage::DocumentStore;
use crate::tracker::ClearAirTracker;
use crate::TrackerError;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ProfileGetParams {}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub message: String,
}

pub fn get_profile<S: DocumentStore>(
    tracker: &ClearAirTracker<S>,
    _params: ProfileGetParams,
) -> Result<ProfileResponse, TrackerError> {
    let profile = tracker.profile().clone();
    let message = describe(&profile, tracker.config().utc_offset);
    Ok(ProfileResponse { profile, message })
}

/// Profile fields to change; omitted fields keep their current value
///
/// `gender`, `age` and `quit_date` are cleared by passing null, or an empty
/// string for the text fields.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ProfileSaveParams {
    pub name: Option<String>,
    /// male, female or other
    #[serde(default, deserialize_with = "present")]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Option<u32>>,
    /// Quit date (YYYY-MM-DD or RFC 3339)
    #[serde(default, deserialize_with = "present")]
    pub quit_date: Option<Option<String>>,
    /// system, light or dark
    pub theme: Option<String>,
}

/// Keeps an explicit null apart from an omitted field
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A blank string means the same as null
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn save_profile<S: DocumentStore>(
    tracker: &mut ClearAirTracker<S>,
    params: ProfileSaveParams,
) -> Result<ProfileResponse, TrackerError> {
    let offset = tracker.config().utc_offset;
    let mut update = ProfileUpdate::from_profile(tracker.profile());

    if let Some(name) = params.name {
        update.name = name.trim().to_string();
    }
    if let Some(gender) = params.gender {
        update.gender = non_blank(gender).map(|g| Gender::parse(&g)).transpose()?;
    }
    if let Some(age) = params.age {
        update.age = age;
    }
    if let Some(quit_date) = params.quit_date {
        update.quit_date = non_blank(quit_date)
            .map(|d| CalendarDate::parse(&d, &offset))
            .transpose()?
            .map(|day| day.to_stored_instant());
    }
    if let Some(theme) = params.theme {
        update.theme = AppTheme::parse(&theme)?;
    }

    tracker.save_profile(update)?;

    let profile = tracker.profile().clone();
    let message = format!("💾 Profile saved\n{}", describe(&profile, offset));
    Ok(ProfileResponse { profile, message })
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ThemeSetParams {
    /// system, light or dark
    pub theme: String,
}

pub fn set_theme<S: DocumentStore>(
    tracker: &mut ClearAirTracker<S>,
    params: ThemeSetParams,
) -> Result<ProfileResponse, TrackerError> {
    let theme = AppTheme::parse(&params.theme)?;
    tracker.set_theme(theme)?;

    Ok(ProfileResponse {
        profile: tracker.profile().clone(),
        message: format!("🎨 Theme set to {}", theme.display_name()),
    })
}

fn describe(profile: &UserProfile, offset: chrono::FixedOffset) -> String {
    let name = if profile.name.is_empty() {
        "(not set)"
    } else {
        profile.name.as_str()
    };
    let mut lines = vec![
        format!("👤 **{}**", name),
        format!("- Theme: {}", profile.theme.display_name()),
        format!("- Best smoke-free streak: {}", days_text(profile.max_streak)),
    ];
    if let Some(age) = profile.age {
        lines.push(format!("- Age: {}", age));
    }
    if let Some(quit_date) = profile.quit_date {
        lines.push(format!(
            "- Quit date: {}",
            CalendarDate::from_stored_instant(&quit_date, &offset)
        ));
    }
    lines.join("\n")
}
