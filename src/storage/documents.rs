/// Persisted document shapes and their mapping to domain types
///
/// Each record lives under its own key so one corrupt document never blocks the
/// others: a document that fails to decode is replaced by its default value and
/// a warning is logged. Calendar days are stored as RFC 3339 instants at UTC
/// midnight, so the stored form does not depend on the reader's offset.

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{AppTheme, DateSet, Gender, Habit, HabitId, UserProfile};
use crate::storage::{DocumentStore, StorageError};

pub const USER_PROFILE_KEY: &str = "userProfile";
pub const HABITS_KEY: &str = "habits";
pub const SMOKE_FREE_DAYS_KEY: &str = "smokingFreeDays";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileDocument {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    theme: AppTheme,
    #[serde(default)]
    max_streak: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HabitDocument {
    id: HabitId,
    title: String,
    #[serde(default)]
    description: String,
    created_date: DateTime<Utc>,
    #[serde(default)]
    completed_dates: Vec<DateTime<Utc>>,
}

impl From<&UserProfile> for ProfileDocument {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            gender: profile.gender,
            age: profile.age,
            quit_date: profile.quit_date,
            theme: profile.theme,
            max_streak: profile.max_streak,
        }
    }
}

impl From<ProfileDocument> for UserProfile {
    fn from(doc: ProfileDocument) -> Self {
        Self {
            name: doc.name,
            gender: doc.gender,
            age: doc.age,
            quit_date: doc.quit_date,
            theme: doc.theme,
            max_streak: doc.max_streak,
        }
    }
}

impl HabitDocument {
    fn from_habit(habit: &Habit) -> Self {
        Self {
            id: habit.id.clone(),
            title: habit.title.clone(),
            description: habit.description.clone().unwrap_or_default(),
            created_date: habit.created_at,
            completed_dates: habit.completions.to_instants(),
        }
    }

    fn into_habit(self, offset: &FixedOffset) -> Habit {
        let description = Some(self.description).filter(|d| !d.is_empty());
        Habit::from_existing(
            self.id,
            self.title,
            description,
            self.created_date,
            DateSet::from_instants(&self.completed_dates, offset),
        )
    }
}

/// Decode one raw document, tagging failures with the key
pub fn decode_document<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Read and decode `key`, falling back to `T::default()` when the document is
/// missing or malformed
///
/// Only read failures of the store itself are returned as errors.
fn read_or_default<S, T>(store: &S, key: &str) -> Result<T, StorageError>
where
    S: DocumentStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key)? else {
        tracing::debug!("No stored document for '{}', using default", key);
        return Ok(T::default());
    };

    match decode_document(key, &raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!("{}; falling back to default", e);
            Ok(T::default())
        }
    }
}

impl Default for ProfileDocument {
    fn default() -> Self {
        (&UserProfile::default()).into()
    }
}

pub fn load_profile<S: DocumentStore + ?Sized>(store: &S) -> Result<UserProfile, StorageError> {
    let doc: ProfileDocument = read_or_default(store, USER_PROFILE_KEY)?;
    Ok(doc.into())
}

pub fn load_habits<S: DocumentStore + ?Sized>(
    store: &S,
    offset: &FixedOffset,
) -> Result<Vec<Habit>, StorageError> {
    let docs: Vec<HabitDocument> = read_or_default(store, HABITS_KEY)?;
    Ok(docs.into_iter().map(|doc| doc.into_habit(offset)).collect())
}

pub fn load_smoke_free_days<S: DocumentStore + ?Sized>(
    store: &S,
    offset: &FixedOffset,
) -> Result<DateSet, StorageError> {
    let instants: Vec<DateTime<Utc>> = read_or_default(store, SMOKE_FREE_DAYS_KEY)?;
    Ok(DateSet::from_instants(&instants, offset))
}

pub fn encode_profile(profile: &UserProfile) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&ProfileDocument::from(profile))?)
}

pub fn encode_habits(habits: &[Habit]) -> Result<String, StorageError> {
    let docs: Vec<HabitDocument> = habits.iter().map(HabitDocument::from_habit).collect();
    Ok(serde_json::to_string(&docs)?)
}

pub fn encode_smoke_free_days(days: &DateSet) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&days.to_instants())?)
}

pub fn save_profile<S: DocumentStore + ?Sized>(
    store: &S,
    profile: &UserProfile,
) -> Result<(), StorageError> {
    store.put(USER_PROFILE_KEY, &encode_profile(profile)?)
}

/// Write the whole habit collection
pub fn save_habits<S: DocumentStore + ?Sized>(
    store: &S,
    habits: &[Habit],
) -> Result<(), StorageError> {
    store.put(HABITS_KEY, &encode_habits(habits)?)
}

/// Write the smoke-free days, and the profile alongside when it changed
pub fn save_smoke_free_state<S: DocumentStore + ?Sized>(
    store: &S,
    days: &DateSet,
    profile: Option<&UserProfile>,
) -> Result<(), StorageError> {
    let days_json = encode_smoke_free_days(days)?;
    match profile {
        Some(profile) => {
            let profile_json = encode_profile(profile)?;
            store.put_many(&[
                (SMOKE_FREE_DAYS_KEY, days_json.as_str()),
                (USER_PROFILE_KEY, profile_json.as_str()),
            ])
        }
        None => store.put(SMOKE_FREE_DAYS_KEY, &days_json),
    }
}
