/// User profile entity
///
/// The profile holds personal details, the theme preference and the cached
/// best smoke-free streak.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AppTheme, DomainError, Gender};

const MAX_NAME_LEN: usize = 100;
const MAX_AGE: u32 = 150;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub quit_date: Option<DateTime<Utc>>,
    pub theme: AppTheme,
    /// Best smoke-free streak ever observed; never decreases
    pub max_streak: u32,
}

/// Editable profile fields
///
/// Every field is written as given; `max_streak` is deliberately absent because
/// only the streak tracker may raise it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub quit_date: Option<DateTime<Utc>>,
    pub theme: AppTheme,
}

impl ProfileUpdate {
    /// Start from the current profile so callers only override what changed
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            gender: profile.gender,
            age: profile.age,
            quit_date: profile.quit_date,
            theme: profile.theme,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation {
                message: format!("Name cannot be longer than {} characters", MAX_NAME_LEN),
            });
        }
        if let Some(age) = self.age {
            if age > MAX_AGE {
                return Err(DomainError::InvalidValue {
                    message: format!("Age cannot exceed {}", MAX_AGE),
                });
            }
        }
        Ok(())
    }
}

impl UserProfile {
    /// Apply editable fields, keeping `max_streak` untouched
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), DomainError> {
        update.validate()?;
        self.name = update.name.trim().to_string();
        self.gender = update.gender;
        self.age = update.age;
        self.quit_date = update.quit_date;
        self.theme = update.theme;
        Ok(())
    }

    /// Raise the cached best streak if `candidate` beats it
    ///
    /// Returns `true` when the stored value changed.
    pub fn raise_max_streak(&mut self, candidate: u32) -> bool {
        if candidate > self.max_streak {
            self.max_streak = candidate;
            true
        } else {
            false
        }
    }
}
