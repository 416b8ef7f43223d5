/// Core types used throughout the domain layer
///
/// This module defines the identifier, calendar day and preference types that
/// Habit, UserProfile and the streak calculations are built from.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety when looking habits
/// up in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a habit ID from its string form
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidHabitId(s.to_string()))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A date truncated to day granularity in the reference timezone
///
/// A `CalendarDate` can only be built from a day value or by normalizing an
/// absolute instant, so every value is already at day-start and two values are
/// equal exactly when they denote the same calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Normalize an absolute instant to the calendar day it falls on in `offset`
    pub fn from_instant<Tz: TimeZone>(instant: &DateTime<Tz>, offset: &FixedOffset) -> Self {
        Self(instant.with_timezone(offset).date_naive())
    }

    /// The current day in `offset`
    pub fn today(offset: &FixedOffset) -> Self {
        Self::from_instant(&Utc::now(), offset)
    }

    /// UTC midnight of this calendar day, the persisted form
    ///
    /// The stored instant carries no offset, so a day written under one
    /// offset reads back as the same day under any other.
    pub fn to_stored_instant(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// Inverse of `to_stored_instant`
    ///
    /// Instants that are not exactly UTC midnight predate that format and are
    /// normalized to their day in `offset` instead.
    pub fn from_stored_instant(instant: &DateTime<Utc>, offset: &FixedOffset) -> Self {
        if instant.time() == NaiveTime::MIN {
            Self(instant.date_naive())
        } else {
            Self::from_instant(instant, offset)
        }
    }

    /// Parse either a plain `YYYY-MM-DD` day or an RFC 3339 timestamp
    ///
    /// Timestamps are normalized to their calendar day in `offset`.
    pub fn parse(s: &str, offset: &FixedOffset) -> Result<Self, DomainError> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|instant| Self::from_instant(&instant, offset))
            .map_err(|_| DomainError::InvalidDate(format!(
                "'{}' is neither YYYY-MM-DD nor an RFC 3339 timestamp", s
            )))
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// The previous calendar day, `None` only at chrono's minimum date
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The next calendar day, `None` only at chrono's maximum date
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Shift by a signed number of days
    pub fn add_days(&self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::days(days)).map(Self)
    }

    /// Whole days from `earlier` to `self` (negative if `earlier` is later)
    pub fn days_since(&self, earlier: CalendarDate) -> i64 {
        (self.0 - earlier.0).num_days()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Optional gender on the user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(DomainError::Validation {
                message: format!("Invalid gender '{}'. Valid options: male, female, other", s),
            }),
        }
    }
}

/// Stored appearance preference
///
/// Applying the theme is a presentation concern; the core only persists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppTheme {
    #[default]
    System,
    Light,
    Dark,
}

impl AppTheme {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(AppTheme::System),
            "light" => Ok(AppTheme::Light),
            "dark" => Ok(AppTheme::Dark),
            _ => Err(DomainError::Validation {
                message: format!("Invalid theme '{}'. Valid options: system, light, dark", s),
            }),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AppTheme::System => "System",
            AppTheme::Light => "Light",
            AppTheme::Dark => "Dark",
        }
    }
}

/// "1 day" / "5 days"
pub fn days_text(count: u32) -> String {
    format!("{} day{}", count, if count == 1 { "" } else { "s" })
}
