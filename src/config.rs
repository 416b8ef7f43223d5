/// Runtime configuration for the tracker core
///
/// The binary builds this from command line flags; library users construct it
/// directly or take the defaults.

use chrono::{FixedOffset, Local, Weekday};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// First column of the month grid
    pub week_start: Weekday,
    /// Reference timezone for day boundaries
    pub utc_offset: FixedOffset,
}

impl Default for TrackerConfig {
    /// Monday-first weeks in the host's current local offset
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
            utc_offset: *Local::now().offset(),
        }
    }
}

impl TrackerConfig {
    pub fn new(week_start: Weekday, utc_offset: FixedOffset) -> Self {
        Self {
            week_start,
            utc_offset,
        }
    }

    /// Build from raw flag values, falling back to defaults for absent ones
    pub fn from_flags(
        week_start: Option<&str>,
        utc_offset_minutes: Option<i32>,
    ) -> Result<Self, DomainError> {
        let mut config = Self::default();

        if let Some(name) = week_start {
            config.week_start = parse_weekday(name)?;
        }
        if let Some(minutes) = utc_offset_minutes {
            config.utc_offset = FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
                DomainError::InvalidValue {
                    message: format!("UTC offset of {} minutes is out of range", minutes),
                }
            })?;
        }

        Ok(config)
    }
}

/// Accepts full or three-letter English day names, any case
pub fn parse_weekday(name: &str) -> Result<Weekday, DomainError> {
    name.trim().parse::<Weekday>().map_err(|_| DomainError::Validation {
        message: format!("Invalid week start '{}'. Use a day name such as monday or sunday", name),
    })
}
