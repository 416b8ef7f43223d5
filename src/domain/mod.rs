/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, UserProfile, DateSet) and the
/// pure streak and calendar calculations built on top of them.

pub mod calendar;
pub mod date_set;
pub mod habit;
pub mod profile;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use calendar::*;
pub use date_set::*;
pub use habit::*;
pub use profile::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit title: {0}")]
    InvalidHabitTitle(String),

    #[error("Invalid habit ID: {0}")]
    InvalidHabitId(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
