/// Public library interface for the Clear Air tracker
///
/// This module exports the tracker facade, the domain types and the storage
/// layer, plus `TrackerServer`, which serves the facade as MCP tools over
/// stdin/stdout.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod analytics;
pub mod config;
mod domain;
mod mcp;
mod storage;
mod store;
mod tools;
mod tracker;

// Re-export public modules and types
pub use analytics::{
    BreathingExercise, HealthMilestone, MilestoneProgress, BREATHING_EXERCISES, HEALTH_MILESTONES,
};
pub use config::TrackerConfig;
pub use domain::*;
pub use mcp::McpServer;
pub use storage::{documents, DocumentStore, SqliteStorage, StorageError};
pub use store::{HabitStore, ProfileStreakTracker, SmokeFreeToggle};
pub use tracker::{ChangeEvent, ClearAirTracker};

/// Errors surfaced by tracker commands and the server
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tracker served over the Model Context Protocol
///
/// Owns a SQLite-backed `ClearAirTracker` and hands it to the MCP server loop.
pub struct TrackerServer {
    tracker: ClearAirTracker<SqliteStorage>,
}

impl TrackerServer {
    /// Open (or create) the database at `db_path` and load all state
    pub async fn new(db_path: PathBuf, config: TrackerConfig) -> Result<Self, TrackerError> {
        tracing::info!("Initializing Clear Air tracker with database: {:?}", db_path);

        let storage = SqliteStorage::new(&db_path)?;
        let tracker = ClearAirTracker::open(storage, config)?;

        Ok(Self { tracker })
    }

    /// Run the MCP server until stdin closes
    pub async fn run(self) -> Result<(), TrackerError> {
        tracing::info!(
            "Server started with {} habit(s) and a best smoke-free streak of {}",
            self.tracker.list_habits().len(),
            days_text(self.tracker.max_streak())
        );

        let mut events = self.tracker.subscribe();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                tracing::debug!("State changed: {:?}", event);
            }
        });

        let mut mcp_server = McpServer::new(self.tracker);
        mcp_server.run().await
    }

    pub fn tracker(&self) -> &ClearAirTracker<SqliteStorage> {
        &self.tracker
    }
}
