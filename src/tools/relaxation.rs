/// breathing_exercises tool: the guided breathing catalogue

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{BreathingExercise, BREATHING_EXERCISES};
use crate::domain::DomainError;
use crate::TrackerError;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct BreathingExercisesParams {
    /// Show only exercises whose title contains this text, with their steps
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BreathingExercisesResponse {
    pub exercises: Vec<BreathingExercise>,
    pub message: String,
}

pub fn breathing_exercises(
    params: BreathingExercisesParams,
) -> Result<BreathingExercisesResponse, TrackerError> {
    let query = params.title.filter(|t| !t.trim().is_empty());

    let exercises: Vec<BreathingExercise> = match &query {
        Some(query) => BREATHING_EXERCISES
            .iter()
            .filter(|e| e.matches(query))
            .copied()
            .collect(),
        None => BREATHING_EXERCISES.to_vec(),
    };

    if exercises.is_empty() {
        return Err(DomainError::Validation {
            message: format!(
                "No breathing exercise matches '{}'",
                query.unwrap_or_default()
            ),
        }
        .into());
    }

    let mut message = String::from("🌬️ **Breathing exercises**");
    for exercise in &exercises {
        message.push_str(&format!(
            "\n\n**{}** ({} min)\n{}",
            exercise.title,
            exercise.duration_minutes(),
            exercise.description
        ));
        // Steps only when the caller picked specific exercises
        if query.is_some() {
            for (n, step) in exercise.steps.iter().enumerate() {
                message.push_str(&format!("\n{}. {}", n + 1, step));
            }
        }
    }

    Ok(BreathingExercisesResponse { exercises, message })
}
