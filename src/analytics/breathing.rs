/// Guided breathing exercises offered alongside the smoke-free tracker

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreathingExercise {
    pub title: &'static str,
    pub description: &'static str,
    /// Length of one guided session
    pub duration_seconds: u32,
    pub steps: &'static [&'static str],
    /// Symbol name for clients that draw an icon
    pub icon: &'static str,
}

impl BreathingExercise {
    /// Whole minutes, rounded down the way session cards show them
    pub fn duration_minutes(&self) -> u32 {
        self.duration_seconds / 60
    }

    /// Case-insensitive match on any part of the title
    pub fn matches(&self, query: &str) -> bool {
        self.title
            .to_lowercase()
            .contains(&query.trim().to_lowercase())
    }
}

pub const BREATHING_EXERCISES: &[BreathingExercise] = &[
    BreathingExercise {
        title: "4-7-8 Breathing",
        description: "Technique for quick calming and stress relief",
        duration_seconds: 60,
        steps: &[
            "Exhale completely through your mouth with a whooshing sound",
            "Close your mouth and inhale through your nose, counting to 4",
            "Hold your breath for 7 seconds",
            "Exhale through your mouth for 8 seconds",
            "Repeat the cycle 3-4 times",
        ],
        icon: "wind",
    },
    BreathingExercise {
        title: "Box Breathing",
        description: "Helps focus and reduce anxiety",
        duration_seconds: 80,
        steps: &[
            "Inhale through your nose for 4 counts",
            "Hold your breath for 4 counts",
            "Exhale through your mouth for 4 counts",
            "Hold your breath for 4 counts",
            "Repeat 5 cycles",
        ],
        icon: "square",
    },
    BreathingExercise {
        title: "Diaphragmatic Breathing",
        description: "Deep belly breathing for relaxation",
        duration_seconds: 120,
        steps: &[
            "Place one hand on your chest, the other on your belly",
            "Slowly inhale through your nose, expanding your belly",
            "Your chest should remain still",
            "Slowly exhale through your mouth",
            "Continue for 5-10 minutes",
        ],
        icon: "lungs",
    },
    BreathingExercise {
        title: "Alternate Nostril Breathing",
        description: "Balances emotions and calms the mind",
        duration_seconds: 90,
        steps: &[
            "Close your right nostril with your thumb",
            "Inhale through your left nostril",
            "Close your left nostril, open your right",
            "Exhale through your right nostril",
            "Inhale through right, exhale through left",
            "Repeat 5-10 cycles",
        ],
        icon: "arrow.left.arrow.right",
    },
];
