/// Health milestones along a smoke-free streak, plus the breathing catalogue
///
/// Each milestone unlocks once the current smoke-free streak reaches its day
/// threshold. Progress is derived from the live streak, never stored.

pub mod breathing;

pub use breathing::{BreathingExercise, BREATHING_EXERCISES};

use serde::Serialize;

use crate::domain::days_text;

/// One recovery milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthMilestone {
    pub days_required: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Ordered by `days_required`
pub const HEALTH_MILESTONES: &[HealthMilestone] = &[
    HealthMilestone {
        days_required: 0,
        title: "Starting Point",
        description: "You made an important decision! Your body is already beginning to recover.",
        icon: "🎯",
    },
    HealthMilestone {
        days_required: 1,
        title: "1 Day",
        description: "Carbon monoxide levels in blood decrease. Breathing becomes easier.",
        icon: "🫁",
    },
    HealthMilestone {
        days_required: 2,
        title: "2 Days",
        description: "Sense of smell and taste improve. Food tastes better!",
        icon: "👃",
    },
    HealthMilestone {
        days_required: 3,
        title: "3 Days",
        description: "Breathing becomes easier, lung capacity increases.",
        icon: "🌬️",
    },
    HealthMilestone {
        days_required: 7,
        title: "1 Week",
        description: "Your lungs begin to clear. Complexion improves.",
        icon: "✨",
    },
    HealthMilestone {
        days_required: 14,
        title: "2 Weeks",
        description: "Blood circulation improves. Physical exercise becomes easier.",
        icon: "💪",
    },
    HealthMilestone {
        days_required: 30,
        title: "1 Month",
        description: "Lung function improves by 30%. Risk of infections decreases significantly.",
        icon: "🏆",
    },
    HealthMilestone {
        days_required: 90,
        title: "3 Months",
        description: "Almost complete recovery of circulation and lung function.",
        icon: "🎉",
    },
    HealthMilestone {
        days_required: 180,
        title: "6 Months",
        description: "Stress decreases, sleep and overall well-being improve.",
        icon: "😊",
    },
    HealthMilestone {
        days_required: 365,
        title: "1 Year",
        description: "Risk of heart disease is cut in half!",
        icon: "🎊",
    },
];

/// Where a streak sits on the milestone ladder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneProgress {
    pub current_streak: u32,
    pub reached: Vec<HealthMilestone>,
    pub next: Option<HealthMilestone>,
    pub days_until_next: Option<u32>,
}

impl MilestoneProgress {
    pub fn for_streak(current_streak: u32) -> Self {
        let (reached, pending): (Vec<_>, Vec<_>) = HEALTH_MILESTONES
            .iter()
            .copied()
            .partition(|m| m.days_required <= current_streak);

        let next = pending.first().copied();
        Self {
            current_streak,
            reached,
            next,
            days_until_next: next.map(|m| m.days_required - current_streak),
        }
    }

    /// The most recent milestone reached; the starting point is always reached
    pub fn latest(&self) -> Option<&HealthMilestone> {
        self.reached.last()
    }

    /// Short human summary, e.g. "3 days smoke-free. Next: 1 Week in 4 days"
    pub fn headline(&self) -> String {
        let streak = format!("{} smoke-free.", days_text(self.current_streak));
        match (self.next, self.days_until_next) {
            (Some(next), Some(remaining)) => {
                format!("{} Next: {} in {}", streak, next.title, days_text(remaining))
            }
            _ => format!("{} Every milestone reached!", streak),
        }
    }
}
