/// Streak calculation and tracking functionality
///
/// The two core algorithms are free functions over a DateSet: the run ending
/// today and the longest run ever. `StreakSummary` bundles them with the other
/// per-habit statistics shown next to a habit.

use serde::{Deserialize, Serialize};

use crate::domain::{CalendarDate, DateSet};

/// Length of the consecutive run of days ending exactly at `today`
///
/// `today` itself must be present, otherwise the streak is 0. Days after
/// `today` are never reached.
pub fn current_streak(days: &DateSet, today: CalendarDate) -> u32 {
    let mut expected = Some(today);
    let mut streak = 0;

    for day in days.iter_through(today).rev() {
        if Some(day) != expected {
            break;
        }
        streak += 1;
        expected = day.pred();
    }

    streak
}

/// Longest consecutive run of days anywhere in the set
pub fn max_streak(days: &DateSet) -> u32 {
    let mut sorted = days.iter();
    let Some(mut previous) = sorted.next() else {
        return 0;
    };

    let mut longest = 1;
    let mut running = 1;

    for day in sorted {
        if previous.succ() == Some(day) {
            running += 1;
            longest = longest.max(running);
        } else {
            running = 1;
        }
        previous = day;
    }

    longest
}

/// Calculated streak information for one habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive days ending today
    pub current_streak: u32,
    /// Best run ever achieved
    pub longest_streak: u32,
    /// Most recent completed day on or before today
    pub last_completed: Option<CalendarDate>,
    /// Total number of completed days
    pub total_completions: u32,
    /// Share of days since creation that were completed (0.0 to 1.0)
    pub completion_rate: f64,
}

impl StreakSummary {
    /// Summarize a completion set as of `today`
    pub fn calculate(days: &DateSet, created: CalendarDate, today: CalendarDate) -> Self {
        Self {
            current_streak: current_streak(days, today),
            longest_streak: max_streak(days),
            last_completed: days.iter_through(today).next_back(),
            total_completions: days.len() as u32,
            completion_rate: completion_rate(days, created, today),
        }
    }
}

/// Completed days in `created..=today` over the number of days in that range
fn completion_rate(days: &DateSet, created: CalendarDate, today: CalendarDate) -> f64 {
    let elapsed = today.days_since(created) + 1; // Include creation day
    if elapsed <= 0 {
        return 0.0;
    }

    let completed = days.count_between(created, today) as f64;
    (completed / elapsed as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> CalendarDate {
        CalendarDate::from_ymd(2026, 10, 19).unwrap()
    }

    fn days_ago(n: i64) -> CalendarDate {
        today().add_days(-n).unwrap()
    }

    fn set(offsets: &[i64]) -> DateSet {
        offsets.iter().map(|&n| days_ago(n)).collect()
    }

    #[test]
    fn test_current_streak_cases() {
        assert_eq!(current_streak(&DateSet::new(), today()), 0);
        assert_eq!(current_streak(&set(&[0]), today()), 1);
        assert_eq!(current_streak(&set(&[0, 1, 2]), today()), 3);
        assert_eq!(current_streak(&set(&[0, 2]), today()), 1);
    }

    #[test]
    fn test_current_streak_requires_today() {
        // Smoke-free through yesterday but not yet marked today
        assert_eq!(current_streak(&set(&[1, 2, 3]), today()), 0);
    }

    #[test]
    fn test_current_streak_ignores_future_days() {
        assert_eq!(current_streak(&set(&[-2, -1, 0, 1]), today()), 2);
        assert_eq!(current_streak(&set(&[-1]), today()), 0);
    }

    #[test]
    fn test_current_streak_across_month_boundary() {
        let first = CalendarDate::from_ymd(2024, 3, 1).unwrap();
        let days: DateSet = [
            CalendarDate::from_ymd(2024, 2, 28).unwrap(),
            CalendarDate::from_ymd(2024, 2, 29).unwrap(),
            first,
        ]
        .into_iter()
        .collect();

        assert_eq!(current_streak(&days, first), 3);
    }

    #[test]
    fn test_max_streak_cases() {
        assert_eq!(max_streak(&DateSet::new()), 0);
        assert_eq!(max_streak(&set(&[7])), 1);
        // day1..day3 consecutive, gap, then day5
        assert_eq!(max_streak(&set(&[5, 4, 3, 1])), 3);
        assert_eq!(max_streak(&set(&[10, 8, 7, 6, 5, 1, 0])), 4);
    }

    #[test]
    fn test_max_streak_is_at_least_current_streak() {
        let days = set(&[0, 1, 2, 3, 10, 11]);
        assert!(max_streak(&days) >= current_streak(&days, today()));
    }

    #[test]
    fn test_summary() {
        let created = days_ago(9);
        let days = set(&[0, 1, 4, 5, 6, 20, -3]);

        let summary = StreakSummary::calculate(&days, created, today());

        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.longest_streak, 3);
        assert_eq!(summary.last_completed, Some(today()));
        assert_eq!(summary.total_completions, 7);
        // 5 completions inside the 10 days since creation
        assert!((summary.completion_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_for_empty_set() {
        let summary = StreakSummary::calculate(&DateSet::new(), today(), today());

        assert_eq!(summary.current_streak, 0);
        assert_eq!(summary.longest_streak, 0);
        assert_eq!(summary.last_completed, None);
        assert_eq!(summary.completion_rate, 0.0);
    }
}
