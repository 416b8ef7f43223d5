/// Basic unit tests for the public streak, calendar and milestone API
use chrono::{FixedOffset, Utc, Weekday};
use clear_air_tracker::*;

fn day(year: i32, month: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(year, month, d).expect("valid date")
}

fn set(days: &[(i32, u32, u32)]) -> DateSet {
    days.iter().map(|&(y, m, d)| day(y, m, d)).collect()
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_current_streak_requires_today() {
        let days = set(&[(2026, 10, 17), (2026, 10, 18)]);

        assert_eq!(current_streak(&days, day(2026, 10, 19)), 0);
        assert_eq!(current_streak(&days, day(2026, 10, 18)), 2);
    }

    #[test]
    fn test_current_streak_crosses_month_and_year() {
        let days = set(&[(2025, 12, 30), (2025, 12, 31), (2026, 1, 1)]);

        assert_eq!(current_streak(&days, day(2026, 1, 1)), 3);
    }

    #[test]
    fn test_current_streak_ignores_future_days() {
        let days = set(&[(2026, 10, 19), (2026, 10, 20), (2026, 10, 25)]);

        assert_eq!(current_streak(&days, day(2026, 10, 19)), 1);
    }

    #[test]
    fn test_max_streak_finds_longest_run() {
        let days = set(&[
            (2026, 2, 27),
            (2026, 2, 28),
            (2026, 3, 1),
            (2026, 3, 5),
            (2026, 3, 6),
        ]);

        assert_eq!(max_streak(&days), 3);
        assert_eq!(max_streak(&DateSet::new()), 0);
    }

    #[test]
    fn test_date_set_deduplicates_same_day_instants() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let morning = "2026-10-19T06:00:00Z".parse::<chrono::DateTime<Utc>>().unwrap();
        let evening = "2026-10-19T21:30:00Z".parse::<chrono::DateTime<Utc>>().unwrap();

        let days = DateSet::from_instants([&morning, &evening], &utc);

        assert_eq!(days.len(), 1);
        assert!(days.contains(day(2026, 10, 19)));
    }

    #[test]
    fn test_toggle_twice_restores_set() {
        let original = set(&[(2026, 10, 1)]);
        let twice = original.toggled(day(2026, 10, 2)).toggled(day(2026, 10, 2));

        assert_eq!(original, twice);
    }

    #[test]
    fn test_month_grid_shape() {
        let builder = CalendarGridBuilder::new(Weekday::Sun);
        let grid = builder.build_month_grid(day(2024, 2, 10));

        // February 1st 2024 is a Thursday: four blanks in a Sunday-first grid
        let blanks = grid.iter().take_while(|c| c.date().is_none()).count();
        assert_eq!(blanks, 4);
        assert_eq!(grid.len() - blanks, 29);
        assert_eq!(grid[blanks].date(), Some(day(2024, 2, 1)));
    }

    #[test]
    fn test_move_month_clamps_day() {
        assert_eq!(move_month(day(2026, 1, 31), 1), day(2026, 2, 28));
        assert_eq!(move_month(day(2026, 3, 31), -13), day(2025, 2, 28));
        assert_eq!(month_title(day(2026, 10, 19)), "October 2026");
    }

    #[test]
    fn test_habit_validation() {
        assert!(Habit::new("".to_string(), None).is_err());
        assert!(Habit::new("x".repeat(101), None).is_err());

        let habit = Habit::new("  Drink water ".to_string(), Some("  ".to_string())).unwrap();
        assert_eq!(habit.title, "Drink water");
        assert_eq!(habit.description, None);
    }

    #[test]
    fn test_milestone_ladder() {
        let progress = MilestoneProgress::for_streak(30);

        assert_eq!(progress.latest().unwrap().title, "1 Month");
        assert_eq!(progress.days_until_next, Some(60));
        assert_eq!(HEALTH_MILESTONES.len(), 10);
    }

    #[test]
    fn test_days_text() {
        assert_eq!(days_text(1), "1 day");
        assert_eq!(days_text(0), "0 days");
        assert_eq!(days_text(12), "12 days");
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = TrackerConfig::new(Weekday::Mon, FixedOffset::east_opt(0).unwrap());

        let server = TrackerServer::new(temp_dir.path().join("tracker.db"), config).await;

        assert!(server.is_ok());
    }
}
