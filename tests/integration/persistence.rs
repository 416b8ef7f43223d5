/// Persistence across tracker restarts on an on-disk database
use chrono::{FixedOffset, Weekday};
use clear_air_tracker::*;
use tempfile::TempDir;

fn config() -> TrackerConfig {
    config_at(2)
}

fn config_at(utc_offset_hours: i32) -> TrackerConfig {
    TrackerConfig::new(Weekday::Mon, FixedOffset::east_opt(utc_offset_hours * 3600).unwrap())
}

fn open(dir: &TempDir) -> ClearAirTracker<SqliteStorage> {
    open_with(dir, config())
}

fn open_with(dir: &TempDir, config: TrackerConfig) -> ClearAirTracker<SqliteStorage> {
    let storage =
        SqliteStorage::new(dir.path().join("tracker.db")).expect("Failed to open storage");
    ClearAirTracker::open(storage, config).expect("Failed to open tracker")
}

fn day(d: u32) -> CalendarDate {
    CalendarDate::from_ymd(2026, 10, d).unwrap()
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[test]
    fn test_state_survives_restart() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let habit_id = {
            let mut tracker = open(&dir);
            let habit = tracker
                .add_habit("Run".to_string(), Some("5k".to_string()))
                .unwrap();
            for d in [17, 18, 19] {
                tracker.toggle_habit_day(&habit.id, day(d)).unwrap();
                tracker.toggle_smoke_free_day(day(d)).unwrap();
            }
            tracker
                .save_profile(ProfileUpdate {
                    name: "Ari".to_string(),
                    ..ProfileUpdate::default()
                })
                .unwrap();
            habit.id
        };

        let tracker = open(&dir);
        let habit = tracker.habit(&habit_id).unwrap();
        assert_eq!(habit.title, "Run");
        assert_eq!(habit.description.as_deref(), Some("5k"));
        assert_eq!(tracker.habit_current_streak_on(&habit_id, day(19)).unwrap(), 3);
        assert_eq!(tracker.smoke_free_current_streak_on(day(19)), 3);
        assert_eq!(tracker.max_streak(), 3);
        assert_eq!(tracker.profile().name, "Ari");
    }

    #[test]
    fn test_max_streak_is_kept_after_unmarking() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        {
            let mut tracker = open(&dir);
            for d in 10..=14 {
                tracker.toggle_smoke_free_day(day(d)).unwrap();
            }
            for d in [11, 12, 13] {
                tracker.toggle_smoke_free_day(day(d)).unwrap();
            }
            assert_eq!(tracker.max_streak(), 5);
        }

        let tracker = open(&dir);
        assert_eq!(tracker.max_streak(), 5);
        assert!(tracker.is_smoke_free(day(10)));
        assert!(!tracker.is_smoke_free(day(12)));
        assert_eq!(tracker.smoke_free_current_streak_on(day(14)), 1);
    }

    #[test]
    fn test_unknown_habit_commands_change_nothing() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut tracker = open(&dir);
        tracker.add_habit("Read".to_string(), None).unwrap();
        let before = tracker.list_habits().to_vec();

        let stranger = HabitId::new();
        assert!(!tracker.delete_habit(&stranger).unwrap());
        assert!(matches!(
            tracker.toggle_habit_day(&stranger, day(19)),
            Err(TrackerError::HabitNotFound { .. })
        ));

        assert_eq!(tracker.list_habits(), before.as_slice());
        assert_eq!(open(&dir).list_habits(), before.as_slice());
    }

    #[test]
    fn test_corrupt_document_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        {
            let mut tracker = open(&dir);
            tracker.add_habit("Stretch".to_string(), None).unwrap();
            tracker.toggle_smoke_free_day(day(19)).unwrap();
        }

        let storage = SqliteStorage::new(dir.path().join("tracker.db")).unwrap();
        storage.put(documents::HABITS_KEY, "{ not a habit list").unwrap();
        let tracker = ClearAirTracker::open(storage, config()).unwrap();

        assert!(tracker.list_habits().is_empty());
        assert!(tracker.is_smoke_free(day(19)));
        assert_eq!(tracker.max_streak(), 1);
    }

    #[test]
    fn test_documents_use_shared_keys() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        {
            let mut tracker = open(&dir);
            tracker.toggle_smoke_free_day(day(19)).unwrap();
        }

        let storage = SqliteStorage::new(dir.path().join("tracker.db")).unwrap();
        let raw_days = storage.get(documents::SMOKE_FREE_DAYS_KEY).unwrap().unwrap();
        let raw_profile = storage.get(documents::USER_PROFILE_KEY).unwrap().unwrap();

        // Stored at UTC midnight whatever the configured offset
        assert_eq!(raw_days, "[\"2026-10-19T00:00:00Z\"]");
        let profile: serde_json::Value = serde_json::from_str(&raw_profile).unwrap();
        assert_eq!(profile["maxStreak"], 1);
    }

    #[test]
    fn test_days_survive_an_offset_change() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let habit_id = {
            let mut tracker = open_with(&dir, config_at(2));
            let habit = tracker.add_habit("Run".to_string(), None).unwrap();
            tracker.toggle_habit_day(&habit.id, day(19)).unwrap();
            tracker.toggle_smoke_free_day(day(19)).unwrap();
            habit.id
        };

        // Daylight saving ended between the two runs
        let mut tracker = open_with(&dir, config_at(1));
        assert!(tracker.is_smoke_free(day(19)));
        assert!(!tracker.is_smoke_free(day(18)));
        assert!(tracker.is_habit_completed(&habit_id, day(19)).unwrap());

        tracker.toggle_smoke_free_day(day(20)).unwrap();
        let tracker = open_with(&dir, config_at(-5));
        assert_eq!(tracker.smoke_free_current_streak_on(day(20)), 2);
        assert_eq!(tracker.max_streak(), 2);
    }

    #[test]
    fn test_older_local_midnight_days_still_load() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        {
            let storage = SqliteStorage::new(dir.path().join("tracker.db")).unwrap();
            // Midnight at UTC+2, as written before days were stored at UTC midnight
            storage
                .put(documents::SMOKE_FREE_DAYS_KEY, "[\"2026-10-18T22:00:00Z\"]")
                .unwrap();
        }

        let tracker = open_with(&dir, config_at(2));
        assert!(tracker.is_smoke_free(day(19)));
        assert_eq!(tracker.max_streak(), 1);
    }
}
