/// calendar_month tool: one month grid with smoke-free or habit marks

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::CalendarDate;
use crate::storage::DocumentStore;
use crate::tools::{parse_day, parse_habit_id};
use crate::tracker::ClearAirTracker;
use crate::TrackerError;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CalendarMonthParams {
    /// Any day inside the month to show; defaults to today
    pub month: Option<String>,
    /// Months to move from the anchor, e.g. -1 for the previous month
    pub offset: Option<i32>,
    /// Mark this habit's completions instead of smoke-free days
    pub habit_id: Option<String>,
}

/// One grid cell; blanks have no date and are never marked
#[derive(Debug, Serialize)]
pub struct CalendarCellView {
    pub date: Option<CalendarDate>,
    pub marked: bool,
    pub is_today: bool,
}

#[derive(Debug, Serialize)]
pub struct CalendarMonthResponse {
    pub title: String,
    pub anchor: CalendarDate,
    pub weekday_headers: Vec<String>,
    pub rows: Vec<Vec<CalendarCellView>>,
    pub marked_days: usize,
    pub message: String,
}

pub fn calendar_month<S: DocumentStore>(
    tracker: &ClearAirTracker<S>,
    params: CalendarMonthParams,
) -> Result<CalendarMonthResponse, TrackerError> {
    let today = tracker.today();
    let anchor = parse_day(tracker, params.month.as_deref())?;
    let anchor = tracker.move_month(anchor, params.offset.unwrap_or(0));

    let habit = match params.habit_id.as_deref() {
        Some(raw) => Some(tracker.habit(&parse_habit_id(raw)?)?),
        None => None,
    };
    let is_marked = |day: CalendarDate| match habit {
        Some(habit) => habit.is_completed(day),
        None => tracker.is_smoke_free(day),
    };

    let rows: Vec<Vec<CalendarCellView>> = tracker
        .calendar()
        .build_month_rows(anchor)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| {
                    let date = cell.date();
                    CalendarCellView {
                        date,
                        marked: date.is_some_and(|d| is_marked(d)),
                        is_today: date == Some(today),
                    }
                })
                .collect()
        })
        .collect();

    let weekday_headers: Vec<String> = tracker
        .calendar()
        .weekday_headers()
        .iter()
        .map(|w| w.to_string())
        .collect();
    let marked_days = rows.iter().flatten().filter(|c| c.marked).count();
    let title = tracker.month_title(anchor);
    let message = render_grid(&title, &weekday_headers, &rows, habit.map(|h| h.title.as_str()));

    Ok(CalendarMonthResponse {
        title,
        anchor,
        weekday_headers,
        rows,
        marked_days,
        message,
    })
}

/// Plain-text month grid; marked days are bracketed, today is starred
fn render_grid(
    title: &str,
    headers: &[String],
    rows: &[Vec<CalendarCellView>],
    habit_title: Option<&str>,
) -> String {
    let subject = habit_title.unwrap_or("Smoke-free days");
    let mut out = format!("📅 **{}** ({})\n", title, subject);
    out.push_str(
        &headers
            .iter()
            .map(|h| format!("{:^4}", &h[..2]))
            .collect::<String>(),
    );

    for row in rows {
        out.push('\n');
        for cell in row {
            let text = match cell.date {
                None => "    ".to_string(),
                Some(date) if cell.marked => format!("[{:>2}]", date.day()),
                Some(date) if cell.is_today => format!(" {:>2}*", date.day()),
                Some(date) => format!(" {:>2} ", date.day()),
            };
            out.push_str(&text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::storage::SqliteStorage;
    use chrono::{FixedOffset, Weekday};

    fn tracker(week_start: Weekday) -> ClearAirTracker<SqliteStorage> {
        let config = TrackerConfig::new(week_start, FixedOffset::east_opt(0).unwrap());
        ClearAirTracker::open(SqliteStorage::open_in_memory().unwrap(), config).unwrap()
    }

    #[test]
    fn test_month_marks_smoke_free_days() {
        let mut tracker = tracker(Weekday::Mon);
        for d in [1, 2, 15] {
            tracker
                .toggle_smoke_free_day(CalendarDate::from_ymd(2026, 7, d).unwrap())
                .unwrap();
        }

        let response = calendar_month(
            &tracker,
            CalendarMonthParams {
                month: Some("2026-07-20".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(response.title, "July 2026");
        assert_eq!(response.weekday_headers[0], "Mon");
        assert_eq!(response.marked_days, 3);
        // July 1st 2026 is a Wednesday
        assert!(response.rows[0][0].date.is_none());
        assert!(response.rows[0][1].date.is_none());
        assert!(response.rows[0][2].marked);
        assert!(response.message.contains("[ 1]"));
    }

    #[test]
    fn test_month_offset_and_habit_marks() {
        let mut tracker = tracker(Weekday::Sun);
        let habit = tracker.add_habit("Run".to_string(), None).unwrap();
        tracker
            .toggle_habit_day(&habit.id, CalendarDate::from_ymd(2026, 6, 30).unwrap())
            .unwrap();

        let response = calendar_month(
            &tracker,
            CalendarMonthParams {
                month: Some("2026-07-31".to_string()),
                offset: Some(-1),
                habit_id: Some(habit.id.to_string()),
            },
        )
        .unwrap();

        assert_eq!(response.title, "June 2026");
        assert_eq!(response.weekday_headers[0], "Sun");
        assert_eq!(response.marked_days, 1);
    }
}
