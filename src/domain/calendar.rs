/// Month grid layout for calendar rendering
///
/// The builder turns a month anchor into a 7-column grid of day cells with
/// leading blanks. It knows nothing about habits or smoke-free days; renderers
/// look those up per cell.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::Serialize;

use crate::domain::CalendarDate;

pub const DAYS_PER_WEEK: usize = 7;

/// One slot in the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum CalendarGridCell {
    Blank,
    Day(CalendarDate),
}

impl CalendarGridCell {
    pub fn date(&self) -> Option<CalendarDate> {
        match self {
            CalendarGridCell::Blank => None,
            CalendarGridCell::Day(date) => Some(*date),
        }
    }
}

/// Builds month grids for a fixed first day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarGridBuilder {
    week_start: Weekday,
}

impl Default for CalendarGridBuilder {
    fn default() -> Self {
        Self::new(Weekday::Mon)
    }
}

impl CalendarGridBuilder {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Weekday labels in column order
    pub fn weekday_headers(&self) -> [Weekday; DAYS_PER_WEEK] {
        let mut headers = [self.week_start; DAYS_PER_WEEK];
        for i in 1..DAYS_PER_WEEK {
            headers[i] = headers[i - 1].succ();
        }
        headers
    }

    /// Grid for the month containing `anchor`
    ///
    /// Only the anchor's year and month matter.
    pub fn build_month_grid(&self, anchor: CalendarDate) -> Vec<CalendarGridCell> {
        let first = first_of_month(anchor);
        let blanks = self.leading_blanks(first);
        let day_count = days_in_month(first);

        let mut cells = Vec::with_capacity(blanks + day_count as usize);
        cells.extend(std::iter::repeat(CalendarGridCell::Blank).take(blanks));
        cells.extend(
            first
                .iter_days()
                .take(day_count as usize)
                .map(|date| CalendarGridCell::Day(CalendarDate::new(date))),
        );
        cells
    }

    /// Grid split into rows of seven; the last row may be short
    pub fn build_month_rows(&self, anchor: CalendarDate) -> Vec<Vec<CalendarGridCell>> {
        self.build_month_grid(anchor)
            .chunks(DAYS_PER_WEEK)
            .map(|row| row.to_vec())
            .collect()
    }

    fn leading_blanks(&self, first: NaiveDate) -> usize {
        let day = first.weekday().num_days_from_monday() as usize;
        let start = self.week_start.num_days_from_monday() as usize;
        (DAYS_PER_WEEK + day - start) % DAYS_PER_WEEK
    }
}

/// Shift the anchor by whole months
///
/// Day-of-month clamps to the target month's length (Jan 31 + 1 → Feb 28/29).
/// Returns the anchor unchanged if the result would leave chrono's range.
pub fn move_month(anchor: CalendarDate, delta: i32) -> CalendarDate {
    let date = anchor.naive();
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.map(CalendarDate::new).unwrap_or(anchor)
}

/// "October 2026"
pub fn month_title(anchor: CalendarDate) -> String {
    anchor.naive().format("%B %Y").to_string()
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .map(|next| (next - first).num_days() as u32)
        // December of chrono's last representable year
        .unwrap_or(31)
}

fn first_of_month(anchor: CalendarDate) -> NaiveDate {
    let date = anchor.naive();
    date.with_day(1).unwrap_or(date)
}
