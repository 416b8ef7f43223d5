/// Day-granular date sets
///
/// A DateSet is the atomic unit both habit completions and smoke-free days are
/// built from. Storage order is irrelevant; iteration is always by day.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CalendarDate;

/// A deduplicated set of calendar days
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateSet {
    days: BTreeSet<CalendarDate>,
}

impl DateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from persisted instants
    ///
    /// UTC midnights map to their own day; any other instant is normalized to
    /// its day in `offset`. Instants that land on the same day collapse into
    /// one entry.
    pub fn from_instants<'a, I>(instants: I, offset: &FixedOffset) -> Self
    where
        I: IntoIterator<Item = &'a DateTime<Utc>>,
    {
        instants
            .into_iter()
            .map(|instant| CalendarDate::from_stored_instant(instant, offset))
            .collect()
    }

    /// UTC-midnight instants for persistence, ascending
    pub fn to_instants(&self) -> Vec<DateTime<Utc>> {
        self.days.iter().map(CalendarDate::to_stored_instant).collect()
    }

    /// Flip the presence of `day`
    ///
    /// Returns `true` if the day is present after the toggle.
    pub fn toggle(&mut self, day: CalendarDate) -> bool {
        if self.days.remove(&day) {
            false
        } else {
            self.days.insert(day);
            true
        }
    }

    /// Copy of this set with `day` toggled
    pub fn toggled(&self, day: CalendarDate) -> Self {
        let mut next = self.clone();
        next.toggle(day);
        next
    }

    pub fn contains(&self, day: CalendarDate) -> bool {
        self.days.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// All days, ascending
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = CalendarDate> + '_ {
        self.days.iter().copied()
    }

    /// Days on or before `last`, ascending
    pub fn iter_through(
        &self,
        last: CalendarDate,
    ) -> impl DoubleEndedIterator<Item = CalendarDate> + '_ {
        self.days.range(..=last).copied()
    }

    /// Number of days falling in the inclusive range `from..=to`
    pub fn count_between(&self, from: CalendarDate, to: CalendarDate) -> usize {
        if from > to {
            return 0;
        }
        self.days.range(from..=to).count()
    }
}

impl FromIterator<CalendarDate> for DateSet {
    fn from_iter<I: IntoIterator<Item = CalendarDate>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}
