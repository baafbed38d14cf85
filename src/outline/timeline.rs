//! Day/week grid bounding the visible dated tasks.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::resolve::EffectiveDates;
use crate::models::Task;

/// A padded grid of whole Sunday-to-Saturday weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Sunday on or before the earliest visible date.
    pub padded_start: NaiveDate,
    /// Saturday on or after the latest visible date.
    pub padded_end: NaiveDate,
    /// Every calendar day in `padded_start..=padded_end`.
    pub days: Vec<NaiveDate>,
    /// Week starts (Sundays) in the same range.
    pub weeks: Vec<NaiveDate>,
}

impl Timeline {
    /// Build the grid for `visible` tasks using their resolved ranges.
    ///
    /// Returns `None` when no visible task has any effective bound. Tasks that
    /// are missing from `dates` are skipped. Collapsed subtrees must already be
    /// filtered out by the caller, see [`super::TreeIndex::visible`].
    pub fn build<'t, I>(visible: I, dates: &EffectiveDates) -> Option<Self>
    where
        I: IntoIterator<Item = &'t Task>,
    {
        let mut min_start: Option<NaiveDate> = None;
        let mut max_end: Option<NaiveDate> = None;
        for task in visible {
            let Some(range) = dates.get(&task.id) else {
                continue;
            };
            if let Some(start) = range.effective_start {
                min_start = Some(min_start.map_or(start, |m| m.min(start)));
            }
            if let Some(end) = range.effective_end {
                max_end = Some(max_end.map_or(end, |m| m.max(end)));
            }
        }

        let (min, max) = match (min_start, max_end) {
            (None, None) => return None,
            (Some(s), None) => (s, s),
            (None, Some(e)) => (e, e),
            (Some(s), Some(e)) => (s, e),
        };
        // Inverted ranges can make the latest end precede the earliest start.
        let (min, max) = (min.min(max), min.max(max));

        Some(Self::padded(min, max))
    }

    fn padded(min: NaiveDate, max: NaiveDate) -> Self {
        let padded_start = week_start(min);
        let padded_end = week_end(max);

        let days: Vec<NaiveDate> = padded_start
            .iter_days()
            .take_while(|d| *d <= padded_end)
            .collect();
        let weeks = days.iter().step_by(7).copied().collect();

        Self {
            padded_start,
            padded_end,
            days,
            weeks,
        }
    }

    /// Offset of `date` in days from the padded start.
    pub fn day_offset(&self, date: NaiveDate) -> i64 {
        (date - self.padded_start).num_days()
    }
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday();
    date.checked_sub_days(Days::new(back.into())).unwrap_or(date)
}

/// Saturday on or after `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let forward = 6 - date.weekday().num_days_from_sunday();
    date.checked_add_days(Days::new(forward.into())).unwrap_or(date)
}

/// ISO-8601 week number for the Sunday-starting week beginning at
/// `week_start`, taken from that week's Thursday.
pub fn iso_week_number(week_start: NaiveDate) -> u32 {
    week_start
        .checked_add_days(Days::new(4))
        .unwrap_or(week_start)
        .iso_week()
        .week()
}
