//! Calendar rings: the colors of the habits completed on each day

use std::collections::BTreeMap;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::debug;

use super::read_or_absent;
use crate::domain::{Habit, Month};
use crate::state::LogReader;

/// One cell of a month grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the padding days of the previous/next month
    pub in_month: bool,
    /// Colors of completed habits in display order; None when nothing was done
    pub ring: Option<Vec<String>>,
}

/// A month padded to six full Monday-first weeks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    pub month: Month,
    pub days: Vec<CalendarDay>,
}

impl MonthCalendar {
    /// Grid rows, Monday first
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }
}

/// Colors of the habits done on one date, keeping the habits' order
async fn ring_for<R>(reader: &R, habits: &[Habit], date: NaiveDate) -> Vec<String>
where
    R: LogReader + ?Sized,
{
    let mut ring = Vec::new();
    for habit in habits {
        let value = read_or_absent(reader, date, &habit.id).await;
        if habit.is_done_opt(value.as_ref()) {
            ring.push(habit.color.clone());
        }
    }
    ring
}

/// Build the ring for every date that has at least one completed habit
///
/// `sorted_habits` should already be in display order; ring segments follow it.
/// Dates are read concurrently, habits within a date sequentially.
pub async fn build_rings<R>(reader: &R, sorted_habits: &[Habit], dates: &[NaiveDate]) -> BTreeMap<NaiveDate, Vec<String>>
where
    R: LogReader + ?Sized,
{
    debug!(habits = sorted_habits.len(), dates = dates.len(), "build_rings: called");
    let rings = join_all(dates.iter().map(|d| ring_for(reader, sorted_habits, *d))).await;

    dates
        .iter()
        .zip(rings)
        .filter(|(_, ring)| !ring.is_empty())
        .map(|(date, ring)| (*date, ring))
        .collect()
}

/// The 42-day grid for `month` with a ring on every day something was done
pub async fn month_calendar<R>(reader: &R, sorted_habits: &[Habit], month: Month) -> MonthCalendar
where
    R: LogReader + ?Sized,
{
    let dates = month.grid_days();
    let mut rings = build_rings(reader, sorted_habits, &dates).await;

    let days = dates
        .into_iter()
        .map(|date| CalendarDay {
            date,
            in_month: month.contains(date),
            ring: rings.remove(&date),
        })
        .collect();

    MonthCalendar { month, days }
}
