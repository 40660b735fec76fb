//! Per-day completion summary

use chrono::NaiveDate;
use futures::future::join_all;

use super::read_or_absent;
use crate::domain::{Habit, LogValue};
use crate::state::LogReader;

/// One habit's state on one day
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub habit: Habit,
    /// None when nothing was recorded
    pub value: Option<LogValue>,
    pub done: bool,
}

/// Completion figures for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub required_done: usize,
    pub required_total: usize,
    pub optional_done: usize,
    pub optional_total: usize,
    /// 100 when there are no required habits
    pub required_percent: u32,
    /// 100 when there are no optional habits
    pub optional_percent: u32,
    /// Sum of all count-habit values recorded that day
    pub count_total: u64,
}

impl DaySummary {
    /// Fold per-habit entries into the day's figures
    pub fn from_entries(date: NaiveDate, entries: &[DayEntry]) -> Self {
        let (required, optional): (Vec<&DayEntry>, Vec<&DayEntry>) =
            entries.iter().partition(|e| e.habit.is_required());

        let required_done = required.iter().filter(|e| e.done).count();
        let optional_done = optional.iter().filter(|e| e.done).count();
        let count_total = entries
            .iter()
            .filter(|e| e.habit.kind.is_count())
            .map(|e| e.value.map_or(0, LogValue::as_count) as u64)
            .sum();

        Self {
            date,
            required_done,
            required_total: required.len(),
            optional_done,
            optional_total: optional.len(),
            required_percent: percent(required_done, required.len(), 100),
            optional_percent: percent(optional_done, optional.len(), 100),
            count_total,
        }
    }
}

/// `done / total` as a percentage, rounded half up; `empty` when total is 0
pub fn percent(done: usize, total: usize, empty: u32) -> u32 {
    if total == 0 {
        return empty;
    }
    let (done, total) = (done as u64, total as u64);
    ((200 * done + total) / (2 * total)) as u32
}

/// Every habit's recorded value for a date, in the order given
pub async fn day_entries<R>(reader: &R, habits: &[Habit], date: NaiveDate) -> Vec<DayEntry>
where
    R: LogReader + ?Sized,
{
    let values = join_all(habits.iter().map(|h| read_or_absent(reader, date, &h.id))).await;

    habits
        .iter()
        .zip(values)
        .map(|(habit, value)| DayEntry {
            done: habit.is_done_opt(value.as_ref()),
            habit: habit.clone(),
            value,
        })
        .collect()
}

/// Required/optional completion and count total for one date
pub async fn day_summary<R>(reader: &R, habits: &[Habit], date: NaiveDate) -> DaySummary
where
    R: LogReader + ?Sized,
{
    let entries = day_entries(reader, habits, date).await;
    DaySummary::from_entries(date, &entries)
}
