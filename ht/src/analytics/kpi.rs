//! Per-habit KPIs over a date range

use std::fmt;

use futures::future::join_all;
use tracing::debug;

use super::{percent, read_or_absent};
use crate::domain::{DateRange, Habit, HabitKind, LogValue};
use crate::state::LogReader;

/// KPIs for a check habit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckKpis {
    pub days: usize,
    pub done: usize,
    pub missed: usize,
    /// Done days as a percentage of the range, 0 for an empty range
    pub percent: u32,
}

/// KPIs for a count habit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountKpis {
    pub days: usize,
    pub total: u64,
    /// Largest single-day value
    pub max: u32,
    /// Per-day average in tenths, rounded half up
    pub average_tenths: u64,
}

impl CountKpis {
    fn from_values(values: &[Option<LogValue>]) -> Self {
        let counts = values.iter().map(|v| v.map_or(0, LogValue::as_count));
        let days = values.len();
        let total: u64 = counts.clone().map(u64::from).sum();
        let max = counts.max().unwrap_or(0);
        let average_tenths = if days == 0 {
            0
        } else {
            let days = days as u64;
            (20 * total + days) / (2 * days)
        };

        Self {
            days,
            total,
            max,
            average_tenths,
        }
    }

    /// Average per day with one decimal place, e.g. `"2.3"`
    pub fn average(&self) -> String {
        format!("{}.{}", self.average_tenths / 10, self.average_tenths % 10)
    }
}

/// KPIs for one habit, shaped by its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKpis {
    Check(CheckKpis),
    Count(CountKpis),
}

impl fmt::Display for RangeKpis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Check(k) => write!(f, "{}/{} days done ({}%), {} missed", k.done, k.days, k.percent, k.missed),
            Self::Count(k) => write!(f, "total {}, avg {}/day, max {}", k.total, k.average(), k.max),
        }
    }
}

/// Compute a habit's KPIs over every date of `range`
///
/// An empty range yields zeros rather than an error.
pub async fn habit_range_kpis<R>(reader: &R, habit: &Habit, range: DateRange) -> RangeKpis
where
    R: LogReader + ?Sized,
{
    let dates = range.dates();
    debug!(habit_id = %habit.id, %range, days = dates.len(), "habit_range_kpis: called");

    let values = join_all(dates.iter().map(|d| read_or_absent(reader, *d, &habit.id))).await;

    match habit.kind {
        HabitKind::Check { .. } => {
            let days = values.len();
            let done = values.iter().filter(|v| habit.is_done_opt(v.as_ref())).count();
            RangeKpis::Check(CheckKpis {
                days,
                done,
                missed: days - done,
                percent: percent(done, days, 0),
            })
        }
        HabitKind::Count { .. } => RangeKpis::Count(CountKpis::from_values(&values)),
    }
}
