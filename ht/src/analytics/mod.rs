//! Log aggregation and calendar rings
//!
//! Everything here is read-only and written against [`LogReader`], so it runs
//! the same over the [`StateManager`](crate::state::StateManager) or an
//! in-memory fake. A failed read never aborts an aggregation: the value is
//! logged and treated as absent, which counts as "not done" / 0.

mod calendar;
mod kpi;
mod summary;

pub use calendar::{CalendarDay, MonthCalendar, build_rings, month_calendar};
pub use kpi::{CheckKpis, CountKpis, RangeKpis, habit_range_kpis};
pub use summary::{DayEntry, DaySummary, day_entries, day_summary, percent};

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::LogValue;
use crate::state::LogReader;

/// Read one log value, treating a failed read as absent
pub(crate) async fn read_or_absent<R>(reader: &R, date: NaiveDate, habit_id: &str) -> Option<LogValue>
where
    R: LogReader + ?Sized,
{
    match reader.get_log(date, habit_id).await {
        Ok(value) => value,
        Err(e) => {
            warn!(%date, %habit_id, error = %e, "Failed to read log, treating as absent");
            None
        }
    }
}
