//! Domain types for Habitrack
//!
//! Core domain types: Habit, LogValue, and the calendar helpers used to
//! address logs by local date. Habit implements the Record trait for
//! HabitStore persistence.

mod date;
mod habit;
mod id;
mod log;

pub use date::{
    DATE_FORMAT, DateRange, GRID_DAYS, Month, RangePreset, enumerate_dates, format_date, parse_date, today,
};
pub use habit::{DEFAULT_COLOR, DEFAULT_ICON, Habit, HabitKind};
pub use id::{IdResolver, generate_id};
pub use log::{LOGS_COLLECTION, LogValue, META_COLLECTION, log_key};

// Re-export habitstore types for convenience
pub use habitstore::{Record, Store};
