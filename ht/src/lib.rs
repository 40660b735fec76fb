//! Habitrack - local habit tracker core
//!
//! Habits are either binary checks or non-negative counts, logged once per
//! calendar day. The core keeps them in a local store, orders them for
//! display, proposes distinct colors for new habits, and aggregates logs into
//! day summaries, per-habit KPIs and calendar rings.
//!
//! # Modules
//!
//! - [`domain`] - Habit, log value and calendar types
//! - [`state`] - Async actor in front of the habit store
//! - [`ordering`] - Display order backfill, sort and move up/down
//! - [`color`] - Distinct color picker
//! - [`analytics`] - Day summaries, range KPIs and calendar rings
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod analytics;
pub mod cli;
pub mod color;
pub mod config;
pub mod domain;
pub mod ordering;
pub mod state;

// Re-export commonly used types
pub use analytics::{DaySummary, MonthCalendar, RangeKpis};
pub use config::Config;
pub use domain::{DateRange, Habit, HabitKind, LogValue, Month, Record, Store};
pub use ordering::Direction;
pub use state::{HabitEdit, NewHabit, StateError, StateManager};
