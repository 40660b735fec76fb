//! Narrow read/write seams over the habit store
//!
//! Ordering and analytics code is written against these traits so it can run
//! against the [`StateManager`](super::StateManager) or an in-memory fake.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::messages::StateResponse;
use crate::domain::{Habit, LogValue};

/// Reads one log value
#[async_trait]
pub trait LogReader: Send + Sync {
    /// Recorded value of a habit on a date, None if never recorded
    async fn get_log(&self, date: NaiveDate, habit_id: &str) -> StateResponse<Option<LogValue>>;
}

/// Persists one habit
#[async_trait]
pub trait HabitWriter: Send + Sync {
    /// Insert or replace a habit by id
    async fn put_habit(&self, habit: Habit) -> StateResponse<()>;
}
