//! State manager messages
//!
//! Commands and responses for the actor pattern.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{Habit, LogValue};

/// Errors from state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    // Habit operations
    ListHabits {
        reply: oneshot::Sender<StateResponse<Vec<Habit>>>,
    },
    GetHabit {
        id: String,
        reply: oneshot::Sender<StateResponse<Option<Habit>>>,
    },
    PutHabit {
        habit: Habit,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    DeleteHabit {
        id: String,
        reply: oneshot::Sender<StateResponse<bool>>,
    },

    // Log operations
    GetLog {
        date: NaiveDate,
        habit_id: String,
        reply: oneshot::Sender<StateResponse<Option<Value>>>,
    },
    SetLog {
        date: NaiveDate,
        habit_id: String,
        value: LogValue,
        reply: oneshot::Sender<StateResponse<()>>,
    },

    // Metadata operations
    GetMeta {
        key: String,
        reply: oneshot::Sender<StateResponse<Option<Value>>>,
    },
    SetMeta {
        key: String,
        value: Value,
        reply: oneshot::Sender<StateResponse<()>>,
    },

    // Shutdown
    Shutdown,
}
