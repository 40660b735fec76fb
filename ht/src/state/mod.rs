//! State management with actor pattern
//!
//! StateManager owns the HabitStore and processes messages via channels,
//! providing serialized access to persistent state.

mod manager;
mod messages;
mod traits;

pub use manager::{HabitEdit, NewHabit, SEEDED_META_KEY, StateEvent, StateManager};
pub use messages::{StateCommand, StateError, StateResponse};
pub use traits::{HabitWriter, LogReader};
