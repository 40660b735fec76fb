//! StateManager - actor that owns the HabitStore
//!
//! Processes commands via channels so the store only ever sees one writer.
//! Nothing is cached here: every read goes to the store, so a completed write
//! is visible to the next read.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::path::Path;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::color::{normalize_hex, pick_color};
use crate::domain::{Habit, HabitKind, LOGS_COLLECTION, LogValue, META_COLLECTION, Store, generate_id, log_key};
use crate::ordering::{self, Direction};

use super::messages::{StateCommand, StateError, StateResponse};
use super::traits::{HabitWriter, LogReader};

/// Meta key recording that the default habit was installed
pub const SEEDED_META_KEY: &str = "seeded";

/// Event broadcast after a successful write
///
/// Subscribers that keep derived views (day summaries, calendar rings) use
/// these to know when to re-query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// A habit was created or edited
    HabitSaved { id: String },
    /// A habit was deleted (its logs stay behind, orphaned)
    HabitDeleted { id: String },
    /// A log value was written
    LogWritten { date: NaiveDate, habit_id: String },
}

/// Fields for creating a habit
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub icon: Option<String>,
    pub kind: HabitKind,
    /// Picked to be distinct from existing habits when None
    pub color: Option<String>,
}

impl NewHabit {
    pub fn new(name: impl Into<String>, kind: HabitKind) -> Self {
        Self {
            name: name.into(),
            icon: None,
            kind,
            color: None,
        }
    }
}

/// Editable fields of a habit; kind and id are fixed at creation
#[derive(Debug, Clone, Default)]
pub struct HabitEdit {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub required: Option<bool>,
    pub min_count: Option<u32>,
}

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
    /// Broadcast sender for state change notifications
    event_tx: broadcast::Sender<StateEvent>,
}

impl StateManager {
    /// Spawn a new StateManager actor over the store in `store_path`
    pub fn spawn(store_path: impl AsRef<Path>) -> eyre::Result<Self> {
        debug!(store_path = %store_path.as_ref().display(), "spawn: called");
        let store = Store::open(store_path.as_ref())?;
        Ok(Self::with_store(store))
    }

    /// Spawn an actor over an already opened store
    pub fn with_store(store: Store) -> Self {
        let (tx, rx) = mpsc::channel(256);
        let (event_tx, _) = broadcast::channel(64);

        tokio::spawn(actor_loop(store, rx));

        info!("StateManager spawned");

        Self { tx, event_tx }
    }

    /// Subscribe to state change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<StateEvent> {
        self.event_tx.subscribe()
    }

    fn notify(&self, event: StateEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    async fn request<T>(&self, cmd: StateCommand, reply_rx: oneshot::Receiver<StateResponse<T>>) -> StateResponse<T> {
        self.tx.send(cmd).await.map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    // === Record store contract ===

    /// All habits in store order (unsorted, order not backfilled)
    pub async fn get_habits(&self) -> StateResponse<Vec<Habit>> {
        debug!("get_habits: called");
        let (reply, reply_rx) = oneshot::channel();
        self.request(StateCommand::ListHabits { reply }, reply_rx).await
    }

    /// Get a habit by ID
    pub async fn get_habit(&self, id: &str) -> StateResponse<Option<Habit>> {
        debug!(%id, "get_habit: called");
        let (reply, reply_rx) = oneshot::channel();
        self.request(
            StateCommand::GetHabit {
                id: id.to_string(),
                reply,
            },
            reply_rx,
        )
        .await
    }

    /// Get a habit by ID, returning error if not found
    pub async fn get_habit_required(&self, id: &str) -> StateResponse<Habit> {
        self.get_habit(id)
            .await?
            .ok_or_else(|| StateError::NotFound(format!("Habit {}", id)))
    }

    /// Insert or replace a habit by id
    pub async fn put_habit(&self, habit: Habit) -> StateResponse<()> {
        debug!(habit_id = %habit.id, order = ?habit.order, "put_habit: called");
        let id = habit.id.clone();
        let (reply, reply_rx) = oneshot::channel();
        self.request(StateCommand::PutHabit { habit, reply }, reply_rx).await?;
        self.notify(StateEvent::HabitSaved { id });
        Ok(())
    }

    /// Delete a habit; its logs are left in place
    pub async fn delete_habit(&self, id: &str) -> StateResponse<bool> {
        debug!(%id, "delete_habit: called");
        let (reply, reply_rx) = oneshot::channel();
        let existed = self
            .request(
                StateCommand::DeleteHabit {
                    id: id.to_string(),
                    reply,
                },
                reply_rx,
            )
            .await?;
        if existed {
            self.notify(StateEvent::HabitDeleted { id: id.to_string() });
        }
        Ok(existed)
    }

    /// Recorded value of a habit on a date
    pub async fn get_log(&self, date: NaiveDate, habit_id: &str) -> StateResponse<Option<LogValue>> {
        let (reply, reply_rx) = oneshot::channel();
        let raw = self
            .request(
                StateCommand::GetLog {
                    date,
                    habit_id: habit_id.to_string(),
                    reply,
                },
                reply_rx,
            )
            .await?;

        match raw {
            None => Ok(None),
            Some(value) => LogValue::from_json(&value).map(Some).ok_or_else(|| {
                StateError::DeserializationError(format!("Unreadable log {}: {}", log_key(date, habit_id), value))
            }),
        }
    }

    /// Record a habit's value on a date, replacing any previous value
    pub async fn set_log(&self, date: NaiveDate, habit_id: &str, value: LogValue) -> StateResponse<()> {
        debug!(%date, %habit_id, ?value, "set_log: called");
        let (reply, reply_rx) = oneshot::channel();
        self.request(
            StateCommand::SetLog {
                date,
                habit_id: habit_id.to_string(),
                value,
                reply,
            },
            reply_rx,
        )
        .await?;
        self.notify(StateEvent::LogWritten {
            date,
            habit_id: habit_id.to_string(),
        });
        Ok(())
    }

    /// Read a metadata flag
    pub async fn get_meta(&self, key: &str) -> StateResponse<Option<Value>> {
        debug!(%key, "get_meta: called");
        let (reply, reply_rx) = oneshot::channel();
        self.request(
            StateCommand::GetMeta {
                key: key.to_string(),
                reply,
            },
            reply_rx,
        )
        .await
    }

    /// Write a metadata flag
    pub async fn set_meta(&self, key: &str, value: Value) -> StateResponse<()> {
        debug!(%key, %value, "set_meta: called");
        let (reply, reply_rx) = oneshot::channel();
        self.request(
            StateCommand::SetMeta {
                key: key.to_string(),
                value,
                reply,
            },
            reply_rx,
        )
        .await
    }

    /// Shutdown the StateManager
    pub async fn shutdown(&self) -> StateResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }

    // === Convenience methods ===

    /// Full habit list: order backfilled where missing, then sorted for display
    pub async fn load_habits(&self) -> StateResponse<Vec<Habit>> {
        debug!("load_habits: called");
        let habits = self.get_habits().await?;
        let habits = ordering::ensure_order(self, habits).await?;
        Ok(ordering::sort_habits(&habits))
    }

    /// Create a habit with a generated id, placed after every existing habit
    pub async fn add_habit(&self, new: NewHabit) -> StateResponse<Habit> {
        debug!(name = %new.name, kind = %new.kind, "add_habit: called");
        let name = validate_name(&new.name)?;
        let existing = self.get_habits().await?;

        let color = match new.color.as_deref() {
            Some(color) => validate_color(color)?,
            None => {
                let used: Vec<&str> = existing.iter().map(|h| h.color.as_str()).collect();
                pick_color(&used)
            }
        };

        let order = existing.iter().filter_map(|h| h.order).max().map_or(0, |max| max + 1);
        let mut habit = Habit::new(generate_id(&name), name, new.kind)
            .with_color(color)
            .with_order(order);
        if let Some(icon) = new.icon.filter(|i| !i.trim().is_empty()) {
            habit = habit.with_icon(icon.trim());
        }

        self.put_habit(habit.clone()).await?;
        info!(habit_id = %habit.id, "Created habit");
        Ok(habit)
    }

    /// Apply an edit to a habit's display fields and threshold
    pub async fn edit_habit(&self, id: &str, edit: HabitEdit) -> StateResponse<Habit> {
        debug!(%id, ?edit, "edit_habit: called");
        let mut habit = self.get_habit_required(id).await?;

        if let Some(name) = edit.name.as_deref() {
            habit.name = validate_name(name)?;
        }
        if let Some(icon) = edit.icon.as_deref() {
            let icon = icon.trim();
            if !icon.is_empty() {
                habit.icon = icon.to_string();
            }
        }
        if let Some(color) = edit.color.as_deref() {
            habit.color = validate_color(color)?;
        }
        if edit.min_count.is_some() && !habit.kind.is_count() {
            return Err(StateError::InvalidInput(format!(
                "{} is a check habit; a minimum count only applies to count habits",
                habit.name
            )));
        }
        if edit.required.is_some() || edit.min_count.is_some() {
            let required = edit.required.unwrap_or(habit.is_required() || edit.min_count.is_some());
            habit.kind = habit.kind.with_required(required, edit.min_count);
        }

        self.put_habit(habit.clone()).await?;
        Ok(habit)
    }

    /// Flip a check habit's value for a date, returning the new value
    pub async fn toggle_check(&self, date: NaiveDate, habit_id: &str) -> StateResponse<bool> {
        let habit = self.get_habit_required(habit_id).await?;
        if habit.kind.is_count() {
            return Err(StateError::InvalidInput(format!("{} is a count habit", habit.name)));
        }

        let current = self.get_log(date, habit_id).await?.is_some_and(LogValue::as_checked);
        let next = !current;
        self.set_log(date, habit_id, LogValue::Check(next)).await?;
        Ok(next)
    }

    /// Add `delta` to a count habit's value for a date (never below zero)
    pub async fn adjust_count(&self, date: NaiveDate, habit_id: &str, delta: i64) -> StateResponse<u32> {
        let current = self
            .get_log(date, habit_id)
            .await?
            .map_or(0, LogValue::as_count);
        self.set_count(date, habit_id, (current as i64).saturating_add(delta)).await
    }

    /// Set a count habit's value for a date (clamped at zero)
    pub async fn set_count(&self, date: NaiveDate, habit_id: &str, value: i64) -> StateResponse<u32> {
        let habit = self.get_habit_required(habit_id).await?;
        if !habit.kind.is_count() {
            return Err(StateError::InvalidInput(format!("{} is a check habit", habit.name)));
        }

        let value = LogValue::count(value);
        self.set_log(date, habit_id, value).await?;
        Ok(value.as_count())
    }

    /// Move a habit one slot up or down in display order
    ///
    /// Returns false when the habit is already first/last.
    pub async fn move_habit(&self, habit_id: &str, direction: Direction) -> StateResponse<bool> {
        let sorted = self.load_habits().await?;
        let index = sorted
            .iter()
            .position(|h| h.id == habit_id)
            .ok_or_else(|| StateError::NotFound(format!("Habit {}", habit_id)))?;
        ordering::move_habit(self, &sorted, index, direction).await
    }

    /// Install the default habit on first run
    ///
    /// Only seeds when the store has never been seeded and holds no habits.
    pub async fn seed_defaults(&self, default_habit: Habit) -> StateResponse<bool> {
        let seeded = self.get_meta(SEEDED_META_KEY).await?.is_some_and(|v| v == Value::Bool(true));
        if seeded {
            debug!("seed_defaults: already seeded");
            return Ok(false);
        }

        if !self.get_habits().await?.is_empty() {
            debug!("seed_defaults: store already has habits");
            return Ok(false);
        }

        self.put_habit(default_habit).await?;
        self.set_meta(SEEDED_META_KEY, Value::Bool(true)).await?;
        info!("Seeded default habit");
        Ok(true)
    }
}

fn validate_name(name: &str) -> StateResponse<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StateError::InvalidInput("Habit name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

fn validate_color(color: &str) -> StateResponse<String> {
    normalize_hex(color)
        .ok_or_else(|| StateError::InvalidInput(format!("Invalid color '{}', expected #rrggbb", color)))
}

#[async_trait]
impl LogReader for StateManager {
    async fn get_log(&self, date: NaiveDate, habit_id: &str) -> StateResponse<Option<LogValue>> {
        StateManager::get_log(self, date, habit_id).await
    }
}

#[async_trait]
impl HabitWriter for StateManager {
    async fn put_habit(&self, habit: Habit) -> StateResponse<()> {
        StateManager::put_habit(self, habit).await
    }
}

fn store_err(e: eyre::Report) -> StateError {
    StateError::StoreError(format!("{:#}", e))
}

/// The actor loop that owns the Store and processes commands
async fn actor_loop(mut store: Store, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::ListHabits { reply } => {
                debug!("actor_loop: ListHabits command");
                let result = store.list::<Habit>().map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::GetHabit { id, reply } => {
                debug!(%id, "actor_loop: GetHabit command");
                let result = store.get::<Habit>(&id).map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::PutHabit { habit, reply } => {
                debug!(habit_id = %habit.id, "actor_loop: PutHabit command");
                let result = store.put(&habit).map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::DeleteHabit { id, reply } => {
                debug!(%id, "actor_loop: DeleteHabit command");
                let result = store.delete::<Habit>(&id).map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::GetLog { date, habit_id, reply } => {
                let key = log_key(date, &habit_id);
                let result = store.get_value(LOGS_COLLECTION, &key).map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::SetLog {
                date,
                habit_id,
                value,
                reply,
            } => {
                let key = log_key(date, &habit_id);
                debug!(%key, "actor_loop: SetLog command");
                let result = store
                    .set_value(LOGS_COLLECTION, &key, &value.to_json())
                    .map_err(store_err);
                if let Err(e) = &result {
                    warn!(%key, error = %e, "Failed to write log");
                }
                let _ = reply.send(result);
            }

            StateCommand::GetMeta { key, reply } => {
                debug!(%key, "actor_loop: GetMeta command");
                let result = store.get_value(META_COLLECTION, &key).map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::SetMeta { key, value, reply } => {
                debug!(%key, "actor_loop: SetMeta command");
                let result = store.set_value(META_COLLECTION, &key, &value).map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::Shutdown => {
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}
