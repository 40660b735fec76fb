//! HabitStore - local persistence for the habit tracker
//!
//! A small durable key-value model on top of SQLite. Three logical
//! collections live side by side in one table:
//!
//! - `habits` - JSON documents keyed by record id (see [`Record`])
//! - `logs` - raw values keyed by `"{date}|{habit_id}"`
//! - `meta` - singleton flags keyed by name
//!
//! # Architecture
//!
//! ```text
//! {store_dir}/
//! └── habitstore.db     # entries(collection, key, value, updated_at)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use habitstore::Store;
//!
//! let mut store = Store::open("~/.local/share/habitrack")?;
//! store.set_value("meta", "seeded", &serde_json::json!(true))?;
//! let seeded = store.get_value("meta", "seeded")?;
//! ```

mod record;
mod store;

pub use record::Record;
pub use store::{DB_FILE_NAME, Store};

/// Current time as unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
