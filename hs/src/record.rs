//! Record trait for typed documents

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A typed document stored as JSON under `(collection_name(), id())`
pub trait Record: Serialize + DeserializeOwned {
    /// Unique id within the collection
    fn id(&self) -> &str;

    /// Logical collection the record lives in
    fn collection_name() -> &'static str;
}
