//! Daily log values
//!
//! A log entry is the recorded value of one habit on one calendar day,
//! stored in the `logs` collection under `"{date}|{habit_id}"`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::date::format_date;

/// Collection holding daily log values
pub const LOGS_COLLECTION: &str = "logs";

/// Collection holding lifecycle flags
pub const META_COLLECTION: &str = "meta";

/// Recorded value of a habit on a day
///
/// Absence of a value ("not yet recorded") is modelled as `Option::None`
/// by callers, distinct from `Check(false)` / `Count(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    Check(bool),
    Count(u32),
}

impl LogValue {
    /// Build a count value, clamping negatives to zero
    pub fn count(value: i64) -> Self {
        Self::Count(value.clamp(0, u32::MAX as i64) as u32)
    }

    /// Interpret a stored JSON value
    ///
    /// Numbers are clamped to the non-negative integer range. Anything that is
    /// neither a bool nor a number yields None.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Check(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::count(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Self::Count(u.min(u32::MAX as u64) as u32))
                } else {
                    n.as_f64().map(|f| Self::count(f.floor() as i64))
                }
            }
            _ => None,
        }
    }

    /// JSON form written to the store
    pub fn to_json(self) -> Value {
        match self {
            Self::Check(b) => Value::Bool(b),
            Self::Count(n) => Value::from(n),
        }
    }

    /// Value as a check mark; counts never count as checked
    pub fn as_checked(self) -> bool {
        matches!(self, Self::Check(true))
    }

    /// Value as a count; check marks contribute nothing
    pub fn as_count(self) -> u32 {
        match self {
            Self::Count(n) => n,
            Self::Check(_) => 0,
        }
    }
}

impl std::fmt::Display for LogValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Check(true) => write!(f, "✓"),
            Self::Check(false) => write!(f, "·"),
            Self::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Composite key of a log entry
pub fn log_key(date: NaiveDate, habit_id: &str) -> String {
    format!("{}|{}", format_date(date), habit_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_key_format() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(log_key(date, "surfing"), "2024-02-09|surfing");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(LogValue::from_json(&json!(true)), Some(LogValue::Check(true)));
        assert_eq!(LogValue::from_json(&json!(4)), Some(LogValue::Count(4)));
        assert_eq!(LogValue::from_json(&json!(-2)), Some(LogValue::Count(0)));
        assert_eq!(LogValue::from_json(&json!(2.7)), Some(LogValue::Count(2)));
        assert_eq!(LogValue::from_json(&json!("yes")), None);
        assert_eq!(LogValue::from_json(&Value::Null), None);
    }

    #[test]
    fn test_count_clamps() {
        assert_eq!(LogValue::count(-5), LogValue::Count(0));
        assert_eq!(LogValue::count(7), LogValue::Count(7));
    }

    #[test]
    fn test_serde_is_bare_json() {
        assert_eq!(serde_json::to_string(&LogValue::Check(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&LogValue::Count(3)).unwrap(), "3");
        assert_eq!(LogValue::Count(3).to_json(), json!(3));
    }

    #[test]
    fn test_cross_kind_interpretation() {
        assert!(!LogValue::Count(5).as_checked());
        assert_eq!(LogValue::Check(true).as_count(), 0);
    }
}
