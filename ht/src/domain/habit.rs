//! Habit record type
//!
//! A habit is either a binary check or a non-negative count. The kind is
//! fixed at creation; only the display fields and the completion threshold
//! can be edited afterwards.

use habitstore::Record;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use super::log::LogValue;
use crate::color::normalize_hex;

/// Icon used when a habit has none
pub const DEFAULT_ICON: &str = "✅";

/// Accent color used when a habit has none
pub const DEFAULT_COLOR: &str = "#35c5ff";

/// What kind of value a habit records, and when a day counts as done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitKind {
    /// Binary habit; done when checked
    Check { required: bool },
    /// Counted habit; required exactly when it has a threshold
    Count { min_count: Option<NonZeroU32> },
}

impl HabitKind {
    pub fn check(required: bool) -> Self {
        Self::Check { required }
    }

    /// Optional count habit, done on any positive count
    pub fn count() -> Self {
        Self::Count { min_count: None }
    }

    /// Required count habit; a zero threshold is coerced to 1
    pub fn count_at_least(min_count: u32) -> Self {
        Self::Count {
            min_count: Some(NonZeroU32::new(min_count).unwrap_or(NonZeroU32::MIN)),
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            Self::Check { required } => *required,
            Self::Count { min_count } => min_count.is_some(),
        }
    }

    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count { .. })
    }

    pub fn min_count(&self) -> Option<u32> {
        match self {
            Self::Count { min_count } => min_count.map(NonZeroU32::get),
            Self::Check { .. } => None,
        }
    }

    /// Change whether the habit is required, keeping the kind
    ///
    /// A count habit made required without a threshold gets a threshold of 1.
    pub fn with_required(self, required: bool, min_count: Option<u32>) -> Self {
        match self {
            Self::Check { .. } => Self::check(required),
            Self::Count { min_count: current } => {
                if !required {
                    Self::count()
                } else {
                    let min = min_count.or(current.map(NonZeroU32::get)).unwrap_or(1);
                    Self::count_at_least(min)
                }
            }
        }
    }

    /// Wire name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::Check { .. } => "check",
            Self::Count { .. } => "count",
        }
    }
}

impl std::fmt::Display for HabitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Check { required: true } => write!(f, "required check"),
            Self::Check { required: false } => write!(f, "check"),
            Self::Count { min_count: Some(min) } => write!(f, "count ≥ {}", min),
            Self::Count { min_count: None } => write!(f, "count"),
        }
    }
}

/// A tracked behavior definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HabitDocument", into = "HabitDocument")]
pub struct Habit {
    /// Unique identifier, immutable
    pub id: String,

    /// Display name
    pub name: String,

    /// Short display glyph
    pub icon: String,

    /// Check or count, immutable
    pub kind: HabitKind,

    /// Hex RGB accent color
    pub color: String,

    /// Display order; assigned lazily for habits created without one
    pub order: Option<i64>,
}

impl Habit {
    /// Create a habit with default icon and color and no order yet
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: HabitKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: DEFAULT_ICON.to_string(),
            kind,
            color: DEFAULT_COLOR.to_string(),
            order: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn is_required(&self) -> bool {
        self.kind.is_required()
    }

    /// Whether a recorded value completes this habit for the day
    pub fn is_done(&self, value: &LogValue) -> bool {
        match self.kind {
            HabitKind::Check { .. } => value.as_checked(),
            HabitKind::Count { min_count: Some(min) } => value.as_count() >= min.get(),
            HabitKind::Count { min_count: None } => value.as_count() > 0,
        }
    }

    /// Like [`Habit::is_done`], treating an unrecorded day as not done
    pub fn is_done_opt(&self, value: Option<&LogValue>) -> bool {
        value.is_some_and(|v| self.is_done(v))
    }
}

impl Record for Habit {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "habits"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindTag {
    #[default]
    Check,
    Count,
}

/// Flat persisted shape of a habit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HabitDocument {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    kind: KindTag,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_count: Option<i64>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<i64>,
}

impl From<HabitDocument> for Habit {
    fn from(doc: HabitDocument) -> Self {
        let kind = match doc.kind {
            KindTag::Check => HabitKind::check(doc.required),
            KindTag::Count if doc.required => {
                let min = doc.min_count.unwrap_or(1).clamp(1, u32::MAX as i64);
                HabitKind::count_at_least(min as u32)
            }
            KindTag::Count => HabitKind::count(),
        };

        let icon = doc
            .icon
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ICON.to_string());

        let color = match doc.color {
            Some(c) => normalize_hex(&c).unwrap_or(c),
            None => DEFAULT_COLOR.to_string(),
        };

        Self {
            id: doc.id,
            name: doc.name,
            icon,
            kind,
            color,
            order: doc.order,
        }
    }
}

impl From<Habit> for HabitDocument {
    fn from(habit: Habit) -> Self {
        let (kind, min_count) = match habit.kind {
            HabitKind::Check { .. } => (KindTag::Check, None),
            HabitKind::Count { min_count } => (KindTag::Count, min_count.map(|m| m.get() as i64)),
        };
        Self {
            id: habit.id,
            required: habit.kind.is_required(),
            name: habit.name,
            icon: Some(habit.icon),
            kind,
            min_count,
            color: Some(habit.color),
            order: habit.order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(required: bool) -> Habit {
        Habit::new("c", "Check", HabitKind::check(required))
    }

    #[test]
    fn test_is_done_check() {
        let habit = check(true);
        assert!(habit.is_done(&LogValue::Check(true)));
        assert!(!habit.is_done(&LogValue::Check(false)));
        assert!(!habit.is_done_opt(None));
    }

    #[test]
    fn test_is_done_required_count() {
        let habit = Habit::new("p", "Pushups", HabitKind::count_at_least(3));
        assert!(!habit.is_done(&LogValue::Count(2)));
        assert!(habit.is_done(&LogValue::Count(3)));
        assert!(habit.is_done(&LogValue::Count(10)));
    }

    #[test]
    fn test_is_done_optional_count() {
        let habit = Habit::new("s", "Surfing", HabitKind::count());
        assert!(!habit.is_done(&LogValue::Count(0)));
        assert!(habit.is_done(&LogValue::Count(1)));
    }

    #[test]
    fn test_zero_threshold_is_coerced() {
        assert_eq!(HabitKind::count_at_least(0).min_count(), Some(1));
    }

    #[test]
    fn test_with_required() {
        let kind = HabitKind::count().with_required(true, None);
        assert_eq!(kind.min_count(), Some(1));

        let kind = kind.with_required(true, Some(5));
        assert_eq!(kind.min_count(), Some(5));

        let kind = kind.with_required(false, Some(5));
        assert_eq!(kind, HabitKind::count());

        // Kind never changes
        assert_eq!(HabitKind::check(false).with_required(true, Some(3)), HabitKind::check(true));
    }

    #[test]
    fn test_serialized_shape() {
        let habit = Habit::new("p", "Pushups", HabitKind::count_at_least(3))
            .with_icon("💪")
            .with_order(2);
        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "p",
                "name": "Pushups",
                "icon": "💪",
                "kind": "count",
                "required": true,
                "minCount": 3,
                "color": "#35c5ff",
                "order": 2
            })
        );
    }

    #[test]
    fn test_load_normalizes_document() {
        let habit: Habit = serde_json::from_value(json!({
            "id": "surfing",
            "name": "Surfing",
            "kind": "count",
            "required": true,
            "minCount": 0,
            "color": "#35C5FF"
        }))
        .unwrap();
        assert_eq!(habit.kind.min_count(), Some(1));
        assert_eq!(habit.icon, DEFAULT_ICON);
        assert_eq!(habit.color, "#35c5ff");
        assert_eq!(habit.order, None);
    }

    #[test]
    fn test_load_drops_threshold_on_optional_habit() {
        let habit: Habit = serde_json::from_value(json!({
            "id": "x",
            "name": "X",
            "kind": "count",
            "required": false,
            "minCount": 4
        }))
        .unwrap();
        assert_eq!(habit.kind, HabitKind::count());
        assert!(!habit.is_required());
    }

    #[test]
    fn test_load_keeps_unparseable_color() {
        let habit: Habit = serde_json::from_value(json!({
            "id": "x",
            "name": "X",
            "kind": "check",
            "color": "teal"
        }))
        .unwrap();
        assert_eq!(habit.color, "teal");
    }
}
