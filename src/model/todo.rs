use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

use super::lenient::{self, Lenient};

/// Title used when a todo is created without one.
pub const DEFAULT_TODO_TITLE: &str = "Untitled Task";

/// How urgent a todo is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[Priority::Low, Priority::Normal, Priority::High]
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
        }
    }

    /// Parse a stored or user-entered priority. Case-insensitive; "Medium"
    /// is an older spelling of `Normal`.
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "normal" | "medium" | "med" => Some(Priority::Normal),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match Lenient::<Option<String>>::deserialize(deserializer)?.ok() {
            Some(raw) => raw,
            None => {
                log::warn!("event=priority_fallback module=model value=non_string");
                return Ok(Priority::default());
            }
        };
        Ok(match raw.as_deref().map(str::trim) {
            None | Some("") => Priority::default(),
            Some(value) => Priority::parse(value).unwrap_or_else(|| {
                log::warn!("event=priority_fallback module=model value={value}");
                Priority::default()
            }),
        })
    }
}

/// A single task inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(default = "Uuid::new_v4", deserialize_with = "stored_id")]
    id: Uuid,
    #[serde(default = "default_title", deserialize_with = "stored_title")]
    title: String,
    #[serde(default, deserialize_with = "stored_description")]
    description: String,
    #[serde(default = "Utc::now", with = "due_date_serde")]
    due_date: DateTime<Utc>,
    #[serde(default)]
    priority: Priority,
    #[serde(default, deserialize_with = "stored_completed")]
    pub completed: bool,
}

fn default_title() -> String {
    DEFAULT_TODO_TITLE.to_string()
}

fn stored_id<'de, D: Deserializer<'de>>(d: D) -> Result<Uuid, D::Error> {
    lenient::or_else(d, "id", Uuid::new_v4)
}

fn stored_title<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient::or_else(d, "title", default_title)
}

fn stored_description<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient::or_else(d, "description", String::new)
}

fn stored_completed<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    lenient::or_else(d, "completed", || false)
}

impl Todo {
    /// Create a todo. Empty text and `None` values fall back to their defaults:
    /// "Untitled Task", an empty description, the current time and `Normal`.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<DateTime<Utc>>,
        priority: Option<Priority>,
    ) -> Self {
        let title = title.into();
        Self {
            id: Uuid::new_v4(),
            title: if title.is_empty() { default_title() } else { title },
            description: description.into(),
            due_date: due_date.unwrap_or_else(Utc::now),
            priority: priority.unwrap_or_default(),
            completed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_due_date(&mut self, due_date: DateTime<Utc>) {
        self.due_date = due_date;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Open and past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date < now
    }
}

/// Parse a due date written as RFC 3339, `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM`
/// or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_due_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde helper for the `dueDate` field. Writes RFC 3339; reads a date string
/// or a millisecond epoch number. Anything unreadable becomes "now".
mod due_date_serde {
    use chrono::{DateTime, SecondsFormat, Utc};
    use log::warn;
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDueDate {
        Millis(i64),
        Text(String),
        Other(IgnoredAny),
    }

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Option::<RawDueDate>::deserialize(deserializer)? {
            None => return Ok(Utc::now()),
            Some(RawDueDate::Millis(ms)) => DateTime::from_timestamp_millis(ms),
            Some(RawDueDate::Text(text)) => super::parse_due_date(&text),
            Some(RawDueDate::Other(_)) => None,
        };
        Ok(parsed.unwrap_or_else(|| {
            warn!("event=field_fallback module=model field=dueDate");
            Utc::now()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_applies_defaults_for_empty_input() {
        let before = Utc::now();
        let todo = Todo::new("", "", None, None);
        let after = Utc::now();

        assert_eq!(todo.title(), DEFAULT_TODO_TITLE);
        assert_eq!(todo.description(), "");
        assert_eq!(todo.priority(), Priority::Normal);
        assert!(!todo.completed);
        assert!(todo.due_date() >= before && todo.due_date() <= after);
        assert!(!todo.id().is_nil());
    }

    #[test]
    fn new_keeps_given_values() {
        let due = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let todo = Todo::new("Buy milk", "2 liters", Some(due), Some(Priority::High));

        assert_eq!(todo.title(), "Buy milk");
        assert_eq!(todo.description(), "2 liters");
        assert_eq!(todo.due_date(), due);
        assert_eq!(todo.priority(), Priority::High);
    }

    #[test]
    fn setters_overwrite_without_defaulting() {
        let mut todo = Todo::new("a", "b", None, Some(Priority::Low));
        let id = todo.id();
        let due = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

        todo.set_title("");
        todo.set_description("notes");
        todo.set_due_date(due);
        todo.set_priority(Priority::High);

        assert_eq!(todo.title(), "");
        assert_eq!(todo.description(), "notes");
        assert_eq!(todo.due_date(), due);
        assert_eq!(todo.priority(), Priority::High);
        assert_eq!(todo.id(), id);
    }

    #[test]
    fn ids_are_unique() {
        let a = Todo::new("a", "", None, None);
        let b = Todo::new("a", "", None, None);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn toggle_flips_completed() {
        let mut todo = Todo::new("x", "", None, None);
        todo.toggle_completed();
        assert!(todo.completed);
        todo.completed = !todo.completed;
        assert!(!todo.completed);
    }

    #[test]
    fn overdue_only_when_open_and_past_due() {
        let due = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap();
        let mut todo = Todo::new("x", "", Some(due), None);

        assert!(todo.is_overdue(later));
        assert!(!todo.is_overdue(due));
        todo.completed = true;
        assert!(!todo.is_overdue(later));
    }

    #[test]
    fn priority_parse_accepts_legacy_spellings() {
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert_eq!(Priority::parse(" low "), Some(Priority::Low));
        assert_eq!(Priority::parse("Medium"), Some(Priority::Normal));
        assert_eq!(Priority::parse("NORMAL"), Some(Priority::Normal));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn serializes_camel_case_fields() {
        let due = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let todo = Todo::new("t", "d", Some(due), Some(Priority::Low));
        let json = serde_json::to_value(&todo).unwrap();

        assert_eq!(json["id"], todo.id().to_string());
        assert_eq!(json["dueDate"], "2025-01-02T03:04:05Z");
        assert_eq!(json["priority"], "Low");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn deserialize_accepts_epoch_millis_and_unknown_priority() {
        let value = serde_json::json!({
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "legacy",
            "description": "",
            "dueDate": 1_700_000_000_000_i64,
            "priority": "Urgent",
            "completed": true
        });
        let todo: Todo = serde_json::from_value(value).unwrap();

        assert_eq!(todo.due_date().timestamp_millis(), 1_700_000_000_000);
        assert_eq!(todo.priority(), Priority::Normal);
        assert!(todo.completed);
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let todo: Todo = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(!todo.id().is_nil());
        assert_eq!(todo.title(), DEFAULT_TODO_TITLE);
        assert_eq!(todo.priority(), Priority::Normal);
        assert!(!todo.completed);
    }

    #[test]
    fn malformed_fields_fall_back_instead_of_failing() {
        let before = Utc::now();
        let value = serde_json::json!({
            "id": 42,
            "title": null,
            "description": ["notes"],
            "dueDate": "",
            "priority": 3,
            "completed": "yes"
        });
        let todo: Todo = serde_json::from_value(value).unwrap();

        assert!(!todo.id().is_nil());
        assert_eq!(todo.title(), DEFAULT_TODO_TITLE);
        assert_eq!(todo.description(), "");
        assert!(todo.due_date() >= before);
        assert_eq!(todo.priority(), Priority::Normal);
        assert!(!todo.completed);
    }

    #[test]
    fn unreadable_due_dates_become_now() {
        let before = Utc::now();
        for due in [
            serde_json::json!("someday"),
            serde_json::json!({"when": "later"}),
            serde_json::json!(true),
            serde_json::json!(i64::MAX),
        ] {
            let todo: Todo = serde_json::from_value(serde_json::json!({ "dueDate": due })).unwrap();
            assert!(todo.due_date() >= before);
        }
    }

    #[test]
    fn parse_due_date_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 15, 14, 30, 0).unwrap();
        assert_eq!(parse_due_date("2025-06-15T14:30"), Some(expected));
        assert_eq!(parse_due_date("2025-06-15 14:30"), Some(expected));
        assert_eq!(parse_due_date("2025-06-15T14:30:00.000Z"), Some(expected));
        assert_eq!(
            parse_due_date("2025-06-15"),
            Some(Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_due_date("next week"), None);
    }
}
