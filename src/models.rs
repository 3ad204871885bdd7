//! Core data models used throughout the sync.
//!
//! These types represent the tasks, labels, and destination records that
//! flow through the index → fetch → reconcile → write pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Identifier assigned by the destination store to one of its records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

/// Due date attached to a task. Only `date` is read by the translator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Due {
    pub date: String,
    #[serde(default)]
    pub string: Option<String>,
}

impl Due {
    pub fn on(date: &str) -> Self {
        Self {
            date: date.to_string(),
            string: None,
        }
    }
}

/// A task as returned by the source service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceTask {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "is_completed")]
    pub completed: bool,
    #[serde(default, deserialize_with = "ids_from_numbers_or_strings")]
    pub label_ids: Vec<i64>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub due: Option<Due>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "optional_id_from_number_or_string")]
    pub parent_id: Option<i64>,
}

fn default_priority() -> u8 {
    1
}

impl SourceTask {
    /// Minimal top-level task with the given id and title.
    pub fn new(id: i64, content: &str) -> Self {
        Self {
            id,
            content: content.to_string(),
            description: None,
            completed: false,
            label_ids: Vec::new(),
            priority: 1,
            due: None,
            url: None,
            parent_id: None,
        }
    }
}

/// A label as returned by the source service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: i64,
    pub name: String,
}

/// A destination record with the source task id it was created from.
///
/// `task_id` is `None` when the record's id column is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRecord {
    pub id: RecordId,
    pub task_id: Option<i64>,
}

/// One page of a paginated destination query.
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub records: Vec<DestinationRecord>,
    /// Whether the store reports further pages.
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Destination-schema-shaped values derived from one [`SourceTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySet {
    pub task_id: i64,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub priority: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub url: Option<String>,
}

// Todoist has returned ids both as JSON numbers (REST v1) and as numeric
// strings (later API versions).
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    String(String),
}

impl NumberOrString {
    fn into_id<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .parse::<i64>()
                .map_err(|_| E::custom(format!("invalid numeric id: '{}'", s))),
        }
    }
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_id()
}

fn optional_id_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::String(s)) if s.is_empty() => Ok(None),
        Some(v) => v.into_id().map(Some),
        None => Ok(None),
    }
}

fn ids_from_numbers_or_strings<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<NumberOrString>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(NumberOrString::into_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_from_rest_v1_json() {
        let json = r#"{
            "id": 42,
            "content": "Write report",
            "description": "",
            "completed": false,
            "label_ids": [1, 2],
            "priority": 3,
            "due": {"date": "2024-05-01", "string": "May 1"},
            "url": "https://todoist.com/showTask?id=42"
        }"#;
        let task: SourceTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 42);
        assert_eq!(task.label_ids, vec![1, 2]);
        assert_eq!(task.priority, 3);
        assert_eq!(
            task.due,
            Some(Due {
                date: "2024-05-01".into(),
                string: Some("May 1".into()),
            })
        );
        assert_eq!(task.parent_id, None);
    }

    #[test]
    fn test_task_with_string_ids() {
        let json = r#"{
            "id": "7",
            "content": "Sub",
            "is_completed": true,
            "label_ids": ["3"],
            "parent_id": "6"
        }"#;
        let task: SourceTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 7);
        assert!(task.completed);
        assert_eq!(task.label_ids, vec![3]);
        assert_eq!(task.parent_id, Some(6));
        assert_eq!(task.priority, 1);
    }

    #[test]
    fn test_null_parent_and_labels() {
        let json = r#"{"id": 1, "content": "x", "parent_id": null, "label_ids": null}"#;
        let task: SourceTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.parent_id, None);
        assert!(task.label_ids.is_empty());
    }

    #[test]
    fn test_non_numeric_id_rejected() {
        let json = r#"{"id": "abc", "content": "x"}"#;
        assert!(serde_json::from_str::<SourceTask>(json).is_err());
    }
}
