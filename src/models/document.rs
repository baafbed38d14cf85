use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Task, TaskId};

/// The outline document: a flat list of tasks.
///
/// Top-level fields other than `tasks` are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            extra: Map::new(),
        }
    }
}

/// A document as persisted, with its revision counter.
///
/// `revision` increases by one on every accepted write and is the token
/// clients echo back as `baseRevision` for optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub revision: i64,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub doc: Document,
}

impl StoredDocument {
    /// Stamp `doc` with `revision` and the current time, to whole seconds.
    pub fn new(revision: i64, doc: Document) -> Self {
        Self {
            revision,
            updated_at: Utc::now().trunc_subsecs(0),
            doc,
        }
    }
}

/// `updatedAt` as RFC 3339 with whole seconds and a `+00:00` offset.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Body of `PUT /api/doc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutDocumentInput {
    pub base_revision: i64,
    pub doc: Document,
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    /// Parent for the new task. `None` inserts at the root.
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    #[serde(default)]
    pub title: String,
}

/// Body of `POST /api/tasks/sort`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortChildrenInput {
    /// Whose children to sort. `None` sorts the root tasks.
    #[serde(default)]
    pub parent_id: Option<TaskId>,
}

/// Response of `POST /api/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreated {
    pub task_id: TaskId,
    pub document: StoredDocument,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn updated_at_uses_whole_seconds_and_numeric_offset() {
        let stored = StoredDocument {
            revision: 3,
            updated_at: Utc.with_ymd_and_hms(2025, 12, 16, 9, 30, 5).unwrap(),
            doc: Document::default(),
        };
        let value = serde_json::to_value(&stored).unwrap();

        assert_eq!(value["updatedAt"], "2025-12-16T09:30:05+00:00");
        let back: StoredDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn reads_timestamps_with_any_offset() {
        let stored: StoredDocument = serde_json::from_value(json!({
            "revision": 1,
            "updatedAt": "2025-12-16T10:30:05.250+01:00",
            "doc": { "tasks": [] },
        }))
        .unwrap();

        assert_eq!(stored.updated_at.to_rfc3339(), "2025-12-16T09:30:05.250+00:00");
    }

    #[test]
    fn keeps_unknown_document_fields() {
        let input = json!({ "tasks": [], "title": "Roadmap", "version": 2 });
        let doc: Document = serde_json::from_value(input.clone()).unwrap();

        assert_eq!(doc.extra["title"], "Roadmap");
        assert_eq!(serde_json::to_value(&doc).unwrap(), input);
    }
}
