use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Opaque, document-unique task identifier (`"t1"`, a UUID, ...).
pub type TaskId = String;

/// One row of the outline.
///
/// Tasks are stored as a flat list; the hierarchy exists only through the
/// `parent_id` back-reference. Sibling sequence is given by `order`, which is
/// dense `0..n-1` within each sibling group after any mutation.
///
/// `start` and `end` are the *explicit* dates the user entered. The dates shown
/// on the chart are derived from these and from the task's descendants, see
/// [`crate::outline::resolve`].
///
/// Fields this crate does not know about are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub done: bool,
    /// Hides the subtree on the chart. Has no effect on date roll-up.
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub start: DateField,
    #[serde(default)]
    pub end: DateField,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Create an undated, open task.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            done: false,
            collapsed: false,
            parent_id: None,
            order: 0,
            start: DateField::default(),
            end: DateField::default(),
            extra: Map::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<TaskId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start.into();
        self.end = end.into();
        self
    }

    pub fn has_explicit_dates(&self) -> bool {
        self.start.is_set() || self.end.is_set()
    }
}

/// An explicit date bound exactly as the client sent it.
///
/// Dates arrive from older documents and hand-edited files in all sorts of
/// shapes. The raw JSON value is kept for serialization, so nothing the client
/// stored is rewritten. Only a fixed-width `YYYY-MM-DD` string counts as a
/// date; anything else reads as an absent bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateField {
    raw: Value,
    date: Option<NaiveDate>,
}

impl DateField {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn is_set(&self) -> bool {
        self.date.is_some()
    }

    /// The value as stored, `null` when unset.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl Default for DateField {
    fn default() -> Self {
        Self {
            raw: Value::Null,
            date: None,
        }
    }
}

impl From<Option<NaiveDate>> for DateField {
    fn from(date: Option<NaiveDate>) -> Self {
        let raw = match date {
            Some(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            None => Value::Null,
        };
        Self { raw, date }
    }
}

impl From<Value> for DateField {
    fn from(raw: Value) -> Self {
        let date = raw.as_str().and_then(parse_date);
        Self { raw, date }
    }
}

impl Serialize for DateField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DateField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Strict `YYYY-MM-DD`. chrono alone would also take `2024-1-5`.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let fixed_width = s.len() == 10
        && s.bytes()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });
    if !fixed_width {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_fields() {
        let task: Task = serde_json::from_value(json!({
            "id": "t2",
            "title": "Subtask",
            "done": true,
            "collapsed": false,
            "parentId": "t1",
            "order": 3,
            "start": "2025-12-18",
            "end": null,
        }))
        .unwrap();

        assert_eq!(task.parent_id.as_deref(), Some("t1"));
        assert_eq!(task.order, 3);
        assert!(task.done);
        assert_eq!(task.start.date(), NaiveDate::from_ymd_opt(2025, 12, 18));
        assert_eq!(task.end.date(), None);
        assert!(task.extra.is_empty());
    }

    #[test]
    fn malformed_dates_become_absent() {
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "start": "next tuesday",
            "end": 20240105,
        }))
        .unwrap();

        assert_eq!(task.start.date(), None);
        assert_eq!(task.end.date(), None);
        assert!(!task.has_explicit_dates());
        assert_eq!(task.title, "");
    }

    #[test]
    fn unpadded_and_padded_dates_are_rejected() {
        for text in ["2024-1-5", " 2024-01-05", "2024-01-05T00:00", "2024/01/05", "2024-02-30"] {
            let field = DateField::from(json!(text));
            assert_eq!(field.date(), None, "{text}");
        }
    }

    #[test]
    fn keeps_unknown_fields_and_raw_dates() {
        let input = json!({
            "id": "t1",
            "title": "Ship",
            "done": false,
            "collapsed": false,
            "parentId": null,
            "order": 0,
            "start": "2024-1-5",
            "end": "soon",
            "notes": "keep me",
            "color": { "bg": "#fff" },
        });
        let task: Task = serde_json::from_value(input.clone()).unwrap();

        assert_eq!(task.extra["notes"], "keep me");
        assert_eq!(serde_json::to_value(&task).unwrap(), input);
    }

    #[test]
    fn serializes_dates_as_iso_strings() {
        let task = Task::new("t1", "Ship").with_dates(NaiveDate::from_ymd_opt(2024, 1, 10), None);
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["start"], "2024-01-10");
        assert_eq!(value["end"], Value::Null);
        assert_eq!(value["parentId"], Value::Null);
    }
}
