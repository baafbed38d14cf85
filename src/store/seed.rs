use chrono::NaiveDate;

use crate::models::{Document, StoredDocument, Task};

/// Example outline written into a brand-new document file.
pub fn seed_document() -> StoredDocument {
    let parent = Task::new("t1", "Example task").with_dates(
        NaiveDate::from_ymd_opt(2025, 12, 16),
        NaiveDate::from_ymd_opt(2025, 12, 19),
    );
    let child = Task::new("t2", "Subtask")
        .with_parent("t1")
        .with_dates(NaiveDate::from_ymd_opt(2025, 12, 18), None);

    StoredDocument::new(0, Document::new(vec![parent, child]))
}
