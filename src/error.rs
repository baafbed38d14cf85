use thiserror::Error;

use crate::models::{StoredDocument, TaskId};

/// Rejected outline edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutlineError {
    #[error("task not found: {0}")]
    UnknownTask(TaskId),

    #[error("parent task not found: {0}")]
    UnknownParent(TaskId),
}

/// Failures of the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The client's `baseRevision` is stale. Carries the document it lost to.
    #[error("revision conflict: base revision {base} is stale")]
    Conflict {
        base: i64,
        current: Box<StoredDocument>,
    },

    #[error("document revision counter is exhausted")]
    RevisionOverflow,

    #[error("could not determine a data directory for the document")]
    NoDataDir,

    #[error("document file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("document file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Outline(#[from] OutlineError),
}
