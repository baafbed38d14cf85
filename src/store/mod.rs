//! Revisioned storage for the outline document.
//!
//! The whole document is a single JSON file rewritten atomically on every
//! accepted change. Writers must name the revision they started from; a
//! mismatch is rejected as a conflict instead of silently overwriting.

mod seed;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{OutlineError, StoreError};
use crate::models::{Document, StoredDocument, Task};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Clone)]
pub struct DocumentStore {
    state: Arc<Mutex<State>>,
}

struct State {
    /// `None` for in-memory stores.
    path: Option<PathBuf>,
    current: StoredDocument,
}

impl DocumentStore {
    /// Open the document at `path`, seeding it with an example outline when
    /// the file does not exist yet.
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let current = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            let seeded = seed::seed_document();
            write_atomic(&path, &seeded)?;
            tracing::info!("Seeded new document at {}", path.display());
            seeded
        };

        Ok(Self::from_state(Some(path), current))
    }

    /// Open `doc.json` in `dir`.
    pub fn open_in_dir(dir: &Path) -> Result<Self> {
        Self::open(dir.join("doc.json"))
    }

    /// Open the document in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs =
            directories::ProjectDirs::from("", "", "linecook").ok_or(StoreError::NoDataDir)?;
        Ok(dirs.data_dir().join("doc.json"))
    }

    /// A store that never touches disk, seeded like a fresh file.
    pub fn open_memory() -> Self {
        Self::from_state(None, seed::seed_document())
    }

    /// An in-memory store holding `tasks` at revision 0.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self::from_state(None, StoredDocument::new(0, Document::new(tasks)))
    }

    fn from_state(path: Option<PathBuf>, current: StoredDocument) -> Self {
        Self {
            state: Arc::new(Mutex::new(State { path, current })),
        }
    }

    /// Snapshot of the stored document.
    pub fn current(&self) -> StoredDocument {
        let state = self.state.lock().expect("document lock poisoned");
        state.current.clone()
    }

    /// Replace the document if `base_revision` is still current.
    pub fn replace(&self, base_revision: i64, doc: Document) -> Result<StoredDocument> {
        let mut state = self.state.lock().expect("document lock poisoned");

        if base_revision != state.current.revision {
            tracing::warn!(
                "Rejected write from revision {} (current is {})",
                base_revision,
                state.current.revision
            );
            return Err(StoreError::Conflict {
                base: base_revision,
                current: Box::new(state.current.clone()),
            });
        }

        commit(&mut state, doc)
    }

    /// Apply a server-side edit to the current task list.
    ///
    /// `edit` returns `Ok(None)` when there is nothing to change; the revision
    /// is then left alone.
    pub fn update<F>(&self, edit: F) -> Result<StoredDocument>
    where
        F: FnOnce(&[Task]) -> std::result::Result<Option<Vec<Task>>, OutlineError>,
    {
        let mut state = self.state.lock().expect("document lock poisoned");

        match edit(&state.current.doc.tasks)? {
            Some(tasks) => {
                let doc = Document {
                    tasks,
                    extra: state.current.doc.extra.clone(),
                };
                commit(&mut state, doc)
            }
            None => Ok(state.current.clone()),
        }
    }
}

fn commit(state: &mut State, doc: Document) -> Result<StoredDocument> {
    let revision = state
        .current
        .revision
        .checked_add(1)
        .ok_or(StoreError::RevisionOverflow)?;
    let next = StoredDocument::new(revision, doc);

    if let Some(path) = &state.path {
        write_atomic(path, &next)?;
    }
    tracing::debug!(
        "Stored revision {} ({} tasks)",
        next.revision,
        next.doc.tasks.len()
    );

    state.current = next.clone();
    Ok(next)
}

/// Write to `<path>.tmp` and rename over `path`.
fn write_atomic(path: &Path, document: &StoredDocument) -> Result<()> {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut body = serde_json::to_string_pretty(document)?;
    body.push('\n');
    std::fs::write(&tmp, body)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
