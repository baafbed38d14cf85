//! Domain models for LineCook.
//!
//! # Core Concepts
//!
//! - [`Task`]: One row of the outline. Tasks form a tree through `parent_id`
//!   back-references and carry optional explicit `start`/`end` dates.
//! - [`Document`]: The flat task list that makes up an outline.
//! - [`StoredDocument`]: A document plus the revision counter used for
//!   optimistic concurrency on writes.
//!
//! Derived data (effective ranges, the timeline grid) lives in
//! [`crate::outline`] and is never stored.

mod document;
mod task;

pub use document::*;
pub use task::*;
