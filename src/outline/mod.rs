//! The outline engine: tree indexing, effective-date roll-up, timeline
//! derivation and date-based sibling sorting.
//!
//! Everything here is a synchronous pure function over a task slice. Callers
//! that share a document across threads must hand in a snapshot, never a
//! list that can change mid-call.

mod edit;
mod resolve;
mod sort;
mod timeline;
mod tree;

pub use edit::{delete_subtree, insert_task, normalize_orders, placeholder};
pub use resolve::{resolve, resolve_index, EffectiveDates, EffectiveRange};
pub use sort::sort_children_by_date;
pub use timeline::{iso_week_number, week_end, week_start, Timeline};
pub use tree::TreeIndex;

use crate::models::Task;

/// Tasks that appear on the chart, in outline order.
pub fn visible_tasks(tasks: &[Task]) -> Vec<&Task> {
    TreeIndex::build(tasks).visible()
}

/// Resolve every task and build the timeline of the visible ones.
pub fn build_timeline(tasks: &[Task]) -> Option<Timeline> {
    let index = TreeIndex::build(tasks);
    let dates = resolve_index(&index);
    Timeline::build(index.visible(), &dates)
}
