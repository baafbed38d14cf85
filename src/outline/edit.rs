//! Structural edits on the flat task list.
//!
//! Every operation takes the current list by reference and returns a new one;
//! nothing is mutated in place.

use std::collections::HashMap;

use uuid::Uuid;

use super::tree::TreeIndex;
use crate::error::OutlineError;
use crate::models::{Task, TaskId};

/// Append a new undated task as the last child of `parent_id` (or the last
/// root). Returns the new list and the id of the inserted task.
pub fn insert_task(
    tasks: &[Task],
    parent_id: Option<&str>,
    title: &str,
) -> Result<(Vec<Task>, TaskId), OutlineError> {
    let index = TreeIndex::build(tasks);
    if let Some(parent) = parent_id {
        if !index.contains(parent) {
            return Err(OutlineError::UnknownParent(parent.to_string()));
        }
    }

    let id = Uuid::new_v4().to_string();
    let order = index.siblings(parent_id).len() as i64;
    let mut task = Task::new(id.clone(), title).with_order(order);
    task.parent_id = parent_id.map(str::to_string);

    let mut next = tasks.to_vec();
    next.push(task);
    Ok((next, id))
}

/// Remove `id` and all of its descendants.
///
/// Ignored duplicate ids are left in place. Sibling orders are re-densified afterwards. A document never becomes empty:
/// deleting the last task leaves a single untitled placeholder.
pub fn delete_subtree(tasks: &[Task], id: &str) -> Result<Vec<Task>, OutlineError> {
    let index = TreeIndex::build(tasks);
    if !index.contains(id) {
        return Err(OutlineError::UnknownTask(id.to_string()));
    }

    let doomed = index.subtree_ids(id);
    let remaining: Vec<Task> = tasks
        .iter()
        .filter(|t| !(index.is_indexed(t) && doomed.contains(t.id.as_str())))
        .cloned()
        .collect();

    if remaining.is_empty() {
        return Ok(vec![placeholder()]);
    }
    Ok(normalize_orders(&remaining))
}

/// Rewrite every sibling group's `order` to `0..n-1`, keeping the current
/// sequence. Ignored duplicate ids keep their order.
pub fn normalize_orders(tasks: &[Task]) -> Vec<Task> {
    let index = TreeIndex::build(tasks);

    let mut orders: HashMap<&str, i64> = HashMap::with_capacity(index.len());
    let groups = std::iter::once(index.roots())
        .chain(index.tasks().iter().map(|t| index.children(&t.id)));
    for group in groups {
        for (position, task) in group.iter().enumerate() {
            orders.insert(task.id.as_str(), position as i64);
        }
    }

    tasks
        .iter()
        .map(|task| {
            let order = orders
                .get(task.id.as_str())
                .filter(|_| index.is_indexed(task));
            let mut task = task.clone();
            if let Some(&order) = order {
                task.order = order;
            }
            task
        })
        .collect()
}

/// The untitled root task that stands in for an otherwise empty document.
pub fn placeholder() -> Task {
    Task::new(Uuid::new_v4().to_string(), "")
}
