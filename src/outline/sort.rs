//! Reordering siblings by their resolved dates.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;

use super::resolve::{resolve_index, EffectiveDates};
use super::tree::TreeIndex;
use crate::error::OutlineError;
use crate::models::Task;

/// Sort the direct children of `parent_id` (the roots when `None`) by
/// effective start, then effective end, then their current order. Undated
/// bounds sort after dated ones.
///
/// Returns `Ok(None)` when the sibling sequence would not change, so calling
/// this twice in a row only ever reorders once. Otherwise returns the full
/// task list with the siblings' `order` rewritten to `0..n-1`.
pub fn sort_children_by_date(
    tasks: &[Task],
    parent_id: Option<&str>,
) -> Result<Option<Vec<Task>>, OutlineError> {
    let index = TreeIndex::build(tasks);
    if let Some(id) = parent_id {
        if !index.contains(id) {
            return Err(OutlineError::UnknownTask(id.to_string()));
        }
    }

    let dates = resolve_index(&index);
    let current = index.siblings(parent_id);
    let mut sorted = current.to_vec();
    // Stable: siblings arrive in manual order, which settles remaining ties.
    sorted.sort_by(|a, b| compare_by_dates(&dates, a, b));

    let unchanged = sorted
        .iter()
        .zip(current)
        .all(|(a, b)| std::ptr::eq(*a, *b));
    if unchanged {
        return Ok(None);
    }

    tracing::debug!(
        parent = parent_id.unwrap_or("<root>"),
        count = sorted.len(),
        "Reordered siblings by date"
    );

    let new_orders: HashMap<&str, i64> = sorted
        .iter()
        .enumerate()
        .map(|(position, task)| (task.id.as_str(), position as i64))
        .collect();

    Ok(Some(
        tasks
            .iter()
            .map(|task| {
                let order = new_orders
                    .get(task.id.as_str())
                    .filter(|_| index.is_indexed(task));
                let mut task = task.clone();
                if let Some(&order) = order {
                    task.order = order;
                }
                task
            })
            .collect(),
    ))
}

fn compare_by_dates(dates: &EffectiveDates, a: &Task, b: &Task) -> Ordering {
    let key = |task: &Task| {
        let range = dates.get(&task.id).copied().unwrap_or_default();
        (
            absent_last(range.effective_start),
            absent_last(range.effective_end),
        )
    };
    key(a).cmp(&key(b))
}

fn absent_last(date: Option<NaiveDate>) -> (bool, Option<NaiveDate>) {
    (date.is_none(), date)
}
