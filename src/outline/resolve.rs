//! Effective-date roll-up.
//!
//! Every task gets a displayable range derived from its own explicit dates and
//! the ranges of its descendants:
//!
//! - a leaf with a single date is a milestone (`start == end`);
//! - a parent without explicit dates spans its children's window;
//! - a parent with one explicit bound keeps it and takes the other from the
//!   children, falling back to the explicit bound;
//! - a parent with both explicit bounds uses them verbatim.
//!
//! Two advisory flags come out of the same pass: `warn_invalid` when the
//! range is inverted and `warn_inconsistent` when explicit dates on a parent
//! fail to cover its children. Neither stops the roll-up.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::tree::TreeIndex;
use crate::models::{Task, TaskId};

/// Derived date range of one task. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveRange {
    pub effective_start: Option<NaiveDate>,
    pub effective_end: Option<NaiveDate>,
    /// Both bounds present and `effective_start > effective_end`.
    pub warn_invalid: bool,
    /// Explicit dates on a parent do not cover its children's window.
    pub warn_inconsistent: bool,
}

impl EffectiveRange {
    pub fn is_dated(&self) -> bool {
        self.effective_start.is_some() || self.effective_end.is_some()
    }

    pub fn is_milestone(&self) -> bool {
        self.effective_start.is_some() && self.effective_start == self.effective_end
    }
}

/// Effective ranges keyed by task id, in id order.
pub type EffectiveDates = BTreeMap<TaskId, EffectiveRange>;

/// Resolve the effective range of every task in the list.
///
/// Pure and deterministic: the same list always yields the same map.
pub fn resolve(tasks: &[Task]) -> EffectiveDates {
    resolve_index(&TreeIndex::build(tasks))
}

/// Like [`resolve`], reusing an index the caller already built.
pub fn resolve_index(index: &TreeIndex<'_>) -> EffectiveDates {
    let mut resolver = Resolver::new(index);
    for &task in index.tasks() {
        resolver.resolve_from(task);
    }
    resolver
        .memo
        .into_iter()
        .map(|(id, range)| (id.to_string(), range))
        .collect()
}

struct Resolver<'i, 'a> {
    index: &'i TreeIndex<'a>,
    memo: HashMap<&'a str, EffectiveRange>,
    in_progress: HashSet<&'a str>,
}

impl<'i, 'a> Resolver<'i, 'a> {
    fn new(index: &'i TreeIndex<'a>) -> Self {
        Self {
            index,
            memo: HashMap::with_capacity(index.len()),
            in_progress: HashSet::new(),
        }
    }

    /// Post-order walk from `root` on an explicit stack, so depth is bounded
    /// by memory rather than by the thread's stack.
    fn resolve_from(&mut self, root: &'a Task) {
        let index = self.index;
        let mut stack = vec![(root, false)];
        while let Some((task, children_done)) = stack.pop() {
            let id = task.id.as_str();
            if children_done {
                let children = index.children(id);
                let mut child_min_start: Option<NaiveDate> = None;
                let mut child_max_end: Option<NaiveDate> = None;
                for &child in children {
                    // A child still in progress is the back edge of a
                    // parent_id cycle and contributes nothing.
                    let range = self.memo.get(child.id.as_str()).copied().unwrap_or_default();
                    child_min_start = min_present(child_min_start, range.effective_start);
                    child_max_end = max_present(child_max_end, range.effective_end);
                }
                let range = combine(task, !children.is_empty(), child_min_start, child_max_end);
                self.in_progress.remove(id);
                self.memo.insert(id, range);
                continue;
            }

            if self.memo.contains_key(id) || !self.in_progress.insert(id) {
                continue;
            }
            stack.push((task, true));
            for &child in index.children(id).iter().rev() {
                let child_id = child.id.as_str();
                if !self.memo.contains_key(child_id) && !self.in_progress.contains(child_id) {
                    stack.push((child, false));
                }
            }
        }
    }
}

fn combine(
    task: &Task,
    has_children: bool,
    child_min_start: Option<NaiveDate>,
    child_max_end: Option<NaiveDate>,
) -> EffectiveRange {
    let (start, end) = if has_children {
        match (task.start.date(), task.end.date()) {
            (None, None) => (child_min_start, child_max_end),
            (Some(s), None) => (Some(s), Some(child_max_end.unwrap_or(s))),
            (None, Some(e)) => (Some(child_min_start.unwrap_or(e)), Some(e)),
            (Some(s), Some(e)) => (Some(s), Some(e)),
        }
    } else {
        match (task.start.date(), task.end.date()) {
            (Some(s), None) => (Some(s), Some(s)),
            (None, Some(e)) => (Some(e), Some(e)),
            explicit => explicit,
        }
    };

    let warn_invalid = matches!((start, end), (Some(s), Some(e)) if s > e);

    let warn_inconsistent = match (child_min_start, child_max_end) {
        (Some(child_min), Some(child_max)) if has_children && task.has_explicit_dates() => {
            start.is_some_and(|s| s > child_min) || end.is_some_and(|e| e < child_max)
        }
        _ => false,
    };

    EffectiveRange {
        effective_start: start,
        effective_end: end,
        warn_invalid,
        warn_inconsistent,
    }
}

fn min_present(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    }
}

fn max_present(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    }
}
