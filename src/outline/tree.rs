//! Parent/child adjacency derived from a flat task list.

use std::collections::{HashMap, HashSet};

use crate::models::Task;

/// Read-only adjacency view over a task slice.
///
/// The index never owns tasks and never stores child pointers on them; it is
/// rebuilt from scratch for every computation. Tasks whose `parent_id` points
/// at an id that is not in the list are treated as roots. When an id appears
/// more than once, the first occurrence wins and later duplicates are ignored.
#[derive(Debug)]
pub struct TreeIndex<'a> {
    tasks: Vec<&'a Task>,
    by_id: HashMap<&'a str, &'a Task>,
    children: HashMap<&'a str, Vec<&'a Task>>,
    roots: Vec<&'a Task>,
}

impl<'a> TreeIndex<'a> {
    pub fn build(tasks: &'a [Task]) -> Self {
        let mut by_id: HashMap<&'a str, &'a Task> = HashMap::with_capacity(tasks.len());
        for task in tasks {
            by_id.entry(task.id.as_str()).or_insert(task);
        }

        // (order, list position) keeps sibling sequence stable when orders collide
        let mut unique = Vec::with_capacity(by_id.len());
        let mut groups: HashMap<Option<&'a str>, Vec<(i64, usize, &'a Task)>> = HashMap::new();
        for (position, task) in tasks.iter().enumerate() {
            if !std::ptr::eq(by_id[task.id.as_str()], task) {
                continue;
            }
            unique.push(task);
            let parent = task
                .parent_id
                .as_deref()
                .and_then(|p| by_id.get_key_value(p).map(|(k, _)| *k));
            groups
                .entry(parent)
                .or_default()
                .push((task.order, position, task));
        }

        let mut roots = Vec::new();
        let mut children = HashMap::new();
        for (parent, mut group) in groups {
            group.sort_by_key(|(order, position, _)| (*order, *position));
            let ordered: Vec<&'a Task> = group.into_iter().map(|(_, _, t)| t).collect();
            match parent {
                Some(id) => {
                    children.insert(id, ordered);
                }
                None => roots = ordered,
            }
        }

        Self {
            tasks: unique,
            by_id,
            children,
            roots,
        }
    }

    /// Indexed tasks in their original list order.
    pub fn tasks(&self) -> &[&'a Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&'a Task> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Whether `task` is the occurrence the index holds for its id. False for
    /// ignored duplicates and for tasks from another list.
    pub fn is_indexed(&self, task: &Task) -> bool {
        self.get(&task.id).is_some_and(|held| std::ptr::eq(held, task))
    }

    /// Direct children of `id`, ordered by `order`.
    pub fn children(&self, id: &str) -> &[&'a Task] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tasks without a (resolvable) parent, ordered by `order`.
    pub fn roots(&self) -> &[&'a Task] {
        &self.roots
    }

    /// Children of `parent`, or the roots when `parent` is `None`.
    pub fn siblings(&self, parent: Option<&str>) -> &[&'a Task] {
        match parent {
            Some(id) => self.children(id),
            None => self.roots(),
        }
    }

    /// `id` and every task below it. Safe on cyclic input.
    pub fn subtree_ids(&self, id: &str) -> HashSet<&'a str> {
        let mut seen = HashSet::new();
        let Some((&root, _)) = self.by_id.get_key_value(id) else {
            return seen;
        };
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            stack.extend(self.children(current).iter().map(|t| t.id.as_str()));
        }
        seen
    }

    /// Outline order (roots first, each task followed by its children),
    /// skipping everything below a collapsed task.
    pub fn visible(&self) -> Vec<&'a Task> {
        let mut out = Vec::with_capacity(self.tasks.len());
        let mut seen = HashSet::new();
        let mut stack: Vec<&'a Task> = self.roots.iter().rev().copied().collect();
        while let Some(task) = stack.pop() {
            if !seen.insert(task.id.as_str()) {
                continue;
            }
            out.push(task);
            if !task.collapsed {
                stack.extend(self.children(&task.id).iter().rev().copied());
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
