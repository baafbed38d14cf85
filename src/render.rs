//! Plain-text rendering of the outline and its timeline.

use crate::models::Task;
use crate::outline::{
    iso_week_number, resolve_index, week_end, EffectiveDates, EffectiveRange, Timeline, TreeIndex,
};

const OPEN: char = '○';
const DONE: char = '●';

fn status_symbol(task: &Task) -> char {
    if task.done {
        DONE
    } else {
        OPEN
    }
}

/// Render the outline as an ASCII tree with effective dates and warnings.
///
/// Only tasks reachable from a root are drawn; members of a `parent_id` cycle
/// are not.
///
/// Example output:
/// ```text
/// ○ Launch [2024-01-01 → 2024-01-10]
/// ├── ● Design [2024-01-01 → 2024-01-05]
/// ├── ○ Build [2024-01-03 → 2024-01-10]
/// │   └── ○ Review [2024-01-08]
/// └── ○ Party
/// ```
pub fn render_outline(tasks: &[Task]) -> String {
    let index = TreeIndex::build(tasks);
    let dates = resolve_index(&index);

    let mut output = String::new();
    for &root in index.roots() {
        render_tree(&mut output, &index, &dates, root);
    }
    output
}

/// One line per node still to draw, with the prefix its branch hangs from.
struct Frame<'a> {
    task: &'a Task,
    prefix: String,
    is_last: bool,
    is_root: bool,
}

/// Pre-order walk on an explicit stack; deep outlines must not exhaust the
/// thread's stack.
fn render_tree<'a>(
    output: &mut String,
    index: &TreeIndex<'a>,
    dates: &EffectiveDates,
    root: &'a Task,
) {
    let mut stack = vec![Frame {
        task: root,
        prefix: String::new(),
        is_last: true,
        is_root: true,
    }];

    while let Some(Frame {
        task,
        prefix,
        is_last,
        is_root,
    }) = stack.pop()
    {
        if !is_root {
            let branch = if is_last { "└── " } else { "├── " };
            output.push_str(&prefix);
            output.push_str(branch);
        }
        output.push(status_symbol(task));
        output.push(' ');
        output.push_str(&task.title);
        if let Some(range) = dates.get(&task.id) {
            output.push_str(&describe_range(range));
        }
        output.push('\n');

        let child_prefix = if is_root {
            String::new()
        } else {
            let continuation = if is_last { "    " } else { "│   " };
            format!("{}{}", prefix, continuation)
        };

        let children = index.children(&task.id);
        for (i, &child) in children.iter().enumerate().rev() {
            stack.push(Frame {
                task: child,
                prefix: child_prefix.clone(),
                is_last: i == children.len() - 1,
                is_root: false,
            });
        }
    }
}

fn describe_range(range: &EffectiveRange) -> String {
    let mut out = match (range.effective_start, range.effective_end) {
        (Some(s), Some(e)) if s == e => format!(" [{}]", s),
        (Some(s), Some(e)) => format!(" [{} → {}]", s, e),
        (Some(s), None) => format!(" [{} → ?]", s),
        (None, Some(e)) => format!(" [? → {}]", e),
        (None, None) => String::new(),
    };
    if range.warn_invalid {
        out.push_str(" !invalid");
    }
    if range.warn_inconsistent {
        out.push_str(" !inconsistent");
    }
    out
}

/// One line per week: ISO week number and the Sunday..Saturday span.
pub fn render_timeline(timeline: &Timeline) -> String {
    let mut output = String::new();
    for &week in &timeline.weeks {
        let last = week_end(week);
        output.push_str(&format!("W{:02} {} .. {}\n", iso_week_number(week), week, last));
    }
    output
}
