//! Filtered, searched and sorted view over the task collection.

use crate::task::{sort_for_display, PriorityFilter, Task};

/// Whether `task` passes the priority filter and the search query.
///
/// The query matches case-insensitively anywhere in the title or the
/// description. An empty query matches everything.
pub fn matches(task: &Task, filter: PriorityFilter, query: &str) -> bool {
    if !filter.allows(task.priority) {
        return false;
    }
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    task.title.to_lowercase().contains(&needle) || task.description.to_lowercase().contains(&needle)
}

/// Tasks currently displayed, in display order.
///
/// Returns owned copies; the collection passed in is never touched.
pub fn visible_tasks(tasks: &[Task], filter: PriorityFilter, query: &str) -> Vec<Task> {
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| matches(task, filter, query))
        .cloned()
        .collect();
    sort_for_display(&mut visible);
    visible
}
