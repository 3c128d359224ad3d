//! The task store: the only place the task collection is mutated.
//!
//! The store hydrates once from a [`KeyValueStore`] and writes the whole
//! collection back after every mutation. Persistence is best-effort: a failed
//! load or write is logged, kept in [`TaskStore::storage_warnings`] for the
//! caller to surface, and the in-memory change stands. The priority filter
//! and search query live here too but are never persisted.

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::reorder;
use crate::storage::KeyValueStore;
use crate::task::{decode_tasks, encode_tasks, Priority, PriorityFilter, Task};
use crate::view;

/// Default storage key for the task collection
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    backend: S,
    key: String,
    tasks: Vec<Task>,
    priority_filter: PriorityFilter,
    search_query: String,
    storage_warnings: Vec<String>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the collection stored under `key`.
    ///
    /// Never fails: an absent value starts empty, and a value that cannot be
    /// parsed is cleared from the backend before starting empty.
    pub fn open(mut backend: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut storage_warnings = Vec::new();
        let tasks = hydrate(&mut backend, &key, &mut storage_warnings);
        debug!(key = %key, count = tasks.len(), "task store hydrated");
        Self {
            backend,
            key,
            tasks,
            priority_filter: PriorityFilter::default(),
            search_query: String::new(),
            storage_warnings,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Load and save failures recovered since the store was opened
    pub fn storage_warnings(&self) -> &[String] {
        &self.storage_warnings
    }

    /// Tasks in collection order (not display order)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn priority_filter(&self) -> PriorityFilter {
        self.priority_filter
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_priority_filter(&mut self, filter: PriorityFilter) {
        self.priority_filter = filter;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Tasks matching the current filter and query, in display order
    pub fn visible(&self) -> Vec<Task> {
        view::visible_tasks(&self.tasks, self.priority_filter, &self.search_query)
    }

    /// Create a task and return a copy of it.
    ///
    /// The new task gets the highest order, so it goes to the head of the
    /// collection where it also sits in display order. Title validation is
    /// the caller's job.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Task {
        let order = self
            .tasks
            .iter()
            .map(|task| task.order)
            .max()
            .map_or(0, |max| max + 1);
        let task = Task {
            id: self.fresh_id(),
            title: title.into(),
            description: description.into(),
            priority,
            created_at: Utc::now(),
            order,
        };
        // Head of the array, matching its place in display order.
        self.tasks.insert(0, task.clone());
        debug!(id = %task.id, order, "task created");
        self.persist();
        task
    }

    /// Replace the task with the same id. Returns whether one matched; an
    /// unknown id leaves the collection unchanged.
    pub fn edit(&mut self, task: Task) -> bool {
        let matched = match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => {
                *existing = task;
                true
            }
            None => {
                debug!(id = %task.id, "edit of unknown task ignored");
                false
            }
        };
        self.persist();
        matched
    }

    /// Remove the task with `id`. Returns whether one was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        if !removed {
            debug!(id, "delete of unknown task ignored");
        }
        self.persist();
        removed
    }

    /// Move the task at collection index `from` to `to`, then renumber every
    /// task so the first has the highest order and the last has order 1.
    ///
    /// Afterwards collection order and display order coincide, even when
    /// `from == to` on a collection whose stored orders were tied or missing.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.tasks.len();
        for index in [from, to] {
            if index >= len {
                return Err(Error::InvalidIndex { index, len });
            }
        }

        let moved = self.tasks.remove(from);
        self.tasks.insert(to, moved);
        for (position, task) in self.tasks.iter_mut().enumerate() {
            task.order = (len - position) as i64;
        }
        debug!(from, to, "tasks reordered");
        self.persist();
        Ok(())
    }

    /// Reorder using indices into [`visible`](Self::visible).
    ///
    /// Returns `Ok(false)` when either displayed index no longer resolves to
    /// a task, in which case nothing changes.
    pub fn reorder_displayed(&mut self, from: usize, to: usize) -> Result<bool> {
        let displayed = self.visible();
        match reorder::map_displayed(&displayed, &self.tasks, from, to) {
            Some((full_from, full_to)) => {
                self.reorder(full_from, full_to)?;
                Ok(true)
            }
            None => {
                debug!(from, to, shown = displayed.len(), "drop ignored, stale view");
                Ok(false)
            }
        }
    }

    /// Resolve a full id or a unique id prefix to a stored id
    pub fn resolve_id(&self, input: &str) -> Result<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }

        if let Some(task) = self.get(trimmed) {
            return Ok(task.id.clone());
        }

        let needle = trimmed.to_ascii_lowercase();
        let mut matches: Vec<&str> = self
            .tasks
            .iter()
            .filter(|task| task.id.to_ascii_lowercase().starts_with(&needle))
            .map(|task| task.id.as_str())
            .collect();
        matches.sort_unstable();

        match matches.as_slice() {
            [] => Err(Error::TaskNotFound(trimmed.to_string())),
            [single] => Ok(single.to_string()),
            _ => Err(Error::InvalidArgument(format!(
                "ambiguous task id '{}': {}",
                trimmed,
                matches.join(", ")
            ))),
        }
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&mut self) {
        let encoded = match encode_tasks(&self.tasks) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to encode tasks");
                self.storage_warnings.push(format!("failed to encode tasks: {err}"));
                return;
            }
        };
        if let Err(err) = self.backend.set(&self.key, &encoded) {
            warn!(key = %self.key, error = %err, "failed to save tasks");
            self.storage_warnings.push(format!("failed to save tasks: {err}"));
        }
    }
}

fn hydrate<S: KeyValueStore>(
    backend: &mut S,
    key: &str,
    warnings: &mut Vec<String>,
) -> Vec<Task> {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(key, error = %err, "failed to read tasks, starting empty");
            warnings.push(format!("failed to load tasks: {err}"));
            return Vec::new();
        }
    };

    match decode_tasks(&raw) {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!(key, error = %err, "stored tasks are malformed, clearing");
            warnings.push(format!("stored tasks were malformed and have been cleared: {err}"));
            if let Err(err) = backend.remove(key) {
                warn!(key, error = %err, "failed to clear malformed tasks");
                warnings.push(format!("failed to clear malformed tasks: {err}"));
            }
            Vec::new()
        }
    }
}
