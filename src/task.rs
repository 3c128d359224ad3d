//! Task records and their ordering.
//!
//! Tasks are persisted as one JSON array. Field names are camelCase so a
//! stored collection looks like:
//!
//! ```json
//! [{"id":"…","title":"Milk","description":"","priority":"High",
//!   "createdAt":"2024-05-01T09:30:00Z","order":3}]
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown priority '{trimmed}' (expected low|medium|high)"
                ))
            })
    }
}

/// Priority filter applied to the displayed list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn allows(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => *wanted == priority,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("All"),
            PriorityFilter::Only(priority) => f.write_str(priority.as_str()),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        trimmed.parse::<Priority>().map(PriorityFilter::Only).map_err(|_| {
            Error::InvalidArgument(format!(
                "unknown priority filter '{trimmed}' (expected all|low|medium|high)"
            ))
        })
    }
}

impl From<Priority> for PriorityFilter {
    fn from(priority: Priority) -> Self {
        PriorityFilter::Only(priority)
    }
}

impl Serialize for PriorityFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub order: i64,
}

impl Task {
    /// Display order: higher `order` first, newer `created_at` breaks ties
    pub fn display_cmp(&self, other: &Task) -> Ordering {
        other
            .order
            .cmp(&self.order)
            .then_with(|| other.created_at.cmp(&self.created_at))
    }
}

/// Sort tasks into display order in place
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(Task::display_cmp);
}

/// Serialize a collection to its stored form
pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string(tasks)?)
}

/// Parse a stored collection, keeping its array order
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>> {
    Ok(serde_json::from_str(raw)?)
}
