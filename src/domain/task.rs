//! Task groups, tasks, and task status.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{FieldError, Record};

/// Field names on the task groups table.
pub mod group_fields {
    /// Display name.
    pub const NAME: &str = "Group Name";
    /// Sort key; lower comes first.
    pub const ORDER: &str = "Group Order";
}

/// Field names on the tasks table.
pub mod task_fields {
    /// Task title.
    pub const TITLE: &str = "Task";
    /// Sort key within the group.
    pub const ORDER: &str = "Task Order";
    /// Free-form status string.
    pub const STATUS: &str = "Status";
    /// What the client has to do.
    pub const ACTION_TYPE: &str = "Action Type";
    /// Linked task group record ids.
    pub const GROUP: &str = "Group";
}

/// Status of a task.
///
/// The backend stores an open set of strings. The three known values map to
/// dedicated variants; anything else is carried verbatim. Only the exact
/// string `"Completed"` counts as completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Work has not begun.
    #[default]
    NotStarted,
    /// Work is underway.
    InProgress,
    /// Done.
    Completed,
    /// Any other backend value.
    Other(String),
}

impl TaskStatus {
    /// Marker string for completed tasks.
    pub const COMPLETED: &'static str = "Completed";

    /// True only for the exact completed marker.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The backend string for this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => Self::COMPLETED,
            Self::Other(s) => s,
        }
    }

    /// Checkbox marker used in text renderings.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Completed => "[x]",
            Self::InProgress => "[~]",
            Self::NotStarted | Self::Other(_) => "[ ]",
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Not Started" => Self::NotStarted,
            "In Progress" => Self::InProgress,
            Self::COMPLETED => Self::Completed,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, ordered bucket of tasks within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGroup {
    /// Backend record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sort key. Not unique.
    pub group_order: i64,
}

impl TaskGroup {
    /// Parses a task group record. Missing name or order default to empty and 0.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] for fields with an unexpected shape.
    pub fn from_record(record: &Record) -> Result<Self, FieldError> {
        let (name, group_order) = match record.fields() {
            Some(f) => (
                f.text(group_fields::NAME)?.unwrap_or_default(),
                f.integer(group_fields::ORDER)?.unwrap_or_default(),
            ),
            None => (String::new(), 0),
        };
        Ok(Self { id: record.id.clone(), name, group_order })
    }
}

/// A unit of client-facing work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Backend record id.
    pub id: String,
    /// Title shown to the client.
    pub title: String,
    /// Owning group, if any.
    pub group_id: Option<String>,
    /// Sort key within the group.
    pub task_order: i64,
    /// Current status.
    pub status: TaskStatus,
    /// What the client must do (e.g. "Upload", "Review", "Sign").
    pub action_type: Option<String>,
}

impl Task {
    /// Parses a task record. Only the first linked group is used.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] for fields with an unexpected shape.
    pub fn from_record(record: &Record) -> Result<Self, FieldError> {
        let Some(f) = record.fields() else {
            return Ok(Self {
                id: record.id.clone(),
                title: String::new(),
                group_id: None,
                task_order: 0,
                status: TaskStatus::default(),
                action_type: None,
            });
        };
        Ok(Self {
            id: record.id.clone(),
            title: f.text(task_fields::TITLE)?.unwrap_or_default(),
            group_id: f.linked_ids(task_fields::GROUP)?.into_iter().next(),
            task_order: f.integer(task_fields::ORDER)?.unwrap_or_default(),
            status: f.text(task_fields::STATUS)?.map(TaskStatus::from).unwrap_or_default(),
            action_type: f.non_empty_text(task_fields::ACTION_TYPE)?,
        })
    }
}
