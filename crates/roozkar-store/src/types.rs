//! Entity, parameter, and filter types for the store.
//!
//! Wire representation uses lowercase machine keys for enumerated fields
//! (`pending`, `high`, …); display labels are a frontend concern.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Task priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority (the default).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    /// SQL/wire representation.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a machine key. Returns `None` for anything outside the
    /// fixed label set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Task status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Open, not yet completed (the default).
    #[default]
    Pending,
    /// Completed.
    Completed,
    /// Cancelled.
    Cancelled,
}

impl TaskStatus {
    /// SQL/wire representation.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a machine key. Returns `None` for anything outside the
    /// fixed label set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entities
// ─────────────────────────────────────────────────────────────────────────────

/// A checklist item embedded in exactly one task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Unique id (`sub-…`).
    pub id: String,
    /// Subtask title.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// A to-do item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id (`task-…`).
    pub id: String,
    /// Task title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Status.
    pub status: TaskStatus,
    /// Optional due date (`YYYY-MM-DD`).
    pub due_date: Option<String>,
    /// Optional free-form due time.
    pub due_time: Option<String>,
    /// Weak reference to the owning list.
    pub list_id: Option<String>,
    /// Weak references to tags.
    pub tags: Vec<String>,
    /// Embedded ordered subtasks.
    pub subtasks: Vec<Subtask>,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last-update timestamp (ISO 8601).
    pub updated_at: String,
    /// Set when the task was marked completed, cleared when reopened.
    pub completed_at: Option<String>,
}

/// A named grouping of tasks with a denormalized task count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    /// Unique id (`list-…`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display color (hex).
    pub color: String,
    /// Display icon.
    pub icon: String,
    /// Number of tasks currently referencing this list. Maintained
    /// incrementally on task create/delete; eventually consistent only.
    pub task_count: i64,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// A label referenceable by tasks; independent lifecycle, no cascade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique id (`tag-…`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display color (hex).
    pub color: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Request parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters for creating a task. Status is not accepted: new tasks
/// always start pending.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TaskCreateParams {
    /// Required title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority; defaults to medium.
    pub priority: Option<TaskPriority>,
    /// Optional due date (`YYYY-MM-DD`).
    pub due_date: Option<String>,
    /// Optional free-form due time.
    pub due_time: Option<String>,
    /// Optional owning list reference.
    pub list_id: Option<String>,
    /// Optional tag references.
    pub tags: Option<Vec<String>>,
}

/// Partial-update parameters for a task. Omitted (or null) fields are
/// left unchanged; present fields replace the stored value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TaskUpdateParams {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New status. Setting `completed` stamps `completed_at`; setting
    /// `pending` clears it (even when already pending).
    pub status: Option<TaskStatus>,
    /// New due date.
    pub due_date: Option<String>,
    /// New due time.
    pub due_time: Option<String>,
    /// New owning list reference.
    pub list_id: Option<String>,
    /// Replacement tag set.
    pub tags: Option<Vec<String>>,
}

/// Filters for listing tasks. All filters combine with AND.
#[derive(Clone, Debug, Default)]
pub struct TaskFilter {
    /// Exact owning-list match.
    pub list_id: Option<String>,
    /// Exact status match.
    pub status: Option<TaskStatus>,
    /// Exact priority match.
    pub priority: Option<TaskPriority>,
    /// Case-insensitive substring match against title or description.
    pub search: Option<String>,
}

fn default_list_color() -> String {
    "#3B82F6".to_string()
}

fn default_list_icon() -> String {
    "📋".to_string()
}

fn default_tag_color() -> String {
    "#10B981".to_string()
}

/// Parameters for creating a list, and the full-replace payload for
/// updating one (list updates are not partial merges: absent color/icon
/// fall back to the defaults).
#[derive(Clone, Debug, Deserialize)]
pub struct ListParams {
    /// Required display name.
    pub name: String,
    /// Display color; defaults to the standard list blue.
    #[serde(default = "default_list_color")]
    pub color: String,
    /// Display icon; defaults to the clipboard emoji.
    #[serde(default = "default_list_icon")]
    pub icon: String,
}

/// Parameters for creating a tag.
#[derive(Clone, Debug, Deserialize)]
pub struct TagCreateParams {
    /// Required display name.
    pub name: String,
    /// Display color; defaults to the standard tag green.
    #[serde(default = "default_tag_color")]
    pub color: String,
}

/// Parameters for appending a subtask to a task.
#[derive(Clone, Debug, Deserialize)]
pub struct SubtaskCreateParams {
    /// Required title.
    pub title: String,
    /// Initial completion flag; defaults to false.
    #[serde(default)]
    pub completed: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Statistics
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate dashboard numbers.
///
/// Every figure comes from its own query — no single consistent snapshot
/// is guaranteed under concurrent mutation.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardStats {
    /// All tasks, any status.
    pub total_tasks: i64,
    /// Tasks with status completed.
    pub completed_tasks: i64,
    /// Tasks with status pending.
    pub pending_tasks: i64,
    /// All lists.
    pub total_lists: i64,
    /// Pending tasks with high priority.
    pub high_priority: i64,
    /// Pending tasks with medium priority.
    pub medium_priority: i64,
    /// Pending tasks with low priority.
    pub low_priority: i64,
    /// Pending tasks due on the current date.
    pub due_today: i64,
    /// Five most recently created pending tasks.
    pub recent_tasks: Vec<Task>,
    /// completed/total × 100, rounded to one decimal; 0 when empty.
    pub completion_rate: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
