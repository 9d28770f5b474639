//! SQL data access layer for tasks, lists, and tags.
//!
//! All methods take a `&Connection` parameter and are stateless — pure
//! functions that translate between Rust types and SQL. Uses
//! `uuid::Uuid::now_v7()` for time-ordered ID generation with
//! entity-specific prefixes.

use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::types::{
    ListParams, Subtask, SubtaskCreateParams, Tag, TagCreateParams, Task, TaskCreateParams,
    TaskFilter, TaskList, TaskPriority, TaskStatus, TaskUpdateParams,
};

/// Generate a prefixed UUID v7 ID.
fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7())
}

/// Get current UTC timestamp as ISO 8601 string.
fn now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse a JSON array column into a `Vec<String>`.
fn parse_string_array(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Parse the embedded subtasks column.
fn parse_subtasks(json: &str) -> Vec<Subtask> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Serialize an embedded JSON column.
fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// Repository for SQL CRUD operations on tasks, lists, and tags.
pub struct TaskRepository;

impl TaskRepository {
    // ─────────────────────────────────────────────────────────────────────
    // Task CRUD
    // ─────────────────────────────────────────────────────────────────────

    /// Create a new task. Status always starts as pending.
    pub fn create_task(
        conn: &Connection,
        params: &TaskCreateParams,
    ) -> Result<Task, StoreError> {
        let id = generate_id("task");
        let now = now_iso();
        let priority = params.priority.unwrap_or_default();
        let tags_json = to_json(&params.tags.clone().unwrap_or_default());

        // Normalize empty strings to None for the weak list reference.
        let list_id = params.list_id.as_deref().filter(|s| !s.is_empty());

        let _ = conn.execute(
            "INSERT INTO tasks (id, title, description, priority, status, due_date,
             due_time, list_id, tags, subtasks, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?6, ?7, ?8, '[]', ?9, ?9)",
            params![
                id,
                params.title,
                params.description,
                priority.as_sql(),
                params.due_date,
                params.due_time,
                list_id,
                tags_json,
                now,
            ],
        )?;

        Self::get_task(conn, &id)?.ok_or_else(|| StoreError::task_not_found(&id))
    }

    /// Get a task by ID.
    pub fn get_task(conn: &Connection, id: &str) -> Result<Option<Task>, StoreError> {
        let task = conn
            .query_row("SELECT * FROM tasks WHERE id = ?1", params![id], |row| {
                Ok(task_from_row(row))
            })
            .optional()?;
        Ok(task)
    }

    /// Update a task by merging the supplied fields. Returns the updated
    /// task, or `None` if not found.
    ///
    /// Setting status=completed stamps `completed_at`; setting
    /// status=pending clears it — a value assignment, applied whenever
    /// the update carries the status, not a transition check. Cancelled
    /// leaves `completed_at` untouched.
    pub fn update_task(
        conn: &Connection,
        id: &str,
        updates: &TaskUpdateParams,
    ) -> Result<Option<Task>, StoreError> {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref title) = updates.title {
            sets.push("title = ?".to_string());
            values.push(Box::new(title.clone()));
        }
        if let Some(ref desc) = updates.description {
            sets.push("description = ?".to_string());
            values.push(Box::new(desc.clone()));
        }
        if let Some(priority) = updates.priority {
            sets.push("priority = ?".to_string());
            values.push(Box::new(priority.as_sql().to_string()));
        }
        if let Some(status) = updates.status {
            sets.push("status = ?".to_string());
            values.push(Box::new(status.as_sql().to_string()));
            match status {
                TaskStatus::Completed => {
                    sets.push("completed_at = ?".to_string());
                    values.push(Box::new(now_iso()));
                }
                TaskStatus::Pending => {
                    sets.push("completed_at = NULL".to_string());
                }
                TaskStatus::Cancelled => {}
            }
        }
        if let Some(ref dd) = updates.due_date {
            sets.push("due_date = ?".to_string());
            values.push(Box::new(dd.clone()));
        }
        if let Some(ref dt) = updates.due_time {
            sets.push("due_time = ?".to_string());
            values.push(Box::new(dt.clone()));
        }
        if let Some(ref lid) = updates.list_id {
            sets.push("list_id = ?".to_string());
            let normalized: Option<String> = if lid.is_empty() {
                None
            } else {
                Some(lid.clone())
            };
            values.push(Box::new(normalized));
        }
        if let Some(ref tags) = updates.tags {
            sets.push("tags = ?".to_string());
            values.push(Box::new(to_json(tags)));
        }

        sets.push("updated_at = ?".to_string());
        values.push(Box::new(now_iso()));
        values.push(Box::new(id.to_string()));

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));
        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            values.iter().map(AsRef::as_ref).collect();
        let changed = conn.execute(&sql, params_refs.as_slice())?;

        if changed == 0 {
            return Ok(None);
        }

        Self::get_task(conn, id)
    }

    /// Delete a task by ID. Returns true if a row was deleted.
    pub fn delete_task(conn: &Connection, id: &str) -> Result<bool, StoreError> {
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// List tasks with filtering, ordered by creation timestamp
    /// descending (rowid breaks same-second ties).
    pub fn list_tasks(conn: &Connection, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let mut conditions: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref lid) = filter.list_id {
            conditions.push("list_id = ?".to_string());
            values.push(Box::new(lid.clone()));
        }
        if let Some(status) = filter.status {
            conditions.push("status = ?".to_string());
            values.push(Box::new(status.as_sql().to_string()));
        }
        if let Some(priority) = filter.priority {
            conditions.push("priority = ?".to_string());
            values.push(Box::new(priority.as_sql().to_string()));
        }
        if let Some(ref search) = filter.search {
            conditions.push(
                "(title LIKE '%' || ? || '%' OR COALESCE(description, '') LIKE '%' || ? || '%')"
                    .to_string(),
            );
            values.push(Box::new(search.clone()));
            values.push(Box::new(search.clone()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql =
            format!("SELECT * FROM tasks {where_clause} ORDER BY created_at DESC, rowid DESC");
        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            values.iter().map(AsRef::as_ref).collect();

        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params_refs.as_slice(), |row| Ok(task_from_row(row)))?
            .filter_map(Result::ok)
            .collect();
        Ok(tasks)
    }

    /// Delete every task referencing the given list. Returns the number
    /// of tasks removed.
    pub fn delete_tasks_in_list(conn: &Connection, list_id: &str) -> Result<usize, StoreError> {
        let changed = conn.execute("DELETE FROM tasks WHERE list_id = ?1", params![list_id])?;
        Ok(changed)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Subtasks (embedded in the task row)
    // ─────────────────────────────────────────────────────────────────────

    /// Append a subtask to a task's embedded sequence. Returns the
    /// created subtask, or `None` if the task does not exist.
    ///
    /// Subtask writes leave the task's `updated_at` alone; only field
    /// updates through [`Self::update_task`] touch it.
    pub fn add_subtask(
        conn: &Connection,
        task_id: &str,
        params: &SubtaskCreateParams,
    ) -> Result<Option<Subtask>, StoreError> {
        let Some(mut subtasks) = Self::read_subtasks(conn, task_id)? else {
            return Ok(None);
        };

        let subtask = Subtask {
            id: generate_id("sub"),
            title: params.title.clone(),
            completed: params.completed,
            created_at: now_iso(),
        };
        subtasks.push(subtask.clone());
        Self::write_subtasks(conn, task_id, &subtasks)?;
        Ok(Some(subtask))
    }

    /// Set the completion flag of a subtask addressed by
    /// (task id, subtask id). Returns true if the pair matched.
    pub fn set_subtask_completed(
        conn: &Connection,
        task_id: &str,
        subtask_id: &str,
        completed: bool,
    ) -> Result<bool, StoreError> {
        let Some(mut subtasks) = Self::read_subtasks(conn, task_id)? else {
            return Ok(false);
        };
        let Some(subtask) = subtasks.iter_mut().find(|s| s.id == subtask_id) else {
            return Ok(false);
        };
        subtask.completed = completed;
        Self::write_subtasks(conn, task_id, &subtasks)?;
        Ok(true)
    }

    /// Remove a subtask from a task's sequence. Returns `None` if the
    /// task does not exist; otherwise whether a subtask was removed.
    pub fn remove_subtask(
        conn: &Connection,
        task_id: &str,
        subtask_id: &str,
    ) -> Result<Option<bool>, StoreError> {
        let Some(mut subtasks) = Self::read_subtasks(conn, task_id)? else {
            return Ok(None);
        };
        let before = subtasks.len();
        subtasks.retain(|s| s.id != subtask_id);
        let removed = subtasks.len() != before;
        if removed {
            Self::write_subtasks(conn, task_id, &subtasks)?;
        }
        Ok(Some(removed))
    }

    fn read_subtasks(
        conn: &Connection,
        task_id: &str,
    ) -> Result<Option<Vec<Subtask>>, StoreError> {
        let json: Option<String> = conn
            .query_row(
                "SELECT subtasks FROM tasks WHERE id = ?1",
                params![task_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(json.map(|j| parse_subtasks(&j)))
    }

    fn write_subtasks(
        conn: &Connection,
        task_id: &str,
        subtasks: &[Subtask],
    ) -> Result<(), StoreError> {
        let _ = conn.execute(
            "UPDATE tasks SET subtasks = ?1 WHERE id = ?2",
            params![to_json(&subtasks), task_id],
        )?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // List CRUD
    // ─────────────────────────────────────────────────────────────────────

    /// Create a new list with task_count 0.
    pub fn create_list(conn: &Connection, params: &ListParams) -> Result<TaskList, StoreError> {
        let id = generate_id("list");
        let now = now_iso();

        let _ = conn.execute(
            "INSERT INTO lists (id, name, color, icon, task_count, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![id, params.name, params.color, params.icon, now],
        )?;

        Self::get_list(conn, &id)?.ok_or_else(|| StoreError::list_not_found(&id))
    }

    /// Get a list by ID.
    pub fn get_list(conn: &Connection, id: &str) -> Result<Option<TaskList>, StoreError> {
        let list = conn
            .query_row("SELECT * FROM lists WHERE id = ?1", params![id], |row| {
                Ok(list_from_row(row))
            })
            .optional()?;
        Ok(list)
    }

    /// List all lists, newest first.
    pub fn list_lists(conn: &Connection) -> Result<Vec<TaskList>, StoreError> {
        let mut stmt =
            conn.prepare("SELECT * FROM lists ORDER BY created_at DESC, rowid DESC")?;
        let lists = stmt
            .query_map([], |row| Ok(list_from_row(row)))?
            .filter_map(Result::ok)
            .collect();
        Ok(lists)
    }

    /// Replace a list's name/color/icon wholesale (not a partial merge,
    /// unlike task updates). Returns `None` if not found.
    pub fn replace_list(
        conn: &Connection,
        id: &str,
        params: &ListParams,
    ) -> Result<Option<TaskList>, StoreError> {
        let changed = conn.execute(
            "UPDATE lists SET name = ?1, color = ?2, icon = ?3 WHERE id = ?4",
            params![params.name, params.color, params.icon, id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Self::get_list(conn, id)
    }

    /// Delete a list by ID. Returns true if a row was deleted.
    pub fn delete_list(conn: &Connection, id: &str) -> Result<bool, StoreError> {
        let changed = conn.execute("DELETE FROM lists WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Adjust a list's denormalized task_count by `delta`.
    ///
    /// Silently a no-op when the list does not exist — weak references
    /// carry no integrity guarantee.
    pub fn adjust_task_count(
        conn: &Connection,
        list_id: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        let _ = conn.execute(
            "UPDATE lists SET task_count = task_count + ?1 WHERE id = ?2",
            params![delta, list_id],
        )?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tag CRUD
    // ─────────────────────────────────────────────────────────────────────

    /// Create a new tag.
    pub fn create_tag(conn: &Connection, params: &TagCreateParams) -> Result<Tag, StoreError> {
        let id = generate_id("tag");
        let now = now_iso();

        let _ = conn.execute(
            "INSERT INTO tags (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, params.name, params.color, now],
        )?;

        Self::get_tag(conn, &id)?.ok_or_else(|| StoreError::tag_not_found(&id))
    }

    /// Get a tag by ID.
    pub fn get_tag(conn: &Connection, id: &str) -> Result<Option<Tag>, StoreError> {
        let tag = conn
            .query_row("SELECT * FROM tags WHERE id = ?1", params![id], |row| {
                Ok(tag_from_row(row))
            })
            .optional()?;
        Ok(tag)
    }

    /// List all tags, newest first.
    pub fn list_tags(conn: &Connection) -> Result<Vec<Tag>, StoreError> {
        let mut stmt = conn.prepare("SELECT * FROM tags ORDER BY created_at DESC, rowid DESC")?;
        let tags = stmt
            .query_map([], |row| Ok(tag_from_row(row)))?
            .filter_map(Result::ok)
            .collect();
        Ok(tags)
    }

    /// Delete a tag by ID. Returns true if a row was deleted. Tasks
    /// referencing the tag keep their stale reference.
    pub fn delete_tag(conn: &Connection, id: &str) -> Result<bool, StoreError> {
        let changed = conn.execute("DELETE FROM tags WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Counts (statistics)
    // ─────────────────────────────────────────────────────────────────────

    /// Count all tasks.
    pub fn count_tasks(conn: &Connection) -> Result<i64, StoreError> {
        let count = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count tasks with the given status.
    pub fn count_tasks_by_status(
        conn: &Connection,
        status: TaskStatus,
    ) -> Result<i64, StoreError> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE status = ?1",
            params![status.as_sql()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count pending tasks with the given priority.
    pub fn count_pending_by_priority(
        conn: &Connection,
        priority: TaskPriority,
    ) -> Result<i64, StoreError> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE status = 'pending' AND priority = ?1",
            params![priority.as_sql()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count pending tasks whose due date equals `date` (`YYYY-MM-DD`).
    pub fn count_pending_due_on(conn: &Connection, date: &str) -> Result<i64, StoreError> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE status = 'pending' AND due_date = ?1",
            params![date],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// The most recently created pending tasks, up to `limit`.
    pub fn recent_pending_tasks(
        conn: &Connection,
        limit: u32,
    ) -> Result<Vec<Task>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT * FROM tasks WHERE status = 'pending' \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1",
        )?;
        let tasks = stmt
            .query_map(params![limit], |row| Ok(task_from_row(row)))?
            .filter_map(Result::ok)
            .collect();
        Ok(tasks)
    }

    /// Count all lists.
    pub fn count_lists(conn: &Connection) -> Result<i64, StoreError> {
        let count = conn.query_row("SELECT COUNT(*) FROM lists", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row converters
// ─────────────────────────────────────────────────────────────────────────────

fn task_from_row(row: &rusqlite::Row<'_>) -> Task {
    let status_str: String = row.get_unwrap("status");
    let priority_str: String = row.get_unwrap("priority");
    let tags_json: String = row.get_unwrap("tags");
    let subtasks_json: String = row.get_unwrap("subtasks");

    Task {
        id: row.get_unwrap("id"),
        title: row.get_unwrap("title"),
        description: row.get_unwrap("description"),
        priority: TaskPriority::parse(&priority_str).unwrap_or_default(),
        status: TaskStatus::parse(&status_str).unwrap_or_default(),
        due_date: row.get_unwrap("due_date"),
        due_time: row.get_unwrap("due_time"),
        list_id: row.get_unwrap("list_id"),
        tags: parse_string_array(&tags_json),
        subtasks: parse_subtasks(&subtasks_json),
        created_at: row.get_unwrap("created_at"),
        updated_at: row.get_unwrap("updated_at"),
        completed_at: row.get_unwrap("completed_at"),
    }
}

fn list_from_row(row: &rusqlite::Row<'_>) -> TaskList {
    TaskList {
        id: row.get_unwrap("id"),
        name: row.get_unwrap("name"),
        color: row.get_unwrap("color"),
        icon: row.get_unwrap("icon"),
        task_count: row.get_unwrap("task_count"),
        created_at: row.get_unwrap("created_at"),
    }
}

fn tag_from_row(row: &rusqlite::Row<'_>) -> Tag {
    Tag {
        id: row.get_unwrap("id"),
        name: row.get_unwrap("name"),
        color: row.get_unwrap("color"),
        created_at: row.get_unwrap("created_at"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
