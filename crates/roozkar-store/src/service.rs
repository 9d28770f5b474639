//! Business logic layer for the task store.
//!
//! Wraps the repository with validation, not-found mapping, denormalized
//! counter maintenance, and the list-delete cascade. Key rules:
//!
//! - **task_count**: incremented/decremented as a second, separate write
//!   after task insert/delete — no transaction ties the two together, so
//!   a crash between them leaves the counter stale (accepted behavior).
//! - **completed_at**: stamped when an update sets status=completed,
//!   cleared when it sets status=pending; cancelled leaves it alone.
//! - **List delete cascades** to every task referencing the list.

use rusqlite::Connection;
use tracing::debug;

use crate::errors::StoreError;
use crate::repository::TaskRepository;
use crate::types::{
    DashboardStats, ListParams, Subtask, SubtaskCreateParams, Tag, TagCreateParams, Task,
    TaskCreateParams, TaskFilter, TaskList, TaskPriority, TaskStatus, TaskUpdateParams,
};

/// Task service with business rules and validation.
pub struct TaskService;

impl TaskService {
    // ─────────────────────────────────────────────────────────────────────
    // Task operations
    // ─────────────────────────────────────────────────────────────────────

    /// Create a task and bump the owning list's task_count.
    pub fn create_task(
        conn: &Connection,
        params: &TaskCreateParams,
    ) -> Result<Task, StoreError> {
        if params.title.trim().is_empty() {
            return Err(StoreError::Validation("task title is required".to_string()));
        }

        let task = TaskRepository::create_task(conn, params)?;

        // Second, separate write; a missing list is silently ignored.
        if let Some(ref list_id) = task.list_id {
            TaskRepository::adjust_task_count(conn, list_id, 1)?;
        }

        Ok(task)
    }

    /// Get a task by id.
    pub fn get_task(conn: &Connection, id: &str) -> Result<Task, StoreError> {
        TaskRepository::get_task(conn, id)?.ok_or_else(|| StoreError::task_not_found(id))
    }

    /// List tasks matching the filter.
    pub fn list_tasks(conn: &Connection, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        TaskRepository::list_tasks(conn, filter)
    }

    /// Merge the supplied fields into a task.
    pub fn update_task(
        conn: &Connection,
        id: &str,
        updates: &TaskUpdateParams,
    ) -> Result<Task, StoreError> {
        if let Some(ref title) = updates.title {
            if title.trim().is_empty() {
                return Err(StoreError::Validation("task title is required".to_string()));
            }
        }

        TaskRepository::update_task(conn, id, updates)?
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    /// Delete a task and decrement its list's task_count.
    pub fn delete_task(conn: &Connection, id: &str) -> Result<(), StoreError> {
        let task =
            TaskRepository::get_task(conn, id)?.ok_or_else(|| StoreError::task_not_found(id))?;

        let _ = TaskRepository::delete_task(conn, id)?;

        if let Some(ref list_id) = task.list_id {
            TaskRepository::adjust_task_count(conn, list_id, -1)?;
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // List operations
    // ─────────────────────────────────────────────────────────────────────

    /// Create a list.
    pub fn create_list(conn: &Connection, params: &ListParams) -> Result<TaskList, StoreError> {
        if params.name.trim().is_empty() {
            return Err(StoreError::Validation("list name is required".to_string()));
        }
        TaskRepository::create_list(conn, params)
    }

    /// List all lists, newest first.
    pub fn list_lists(conn: &Connection) -> Result<Vec<TaskList>, StoreError> {
        TaskRepository::list_lists(conn)
    }

    /// Replace a list's name/color/icon.
    pub fn update_list(
        conn: &Connection,
        id: &str,
        params: &ListParams,
    ) -> Result<TaskList, StoreError> {
        if params.name.trim().is_empty() {
            return Err(StoreError::Validation("list name is required".to_string()));
        }
        TaskRepository::replace_list(conn, id, params)?
            .ok_or_else(|| StoreError::list_not_found(id))
    }

    /// Delete a list and every task referencing it.
    pub fn delete_list(conn: &Connection, id: &str) -> Result<(), StoreError> {
        if TaskRepository::get_list(conn, id)?.is_none() {
            return Err(StoreError::list_not_found(id));
        }

        let removed = TaskRepository::delete_tasks_in_list(conn, id)?;
        debug!(list_id = id, tasks_removed = removed, "list cascade delete");

        let _ = TaskRepository::delete_list(conn, id)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tag operations
    // ─────────────────────────────────────────────────────────────────────

    /// Create a tag.
    pub fn create_tag(conn: &Connection, params: &TagCreateParams) -> Result<Tag, StoreError> {
        if params.name.trim().is_empty() {
            return Err(StoreError::Validation("tag name is required".to_string()));
        }
        TaskRepository::create_tag(conn, params)
    }

    /// List all tags, newest first.
    pub fn list_tags(conn: &Connection) -> Result<Vec<Tag>, StoreError> {
        TaskRepository::list_tags(conn)
    }

    /// Delete a tag. Tasks referencing it keep the stale id.
    pub fn delete_tag(conn: &Connection, id: &str) -> Result<(), StoreError> {
        if !TaskRepository::delete_tag(conn, id)? {
            return Err(StoreError::tag_not_found(id));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Subtask operations
    // ─────────────────────────────────────────────────────────────────────

    /// Append a subtask to a task.
    pub fn add_subtask(
        conn: &Connection,
        task_id: &str,
        params: &SubtaskCreateParams,
    ) -> Result<Subtask, StoreError> {
        if params.title.trim().is_empty() {
            return Err(StoreError::Validation(
                "subtask title is required".to_string(),
            ));
        }
        TaskRepository::add_subtask(conn, task_id, params)?
            .ok_or_else(|| StoreError::task_not_found(task_id))
    }

    /// Set the completion flag of a subtask.
    pub fn set_subtask_completed(
        conn: &Connection,
        task_id: &str,
        subtask_id: &str,
        completed: bool,
    ) -> Result<(), StoreError> {
        if TaskRepository::set_subtask_completed(conn, task_id, subtask_id, completed)? {
            Ok(())
        } else {
            Err(StoreError::subtask_not_found(task_id, subtask_id))
        }
    }

    /// Remove a subtask. Removing an id that is not present in an
    /// existing task succeeds silently; only a missing task fails.
    pub fn remove_subtask(
        conn: &Connection,
        task_id: &str,
        subtask_id: &str,
    ) -> Result<(), StoreError> {
        match TaskRepository::remove_subtask(conn, task_id, subtask_id)? {
            Some(_) => Ok(()),
            None => Err(StoreError::task_not_found(task_id)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Statistics
    // ─────────────────────────────────────────────────────────────────────

    /// Compute the dashboard statistics as of call time.
    ///
    /// Each figure is its own query; concurrent writes between queries
    /// can yield a snapshot that is not internally consistent.
    pub fn dashboard_stats(conn: &Connection) -> Result<DashboardStats, StoreError> {
        let total_tasks = TaskRepository::count_tasks(conn)?;
        let completed_tasks = TaskRepository::count_tasks_by_status(conn, TaskStatus::Completed)?;
        let pending_tasks = TaskRepository::count_tasks_by_status(conn, TaskStatus::Pending)?;
        let total_lists = TaskRepository::count_lists(conn)?;

        let high_priority = TaskRepository::count_pending_by_priority(conn, TaskPriority::High)?;
        let medium_priority =
            TaskRepository::count_pending_by_priority(conn, TaskPriority::Medium)?;
        let low_priority = TaskRepository::count_pending_by_priority(conn, TaskPriority::Low)?;

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let due_today = TaskRepository::count_pending_due_on(conn, &today)?;

        let recent_tasks = TaskRepository::recent_pending_tasks(conn, 5)?;

        let completion_rate = if total_tasks > 0 {
            let rate = completed_tasks as f64 / total_tasks as f64 * 100.0;
            (rate * 10.0).round() / 10.0
        } else {
            0.0
        };

        Ok(DashboardStats {
            total_tasks,
            completed_tasks,
            pending_tasks,
            total_lists,
            high_priority,
            medium_priority,
            low_priority,
            due_today,
            recent_tasks,
            completion_rate,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn make_list(conn: &Connection, name: &str) -> TaskList {
        TaskService::create_list(
            conn,
            &ListParams {
                name: name.to_string(),
                color: "#3B82F6".to_string(),
                icon: "📋".to_string(),
            },
        )
        .unwrap()
    }

    fn make_task(conn: &Connection, title: &str, list_id: Option<&str>) -> Task {
        TaskService::create_task(
            conn,
            &TaskCreateParams {
                title: title.to_string(),
                list_id: list_id.map(String::from),
                ..Default::default()
            },
        )
        .unwrap()
    }

    // --- Validation ---

    #[test]
    fn test_create_task_blank_title_rejected() {
        let conn = setup_db();
        let result = TaskService::create_task(
            &conn,
            &TaskCreateParams {
                title: "   ".to_string(),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_update_task_blank_title_rejected() {
        let conn = setup_db();
        let task = make_task(&conn, "T", None);
        let result = TaskService::update_task(
            &conn,
            &task.id,
            &TaskUpdateParams {
                title: Some(String::new()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_create_list_blank_name_rejected() {
        let conn = setup_db();
        let result = TaskService::create_list(
            &conn,
            &ListParams {
                name: " ".to_string(),
                color: "#3B82F6".to_string(),
                icon: "📋".to_string(),
            },
        );
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_create_tag_blank_name_rejected() {
        let conn = setup_db();
        let result = TaskService::create_tag(
            &conn,
            &TagCreateParams {
                name: String::new(),
                color: "#10B981".to_string(),
            },
        );
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    // --- task_count maintenance ---

    #[test]
    fn test_create_without_list_leaves_counts_alone() {
        let conn = setup_db();
        let list = make_list(&conn, "Work");
        make_task(&conn, "loose", None);
        let reloaded = TaskRepository::get_list(&conn, &list.id).unwrap().unwrap();
        assert_eq!(reloaded.task_count, 0);
    }

    #[test]
    fn test_create_with_list_increments_count() {
        let conn = setup_db();
        let list = make_list(&conn, "Work");
        make_task(&conn, "t1", Some(&list.id));
        make_task(&conn, "t2", Some(&list.id));
        let reloaded = TaskRepository::get_list(&conn, &list.id).unwrap().unwrap();
        assert_eq!(reloaded.task_count, 2);
    }

    #[test]
    fn test_delete_task_decrements_count() {
        let conn = setup_db();
        let list = make_list(&conn, "Work");
        let task = make_task(&conn, "t", Some(&list.id));
        TaskService::delete_task(&conn, &task.id).unwrap();
        let reloaded = TaskRepository::get_list(&conn, &list.id).unwrap().unwrap();
        assert_eq!(reloaded.task_count, 0);
    }

    #[test]
    fn test_create_with_unknown_list_succeeds() {
        let conn = setup_db();
        // Weak reference: no integrity check, counter update silently
        // matches nothing
        let task = make_task(&conn, "orphan", Some("list-missing"));
        assert_eq!(task.list_id.as_deref(), Some("list-missing"));
    }

    // --- Not-found mapping ---

    #[test]
    fn test_get_task_not_found() {
        let conn = setup_db();
        assert!(matches!(
            TaskService::get_task(&conn, "task-missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_task_not_found() {
        let conn = setup_db();
        let result = TaskService::update_task(
            &conn,
            "task-missing",
            &TaskUpdateParams {
                title: Some("X".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_task_not_found() {
        let conn = setup_db();
        assert!(matches!(
            TaskService::delete_task(&conn, "task-missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_list_not_found() {
        let conn = setup_db();
        let result = TaskService::update_list(
            &conn,
            "list-missing",
            &ListParams {
                name: "X".to_string(),
                color: "#3B82F6".to_string(),
                icon: "📋".to_string(),
            },
        );
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_list_not_found() {
        let conn = setup_db();
        assert!(matches!(
            TaskService::delete_list(&conn, "list-missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_tag_not_found() {
        let conn = setup_db();
        assert!(matches!(
            TaskService::delete_tag(&conn, "tag-missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    // --- Cascade ---

    #[test]
    fn test_delete_list_cascades_to_tasks() {
        let conn = setup_db();
        let list = make_list(&conn, "Work");
        make_task(&conn, "in list", Some(&list.id));
        make_task(&conn, "also in list", Some(&list.id));
        let survivor = make_task(&conn, "elsewhere", None);

        TaskService::delete_list(&conn, &list.id).unwrap();

        let remaining = TaskService::list_tasks(&conn, &TaskFilter::default()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, survivor.id);
        assert!(TaskRepository::get_list(&conn, &list.id).unwrap().is_none());
    }

    // --- Subtasks ---

    #[test]
    fn test_subtask_lifecycle() {
        let conn = setup_db();
        let task = make_task(&conn, "parent", None);

        let subtask = TaskService::add_subtask(
            &conn,
            &task.id,
            &SubtaskCreateParams {
                title: "step".to_string(),
                completed: false,
            },
        )
        .unwrap();

        TaskService::set_subtask_completed(&conn, &task.id, &subtask.id, true).unwrap();
        let reloaded = TaskService::get_task(&conn, &task.id).unwrap();
        assert!(reloaded.subtasks[0].completed);

        TaskService::remove_subtask(&conn, &task.id, &subtask.id).unwrap();
        let reloaded = TaskService::get_task(&conn, &task.id).unwrap();
        assert!(reloaded.subtasks.is_empty());
    }

    #[test]
    fn test_add_subtask_blank_title_rejected() {
        let conn = setup_db();
        let task = make_task(&conn, "parent", None);
        let result = TaskService::add_subtask(
            &conn,
            &task.id,
            &SubtaskCreateParams {
                title: "  ".to_string(),
                completed: false,
            },
        );
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_set_subtask_completed_not_found() {
        let conn = setup_db();
        let task = make_task(&conn, "parent", None);
        let result = TaskService::set_subtask_completed(&conn, &task.id, "sub-missing", true);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_remove_subtask_absent_id_is_silent_success() {
        let conn = setup_db();
        let task = make_task(&conn, "parent", None);
        TaskService::remove_subtask(&conn, &task.id, "sub-missing").unwrap();
    }

    #[test]
    fn test_remove_subtask_task_missing_fails() {
        let conn = setup_db();
        assert!(matches!(
            TaskService::remove_subtask(&conn, "task-missing", "sub-x"),
            Err(StoreError::NotFound(_))
        ));
    }

    // --- Statistics ---

    #[test]
    fn test_stats_empty_collection() {
        let conn = setup_db();
        let stats = TaskService::dashboard_stats(&conn).unwrap();
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.completed_tasks, 0);
        assert_eq!(stats.pending_tasks, 0);
        assert_eq!(stats.total_lists, 0);
        assert_eq!(stats.due_today, 0);
        assert!(stats.recent_tasks.is_empty());
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn test_stats_completion_rate_rounds_to_one_decimal() {
        let conn = setup_db();
        // 1 of 3 completed → 33.333…% → 33.3
        let done = make_task(&conn, "done", None);
        make_task(&conn, "a", None);
        make_task(&conn, "b", None);
        TaskService::update_task(
            &conn,
            &done.id,
            &TaskUpdateParams {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .unwrap();

        let stats = TaskService::dashboard_stats(&conn).unwrap();
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.pending_tasks, 2);
        assert!((stats.completion_rate - 33.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_priority_breakdown_counts_pending_only() {
        let conn = setup_db();
        TaskService::create_task(
            &conn,
            &TaskCreateParams {
                title: "high open".to_string(),
                priority: Some(TaskPriority::High),
                ..Default::default()
            },
        )
        .unwrap();
        let done = TaskService::create_task(
            &conn,
            &TaskCreateParams {
                title: "high done".to_string(),
                priority: Some(TaskPriority::High),
                ..Default::default()
            },
        )
        .unwrap();
        TaskService::update_task(
            &conn,
            &done.id,
            &TaskUpdateParams {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .unwrap();

        let stats = TaskService::dashboard_stats(&conn).unwrap();
        assert_eq!(stats.high_priority, 1);
        assert_eq!(stats.medium_priority, 0);
        assert_eq!(stats.low_priority, 0);
    }

    #[test]
    fn test_stats_due_today() {
        let conn = setup_db();
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        TaskService::create_task(
            &conn,
            &TaskCreateParams {
                title: "due today".to_string(),
                due_date: Some(today),
                ..Default::default()
            },
        )
        .unwrap();
        TaskService::create_task(
            &conn,
            &TaskCreateParams {
                title: "due later".to_string(),
                due_date: Some("2099-01-01".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let stats = TaskService::dashboard_stats(&conn).unwrap();
        assert_eq!(stats.due_today, 1);
    }

    #[test]
    fn test_stats_recent_tasks_capped_at_five() {
        let conn = setup_db();
        for i in 0..8 {
            make_task(&conn, &format!("task {i}"), None);
        }
        let stats = TaskService::dashboard_stats(&conn).unwrap();
        assert_eq!(stats.recent_tasks.len(), 5);
        assert_eq!(stats.recent_tasks[0].title, "task 7");
    }
}
