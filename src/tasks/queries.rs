//! The task tracker's fixed query catalog.
//!
//! Every operation runs in its own scoped acquisition. Nothing here catches
//! errors: a failing statement rolls back and the error reaches the caller.

use crate::error::TaskDbError;
use crate::postgres::PgProvider;

use super::model::{
    DEFAULT_STATUS, StatusCount, Task, TaskTitle, TaskWithEmail, TaskWithStatus, User,
    UserTaskCount, UserTaskTitle,
};

const TASKS_BY_USER: &str =
    "SELECT id, title, description FROM tasks WHERE user_id = $1 ORDER BY id";

const TASKS_BY_STATUS_NAME: &str = "
    SELECT t.id, t.title
    FROM tasks t
    WHERE t.status_id = (SELECT s.id FROM status s WHERE s.name = $1)
    ORDER BY t.id";

const UPDATE_TASK_STATUS: &str = "
    UPDATE tasks t
    SET status_id = s.id
    FROM status s
    WHERE s.name = $1 AND t.id = $2
    RETURNING t.id";

const USERS_WITHOUT_TASKS: &str = "
    SELECT u.id, u.fullname, u.email
    FROM users u
    WHERE u.id NOT IN (SELECT DISTINCT user_id FROM tasks)
    ORDER BY u.id";

const INSERT_TASK_FOR_USER: &str = "
    INSERT INTO tasks (title, description, status_id, user_id)
    VALUES ($1, $2, (SELECT id FROM status WHERE name = $3), $4)
    RETURNING id";

const NOT_COMPLETED_TASKS: &str = "
    SELECT t.id, t.title, s.name AS status
    FROM tasks t JOIN status s ON s.id = t.status_id
    WHERE s.name <> 'completed'
    ORDER BY t.id";

const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = $1 RETURNING id";

const USERS_BY_EMAIL_LIKE: &str =
    "SELECT id, fullname, email FROM users WHERE email ILIKE $1 ORDER BY id";

const UPDATE_USER_FULLNAME: &str = "UPDATE users SET fullname = $1 WHERE id = $2 RETURNING id";

const TASK_COUNT_BY_STATUS: &str = "
    SELECT s.name AS status, COUNT(t.id) AS total
    FROM status s
    LEFT JOIN tasks t ON t.status_id = s.id
    GROUP BY s.name
    ORDER BY s.name";

const TASKS_BY_USER_EMAIL_DOMAIN: &str = "
    SELECT t.id, t.title, u.email
    FROM tasks t
    JOIN users u ON u.id = t.user_id
    WHERE u.email ILIKE $1
    ORDER BY t.id";

const TASKS_WITHOUT_DESCRIPTION: &str =
    "SELECT id, title FROM tasks WHERE description IS NULL OR description = '' ORDER BY id";

const USERS_WITH_IN_PROGRESS_TASKS: &str = "
    SELECT u.fullname, t.title
    FROM users u
    JOIN tasks t  ON t.user_id = u.id
    JOIN status s ON s.id = t.status_id
    WHERE s.name = 'in progress'
    ORDER BY u.fullname";

const USERS_AND_TASK_COUNTS: &str = "
    SELECT u.id, u.fullname, COUNT(t.id) AS tasks_total
    FROM users u
    LEFT JOIN tasks t ON t.user_id = u.id
    GROUP BY u.id, u.fullname
    ORDER BY u.fullname";

const DELETE_USER: &str = "DELETE FROM users WHERE id = $1 RETURNING id";

const DELETE_STATUS: &str = "DELETE FROM status WHERE name = $1 RETURNING id";

/// Named, parameterized queries over `users`, `status` and `tasks`.
#[derive(Clone)]
pub struct TaskQueries {
    provider: PgProvider,
}

impl TaskQueries {
    #[must_use]
    pub fn new(provider: PgProvider) -> Self {
        Self { provider }
    }

    /// Tasks owned by `user_id`, ordered by id.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn tasks_by_user(&self, user_id: i32) -> Result<Vec<Task>, TaskDbError> {
        self.provider
            .fetch_all(TASKS_BY_USER, vec![user_id.into()])
            .await
    }

    /// Tasks whose status is `status_name`.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn tasks_by_status_name(
        &self,
        status_name: &str,
    ) -> Result<Vec<TaskTitle>, TaskDbError> {
        self.provider
            .fetch_all(TASKS_BY_STATUS_NAME, vec![status_name.into()])
            .await
    }

    /// Move a task to the status named `new_status`.
    ///
    /// Returns `None` and leaves the task untouched if either `task_id` or
    /// `new_status` does not exist.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn update_task_status(
        &self,
        task_id: i32,
        new_status: &str,
    ) -> Result<Option<i32>, TaskDbError> {
        self.provider
            .fetch_optional(UPDATE_TASK_STATUS, vec![new_status.into(), task_id.into()])
            .await
    }

    /// Users that own no task at all.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn users_without_tasks(&self) -> Result<Vec<User>, TaskDbError> {
        self.provider.fetch_all(USERS_WITHOUT_TASKS, vec![]).await
    }

    /// Insert a task for `user_id` under `status_name` and return its id.
    ///
    /// # Errors
    /// Propagates any execution error (unknown user or status included).
    pub async fn insert_task_for_user(
        &self,
        user_id: i32,
        title: &str,
        description: Option<&str>,
        status_name: &str,
    ) -> Result<i32, TaskDbError> {
        let params = vec![
            title.into(),
            description.into(),
            status_name.into(),
            user_id.into(),
        ];
        self.provider
            .fetch_optional(INSERT_TASK_FOR_USER, params)
            .await?
            .ok_or_else(|| {
                TaskDbError::ExecutionError("INSERT ... RETURNING produced no row".to_string())
            })
    }

    /// [`Self::insert_task_for_user`] with the default `"new"` status.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn insert_new_task(
        &self,
        user_id: i32,
        title: &str,
        description: Option<&str>,
    ) -> Result<i32, TaskDbError> {
        self.insert_task_for_user(user_id, title, description, DEFAULT_STATUS)
            .await
    }

    /// Tasks in any status other than `completed`.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn not_completed_tasks(&self) -> Result<Vec<TaskWithStatus>, TaskDbError> {
        self.provider.fetch_all(NOT_COMPLETED_TASKS, vec![]).await
    }

    /// Delete a task, echoing its id back if it existed.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn delete_task(&self, task_id: i32) -> Result<Option<i32>, TaskDbError> {
        self.provider
            .fetch_optional(DELETE_TASK, vec![task_id.into()])
            .await
    }

    /// Users whose email matches an ILIKE `pattern`.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn users_by_email_like(&self, pattern: &str) -> Result<Vec<User>, TaskDbError> {
        self.provider
            .fetch_all(USERS_BY_EMAIL_LIKE, vec![pattern.into()])
            .await
    }

    /// Rename a user, returning the id if the user exists.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn update_user_fullname(
        &self,
        user_id: i32,
        new_name: &str,
    ) -> Result<Option<i32>, TaskDbError> {
        self.provider
            .fetch_optional(UPDATE_USER_FULLNAME, vec![new_name.into(), user_id.into()])
            .await
    }

    /// Task totals per status, zero counts included, ordered by status name.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn task_count_by_status(&self) -> Result<Vec<StatusCount>, TaskDbError> {
        self.provider.fetch_all(TASK_COUNT_BY_STATUS, vec![]).await
    }

    /// Tasks whose owner's email matches an ILIKE pattern such as `%@example.com`.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn tasks_by_user_email_domain(
        &self,
        domain: &str,
    ) -> Result<Vec<TaskWithEmail>, TaskDbError> {
        self.provider
            .fetch_all(TASKS_BY_USER_EMAIL_DOMAIN, vec![domain.into()])
            .await
    }

    /// Tasks with a NULL or empty description.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn tasks_without_description(&self) -> Result<Vec<TaskTitle>, TaskDbError> {
        self.provider
            .fetch_all(TASKS_WITHOUT_DESCRIPTION, vec![])
            .await
    }

    /// `(fullname, title)` for every task in progress, ordered by user name.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn users_with_in_progress_tasks(
        &self,
    ) -> Result<Vec<UserTaskTitle>, TaskDbError> {
        self.provider
            .fetch_all(USERS_WITH_IN_PROGRESS_TASKS, vec![])
            .await
    }

    /// Every user with their task total, zero included, ordered by user name.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn users_and_task_counts(&self) -> Result<Vec<UserTaskCount>, TaskDbError> {
        self.provider.fetch_all(USERS_AND_TASK_COUNTS, vec![]).await
    }

    /// Delete a user; the user's tasks go with it.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub async fn delete_user(&self, user_id: i32) -> Result<Option<i32>, TaskDbError> {
        self.provider
            .fetch_optional(DELETE_USER, vec![user_id.into()])
            .await
    }

    /// Delete a status by name. Fails while any task still references it.
    ///
    /// # Errors
    /// Propagates any execution error, including the foreign-key restriction.
    pub async fn delete_status(&self, name: &str) -> Result<Option<i32>, TaskDbError> {
        self.provider
            .fetch_optional(DELETE_STATUS, vec![name.into()])
            .await
    }
}
