/// Task model and database operations
///
/// Every operation that touches an existing task takes both the task ID and
/// the owner's account ID and filters on the pair inside a single statement.
/// A task owned by someone else is indistinguishable from a task that does
/// not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     is_complete BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

const TASK_COLUMNS: &str = "id, title, description, is_complete, owner_id";

/// A personal to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Short title (required)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Completion flag, false on creation
    pub is_complete: bool,

    /// Owning account
    pub owner_id: i64,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,

    /// Always the authenticated account, never taken from the request body
    pub owner_id: i64,
}

/// Partial update for an existing task
///
/// Only `Some` fields are written. `description: Some(None)` clears the
/// description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub is_complete: Option<bool>,
}

impl UpdateTask {
    /// Returns true when no field would be written
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.is_complete.is_none()
    }

    /// Applies the patch to an in-memory task
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(is_complete) = self.is_complete {
            task.is_complete = is_complete;
        }
    }
}

impl Task {
    /// Inserts a new task and returns the stored row
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if `owner_id` does not reference an
    /// existing account.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks owned by an account, ordered by ID
    pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE owner_id = $1
            ORDER BY id
            "#
        ))
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by ID, scoped to its owner
    pub async fn find_owned(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a task owned by `owner_id`
    ///
    /// Returns `None` if no task matches both IDs. An empty patch writes
    /// nothing and returns the current row under the same scoping.
    pub async fn update_owned(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_owned(pool, id, owner_id).await;
        }

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE tasks SET ");
        let mut assignments = query.separated(", ");

        if let Some(title) = data.title {
            assignments.push("title = ").push_bind_unseparated(title);
        }
        if let Some(description) = data.description {
            assignments
                .push("description = ")
                .push_bind_unseparated(description);
        }
        if let Some(is_complete) = data.is_complete {
            assignments
                .push("is_complete = ")
                .push_bind_unseparated(is_complete);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND owner_id = ")
            .push_bind(owner_id)
            .push(" RETURNING ")
            .push(TASK_COLUMNS);

        let task = query
            .build_query_as::<Task>()
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Deletes a task owned by `owner_id`, returning the removed row
    pub async fn delete_owned(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND owner_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}
