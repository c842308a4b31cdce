/// Storage seam for accounts and tasks
///
/// Handlers talk to storage only through the [`Store`] trait. Two backends
/// implement it:
///
/// - [`postgres::PgStore`]: PostgreSQL through a `sqlx` pool
/// - [`memory::MemoryStore`]: in-process tables, used by tests and by
///   `DATABASE_URL=memory:`
///
/// # Contract
///
/// All implementations must:
/// 1. Reject a second account with an existing username
///    ([`StoreError::UniqueViolation`])
/// 2. Reject a task whose owner does not exist
///    ([`StoreError::ForeignKeyViolation`])
/// 3. Filter `update_task`/`delete_task` by task ID *and* owner ID in one
///    atomic step, returning `None` when nothing matched
/// 4. Return tasks in ascending ID order
///
/// # Example
///
/// ```
/// use taskdesk_shared::models::account::CreateAccount;
/// use taskdesk_shared::models::task::CreateTask;
/// use taskdesk_shared::store::{memory::MemoryStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
///
/// let alice = store
///     .create_account(CreateAccount {
///         username: "alice".to_string(),
///         password_hash: "hash".to_string(),
///     })
///     .await?;
///
/// let task = store
///     .create_task(CreateTask {
///         title: "buy milk".to_string(),
///         description: None,
///         owner_id: alice.id,
///     })
///     .await?;
///
/// // Another owner ID never matches
/// assert!(store.delete_task(task.id, alice.id + 1).await?.is_none());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{
    account::{Account, CreateAccount},
    task::{CreateTask, Task, UpdateTask},
};

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (e.g. duplicate username)
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint rejected the write (e.g. unknown owner)
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();

            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }

        StoreError::Database(err.to_string())
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Account and task storage
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Inserts an account, failing with `UniqueViolation` on a taken username
    async fn create_account(&self, data: CreateAccount) -> StoreResult<Account>;

    /// Looks up an account by exact username
    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>>;

    /// Lists the tasks owned by `owner_id`, ascending by ID
    async fn list_tasks(&self, owner_id: i64) -> StoreResult<Vec<Task>>;

    /// Inserts a task for `data.owner_id`
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Applies a partial update to the task matching both IDs
    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        data: UpdateTask,
    ) -> StoreResult<Option<Task>>;

    /// Deletes the task matching both IDs, returning the removed row
    async fn delete_task(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>>;

    /// Verifies the backend is reachable
    async fn health_check(&self) -> StoreResult<()>;
}
