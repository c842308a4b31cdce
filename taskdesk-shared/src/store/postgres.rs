/// PostgreSQL store
///
/// Thin adapter from the [`Store`] trait onto the model-level queries in
/// [`crate::models`]. Each method issues exactly one statement.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Store, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    account::{Account, CreateAccount},
    task::{CreateTask, Task, UpdateTask},
};

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create_account(&self, data: CreateAccount) -> StoreResult<Account> {
        Ok(Account::create(&self.pool, data).await?)
    }

    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        Ok(Account::find_by_username(&self.pool, username).await?)
    }

    async fn list_tasks(&self, owner_id: i64) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        data: UpdateTask,
    ) -> StoreResult<Option<Task>> {
        Ok(Task::update_owned(&self.pool, id, owner_id, data).await?)
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>> {
        Ok(Task::delete_owned(&self.pool, id, owner_id).await?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
