/// In-process store
///
/// Keeps accounts and tasks in ordered maps behind one `RwLock`, so each
/// trait method is atomic with respect to the others. IDs are assigned from
/// per-table sequences starting at 1, like `BIGSERIAL`.
///
/// Nothing is persisted; the data lives as long as the store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    account::{Account, CreateAccount, USERNAME_CONSTRAINT},
    task::{CreateTask, Task, UpdateTask},
};

const TASK_OWNER_CONSTRAINT: &str = "tasks_owner_id_fkey";

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    tasks: BTreeMap<i64, Task>,
    next_account_id: i64,
    next_task_id: i64,
}

impl Tables {
    fn next_account_id(&mut self) -> i64 {
        self.next_account_id += 1;
        self.next_account_id
    }

    fn next_task_id(&mut self) -> i64 {
        self.next_task_id += 1;
        self.next_task_id
    }

    fn owned_task_mut(&mut self, id: i64, owner_id: i64) -> Option<&mut Task> {
        self.tasks
            .get_mut(&id)
            .filter(|task| task.owner_id == owner_id)
    }
}

/// Store backed by in-process maps
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    /// Reads any task by ID, ignoring ownership
    ///
    /// Intended for assertions in tests; handlers never call it.
    pub async fn task_by_id(&self, id: i64) -> Option<Task> {
        self.tables.read().await.tasks.get(&id).cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_account(&self, data: CreateAccount) -> StoreResult<Account> {
        let mut tables = self.tables.write().await;

        if tables
            .accounts
            .values()
            .any(|account| account.username == data.username)
        {
            return Err(StoreError::UniqueViolation(USERNAME_CONSTRAINT.to_string()));
        }

        let account = Account {
            id: tables.next_account_id(),
            username: data.username,
            password_hash: data.password_hash,
        };
        tables.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;

        Ok(tables
            .accounts
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn list_tasks(&self, owner_id: i64) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;

        Ok(tables
            .tasks
            .values()
            .filter(|task| task.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        if !tables.accounts.contains_key(&data.owner_id) {
            return Err(StoreError::ForeignKeyViolation(
                TASK_OWNER_CONSTRAINT.to_string(),
            ));
        }

        let task = Task {
            id: tables.next_task_id(),
            title: data.title,
            description: data.description,
            is_complete: false,
            owner_id: data.owner_id,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        data: UpdateTask,
    ) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        Ok(tables.owned_task_mut(id, owner_id).map(|task| {
            data.apply_to(task);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        if tables.owned_task_mut(id, owner_id).is_none() {
            return Ok(None);
        }

        Ok(tables.tasks.remove(&id))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
