/// Database models for TaskDesk
///
/// This module contains the persisted records and their SQL operations.
///
/// # Models
///
/// - `account`: Registered accounts (username + password hash)
/// - `task`: Personal to-do items owned by an account
///
/// Task queries that read or modify an existing row always take the owner id
/// alongside the task id, so a row owned by another account simply does not
/// match.
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::account::{Account, CreateAccount};
/// use taskdesk_shared::models::task::{CreateTask, Task};
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::new("postgresql://localhost/taskdesk", 10)).await?;
///
/// let account = Account::create(
///     &pool,
///     CreateAccount {
///         username: "alice".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let task = Task::create(
///     &pool,
///     CreateTask {
///         title: "buy milk".to_string(),
///         description: None,
///         owner_id: account.id,
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod task;
