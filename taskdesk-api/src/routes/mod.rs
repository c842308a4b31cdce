/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `tasks`: Task CRUD scoped to the authenticated account

pub mod auth;
pub mod health;
pub mod tasks;
