/// Task endpoints
///
/// All handlers sit behind the bearer guard and receive the caller through
/// `Extension<AuthContext>`. Every storage call is scoped by
/// `auth.account_id`; a task owned by another account answers exactly like a
/// missing one.
///
/// # Endpoints
///
/// - `GET /tasks` - List the caller's tasks
/// - `POST /tasks` - Create a task
/// - `PUT /tasks/:id` - Partially update a task
/// - `DELETE /tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use taskdesk_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, UpdateTask},
    store::StoreError,
};
use tracing::{debug, info};
use validator::Validate;

/// Create task request
///
/// `ownerId` is tolerated so clients may post a full task object; the owner
/// is always the caller.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub owner_id: Option<i64>,
}

/// Update task request
///
/// Absent fields are left untouched. `"description": null` clears the
/// description; `null` for `title` or `isComplete` rejects the body. `id` and
/// `ownerId` are tolerated and ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "present_not_null")]
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "present_not_null")]
    pub is_complete: Option<bool>,

    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub owner_id: Option<i64>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        UpdateTask {
            title: req.title,
            description: req.description,
            is_complete: req.is_complete,
        }
    }
}

/// Distinguishes `"field": null` (Some(None)) from a missing field (None)
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Optional field whose value, when present, may not be `null`
fn present_not_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Delete confirmation
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// List the caller's tasks, ascending by ID
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.store.list_tasks(auth.account_id).await?;
    Ok(Json(tasks))
}

/// Create a task owned by the caller
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <token>
///
/// {"title": "buy milk", "description": "2 litres"}
/// ```
///
/// Returns the stored task with `isComplete: false`.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(req) = body?;
    validate_request(&req)?;

    if let Some(owner_id) = req.owner_id.filter(|&id| id != auth.account_id) {
        debug!(supplied_owner_id = owner_id, "Ignoring ownerId in request body");
    }

    let task = state
        .store
        .create_task(CreateTask {
            title: req.title,
            description: req.description,
            owner_id: auth.account_id,
        })
        .await
        .map_err(|e| match e {
            // Token outlived its account
            StoreError::ForeignKeyViolation(_) => ApiError::Unauthenticated,
            other => other.into(),
        })?;

    info!(task_id = task.id, account_id = auth.account_id, "Created task");
    Ok(Json(task))
}

/// Partially update one of the caller's tasks
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID belongs to the caller
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    let Json(req) = body?;
    validate_request(&req)?;

    if req.id.is_some_and(|body_id| body_id != id) || req.owner_id.is_some() {
        debug!(task_id = id, "Ignoring id/ownerId in update body");
    }

    let task = state
        .store
        .update_task(id, auth.account_id, req.into())
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(task_id = task.id, account_id = auth.account_id, "Updated task");
    Ok(Json(task))
}

/// Delete one of the caller's tasks
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID belongs to the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(id) = id?;

    let task = state
        .store
        .delete_task(id, auth.account_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(task_id = task.id, account_id = auth.account_id, "Deleted task");
    Ok(Json(DeleteResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
