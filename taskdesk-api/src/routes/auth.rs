/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account and get a token
/// - `POST /auth/login` - Exchange credentials for a token
///
/// Both return `{"token": "<jwt>"}`. Password hashing and verification run
/// on the blocking pool.

use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult, CredentialFailure},
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use taskdesk_shared::{auth::password::PasswordHasher, models::account::CreateAccount};
use tracing::info;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token response for both endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new account
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {"username": "alice", "password": "secret1"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, validation failed, or username taken
/// - `500 Internal Server Error`: Hashing or storage failure
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = body?;
    validate_request(&req)?;

    let password_hash = hash_blocking(state.hasher.clone(), req.password).await?;

    let account = state
        .store
        .create_account(CreateAccount {
            username: req.username,
            password_hash,
        })
        .await?;

    info!(account_id = account.id, "Registered account");

    let token = state.tokens.issue(account.id)?;
    Ok(Json(TokenResponse { token }))
}

/// Log in with username and password
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {"username": "alice", "password": "secret1"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, validation failed, or bad credentials
/// - `500 Internal Server Error`: Stored hash unusable or storage failure
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = body?;
    validate_request(&req)?;

    let account = state
        .store
        .find_account_by_username(&req.username)
        .await?;

    // Unknown usernames still pay for a hash
    let valid = verify_blocking(
        state.hasher.clone(),
        req.password,
        account.as_ref().map(|a| a.password_hash.clone()),
    )
    .await?;

    let account = match account {
        Some(account) if valid => account,
        Some(_) => return Err(ApiError::InvalidCredentials(CredentialFailure::WrongPassword)),
        None => return Err(ApiError::InvalidCredentials(CredentialFailure::UnknownUsername)),
    };

    info!(account_id = account.id, "Account logged in");

    let token = state.tokens.issue(account.id)?;
    Ok(Json(TokenResponse { token }))
}

async fn hash_blocking(hasher: PasswordHasher, password: String) -> ApiResult<String> {
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))??;
    Ok(hash)
}

async fn verify_blocking(
    hasher: PasswordHasher,
    password: String,
    hash: Option<String>,
) -> ApiResult<bool> {
    let valid = tokio::task::spawn_blocking(move || hasher.verify_or_burn(&password, hash.as_deref()))
        .await
        .map_err(|e| ApiError::InternalError(format!("Verification task failed: {}", e)))??;
    Ok(valid)
}
