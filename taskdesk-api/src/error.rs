/// Error handling for the API server
///
/// Every handler returns [`ApiResult<T>`]. [`ApiError`] maps each failure
/// kind to a status code and a `{error, message, details?}` JSON body.
/// Internal details (database messages, hashing failures) are logged and
/// never sent to the client.
///
/// # Example
///
/// ```
/// use taskdesk_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler(found: bool) -> ApiResult<Json<serde_json::Value>> {
///     if !found {
///         return Err(ApiError::NotFound);
///     }
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskdesk_shared::{
    auth::{jwt::JwtError, middleware::AuthError, password::PasswordError},
    models::account::USERNAME_CONSTRAINT,
    store::StoreError,
};
use validator::{Validate, ValidationErrors};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Why a login attempt was rejected
///
/// Both kinds produce the same response; the distinction is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFailure {
    UnknownUsername,
    WrongPassword,
}

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (400)
    BadRequest(String),

    /// Request body failed field validation (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// No credential presented (401)
    Unauthenticated,

    /// Credential presented but not verifiable (400)
    InvalidToken(String),

    /// Username already registered (400)
    DuplicateUsername,

    /// Login rejected (400)
    InvalidCredentials(CredentialFailure),

    /// No task with this ID for the caller (404)
    NotFound,

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "invalid_token")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_)
            | ApiError::ValidationError(_)
            | ApiError::InvalidToken(_)
            | ApiError::DuplicateUsername
            | ApiError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthenticated => write!(f, "Unauthenticated"),
            ApiError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            ApiError::DuplicateUsername => write!(f, "Username exists"),
            ApiError::InvalidCredentials(kind) => write!(f, "Invalid credentials: {:?}", kind),
            ApiError::NotFound => write!(f, "Task not found"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::ValidationError(errors) => (
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthenticated => ("unauthorized", "Access denied".to_string(), None),
            ApiError::InvalidToken(detail) => {
                tracing::debug!(reason = %detail, "Rejected bearer token");
                ("invalid_token", "Invalid token".to_string(), None)
            }
            ApiError::DuplicateUsername => {
                ("duplicate_username", "Username exists".to_string(), None)
            }
            ApiError::InvalidCredentials(kind) => {
                tracing::debug!(?kind, "Login rejected");
                ("invalid_credentials", "Invalid credentials".to_string(), None)
            }
            ApiError::NotFound => ("not_found", "Task not found".to_string(), None),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Runs `validator` on a request body
pub fn validate_request<T: Validate>(request: &T) -> ApiResult<()> {
    request.validate().map_err(ApiError::from)
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) if constraint == USERNAME_CONSTRAINT => {
                ApiError::DuplicateUsername
            }
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthenticated,
            AuthError::InvalidToken(msg) => ApiError::InvalidToken(msg),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Only reached when signing fails; verification errors come through the guard
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::InternalError(format!("Token operation failed: {}", err))
    }
}
