/// Bearer-token guard for Axum
///
/// Reads `Authorization: Bearer <token>`, verifies the token and inserts an
/// [`AuthContext`] into the request extensions. Handlers behind the guard
/// take `Extension<AuthContext>` and scope every storage call by
/// `auth.account_id`.
///
/// # Outcomes
///
/// | Request | Result |
/// |---|---|
/// | no `Authorization` header, or `Bearer ` with nothing after it | 401 `unauthorized` |
/// | other scheme, bad signature, malformed or expired token | 400 `invalid_token` |
/// | valid token | handler runs with `AuthContext` |
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskdesk_shared::auth::jwt::TokenIssuer;
/// use taskdesk_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     format!("account {}", auth.account_id)
/// }
///
/// let issuer = TokenIssuer::new("your-secret-key-at-least-32-bytes", 24);
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(create_jwt_middleware(issuer)));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{future::Future, pin::Pin};

use super::jwt::TokenIssuer;

/// Identity attached to an authenticated request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated account ID
    pub account_id: i64,
}

/// Error type for the authentication guard
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No credential was presented
    #[error("Missing credentials")]
    MissingCredentials,

    /// A credential was presented but could not be verified
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // The verification detail stays in the logs
        let (code, message) = match &self {
            AuthError::MissingCredentials => ("unauthorized", "Access denied"),
            AuthError::InvalidToken(detail) => {
                tracing::debug!(reason = %detail, "Rejected bearer token");
                ("invalid_token", "Invalid token")
            }
        };

        (
            self.status(),
            Json(json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}

/// Verifies the bearer credential in `headers`
///
/// Pure function behind the middleware.
pub fn authenticate(headers: &HeaderMap, issuer: &TokenIssuer) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Authorization header is not ASCII".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let claims = issuer
        .verify(token)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(AuthContext {
        account_id: claims.sub,
    })
}

/// JWT authentication middleware
///
/// Use through [`create_jwt_middleware`] or `middleware::from_fn_with_state`.
pub async fn jwt_auth_middleware(
    issuer: TokenIssuer,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = authenticate(req.headers(), &issuer)?;

    tracing::debug!(account_id = auth_context.account_id, "Authenticated request");
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Boxed future returned by the middleware closure
pub type AuthFuture = Pin<Box<dyn Future<Output = Result<Response, AuthError>> + Send>>;

/// Creates a middleware closure capturing the token issuer
pub fn create_jwt_middleware(issuer: TokenIssuer) -> impl Fn(Request, Next) -> AuthFuture + Clone {
    move |req, next| {
        let issuer = issuer.clone();
        Box::pin(jwt_auth_middleware(issuer, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, 1)
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
        auth.account_id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn(create_jwt_middleware(issuer())))
    }

    #[test]
    fn test_missing_header() {
        let result = authenticate(&HeaderMap::new(), &issuer());
        assert_eq!(result, Err(AuthError::MissingCredentials));
    }

    #[test]
    fn test_empty_bearer_is_missing() {
        let result = authenticate(&headers_with("Bearer "), &issuer());
        assert_eq!(result, Err(AuthError::MissingCredentials));
    }

    #[test]
    fn test_wrong_scheme_is_invalid() {
        let result = authenticate(&headers_with("Basic YWxpY2U6c2VjcmV0"), &issuer());
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_foreign_signature_is_invalid() {
        let foreign = TokenIssuer::new("some-other-secret-key-of-32-bytes!!", 1)
            .issue(1)
            .unwrap();

        let result = authenticate(&headers_with(&format!("Bearer {}", foreign)), &issuer());
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_valid_token() {
        let token = issuer().issue(42).unwrap();

        let result = authenticate(&headers_with(&format!("Bearer {}", token)), &issuer());
        assert_eq!(result, Ok(AuthContext { account_id: 42 }));
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(AuthError::MissingCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InvalidToken("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_middleware_injects_context() {
        let token = issuer().issue(42).unwrap();

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"42");
    }

    #[tokio::test]
    async fn test_middleware_rejects_without_running_handler() {
        let response = app()
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(header::AUTHORIZATION, "Bearer garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "invalid_token");
        assert_eq!(json["message"], "Invalid token");
    }
}
