/// HTTP client for the TaskDesk API
///
/// [`ApiClient`] can only be built from a [`Session`]. Before each request
/// it reads the session's token and, if there is one, sends it as
/// `Authorization: Bearer <token>`.
///
/// # Example
///
/// ```no_run
/// use taskdesk_client::{api::ApiClient, forms::LoginForm, session::{Session, TokenStorage}};
///
/// # async fn example() -> Result<(), taskdesk_client::error::ClientError> {
/// let session = Session::restore(TokenStorage::default_location()?)?;
/// let client = ApiClient::new("http://localhost:3001", session)?;
///
/// client.login(&LoginForm::new("alice", "secret1")).await?;
/// for task in client.list_tasks().await? {
///     println!("{} {}", task.id, task.title);
/// }
/// # Ok(())
/// # }
/// ```

use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::{
    error::{ClientError, LOGIN_FAILED, REGISTER_FAILED},
    forms::{self, LoginForm, RegisterForm},
    session::Session,
};

/// API base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A task as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_complete: bool,
    pub owner_id: i64,
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PUT /tasks/:id`; unset fields are left alone by the server
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// `Some(None)` clears the description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,

    #[serde(default)]
    message: String,
}

/// TaskDesk API client bound to a session
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Creates a client with the default timeout
    pub fn new(base_url: impl Into<String>, session: Session) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, session, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        session: Session,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an account
    ///
    /// Does not log in; call [`ApiClient::login`] afterwards. Any server
    /// refusal is reported as [`REGISTER_FAILED`].
    pub async fn register(&self, form: &RegisterForm) -> Result<(), ClientError> {
        forms::check(form)?;

        let request = self.request(Method::POST, "/auth/register").json(&Credentials {
            username: &form.username,
            password: &form.password,
        });

        match Self::send_json::<TokenResponse>(request).await {
            Ok(_) => {
                tracing::info!(username = %form.username, "Registered");
                Ok(())
            }
            Err(e) => Err(Self::generic_refusal(e, REGISTER_FAILED)),
        }
    }

    /// Logs in and stores the token in the session
    ///
    /// Any server refusal is reported as [`LOGIN_FAILED`].
    pub async fn login(&self, form: &LoginForm) -> Result<(), ClientError> {
        forms::check(form)?;

        let request = self.request(Method::POST, "/auth/login").json(&Credentials {
            username: &form.username,
            password: &form.password,
        });

        let response = Self::send_json::<TokenResponse>(request)
            .await
            .map_err(|e| Self::generic_refusal(e, LOGIN_FAILED))?;

        self.session.login(response.token)?;
        tracing::info!(username = %form.username, "Logged in");
        Ok(())
    }

    /// Forgets the session token
    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.logout()
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        Self::send_json(self.authed(Method::GET, "/tasks")?).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        Self::send_json(self.authed(Method::POST, "/tasks")?.json(task)).await
    }

    pub async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task, ClientError> {
        Self::send_json(
            self.authed(Method::PUT, &format!("/tasks/{}", id))?
                .json(patch),
        )
        .await
    }

    /// Flips `is_complete`, sending the whole task back
    pub async fn toggle_complete(&self, task: &Task) -> Result<Task, ClientError> {
        let toggled = Task {
            is_complete: !task.is_complete,
            ..task.clone()
        };

        Self::send_json(
            self.authed(Method::PUT, &format!("/tasks/{}", task.id))?
                .json(&toggled),
        )
        .await
    }

    /// Deletes a task, returning the server's confirmation message
    pub async fn delete_task(&self, id: i64) -> Result<String, ClientError> {
        let response: MessageResponse =
            Self::send_json(self.authed(Method::DELETE, &format!("/tasks/{}", id))?).await?;
        Ok(response.message)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        if !self.session.is_authenticated() {
            return Err(ClientError::NotLoggedIn);
        }
        Ok(self.request(method, path))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), code = %body.error, "Request failed");

        Err(ClientError::Api {
            status: status.as_u16(),
            code: body.error,
            message: body.message,
        })
    }

    fn generic_refusal(err: ClientError, message: &'static str) -> ClientError {
        match err {
            ClientError::Api { .. } => {
                tracing::debug!(error = %err, "Server refused credentials");
                ClientError::Rejected(message)
            }
            other => other,
        }
    }
}
