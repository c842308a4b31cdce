/// Client error type

use std::fmt;

/// Shown for any failed login
pub const LOGIN_FAILED: &str = "Invalid username or password";

/// Shown for any failed registration
pub const REGISTER_FAILED: &str = "Registration failed";

/// A form field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Error type for client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Form input rejected before anything was sent
    #[error("Invalid input: {}", format_fields(.0))]
    InvalidForm(Vec<FieldError>),

    /// Login or registration refused; carries the message to show
    #[error("{0}")]
    Rejected(&'static str),

    /// Server answered with a non-2xx status
    #[error("Server returned {status}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Request could not be sent or the response could not be read
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Token file could not be read or written
    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// No platform configuration directory to keep the token in
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    /// Operation needs a token and the session has none
    #[error("Not logged in")]
    NotLoggedIn,
}

impl ClientError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
