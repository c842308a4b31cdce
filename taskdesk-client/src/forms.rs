/// Login and registration forms
///
/// Both forms are validated locally before anything is sent, so obviously
/// bad input never reaches the server.

use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{ClientError, FieldError};

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterForm {
    #[validate(custom(function = "username_present"))]
    pub username: String,

    #[validate(custom(function = "password_rules"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "username_present"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

impl RegisterForm {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Validates a form, collecting every failing field
pub fn check<T: Validate>(form: &T) -> Result<(), ClientError> {
    form.validate()
        .map_err(|errors| ClientError::InvalidForm(field_errors(&errors)))
}

fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field)),
            })
        })
        .collect();

    // Keep the on-screen order of the form
    fields.sort_by_key(|f| match f.field.as_str() {
        "username" => 0,
        "password" => 1,
        _ => 2,
    });
    fields
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn username_present(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(failure("required", "Username is required."));
    }
    Ok(())
}

fn password_rules(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(failure("required", "Password is required."));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(failure(
            "too_short",
            "Password must be at least 6 characters.",
        ));
    }
    Ok(())
}
