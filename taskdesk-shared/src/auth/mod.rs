/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 token issuance and validation
/// - [`middleware`]: Bearer-token guard for Axum routes
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskdesk_shared::auth::password::{PasswordConfig, PasswordHasher};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = PasswordHasher::new(PasswordConfig::default());
/// let hash = hasher.hash("secret1")?;
/// assert!(hasher.verify("secret1", &hash)?);
///
/// let secret = "a-secret-key-that-is-at-least-32-bytes";
/// let token = create_token(&Claims::new(1), secret)?;
/// assert_eq!(validate_token(&token, secret)?.sub, 1);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
