/// Password hashing module using Argon2id
///
/// Hashes are stored as PHC strings, which embed the algorithm, parameters
/// and salt. Verification reads the parameters back from the stored hash, so
/// changing [`PasswordConfig`] only affects newly hashed passwords.
///
/// # Work factor
///
/// | Parameter | Default |
/// |---|---|
/// | memory | 64 MiB (65536 KiB) |
/// | iterations | 3 |
/// | parallelism | 4 lanes |
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::password::{PasswordConfig, PasswordHasher};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = PasswordHasher::new(PasswordConfig::default());
/// let hash = hasher.hash("super_secret_password_123")?;
///
/// assert!(hasher.verify("super_secret_password_123", &hash)?);
/// assert!(!hasher.verify("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2, Params, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Work factor parameters were rejected
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl PasswordConfig {
    fn params(&self) -> Result<Params, PasswordError> {
        ParamsBuilder::new()
            .m_cost(self.memory_kib)
            .t_cost(self.iterations)
            .p_cost(self.parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))
    }
}

/// Hashes and verifies passwords with a fixed work factor
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    config: PasswordConfig,
}

impl PasswordHasher {
    /// Creates a hasher for the given work factor
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    /// Checks the configured parameters without hashing anything
    pub fn validate_config(&self) -> Result<(), PasswordError> {
        self.config.params().map(|_| ())
    }

    /// Hashes a password with a fresh random salt
    ///
    /// Returns a PHC string such as
    /// `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            Version::V0x13,
            self.config.params()?,
        );

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored hash
    ///
    /// Returns `Ok(false)` for a wrong password and an error only when the
    /// stored hash itself is unusable.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        // Parameters come from the hash itself
        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!(
                "Verification failed: {}",
                e
            ))),
        }
    }

    /// Verifies against `hash` if there is one
    ///
    /// With no stored hash the password is hashed and discarded, so a
    /// missing account costs about as much as a wrong password, and the
    /// result is always `Ok(false)`.
    pub fn verify_or_burn(&self, password: &str, hash: Option<&str>) -> Result<bool, PasswordError> {
        match hash {
            Some(hash) => self.verify(password, hash),
            None => {
                self.hash(password)?;
                Ok(false)
            }
        }
    }
}
