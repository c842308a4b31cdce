/// Configuration management for the API server
///
/// Loads configuration from environment variables (and a local `.env` file
/// when present) into a type-safe struct. Startup fails if a required
/// variable is missing or invalid; in particular there is no default token
/// secret.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 3001)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `DATABASE_URL`: PostgreSQL connection string, or `memory:` (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Token signing secret, at least 32 characters (required)
/// - `JWT_EXPIRATION_HOURS`: Token lifetime, at most five years (default: 24)
/// - `PASSWORD_HASH_MEMORY_KIB`, `PASSWORD_HASH_ITERATIONS`,
///   `PASSWORD_HASH_PARALLELISM`: Argon2id work factor (default: 65536 / 3 / 4)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
///
/// # Example
///
/// ```no_run
/// use taskdesk_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::{env, str::FromStr};
use taskdesk_shared::auth::{jwt::DEFAULT_EXPIRATION_HOURS, password::PasswordConfig};

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted `JWT_EXPIRATION_HOURS` (five years)
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365 * 5;

/// Prefix of `DATABASE_URL` selecting the in-process store
pub const MEMORY_DATABASE_URL: &str = "memory:";

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Storage configuration
    pub database: DatabaseConfig,

    /// Token configuration
    pub jwt: JwtConfig,

    /// Password hashing work factor
    pub password: PasswordConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` = any)
    pub cors_origins: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL, or `memory:`
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Whether the in-process store was requested
    pub fn is_memory(&self) -> bool {
        self.url.starts_with(MEMORY_DATABASE_URL)
    }
}

/// Token configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in hours
    pub expiration_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,

    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Unknown LOG_FORMAT: {}", other),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `JWT_SECRET` is missing, the
    /// secret is shorter than [`MIN_SECRET_LENGTH`], or a numeric variable
    /// does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var_or("API_HOST", "0.0.0.0");
        let port = parse_var::<u16>("API_PORT", &var_or("API_PORT", "3001"))?;
        let cors_origins = var_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = parse_var::<u32>(
            "DATABASE_MAX_CONNECTIONS",
            &var_or("DATABASE_MAX_CONNECTIONS", "10"),
        )?;

        let secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if secret.len() < MIN_SECRET_LENGTH {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_SECRET_LENGTH
            );
        }
        let expiration_hours = parse_var::<i64>(
            "JWT_EXPIRATION_HOURS",
            &var_or("JWT_EXPIRATION_HOURS", &DEFAULT_EXPIRATION_HOURS.to_string()),
        )?;
        if !(1..=MAX_EXPIRATION_HOURS).contains(&expiration_hours) {
            anyhow::bail!(
                "JWT_EXPIRATION_HOURS must be between 1 and {}",
                MAX_EXPIRATION_HOURS
            );
        }

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: parse_var(
                "PASSWORD_HASH_MEMORY_KIB",
                &var_or("PASSWORD_HASH_MEMORY_KIB", &defaults.memory_kib.to_string()),
            )?,
            iterations: parse_var(
                "PASSWORD_HASH_ITERATIONS",
                &var_or("PASSWORD_HASH_ITERATIONS", &defaults.iterations.to_string()),
            )?,
            parallelism: parse_var(
                "PASSWORD_HASH_PARALLELISM",
                &var_or("PASSWORD_HASH_PARALLELISM", &defaults.parallelism.to_string()),
            )?,
        };

        let log_format = var_or("LOG_FORMAT", "pretty").parse()?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret,
                expiration_hours,
            },
            password,
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether any origin may call the API
    pub fn cors_is_permissive(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_var<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", key, value, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "memory:"), ("JWT_SECRET", SECRET)]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert!(config.cors_is_permissive());
        assert!(config.database.is_memory());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.password, PasswordConfig::default());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_missing_secret_fails() {
        let err = load(&[("DATABASE_URL", "memory:")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_short_secret_fails() {
        let err = load(&[("DATABASE_URL", "memory:"), ("JWT_SECRET", "short")]).unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_missing_database_url_fails() {
        assert!(load(&[("JWT_SECRET", SECRET)]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/taskdesk"),
            ("JWT_SECRET", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("CORS_ORIGINS", "http://localhost:3000, https://app.example.com"),
            ("JWT_EXPIRATION_HOURS", "2"),
            ("PASSWORD_HASH_ITERATIONS", "5"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert!(!config.database.is_memory());
        assert_eq!(
            config.api.cors_origins,
            vec!["http://localhost:3000", "https://app.example.com"]
        );
        assert!(!config.cors_is_permissive());
        assert_eq!(config.jwt.expiration_hours, 2);
        assert_eq!(config.password.iterations, 5);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_numbers_fail() {
        let base = [("DATABASE_URL", "memory:"), ("JWT_SECRET", SECRET)];

        let mut vars = base.to_vec();
        vars.push(("API_PORT", "not-a-port"));
        assert!(load(&vars).is_err());

        let mut vars = base.to_vec();
        vars.push(("JWT_EXPIRATION_HOURS", "0"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_oversized_expiration_fails() {
        for hours in ["9223372036854775807", "3000000000"] {
            let err = load(&[
                ("DATABASE_URL", "memory:"),
                ("JWT_SECRET", SECRET),
                ("JWT_EXPIRATION_HOURS", hours),
            ])
            .unwrap_err();
            assert!(err.to_string().contains("JWT_EXPIRATION_HOURS"));
        }

        let max = MAX_EXPIRATION_HOURS.to_string();
        let config = load(&[
            ("DATABASE_URL", "memory:"),
            ("JWT_SECRET", SECRET),
            ("JWT_EXPIRATION_HOURS", &max),
        ])
        .unwrap();
        assert_eq!(config.jwt.expiration_hours, MAX_EXPIRATION_HOURS);
    }

    #[test]
    fn test_secret_is_redacted() {
        let config = load(&[("DATABASE_URL", "memory:"), ("JWT_SECRET", SECRET)]).unwrap();
        assert!(!format!("{:?}", config).contains(SECRET));
    }
}
