//! Application configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{AppError, AppResult};
use std::env;
use std::fmt;
use std::sync::Arc;
use tienda_domain::ServiceCredentials;

// =============================================================================
// Configuration
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service-account credentials
    pub credentials: Arc<ServiceCredentials>,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// Database configuration.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Storage backend
    pub backend: Backend,
    /// PostgreSQL connection URL
    pub url: Option<String>,
    /// Pool size
    pub max_connections: u32,
}

/// Storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Process-local memory, lost on exit
    Memory,
    /// PostgreSQL JSONB documents
    Postgres,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment (uses the memory backend by default)
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Self::load_environment(&lookup)?;
        let credentials = Self::load_credentials(&lookup)?;
        let database = Self::load_database_config(&lookup, environment, &credentials)?;

        Ok(Self {
            credentials: Arc::new(credentials),
            database,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            credentials: Arc::new(ServiceCredentials::new(
                "tienda-test",
                "svc@tienda-test.local",
                "test-key",
            )),
            database: DatabaseConfig {
                backend: Backend::Memory,
                url: None,
                max_connections: 1,
            },
            environment: Environment::Test,
        }
    }

    fn load_environment(lookup: &impl Fn(&str) -> Option<String>) -> AppResult<Environment> {
        let env_str = lookup("TIENDA_ENV").unwrap_or_else(|| "development".to_string());

        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(AppError::Config(format!(
                "Invalid TIENDA_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_credentials(lookup: &impl Fn(&str) -> Option<String>) -> AppResult<ServiceCredentials> {
        let raw = lookup("TIENDA_CREDENTIALS")
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| AppError::Config("TIENDA_CREDENTIALS is not set".to_string()))?;

        ServiceCredentials::from_json(&raw)
            .map_err(|e| AppError::Config(format!("Invalid TIENDA_CREDENTIALS: {}", e)))
    }

    fn load_database_config(
        lookup: &impl Fn(&str) -> Option<String>,
        environment: Environment,
        credentials: &ServiceCredentials,
    ) -> AppResult<DatabaseConfig> {
        let backend = match lookup("TIENDA_BACKEND") {
            Some(raw) => match raw.to_lowercase().as_str() {
                "memory" => Backend::Memory,
                "postgres" | "postgresql" => Backend::Postgres,
                other => {
                    return Err(AppError::Config(format!(
                        "Invalid TIENDA_BACKEND: {}. Expected: memory, postgres",
                        other
                    )))
                },
            },
            None if environment == Environment::Test => Backend::Memory,
            None => Backend::Postgres,
        };

        let url = lookup("DATABASE_URL").or_else(|| credentials.database_url.clone());

        let max_connections = match lookup("TIENDA_DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::Config(format!("Invalid TIENDA_DB_MAX_CONNECTIONS: {}", raw)))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(DatabaseConfig { backend, url, max_connections })
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => write!(f, "memory"),
            Backend::Postgres => write!(f, "postgres"),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
