/// Configuration management for the account service
use crate::error::{AccountError, AccountResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// bcrypt work factor used when none is configured
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub account_db: PathBuf,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing the request
    pub acquire_timeout_secs: u64,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify session tokens
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Read a variable and parse it, falling back to `default` when unset.
///
/// A set-but-unparseable value is an error rather than a silent default.
fn parse_var<T: FromStr>(name: &str, default: T) -> AccountResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AccountError::Validation(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AccountResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("ACCOUNT_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("ACCOUNT_PORT", 3000u16)?;

        let account_db = env::var("ACCOUNT_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/accounts.sqlite"));
        let max_connections = parse_var("ACCOUNT_DB_MAX_CONNECTIONS", 10u32)?;
        let acquire_timeout_secs = parse_var("ACCOUNT_DB_ACQUIRE_TIMEOUT_SECS", 5u64)?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AccountError::Validation("JWT secret required".to_string()))?;
        let token_ttl_secs = parse_var("ACCOUNT_TOKEN_TTL_SECS", 3600i64)?;
        let bcrypt_cost = parse_var("ACCOUNT_BCRYPT_COST", DEFAULT_BCRYPT_COST)?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            storage: StorageConfig {
                account_db,
                max_connections,
                acquire_timeout_secs,
            },
            authentication: AuthConfig {
                jwt_secret,
                token_ttl_secs,
                bcrypt_cost,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> AccountResult<()> {
        if self.service.hostname.is_empty() {
            return Err(AccountError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.authentication.jwt_secret.len() < 32 {
            return Err(AccountError::Validation(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }

        if !(4..=31).contains(&self.authentication.bcrypt_cost) {
            return Err(AccountError::Validation(
                "bcrypt cost must be between 4 and 31".to_string(),
            ));
        }

        if self.authentication.token_ttl_secs <= 0 {
            return Err(AccountError::Validation(
                "Token lifetime must be positive".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(AccountError::Validation(
                "Database pool needs at least one connection".to_string(),
            ));
        }

        Ok(())
    }

    /// Configuration suitable for tests: in-memory store, cheap hashing
    #[cfg(test)]
    pub fn for_tests() -> Self {
        ServerConfig {
            service: ServiceConfig {
                hostname: "127.0.0.1".to_string(),
                port: 0,
            },
            storage: StorageConfig {
                account_db: PathBuf::from(":memory:"),
                max_connections: 1,
                acquire_timeout_secs: 5,
            },
            authentication: AuthConfig {
                jwt_secret: "test-secret-key-for-testing-only".to_string(),
                token_ttl_secs: 3600,
                bcrypt_cost: 4,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}
