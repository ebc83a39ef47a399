/// Application context and dependency injection
use crate::{
    account::AccountManager,
    auth::SessionTokens,
    config::ServerConfig,
    db::{self, AccountStore},
    error::AccountResult,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub account_db: SqlitePool,
    pub account_manager: Arc<AccountManager>,
    pub session_tokens: Arc<SessionTokens>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> AccountResult<Self> {
        // Validate configuration
        config.validate()?;

        // Initialize account database
        let options = db::DatabaseOptions {
            max_connections: config.storage.max_connections,
            acquire_timeout: Duration::from_secs(config.storage.acquire_timeout_secs),
            ..Default::default()
        };
        let account_db = db::create_pool(&config.storage.account_db, options).await?;

        db::run_migrations(&account_db).await?;
        db::test_connection(&account_db).await?;

        Ok(Self::with_pool(config, account_db))
    }

    /// Wire services around an existing, migrated pool
    pub fn with_pool(config: ServerConfig, account_db: SqlitePool) -> Self {
        let config = Arc::new(config);
        let session_tokens = Arc::new(SessionTokens::new(&config.authentication));
        let account_manager = Arc::new(AccountManager::new(
            AccountStore::new(account_db.clone()),
            session_tokens.clone(),
            config.clone(),
        ));

        Self {
            config,
            account_db,
            account_manager,
            session_tokens,
        }
    }

    /// Get listen address
    pub fn listen_addr(&self) -> String {
        format!(
            "{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
