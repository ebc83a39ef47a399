/// Account manager: registration, credential verification and profile lookup
use crate::{
    account::{password, LoginRequest, SignupRequest, SIGNUP_REQUIRED_MESSAGE},
    auth::SessionTokens,
    config::ServerConfig,
    db::account::{AccountProfile, AccountStore, NewAccount},
    error::{AccountError, AccountResult},
};
use std::sync::Arc;
use validator::Validate;

/// Account manager service
pub struct AccountManager {
    store: AccountStore,
    tokens: Arc<SessionTokens>,
    config: Arc<ServerConfig>,
}

impl AccountManager {
    /// Create a new account manager
    pub fn new(store: AccountStore, tokens: Arc<SessionTokens>, config: Arc<ServerConfig>) -> Self {
        Self {
            store,
            tokens,
            config,
        }
    }

    /// Create a new account and return its id
    ///
    /// No token is issued; the caller logs in separately.
    pub async fn register(&self, req: SignupRequest) -> AccountResult<i64> {
        req.validate()
            .map_err(|_| AccountError::Validation(SIGNUP_REQUIRED_MESSAGE.to_string()))?;

        let (Some(username), Some(password), Some(email)) = (
            req.username.as_deref(),
            req.password.as_deref(),
            req.email.as_deref(),
        ) else {
            return Err(AccountError::Validation(SIGNUP_REQUIRED_MESSAGE.to_string()));
        };

        let password_hash =
            password::hash_password(password, self.config.authentication.bcrypt_cost).await?;

        let id = self
            .store
            .insert(NewAccount {
                username,
                password_hash: &password_hash,
                email,
                first_name: req.first_name.as_deref(),
                last_name: req.last_name.as_deref(),
                phone_number: req.phone_number.as_deref(),
            })
            .await?;

        tracing::info!("Account created: id={} username={}", id, username);

        Ok(id)
    }

    /// Verify credentials, record the reported location and issue a token
    pub async fn authenticate(&self, req: LoginRequest) -> AccountResult<String> {
        req.validate()?;

        let (Some(username), Some(password)) = (req.username.as_deref(), req.password.as_deref())
        else {
            return Err(AccountError::Validation(
                "Username and password are required".to_string(),
            ));
        };

        let account = self.store.find_by_username(username).await?.ok_or_else(|| {
            tracing::debug!("Login for unknown username");
            AccountError::NotFound("User not found".to_string())
        })?;

        if !password::verify_password(password, &account.password_hash).await? {
            return Err(AccountError::InvalidCredentials);
        }

        // Best effort: a failed location write must not fail the login
        if let Some((latitude, longitude)) = req.location() {
            match self
                .store
                .update_location(account.id, latitude, longitude)
                .await
            {
                Ok(true) => {}
                Ok(false) => tracing::warn!(
                    "Location update for account {} matched no row",
                    account.id
                ),
                Err(e) => tracing::warn!(
                    "Failed to update location for account {}: {}",
                    account.id,
                    e
                ),
            }
        }

        let token = self.tokens.issue(account.id)?;
        tracing::info!("Account {} logged in", account.id);

        Ok(token)
    }

    /// Get the public profile of an account
    pub async fn get_profile(&self, id: i64) -> AccountResult<AccountProfile> {
        self.store
            .find_profile(id)
            .await?
            .ok_or_else(|| AccountError::NotFound("User not found".to_string()))
    }
}
