/// Session token issuance and verification
use crate::{
    config::AuthConfig,
    error::{AccountError, AccountResult},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier
    pub id: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Identity resolved from a verified token, attached to the request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub id: i64,
}

/// Signs and verifies stateless HS256 session tokens
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl SessionTokens {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_secs: config.token_ttl_secs,
        }
    }

    /// Issue a token for an account, expiring `ttl_secs` from now
    pub fn issue(&self, account_id: i64) -> AccountResult<String> {
        let now = Utc::now().timestamp();
        self.sign(&Claims {
            id: account_id,
            iat: now,
            exp: now + self.ttl_secs,
        })
    }

    fn sign(&self, claims: &Claims) -> AccountResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AccountError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verify signature and expiry, returning the embedded account
    pub fn verify(&self, token: &str) -> AccountResult<AuthenticatedAccount> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AccountError::Unauthenticated("Token has expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AccountError::Unauthenticated("Invalid token signature".to_string())
                }
                _ => AccountError::Unauthenticated("Invalid token".to_string()),
            }
        })?;

        Ok(AuthenticatedAccount {
            id: data.claims.id,
        })
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}
