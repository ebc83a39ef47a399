/// Password hashing
///
/// bcrypt is CPU-bound by design, so both directions run on the blocking
/// thread pool instead of stalling the async executor.
use crate::error::{AccountError, AccountResult};

/// Hash a password with bcrypt at the given cost
pub async fn hash_password(password: &str, cost: u32) -> AccountResult<String> {
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AccountError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AccountError::Internal(format!("Password hashing failed: {}", e)))
}

/// Compare a plaintext password against a stored bcrypt hash
pub async fn verify_password(password: &str, hash: &str) -> AccountResult<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AccountError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| AccountError::Internal(format!("Password verification failed: {}", e)))
}
