/// Account database models and operations
use crate::error::{AccountError, AccountResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Account record in the database
///
/// Carries the password hash, so it is deliberately not `Serialize`.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Public view of an account; has no password field at all
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Values for a new account row
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub email: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone_number: Option<&'a str>,
}

/// Typed access to the `users` table
#[derive(Clone)]
pub struct AccountStore {
    db: SqlitePool,
}

impl AccountStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new account and return its id
    pub async fn insert(&self, account: NewAccount<'_>) -> AccountResult<i64> {
        let result = sqlx::query(
            "INSERT INTO users (username, password, email, first_name, last_name, phone_number, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(account.username)
        .bind(account.password_hash)
        .bind(account.email)
        .bind(account.first_name)
        .bind(account.last_name)
        .bind(account.phone_number)
        .bind(Utc::now())
        .execute(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AccountError::Conflict("Username already exists".to_string())
            }
            other => AccountError::Database(other),
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Get account (including hash) by username
    pub async fn find_by_username(&self, username: &str) -> AccountResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, password, email, first_name, last_name, phone_number,
                    latitude, longitude, created_at
             FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(account)
    }

    /// Get the public profile by id
    pub async fn find_profile(&self, id: i64) -> AccountResult<Option<AccountProfile>> {
        let profile = sqlx::query_as::<_, AccountProfile>(
            "SELECT id, username, email, first_name, last_name, phone_number,
                    latitude, longitude, created_at
             FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(profile)
    }

    /// Overwrite the last-known location. Returns whether a row was touched.
    ///
    /// Last writer wins; concurrent logins are not serialized.
    pub async fn update_location(
        &self,
        id: i64,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> AccountResult<bool> {
        let result = sqlx::query("UPDATE users SET latitude = ?1, longitude = ?2 WHERE id = ?3")
            .bind(latitude)
            .bind(longitude)
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
