/// Account management system
///
/// Handles registration, password login and profile lookup.

mod manager;
mod password;

pub use manager::AccountManager;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Message returned when a signup body lacks a required field
pub const SIGNUP_REQUIRED_MESSAGE: &str = "Username, password, and email are required";

/// Account creation request
///
/// Required fields are `Option` so a missing key is a validation failure
/// rather than a body-parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Account creation response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub user_id: i64,
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "Username is required"), length(min = 1, message = "Username is required"))]
    pub username: Option<String>,
    #[validate(required(message = "Password is required"), length(min = 1, message = "Password is required"))]
    pub password: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LoginRequest {
    /// Location reported with this login, if any coordinate was sent
    pub fn location(&self) -> Option<(Option<f64>, Option<f64>)> {
        if self.latitude.is_none() && self.longitude.is_none() {
            None
        } else {
            Some((self.latitude, self.longitude))
        }
    }
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
