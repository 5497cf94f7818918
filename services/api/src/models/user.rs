//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub disabled: bool,
    pub is_logged_in: bool,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub security_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Drop every stored token and mark the user logged out.
    pub fn end_session(&mut self) {
        self.is_logged_in = false;
        self.access_token = None;
        self.refresh_token = None;
        self.security_token = None;
    }
}

/// New user row, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub disabled: bool,
}

/// Request for user registration
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Form body shared by login and activate
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    /// The user's email address
    pub username: String,
    pub password: String,
}

/// Request for a password change
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Request for a display name change
#[derive(Debug, Deserialize)]
pub struct ChangeDisplayNameRequest {
    pub display_name: String,
}

/// Request for a security token
#[derive(Debug, Deserialize)]
pub struct SecurityTokenRequest {
    pub password: String,
}

/// Response for user operations
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub disabled: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            disabled: user.disabled,
        }
    }
}

/// Response carrying a fresh access/refresh pair
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Response carrying a security token
#[derive(Debug, Serialize, Deserialize)]
pub struct SecurityTokenResponse {
    pub security_token: String,
    pub token_type: String,
}
