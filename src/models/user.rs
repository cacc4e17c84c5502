// src/models/user.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A row of the 'users' collection.
///
/// The password hash is part of the persisted document, so this struct is
/// never serialized to clients directly; responses go through `UserResponse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    pub name: String,

    /// Stored lowercased; uniqueness checks are case-insensitive by
    /// lowering the incoming address before comparison.
    pub email: String,

    /// Argon2 password hash.
    pub password: String,

    pub is_teacher: bool,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// User as sent to clients: the persisted document minus the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_teacher: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_teacher: user.is_teacher,
            created_at: user.created_at,
        }
    }
}

/// DTO for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password must not be empty."
    ))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Name must not be empty."))]
    pub name: String,
}

/// DTO for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}
