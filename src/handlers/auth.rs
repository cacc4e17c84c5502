// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User, UserResponse},
    state::AppState,
    store::{self, Store},
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

/// Loads one user row by id. Shared by every handler that needs the
/// caller's full record (teacher flag, display name).
pub async fn find_user(store: &Store, user_id: &str) -> Result<Option<User>, AppError> {
    let users: Vec<User> = store.load(store::USERS).await?;
    Ok(users.into_iter().find(|u| u.id == user_id))
}

/// Registers a new user.
///
/// Emails are lowercased before the duplicate check, so registration is
/// case-insensitively unique. The password is hashed with Argon2 before
/// storing. Returns 201 Created with the user (hash stripped) and a token.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let email = payload.email.to_lowercase();

    let mut users: Vec<User> = state.store.load(store::USERS).await?;

    if users.iter().any(|u| u.email == email) {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: payload.name,
        email,
        password: hash_password(&payload.password)?,
        is_teacher: false,
        created_at: Utc::now(),
    };

    let response = UserResponse::from(&user);
    let token = sign_jwt(&user.id, &state.config.jwt_secret, state.config.jwt_expiration)?;

    users.push(user);
    state.store.save(store::USERS, &users).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": response, "token": token })),
    ))
}

/// Authenticates a user and returns a JWT token.
///
/// A deliberately uniform error message covers both unknown email and
/// wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let email = payload.email.to_lowercase();

    let users: Vec<User> = state.store.load(store::USERS).await?;
    let user = users
        .iter()
        .find(|u| u.email == email)
        .ok_or(AppError::AuthError("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let token = sign_jwt(&user.id, &state.config.jwt_secret, state.config.jwt_expiration)?;

    Ok(Json(json!({
        "user": UserResponse::from(user),
        "token": token,
    })))
}

/// Tokens are stateless JWTs, so logout is a client-side discard; the
/// endpoint exists for API compatibility.
pub async fn logout() -> impl IntoResponse {
    Json(json!({ "message": "Logged out successfully" }))
}

/// Returns the current user, resolved from the token's subject.
pub async fn me(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = find_user(&store, &claims.sub)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Toggles the caller's teacher flag. A toggle, not a set: calling twice
/// returns to the original mode.
pub async fn switch_mode(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let mut users: Vec<User> = store.load(store::USERS).await?;

    let user = users
        .iter_mut()
        .find(|u| u.id == claims.sub)
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    user.is_teacher = !user.is_teacher;
    let response = UserResponse::from(&*user);

    store.save(store::USERS, &users).await?;

    Ok(Json(response))
}
