// src/handlers/payment.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::AppError,
    handlers::enrollment::ensure_enrollment,
    models::course::Course,
    store::{self, Store},
    utils::jwt::Claims,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub course_id: Option<String>,
}

/// Mock checkout: no payment provider is wired up, so a "session" always
/// succeeds and immediately performs the (idempotent) enrollment.
pub async fn create_checkout_session(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let course_id = payload
        .course_id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::BadRequest("Course ID is required".to_string()))?;

    let courses: Vec<Course> = store.load(store::COURSES).await?;
    if !courses.iter().any(|c| c.id == course_id) {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    if !ensure_enrollment(&store, &claims.sub, &course_id).await? {
        return Ok(Json(json!({ "message": "Already enrolled in this course" })));
    }

    Ok(Json(json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "success": true,
        "message": "Payment successful",
    })))
}
