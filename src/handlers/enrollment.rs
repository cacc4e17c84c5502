// src/handlers/enrollment.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    error::AppError,
    handlers::progress::initialize_progress,
    models::{course::Course, enrollment::Enrollment},
    store::{self, Store},
    utils::jwt::Claims,
};

/// Idempotently enrolls a user in a course.
///
/// Returns `false` if an enrollment already existed (nothing written).
/// Otherwise appends the enrollment row, bumps the course's denormalized
/// `enrolledCount` and lazily creates the progress record.
pub async fn ensure_enrollment(
    store: &Store,
    user_id: &str,
    course_id: &str,
) -> Result<bool, AppError> {
    let mut enrollments: Vec<Enrollment> = store.load(store::ENROLLMENTS).await?;

    if enrollments
        .iter()
        .any(|e| e.user_id == user_id && e.course_id == course_id)
    {
        return Ok(false);
    }

    enrollments.push(Enrollment {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        course_id: course_id.to_string(),
        enrolled_at: Utc::now(),
    });
    store.save(store::ENROLLMENTS, &enrollments).await?;

    let mut courses: Vec<Course> = store.load(store::COURSES).await?;
    let course = courses
        .iter_mut()
        .find(|c| c.id == course_id)
        .ok_or(AppError::NotFound("Course not found".to_string()))?;
    course.enrolled_count += 1;
    let course = course.clone();
    store.save(store::COURSES, &courses).await?;

    initialize_progress(store, user_id, &course).await?;

    Ok(true)
}

/// POST /api/courses/{id}/enroll
pub async fn enroll(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let courses: Vec<Course> = store.load(store::COURSES).await?;
    if !courses.iter().any(|c| c.id == course_id) {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    if !ensure_enrollment(&store, &claims.sub, &course_id).await? {
        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "Already enrolled in this course" })),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Successfully enrolled in the course" })),
    ))
}

/// GET /api/courses/purchased — every course the caller is enrolled in.
pub async fn purchased_courses(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let enrollments: Vec<Enrollment> = store.load(store::ENROLLMENTS).await?;
    let enrolled_ids: Vec<&str> = enrollments
        .iter()
        .filter(|e| e.user_id == claims.sub)
        .map(|e| e.course_id.as_str())
        .collect();

    let courses: Vec<Course> = store.load(store::COURSES).await?;
    let purchased: Vec<Course> = courses
        .into_iter()
        .filter(|c| enrolled_ids.contains(&c.id.as_str()))
        .collect();

    Ok(Json(purchased))
}
