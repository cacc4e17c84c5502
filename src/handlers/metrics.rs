// src/handlers/metrics.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::{
    error::AppError,
    handlers::auth::find_user,
    models::{course::Course, enrollment::Enrollment},
    store::{self, Store},
    utils::jwt::Claims,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub total_courses: usize,
    pub total_students: usize,
    pub total_revenue: f64,
    pub enrollment_data: Vec<MonthlyEnrollments>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyEnrollments {
    /// Calendar month, YYYY-MM.
    pub date: String,
    pub count: u64,
}

/// GET /api/metrics — instructor dashboard aggregation. Teachers only.
///
/// All figures are derived from the enrollment ledger on every call;
/// the denormalized per-course `enrolledCount` is deliberately not used
/// here since it can drift.
pub async fn get_metrics(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    find_user(&store, &claims.sub)
        .await?
        .filter(|u| u.is_teacher)
        .ok_or(AppError::Forbidden(
            "Only teachers can access metrics".to_string(),
        ))?;

    let courses: Vec<Course> = store.load(store::COURSES).await?;
    let owned: Vec<&Course> = courses
        .iter()
        .filter(|c| c.instructor_id == claims.sub)
        .collect();
    let owned_ids: HashSet<&str> = owned.iter().map(|c| c.id.as_str()).collect();

    let enrollments: Vec<Enrollment> = store.load(store::ENROLLMENTS).await?;
    let relevant: Vec<&Enrollment> = enrollments
        .iter()
        .filter(|e| owned_ids.contains(e.course_id.as_str()))
        .collect();

    let total_students = relevant
        .iter()
        .map(|e| e.user_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let total_revenue = owned
        .iter()
        .map(|c| {
            let count = relevant.iter().filter(|e| e.course_id == c.id).count();
            c.price * count as f64
        })
        .sum();

    // BTreeMap keys are YYYY-MM strings, so iteration order is already
    // chronological.
    let mut by_month: BTreeMap<String, u64> = BTreeMap::new();
    for enrollment in &relevant {
        let month = enrollment.enrolled_at.format("%Y-%m").to_string();
        *by_month.entry(month).or_insert(0) += 1;
    }

    let enrollment_data = by_month
        .into_iter()
        .map(|(date, count)| MonthlyEnrollments { date, count })
        .collect();

    Ok(Json(MetricsResponse {
        total_courses: owned.len(),
        total_students,
        total_revenue,
        enrollment_data,
    }))
}
