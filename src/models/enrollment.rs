// src/models/enrollment.rs

use serde::{Deserialize, Serialize};

/// A row of the 'enrollments' collection: the join record authorizing a
/// user to access a course's content and progress.
///
/// At most one row exists per (userId, courseId) pair, enforced by
/// lookup-before-insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for the instructor-facing student roster of one course.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStudent {
    pub id: String,
    pub name: String,
    pub email: String,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
