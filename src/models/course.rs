// src/models/course.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A row of the 'courses' collection.
///
/// `instructor` (display name) and `enrolledCount` are denormalized:
/// the name is copied from the owner at creation time and the counter is
/// incremented on enrollment, never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub original_price: f64,
    pub instructor: String,
    pub instructor_id: String,
    pub rating: f64,
    pub review_count: u32,
    pub image: String,
    pub category: String,
    pub level: String,
    pub enrolled_count: u64,
    pub duration: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    /// Total lecture count across all sections, counted at call time.
    /// Progress percentages divide by this, so editing course content
    /// retroactively shifts every student's percentage on their next update.
    pub fn total_lectures(&self) -> usize {
        self.sections.iter().map(|s| s.lectures.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub qna: Vec<QnaEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// A student question attached to a lecture, answered later by the instructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnaEntry {
    pub id: u32,
    pub question: String,
    pub answer: String,
    pub asked_by: String,
    pub asked_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u32,
    pub user: String,
    pub rating: u32,
    pub comment: String,
    pub date: String,
}

/// DTO for creating a course. Title, description and price are mandatory;
/// the rest falls back to the catalog defaults.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    #[validate(length(max = 500))]
    pub image: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// DTO for updating a course. Every field is optional; identity and audit
/// fields (id, instructorId, instructor, createdAt, enrolledCount) are not
/// client-writable and therefore absent here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub duration: Option<String>,
    pub sections: Option<Vec<Section>>,
    pub announcements: Option<Vec<Announcement>>,
    pub reviews: Option<Vec<Review>>,
}
