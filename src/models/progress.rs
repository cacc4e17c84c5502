// src/models/progress.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::models::course::{Announcement, Lecture, Review};

/// Builds the map key addressing a single lecture within a course's nested
/// section/lecture arrays.
pub fn lecture_key(section_index: usize, lecture_index: usize) -> String {
    format!("{}_{}", section_index, lecture_index)
}

/// A row of the 'progress' collection: one per (userId, courseId), created
/// lazily on first enrollment or first content access.
///
/// The lecture-key map is the single canonical representation of per-lecture
/// state; there is no parallel completed-lecture list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    /// Integer 0-100, floor of 100 * completed / total lectures.
    pub completion_percentage: u32,
    pub last_watched_section: usize,
    pub last_watched_lecture: usize,
    #[serde(default)]
    pub lectures: HashMap<String, LectureProgress>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Progress {
    /// Returns the per-lecture state for the key, inserting the initial
    /// state if the lecture was never touched.
    pub fn lecture_entry(
        &mut self,
        section_index: usize,
        lecture_index: usize,
    ) -> &mut LectureProgress {
        self.lectures
            .entry(lecture_key(section_index, lecture_index))
            .or_insert_with(|| LectureProgress::new(section_index, lecture_index))
    }

    pub fn completed_count(&self) -> usize {
        self.lectures.values().filter(|l| l.completed).count()
    }
}

/// Per-lecture state. Fields only ever move toward completion; nothing
/// here is reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureProgress {
    pub section_index: usize,
    pub lecture_index: usize,
    pub completed: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub quiz_answers: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_progress: Option<u32>,
}

impl LectureProgress {
    pub fn new(section_index: usize, lecture_index: usize) -> Self {
        Self {
            section_index,
            lecture_index,
            completed: false,
            notes: String::new(),
            quiz_answers: HashMap::new(),
            quiz_score: None,
            quiz_total: None,
            video_progress: None,
        }
    }
}

/// DTO addressing one lecture (complete-lecture uses it as-is).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureRef {
    pub section_index: usize,
    pub lecture_index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNotesRequest {
    pub section_index: usize,
    pub lecture_index: usize,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub section_index: usize,
    pub lecture_index: usize,
    pub answers: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub total_questions: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackProgressRequest {
    pub section_index: usize,
    pub lecture_index: usize,
    #[serde(default)]
    pub progress_percent: u32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AskQuestionRequest {
    pub section_index: usize,
    pub lecture_index: usize,
    #[validate(length(min = 1, max = 2000, message = "Question must not be empty."))]
    pub question: String,
}

/// Read view merging the static course document with the caller's
/// per-lecture completion state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContentResponse {
    pub id: String,
    pub title: String,
    pub sections: Vec<ContentSection>,
    pub announcements: Vec<Announcement>,
    pub reviews: Vec<Review>,
    pub completion_percentage: u32,
    pub last_watched_section: usize,
    pub last_watched_lecture: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    pub id: String,
    pub title: String,
    pub lectures: Vec<ContentLecture>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentLecture {
    #[serde(flatten)]
    pub lecture: Lecture,
    pub completed: bool,
    pub notes: String,
}
