// src/models/quiz_result.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A row of the 'quiz_results' collection.
///
/// An append-only log of quiz submissions: every attempt produces a new row,
/// never deduplicated or updated. The pass/fail verdict is frozen at
/// submission time even though the lecture's quiz may change later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub section_index: usize,
    pub lecture_index: usize,
    pub answers: HashMap<String, serde_json::Value>,
    pub score: u32,
    pub total: u32,
    pub passed: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
