// src/handlers/progress.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    config::{CERTIFICATE_THRESHOLD, QUIZ_PASS_RATIO, VIDEO_COMPLETE_PERCENT},
    error::AppError,
    handlers::auth::find_user,
    models::{
        course::{Course, QnaEntry},
        enrollment::Enrollment,
        progress::{
            AskQuestionRequest, ContentLecture, ContentSection, CourseContentResponse, LectureRef,
            Progress, SaveNotesRequest, SubmitQuizRequest, TrackProgressRequest, lecture_key,
        },
        quiz_result::QuizResult,
    },
    store::{self, Store},
    utils::jwt::Claims,
};

/// floor(100 * completed / total). Zero total yields zero rather than a
/// division fault; stale map keys can push completed past total, which is
/// accepted (the course shrank after the student progressed).
fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed * 100) / total) as u32
}

/// Whether a quiz score clears the pass bar. Strict >= on the f64 ratio.
fn quiz_passed(score: u32, total: u32) -> bool {
    total > 0 && f64::from(score) / f64::from(total) >= QUIZ_PASS_RATIO
}

/// Recomputes the stored percentage from the course's sections at call
/// time. The total is never cached, so instructor edits retroactively move
/// every student's percentage on their next qualifying mutation.
fn recompute_percentage(progress: &mut Progress, course: &Course) {
    let total = course.total_lectures();
    if total > 0 {
        progress.completion_percentage = completion_percentage(progress.completed_count(), total);
    }
}

/// Creates the progress row for (user, course) if none exists, with one
/// initial map entry per lecture the course currently has.
pub async fn initialize_progress(
    store: &Store,
    user_id: &str,
    course: &Course,
) -> Result<(), AppError> {
    let mut rows: Vec<Progress> = store.load(store::PROGRESS).await?;

    if rows
        .iter()
        .any(|p| p.user_id == user_id && p.course_id == course.id)
    {
        return Ok(());
    }

    let mut lectures = std::collections::HashMap::new();
    for (s_index, section) in course.sections.iter().enumerate() {
        for (l_index, _) in section.lectures.iter().enumerate() {
            lectures.insert(
                lecture_key(s_index, l_index),
                crate::models::progress::LectureProgress::new(s_index, l_index),
            );
        }
    }

    let now = Utc::now();
    rows.push(Progress {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        course_id: course.id.clone(),
        completion_percentage: 0,
        last_watched_section: 0,
        last_watched_lecture: 0,
        lectures,
        created_at: now,
        updated_at: now,
    });

    store.save(store::PROGRESS, &rows).await
}

async fn load_course(store: &Store, course_id: &str) -> Result<Option<Course>, AppError> {
    let courses: Vec<Course> = store.load(store::COURSES).await?;
    Ok(courses.into_iter().find(|c| c.id == course_id))
}

/// GET /api/courses/{id}/content
///
/// The enrollment gate for course material: 403 without an enrollment row.
/// Merges the course document with the caller's per-lecture completed/notes
/// state, lazily creating the progress row on first access.
pub async fn course_content(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let enrollments: Vec<Enrollment> = store.load(store::ENROLLMENTS).await?;
    if !enrollments
        .iter()
        .any(|e| e.user_id == claims.sub && e.course_id == course_id)
    {
        return Err(AppError::Forbidden(
            "Not enrolled in this course".to_string(),
        ));
    }

    let course = load_course(&store, &course_id)
        .await?
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    let mut rows: Vec<Progress> = store.load(store::PROGRESS).await?;
    let progress = match rows
        .iter()
        .find(|p| p.user_id == claims.sub && p.course_id == course_id)
    {
        Some(progress) => progress.clone(),
        None => {
            initialize_progress(&store, &claims.sub, &course).await?;
            rows = store.load(store::PROGRESS).await?;
            rows.iter()
                .find(|p| p.user_id == claims.sub && p.course_id == course_id)
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("Progress initialization failed".to_string())
                })?
        }
    };

    let sections = course
        .sections
        .iter()
        .enumerate()
        .map(|(s_index, section)| ContentSection {
            id: section.id.clone(),
            title: section.title.clone(),
            lectures: section
                .lectures
                .iter()
                .enumerate()
                .map(|(l_index, lecture)| {
                    let state = progress.lectures.get(&lecture_key(s_index, l_index));
                    ContentLecture {
                        lecture: lecture.clone(),
                        completed: state.map(|s| s.completed).unwrap_or(false),
                        notes: state.map(|s| s.notes.clone()).unwrap_or_default(),
                    }
                })
                .collect(),
        })
        .collect();

    Ok(Json(CourseContentResponse {
        id: course.id,
        title: course.title,
        sections,
        announcements: course.announcements,
        reviews: course.reviews,
        completion_percentage: progress.completion_percentage,
        last_watched_section: progress.last_watched_section,
        last_watched_lecture: progress.last_watched_lecture,
    }))
}

/// GET /api/courses/{id}/progress — the raw progress row.
pub async fn get_progress(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<Progress> = store.load(store::PROGRESS).await?;

    let progress = rows
        .into_iter()
        .find(|p| p.user_id == claims.sub && p.course_id == course_id)
        .ok_or(AppError::NotFound(
            "No progress found for this course".to_string(),
        ))?;

    Ok(Json(progress))
}

/// POST /api/courses/{id}/complete-lecture
///
/// Unconditional and therefore idempotent: marking an already-completed
/// lecture changes nothing but the timestamps.
pub async fn complete_lecture(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
    Json(payload): Json<LectureRef>,
) -> Result<impl IntoResponse, AppError> {
    let mut rows: Vec<Progress> = store.load(store::PROGRESS).await?;

    let progress = rows
        .iter_mut()
        .find(|p| p.user_id == claims.sub && p.course_id == course_id)
        .ok_or(AppError::NotFound(
            "No progress found for this course".to_string(),
        ))?;

    progress
        .lecture_entry(payload.section_index, payload.lecture_index)
        .completed = true;
    progress.last_watched_section = payload.section_index;
    progress.last_watched_lecture = payload.lecture_index;

    if let Some(course) = load_course(&store, &course_id).await? {
        recompute_percentage(progress, &course);
    }
    progress.updated_at = Utc::now();
    let percentage = progress.completion_percentage;

    store.save(store::PROGRESS, &rows).await?;

    Ok(Json(json!({
        "message": "Lecture marked as completed",
        "completionPercentage": percentage,
    })))
}

/// POST /api/courses/{id}/save-notes — overwrites the lecture's notes;
/// completion state is untouched.
pub async fn save_notes(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
    Json(payload): Json<SaveNotesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut rows: Vec<Progress> = store.load(store::PROGRESS).await?;

    let progress = rows
        .iter_mut()
        .find(|p| p.user_id == claims.sub && p.course_id == course_id)
        .ok_or(AppError::NotFound(
            "No progress found for this course".to_string(),
        ))?;

    progress
        .lecture_entry(payload.section_index, payload.lecture_index)
        .notes = payload.notes;
    progress.updated_at = Utc::now();

    store.save(store::PROGRESS, &rows).await?;

    Ok(Json(json!({ "message": "Notes saved successfully" })))
}

/// POST /api/courses/{id}/submit-quiz
///
/// Every submission appends an immutable row to the quiz-results log.
/// The lecture flips to completed only when the score clears the pass bar;
/// a failing retake never un-completes it.
pub async fn submit_quiz(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.answers.is_empty() {
        return Err(AppError::BadRequest(
            "Section index, lecture index, and answers are required".to_string(),
        ));
    }
    if payload.total_questions == 0 {
        return Err(AppError::BadRequest(
            "totalQuestions must be greater than zero".to_string(),
        ));
    }

    let mut rows: Vec<Progress> = store.load(store::PROGRESS).await?;

    let progress = rows
        .iter_mut()
        .find(|p| p.user_id == claims.sub && p.course_id == course_id)
        .ok_or(AppError::NotFound(
            "No progress found for this course".to_string(),
        ))?;

    let entry = progress.lecture_entry(payload.section_index, payload.lecture_index);
    entry.quiz_answers = payload.answers.clone();
    entry.quiz_score = Some(payload.score);
    entry.quiz_total = Some(payload.total_questions);

    let passed = quiz_passed(payload.score, payload.total_questions);
    if passed {
        entry.completed = true;
        if let Some(course) = load_course(&store, &course_id).await? {
            recompute_percentage(progress, &course);
        }
    }
    progress.updated_at = Utc::now();
    let percentage = progress.completion_percentage;

    store.save(store::PROGRESS, &rows).await?;

    let mut results: Vec<QuizResult> = store.load(store::QUIZ_RESULTS).await?;
    results.push(QuizResult {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        course_id: course_id.clone(),
        section_index: payload.section_index,
        lecture_index: payload.lecture_index,
        answers: payload.answers,
        score: payload.score,
        total: payload.total_questions,
        passed,
        submitted_at: Utc::now(),
    });
    store.save(store::QUIZ_RESULTS, &results).await?;

    Ok(Json(json!({
        "message": "Quiz submitted successfully",
        "score": payload.score,
        "totalQuestions": payload.total_questions,
        "passed": passed,
        "completionPercentage": percentage,
    })))
}

/// POST /api/courses/{id}/track-progress
///
/// Records the watch percentage; at 90% the lecture counts as completed.
pub async fn track_video_progress(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
    Json(payload): Json<TrackProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut rows: Vec<Progress> = store.load(store::PROGRESS).await?;

    let progress = rows
        .iter_mut()
        .find(|p| p.user_id == claims.sub && p.course_id == course_id)
        .ok_or(AppError::NotFound(
            "No progress found for this course".to_string(),
        ))?;

    let entry = progress.lecture_entry(payload.section_index, payload.lecture_index);
    entry.video_progress = Some(payload.progress_percent);

    if payload.progress_percent >= VIDEO_COMPLETE_PERCENT {
        entry.completed = true;
        if let Some(course) = load_course(&store, &course_id).await? {
            recompute_percentage(progress, &course);
        }
    }

    progress.last_watched_section = payload.section_index;
    progress.last_watched_lecture = payload.lecture_index;
    progress.updated_at = Utc::now();

    store.save(store::PROGRESS, &rows).await?;

    Ok(Json(json!({ "message": "Progress tracked successfully" })))
}

/// POST /api/courses/{id}/ask-question — appends a Q&A entry to the
/// addressed lecture, pending an instructor answer.
pub async fn ask_question(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
    Json(payload): Json<AskQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut courses: Vec<Course> = store.load(store::COURSES).await?;

    let course = courses
        .iter_mut()
        .find(|c| c.id == course_id)
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    let lecture = course
        .sections
        .get_mut(payload.section_index)
        .and_then(|s| s.lectures.get_mut(payload.lecture_index))
        .ok_or(AppError::BadRequest(
            "Invalid section or lecture index".to_string(),
        ))?;

    let asked_by = find_user(&store, &claims.sub)
        .await?
        .map(|u| u.name)
        .unwrap_or_else(|| "Anonymous".to_string());

    let entry = QnaEntry {
        id: lecture.qna.len() as u32 + 1,
        question: payload.question,
        answer: "Pending instructor response...".to_string(),
        asked_by,
        asked_at: Utc::now(),
    };

    lecture.qna.push(entry.clone());
    store.save(store::COURSES, &courses).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/courses/{id}/certificate
///
/// Nothing is persisted; the URL is derived from the user and course ids.
pub async fn get_certificate(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<Progress> = store.load(store::PROGRESS).await?;

    let progress = rows
        .iter()
        .find(|p| p.user_id == claims.sub && p.course_id == course_id)
        .ok_or(AppError::NotFound(
            "No progress found for this course".to_string(),
        ))?;

    if progress.completion_percentage < CERTIFICATE_THRESHOLD {
        return Err(AppError::BadRequest(
            "Course not completed yet".to_string(),
        ));
    }

    Ok(Json(json!({
        "certificateUrl": format!("/certificates/{}_{}.pdf", claims.sub, course_id),
    })))
}
