// src/handlers/courses.rs

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
    error::AppError,
    handlers::auth::find_user,
    models::{
        course::{Course, CreateCourseRequest, UpdateCourseRequest},
        enrollment::{CourseStudent, Enrollment},
        progress::Progress,
        quiz_result::QuizResult,
    },
    store::{self, Store},
    utils::jwt::Claims,
};

/// Lists the full course collection.
pub async fn list_courses(State(store): State<Store>) -> Result<impl IntoResponse, AppError> {
    let courses: Vec<Course> = store.load(store::COURSES).await?;
    Ok(Json(courses))
}

/// Retrieves a single course by id.
pub async fn get_course(
    State(store): State<Store>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let courses: Vec<Course> = store.load(store::COURSES).await?;

    let course = courses
        .into_iter()
        .find(|c| c.id == course_id)
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    Ok(Json(course))
}

/// Creates a new course owned by the calling teacher.
///
/// The instructor identity is copied from the caller, never taken from the
/// payload; rating, review and enrollment counters start at zero.
pub async fn create_course(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = find_user(&store, &claims.sub)
        .await?
        .filter(|u| u.is_teacher)
        .ok_or(AppError::Forbidden(
            "Only teachers can create courses".to_string(),
        ))?;

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let (title, description, price) = match (
        payload.title.filter(|t| !t.is_empty()),
        payload.description.filter(|d| !d.is_empty()),
        payload.price,
    ) {
        (Some(title), Some(description), Some(price)) => (title, description, price),
        _ => {
            return Err(AppError::BadRequest(
                "Title, description, and price are required".to_string(),
            ));
        }
    };

    let now = Utc::now();
    let course = Course {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        description,
        price,
        original_price: payload.original_price.unwrap_or(price),
        instructor: user.name,
        instructor_id: user.id,
        rating: 0.0,
        review_count: 0,
        image: payload.image.unwrap_or_default(),
        category: payload.category.unwrap_or_else(|| "General".to_string()),
        level: payload.level.unwrap_or_else(|| "beginner".to_string()),
        enrolled_count: 0,
        duration: payload.duration.unwrap_or_else(|| "0h".to_string()),
        sections: payload.sections,
        announcements: Vec::new(),
        reviews: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let mut courses: Vec<Course> = store.load(store::COURSES).await?;
    courses.push(course.clone());
    store.save(store::COURSES, &courses).await?;

    Ok((StatusCode::CREATED, Json(course)))
}

/// Updates a course. Owner only.
///
/// Field-level merge of whatever the client sent; id, instructorId,
/// instructor, createdAt and enrolledCount are never overwritten.
pub async fn update_course(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut courses: Vec<Course> = store.load(store::COURSES).await?;

    let course = courses
        .iter_mut()
        .find(|c| c.id == course_id)
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    if course.instructor_id != claims.sub {
        return Err(AppError::Forbidden(
            "Only the course creator can update this course".to_string(),
        ));
    }

    if let Some(title) = payload.title {
        course.title = title;
    }
    if let Some(description) = payload.description {
        course.description = description;
    }
    if let Some(price) = payload.price {
        course.price = price;
    }
    if let Some(original_price) = payload.original_price {
        course.original_price = original_price;
    }
    if let Some(rating) = payload.rating {
        course.rating = rating;
    }
    if let Some(review_count) = payload.review_count {
        course.review_count = review_count;
    }
    if let Some(image) = payload.image {
        course.image = image;
    }
    if let Some(category) = payload.category {
        course.category = category;
    }
    if let Some(level) = payload.level {
        course.level = level;
    }
    if let Some(duration) = payload.duration {
        course.duration = duration;
    }
    if let Some(sections) = payload.sections {
        course.sections = sections;
    }
    if let Some(announcements) = payload.announcements {
        course.announcements = announcements;
    }
    if let Some(reviews) = payload.reviews {
        course.reviews = reviews;
    }

    course.updated_at = Utc::now();
    let updated = course.clone();

    store.save(store::COURSES, &courses).await?;

    Ok(Json(updated))
}

/// Deletes a course. Owner only.
///
/// Cascades over every collection referencing the course: enrollments,
/// progress rows and quiz results all go with it.
pub async fn delete_course(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut courses: Vec<Course> = store.load(store::COURSES).await?;

    let course = courses
        .iter()
        .find(|c| c.id == course_id)
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    if course.instructor_id != claims.sub {
        return Err(AppError::Forbidden(
            "Only the course creator can delete this course".to_string(),
        ));
    }

    courses.retain(|c| c.id != course_id);
    store.save(store::COURSES, &courses).await?;

    let mut enrollments: Vec<Enrollment> = store.load(store::ENROLLMENTS).await?;
    enrollments.retain(|e| e.course_id != course_id);
    store.save(store::ENROLLMENTS, &enrollments).await?;

    let mut progress: Vec<Progress> = store.load(store::PROGRESS).await?;
    progress.retain(|p| p.course_id != course_id);
    store.save(store::PROGRESS, &progress).await?;

    let mut quiz_results: Vec<QuizResult> = store.load(store::QUIZ_RESULTS).await?;
    quiz_results.retain(|r| r.course_id != course_id);
    store.save(store::QUIZ_RESULTS, &quiz_results).await?;

    Ok(Json(json!({ "message": "Course deleted successfully" })))
}

/// Lists courses owned by the calling instructor.
pub async fn instructor_courses(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let courses: Vec<Course> = store.load(store::COURSES).await?;

    let owned: Vec<Course> = courses
        .into_iter()
        .filter(|c| c.instructor_id == claims.sub)
        .collect();

    Ok(Json(owned))
}

/// Lists the students enrolled in a course. Owner only.
pub async fn course_students(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let courses: Vec<Course> = store.load(store::COURSES).await?;

    let course = courses
        .iter()
        .find(|c| c.id == course_id)
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    if course.instructor_id != claims.sub {
        return Err(AppError::Forbidden(
            "Only the instructor can access student data".to_string(),
        ));
    }

    let enrollments: Vec<Enrollment> = store.load(store::ENROLLMENTS).await?;
    let users: Vec<crate::models::user::User> = store.load(store::USERS).await?;

    let students: Vec<CourseStudent> = enrollments
        .iter()
        .filter(|e| e.course_id == course_id)
        .filter_map(|e| {
            users.iter().find(|u| u.id == e.user_id).map(|u| CourseStudent {
                id: u.id.clone(),
                name: u.name.clone(),
                email: u.email.clone(),
                enrolled_at: e.enrolled_at,
            })
        })
        .collect();

    Ok(Json(students))
}
