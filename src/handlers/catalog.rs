// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::AppError,
    models::{course::Course, enrollment::Enrollment},
    store::{self, Store},
    utils::jwt::claims_from_headers,
};

const FEATURED_COUNT: usize = 4;
const RECOMMENDED_COUNT: usize = 4;

/// Query parameters for paginated catalog endpoints.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub q: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Pagination envelope shared by the catalog list and search endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePage {
    pub courses: Vec<Course>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Slices a course list into a 1-indexed page. Page and limit are clamped
/// to at least 1; a page past the end comes back empty.
fn paginate(courses: Vec<Course>, page: usize, limit: usize) -> CoursePage {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = courses.len();
    let total_pages = total.div_ceil(limit);

    let start = (page - 1) * limit;
    let paged = courses
        .into_iter()
        .skip(start)
        .take(limit)
        .collect();

    CoursePage {
        courses: paged,
        total,
        page,
        total_pages,
    }
}

/// Case-insensitive substring match against title, description, category
/// or instructor name.
fn matches_query(course: &Course, query: &str) -> bool {
    course.title.to_lowercase().contains(query)
        || course.description.to_lowercase().contains(query)
        || course.category.to_lowercase().contains(query)
        || course.instructor.to_lowercase().contains(query)
}

/// GET /api/catalog/courses?page=&limit=
pub async fn catalog_courses(
    State(store): State<Store>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let courses: Vec<Course> = store.load(store::COURSES).await?;

    Ok(Json(paginate(
        courses,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(10),
    )))
}

/// GET /api/catalog/search?q=&page=&limit=
pub async fn search_courses(
    State(store): State<Store>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.q.unwrap_or_default().to_lowercase();

    let courses: Vec<Course> = store.load(store::COURSES).await?;
    let filtered: Vec<Course> = courses
        .into_iter()
        .filter(|c| matches_query(c, &query))
        .collect();

    Ok(Json(paginate(
        filtered,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(10),
    )))
}

/// GET /api/catalog/featured — top 4 by rating, stable sort so catalog
/// order breaks ties.
pub async fn featured_courses(
    State(store): State<Store>,
) -> Result<impl IntoResponse, AppError> {
    let mut courses: Vec<Course> = store.load(store::COURSES).await?;

    courses.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
    courses.truncate(FEATURED_COUNT);

    Ok(Json(courses))
}

/// GET /api/catalog/recommended
///
/// Authentication is optional here: a valid bearer token excludes the
/// caller's enrolled courses, anyone else sees the full catalog. Ranked by
/// enrollment count.
pub async fn recommended_courses(
    State(store): State<Store>,
    State(config): State<Config>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let mut courses: Vec<Course> = store.load(store::COURSES).await?;

    if let Some(claims) = claims_from_headers(&headers, &config.jwt_secret) {
        let enrollments: Vec<Enrollment> = store.load(store::ENROLLMENTS).await?;
        let enrolled_ids: Vec<String> = enrollments
            .into_iter()
            .filter(|e| e.user_id == claims.sub)
            .map(|e| e.course_id)
            .collect();

        courses.retain(|c| !enrolled_ids.contains(&c.id));
    }

    courses.sort_by(|a, b| b.enrolled_count.cmp(&a.enrolled_count));
    courses.truncate(RECOMMENDED_COUNT);

    Ok(Json(courses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn course(title: &str) -> Course {
        let now = Utc::now();
        Course {
            id: title.to_string(),
            title: title.to_string(),
            description: String::new(),
            price: 0.0,
            original_price: 0.0,
            instructor: "Instructor".to_string(),
            instructor_id: "i".to_string(),
            rating: 0.0,
            review_count: 0,
            image: String::new(),
            category: "General".to_string(),
            level: "beginner".to_string(),
            enrolled_count: 0,
            duration: "0h".to_string(),
            sections: Vec::new(),
            announcements: Vec::new(),
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_paginate_last_partial_page() {
        // 25 courses at limit 10: page 3 holds the trailing 5.
        let courses: Vec<Course> = (0..25).map(|i| course(&format!("c{}", i))).collect();
        let page = paginate(courses, 3, 10);
        assert_eq!(page.courses.len(), 5);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_paginate_clamps_page_zero() {
        let courses: Vec<Course> = (0..5).map(|i| course(&format!("c{}", i))).collect();
        let page = paginate(courses, 0, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.courses.len(), 5);
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let courses: Vec<Course> = (0..5).map(|i| course(&format!("c{}", i))).collect();
        let page = paginate(courses, 4, 10);
        assert!(page.courses.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_matches_query_all_fields() {
        let mut c = course("Python Mastery");
        assert!(matches_query(&c, "python"));

        c.title = "Web Dev".to_string();
        c.description = "Learn Python from scratch".to_string();
        assert!(matches_query(&c, "python"));

        c.description = String::new();
        c.category = "Python".to_string();
        assert!(matches_query(&c, "python"));

        c.category = "General".to_string();
        c.instructor = "Monty Python".to_string();
        assert!(matches_query(&c, "python"));

        c.instructor = "Someone".to_string();
        assert!(!matches_query(&c, "python"));
    }
}
