// src/routes.rs

use axum::{
    Json, Router,
    http::Method,
    middleware,
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, catalog, courses, enrollment, metrics, payment, progress},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// 200 liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, courses, catalog, metrics, payment).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store + config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        // Protected auth routes
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .route("/switch-mode", post(auth::switch_mode))
                .layer(require_auth.clone()),
        );

    // GET on "/" and "/{id}" is public (catalog browsing); the mutating
    // methods on the same paths carry the auth layer per method router.
    let course_routes = Router::new()
        .route(
            "/",
            get(courses::list_courses)
                .merge(post(courses::create_course).layer(require_auth.clone())),
        )
        .route(
            "/{id}",
            get(courses::get_course).merge(
                put(courses::update_course)
                    .delete(courses::delete_course)
                    .layer(require_auth.clone()),
            ),
        )
        .merge(
            Router::new()
                .route("/instructor", get(courses::instructor_courses))
                .route("/purchased", get(enrollment::purchased_courses))
                .route("/{id}/enroll", post(enrollment::enroll))
                .route("/{id}/students", get(courses::course_students))
                .route("/{id}/content", get(progress::course_content))
                .route("/{id}/progress", get(progress::get_progress))
                .route("/{id}/complete-lecture", post(progress::complete_lecture))
                .route("/{id}/save-notes", post(progress::save_notes))
                .route("/{id}/submit-quiz", post(progress::submit_quiz))
                .route("/{id}/track-progress", post(progress::track_video_progress))
                .route("/{id}/ask-question", post(progress::ask_question))
                .route("/{id}/certificate", get(progress::get_certificate))
                .layer(require_auth.clone()),
        );

    // Recommended handles its (optional) token by hand, so the whole
    // catalog stays public.
    let catalog_routes = Router::new()
        .route("/courses", get(catalog::catalog_courses))
        .route("/search", get(catalog::search_courses))
        .route("/featured", get(catalog::featured_courses))
        .route("/recommended", get(catalog::recommended_courses));

    let payment_routes = Router::new()
        .route(
            "/create-checkout-session",
            post(payment::create_checkout_session),
        )
        .layer(require_auth.clone());

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/metrics",
            get(metrics::get_metrics).layer(require_auth),
        )
        .nest("/api/auth", auth_routes)
        .nest("/api/courses", course_routes)
        .nest("/api/catalog", catalog_routes)
        .nest("/api/payment", payment_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
