mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::loader::LoadedCourse;

/// Build the read-only API over a loaded course.
pub fn create_router(course: LoadedCourse) -> Router {
    let api = Router::new()
        // Course
        .route("/course", get(handlers::get_course))
        .route("/course/tree", get(handlers::get_course_tree))
        .route("/course/report", get(handlers::get_report))
        // Modules and lessons (by id or slug)
        .route("/modules/{module}", get(handlers::get_module))
        .route("/modules/{module}/lessons/{lesson}", get(handlers::get_lesson))
        .route(
            "/modules/{module}/lessons/{lesson}/content",
            get(handlers::get_lesson_content),
        )
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(course))
}
