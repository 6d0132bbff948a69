use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::error::Error;
use crate::loader::LoadedCourse;
use crate::models::*;

type AppState = State<Arc<LoadedCourse>>;

// ============================================================
// Error Handling
// ============================================================

/// Map a library error onto a response.
///
/// Lookup misses become 404 with the error text. Anything else is logged
/// server-side and the client only sees a generic message.
fn api_error(e: Error) -> (StatusCode, String) {
    if e.is_not_found() {
        tracing::debug!("Not found: {}", e);
        return (StatusCode::NOT_FOUND, e.to_string());
    }

    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn module_not_found(key: &str) -> (StatusCode, String) {
    api_error(Error::ModuleNotFound(key.to_string()))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Course
// ============================================================

pub async fn get_course(State(course): AppState) -> Json<CourseSummary> {
    Json(course.summary())
}

pub async fn get_course_tree(State(course): AppState) -> Json<CourseTree> {
    Json(course.tree())
}

pub async fn get_report(State(course): AppState) -> Json<ValidationReport> {
    Json(course.report.clone())
}

// ============================================================
// Modules and Lessons
// ============================================================

pub async fn get_module(
    State(course): AppState,
    Path(module_key): Path<String>,
) -> Result<Json<ModuleNode>, (StatusCode, String)> {
    course
        .module_node(&module_key)
        .map(Json)
        .ok_or_else(|| module_not_found(&module_key))
}

pub async fn get_lesson(
    State(course): AppState,
    Path((module_key, lesson_key)): Path<(String, String)>,
) -> Result<Json<LessonNode>, (StatusCode, String)> {
    course
        .lesson_node(&module_key, &lesson_key)
        .map(Json)
        .map_err(api_error)
}

/// Serve the lesson's Markdown as opaque text for the external renderer.
pub async fn get_lesson_content(
    State(course): AppState,
    Path((module_key, lesson_key)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let text = course
        .read_lesson(&module_key, &lesson_key)
        .map_err(api_error)?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        text,
    ))
}
