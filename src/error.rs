//! Error types for manifest loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::ValidationReport;

/// Result type for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or serving a course manifest.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed manifest JSON. Always fatal.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Manifest not found: {}", .path.display())]
    ManifestNotFound { path: PathBuf },

    /// The validation policy rejected the manifest.
    #[error("Manifest rejected: {}", .report.summary())]
    Validation { report: ValidationReport },

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Lesson not found: {module}/{lesson}")]
    LessonNotFound { module: String, lesson: String },

    /// The lesson exists in the manifest but its Markdown file can't be served.
    #[error("Content unavailable for {module}/{lesson}: {}", .path.display())]
    ContentUnavailable {
        module: String,
        lesson: String,
        path: PathBuf,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn manifest_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Error::ManifestNotFound { path: path.into() }
    }

    pub fn lesson_not_found(module: impl Into<String>, lesson: impl Into<String>) -> Self {
        Error::LessonNotFound {
            module: module.into(),
            lesson: lesson.into(),
        }
    }

    /// Whether the error means "the thing asked for isn't there" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ModuleNotFound(_)
                | Error::LessonNotFound { .. }
                | Error::ContentUnavailable { .. }
                | Error::ManifestNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_not_found_names_path() {
        let err = Error::manifest_not_found("/courses/js/course.json");
        assert_eq!(err.to_string(), "Manifest not found: /courses/js/course.json");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_lesson_not_found() {
        let err = Error::lesson_not_found("01-beginner", "closures");
        assert_eq!(err.to_string(), "Lesson not found: 01-beginner/closures");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_json_error_is_not_a_lookup_miss() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(json_err);
        assert!(err.to_string().starts_with("JSON error"));
        assert!(!err.is_not_found());
    }
}
