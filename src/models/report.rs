use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How serious a validation issue is.
///
/// - `Error`: structural violation; rejects the load under the strict policy
/// - `Warning`: advisory; the course still indexes but something won't render
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A single problem found in a manifest or its lesson files.
///
/// Modules and lessons are named by their `id`.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    #[error("{count} modules share id {id:?}")]
    DuplicateModuleId { id: String, count: usize },

    #[error("{count} lessons in module {module} share id {id:?}")]
    DuplicateLessonId {
        module: String,
        id: String,
        count: usize,
    },

    #[error("modules {modules:?} share order {order}")]
    DuplicateModuleOrder { order: u32, modules: Vec<String> },

    #[error("lessons {lessons:?} in module {module} share order {order}")]
    DuplicateLessonOrder {
        module: String,
        order: u32,
        lessons: Vec<String>,
    },

    #[error("modules {modules:?} share slug {slug:?}")]
    DuplicateModuleSlug { slug: String, modules: Vec<String> },

    #[error("lessons {lessons:?} in module {module} share slug {slug:?}")]
    DuplicateLessonSlug {
        module: String,
        slug: String,
        lessons: Vec<String>,
    },

    #[error("module {module} has no lessons")]
    EmptyModule { module: String },

    #[error("module {module} (order {order}) is listed after order {previous}")]
    ModuleOutOfSequence {
        module: String,
        order: u32,
        previous: u32,
    },

    #[error("lesson {module}/{lesson} (order {order}) is listed after order {previous}")]
    LessonOutOfSequence {
        module: String,
        lesson: String,
        order: u32,
        previous: u32,
    },

    #[error("lesson {module}/{lesson}: content file {} does not exist", .path.display())]
    MissingContent {
        module: String,
        lesson: String,
        path: PathBuf,
    },

    #[error("lesson {module}/{lesson}: content file {} is empty", .path.display())]
    EmptyContent {
        module: String,
        lesson: String,
        path: PathBuf,
    },

    #[error("lesson {module}/{lesson}: content file {} is unreadable: {reason}", .path.display())]
    UnreadableContent {
        module: String,
        lesson: String,
        path: PathBuf,
        reason: String,
    },

    #[error("lesson {module}/{lesson}: content path {content:?} escapes the course directory")]
    ContentOutsideBase {
        module: String,
        lesson: String,
        content: String,
    },

    #[error("lesson {module}/{lesson}: content path {content:?} does not name a file")]
    InvalidContentPath {
        module: String,
        lesson: String,
        content: String,
    },

    #[error("lesson {module}/{lesson}: content path {content:?} is not a Markdown file")]
    NotMarkdown {
        module: String,
        lesson: String,
        content: String,
    },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateModuleId { .. }
            | Self::DuplicateLessonId { .. }
            | Self::DuplicateModuleOrder { .. }
            | Self::DuplicateLessonOrder { .. }
            | Self::DuplicateModuleSlug { .. }
            | Self::DuplicateLessonSlug { .. }
            | Self::EmptyModule { .. }
            | Self::InvalidContentPath { .. }
            | Self::ContentOutsideBase { .. } => Severity::Error,
            Self::ModuleOutOfSequence { .. }
            | Self::LessonOutOfSequence { .. }
            | Self::MissingContent { .. }
            | Self::EmptyContent { .. }
            | Self::UnreadableContent { .. }
            | Self::NotMarkdown { .. } => Severity::Warning,
        }
    }
}

/// Decides whether a report with issues rejects the load.
///
/// - `Strict`: reject on any error-severity issue
/// - `Pedantic`: reject on any issue at all
/// - `Advisory`: never reject; issues travel with the loaded course
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    #[default]
    Strict,
    Pedantic,
    Advisory,
}

impl ValidationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Pedantic => "pedantic",
            Self::Advisory => "advisory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "strict" => Some(Self::Strict),
            "pedantic" => Some(Self::Pedantic),
            "advisory" => Some(Self::Advisory),
            _ => None,
        }
    }
}

/// Everything found by one validation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub checked_at: DateTime<Utc>,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self {
            checked_at: Utc::now(),
            issues,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn rejected_by(&self, policy: ValidationPolicy) -> bool {
        match policy {
            ValidationPolicy::Strict => self.has_errors(),
            ValidationPolicy::Pedantic => !self.is_clean(),
            ValidationPolicy::Advisory => false,
        }
    }

    /// One-line summary, e.g. "2 errors, 1 warning".
    pub fn summary(&self) -> String {
        let errors = self.errors().count();
        let warnings = self.warnings().count();
        format!(
            "{} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        )
    }
}
