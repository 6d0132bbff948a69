use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Lesson;

/// Resolution state of a lesson's Markdown file.
///
/// - `Ok`: exists, readable and non-empty
/// - `Empty`: exists but has no content
/// - `Missing`: no file at the resolved path
/// - `Unreadable`: exists but couldn't be opened (or is a directory)
/// - `OutsideBase`: the content path is absolute or climbs out of the base directory
/// - `InvalidPath`: the content path is empty or names the base directory itself
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Ok,
    Empty,
    Missing,
    Unreadable,
    OutsideBase,
    InvalidPath,
}

impl ContentStatus {
    /// Whether the external renderer can show this lesson.
    pub fn is_renderable(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Where a lesson's content resolved to, and whether it's usable.
///
/// `module_index` and `lesson_index` are document positions, so entries stay
/// distinct even when a manifest repeats an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonContent {
    pub module_index: usize,
    pub lesson_index: usize,
    pub module_id: String,
    pub lesson_id: String,
    /// Resolved path. `None` when the content path doesn't name a file inside
    /// the base directory.
    pub path: Option<PathBuf>,
    pub status: ContentStatus,
    pub bytes: u64,
}

/// Course metadata without the module list, used for summary responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    pub level: Option<String>,
    pub module_count: usize,
    pub lesson_count: usize,
}

/// A lesson plus its content status, used in tree responses.
///
/// The `lesson` fields are flattened into the JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonNode {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub status: ContentStatus,
}

/// A module with its lessons sorted by `order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleNode {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub order: u32,
    pub lessons: Vec<LessonNode>,
}

/// The ordered traversal of a loaded course: modules by `order`, lessons by `order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseTree {
    #[serde(flatten)]
    pub course: CourseSummary,
    pub modules: Vec<ModuleNode>,
}
