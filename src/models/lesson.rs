use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single instructional unit backed by one Markdown file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub order: u32,
    /// Path to the Markdown file, relative to the course base directory.
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
