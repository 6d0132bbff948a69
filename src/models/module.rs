use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{nullable, Lesson};

/// A curriculum stage grouping an ordered list of lessons.
///
/// `order` must be unique within the course. Lessons are stored in document
/// order; [`Module::lessons_in_order`] gives the teaching order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    pub order: u32,
    pub lessons: Vec<Lesson>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Module {
    /// Lessons sorted by `order`. Ties keep document order.
    pub fn lessons_in_order(&self) -> Vec<&Lesson> {
        self.lesson_positions_in_order()
            .into_iter()
            .map(|i| &self.lessons[i])
            .collect()
    }

    /// Document positions of the lessons, sorted by `order`.
    pub fn lesson_positions_in_order(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = (0..self.lessons.len()).collect();
        positions.sort_by_key(|&i| self.lessons[i].order);
        positions
    }

    /// Look up a lesson by `id` or `slug`. An `id` match wins over a `slug` match.
    pub fn find_lesson(&self, key: &str) -> Option<&Lesson> {
        self.lesson_position(key).map(|i| &self.lessons[i])
    }

    /// Document position of the lesson with this `id` or `slug`.
    pub fn lesson_position(&self, key: &str) -> Option<usize> {
        self.lessons
            .iter()
            .position(|l| l.id == key)
            .or_else(|| self.lessons.iter().position(|l| l.slug == key))
    }

    pub fn description(&self) -> Option<&str> {
        nullable::value(&self.description)
    }
}
