use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{nullable, Lesson, Module};
use crate::error::Result;

/// The root of a course manifest.
///
/// Modules are stored in document order so that serializing a loaded course
/// reproduces the original manifest. Use [`Course::modules_in_order`] for the
/// curriculum order. Optional labels are `None` when absent and `Some(None)`
/// when the manifest says `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    /// Relative path or URL of the course thumbnail image.
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail: Option<Option<String>>,
    /// Free-form duration label, e.g. "12 weeks".
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<Option<String>>,
    /// Free-form level label, e.g. "Beginner to Advanced".
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<Option<String>>,
    pub modules: Vec<Module>,
    /// Keys this crate doesn't model, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    /// Parse a manifest document. Malformed JSON is fatal.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Modules sorted by `order`. Ties keep document order.
    pub fn modules_in_order(&self) -> Vec<&Module> {
        self.module_positions_in_order()
            .into_iter()
            .map(|i| &self.modules[i])
            .collect()
    }

    /// Document positions of the modules, sorted by `order`.
    pub fn module_positions_in_order(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = (0..self.modules.len()).collect();
        positions.sort_by_key(|&i| self.modules[i].order);
        positions
    }

    /// Every lesson in curriculum order, paired with its module.
    pub fn lessons_in_order(&self) -> Vec<(&Module, &Lesson)> {
        self.modules_in_order()
            .into_iter()
            .flat_map(|module| {
                module
                    .lessons_in_order()
                    .into_iter()
                    .map(move |lesson| (module, lesson))
            })
            .collect()
    }

    /// Look up a module by `id` or `slug`. An `id` match wins over a `slug` match.
    pub fn find_module(&self, key: &str) -> Option<&Module> {
        self.module_position(key).map(|i| &self.modules[i])
    }

    /// Document position of the module with this `id` or `slug`.
    pub fn module_position(&self, key: &str) -> Option<usize> {
        self.modules
            .iter()
            .position(|m| m.id == key)
            .or_else(|| self.modules.iter().position(|m| m.slug == key))
    }

    pub fn description(&self) -> Option<&str> {
        nullable::value(&self.description)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        nullable::value(&self.thumbnail)
    }

    pub fn duration(&self) -> Option<&str> {
        nullable::value(&self.duration)
    }

    pub fn level(&self) -> Option<&str> {
        nullable::value(&self.level)
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}
