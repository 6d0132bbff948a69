//! Domain models for course manifests.
//!
//! # Core Concepts
//!
//! - [`Course`]: the manifest root, holding modules in document order.
//! - [`Module`]: a curriculum stage; `order` is unique within the course.
//! - [`Lesson`]: one Markdown file; `order` is unique within its module.
//!
//! # Derived Views
//!
//! - [`ValidationReport`]: issues found by a load, each with a [`Severity`].
//! - [`CourseTree`]: the ordered traversal handed to renderers, with a
//!   [`ContentStatus`] per lesson.

mod course;
mod lesson;
mod module;
mod nullable;
mod report;
mod tree;

pub use course::*;
pub use lesson::*;
pub use module::*;
pub use report::*;
pub use tree::*;
