//! Loader, validator and read-only server for JSON course manifests.
//!
//! A manifest declares a course as ordered modules of ordered lessons, each
//! lesson pointing at a Markdown file. [`Loader`] parses a manifest, checks
//! its structure and lesson files, and hands back a [`LoadedCourse`] whose
//! [`tree`](LoadedCourse::tree) is the ordered traversal renderers consume.

pub mod api;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod outline;
pub mod validate;

pub use error::{Error, Result};
pub use loader::{LoadedCourse, Loader};
