//! Course manifest loading.
//!
//! A load is a one-shot pass: parse the manifest (fatal on malformed JSON),
//! run the structural checks, resolve every lesson's content path against the
//! base directory, then apply the [`ValidationPolicy`]. Missing lesson files
//! are reported per lesson and never stop sibling lessons from loading.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::models::*;
use crate::validate;

/// Loads and validates course manifests.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    policy: ValidationPolicy,
    require_markdown_extension: bool,
    base_dir: Option<PathBuf>,
}

impl Loader {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            policy: settings.policy,
            require_markdown_extension: settings.require_markdown_extension,
            base_dir: None,
        }
    }

    /// Resolve content paths against `dir` instead of the manifest's directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn require_markdown_extension(mut self, required: bool) -> Self {
        self.require_markdown_extension = required;
        self
    }

    /// Load a manifest file. Content paths resolve against the configured base
    /// directory, or the manifest's parent directory when none is set.
    pub fn load(&self, manifest_path: impl AsRef<Path>) -> Result<LoadedCourse> {
        let manifest_path = manifest_path.as_ref();
        let json = match fs::read_to_string(manifest_path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::manifest_not_found(manifest_path));
            }
            Err(e) => return Err(e.into()),
        };

        let base_dir = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => manifest_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        tracing::debug!("Loading manifest {}", manifest_path.display());
        self.load_str(&json, base_dir)
    }

    /// Load a manifest from a string, resolving content paths against `base_dir`.
    pub fn load_str(&self, json: &str, base_dir: impl Into<PathBuf>) -> Result<LoadedCourse> {
        let course = Course::from_json(json)?;
        let base_dir = base_dir.into();

        let mut issues = validate::check_structure(&course);
        let check = check_content(&course, &base_dir, self.require_markdown_extension);
        issues.extend(check.issues);

        let report = ValidationReport::new(issues);
        for issue in &report.issues {
            match issue.severity() {
                Severity::Error => tracing::warn!("{}: {}", course.id, issue),
                Severity::Warning => tracing::debug!("{}: {}", course.id, issue),
            }
        }

        if report.rejected_by(self.policy) {
            tracing::warn!(
                "Manifest {} rejected under {} policy ({})",
                course.id,
                self.policy.as_str(),
                report.summary()
            );
            return Err(Error::Validation { report });
        }

        tracing::info!(
            "Loaded course {} with {} modules and {} lessons ({})",
            course.id,
            course.modules.len(),
            course.lesson_count(),
            report.summary()
        );

        Ok(LoadedCourse {
            course,
            base_dir,
            content: check.lessons,
            report,
        })
    }
}

/// A parsed course with its content resolution and validation results.
#[derive(Debug, Clone)]
pub struct LoadedCourse {
    pub course: Course,
    pub base_dir: PathBuf,
    /// One entry per lesson, in document order.
    pub content: Vec<LessonContent>,
    pub report: ValidationReport,
}

impl LoadedCourse {
    /// Content entry for the lesson at these document positions.
    pub fn content_at(&self, module_index: usize, lesson_index: usize) -> Option<&LessonContent> {
        self.content
            .iter()
            .find(|c| c.module_index == module_index && c.lesson_index == lesson_index)
    }

    /// Content entry for a lesson looked up by id or slug.
    pub fn content_for(&self, module_key: &str, lesson_key: &str) -> Option<&LessonContent> {
        let (module_index, lesson_index) = self.locate(module_key, lesson_key).ok()?;
        self.content_at(module_index, lesson_index)
    }

    pub fn summary(&self) -> CourseSummary {
        let course = &self.course;
        CourseSummary {
            id: course.id.clone(),
            title: course.title.clone(),
            slug: course.slug.clone(),
            description: course.description().map(str::to_string),
            thumbnail: course.thumbnail().map(str::to_string),
            duration: course.duration().map(str::to_string),
            level: course.level().map(str::to_string),
            module_count: course.modules.len(),
            lesson_count: course.lesson_count(),
        }
    }

    /// A module and its ordered lessons, looked up by id or slug.
    pub fn module_node(&self, module_key: &str) -> Option<ModuleNode> {
        self.course
            .module_position(module_key)
            .map(|i| self.node_at(i))
    }

    /// A lesson with its content status, looked up by id or slug.
    pub fn lesson_node(&self, module_key: &str, lesson_key: &str) -> Result<LessonNode> {
        let (module_index, lesson_index) = self.locate(module_key, lesson_key)?;
        Ok(self.lesson_node_at(module_index, lesson_index))
    }

    /// The ordered traversal: modules by `order`, lessons by `order`.
    pub fn tree(&self) -> CourseTree {
        CourseTree {
            course: self.summary(),
            modules: self
                .course
                .module_positions_in_order()
                .into_iter()
                .map(|i| self.node_at(i))
                .collect(),
        }
    }

    /// Read a lesson's Markdown. Modules and lessons are looked up by id or slug.
    ///
    /// Any failure to read the file is reported as [`Error::ContentUnavailable`].
    /// Invalid UTF-8 is replaced rather than rejected; the renderer treats the
    /// text as opaque.
    pub fn read_lesson(&self, module_key: &str, lesson_key: &str) -> Result<String> {
        let (module_index, lesson_index) = self.locate(module_key, lesson_key)?;
        let module = &self.course.modules[module_index];
        let lesson = &module.lessons[lesson_index];

        let unavailable = |path: PathBuf| Error::ContentUnavailable {
            module: module.id.clone(),
            lesson: lesson.id.clone(),
            path,
        };

        let path = resolve_content_path(&self.base_dir, &lesson.content)
            .ok_or_else(|| unavailable(PathBuf::from(&lesson.content)))?;
        match fs::read(&path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                tracing::debug!("Cannot read {}: {}", path.display(), e);
                Err(unavailable(path))
            }
        }
    }

    /// Document positions of a module and one of its lessons.
    fn locate(&self, module_key: &str, lesson_key: &str) -> Result<(usize, usize)> {
        let module_index = self
            .course
            .module_position(module_key)
            .ok_or_else(|| Error::ModuleNotFound(module_key.to_string()))?;
        let module = &self.course.modules[module_index];
        let lesson_index = module
            .lesson_position(lesson_key)
            .ok_or_else(|| Error::lesson_not_found(&module.id, lesson_key))?;
        Ok((module_index, lesson_index))
    }

    fn node_at(&self, module_index: usize) -> ModuleNode {
        let module = &self.course.modules[module_index];
        ModuleNode {
            id: module.id.clone(),
            title: module.title.clone(),
            slug: module.slug.clone(),
            description: module.description().map(str::to_string),
            order: module.order,
            lessons: module
                .lesson_positions_in_order()
                .into_iter()
                .map(|i| self.lesson_node_at(module_index, i))
                .collect(),
        }
    }

    fn lesson_node_at(&self, module_index: usize, lesson_index: usize) -> LessonNode {
        LessonNode {
            lesson: self.course.modules[module_index].lessons[lesson_index].clone(),
            status: self
                .content_at(module_index, lesson_index)
                .map(|c| c.status)
                .unwrap_or(ContentStatus::Missing),
        }
    }
}

/// Per-lesson results of resolving content paths.
#[derive(Debug, Clone, Default)]
pub struct ContentCheck {
    pub lessons: Vec<LessonContent>,
    pub issues: Vec<Issue>,
}

/// Resolve and inspect every lesson's content file.
///
/// Each lesson is checked independently; a broken file only affects its own
/// entry.
pub fn check_content(course: &Course, base_dir: &Path, require_markdown: bool) -> ContentCheck {
    let mut check = ContentCheck::default();

    for (module_index, module) in course.modules.iter().enumerate() {
        for (lesson_index, lesson) in module.lessons.iter().enumerate() {
            let module_id = module.id.clone();
            let lesson_id = lesson.id.clone();
            let mut entry = LessonContent {
                module_index,
                lesson_index,
                module_id: module_id.clone(),
                lesson_id: lesson_id.clone(),
                path: None,
                status: ContentStatus::Missing,
                bytes: 0,
            };

            if require_markdown && !is_markdown(&lesson.content) {
                check.issues.push(Issue::NotMarkdown {
                    module: module_id.clone(),
                    lesson: lesson_id.clone(),
                    content: lesson.content.clone(),
                });
            }

            let path = match classify_content_path(base_dir, &lesson.content) {
                Ok(path) => path,
                Err(problem) => {
                    let content = lesson.content.clone();
                    let (issue, status) = match problem {
                        PathProblem::NoFile => (
                            Issue::InvalidContentPath {
                                module: module_id,
                                lesson: lesson_id,
                                content,
                            },
                            ContentStatus::InvalidPath,
                        ),
                        PathProblem::OutsideBase => (
                            Issue::ContentOutsideBase {
                                module: module_id,
                                lesson: lesson_id,
                                content,
                            },
                            ContentStatus::OutsideBase,
                        ),
                    };
                    check.issues.push(issue);
                    entry.status = status;
                    check.lessons.push(entry);
                    continue;
                }
            };

            let (status, bytes) = match file_size(&path) {
                Ok(0) => {
                    check.issues.push(Issue::EmptyContent {
                        module: module_id,
                        lesson: lesson_id,
                        path: path.clone(),
                    });
                    (ContentStatus::Empty, 0)
                }
                Ok(bytes) => (ContentStatus::Ok, bytes),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    check.issues.push(Issue::MissingContent {
                        module: module_id,
                        lesson: lesson_id,
                        path: path.clone(),
                    });
                    (ContentStatus::Missing, 0)
                }
                Err(e) => {
                    check.issues.push(Issue::UnreadableContent {
                        module: module_id,
                        lesson: lesson_id,
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                    (ContentStatus::Unreadable, 0)
                }
            };

            entry.path = Some(path);
            entry.status = status;
            entry.bytes = bytes;
            check.lessons.push(entry);
        }
    }

    check
}

/// Why a content path can't be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathProblem {
    /// Empty, or normalises to the base directory itself.
    NoFile,
    /// Absolute, or climbs above the base directory.
    OutsideBase,
}

/// Join a manifest content path onto `base_dir`.
///
/// Returns `None` for absolute paths, for paths whose `..` components climb
/// above `base_dir`, and for paths that don't name anything below it. The
/// result is normalised lexically; symlinks aren't followed.
pub fn resolve_content_path(base_dir: &Path, content: &str) -> Option<PathBuf> {
    classify_content_path(base_dir, content).ok()
}

fn classify_content_path(
    base_dir: &Path,
    content: &str,
) -> std::result::Result<PathBuf, PathProblem> {
    let mut relative = PathBuf::new();
    for component in Path::new(content).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return Err(PathProblem::OutsideBase);
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(PathProblem::OutsideBase),
        }
    }
    if relative.as_os_str().is_empty() {
        return Err(PathProblem::NoFile);
    }
    Ok(base_dir.join(relative))
}

/// Open the file and return its length. Opening rather than stat-ing
/// catches permission problems.
fn file_size(path: &Path) -> std::io::Result<u64> {
    let file = File::open(path)?;
    let metadata = file.metadata()?;
    if metadata.is_dir() {
        return Err(std::io::Error::new(
            ErrorKind::InvalidInput,
            "path is a directory",
        ));
    }
    Ok(metadata.len())
}

fn is_markdown(content: &str) -> bool {
    Path::new(content)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
}
