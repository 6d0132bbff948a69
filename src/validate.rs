//! Structural checks on a parsed manifest.
//!
//! These look only at the manifest itself; lesson files are checked by
//! [`crate::loader::check_content`].

use std::collections::BTreeMap;

use crate::models::{Course, Issue, Module};

/// Run every structural check and return the issues in a stable order:
/// course-level problems first, then each module in document order.
pub fn check_structure(course: &Course) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (id, count) in repeated(course.modules.iter().map(|m| m.id.as_str())) {
        issues.push(Issue::DuplicateModuleId { id, count });
    }
    for (order, modules) in duplicates(course.modules.iter().map(|m| (m.order, &m.id))) {
        issues.push(Issue::DuplicateModuleOrder { order, modules });
    }
    for (slug, modules) in duplicates(course.modules.iter().map(|m| (m.slug.as_str(), &m.id))) {
        issues.push(Issue::DuplicateModuleSlug {
            slug: slug.to_string(),
            modules,
        });
    }
    for (module, previous) in out_of_sequence(course.modules.iter().map(|m| (m.order, m))) {
        issues.push(Issue::ModuleOutOfSequence {
            module: module.id.clone(),
            order: module.order,
            previous,
        });
    }

    for module in &course.modules {
        check_module(module, &mut issues);
    }

    issues
}

fn check_module(module: &Module, issues: &mut Vec<Issue>) {
    if module.lessons.is_empty() {
        issues.push(Issue::EmptyModule {
            module: module.id.clone(),
        });
        return;
    }

    for (id, count) in repeated(module.lessons.iter().map(|l| l.id.as_str())) {
        issues.push(Issue::DuplicateLessonId {
            module: module.id.clone(),
            id,
            count,
        });
    }
    for (order, lessons) in duplicates(module.lessons.iter().map(|l| (l.order, &l.id))) {
        issues.push(Issue::DuplicateLessonOrder {
            module: module.id.clone(),
            order,
            lessons,
        });
    }
    for (slug, lessons) in duplicates(module.lessons.iter().map(|l| (l.slug.as_str(), &l.id))) {
        issues.push(Issue::DuplicateLessonSlug {
            module: module.id.clone(),
            slug: slug.to_string(),
            lessons,
        });
    }
    for (lesson, previous) in out_of_sequence(module.lessons.iter().map(|l| (l.order, l))) {
        issues.push(Issue::LessonOutOfSequence {
            module: module.id.clone(),
            lesson: lesson.id.clone(),
            order: lesson.order,
            previous,
        });
    }
}

/// Group ids by key and keep only keys claimed more than once.
fn duplicates<'a, K: Ord>(
    entries: impl Iterator<Item = (K, &'a String)>,
) -> Vec<(K, Vec<String>)> {
    let mut groups: BTreeMap<K, Vec<String>> = BTreeMap::new();
    for (key, id) in entries {
        groups.entry(key).or_default().push(id.clone());
    }
    groups
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .collect()
}

/// Ids that appear more than once, with how often.
fn repeated<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in ids {
        *counts.entry(id).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| (id.to_string(), count))
        .collect()
}

/// Items whose order is lower than the one listed before them.
///
/// Equal neighbours are duplicates, which are reported separately.
fn out_of_sequence<T>(entries: impl Iterator<Item = (u32, T)>) -> Vec<(T, u32)> {
    let mut found = Vec::new();
    let mut previous: Option<u32> = None;
    for (order, item) in entries {
        if let Some(prev) = previous {
            if order < prev {
                found.push((item, prev));
            }
        }
        previous = Some(previous.map_or(order, |p| p.max(order)));
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lesson;
    use serde_json::Map;

    fn lesson(id: &str, order: u32) -> Lesson {
        Lesson {
            id: id.to_string(),
            title: id.to_string(),
            slug: id.to_string(),
            order,
            content: format!("lessons/{}.md", id),
            extra: Map::new(),
        }
    }

    fn module(id: &str, order: u32, lessons: Vec<Lesson>) -> Module {
        Module {
            id: id.to_string(),
            title: id.to_string(),
            slug: id.to_string(),
            description: None,
            order,
            lessons,
            extra: Map::new(),
        }
    }

    fn course(modules: Vec<Module>) -> Course {
        Course {
            id: "js".to_string(),
            title: "JavaScript".to_string(),
            slug: "javascript".to_string(),
            description: None,
            thumbnail: None,
            duration: None,
            level: None,
            modules,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_clean_course_has_no_issues() {
        let c = course(vec![
            module("a", 1, vec![lesson("x", 1), lesson("y", 2)]),
            module("b", 2, vec![lesson("z", 1)]),
        ]);
        assert!(check_structure(&c).is_empty());
    }

    #[test]
    fn test_duplicate_lesson_order() {
        let c = course(vec![module("a", 1, vec![lesson("x", 1), lesson("y", 1)])]);
        assert_eq!(
            check_structure(&c),
            vec![Issue::DuplicateLessonOrder {
                module: "a".to_string(),
                order: 1,
                lessons: vec!["x".to_string(), "y".to_string()],
            }]
        );
    }

    #[test]
    fn test_duplicate_module_order() {
        let c = course(vec![
            module("a", 2, vec![lesson("x", 1)]),
            module("b", 2, vec![lesson("y", 1)]),
        ]);
        assert_eq!(
            check_structure(&c),
            vec![Issue::DuplicateModuleOrder {
                order: 2,
                modules: vec!["a".to_string(), "b".to_string()],
            }]
        );
    }

    #[test]
    fn test_same_lesson_order_in_different_modules_is_fine() {
        let c = course(vec![
            module("a", 1, vec![lesson("x", 1)]),
            module("b", 2, vec![lesson("y", 1)]),
        ]);
        assert!(check_structure(&c).is_empty());
    }

    #[test]
    fn test_empty_module() {
        let c = course(vec![module("a", 1, vec![])]);
        assert_eq!(
            check_structure(&c),
            vec![Issue::EmptyModule {
                module: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_out_of_sequence_lessons() {
        let c = course(vec![module(
            "a",
            1,
            vec![lesson("x", 1), lesson("y", 3), lesson("z", 2)],
        )]);
        assert_eq!(
            check_structure(&c),
            vec![Issue::LessonOutOfSequence {
                module: "a".to_string(),
                lesson: "z".to_string(),
                order: 2,
                previous: 3,
            }]
        );
    }

    #[test]
    fn test_out_of_sequence_modules() {
        let c = course(vec![
            module("a", 2, vec![lesson("x", 1)]),
            module("b", 1, vec![lesson("y", 1)]),
        ]);
        assert_eq!(
            check_structure(&c),
            vec![Issue::ModuleOutOfSequence {
                module: "b".to_string(),
                order: 1,
                previous: 2,
            }]
        );
    }

    #[test]
    fn test_duplicate_lesson_ids() {
        let mut second = lesson("y", 2);
        second.id = "x".to_string();
        let c = course(vec![module("a", 1, vec![lesson("x", 1), second])]);
        assert_eq!(
            check_structure(&c),
            vec![Issue::DuplicateLessonId {
                module: "a".to_string(),
                id: "x".to_string(),
                count: 2,
            }]
        );
    }

    #[test]
    fn test_duplicate_module_ids() {
        let mut second = module("b", 2, vec![lesson("y", 1)]);
        second.id = "a".to_string();
        let c = course(vec![module("a", 1, vec![lesson("x", 1)]), second]);
        assert_eq!(
            check_structure(&c),
            vec![Issue::DuplicateModuleId {
                id: "a".to_string(),
                count: 2,
            }]
        );
    }

    #[test]
    fn test_gaps_in_order_are_allowed() {
        let c = course(vec![module("a", 10, vec![lesson("x", 1), lesson("y", 5)])]);
        assert!(check_structure(&c).is_empty());
    }

    #[test]
    fn test_duplicate_slugs() {
        let mut first = module("a", 1, vec![lesson("x", 1)]);
        let mut second = module("b", 2, vec![lesson("y", 1)]);
        first.slug = "basics".to_string();
        second.slug = "basics".to_string();

        let issues = check_structure(&course(vec![first, second]));
        assert_eq!(
            issues,
            vec![Issue::DuplicateModuleSlug {
                slug: "basics".to_string(),
                modules: vec!["a".to_string(), "b".to_string()],
            }]
        );
    }
}
