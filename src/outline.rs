//! ASCII outline rendering for loaded courses.

use crate::loader::LoadedCourse;
use crate::models::{ContentStatus, CourseTree, ModuleNode};

const READY: char = '●';
const EMPTY: char = '○';
const BROKEN: char = '✗';

/// Get the status symbol for a lesson's content.
fn status_symbol(status: ContentStatus) -> char {
    match status {
        ContentStatus::Ok => READY,
        ContentStatus::Empty => EMPTY,
        ContentStatus::Missing
        | ContentStatus::Unreadable
        | ContentStatus::OutsideBase
        | ContentStatus::InvalidPath => BROKEN,
    }
}

/// Render a loaded course as an ASCII outline.
///
/// Example output:
/// ```text
/// JavaScript Fundamentals
/// ├── 1. Beginner
/// │   ├── ● Introduction
/// │   └── ✗ Variables
/// └── 2. Intermediate
///     └── ○ DOM Basics
/// ```
pub fn render_outline(loaded: &LoadedCourse) -> String {
    render_tree(&loaded.tree())
}

pub fn render_tree(tree: &CourseTree) -> String {
    let mut output = String::new();
    output.push_str(&tree.course.title);
    output.push('\n');

    for (i, module) in tree.modules.iter().enumerate() {
        let is_last = i == tree.modules.len() - 1;
        render_module(&mut output, module, is_last);
    }
    output
}

fn render_module(output: &mut String, module: &ModuleNode, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(branch);
    output.push_str(&format!("{}. {}", module.order, module.title));
    output.push('\n');

    let prefix = if is_last { "    " } else { "│   " };
    for (i, node) in module.lessons.iter().enumerate() {
        let branch = if i == module.lessons.len() - 1 {
            "└── "
        } else {
            "├── "
        };
        output.push_str(prefix);
        output.push_str(branch);
        output.push(status_symbol(node.status));
        output.push(' ');
        output.push_str(&node.lesson.title);
        output.push('\n');
    }
}
