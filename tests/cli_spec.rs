//! CLI integration tests.
//!
//! These spawn the `course-manifest` binary against a course written to a
//! temp directory and check its exit status and report output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use course_manifest::loader::resolve_content_path;
use course_manifest::models::Course;
use serde_json::{json, Value};
use tempfile::TempDir;

const MANIFEST: &str = include_str!("fixtures/javascript-course.json");

/// Write the manifest, every lesson file and a settings file.
fn write_course(manifest: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let course = Course::from_json(manifest).expect("Failed to parse manifest");
    for module in &course.modules {
        for lesson in &module.lessons {
            let path = resolve_content_path(dir.path(), &lesson.content).expect("Path stays inside");
            fs::create_dir_all(path.parent().expect("lesson path has a parent"))
                .expect("Failed to create lesson directory");
            fs::write(&path, format!("# {}\n", lesson.title)).expect("Failed to write lesson");
        }
    }
    fs::write(dir.path().join("settings.json"), r#"{ "policy": "strict" }"#)
        .expect("Failed to write settings");
    let manifest_path = dir.path().join("course.json");
    fs::write(&manifest_path, manifest).expect("Failed to write manifest");
    (dir, manifest_path)
}

fn validate(dir: &Path, manifest: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_course-manifest"))
        .arg("--config")
        .arg(dir.join("settings.json"))
        .arg("validate")
        .arg(manifest)
        .args(args)
        .env_remove("COURSE_MANIFEST_POLICY")
        .env_remove("COURSE_MANIFEST_PORT")
        .output()
        .expect("Failed to run course-manifest")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn validate_succeeds_on_a_clean_course() {
    let (dir, manifest) = write_course(MANIFEST);

    let output = validate(dir.path(), &manifest, &[]);

    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("0 errors, 0 warnings"));
}

#[test]
fn validate_fails_on_structural_errors() {
    let mut value: Value = serde_json::from_str(MANIFEST).expect("Fixture is valid JSON");
    value["modules"][0]["lessons"][1]["order"] = json!(1);
    let (dir, manifest) = write_course(&value.to_string());

    let output = validate(dir.path(), &manifest, &[]);

    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("share order 1"), "{}", text);
    assert!(text.contains("1 error, 0 warnings"), "{}", text);
}

#[test]
fn validate_applies_the_policy_flag() {
    let (dir, manifest) = write_course(MANIFEST);
    fs::remove_file(dir.path().join("lessons/01-beginner/03-variables.md"))
        .expect("Failed to remove lesson");

    let strict = validate(dir.path(), &manifest, &[]);
    assert!(strict.status.success(), "{}", stdout(&strict));

    let pedantic = validate(dir.path(), &manifest, &["--policy", "pedantic"]);
    assert!(!pedantic.status.success());
}

#[test]
fn validate_prints_the_report_as_json() {
    let mut value: Value = serde_json::from_str(MANIFEST).expect("Fixture is valid JSON");
    value["modules"][3]["lessons"] = json!([]);
    let (dir, manifest) = write_course(&value.to_string());

    let output = validate(dir.path(), &manifest, &["--json"]);

    assert!(!output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("Report is JSON");
    assert_eq!(report["issues"][0]["kind"], "empty_module");
    assert_eq!(report["issues"][0]["module"], "04-capstone");
}
