//! Integration tests for loading the sample course and its configuration.

use std::path::{Path, PathBuf};

use hsm_machine::{curriculum, list_lessons, Catalog, Config, LessonNumber, MachineError};

/// Path to the integration fixtures.
fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn course_dir() -> PathBuf {
    fixtures().join("sample-course")
}

/// Tests that every visible lesson file is loaded in lesson-number order.
#[test]
fn test_sample_course_loads_in_order() {
    let catalog = Catalog::load(course_dir()).expect("Failed to load sample course");

    let numbers: Vec<&str> = catalog.lessons().iter().map(|l| l.number.as_str()).collect();
    assert_eq!(numbers, ["1.1", "1.2", "1.10"]);

    let capitals = catalog.first().expect("Course should not be empty");
    assert_eq!(capitals.name, "European Capitals");
    assert_eq!(capitals.frame_count(), 2);
    assert_eq!(capitals.frames[1].answer_groups.len(), 2);
    assert_eq!(capitals.frames[1].answer_groups[1].canonical(), "Madrid");
    assert!(capitals.exhibit.is_none());
}

/// Tests the optional exhibit and frames without questions.
#[test]
fn test_optional_lesson_parts() {
    let catalog = Catalog::load(course_dir()).expect("Failed to load sample course");

    let rivers = catalog
        .find(&LessonNumber::new("1.2"))
        .expect("Lesson 1.2 should exist");
    assert!(rivers
        .exhibit
        .as_deref()
        .is_some_and(|e| e.contains("Nile")));

    let review = catalog
        .find(&LessonNumber::new("1.10"))
        .expect("Lesson 1.10 should exist");
    assert!(review.frames[0].answer_groups.is_empty());
}

/// Tests that the curriculum resumes at any lesson and keeps the tail.
#[test]
fn test_curriculum_from_each_lesson() {
    let lessons = list_lessons(course_dir()).expect("Failed to list lessons");

    let from_second = curriculum::build(&lessons, &"1.2".into()).expect("Known lesson");
    let numbers: Vec<&str> = from_second.iter().map(|l| l.number.as_str()).collect();
    assert_eq!(numbers, ["1.2", "1.10"]);

    let err = curriculum::build(&lessons, &"2.1".into()).unwrap_err();
    assert!(matches!(err, MachineError::UnknownLesson { .. }));
}

/// Tests that a broken lesson file stops loading and is named in the error.
#[test]
fn test_broken_lesson_file_reported() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for entry in std::fs::read_dir(course_dir()).expect("Failed to read fixtures") {
        let path = entry.expect("Failed to read entry").path();
        if let Some(name) = path.file_name() {
            std::fs::copy(&path, dir.path().join(name)).expect("Failed to copy fixture");
        }
    }
    std::fs::write(dir.path().join("broken.json"), r#"{"lesson_number": "3", "#)
        .expect("Failed to write broken lesson");

    let err = Catalog::load(dir.path()).unwrap_err();
    let message = err.to_string();
    assert!(
        matches!(&err, MachineError::ContentParse { path, .. } if path.ends_with("broken.json")),
        "Expected ContentParse naming broken.json, got: {message}"
    );
    assert!(message.contains("Suggestion:"));
}

/// Tests that the sample config loads and resolves against a base directory.
#[test]
fn test_sample_config_loads() {
    let config_path = fixtures().join("hsm.json");
    assert!(
        config_path.exists(),
        "Config fixture not found at: {config_path:?}"
    );

    let config = Config::load_from_file(&config_path).expect("Failed to load config");
    assert!(!config.show_banner);

    let base = fixtures();
    assert_eq!(config.course_dir_in(&base), course_dir());
    assert_eq!(
        config.progress_file_in(&base),
        base.join("state/progress.json")
    );

    let catalog = Catalog::load(config.course_dir_in(&base)).expect("Configured course loads");
    assert_eq!(catalog.lessons().len(), 3);
    assert_eq!(catalog.directory(), Path::new(&base).join("sample-course"));
}
