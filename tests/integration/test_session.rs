//! End-to-end session tests against the sample course.
//!
//! Each test drives a full [`Session`] with scripted learner input and
//! inspects both the transcript and the progress file left on disk.

use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use hsm_machine::console::{COURSE_COMPLETE, CURRENT_MARKER};
use hsm_machine::{Catalog, Console, Progress, Session, SessionOutcome};

fn course_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample-course")
}

/// Runs one session with `input` as the learner's keystrokes.
fn run_session(progress_file: &Path, input: &str) -> (SessionOutcome, String) {
    let catalog = Catalog::load(course_dir()).expect("Failed to load sample course");
    let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let mut session = Session::new(catalog, progress_file, console).with_banner(false);

    let outcome = session.run().expect("Session failed");
    let (_, output) = session.into_console().into_parts();
    (outcome, String::from_utf8(output).expect("Transcript is UTF-8"))
}

fn stored(progress_file: &Path) -> Progress {
    Progress::load(progress_file)
        .expect("Failed to read progress")
        .expect("Progress file should exist")
}

fn marked_line(transcript: &str) -> Option<&str> {
    transcript.lines().find(|line| line.ends_with(CURRENT_MARKER))
}

/// A first run creates progress at the first lesson and marks it.
#[test]
fn test_first_run_creates_progress() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let progress_file = dir.path().join("progress.json");

    let (outcome, out) = run_session(&progress_file, "q\n");
    assert_eq!(outcome, SessionOutcome::Quit);

    let value: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(&progress_file).expect("Progress file should exist"),
    )
    .expect("Progress file is JSON");
    assert_eq!(value["current_lesson_num"], "1.1");
    assert_eq!(value["current_frame_num"], 0);
    assert_eq!(value["frames_complete"], serde_json::json!([]));

    let marked = marked_line(&out).expect("Current lesson should be marked");
    assert!(marked.starts_with("1.1 EUROPEAN CAPITALS"));
    assert!(out.contains("\n1.2 Great Rivers\n"));
    assert!(out.contains("\n1.10 Review\n"));
}

/// Answering the first frame persists the next frame index.
#[test]
fn test_first_frame_correct_is_persisted() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let progress_file = dir.path().join("progress.json");

    let (outcome, out) = run_session(&progress_file, "\nParis\nq\n");
    assert_eq!(outcome, SessionOutcome::Quit);
    assert!(out.contains("Frame 1/2"));
    assert!(out.contains("Correct!"));

    let progress = stored(&progress_file);
    assert_eq!(progress.current_lesson_num.as_str(), "1.1");
    assert_eq!(progress.current_frame_num, 1);
    assert_eq!(progress.frames_complete, BTreeSet::from([0]));
    assert!(progress.updated_at.is_some());
}

/// Finishing a lesson moves the marker to the next one.
#[test]
fn test_finished_lesson_moves_marker() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let progress_file = dir.path().join("progress.json");

    run_session(&progress_file, "\nParis\nRome\nMadrid\nq\n");
    let progress = stored(&progress_file);
    assert_eq!(progress.current_lesson_num.as_str(), "1.2");
    assert_eq!(progress.current_frame_num, 0);
    assert!(progress.frames_complete.is_empty());

    let (_, out) = run_session(&progress_file, "q\n");
    let marked = marked_line(&out).expect("Current lesson should be marked");
    assert!(marked.starts_with("1.2 GREAT RIVERS"));
    assert!(out.contains("\n1.1 European Capitals\n"));
}

/// Quitting mid-frame and running again resumes at that frame.
#[test]
fn test_resume_after_quit() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let progress_file = dir.path().join("progress.json");

    run_session(&progress_file, "\nParis\nRome\nq\n");
    let progress = stored(&progress_file);
    assert_eq!(progress.current_frame_num, 1);
    assert_eq!(progress.frames_complete, BTreeSet::from([0]));

    let (_, out) = run_session(&progress_file, "\nRome\nMadrid\nq\n");
    assert!(!out.contains("Frame 1/2"));
    assert!(out.contains("Frame 2/2"));
    assert_eq!(stored(&progress_file).current_lesson_num.as_str(), "1.2");
}

/// Repeated hints grow one letter at a time and stop at the full answer.
#[test]
fn test_hints_reveal_answer_letter_by_letter() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let progress_file = dir.path().join("progress.json");

    let (outcome, out) = run_session(&progress_file, "\n?\n?\n?\n?\n?\n?\nq\n");
    assert_eq!(outcome, SessionOutcome::Quit);

    let hints: Vec<&str> = out
        .lines()
        .filter_map(|line| line.strip_prefix("1: "))
        .filter(|rest| !rest.is_empty() && "Paris".starts_with(rest))
        .collect();
    assert_eq!(hints, ["P", "Pa", "Par", "Pari", "Paris"]);
    assert!(out.contains("   Paris\n   paris\nIncorrect!"));

    // The wrongly answered frame stays pending; the quit happened on frame 2.
    let progress = stored(&progress_file);
    assert_eq!(progress.current_frame_num, 1);
    assert!(progress.frames_complete.is_empty());
}

/// A wrong answer sends the frame to the back of the lesson.
#[test]
fn test_wrong_frame_asked_again_before_lesson_ends() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let progress_file = dir.path().join("progress.json");

    let (_, out) = run_session(&progress_file, "\nLyon\nRome\nMadrid\nparis\nq\n");
    assert_eq!(out.matches("Frame 1/2").count(), 2);

    let progress = stored(&progress_file);
    assert_eq!(progress.current_lesson_num.as_str(), "1.2");
}

/// Working through every lesson completes the course.
#[test]
fn test_complete_course() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let progress_file = dir.path().join("nested/progress.json");

    let (outcome, out) = run_session(&progress_file, "\nParis\nRome\nMadrid\nNile\n");
    assert_eq!(outcome, SessionOutcome::Completed);
    assert!(out.contains("Frame 1/1"));
    assert!(out.contains("You have finished the first unit."));
    assert!(out.ends_with(&format!("{COURSE_COMPLETE}\n")));

    let progress = stored(&progress_file);
    assert_eq!(progress.current_lesson_num.as_str(), "1.10");
    assert_eq!(progress.current_frame_num, 1);
    assert_eq!(progress.frames_complete, BTreeSet::from([0]));
}

/// Input ending mid-question is treated as quitting.
#[test]
fn test_end_of_input_saves_and_quits() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let progress_file = dir.path().join("progress.json");

    let (outcome, _) = run_session(&progress_file, "\nParis\nRome\n");
    assert_eq!(outcome, SessionOutcome::Quit);

    let progress = stored(&progress_file);
    assert_eq!(progress.current_frame_num, 1);
    assert_eq!(progress.frames_complete, BTreeSet::from([0]));
}

/// Progress written for a lesson that no longer exists is reported.
#[test]
fn test_stale_progress_reports_unknown_lesson() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let progress_file = dir.path().join("progress.json");
    Progress::new("9.1".into())
        .save(&progress_file)
        .expect("Failed to write progress");

    let catalog = Catalog::load(course_dir()).expect("Failed to load sample course");
    let console = Console::new(Cursor::new(b"\n".to_vec()), Vec::new());
    let err = Session::new(catalog, &progress_file, console)
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("9.1"));
}
