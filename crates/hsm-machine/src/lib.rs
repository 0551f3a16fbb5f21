//! Holland-Skinner teaching machine.
//!
//! Loads a course of lessons from a directory of JSON files, quizzes the
//! learner frame by frame on a line-oriented terminal and persists their
//! position so the next session resumes where this one stopped.

pub mod catalog;
pub mod config;
pub mod console;
pub mod curriculum;
pub mod error;
pub mod evaluator;
pub mod lesson;
pub mod progress;
pub mod session;

pub use catalog::{list_lessons, Catalog};
pub use config::{install_dir, Config};
pub use console::Console;
pub use curriculum::Curriculum;
pub use error::{ErrorKind, MachineError, Result};
pub use evaluator::{evaluate, Outcome};
pub use lesson::{AnswerGroup, Frame, Lesson, LessonNumber};
pub use progress::Progress;
pub use session::{Session, SessionOutcome};
