//! Error types for the teaching machine.
//!
//! Every variant here is fatal for a session: the learner sees the message
//! and the process exits non-zero. Wrong answers, hints and help requests are
//! handled inside the evaluator and never surface as errors.

use std::path::PathBuf;

/// A specialized `Result` type for teaching machine operations.
pub type Result<T> = std::result::Result<T, MachineError>;

/// Errors that can occur while loading content, persisting progress or
/// driving a session.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    // ========================================================================
    // Content Errors
    // ========================================================================
    /// The course directory could not be listed.
    #[error("Cannot read course directory '{path}': {message}\n\nSuggestion: Check that the directory exists and is readable, or set HSM_COURSE_DIR")]
    ContentDirUnreadable {
        /// Path to the course directory.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A lesson file is not valid JSON or could not be read.
    #[error("Invalid lesson file '{path}': {message}\n\nSuggestion: Validate the lesson file with a JSON linter")]
    ContentParse {
        /// Path to the lesson file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// A lesson file is valid JSON but breaks the lesson schema.
    #[error("Malformed lesson file '{path}': {message}\n\nSuggestion: Each frame must be [text, [answers...], ...] with at least one answer per group")]
    ContentInvalid {
        /// Path to the lesson file.
        path: PathBuf,
        /// Description of the schema violation.
        message: String,
    },

    /// Two lesson files declare the same lesson number.
    #[error("Lesson {number} is declared by both '{first}' and '{second}'\n\nSuggestion: Give every lesson file a unique lesson_number")]
    DuplicateLesson {
        /// The repeated lesson number.
        number: String,
        /// The file seen first.
        first: PathBuf,
        /// The file seen second.
        second: PathBuf,
    },

    /// The course directory holds no lessons.
    #[error("No lessons found in '{path}'\n\nSuggestion: Add at least one lesson file to the course directory")]
    EmptyCourse {
        /// Path to the course directory.
        path: PathBuf,
    },

    // ========================================================================
    // Persistence Errors
    // ========================================================================
    /// The progress file exists but could not be read.
    #[error("Cannot read progress file '{path}': {message}\n\nSuggestion: Check file permissions")]
    ProgressRead {
        /// Path to the progress file.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// The progress file contains malformed JSON.
    #[error("Corrupted progress file '{path}': {message}\n\nSuggestion: Remove the progress file to start over, or restore it from backup")]
    ProgressCorrupted {
        /// Path to the progress file.
        path: PathBuf,
        /// Description of the corruption.
        message: String,
    },

    /// The progress file could not be written.
    #[error("Failed to save progress to '{path}': {message}\n\nSuggestion: Check write permissions and available disk space")]
    ProgressWrite {
        /// Path to the progress file.
        path: PathBuf,
        /// Description of the write failure.
        message: String,
    },

    // ========================================================================
    // Curriculum Errors
    // ========================================================================
    /// The progress marker names a lesson the catalog does not contain.
    #[error("Unknown lesson '{number}' in progress file\n\nSuggestion: Restore the missing lesson file or remove the progress file to start over")]
    UnknownLesson {
        /// The lesson number stored in the progress file.
        number: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your hsm.json with a JSON linter")]
    ConfigParse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Console Errors
    // ========================================================================
    /// Reading learner input or writing to the terminal failed.
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad category of a [`MachineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lesson files or the course directory.
    Content,
    /// The progress file.
    Persistence,
    /// The progress marker against the catalog.
    Curriculum,
    /// The configuration file or overrides.
    Config,
    /// The learner's terminal.
    Console,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Persistence => write!(f, "persistence"),
            Self::Curriculum => write!(f, "curriculum"),
            Self::Config => write!(f, "config"),
            Self::Console => write!(f, "console"),
        }
    }
}

impl MachineError {
    /// Creates a new `ContentDirUnreadable` error.
    #[must_use]
    pub fn content_dir(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ContentDirUnreadable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ContentParse` error.
    #[must_use]
    pub fn content_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ContentParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ContentInvalid` error.
    #[must_use]
    pub fn content_invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ContentInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `DuplicateLesson` error.
    #[must_use]
    pub fn duplicate_lesson(
        number: impl std::fmt::Display,
        first: impl Into<PathBuf>,
        second: impl Into<PathBuf>,
    ) -> Self {
        Self::DuplicateLesson {
            number: number.to_string(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Creates a new `EmptyCourse` error.
    #[must_use]
    pub fn empty_course(path: impl Into<PathBuf>) -> Self {
        Self::EmptyCourse { path: path.into() }
    }

    /// Creates a new `ProgressRead` error.
    #[must_use]
    pub fn progress_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProgressRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ProgressCorrupted` error.
    #[must_use]
    pub fn progress_corrupted(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProgressCorrupted {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ProgressWrite` error.
    #[must_use]
    pub fn progress_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProgressWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `UnknownLesson` error.
    #[must_use]
    pub fn unknown_lesson(number: impl std::fmt::Display) -> Self {
        Self::UnknownLesson {
            number: number.to_string(),
        }
    }

    /// Creates a new `ConfigParse` error.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidation` error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ContentDirUnreadable { .. }
            | Self::ContentParse { .. }
            | Self::ContentInvalid { .. }
            | Self::DuplicateLesson { .. }
            | Self::EmptyCourse { .. } => ErrorKind::Content,
            Self::ProgressRead { .. }
            | Self::ProgressCorrupted { .. }
            | Self::ProgressWrite { .. } => ErrorKind::Persistence,
            Self::UnknownLesson { .. } => ErrorKind::Curriculum,
            Self::ConfigParse { .. } | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Console,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = MachineError::content_parse("/course/01.json", "expected value at line 1");
        let msg = err.to_string();
        assert!(msg.contains("Invalid lesson file"));
        assert!(msg.contains("/course/01.json"));
        assert!(msg.contains("Suggestion"));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Content.to_string(), "content");
        assert_eq!(ErrorKind::Persistence.to_string(), "persistence");
        assert_eq!(ErrorKind::Curriculum.to_string(), "curriculum");
    }

    #[test]
    fn test_kind_groups_variants() {
        assert_eq!(
            MachineError::empty_course("/course").kind(),
            ErrorKind::Content
        );
        assert_eq!(
            MachineError::duplicate_lesson("1.1", "a.json", "b.json").kind(),
            ErrorKind::Content
        );
        assert_eq!(
            MachineError::progress_write("/p.json", "denied").kind(),
            ErrorKind::Persistence
        );
        assert_eq!(
            MachineError::unknown_lesson("9.9").kind(),
            ErrorKind::Curriculum
        );
        assert_eq!(
            MachineError::config_validation("x", "y").kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_unknown_lesson_names_marker() {
        let msg = MachineError::unknown_lesson("4.2").to_string();
        assert!(msg.contains("'4.2'"));
    }

    #[test]
    fn test_duplicate_lesson_names_both_files() {
        let msg = MachineError::duplicate_lesson("1.1", "/c/a.json", "/c/b.json").to_string();
        assert!(msg.contains("/c/a.json"));
        assert!(msg.contains("/c/b.json"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: MachineError = io_err.into();
        assert!(matches!(err, MachineError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Console);
    }
}
