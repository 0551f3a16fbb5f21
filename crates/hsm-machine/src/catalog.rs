//! Course directory scanning.
//!
//! Every non-hidden file in the course directory is one lesson. The catalog
//! is the full set of lessons sorted by [`LessonNumber`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{MachineError, Result};
use crate::lesson::{Lesson, LessonNumber};

/// Lists and parses every lesson in `directory`, sorted by lesson number.
///
/// Entries whose name starts with `.` are ignored, as are subdirectories.
/// Files are parsed in path order, so the first malformed file reported is
/// the same on every platform.
///
/// # Errors
///
/// Returns `MachineError::ContentDirUnreadable` if the directory cannot be
/// listed, the parse error of the first malformed lesson file,
/// `MachineError::DuplicateLesson` if two files share a lesson number, and
/// `MachineError::EmptyCourse` if no lesson is found.
pub fn list_lessons(directory: impl AsRef<Path>) -> Result<Vec<Lesson>> {
    let directory = directory.as_ref();
    let entries = std::fs::read_dir(directory)
        .map_err(|e| MachineError::content_dir(directory, e.to_string()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MachineError::content_dir(directory, e.to_string()))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "Skipping non-file course entry");
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    let mut seen: HashMap<LessonNumber, PathBuf> = HashMap::new();
    let mut lessons = Vec::with_capacity(paths.len());
    for path in paths {
        let lesson = Lesson::load(&path)?;
        if let Some(first) = seen.get(&lesson.number) {
            return Err(MachineError::duplicate_lesson(
                &lesson.number,
                first,
                &lesson.source,
            ));
        }
        tracing::debug!(
            number = %lesson.number,
            frames = lesson.frame_count(),
            path = %path.display(),
            "Lesson loaded"
        );
        seen.insert(lesson.number.clone(), lesson.source.clone());
        lessons.push(lesson);
    }

    if lessons.is_empty() {
        return Err(MachineError::empty_course(directory));
    }

    lessons.sort_by(|a, b| a.number.cmp(&b.number));
    Ok(lessons)
}

/// The sorted set of lessons available in a course directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    directory: PathBuf,
    lessons: Vec<Lesson>,
}

impl Catalog {
    /// Loads every lesson from `directory`.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`list_lessons`].
    pub fn load(directory: impl AsRef<Path>) -> Result<Self> {
        let directory = directory.as_ref();
        let lessons = list_lessons(directory)?;
        tracing::info!(
            directory = %directory.display(),
            lessons = lessons.len(),
            "Course catalog loaded"
        );
        Ok(Self {
            directory: directory.to_path_buf(),
            lessons,
        })
    }

    /// Builds a catalog from already parsed lessons, sorting them.
    ///
    /// # Errors
    ///
    /// Returns `MachineError::EmptyCourse` if `lessons` is empty and
    /// `MachineError::DuplicateLesson` if two lessons share a number.
    pub fn from_lessons(directory: impl Into<PathBuf>, mut lessons: Vec<Lesson>) -> Result<Self> {
        let directory = directory.into();
        if lessons.is_empty() {
            return Err(MachineError::empty_course(directory));
        }
        lessons.sort_by(|a, b| a.number.cmp(&b.number));
        if let Some(pair) = lessons.windows(2).find(|w| w[0].number == w[1].number) {
            return Err(MachineError::duplicate_lesson(
                &pair[1].number,
                &pair[0].source,
                &pair[1].source,
            ));
        }
        Ok(Self { directory, lessons })
    }

    /// Directory the catalog was read from.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// All lessons in catalog order.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// The first lesson of the course.
    #[must_use]
    pub fn first(&self) -> Option<&Lesson> {
        self.lessons.first()
    }

    /// Finds a lesson by number.
    #[must_use]
    pub fn find(&self, number: &LessonNumber) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| &lesson.number == number)
    }

    /// Position of a lesson in catalog order.
    #[must_use]
    pub fn position(&self, number: &LessonNumber) -> Option<usize> {
        self.lessons.iter().position(|lesson| &lesson.number == number)
    }
}
