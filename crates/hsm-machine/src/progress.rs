//! Learner progress and its persistence.
//!
//! Progress is a single small JSON record. It is owned by the session,
//! mutated through the methods below and written back with [`Progress::save`]
//! at explicit checkpoints.

use std::collections::{BTreeSet, VecDeque};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MachineError, Result};
use crate::lesson::{Lesson, LessonNumber};

/// Where the learner is in the course.
///
/// `current_frame_num` is the frame being worked on, or the lesson's frame
/// count once the lesson is finished. `frames_complete` only refers to the
/// current lesson and is cleared when the learner moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Lesson the learner is working through.
    pub current_lesson_num: LessonNumber,

    /// Zero-based index of the frame being worked on.
    pub current_frame_num: usize,

    /// Frames of the current lesson answered fully correctly.
    #[serde(default)]
    pub frames_complete: BTreeSet<usize>,

    /// When the progress was last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Progress {
    /// Creates progress positioned at the first frame of `lesson`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hsm_machine::{LessonNumber, Progress};
    ///
    /// let progress = Progress::new(LessonNumber::new("1.1"));
    /// assert_eq!(progress.current_frame_num, 0);
    /// assert!(progress.frames_complete.is_empty());
    /// ```
    #[must_use]
    pub const fn new(lesson: LessonNumber) -> Self {
        Self {
            current_lesson_num: lesson,
            current_frame_num: 0,
            frames_complete: BTreeSet::new(),
            updated_at: None,
        }
    }

    /// Reads progress from `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `MachineError::ProgressRead` if the file exists but cannot be
    /// read and `MachineError::ProgressCorrupted` if it is not a valid
    /// progress record.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MachineError::progress_read(path, e.to_string())),
        };

        let progress: Self = serde_json::from_str(&contents)
            .map_err(|e| MachineError::progress_corrupted(path, e.to_string()))?;
        tracing::debug!(
            path = %path.display(),
            lesson = %progress.current_lesson_num,
            frame = progress.current_frame_num,
            "Progress loaded"
        );
        Ok(Some(progress))
    }

    /// Reads progress from `path`, creating and saving a fresh record
    /// positioned at `first_lesson` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Progress::load`] and [`Progress::save`].
    pub fn load_or_create(path: impl AsRef<Path>, first_lesson: &LessonNumber) -> Result<Self> {
        let path = path.as_ref();
        if let Some(progress) = Self::load(path)? {
            return Ok(progress);
        }

        tracing::info!(path = %path.display(), lesson = %first_lesson, "Creating new progress file");
        let mut progress = Self::new(first_lesson.clone());
        progress.touch();
        progress.save(path)?;
        Ok(progress)
    }

    /// Writes progress to `path`, replacing any previous content.
    ///
    /// The record is written to a sibling `.tmp` file, synced and renamed
    /// over the target, so an interrupted save leaves the old file intact.
    ///
    /// # Errors
    ///
    /// Returns `MachineError::ProgressWrite` if any step fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let write_err = |e: &dyn std::fmt::Display| MachineError::progress_write(path, e.to_string());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_err(&e))?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|e| write_err(&e))?;

        replace_file(path, content.as_bytes()).map_err(|e| write_err(&e))?;

        tracing::debug!(
            path = %path.display(),
            lesson = %self.current_lesson_num,
            frame = self.current_frame_num,
            complete = self.frames_complete.len(),
            "Progress saved"
        );
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current time.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Makes `lesson` the current lesson.
    ///
    /// Moving to a different lesson resets the frame position and the
    /// completed set. Re-entering the stored lesson keeps them, dropping any
    /// frame index the lesson no longer has.
    ///
    /// Returns `true` if the stored position was reset.
    pub fn enter_lesson(&mut self, lesson: &Lesson) -> bool {
        if self.current_lesson_num != lesson.number {
            self.advance_to(&lesson.number);
            return true;
        }

        let count = lesson.frame_count();
        let before = self.frames_complete.len();
        self.frames_complete.retain(|&index| index < count);
        if self.frames_complete.len() != before || self.current_frame_num > count {
            tracing::warn!(
                lesson = %lesson.number,
                frames = count,
                stored_frame = self.current_frame_num,
                "Stored progress does not fit the lesson, dropping out-of-range frames"
            );
            self.current_frame_num = self.current_frame_num.min(count);
            self.touch();
        }
        false
    }

    /// Frames of a `frame_count`-frame lesson still to be answered.
    ///
    /// Starts at the current frame and wraps around to earlier frames that
    /// were answered incorrectly before.
    #[must_use]
    pub fn pending_frames(&self, frame_count: usize) -> VecDeque<usize> {
        let start = self.current_frame_num.min(frame_count);
        (start..frame_count)
            .chain(0..start)
            .filter(|index| !self.frames_complete.contains(index))
            .collect()
    }

    /// Marks `index` as the frame being worked on.
    pub fn begin_frame(&mut self, index: usize) {
        self.current_frame_num = index;
        self.touch();
    }

    /// Records `index` as answered correctly and moves past it.
    pub fn complete_frame(&mut self, index: usize) {
        self.frames_complete.insert(index);
        self.current_frame_num = index + 1;
        self.touch();
    }

    /// Moves to the start of another lesson.
    pub fn advance_to(&mut self, lesson: &LessonNumber) {
        self.current_lesson_num = lesson.clone();
        self.current_frame_num = 0;
        self.frames_complete.clear();
        self.touch();
    }

    /// Marks the current lesson as finished without moving on.
    pub fn finish_lesson(&mut self, lesson: &Lesson) {
        self.current_frame_num = lesson.frame_count();
        self.touch();
    }
}

/// Writes `contents` to a synced sibling temp file and renames it over
/// `path`. The temp file is removed if any step fails.
fn replace_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let temp_path = temp_path_for(path);
    let result = write_synced(&temp_path, contents).and_then(|()| std::fs::rename(&temp_path, path));
    if result.is_err() {
        std::fs::remove_file(&temp_path).ok();
    }
    result
}

fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("progress"), OsString::from);
    name.push(".tmp");
    path.with_file_name(name)
}
