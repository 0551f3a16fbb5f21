//! Lesson records and lesson file parsing.
//!
//! A lesson file is a JSON object whose `frames` field is a list of raw
//! arrays: element 0 is the frame text, every following element is a list of
//! accepted answers. This module turns that loose shape into typed
//! [`Frame`] and [`AnswerGroup`] values and rejects anything else at load
//! time.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MachineError, Result};

// ============================================================================
// LessonNumber
// ============================================================================

/// Dotted lesson ordinal such as `"1.1"` or `"2.10"`.
///
/// Equality is plain string equality. Ordering compares `.`-separated
/// segments: numeric segments numerically, numbers before text, text
/// lexicographically, shorter prefixes first. Remaining ties fall back to the
/// raw string so that ordering agrees with equality.
///
/// # Examples
///
/// ```
/// use hsm_machine::LessonNumber;
///
/// assert!(LessonNumber::new("1.2") < LessonNumber::new("1.10"));
/// assert!(LessonNumber::new("1") < LessonNumber::new("1.1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonNumber(String);

impl LessonNumber {
    /// Creates a lesson number from its textual form.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Returns the number as written in the lesson file.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl Ord for LessonNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut ours = self.0.split('.');
        let mut theirs = other.0.split('.');
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return self.0.cmp(&other.0),
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => match compare_segment(a, b) {
                    Ordering::Equal => {}
                    unequal => return unequal,
                },
            }
        }
    }
}

impl PartialOrd for LessonNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for LessonNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LessonNumber {
    fn from(number: &str) -> Self {
        Self::new(number)
    }
}

// ============================================================================
// AnswerGroup and Frame
// ============================================================================

/// The answers accepted for one question of a frame.
///
/// Never empty. The first answer is the canonical one and seeds hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerGroup {
    answers: Vec<String>,
}

impl AnswerGroup {
    /// Creates a group from its accepted answers.
    ///
    /// Returns `None` when `answers` is empty.
    #[must_use]
    pub fn new(answers: Vec<String>) -> Option<Self> {
        if answers.is_empty() {
            None
        } else {
            Some(Self { answers })
        }
    }

    /// Returns the canonical answer.
    #[must_use]
    pub fn canonical(&self) -> &str {
        self.answers.first().map_or("", String::as_str)
    }

    /// Returns every accepted answer, canonical first.
    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Returns `true` if `input` is literally one of the accepted answers.
    #[must_use]
    pub fn accepts(&self, input: &str) -> bool {
        self.answers.iter().any(|answer| answer == input)
    }
}

/// One screen of instruction plus the questions asked about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Instructional text shown to the learner.
    pub text: String,

    /// Questions in the order they are asked.
    pub answer_groups: Vec<AnswerGroup>,
}

// ============================================================================
// Lesson
// ============================================================================

/// A lesson as read from its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    /// Identifying lesson number.
    pub number: LessonNumber,

    /// Display name.
    pub name: String,

    /// Supplementary exhibit text. Stored but not displayed.
    pub exhibit: Option<String>,

    /// Frames in presentation order.
    pub frames: Vec<Frame>,

    /// File the lesson was loaded from.
    pub source: PathBuf,
}

/// On-disk shape of a lesson file.
#[derive(Debug, Deserialize)]
struct RawLesson {
    lesson_number: String,
    lesson_name: String,
    #[serde(default)]
    exhibit: Option<String>,
    frames: Vec<Vec<Value>>,
}

impl Lesson {
    /// Loads and validates a lesson file.
    ///
    /// # Errors
    ///
    /// Returns `MachineError::ContentParse` if the file cannot be read or is
    /// not JSON, and `MachineError::ContentInvalid` if a required field is
    /// missing or a frame is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                MachineError::content_parse(path, "file is not valid UTF-8")
            } else {
                MachineError::content_parse(path, format!("failed to read file: {e}"))
            }
        })?;
        Self::from_json(path, &content)
    }

    /// Parses a lesson from JSON text, attributing errors to `source`.
    ///
    /// # Errors
    ///
    /// Same as [`Lesson::load`], minus the read failures.
    pub fn from_json(source: impl Into<PathBuf>, json: &str) -> Result<Self> {
        let source = source.into();
        let raw: RawLesson = serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                MachineError::content_invalid(&source, e.to_string())
            } else {
                MachineError::content_parse(&source, e.to_string())
            }
        })?;

        if raw.lesson_number.trim().is_empty() {
            return Err(MachineError::content_invalid(
                &source,
                "lesson_number must not be empty",
            ));
        }

        let frames = raw
            .frames
            .into_iter()
            .enumerate()
            .map(|(index, items)| parse_frame(index, items))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|message| MachineError::content_invalid(&source, message))?;

        Ok(Self {
            number: LessonNumber::new(raw.lesson_number),
            name: raw.lesson_name,
            exhibit: raw.exhibit,
            frames,
            source,
        })
    }

    /// Number of frames in the lesson.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Returns the frame at `index`, if any.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }
}

fn parse_frame(index: usize, items: Vec<Value>) -> std::result::Result<Frame, String> {
    let frame_no = index + 1;
    let mut items = items.into_iter();
    let text = match items.next() {
        Some(Value::String(text)) => text,
        Some(_) => return Err(format!("frame {frame_no}: first element must be the frame text")),
        None => return Err(format!("frame {frame_no}: frame is empty")),
    };

    let answer_groups = items
        .enumerate()
        .map(|(group, value)| parse_group(frame_no, group + 1, value))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Frame {
        text,
        answer_groups,
    })
}

fn parse_group(frame_no: usize, group_no: usize, value: Value) -> std::result::Result<AnswerGroup, String> {
    let Value::Array(values) = value else {
        return Err(format!(
            "frame {frame_no}, answer group {group_no}: expected a list of answers"
        ));
    };

    let answers = values
        .into_iter()
        .map(|value| match value {
            Value::String(answer) => Ok(answer),
            other => Err(format!(
                "frame {frame_no}, answer group {group_no}: answer {other} is not a string"
            )),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    AnswerGroup::new(answers)
        .ok_or_else(|| format!("frame {frame_no}, answer group {group_no}: no answers given"))
}
