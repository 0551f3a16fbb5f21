//! The lessons left to study in this session.

use crate::error::{MachineError, Result};
use crate::lesson::{Lesson, LessonNumber};

/// Ordered run of lessons from the learner's current lesson to the end of
/// the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Curriculum<'a> {
    lessons: &'a [Lesson],
}

/// Builds the curriculum starting at `current`.
///
/// `lessons` must already be in catalog order.
///
/// # Errors
///
/// Returns `MachineError::UnknownLesson` if no lesson has number `current`.
pub fn build<'a>(lessons: &'a [Lesson], current: &LessonNumber) -> Result<Curriculum<'a>> {
    let start = lessons
        .iter()
        .position(|lesson| &lesson.number == current)
        .ok_or_else(|| MachineError::unknown_lesson(current))?;

    tracing::debug!(
        start = %current,
        remaining = lessons.len() - start,
        "Curriculum built"
    );
    Ok(Curriculum {
        lessons: &lessons[start..],
    })
}

impl<'a> Curriculum<'a> {
    /// Lessons in study order.
    #[must_use]
    pub const fn lessons(&self) -> &'a [Lesson] {
        self.lessons
    }

    /// Number of lessons left.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lessons.len()
    }

    /// Returns `true` if no lessons remain.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// The lesson the session starts with.
    #[must_use]
    pub fn first(&self) -> Option<&'a Lesson> {
        self.lessons.first()
    }

    /// The lesson following `number`, if both are part of the curriculum.
    #[must_use]
    pub fn next_after(&self, number: &LessonNumber) -> Option<&'a Lesson> {
        let index = self.lessons.iter().position(|l| &l.number == number)?;
        self.lessons.get(index + 1)
    }

    /// Iterates over the lessons in study order.
    pub fn iter(&self) -> std::slice::Iter<'a, Lesson> {
        self.lessons.iter()
    }
}

impl<'a> IntoIterator for Curriculum<'a> {
    type Item = &'a Lesson;
    type IntoIter = std::slice::Iter<'a, Lesson>;

    fn into_iter(self) -> Self::IntoIter {
        self.lessons.iter()
    }
}
