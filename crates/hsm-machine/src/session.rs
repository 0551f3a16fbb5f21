//! One study session from startup to completion or quit.
//!
//! The session owns the learner's [`Progress`] and saves it at every
//! checkpoint: lesson entry, frame start, frame completion, lesson
//! completion and quit. Killing the process between checkpoints loses at
//! most the frame being answered.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::console::{
    render_catalog, render_frame, render_welcome, Console, COURSE_COMPLETE, GOODBYE,
    PROCEED_INSTRUCTIONS,
};
use crate::curriculum;
use crate::error::{MachineError, Result};
use crate::evaluator::{evaluate, Outcome};
use crate::lesson::Lesson;
use crate::progress::Progress;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every remaining lesson was worked through.
    Completed,
    /// The learner quit; progress was saved first.
    Quit,
}

/// A study session over a loaded course.
#[derive(Debug)]
pub struct Session<R, W> {
    catalog: Catalog,
    progress_path: PathBuf,
    show_banner: bool,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session that stores progress at `progress_path`.
    pub fn new(catalog: Catalog, progress_path: impl Into<PathBuf>, console: Console<R, W>) -> Self {
        Self {
            catalog,
            progress_path: progress_path.into(),
            show_banner: true,
            console,
        }
    }

    /// Sets whether the welcome banner is printed.
    #[must_use]
    pub const fn with_banner(mut self, show: bool) -> Self {
        self.show_banner = show;
        self
    }

    /// Consumes the session, returning its console.
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Runs the session until the course is finished or the learner quits.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from loading or saving progress,
    /// `MachineError::UnknownLesson` if the stored lesson is not in the
    /// catalog, and `MachineError::Io` on terminal failure.
    pub fn run(&mut self) -> Result<SessionOutcome> {
        let Self {
            catalog,
            progress_path,
            show_banner,
            console,
        } = self;
        let path = progress_path.as_path();

        let first = catalog
            .first()
            .ok_or_else(|| MachineError::empty_course(catalog.directory()))?;
        let mut progress = Progress::load_or_create(path, &first.number)?;
        let curriculum = curriculum::build(catalog.lessons(), &progress.current_lesson_num)?;

        if *show_banner {
            console.block(&render_welcome())?;
        }
        console.block(&render_catalog(catalog.lessons(), &progress.current_lesson_num))?;
        if !confirm_start(console)? {
            return quit(&progress, path, console);
        }

        tracing::info!(
            lesson = %progress.current_lesson_num,
            frame = progress.current_frame_num,
            remaining = curriculum.len(),
            "Session started"
        );

        for lesson in curriculum {
            if progress.enter_lesson(lesson) {
                tracing::info!(lesson = %lesson.number, name = %lesson.name, "Entering lesson");
            }
            progress.save(path)?;

            if !study_lesson(lesson, &mut progress, path, console)? {
                return quit(&progress, path, console);
            }

            match curriculum.next_after(&lesson.number) {
                Some(next) => progress.advance_to(&next.number),
                None => progress.finish_lesson(lesson),
            }
            progress.save(path)?;
            tracing::info!(lesson = %lesson.number, "Lesson complete");
        }

        console.line(COURSE_COMPLETE)?;
        tracing::info!("Course complete");
        Ok(SessionOutcome::Completed)
    }
}

/// Shows the proceed prompt. Returns `false` if the learner quits.
fn confirm_start<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<bool> {
    let prompt = format!("{PROCEED_INSTRUCTIONS} ");
    loop {
        match console.read_line(&prompt)?.as_deref() {
            None | Some("q") => return Ok(false),
            Some("h") => console.help()?,
            Some(_) => return Ok(true),
        }
    }
}

/// Works through the pending frames of `lesson`, re-asking wrongly answered
/// frames until all are correct. Returns `false` if the learner quits.
fn study_lesson<R: BufRead, W: Write>(
    lesson: &Lesson,
    progress: &mut Progress,
    path: &Path,
    console: &mut Console<R, W>,
) -> Result<bool> {
    let mut pending: VecDeque<usize> = progress.pending_frames(lesson.frame_count());
    tracing::debug!(lesson = %lesson.number, pending = pending.len(), "Studying lesson");

    while let Some(index) = pending.pop_front() {
        let (Some(frame), Some(screen)) = (lesson.frame(index), render_frame(lesson, index)) else {
            continue;
        };

        progress.begin_frame(index);
        progress.save(path)?;
        console.block(&screen)?;

        match evaluate(frame, console)? {
            Outcome::AllCorrect => {
                progress.complete_frame(index);
                progress.save(path)?;
            }
            Outcome::SomeIncorrect => {
                tracing::debug!(lesson = %lesson.number, frame = index, "Frame re-queued");
                pending.push_back(index);
            }
            Outcome::Quit => return Ok(false),
        }
    }
    Ok(true)
}

fn quit<R: BufRead, W: Write>(
    progress: &Progress,
    path: &Path,
    console: &mut Console<R, W>,
) -> Result<SessionOutcome> {
    progress.save(path)?;
    console.line(GOODBYE)?;
    tracing::info!(
        lesson = %progress.current_lesson_num,
        frame = progress.current_frame_num,
        "Session quit"
    );
    Ok(SessionOutcome::Quit)
}
