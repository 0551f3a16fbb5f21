//! Frame quizzing.
//!
//! Each answer group of a frame is one question. A question moves through
//! the states below until it resolves:
//!
//! ```text
//! Prompting --?--> Hinting --?--> ... --?--> Revealed
//!     |               |                        |
//!     +------ match / other / q / EOF ---------+--> Resolved
//! ```
//!
//! `h` prints help and leaves the state unchanged. Once the whole canonical
//! answer has been revealed, another `?` counts as a wrong answer.

use std::io::{BufRead, Write};

use crate::console::{Console, ANSWER_INSTRUCTIONS};
use crate::error::Result;
use crate::lesson::{AnswerGroup, Frame};

/// Result of quizzing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every question was answered with an accepted answer.
    AllCorrect,
    /// At least one question was answered wrongly.
    SomeIncorrect,
    /// The learner quit; remaining questions were not asked.
    Quit,
}

/// How a single question ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The learner typed an accepted answer.
    Correct,
    /// The learner typed something else.
    Incorrect,
    /// The learner quit or input ended.
    Quit,
}

/// State of one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    /// Waiting for an answer, no hint given yet.
    Prompting,
    /// Waiting for an answer after a partial hint.
    Hinting,
    /// The full canonical answer has been shown.
    Revealed,
    /// The question is over.
    Resolved(Resolution),
}

/// One line of learner input, classified against the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnerInput {
    /// Literally one of the accepted answers.
    Match,
    /// `q`.
    Quit,
    /// `?`.
    Hint,
    /// `h`.
    Help,
    /// Anything else.
    Other,
    /// Input ended.
    Eof,
}

impl LearnerInput {
    /// Classifies `line` for `group`. Accepted answers take precedence over
    /// commands.
    #[must_use]
    pub fn classify(line: Option<&str>, group: &AnswerGroup) -> Self {
        match line {
            None => Self::Eof,
            Some(line) if group.accepts(line) => Self::Match,
            Some("q") => Self::Quit,
            Some("?") => Self::Hint,
            Some("h") => Self::Help,
            Some(_) => Self::Other,
        }
    }
}

/// Growing prefix of the canonical answer.
///
/// Counts characters, not bytes, and never grows past the answer.
#[derive(Debug, Clone)]
pub struct Hint<'a> {
    answer: &'a str,
    shown: usize,
}

impl<'a> Hint<'a> {
    /// Starts with an empty hint for `answer`.
    #[must_use]
    pub const fn new(answer: &'a str) -> Self {
        Self { answer, shown: 0 }
    }

    /// Reveals one more character. Returns `false` if the answer was
    /// already fully shown.
    pub fn reveal_more(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.shown += 1;
        true
    }

    /// Number of characters shown so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.shown
    }

    /// Returns `true` if nothing has been revealed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shown == 0
    }

    /// Returns `true` once the whole answer is shown.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shown >= self.answer.chars().count()
    }

    /// The revealed prefix.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.answer
            .char_indices()
            .nth(self.shown)
            .map_or(self.answer, |(end, _)| &self.answer[..end])
    }
}

/// Applies one input to a question.
///
/// Hint requests grow `hint`; every other effect is expressed by the
/// returned state.
#[must_use]
pub fn transition(state: QuestionState, input: LearnerInput, hint: &mut Hint<'_>) -> QuestionState {
    match (state, input) {
        (QuestionState::Resolved(_), _) => state,
        (_, LearnerInput::Match) => QuestionState::Resolved(Resolution::Correct),
        (_, LearnerInput::Quit | LearnerInput::Eof) => QuestionState::Resolved(Resolution::Quit),
        (_, LearnerInput::Help) => state,
        (QuestionState::Revealed, LearnerInput::Hint) | (_, LearnerInput::Other) => {
            QuestionState::Resolved(Resolution::Incorrect)
        }
        (_, LearnerInput::Hint) => {
            hint.reveal_more();
            if hint.is_complete() {
                QuestionState::Revealed
            } else {
                QuestionState::Hinting
            }
        }
    }
}

/// Asks question `number` (1-based) until it resolves.
///
/// # Errors
///
/// Returns `MachineError::Io` if the console fails.
pub fn ask<R: BufRead, W: Write>(
    number: usize,
    group: &AnswerGroup,
    console: &mut Console<R, W>,
) -> Result<Resolution> {
    let prompt = format!("{number}: ");
    let mut hint = Hint::new(group.canonical());
    let mut state = QuestionState::Prompting;

    loop {
        if let QuestionState::Resolved(resolution) = state {
            return Ok(resolution);
        }

        console.line(ANSWER_INSTRUCTIONS)?;
        let line = console.read_line(&prompt)?;
        let input = LearnerInput::classify(line.as_deref(), group);
        state = transition(state, input, &mut hint);

        match (input, state) {
            (_, QuestionState::Resolved(Resolution::Correct)) => console.verdict(group, true)?,
            (_, QuestionState::Resolved(Resolution::Incorrect)) => {
                console.verdict(group, false)?;
            }
            (LearnerInput::Hint, QuestionState::Hinting | QuestionState::Revealed) => {
                console.line(hint.text())?;
            }
            (LearnerInput::Help, _) => console.help()?,
            _ => {}
        }
        tracing::trace!(question = number, ?input, ?state, hint = hint.len(), "Question step");
    }
}

/// Quizzes every question of `frame` in order.
///
/// Stops at the first quit. A frame without questions is `AllCorrect`.
///
/// # Errors
///
/// Returns `MachineError::Io` if the console fails.
pub fn evaluate<R: BufRead, W: Write>(frame: &Frame, console: &mut Console<R, W>) -> Result<Outcome> {
    let mut all_correct = true;
    for (index, group) in frame.answer_groups.iter().enumerate() {
        match ask(index + 1, group, console)? {
            Resolution::Correct => {}
            Resolution::Incorrect => all_correct = false,
            Resolution::Quit => return Ok(Outcome::Quit),
        }
    }
    Ok(if all_correct {
        Outcome::AllCorrect
    } else {
        Outcome::SomeIncorrect
    })
}
