//! Line-oriented learner terminal.
//!
//! [`Console`] wraps any `BufRead` + `Write` pair so that sessions can be
//! driven from stdin/stdout or from in-memory buffers in tests. The
//! `render_*` functions build the screens as plain strings.

use std::fmt::Write as _;
use std::io::{BufRead, StdinLock, Stdout, Write};

use crate::error::Result;
use crate::lesson::{AnswerGroup, Lesson, LessonNumber};

/// Banner shown when a session starts.
pub const WELCOME: &str = "Welcome to Holland-Skinner Teaching Machine!";

/// Instruction line shown before every answer prompt.
pub const ANSWER_INSTRUCTIONS: &str = "[q]uit, [h]elp, or [?] to get prompt.";

/// Instruction line shown under the course contents.
pub const PROCEED_INSTRUCTIONS: &str = "[q]uit, [h]elp or [Enter] to proceed:";

/// Shown once every lesson of the course is finished.
pub const COURSE_COMPLETE: &str = "You have completed every lesson in the course. Well done!";

/// Shown when the learner quits.
pub const GOODBYE: &str = "Your progress has been saved. Goodbye!";

/// Marker appended to the current lesson in the course contents.
pub const CURRENT_MARKER: &str = "<-- current lesson";

const SCREEN_WIDTH: usize = 80;
const MARKER_COLUMN: usize = 65;
const NUMBER_WIDTH: usize = 4;
const NAME_WIDTH: usize = 60;

const HELP: &str = "\
Type your answer and press Enter.
  ?  reveal one more letter of the answer
  h  show this help
  q  save your progress and quit";

/// Learner terminal over an input and an output stream.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console over the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console over the given streams.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the console, returning its streams.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Shows `prompt` and reads one line of input.
    ///
    /// The line terminator is stripped; nothing else is trimmed. Bytes that
    /// are not valid UTF-8 are replaced with U+FFFD. Returns `Ok(None)` at
    /// end of input.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            // Keep the transcript tidy when input ends without a newline.
            writeln!(self.output)?;
            return Ok(None);
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Writes `text` followed by a newline.
    pub fn line(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Writes a pre-rendered block as-is.
    pub fn block(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    /// Shows the command help.
    pub fn help(&mut self) -> Result<()> {
        self.line(HELP)
    }

    /// Lists every accepted answer of `group`, then the verdict.
    pub fn verdict(&mut self, group: &AnswerGroup, correct: bool) -> Result<()> {
        for answer in group.answers() {
            writeln!(self.output, "   {answer}")?;
        }
        self.line(if correct { "Correct!" } else { "Incorrect!" })
    }
}

/// Renders the welcome banner centred on an 80 column screen.
#[must_use]
pub fn render_welcome() -> String {
    format!("\n{}\n\n", format!("{WELCOME:^SCREEN_WIDTH$}").trim_end())
}

/// Renders the course contents with `current` upper-cased and marked.
///
/// # Examples
///
/// ```
/// use hsm_machine::console::render_catalog;
/// use hsm_machine::{Lesson, LessonNumber};
///
/// let lesson = Lesson::from_json(
///     "1.json",
///     r#"{"lesson_number": "1", "lesson_name": "Intro", "frames": []}"#,
/// ).unwrap();
/// let screen = render_catalog(&[lesson], &LessonNumber::new("1"));
/// assert!(screen.contains("1 INTRO"));
/// assert!(screen.contains("<-- current lesson"));
/// ```
#[must_use]
pub fn render_catalog(lessons: &[Lesson], current: &LessonNumber) -> String {
    let mut screen = String::from("Course contents:\n\n");
    for lesson in lessons {
        if &lesson.number == current {
            let width = MARKER_COLUMN.saturating_sub(lesson.name.chars().count());
            let _ = writeln!(
                screen,
                "{} {} {CURRENT_MARKER:>width$}",
                lesson.number,
                lesson.name.to_uppercase()
            );
        } else {
            let _ = writeln!(screen, "{} {}", lesson.number, lesson.name);
        }
    }
    screen.push('\n');
    screen
}

/// Renders the header and text of frame `index` of `lesson`.
///
/// Returns `None` if the lesson has no such frame.
#[must_use]
pub fn render_frame(lesson: &Lesson, index: usize) -> Option<String> {
    let frame = lesson.frame(index)?;
    let number = lesson.number.as_str();
    let name = lesson.name.as_str();
    Some(format!(
        "\n{number:<NUMBER_WIDTH$} {name:<NAME_WIDTH$}Frame {}/{}\n\n{}\n\n",
        index + 1,
        lesson.frame_count(),
        frame.text
    ))
}
