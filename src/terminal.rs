//! User interaction for the commit workflow.
//!
//! The workflow talks to the user only through [`Terminal`], so tests can
//! script key presses and feedback without a TTY.

use console::{Key, Term, style};
use dialoguer::{Confirm, Input};

use crate::error::TerminalError;

/// A single key press read during the decision step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Interrupt,
    Other,
}

#[cfg_attr(test, mockall::automock)]
pub trait Terminal {
    /// Progress line, e.g. while waiting on the model.
    fn show_status(&self, status: &str);

    /// Display a candidate commit message and the available keys.
    fn show_candidate(&self, message: &str);

    /// Block for one key press.
    fn read_key(&self) -> Result<KeyInput, TerminalError>;

    /// Ask for free-form feedback. May return an empty string.
    fn read_feedback(&self) -> Result<String, TerminalError>;

    fn show_commit_failure(&self, detail: &str);

    /// Ask whether to retry a failed commit. Defaults to no.
    fn confirm_retry(&self) -> Result<bool, TerminalError>;

    fn show_committed(&self);
}

/// [`Terminal`] on the process's controlling terminal.
///
/// Output goes to stdout. Keys are read through stderr, like dialoguer's
/// prompts, so redirecting stdout to a file keeps the workflow interactive.
pub struct ConsoleTerminal {
    term: Term,
    input: Term,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            input: Term::stderr(),
        }
    }

    fn line(&self, text: &str) {
        // Output failures on a closed stdout are not actionable.
        let _ = self.term.write_line(text);
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for ConsoleTerminal {
    fn show_status(&self, status: &str) {
        self.line(&format!("{}", style(status).dim()));
    }

    fn show_candidate(&self, message: &str) {
        self.line("");
        self.line(&format!("{}", style("Generated Commit Message:").bold()));
        self.line("");
        for line in message.lines() {
            self.line(&format!("  {}", line));
        }
        self.line("");
        self.line(&format!(
            "{}: Commit message / {}: Regenerate / {}: Quit",
            style("c").cyan(),
            style("r").cyan(),
            style("q").cyan()
        ));
    }

    fn read_key(&self) -> Result<KeyInput, TerminalError> {
        // console answers Key::Unknown without blocking when not attached.
        if !self.input.is_term() {
            return Err(TerminalError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "not a terminal",
            )));
        }

        let key = match self.input.read_key() {
            Ok(key) => key,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => return Ok(KeyInput::Interrupt),
            Err(e) => return Err(TerminalError::from(e)),
        };

        let input = match key {
            Key::Char('\u{3}') => KeyInput::Interrupt,
            Key::Char(c) => KeyInput::Char(c),
            _ => KeyInput::Other,
        };

        Ok(input)
    }

    fn read_feedback(&self) -> Result<String, TerminalError> {
        self.line("");
        let feedback: String = Input::new()
            .with_prompt("Provide feedback to refine the commit message")
            .allow_empty(true)
            .interact_text()?;
        Ok(feedback)
    }

    fn show_commit_failure(&self, detail: &str) {
        self.line(&format!("{} {}", style("Commit failed:").red().bold(), detail));
        self.line("");
    }

    fn confirm_retry(&self) -> Result<bool, TerminalError> {
        let retry = Confirm::new()
            .with_prompt("Retry?")
            .default(false)
            .interact()?;
        Ok(retry)
    }

    fn show_committed(&self) {
        self.line(&format!("{}", style("Committed successfully!").green().bold()));
    }
}
