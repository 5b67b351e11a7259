//! Two-choice confirmation gate for destructive operations.

use std::io::{BufRead, Write};

use tracing::debug;

/// Outcome of a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

/// What the user is being asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
}

impl Prompt {
    pub fn remove_item(title: &str) -> Self {
        Self {
            title: "Remove item?".to_string(),
            message: format!("\"{title}\" will be removed from the list."),
        }
    }

    pub fn clear_all() -> Self {
        Self {
            title: "Clear everything?".to_string(),
            message: "All items will be deleted.".to_string(),
        }
    }
}

/// Asks the user to confirm or cancel.
pub trait Confirm {
    fn confirm(&mut self, prompt: &Prompt) -> Decision;
}

/// Confirms every prompt without asking (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &Prompt) -> Decision {
        debug!(title = %prompt.title, "confirmation assumed");
        Decision::Confirm
    }
}

/// Line-oriented prompt: `y`/`yes` confirms, anything else cancels.
///
/// End of input and read errors cancel.
pub struct TerminalConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, prompt: &Prompt) -> Decision {
        let written = write!(
            self.output,
            "{}\n{}\n[y/N] ",
            prompt.title, prompt.message
        )
        .and_then(|()| self.output.flush());
        if written.is_err() {
            return Decision::Cancel;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => Decision::Cancel,
            Ok(_) => parse_answer(&answer),
        }
    }
}

fn parse_answer(answer: &str) -> Decision {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Decision::Confirm,
        _ => Decision::Cancel,
    }
}
