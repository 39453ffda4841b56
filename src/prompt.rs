//! Yes/no decisions.
//!
//! Library code never reads from the terminal itself; it asks a
//! [`Decider`]. The binary passes a [`ConsolePrompter`], tests and
//! non-interactive runs pass a [`FixedAnswer`].

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::error::Result;

/// Answers yes/no questions.
pub trait Decider {
    fn agree(&self, question: &str, default: bool) -> Result<bool>;
}

/// Asks on the terminal.
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Decider for ConsolePrompter {
    fn agree(&self, question: &str, default: bool) -> Result<bool> {
        let theme = ColorfulTheme::default();
        Ok(Confirm::with_theme(&theme)
            .with_prompt(question)
            .default(default)
            .interact()?)
    }
}

/// Gives the same answer to every question.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Decider for FixedAnswer {
    fn agree(&self, _question: &str, _default: bool) -> Result<bool> {
        Ok(self.0)
    }
}
