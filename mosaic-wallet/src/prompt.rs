//! Interactive input
//!
//! The flows read user input through [`Prompter`] so a scripted source can
//! stand in for the terminal.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use zeroize::Zeroizing;

/// Source of user input.
pub trait Prompter {
    /// Read a hidden line (passwords)
    fn password(&mut self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Read a visible line, without the trailing newline
    fn line(&mut self, prompt: &str) -> Result<String>;
}

/// Reads from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn password(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let password = rpassword::read_password()?;
        Ok(Zeroizing::new(password))
    }

    fn line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;

        Ok(input.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string())
    }
}

/// True for exactly "y" or "yes", ignoring case
pub fn is_affirmative(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
