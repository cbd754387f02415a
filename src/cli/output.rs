//! Terminal output: colored text or JSON

use crate::error::Result;
use colored::Colorize;
use serde::Serialize;

/// Formats command results for the terminal
///
/// In JSON mode only `print_json`/`json` write to stdout; status lines are
/// suppressed so the output stays machine-readable.
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    json: bool,
    color: bool,
}

impl OutputFormatter {
    #[must_use]
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self {
            json,
            color: !no_color,
        }
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    pub fn success(&self, message: &str) {
        if self.json {
            return;
        }
        if self.color {
            println!("{}", message.green());
        } else {
            println!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        if self.json {
            return;
        }
        if self.color {
            eprintln!("{}", message.yellow());
        } else {
            eprintln!("{message}");
        }
    }

    pub fn error(&self, message: &str) {
        if self.color {
            eprintln!("{} {}", "Error:".red().bold(), message);
        } else {
            eprintln!("Error: {message}");
        }
    }

    /// Pretty-prints any serializable value
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Prints a value as JSON only when in JSON mode
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        if self.json {
            self.print_json(value)?;
        }
        Ok(())
    }

    /// Bold heading, plain when color is off
    #[must_use]
    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Dimmed secondary text
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
