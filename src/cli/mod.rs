//! Command-line interface

mod commands;
pub mod handlers;
mod output;

pub use commands::{Cli, Commands};
pub use output::OutputFormatter;
