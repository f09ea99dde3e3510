//! Error types for the command driver
//!
//! The cache itself has no error channel: a miss is `None` and writes always
//! succeed. Only the command driver can fail, while parsing its input or
//! rendering a reply.

use thiserror::Error;

// == Command Error Enum ==
#[derive(Error, Debug)]
pub enum CommandError {
    /// Line was empty after stripping comments and the clock prefix
    #[error("Empty command")]
    Empty,

    /// Unknown command word
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Wrong number of arguments for a known command
    #[error("{command} expects {expected} argument(s), got {got}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        got: usize,
    },

    /// An argument could not be parsed as a number
    #[error("Invalid {name}: '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    /// Output could not be rendered as JSON
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the command driver.
pub type Result<T> = std::result::Result<T, CommandError>;
