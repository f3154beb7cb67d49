//! CLI support for fern-lang
//!
//! The `fern` binary is a thin wrapper over these functions, which can also be
//! driven programmatically (the integration tests do).

mod commands;

pub use commands::{EvalOptions, dump_tokens, execute, export_json, print_declarations, run_eval};

use std::io::StdinLock;
use std::path::PathBuf;

use thiserror::Error;

use crate::buffer::{BufferError, ConsoleBuffer, FileBuffer};
use crate::evaluator::EvalError;
use crate::lexer::Lexer;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No input provided. Give a file, use --code or pipe code to stdin.")]
    NoInput,

    /// `--entry` names nothing that was parsed
    #[error("No declaration named '{0}'")]
    UnknownEntry(String),

    #[error("Invalid binding '{0}', expected name=number")]
    InvalidBinding(String),
}

/// Where the code comes from.
#[derive(Debug, Clone)]
pub enum Source {
    File(PathBuf),
    Code(String),
    Stdin,
}

/// What to do with the code.
#[derive(Debug, Clone)]
pub enum Command {
    Tokens,
    Print,
    Eval(EvalOptions),
    Json { pretty: bool },
}

/// Run `command` over `source` and return what should be printed.
pub fn run(command: &Command, source: Source) -> Result<String, CliError> {
    match source {
        Source::File(path) => execute(command, Lexer::from_buffer(FileBuffer::open(path)?)),
        Source::Code(code) => execute(command, Lexer::new(&code)),
        Source::Stdin => execute(
            command,
            Lexer::from_buffer(ConsoleBuffer::<StdinLock<'static>>::stdin()),
        ),
    }
}

/// Parse a `name=value` binding given with `--var`.
pub fn parse_binding(text: &str) -> Result<(String, f64), CliError> {
    let invalid = || CliError::InvalidBinding(text.to_string());

    let (name, value) = text.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    let value = value.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binding() {
        let (name, value) = parse_binding("x=2.5").unwrap();
        assert_eq!(name, "x");
        assert_eq!(value, 2.5);

        assert!(matches!(parse_binding("x"), Err(CliError::InvalidBinding(_))));
        assert!(matches!(parse_binding("=1"), Err(CliError::InvalidBinding(_))));
        assert!(matches!(parse_binding("x=abc"), Err(CliError::InvalidBinding(_))));
    }
}
