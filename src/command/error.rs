use crate::engine::EngineError;
use std::num::ParseIntError;
use thiserror::Error;

/// Errors raised while interpreting a command or preparing migration files.
///
/// Every variant is terminal for the current invocation. The engine's
/// no-change sentinel never reaches this type: the dispatcher turns it into
/// [`Outcome::NoChange`](super::Outcome::NoChange).
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Malformed migration filename: {0}")]
    MalformedName(String),

    #[error("Invalid sequence number {token:?}: {source}")]
    NonNumericToken {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Next sequence number must be positive")]
    NonPositiveSequence,

    #[error("Next sequence number {value} too large. At most {digits} digits are allowed")]
    SequenceOverflow { value: String, digits: usize },

    #[error("{0}")]
    ConflictingFlags(String),

    #[error("can't read limit argument {0}")]
    NonNumericArgument(String),

    #[error("too many arguments")]
    TooManyArguments,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid file pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error(transparent)]
    EngineError(#[from] EngineError),
}
