//! Error types for jaybro
//!
//! One error enum covers the whole crate. The two document errors are fatal
//! and reported before the session starts; everything else is recovered
//! in-loop and rendered as a message.

use std::io;
use thiserror::Error;

/// Main error type for browse operations
#[derive(Error, Debug)]
pub enum BrowseError {
    /// Document file could not be read
    #[error("cannot read '{path}': {source}")]
    DocumentLoad {
        /// File path (or "stdin") that failed to load
        path: String,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// Document is not well-formed JSON
    #[error("invalid JSON: {message}")]
    DocumentParse {
        /// 1-based line of the first parse failure
        line: usize,
        /// 1-based column of the first parse failure
        column: usize,
        /// Parser message, including the location
        message: String,
    },

    /// Path does not resolve against the loaded document
    #[error("path not found: '{path}' (longest valid prefix: {valid_prefix})")]
    PathNotFound {
        /// The path as the user typed it
        path: String,
        /// Longest leading portion that did resolve, `(root)` when none
        valid_prefix: String,
    },

    /// Malformed path text
    #[error("invalid path: {0}")]
    PathSyntax(String),

    /// Unknown or unimplemented command
    #[error("unknown command '{0}' (try /h for help)")]
    UnknownCommand(String),

    /// Wrong number of arguments for a command
    #[error("wrong number of arguments for '{cmd}' (usage: {usage})")]
    WrongArity {
        /// Command name as typed
        cmd: String,
        /// Usage line from the command table
        usage: String,
    },
}

/// Result type alias for browse operations
pub type Result<T> = std::result::Result<T, BrowseError>;

impl BrowseError {
    /// Returns true if this error should abort startup
    #[cold]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BrowseError::DocumentLoad { .. } | BrowseError::DocumentParse { .. }
        )
    }
}

impl From<serde_json::Error> for BrowseError {
    fn from(err: serde_json::Error) -> Self {
        BrowseError::DocumentParse {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
