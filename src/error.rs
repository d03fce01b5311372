//! Error types for gotint

use std::io;
use thiserror::Error;

/// Result type alias for gotint operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gotint
#[derive(Error, Debug)]
pub enum Error {
    /// The event stream contained malformed JSON.
    ///
    /// Fatal to the current colorization pass; a clean end-of-stream or a
    /// closed pipe is not a decode error and never produces this variant.
    #[error("Malformed event stream: {0}")]
    Decode(#[from] serde_json::Error),

    /// Spawning or waiting on the test runner failed.
    #[error("Command execution failed: {0}")]
    CommandExecution(String),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
