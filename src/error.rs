//! Error types.

use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors that stop the game.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration, reported before any worker starts.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Terminal or other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The terminal cannot hold the configured viewport.
    #[error("terminal is {actual_width}x{actual_height}, need at least {width}x{height}")]
    TerminalTooSmall {
        /// Required columns.
        width: u16,
        /// Required rows.
        height: u16,
        /// Terminal columns.
        actual_width: u16,
        /// Terminal rows.
        actual_height: u16,
    },

    /// The log file could not be opened or the logger was already set.
    #[error("cannot initialize logging to {path}: {reason}")]
    Logging {
        /// Log file path.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// A worker stopped with an error.
    #[error("{worker} worker failed: {reason}")]
    WorkerFailed {
        /// Worker name.
        worker: &'static str,
        /// Failure description.
        reason: String,
    },
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;
