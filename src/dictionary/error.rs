//! Error types for the dictionary server.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in the dictionary server.
#[derive(Debug, Error)]
pub enum Error {
    /// The command verb is not part of the protocol.
    #[error("unknown command {0}")]
    UnknownCommand(String),

    /// The command is missing a required argument.
    #[error("{0} requires a {1}")]
    MissingArgument(&'static str, &'static str),

    /// The command was given arguments it does not take.
    #[error("{0} takes no arguments")]
    UnexpectedArgument(&'static str),

    /// Keys are single tokens.
    #[error("invalid key {0}")]
    InvalidKey(String),

    /// The client stayed silent for longer than the idle timeout.
    #[error("Session idle for {0:?}")]
    Timeout(Duration),

    /// The client did not accept a reply in time.
    #[error("Write timed out after {0:?}")]
    WriteTimeout(Duration),

    /// A command line grew past the configured limit.
    #[error("Command line longer than {0} bytes")]
    LineTooLong(usize),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] serde_json::Error),
}
