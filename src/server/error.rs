//! Error types for the HTTP server.

use std::time::Duration;

use thiserror::Error;

use crate::parser::{Error as ParserError, HttpVersion, Method};
use crate::server::response::{HttpResponse, StatusCode};

/// Failures of the connection itself. These abort the connection without
/// a response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading from or writing to the socket failed.
    #[error("Socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The client did not send a complete request in time.
    #[error("Read timed out after {0:?}")]
    ReadTimeout(Duration),

    /// The client did not accept the response in time.
    #[error("Write timed out after {0:?}")]
    WriteTimeout(Duration),
}

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The request bytes violate the request grammar.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// The request is well formed but uses a method other than GET.
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(Method),

    /// The requested resource resolves outside the web root.
    #[error("Security violation: {0} escapes the web root")]
    SecurityViolation(String),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The connection failed while reading or writing.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] serde_json::Error),

    /// I/O error outside of a connection, e.g. while binding the listener.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// The status-line-only response the client receives for this error, or
    /// `None` when the connection is aborted without a response.
    pub fn to_response(&self) -> Option<HttpResponse> {
        let response = match self {
            // Grammar failures answer with an HTTP/1.1 status line
            Error::ParseError(_) => {
                HttpResponse::new(StatusCode::BadRequest).with_version(HttpVersion::HTTP_11)
            }
            Error::UnsupportedMethod(_) => HttpResponse::new(StatusCode::BadRequest),
            Error::SecurityViolation(_) => HttpResponse::new(StatusCode::Forbidden),
            Error::NotFound(_) => HttpResponse::new(StatusCode::NotFound),
            Error::Transport(_)
            | Error::InvalidConfig(_)
            | Error::ConfigFile(_)
            | Error::IoError(_) => return None,
        };
        Some(response)
    }
}
