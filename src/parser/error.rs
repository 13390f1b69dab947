//! Error types for the HTTP request parser.

use thiserror::Error;

/// Errors that can occur during HTTP request parsing.
///
/// Every variant is fatal to the request: the parser never hands out a
/// partially parsed request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The request line is malformed (wrong token count or not UTF-8).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The HTTP version token is not one we understand.
    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// A header line has no colon, an empty name, or a control character in its name.
    #[error("Invalid header format: {0}")]
    InvalidHeaderFormat(String),

    /// The input ended before the blank line that closes the header section.
    #[error("Request truncated before end of headers")]
    Truncated,

    /// The request is empty.
    #[error("Empty request")]
    EmptyRequest,
}
