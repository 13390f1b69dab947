//! HTTP request parser module.
//!
//! Turns the raw bytes received on a connection into an [`HttpRequest`].
//! Parsing is driven by an explicit line scanner and state machine; any
//! grammar violation is reported as an [`Error`] and no partial request is
//! exposed.

mod request;
mod method;
mod version;
mod error;
mod scanner;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;
pub use scanner::find_header_end;

// Re-export the parse_request function
pub use request::parse_request;
