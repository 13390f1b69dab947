//! A minimal concurrent HTTP/1.0 static file server.
//!
//! Each accepted connection carries exactly one request. The request is
//! parsed, checked against the web root and answered with the file's
//! contents or a bare status line, after which the connection is closed.
//!
//! # Features
//!
//! - Request parsing with an explicit line scanner and state machine
//! - GET of static files below a configured web root; everything else is rejected
//! - Directory traversal protection, including symbolic links leaving the root
//! - Content types chosen by file extension
//! - Bounded, supervised connection tasks with read/write deadlines
//! - A sibling line-oriented dictionary (key/value) server
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use minihttpd::{parse_request, Method};
//!
//! let raw = b"GET /index.html?lang=en HTTP/1.0\r\nHost: example.com\r\n\r\n";
//! let request = parse_request(raw).unwrap();
//! assert_eq!(request.method, Method::GET);
//! assert_eq!(request.path(), "/index.html");
//! assert_eq!(request.get_header("host"), Some("example.com"));
//! ```
//!
//! ## Error handling
//!
//! ```
//! use minihttpd::{parse_request, ParserError};
//!
//! match parse_request(b"GET /index.html HTTP/1.1\r\nNoColon\r\n\r\n") {
//!     Err(ParserError::InvalidHeaderFormat(line)) => assert_eq!(line, "NoColon"),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```
//!
//! ## Running the server
//!
//! ```no_run
//! use minihttpd::{HttpServer, ServerConfig};
//!
//! # async fn run() -> Result<(), minihttpd::ServerError> {
//! let config = ServerConfig {
//!     web_directory: "public".into(),
//!     ..ServerConfig::default()
//! };
//! HttpServer::new(config).start().await?;
//! # Ok(())
//! # }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

pub mod files;
pub mod dispatch;
pub mod dictionary;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, HttpVersion, Method, parse_request};
pub use server::{Error as ServerError, HttpResponse, HttpServer, ServerConfig, StatusCode};
