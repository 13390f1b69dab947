//! HTTP server: configuration, connection handling and the accept loop.
//!
//! The [`HttpServer`] accepts connections and hands each one to the
//! connection handler together with a shared, immutable [`ServerConfig`].

mod response;
mod config;
mod error;
mod handler;
mod http_server;

// Re-export public items
pub use response::{HttpResponse, StatusCode, SERVER_NAME};
pub use config::ServerConfig;
pub(crate) use config::string_or_number;
pub use error::{Error, TransportError};
pub use handler::{handle_connection, ConnectionHandler, ConnectionState, AUDIT_TARGET};
pub use http_server::HttpServer;
