//! Per-connection request handling.
//!
//! A connection carries exactly one request and one response. The handler
//! walks the states START → HEADERS_SCANNED → {DISPATCHED | REJECTED} →
//! CLOSED and always shuts the socket down before returning.

use std::io;

use log::{debug, info, trace, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::files::{resolve, serve_file};
use crate::parser::{find_header_end, parse_request, Method};
use crate::server::config::ServerConfig;
use crate::server::error::{Error, TransportError};
use crate::server::response::{HttpResponse, StatusCode};

/// Log target for security-relevant rejections.
pub const AUDIT_TARGET: &str = "minihttpd::audit";

/// Lifecycle of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Start,
    HeadersScanned,
    Dispatched,
    Rejected,
    Closed,
}

/// Drives one connection from the first byte read to socket shutdown.
pub struct ConnectionHandler<'a, S> {
    socket: &'a mut S,
    config: &'a ServerConfig,
    state: ConnectionState,
}

impl<'a, S> ConnectionHandler<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(socket: &'a mut S, config: &'a ServerConfig) -> Self {
        Self {
            socket,
            config,
            state: ConnectionState::Start,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    fn transition(&mut self, next: ConnectionState) {
        trace!("Connection state {:?} -> {next:?}", self.state);
        self.state = next;
    }

    /// Serve the connection and shut it down.
    ///
    /// Returns the status sent to the client. Rejections (400, 403, 404) are
    /// answered and reported as `Ok`; only transport failures, which leave the
    /// client without a response, are returned as errors.
    pub async fn run(&mut self) -> Result<StatusCode, Error> {
        let outcome = self.serve().await;

        if let Err(e) = self.socket.shutdown().await {
            debug!("Error shutting down connection: {e}");
        }
        self.transition(ConnectionState::Closed);

        outcome
    }

    async fn serve(&mut self) -> Result<StatusCode, Error> {
        let raw = self.read_request().await?;
        if raw.is_empty() {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before a request was received",
            ))
            .into());
        }

        let response = match self.dispatch(&raw).await {
            Ok(response) => {
                self.transition(ConnectionState::Dispatched);
                response
            }
            Err(e) => {
                let Some(response) = e.to_response() else {
                    return Err(e);
                };
                log_rejection(&e);
                self.transition(ConnectionState::Rejected);
                response
            }
        };

        self.write_response(&response).await?;
        Ok(response.status)
    }

    /// Parse, validate and answer the request.
    async fn dispatch(&mut self, raw: &[u8]) -> Result<HttpResponse, Error> {
        let request = parse_request(raw)?;
        self.transition(ConnectionState::HeadersScanned);
        debug!("{} {} {}", request.method, request.resource, request.version);

        if request.method != Method::GET {
            return Err(Error::UnsupportedMethod(request.method));
        }

        let path = resolve(&request.resource, &self.config.web_directory).await?;
        serve_file(&path).await
    }

    /// Read until the header section is complete, the peer stops sending, or
    /// `max_request_size` bytes have arrived.
    async fn read_request(&mut self) -> Result<Vec<u8>, TransportError> {
        let deadline = self.config.read_timeout();
        let max_request_size = self.config.max_request_size;
        let mut buf = vec![0; self.config.read_buffer_size];
        let mut request = Vec::new();

        let socket = &mut *self.socket;
        let read_all = async {
            loop {
                let n = socket.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.len() >= max_request_size || find_header_end(&request).is_some() {
                    break;
                }
            }
            Ok::<_, TransportError>(())
        };
        timeout(deadline, read_all)
            .await
            .map_err(|_| TransportError::ReadTimeout(deadline))??;

        // Anything past the limit is dropped; an unterminated header
        // section then fails to parse.
        request.truncate(max_request_size);
        Ok(request)
    }

    async fn write_response(&mut self, response: &HttpResponse) -> Result<(), TransportError> {
        let deadline = self.config.write_timeout();
        let bytes = response.to_bytes();

        let socket = &mut *self.socket;
        let write_all = async {
            socket.write_all(&bytes).await?;
            socket.flush().await
        };
        timeout(deadline, write_all)
            .await
            .map_err(|_| TransportError::WriteTimeout(deadline))??;
        Ok(())
    }
}

fn log_rejection(error: &Error) {
    match error {
        Error::SecurityViolation(resource) => {
            warn!(target: AUDIT_TARGET, "Rejected path traversal attempt: {resource}");
        }
        Error::ParseError(_) | Error::UnsupportedMethod(_) => info!("Bad request: {error}"),
        _ => debug!("{error}"),
    }
}

/// Handle a single connection with the given configuration.
pub async fn handle_connection<S>(
    socket: &mut S,
    config: &ServerConfig,
) -> Result<StatusCode, Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    ConnectionHandler::new(socket, config).run().await
}
