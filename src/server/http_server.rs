//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info};
use tokio::net::{TcpListener, TcpStream};

use crate::dispatch::{ctrl_c, Dispatcher};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::handler::handle_connection;

/// An HTTP server.
///
/// Connections are served concurrently, at most `max_connections` at a
/// time, all sharing the same read-only configuration.
pub struct HttpServer {
    /// The server configuration.
    pub config: Arc<ServerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(self.config.bind_address()).await?;
        info!(
            "Server listening on http://{addr}, serving {root}",
            addr = listener.local_addr()?,
            root = self.config.web_directory.display()
        );
        Ok(listener)
    }

    /// Start the server and run until Ctrl+C is received.
    pub async fn start(&self) -> Result<(), Error> {
        self.config.validate()?;
        let listener = self.setup_listener().await?;

        self.serve(listener, ctrl_c()).await;
        Ok(())
    }

    /// Serve connections from `listener` until `shutdown` completes.
    pub async fn serve(&self, listener: TcpListener, shutdown: impl Future<Output = ()>) {
        let dispatcher =
            Dispatcher::new(self.config.max_connections, self.config.shutdown_timeout());
        let config = self.config.clone();

        dispatcher
            .run(listener, shutdown, move |socket, addr| {
                Self::run_connection(socket, addr, config.clone())
            })
            .await;
    }

    async fn run_connection(mut socket: TcpStream, addr: SocketAddr, config: Arc<ServerConfig>) {
        debug!("Connection from {addr}");
        match handle_connection(&mut socket, &config).await {
            Ok(status) => debug!("{addr} answered with {}", status.as_u16()),
            Err(e) => debug!("{addr} aborted: {e}"),
        }
    }
}
