//! Supervised accept loop shared by the HTTP and dictionary servers.
//!
//! Every accepted connection runs in its own task. Tasks are tracked in a
//! [`JoinSet`] and their number is capped by a [`Semaphore`]: when the cap is
//! reached the loop stops accepting until a running connection finishes. On
//! shutdown the loop stops accepting, waits for in-flight connections for a
//! grace period and aborts the rest.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Bounded, supervised connection dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    max_connections: usize,
    shutdown_timeout: Duration,
}

impl Dispatcher {
    pub fn new(max_connections: usize, shutdown_timeout: Duration) -> Self {
        Self {
            max_connections,
            shutdown_timeout,
        }
    }

    /// Accept connections on `listener` until `shutdown` completes, running
    /// `handler` for each one, then drain in-flight connections.
    pub async fn run<F, Fut>(
        &self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
        handler: F,
    ) where
        F: Fn(TcpStream, SocketAddr) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_connections));
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }

                // Reap finished connections so the set does not grow
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }

                permit = semaphore.clone().acquire_owned() => {
                    let Ok(permit) = permit else {
                        break;
                    };

                    tokio::select! {
                        _ = &mut shutdown => {
                            info!("Shutting down server...");
                            break;
                        }

                        accept_result = listener.accept() => {
                            match accept_result {
                                Ok((socket, addr)) => {
                                    let connection = handler(socket, addr);
                                    tasks.spawn(async move {
                                        // Released when the connection is done
                                        let _permit = permit;
                                        connection.await;
                                    });
                                }
                                Err(e) => Self::handle_accept_error(e).await,
                            }
                        }
                    }
                }
            }
        }

        self.perform_shutdown(&mut tasks).await;
    }

    /// Handle accept errors. These never stop the server.
    async fn handle_accept_error(e: std::io::Error) {
        warn!("Error accepting connection: {e}");
        // Back off briefly, e.g. when out of file descriptors
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    /// Wait for in-flight connections, aborting whatever is left after the
    /// shutdown timeout.
    async fn perform_shutdown(&self, tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let drained = tokio::time::timeout(self.shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                "Aborting {len} connections still open after shutdown timeout",
                len = tasks.len()
            );
            tasks.abort_all();
            while tasks.join_next().await.is_some() {}
        }

        info!("Server shutdown complete");
    }
}

/// Completes when Ctrl+C is received.
pub async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
        Err(e) => {
            error!("Error setting up Ctrl+C handler: {e}");
            // Without a signal handler, run until the process is killed
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::AsyncWriteExt;
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn test_connection_limit_is_never_exceeded() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let (active_clone, peak_clone) = (active.clone(), peak.clone());
        let server = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            let handler = move |mut socket: TcpStream, _: SocketAddr| {
                let active = active_clone.clone();
                let peak = peak_clone.clone();
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    let _ = socket.write_all(b"done").await;
                }
            };
            Dispatcher::new(2, Duration::from_secs(5))
                .run(listener, shutdown, handler)
                .await;
        });

        let mut clients = JoinSet::new();
        for _ in 0..6 {
            clients.spawn(async move {
                let mut stream = TcpStream::connect(addr).await.unwrap();
                let mut reply = Vec::new();
                tokio::io::AsyncReadExt::read_to_end(&mut stream, &mut reply).await.unwrap();
                reply
            });
        }
        while let Some(reply) = clients.join_next().await {
            assert_eq!(reply.unwrap(), b"done".to_vec());
        }

        shutdown_tx.send(()).unwrap();
        server.await.unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 2, "more than two connections ran at once");
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stuck_connections_are_aborted_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let started = Arc::new(AtomicUsize::new(0));

        let started_clone = started.clone();
        let server = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            let handler = move |_socket: TcpStream, _: SocketAddr| {
                let started = started_clone.clone();
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    std::future::pending::<()>().await;
                }
            };
            Dispatcher::new(4, Duration::from_millis(100))
                .run(listener, shutdown, handler)
                .await;
        });

        let _client = TcpStream::connect(addr).await.unwrap();
        while started.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server did not stop")
            .unwrap();
    }
}
