//! Dictionary server: one session per connection, many commands per session.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use crate::dictionary::command::{execute, Command, Reply};
use crate::dictionary::config::DictionaryConfig;
use crate::dictionary::error::Error;
use crate::dictionary::store::Dictionary;
use crate::dispatch::{ctrl_c, Dispatcher};

pub struct DictionaryServer {
    pub config: Arc<DictionaryConfig>,
    pub store: Arc<Dictionary>,
}

impl DictionaryServer {
    /// Create a server whose store is seeded from `config.entries`.
    pub fn new(config: DictionaryConfig) -> Self {
        let store = Dictionary::with_entries(config.entries.clone());
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: DictionaryConfig, store: Arc<Dictionary>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Start the server and run until Ctrl+C is received.
    pub async fn start(&self) -> Result<(), Error> {
        self.config.validate()?;
        let listener = TcpListener::bind(self.config.bind_address()).await?;
        info!(
            "Dictionary server listening on {addr} with {len} entries",
            addr = listener.local_addr()?,
            len = self.store.len().await
        );

        self.serve(listener, ctrl_c()).await;
        Ok(())
    }

    /// Serve sessions from `listener` until `shutdown` completes.
    pub async fn serve(&self, listener: TcpListener, shutdown: impl Future<Output = ()>) {
        let dispatcher =
            Dispatcher::new(self.config.max_connections, self.config.shutdown_timeout());
        let config = self.config.clone();
        let store = self.store.clone();

        dispatcher
            .run(listener, shutdown, move |socket, addr| {
                Self::run_session(socket, addr, config.clone(), store.clone())
            })
            .await;
    }

    async fn run_session(
        mut socket: TcpStream,
        addr: SocketAddr,
        config: Arc<DictionaryConfig>,
        store: Arc<Dictionary>,
    ) {
        debug!("Session from {addr}");
        match handle_session(&mut socket, &store, &config).await {
            Ok(handled) => debug!("{addr} closed after {handled} commands"),
            Err(e) => debug!("{addr} aborted: {e}"),
        }
    }
}

/// Answer commands until the client quits, disconnects or goes idle.
///
/// Commands are lines ending in `\n`, and may arrive split over any number
/// of reads. A trailing line without a terminator still runs once the client
/// closes its side or stays quiet for `command_delay`, so clients may send
/// one bare command per write.
///
/// Returns the number of commands answered.
pub async fn handle_session<S>(
    socket: &mut S,
    store: &Dictionary,
    config: &DictionaryConfig,
) -> Result<usize, Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let outcome = run_commands(&mut *socket, store, config).await;
    if let Err(e) = socket.shutdown().await {
        debug!("Error shutting down session: {e}");
    }
    outcome
}

async fn run_commands<S>(
    socket: &mut S,
    store: &Dictionary,
    config: &DictionaryConfig,
) -> Result<usize, Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::with_capacity(config.read_buffer_size, socket);
    let mut handled = 0;

    while let Some(line) = next_line(&mut stream, config).await? {
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match line.parse::<Command>() {
            Ok(command) => execute(command, store).await,
            Err(e) => Reply::Error(e.to_string()),
        };
        write_reply(&mut stream, &reply, config.write_timeout()).await?;
        handled += 1;

        if reply == Reply::Bye {
            break;
        }
    }
    Ok(handled)
}

/// Read the next command line, terminator included.
///
/// Returns `None` once the client has closed the connection with nothing
/// left to run.
async fn next_line<R>(reader: &mut R, config: &DictionaryConfig) -> Result<Option<Vec<u8>>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();

    loop {
        let wait = if line.is_empty() {
            config.idle_timeout()
        } else {
            config.command_delay()
        };
        let available = match timeout(wait, reader.fill_buf()).await {
            Ok(available) => available?,
            // Quiet in the middle of a line: run what arrived
            Err(_) if !line.is_empty() => return Ok(Some(line)),
            Err(_) => return Err(Error::Timeout(wait)),
        };
        if available.is_empty() {
            return Ok((!line.is_empty()).then_some(line));
        }

        let (taken, complete) = match available.iter().position(|&b| b == b'\n') {
            Some(end) => (end + 1, true),
            None => (available.len(), false),
        };
        line.extend_from_slice(&available[..taken]);
        reader.consume(taken);

        if line.len() > config.max_line_length {
            return Err(Error::LineTooLong(config.max_line_length));
        }
        if complete {
            return Ok(Some(line));
        }
    }
}

async fn write_reply<W>(writer: &mut W, reply: &Reply, deadline: Duration) -> Result<(), Error>
where
    W: AsyncWrite + Unpin,
{
    let bytes = reply.to_bytes();
    let write_all = async {
        writer.write_all(&bytes).await?;
        writer.flush().await
    };
    timeout(deadline, write_all)
        .await
        .map_err(|_| Error::WriteTimeout(deadline))??;
    Ok(())
}
