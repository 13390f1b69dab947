//! Server configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::server::error::Error;

/// HTTP server configuration.
///
/// Built once at startup and shared read-only by every connection.
/// Missing keys in a configuration file fall back to [`ServerConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name or address to bind to.
    pub host: String,
    /// Port to bind to. Accepts a JSON string or number.
    #[serde(deserialize_with = "string_or_number")]
    pub port: String,
    /// Directory files are served from.
    pub web_directory: PathBuf,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size.
    pub read_buffer_size: usize,
    /// Upper bound on the bytes read before the request is parsed.
    pub max_request_size: usize,
    /// Deadline for receiving the request, in milliseconds.
    pub read_timeout_ms: u64,
    /// Deadline for sending the response, in milliseconds.
    pub write_timeout_ms: u64,
    /// Grace period for in-flight connections on shutdown, in milliseconds.
    pub shutdown_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: "8080".to_string(),
            web_directory: PathBuf::from("www"),
            max_connections: 1024,
            read_buffer_size: 8192,
            max_request_size: 64 * 1024,
            read_timeout_ms: 30_000,
            write_timeout_ms: 30_000,
            shutdown_timeout_ms: 30_000,
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: ServerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the values a server cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.host.is_empty() {
            return Err(Error::InvalidConfig("host must not be empty".to_string()));
        }
        if self.port.parse::<u16>().is_err() {
            return Err(Error::InvalidConfig(format!("invalid port: {}", self.port)));
        }
        if self.max_connections == 0 {
            return Err(Error::InvalidConfig("max_connections must be positive".to_string()));
        }
        if self.read_buffer_size == 0 || self.max_request_size == 0 {
            return Err(Error::InvalidConfig("buffer sizes must be positive".to_string()));
        }
        Ok(())
    }

    /// The `host:port` string handed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Accepts `"8080"` as well as `8080`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or a number, found {other}"
        ))),
    }
}
