//! Dictionary server configuration.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::dictionary::error::Error;
use crate::server::string_or_number;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    pub host: String,
    #[serde(deserialize_with = "string_or_number")]
    pub port: String,
    /// Entries the dictionary starts with.
    pub entries: BTreeMap<String, String>,
    pub max_connections: usize,
    pub read_buffer_size: usize,
    /// Sessions silent for this long are closed, in milliseconds.
    pub idle_timeout_ms: u64,
    /// An unterminated command runs once the client has been quiet this
    /// long, in milliseconds.
    pub command_delay_ms: u64,
    /// Longest accepted command line, in bytes.
    pub max_line_length: usize,
    /// Deadline for sending one reply, in milliseconds.
    pub write_timeout_ms: u64,
    pub shutdown_timeout_ms: u64,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: "27015".to_string(),
            entries: BTreeMap::new(),
            max_connections: 256,
            read_buffer_size: 4096,
            idle_timeout_ms: 300_000,
            command_delay_ms: 100,
            max_line_length: 64 * 1024,
            write_timeout_ms: 30_000,
            shutdown_timeout_ms: 5_000,
        }
    }
}

impl DictionaryConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: DictionaryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.port.parse::<u16>().is_err() {
            return Err(Error::InvalidConfig(format!("invalid port: {}", self.port)));
        }
        if self.max_connections == 0 || self.read_buffer_size == 0 || self.max_line_length == 0 {
            return Err(Error::InvalidConfig("sizes and limits must be positive".to_string()));
        }
        let invalid_key = |key: &&String| key.is_empty() || key.contains(char::is_whitespace);
        if let Some(key) = self.entries.keys().find(invalid_key) {
            return Err(Error::InvalidConfig(format!("invalid key {key:?}")));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.command_delay_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}
