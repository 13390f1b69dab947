//! The shared key/value store.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

/// An in-memory dictionary shared by all sessions of one server.
///
/// Each operation holds the lock only for its own read or write.
#[derive(Debug, Default)]
pub struct Dictionary {
    entries: RwLock<BTreeMap<String, String>>,
}

impl Dictionary {
    /// Create a dictionary pre-filled with `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Insert or replace a value, returning the previous one.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.write().await.insert(key.into(), value.into())
    }

    pub async fn remove(&self, key: &str) -> Option<String> {
        self.entries.write().await.remove(key)
    }

    /// A snapshot of all entries in key order.
    pub async fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
