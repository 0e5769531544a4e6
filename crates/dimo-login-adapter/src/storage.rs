/*
[INPUT]:  Storage key names and string values
[OUTPUT]: Persisted key/value entries shared across the app
[POS]:    Storage layer - local persistence for settings, token, wallet address
[UPDATE]: When storage keys or on-disk format change
*/

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::http::Result;

/// Fixed keys used by the app
pub mod keys {
    pub const PUBLIC_SETTINGS: &str = "appPublicSettings";
    pub const PRIVATE_SETTINGS: &str = "appPrivateSettings";
    pub const ACCOUNT_INFO: &str = "accountInfo";
    pub const TOKEN: &str = "token";
    pub const WALLET_ADDRESS: &str = "walletAddress";
}

/// String key/value store, optionally backed by a JSON file.
///
/// Every mutation rewrites the whole file. Two processes sharing the same
/// file race with last-write-wins semantics.
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Store that lives only for the lifetime of the process
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Open (or lazily create) a file-backed store
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = entries.len(), "local store opened");

        Ok(Self {
            path: Some(path),
            entries: RwLock::new(entries),
        })
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        let guard = self.entries.read().unwrap_or_else(|e| e.into_inner());
        guard.get(key).cloned()
    }

    /// Write-through: memory changes only after the file write succeeded
    pub fn set_item(&self, key: &str, value: impl Into<String>) -> Result<()> {
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let mut next = guard.clone();
        next.insert(key.to_string(), value.into());
        self.flush(&next)?;
        *guard = next;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if !guard.contains_key(key) {
            return Ok(());
        }
        let mut next = guard.clone();
        next.remove(key);
        self.flush(&next)?;
        *guard = next;
        Ok(())
    }

    /// Serialize `value` as JSON under `key`
    pub fn set_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.set_item(key, encoded)
    }

    /// Read and decode a JSON entry. Missing or undecodable entries read as `None`.
    pub fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(key, error = %err, "ignoring undecodable store entry");
                None
            }
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
