//! Persisted local key/value state
//!
//! A small JSON object on disk holding the auth tokens and user
//! preferences. Every write rewrites the whole file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};

// == Storage Keys ==
pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const TOKEN_EXPIRE_TIME_KEY: &str = "token_expire_time";
pub const LANGUAGE_KEY: &str = "language";

/// JSON-file backed key/value store.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Value>>,
}

impl LocalStorage {
    /// Opens the store at `path`. A missing file reads as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ClientError::Storage(format!("{} is not a JSON object: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        debug!(path = %path.display(), keys = values.len(), "local storage opened");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Opens `path` when given, otherwise the platform default location.
    pub fn open_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::open(path),
            None => Self::open(Self::default_path()?),
        }
    }

    /// `<data dir>/mes_client/storage.json`
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
            .ok_or_else(|| ClientError::Storage("could not determine data directory".to_string()))?;

        Ok(data_dir.join("mes_client").join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// String value for `key`; non-string values read as absent.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Writes `key`. The in-memory value only changes once the file has
    /// been written.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        let mut next = values.clone();
        next.insert(key.to_string(), value.into());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    /// Removes `key`, returning its previous value. Nothing changes when the
    /// file cannot be written.
    pub fn remove(&self, key: &str) -> Result<Option<Value>> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        if !values.contains_key(key) {
            return Ok(None);
        }

        let mut next = values.clone();
        let previous = next.remove(key);
        self.persist(&next)?;
        *values = next;
        Ok(previous)
    }

    /// Non-empty auth token, if one is stored.
    pub fn auth_token(&self) -> Option<String> {
        self.get_string(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    fn persist(&self, values: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ClientError::Storage(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let bytes = serde_json::to_vec_pretty(values)
            .map_err(|e| ClientError::Storage(format!("failed to encode storage: {}", e)))?;
        fs::write(&self.path, bytes).map_err(|e| {
            ClientError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}
