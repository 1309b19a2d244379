//! Record store accessor backed by a JSON file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors surfaced while loading the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be read from disk.
    #[error("could not read record store {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store was read but its content is malformed.
    #[error("could not parse record store {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A single stored user.
///
/// Older stores map keys straight to an email string; newer ones hold an
/// object with an `email` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserRecord {
    Email(String),
    Fields(Map<String, Value>),
}

impl UserRecord {
    pub fn email(&self) -> Option<&str> {
        match self {
            UserRecord::Email(email) => Some(email),
            UserRecord::Fields(fields) => fields.get("email").and_then(Value::as_str),
        }
    }
}

/// Snapshot of every stored record at the time of the read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: BTreeMap<String, UserRecord>,
}

impl RecordStore {
    /// Parse a whole store document.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Exact, case-sensitive match against every record's email.
    pub fn contains_email(&self, email: &str) -> bool {
        self.records
            .values()
            .filter_map(UserRecord::email)
            .any(|stored| stored == email)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Source of record store snapshots.
///
/// Both modes read the entire store as of the call.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Blocking read; fails immediately.
    fn load_blocking(&self) -> Result<RecordStore, StoreError>;

    /// Non-blocking read; the calling task is suspended, not the thread.
    async fn load(&self) -> Result<RecordStore, StoreError>;
}

/// Record source reading a JSON document from disk.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(&self, bytes: &[u8]) -> Result<RecordStore, StoreError> {
        let store = RecordStore::from_slice(bytes).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), records = store.len(), "Record store loaded");
        Ok(store)
    }

    fn read_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Read {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    fn load_blocking(&self) -> Result<RecordStore, StoreError> {
        let bytes = std::fs::read(&self.path).map_err(|e| self.read_error(e))?;
        self.parse(&bytes)
    }

    async fn load(&self) -> Result<RecordStore, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.read_error(e))?;
        self.parse(&bytes)
    }
}
