//! Append-only error log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::pipeline::failure::{to_pretty_json, Failure};

/// Separator written after every entry.
pub const RECORD_SEPARATOR: &str = "\r\n";

/// One serialized failure in the error log.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry<'a> {
    pub name: &'a str,
    pub message: &'a str,
    pub stack: &'a str,
    pub timestamp: String,
}

impl<'a> LogEntry<'a> {
    pub fn new(failure: &'a Failure, at: DateTime<Utc>) -> Self {
        Self {
            name: failure.name(),
            message: failure.message(),
            stack: failure.stack(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Handle to the error log file.
///
/// Clones share one lock so concurrent appends never interleave.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush it before returning.
    pub fn append(&self, entry: &LogEntry<'_>) -> std::io::Result<()> {
        let mut record = to_pretty_json(entry)?;
        record.extend_from_slice(RECORD_SEPARATOR.as_bytes());

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&record)?;
        file.flush()
    }
}
