//! Persistence of the best brain across generations.
//!
//! The store only moves [`BrainRecord`]s; shape validation against the
//! current layout happens when the record is turned back into a brain.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::brain::BrainRecord;

/// Errors raised by a brain store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("brain store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The stored data is not a valid brain record.
    #[error("stored brain is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A place where the leader's brain survives generation resets.
pub trait BrainStore {
    /// Returns the stored record, or `None` when nothing is stored.
    fn load(&self) -> Result<Option<BrainRecord>, StoreError>;

    /// Replaces the stored record.
    fn save(&mut self, record: &BrainRecord) -> Result<(), StoreError>;

    /// Removes the stored record. Removing nothing is not an error.
    fn discard(&mut self) -> Result<(), StoreError>;
}

/// Keeps the record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding raw JSON, valid or not.
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
        }
    }

    /// The raw stored JSON, if any.
    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl BrainStore for MemoryStore {
    fn load(&self) -> Result<Option<BrainRecord>, StoreError> {
        self.json
            .as_deref()
            .map(BrainRecord::from_json)
            .transpose()
            .map_err(StoreError::from)
    }

    fn save(&mut self, record: &BrainRecord) -> Result<(), StoreError> {
        self.json = Some(record.to_json()?);
        Ok(())
    }

    fn discard(&mut self) -> Result<(), StoreError> {
        self.json = None;
        Ok(())
    }
}

/// Keeps the record in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file does not need to exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BrainStore for JsonFileStore {
    fn load(&self) -> Result<Option<BrainRecord>, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(BrainRecord::from_json(&json)?))
    }

    fn save(&mut self, record: &BrainRecord) -> Result<(), StoreError> {
        std::fs::write(&self.path, record.to_json()?)?;
        Ok(())
    }

    fn discard(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
