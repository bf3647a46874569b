//! JSON file storage
//!
//! A [`JsonStore`] is an id → entity map linked to one pretty-printed JSON
//! file. Changes stay in memory until [`JsonStore::commit`] writes the whole
//! map back.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use swiss_core::SwissError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("an entry with id {0} already exists")]
    DuplicateId(String),

    #[error("no entry with id {0}")]
    NotFound(String),

    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Swiss(#[from] SwissError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Anything kept in a [`JsonStore`]
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Key of this entity in its store
    fn entity_id(&self) -> String;
}

/// Read and decode a JSON file; `Ok(None)` when the file does not exist or
/// is empty.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Encode `value` as pretty JSON and write it, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let io_err = |source: std::io::Error| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(io_err)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[derive(Debug)]
pub struct JsonStore<T> {
    path: PathBuf,
    entries: BTreeMap<String, T>,
    dirty: bool,
}

impl<T: Entity> JsonStore<T> {
    /// Load the store from `path`. A missing file gives an empty store; the
    /// file is created on the first commit.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = read_json(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add(&mut self, entity: T) -> Result<()> {
        let id = entity.entity_id();
        if self.entries.contains_key(&id) {
            return Err(StorageError::DuplicateId(id));
        }
        self.entries.insert(id, entity);
        self.dirty = true;
        Ok(())
    }

    /// Insert or replace
    pub fn update(&mut self, entity: T) {
        self.entries.insert(entity.entity_id(), entity);
        self.dirty = true;
    }

    pub fn delete(&mut self, id: &str) -> Result<T> {
        let removed = self
            .entries
            .remove(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    /// Every entity, ordered by id
    pub fn list_all(&self) -> Vec<&T> {
        self.entries.values().collect()
    }

    pub fn find_many<F>(&self, predicate: F) -> Vec<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.entries.values().filter(|e| predicate(e)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether there are changes not yet written to disk
    pub fn has_changes(&self) -> bool {
        self.dirty
    }

    /// Write pending changes; does nothing when there are none.
    pub fn commit(&mut self) -> Result<()> {
        if self.dirty {
            write_json(&self.path, &self.entries)?;
            self.dirty = false;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod storage_tests;
