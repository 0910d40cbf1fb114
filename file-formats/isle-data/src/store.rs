//! Byte-buffer stores keyed by file name.
//!
//! Parsers never touch the filesystem. Callers fetch raw buffers from a
//! [`ByteStore`], hand them to a format crate and persist whatever buffer the
//! format crate derives.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{DataError, Result};

/// Trait for reading and writing whole files by name.
pub trait ByteStore: Send + Sync {
    /// Read the full contents stored under `name`.
    fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Replace the contents stored under `name`.
    fn write(&self, name: &str, data: &[u8]) -> Result<()>;

    /// Whether an entry exists under `name`.
    fn exists(&self, name: &str) -> bool;
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(name: &str, data: Vec<u8>) -> Self {
        let store = Self::new();
        store
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name.to_string(), data);
        store
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| DataError::StoreMissing(name.to_string()))
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains_key(name)
    }
}

/// Store backed by a directory on disk. Names are paths relative to the root.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl ByteStore for DirectoryStore {
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(DataError::StoreMissing(name.to_string()));
        }
        fs::read(&path).map_err(|source| DataError::StoreIo { path, source })
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(name);
        log::debug!("Writing {} bytes to {}", data.len(), path.display());
        fs::write(&path, data).map_err(|source| DataError::StoreIo { path, source })
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }
}
