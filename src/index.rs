//! Catalog index: album ID → relative album path.
//!
//! The index is a flat JSON object persisted as a single file,
//! `<index_storage_directory>/gallery.idx`:
//!
//! ```json
//! {"5f0c2e9a...":"foo","9b1d44c0...":"foo/bar"}
//! ```
//!
//! Paths are relative to the catalog root and joined with the configured
//! delimiter. The index is never updated in place: a rebuild walks the whole
//! tree (see [`Catalog::build_index`](crate::catalog::Catalog::build_index))
//! and replaces the file wholesale.
//!
//! A missing file loads as an empty index. A file that exists but cannot be
//! parsed is an error.

use crate::error::{GalleryError, Result};
use crate::persist;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the index file within the index storage directory.
pub const INDEX_FILENAME: &str = "gallery.idx";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogIndex {
    entries: BTreeMap<String, String>,
}

impl CatalogIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file is an empty index.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::empty()),
            Err(e) => return Err(GalleryError::io(path, e)),
        };
        let entries = serde_json::from_str(&content).map_err(|source| GalleryError::Index {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { entries })
    }

    /// Atomically replace the file at `path` with this index.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(&self.entries).map_err(|source| GalleryError::Index {
            path: path.to_path_buf(),
            source,
        })?;
        persist::write_atomic(path, json.as_bytes())
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Record `id → relative_path`. Returns the path previously stored for `id`.
    pub fn insert(&mut self, id: String, relative_path: String) -> Option<String> {
        self.entries.insert(id, relative_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by ID.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Resolve the index file path for an index storage directory.
pub fn index_path(storage_dir: &Path) -> PathBuf {
    storage_dir.join(INDEX_FILENAME)
}
