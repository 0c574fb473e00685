//! Catalog: the entry point that owns the root album and the ID index.
//!
//! A [`Catalog`] is opened from a [`GalleryConfig`]. Opening creates the root
//! and index storage directories if they are missing and loads the persisted
//! index; it does not walk the tree.
//!
//! ## Lookups
//!
//! - [`album_by_path`](Catalog::album_by_path): segments below the root. Only
//!   existing directories resolve.
//! - [`album_by_id`](Catalog::album_by_id): through the index. When the index
//!   points at a directory that no longer exists, the index is rebuilt once
//!   and the lookup retried once. A second miss is final.
//!
//! ## Index rebuild
//!
//! [`build_index`](Catalog::build_index) walks every album below the root,
//! archived ones included. Colliding IDs (usually a copied directory that
//! kept its sidecar) are repaired by deleting the later album's sidecar and
//! issuing a fresh ID. Rebuilds are serialized per catalog.

use crate::album::Album;
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::identity::SIDECAR_FILENAME;
use crate::index::{self, CatalogIndex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Catalog {
    config: Arc<GalleryConfig>,
    root: Album,
    index_path: PathBuf,
    index: Mutex<CatalogIndex>,
    rebuild: Mutex<()>,
}

impl Catalog {
    /// Open the catalog described by `config`.
    pub fn open(config: GalleryConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.gallery_root_path)
            .map_err(|e| GalleryError::io(&config.gallery_root_path, e))?;
        fs::create_dir_all(&config.index_storage_directory)
            .map_err(|e| GalleryError::io(&config.index_storage_directory, e))?;

        let config = Arc::new(config);
        let index_path = index::index_path(&config.index_storage_directory);
        let index = CatalogIndex::load(&index_path)?;

        Ok(Self {
            root: Album::root(Arc::clone(&config)),
            config,
            index_path,
            index: Mutex::new(index),
            rebuild: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn root_album(&self) -> &Album {
        &self.root
    }

    /// The catalog root directory.
    pub fn base_dir(&self) -> &Path {
        &self.config.gallery_root_path
    }

    /// The directory containing the catalog root.
    pub fn parent_folder(&self) -> Option<&Path> {
        self.base_dir().parent()
    }

    /// File names that are never listed as album content.
    pub fn reserved_file_names(&self) -> [&str; 2] {
        [SIDECAR_FILENAME, self.config.header_image_name.as_str()]
    }

    pub fn index_file_path(&self) -> &Path {
        &self.index_path
    }

    /// Copy of the in-memory index.
    pub fn index_snapshot(&self) -> CatalogIndex {
        lock(&self.index).clone()
    }

    /// Re-read the persisted index, replacing the in-memory one.
    pub fn load_index(&self) -> Result<()> {
        let loaded = CatalogIndex::load(&self.index_path)?;
        *lock(&self.index) = loaded;
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// The album at `segments` below the root. An empty list is the root.
    pub fn album_by_path<S: AsRef<str>>(&self, segments: &[S]) -> Result<Album> {
        let mut owned = Vec::with_capacity(segments.len());
        for segment in segments {
            let segment = segment.as_ref();
            if !is_plain_segment(segment) {
                return Err(GalleryError::NotFound(format!(
                    "invalid path segment {segment:?}"
                )));
            }
            owned.push(segment.to_string());
        }

        if !self.base_dir().is_dir() {
            return Err(GalleryError::NotFound(format!(
                "catalog root {}",
                self.base_dir().display()
            )));
        }
        // Every level must be a real directory, as in the tree listing.
        let mut dir = self.base_dir().to_path_buf();
        for segment in &owned {
            dir.push(segment);
            let is_real_dir = fs::symlink_metadata(&dir).is_ok_and(|m| m.is_dir());
            if !is_real_dir {
                return Err(GalleryError::NotFound(format!("album {}", dir.display())));
            }
        }

        Ok(Album::at(Arc::clone(&self.config), owned))
    }

    /// The album at a delimiter-joined path below the root.
    pub fn album_by_relative_path(&self, path: &str) -> Result<Album> {
        self.album_by_path(&self.config.split_segments(path))
    }

    /// The album registered under `id` in the index.
    pub fn album_by_id(&self, id: &str) -> Result<Album> {
        match self.resolve_indexed(id)? {
            Some(album) => Ok(album),
            None => {
                warn!(id, "index entry is stale, rebuilding");
                self.build_index()?;
                self.resolve_indexed(id)?.ok_or_else(|| {
                    GalleryError::NotFound(format!("album id {id} (after index rebuild)"))
                })
            }
        }
    }

    /// `Ok(None)` means the index has `id` but its path no longer resolves.
    fn resolve_indexed(&self, id: &str) -> Result<Option<Album>> {
        let relative = lock(&self.index)
            .get(id)
            .map(str::to_string)
            .ok_or_else(|| GalleryError::NotFound(format!("album id {id}")))?;

        match self.album_by_relative_path(&relative) {
            Ok(album) => Ok(Some(album)),
            Err(GalleryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Index rebuild
    // =========================================================================

    /// Rebuild the index from a full walk, persist it and return it.
    pub fn build_index(&self) -> Result<CatalogIndex> {
        let _guard = lock(&self.rebuild);

        // A fresh root so the walk sees the tree as it is now, not as cached.
        let root = Album::root(Arc::clone(&self.config));
        let mut built = CatalogIndex::empty();

        root.walk(
            &mut |album| {
                if album.is_root() {
                    return Ok(());
                }
                let mut id = album.id()?;
                while built.contains(&id) {
                    warn!(
                        album = %album.relative_path(),
                        id = %id,
                        "duplicate album id, issuing a new one"
                    );
                    album.unset_id()?;
                    id = album.id()?;
                }
                built.insert(id, album.relative_path());
                Ok(())
            },
            true,
        )?;

        built.save(&self.index_path)?;
        info!(
            albums = built.len(),
            path = %self.index_path.display(),
            "catalog index rebuilt"
        );
        *lock(&self.index) = built.clone();
        Ok(built)
    }
}

/// A single visible directory name: not empty, not dot-prefixed, no
/// separators. Dot-directories are never albums, which also keeps `.` and
/// `..` out.
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.starts_with('.') && !segment.contains(['/', '\\'])
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
