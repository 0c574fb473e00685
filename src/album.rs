//! Albums: the directory nodes of the catalog tree.
//!
//! An [`Album`] is a read projection of one directory. Construction only
//! parses the directory name; sub-albums, content and identity are each
//! loaded on first access with a single non-recursive listing and cached on
//! the instance, so repeated calls return the same collection.
//!
//! ## Directory Structure
//!
//! ```text
//! gallery/                      # Catalog root (never indexed)
//! └── foo/                      # Album
//!     ├── .meta.info            # Identity sidecar (id, created_at)
//!     ├── bar/
//!     │   ├── header.jpg        # Header image (reserved name)
//!     │   ├── img-1.jpg         # Original
//!     │   ├── img-1_thumb.jpg   # Its thumbnail
//!     │   └── img-1_caption.txt # Its caption
//!     ├── bar_caption.txt       # Caption of the album `bar`
//!     ├── _boo/                 # Archived album
//!     └── featured_s/           # Sticky album
//! ```
//!
//! ## Content grouping
//!
//! Media files are keyed by parsed title. Each title owns one
//! [`ContentPair`] slot: thumbnails fill `thumbnail`, everything else fills
//! `original`. Only titles with an original are visible; a thumbnail on its
//! own is metadata of nothing and is not listed.

use crate::config::GalleryConfig;
use crate::content::{self, ContentKind};
use crate::entry::{self, Entry};
use crate::error::{GalleryError, Result};
use crate::identity::{self, IdentityRecord};
use crate::naming;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;
use walkdir::WalkDir;

/// The `{original, thumbnail}` slot for one content title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPair {
    pub original: Option<Entry>,
    pub thumbnail: Option<Entry>,
}

/// A visible content item: an original and its thumbnail, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleContent<'a> {
    pub original: &'a Entry,
    pub thumbnail: Option<&'a Entry>,
}

#[derive(Debug)]
pub struct Album {
    config: Arc<GalleryConfig>,
    path: PathBuf,
    segments: Vec<String>,
    name: String,
    title: String,
    is_archived: bool,
    is_sticky: bool,
    within_archived: bool,
    sub_albums: OnceLock<Vec<Album>>,
    content: OnceLock<BTreeMap<String, ContentPair>>,
    identity: Mutex<Option<IdentityRecord>>,
}

impl Album {
    /// The catalog root album.
    pub(crate) fn root(config: Arc<GalleryConfig>) -> Self {
        Self::at(config, Vec::new())
    }

    /// The album at `segments` below the catalog root. Does not touch the
    /// filesystem.
    pub(crate) fn at(config: Arc<GalleryConfig>, segments: Vec<String>) -> Self {
        let path = segments
            .iter()
            .fold(config.gallery_root_path.clone(), |p, s| p.join(s));
        let name = match segments.last() {
            Some(last) => last.clone(),
            None => Self::directory_name(&config.gallery_root_path),
        };
        let parsed = naming::parse_album_name(&name);
        // The root's own name never archives anything below it.
        let within_archived = segments
            .iter()
            .any(|s| naming::parse_album_name(s).is_archived);

        Self {
            config,
            path,
            segments,
            name,
            title: parsed.title,
            is_archived: parsed.is_archived,
            is_sticky: parsed.is_sticky,
            within_archived,
            sub_albums: OnceLock::new(),
            content: OnceLock::new(),
            identity: Mutex::new(None),
        }
    }

    fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self::at(Arc::clone(&self.config), segments)
    }

    /// Final segment of a directory path.
    pub fn directory_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Absolute filesystem path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name, markers included.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory name with the archived marker and sticky suffix removed.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }

    pub fn is_sticky(&self) -> bool {
        self.is_sticky
    }

    /// True if this album or any ancestor below the root is archived.
    pub fn is_within_archived(&self) -> bool {
        self.within_archived
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path segments below the catalog root. Empty for the root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path below the catalog root joined with the configured delimiter.
    pub fn relative_path(&self) -> String {
        self.config.join_segments(&self.segments)
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// The album one level up, or `None` for the root.
    pub fn parent(&self) -> Option<Album> {
        let (_, head) = self.segments.split_last()?;
        Some(Self::at(Arc::clone(&self.config), head.to_vec()))
    }

    /// Caption from `<album-name>_caption.txt` in the parent directory, or an
    /// empty string if there is none.
    pub fn description(&self) -> Result<String> {
        let Some(parent_dir) = self.path.parent() else {
            return Ok(String::new());
        };
        entry::read_caption(&parent_dir.join(content::caption_file_name(&self.name)))
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// The album's identity record, loading or creating its sidecar on first use.
    pub fn identity(&self) -> Result<IdentityRecord> {
        let mut slot = lock(&self.identity);
        if let Some(record) = slot.as_ref() {
            return Ok(record.clone());
        }
        let record = identity::load_or_create(&self.path)?;
        *slot = Some(record.clone());
        Ok(record)
    }

    pub fn id(&self) -> Result<String> {
        Ok(self.identity()?.id)
    }

    /// Creation time in seconds since the Unix epoch.
    pub fn created_at(&self) -> Result<i64> {
        Ok(self.identity()?.created_at)
    }

    /// Delete the sidecar and forget the in-memory identity. The next
    /// [`id`](Self::id) call issues a fresh ID.
    pub fn unset_id(&self) -> Result<()> {
        let mut slot = lock(&self.identity);
        identity::remove(&self.path)?;
        *slot = None;
        Ok(())
    }

    // =========================================================================
    // Sub-albums
    // =========================================================================

    /// Direct sub-albums ordered by directory name. Archived sub-albums are
    /// left out unless `include_archived` is set; deeper descendants are not
    /// consulted.
    pub fn children(&self, include_archived: bool) -> Result<Vec<&Album>> {
        let all = cached(&self.sub_albums, || self.load_sub_albums())?;
        Ok(all
            .iter()
            .filter(|a| include_archived || !a.is_archived())
            .collect())
    }

    pub fn has_sub_albums(&self, include_archived: bool) -> Result<bool> {
        Ok(!self.children(include_archived)?.is_empty())
    }

    /// Albums at the bottom of the tree starting here, depth-first.
    ///
    /// An album with sub-albums is never a leaf, even when every one of them
    /// is archived and filtered out.
    pub fn leaf_albums(&self, include_archived: bool) -> Result<Vec<&Album>> {
        if !self.has_sub_albums(true)? {
            return Ok(vec![self]);
        }
        let mut leaves = Vec::new();
        for sub in self.children(include_archived)? {
            leaves.extend(sub.leaf_albums(include_archived)?);
        }
        Ok(leaves)
    }

    /// Pre-order traversal: `visit` this album, then each sub-album recursively.
    pub fn walk<F>(&self, visit: &mut F, include_archived: bool) -> Result<()>
    where
        F: FnMut(&Album) -> Result<()>,
    {
        visit(self)?;
        for sub in self.children(include_archived)? {
            sub.walk(visit, include_archived)?;
        }
        Ok(())
    }

    fn load_sub_albums(&self) -> Result<Vec<Album>> {
        let mut albums = Vec::new();
        for item in list_dir(&self.path)? {
            if !item.file_type().is_dir() {
                continue;
            }
            let Some(name) = item.file_name().to_str() else {
                debug!(path = %item.path().display(), "skipping non-UTF-8 directory name");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            albums.push(self.child(name));
        }
        Ok(albums)
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// All media grouped by title, orphan thumbnails included.
    pub fn content(&self) -> Result<&BTreeMap<String, ContentPair>> {
        cached(&self.content, || self.load_content())
    }

    /// Titles that have an original, with their thumbnails.
    pub fn visible_content(&self) -> Result<BTreeMap<&str, VisibleContent<'_>>> {
        Ok(self
            .content()?
            .iter()
            .filter_map(|(title, pair)| {
                pair.original.as_ref().map(|original| {
                    (
                        title.as_str(),
                        VisibleContent {
                            original,
                            thumbnail: pair.thumbnail.as_ref(),
                        },
                    )
                })
            })
            .collect())
    }

    /// Visible originals ordered by `order` (unordered last), then title.
    pub fn files(&self) -> Result<Vec<&Entry>> {
        let mut files: Vec<&Entry> = self
            .content()?
            .values()
            .filter_map(|pair| pair.original.as_ref())
            .collect();
        files.sort_by(|a, b| {
            (a.order().is_none(), a.order(), a.title())
                .cmp(&(b.order().is_none(), b.order(), b.title()))
        });
        Ok(files)
    }

    /// Thumbnail for the content titled `title`, if one exists.
    pub fn thumbnail_for(&self, title: &str) -> Result<Option<&Entry>> {
        Ok(self
            .content()?
            .get(title)
            .and_then(|pair| pair.thumbnail.as_ref()))
    }

    pub fn has_content(&self) -> Result<bool> {
        Ok(!self.files()?.is_empty())
    }

    pub fn has_imagery(&self) -> Result<bool> {
        Ok(self.files()?.iter().any(|e| e.is_image()))
    }

    pub fn has_video(&self) -> Result<bool> {
        Ok(self.files()?.iter().any(|e| e.is_video()))
    }

    /// The header image, if the reserved header file exists in this directory.
    pub fn header_image(&self) -> Option<Entry> {
        let name = &self.config.header_image_name;
        if !self.path.join(name).is_file() {
            return None;
        }
        Some(self.entry(name, ContentKind::Image))
    }

    fn entry(&self, name: &str, kind: ContentKind) -> Entry {
        Entry::new(
            &self.config,
            &self.path,
            &self.segments,
            self.within_archived,
            name,
            kind,
        )
    }

    fn is_reserved(&self, name: &str) -> bool {
        name == identity::SIDECAR_FILENAME || name == self.config.header_image_name
    }

    fn load_content(&self) -> Result<BTreeMap<String, ContentPair>> {
        let mut grouped: BTreeMap<String, ContentPair> = BTreeMap::new();

        for item in list_dir(&self.path)? {
            if !item.file_type().is_file() {
                continue;
            }
            let Some(name) = item.file_name().to_str() else {
                debug!(path = %item.path().display(), "skipping non-UTF-8 file name");
                continue;
            };

            let kind = content::classify(name, &self.config);
            if !kind.is_media() || self.is_reserved(name) {
                continue;
            }
            if naming::parse_file_name(name).is_none() {
                debug!(album = %self.path.display(), file = name, "name does not match file grammar, skipping");
                continue;
            }

            let entry = self.entry(name, kind);
            let slot = grouped.entry(entry.title().to_string()).or_default();
            let target = if entry.is_thumbnail() {
                &mut slot.thumbnail
            } else {
                &mut slot.original
            };
            if let Some(previous) = target.replace(entry) {
                debug!(
                    album = %self.path.display(),
                    replaced = previous.name(),
                    "two files share a content title, keeping the later one"
                );
            }
        }

        Ok(grouped)
    }
}

/// Single-level listing of `dir`, ordered by file name.
///
/// Symlinks are reported as symlinks, so they are neither albums nor content.
/// A linked directory would otherwise share its target's sidecar.
fn list_dir(dir: &Path) -> Result<Vec<walkdir::DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(|item| item.map_err(|e| walk_error(dir, e)))
        .collect()
}

fn walk_error(dir: &Path, err: walkdir::Error) -> GalleryError {
    let path = err.path().unwrap_or(dir).to_path_buf();
    match err.into_io_error() {
        Some(io) if io.kind() == ErrorKind::NotFound => {
            GalleryError::NotFound(path.display().to_string())
        }
        Some(io) => GalleryError::Io { path, source: io },
        None => GalleryError::Io {
            path,
            source: std::io::Error::other("filesystem loop detected"),
        },
    }
}

/// Fallible get-or-init for a memoized collection.
fn cached<T>(cell: &OnceLock<T>, load: impl FnOnce() -> Result<T>) -> Result<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = load()?;
    Ok(cell.get_or_init(|| value))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
