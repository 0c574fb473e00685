//! Files inside an album.
//!
//! An [`Entry`] is built from a single directory listing item. Its kind comes
//! from [`content::classify`](crate::content::classify) and its attributes from
//! [`naming::parse_file_name`](crate::naming::parse_file_name); nothing is read
//! from the file itself until a caption is requested.

use crate::config::GalleryConfig;
use crate::content::{self, ContentKind};
use crate::error::{GalleryError, Result};
use crate::naming::{self, ParsedFileName};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    name: String,
    extension: String,
    kind: ContentKind,
    order: Option<u64>,
    title: String,
    is_thumbnail: bool,
    own_archived: bool,
    album_archived: bool,
    structured: bool,
    url: String,
}

impl Entry {
    /// Build an entry for the file `name` inside `album_dir`.
    ///
    /// `album_segments` is the album's path below the catalog root and
    /// `album_archived` whether the album or any ancestor below the root is
    /// archived.
    pub(crate) fn new(
        config: &GalleryConfig,
        album_dir: &Path,
        album_segments: &[String],
        album_archived: bool,
        name: &str,
        kind: ContentKind,
    ) -> Self {
        let parsed = naming::parse_file_name(name);
        let extension = match &parsed {
            Some(p) => p.extension.clone(),
            None => name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .unwrap_or_default(),
        };
        let structured = parsed.is_some();
        let ParsedFileName {
            is_archived,
            order,
            title,
            is_thumbnail,
            ..
        } = parsed.unwrap_or_else(|| ParsedFileName {
            is_archived: false,
            order: None,
            title: name.to_string(),
            is_thumbnail: false,
            extension: String::new(),
        });

        Self {
            path: album_dir.join(name),
            name: name.to_string(),
            extension,
            kind,
            order,
            title,
            is_thumbnail,
            own_archived: is_archived,
            album_archived,
            structured,
            url: public_url(config, album_segments, name),
        }
    }

    /// Absolute filesystem path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Everything after the final `.`, empty if there is none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Leading-digit sort weight, `None` when the name has no digits.
    pub fn order(&self) -> Option<u64> {
        self.order
    }

    /// Parsed title. Falls back to the full file name when the name did not
    /// match the grammar (see [`has_structured_name`](Self::has_structured_name)).
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_thumbnail(&self) -> bool {
        self.is_thumbnail
    }

    /// True if the file carries its own archived marker or sits below an
    /// archived album.
    pub fn is_archived(&self) -> bool {
        self.own_archived || self.album_archived
    }

    /// Whether the name parsed under the file grammar.
    pub fn has_structured_name(&self) -> bool {
        self.structured
    }

    /// Public URL: the path below the catalog root, prefixed with
    /// `gallery_public_base_url`.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_image(&self) -> bool {
        self.kind == ContentKind::Image
    }

    pub fn is_video(&self) -> bool {
        self.kind == ContentKind::Video
    }

    /// Caption text from `<title>_caption.txt` next to this file, or an
    /// empty string if there is none.
    pub fn description(&self) -> Result<String> {
        let Some(dir) = self.path.parent() else {
            return Ok(String::new());
        };
        read_caption(&dir.join(content::caption_file_name(&self.title)))
    }
}

/// Read a caption file. A missing file is an empty caption.
pub(crate) fn read_caption(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(GalleryError::io(path, e)),
    }
}

fn public_url(config: &GalleryConfig, album_segments: &[String], name: &str) -> String {
    let mut url = config.gallery_public_base_url.trim_end_matches('/').to_string();
    for segment in album_segments.iter().map(String::as_str).chain([name]) {
        url.push('/');
        url.push_str(segment);
    }
    url
}
