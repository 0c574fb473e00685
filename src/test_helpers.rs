//! Shared test utilities for the fs-gallery test suite.
//!
//! Builds the reference catalog tree in a temp directory and provides lookup
//! helpers that panic with a clear message on miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (_tmp, config) = setup_gallery();
//! let foo = album_at(&config, &["foo"]);
//!
//! let bar = find_child(&foo, "bar");
//! assert_eq!(child_names(&foo), vec!["all-archived", "bar", "baz", "featured_s"]);
//! ```
//!
//! # Fixture tree
//!
//! ```text
//! <tmp>/gallery/foo/
//! ├── bar/                 header.jpg, img-1.jpg, img-1_thumb.jpg, img-2.jpg,
//! │                        img-3.jpg, img-3_thumb.jpg
//! ├── baz/bazzy/           photo-1.jpg, photo-2.jpg, _photo-3.jpg, photo-3_thumb.jpg
//! ├── baz/bazzybazz/       photo-1.jpg, 2_photo-2.jpg, 1_photo-3.jpg, photo-3_thumb.jpg
//! ├── _boo/                photo-a.jpg, photo-b.jpg, photo-c.jpg, sample-vid-1.mp4
//! ├── featured_s/          preview-a.mp4, preview-b.mp4, preview-c.mp4
//! └── all-archived/        _bazzy/ and _bazzybazz/, each with photo-1..3.jpg
//!                          and photo-3_thumb.jpg
//! ```
//!
//! The index storage directory is `<tmp>/index`, outside the catalog root.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::album::Album;
use crate::config::GalleryConfig;
use crate::identity::{self, IdentityRecord};

// =========================================================================
// Fixture setup
// =========================================================================

const FIXTURE: &[(&str, &[&str])] = &[
    (
        "foo/bar",
        &[
            "header.jpg",
            "img-1.jpg",
            "img-1_thumb.jpg",
            "img-2.jpg",
            "img-3.jpg",
            "img-3_thumb.jpg",
        ],
    ),
    (
        "foo/baz/bazzy",
        &["photo-1.jpg", "photo-2.jpg", "_photo-3.jpg", "photo-3_thumb.jpg"],
    ),
    (
        "foo/baz/bazzybazz",
        &["photo-1.jpg", "2_photo-2.jpg", "1_photo-3.jpg", "photo-3_thumb.jpg"],
    ),
    (
        "foo/_boo",
        &["photo-a.jpg", "photo-b.jpg", "photo-c.jpg", "sample-vid-1.mp4"],
    ),
    (
        "foo/featured_s",
        &["preview-a.mp4", "preview-b.mp4", "preview-c.mp4"],
    ),
    (
        "foo/all-archived/_bazzy",
        &["photo-1.jpg", "photo-2.jpg", "photo-3.jpg", "photo-3_thumb.jpg"],
    ),
    (
        "foo/all-archived/_bazzybazz",
        &["photo-1.jpg", "photo-2.jpg", "photo-3.jpg", "photo-3_thumb.jpg"],
    ),
];

/// Create the fixture tree in a temp directory and return a config for it.
///
/// Keep the `TempDir` alive for the duration of the test.
pub fn setup_gallery() -> (TempDir, Arc<GalleryConfig>) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("gallery");

    for (dir, files) in FIXTURE {
        let album_dir = root.join(dir);
        fs::create_dir_all(&album_dir).unwrap();
        for file in *files {
            let body = if file.ends_with(".mp4") {
                "video_file"
            } else {
                "image_file"
            };
            fs::write(album_dir.join(file), body).unwrap();
        }
    }

    let config = GalleryConfig {
        gallery_root_path: root,
        gallery_public_base_url: "http://test.com/gallery".into(),
        index_storage_directory: tmp.path().join("index"),
        ..GalleryConfig::default()
    };
    (tmp, Arc::new(config))
}

/// Write a sidecar with a known identity into `album_dir`.
pub fn write_sidecar(album_dir: &Path, id: &str, created_at: i64) {
    identity::write(
        album_dir,
        &IdentityRecord {
            id: id.to_string(),
            created_at,
        },
    )
    .unwrap();
}

// =========================================================================
// Album lookups: panics with a clear message on miss
// =========================================================================

/// A fresh album at `segments` below the fixture root.
pub fn album_at(config: &Arc<GalleryConfig>, segments: &[&str]) -> Album {
    Album::at(
        Arc::clone(config),
        segments.iter().map(|s| s.to_string()).collect(),
    )
}

/// Find a direct child by directory name, archived ones included. Panics if
/// not found.
pub fn find_child<'a>(album: &'a Album, name: &str) -> &'a Album {
    let children = album.children(true).unwrap();
    children
        .iter()
        .copied()
        .find(|a| a.name() == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = children.iter().map(|a| a.name()).collect();
            panic!("album '{name}' not found in '{}'. Available: {names:?}", album.name())
        })
}

/// Directory names of non-archived children.
pub fn child_names(album: &Album) -> Vec<String> {
    album_names(&album.children(false).unwrap())
}

/// Directory names of a list of albums, in order.
pub fn album_names(albums: &[&Album]) -> Vec<String> {
    albums.iter().map(|a| a.name().to_string()).collect()
}
