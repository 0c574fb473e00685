//! # fs-gallery
//!
//! A media catalog read straight from a directory tree. Directories are
//! albums, files are entries, and naming conventions carry the metadata:
//! a leading underscore archives, a trailing `_s` makes an album sticky, a
//! leading number orders files, and `_thumb` marks a thumbnail.
//!
//! # Architecture
//!
//! ```text
//! Catalog ── root Album ── Album ── Album ...      lazy, one listing per node
//!    │                       │
//!    │                       ├── .meta.info        persistent album ID
//!    │                       └── Entry ...         classified files
//!    └── gallery.idx                               album ID → relative path
//! ```
//!
//! Nothing is scanned up front. An album lists its directory the first time
//! its children or content are requested and keeps the result. The only
//! operation that walks the whole tree is [`Catalog::build_index`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Entry point: root album, path and ID lookups, index rebuild |
//! | [`album`] | Directory nodes: sub-albums, content pairing, traversal |
//! | [`entry`] | File nodes: parsed name attributes, URL, caption |
//! | [`naming`] | Album and file name grammar (archived, sticky, order, thumbnail) |
//! | [`content`] | Classification of files by name and extension |
//! | [`identity`] | `.meta.info` sidecar: load, create, complete, remove |
//! | [`index`] | `gallery.idx` load and atomic save |
//! | `persist` | Temp-file-and-rename writes shared by the sidecar and the index |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`error`] | Error taxonomy shared by every module |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Filesystem Is the Database
//!
//! Titles, ordering and visibility come from names alone. The only state the
//! catalog writes is the per-album sidecar and the index file, and both can
//! be regenerated from the tree.
//!
//! ## IDs Survive Moves
//!
//! An album's ID lives inside its directory, so renaming or moving the
//! directory keeps the ID. The index is a cache of where each ID was last
//! seen; a stale entry triggers one rebuild and one retry.
//!
//! ## Explicit Configuration
//!
//! A [`GalleryConfig`](config::GalleryConfig) is passed to
//! [`Catalog::open`] and shared with every album and entry. There is no
//! global state.

pub mod album;
pub mod catalog;
pub mod config;
pub mod content;
pub mod entry;
pub mod error;
pub mod identity;
pub mod index;
pub mod naming;
pub mod output;
mod persist;

pub use album::Album;
pub use catalog::Catalog;
pub use entry::Entry;
pub use error::{GalleryError, Result};

#[cfg(test)]
pub(crate) mod test_helpers;
