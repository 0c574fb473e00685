//! Error types for catalog operations.

use crate::config::ConfigError;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GalleryError>;

#[derive(Error, Debug)]
pub enum GalleryError {
    /// A path or ID that does not resolve to an existing album.
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unreadable album sidecar {path}: {source}")]
    Sidecar {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unreadable catalog index {path}: {source}")]
    Index {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl GalleryError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        GalleryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GalleryError::NotFound(_))
    }
}
