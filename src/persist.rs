//! Atomic file replacement for the catalog's own state files.
//!
//! Both the album sidecar and the index file are written through
//! [`write_atomic`]: the bytes go to a temporary file in the target's
//! directory, which is then renamed over the target. Readers see either the
//! old file or the new one, never a truncated one.

use crate::error::{GalleryError, Result};
use std::io::Write;
use std::path::Path;

/// Replace the file at `path` with `contents` in one rename.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| GalleryError::io(dir, e))?;
    tmp.write_all(contents)
        .map_err(|e| GalleryError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| GalleryError::io(path, e.error))?;
    Ok(())
}
