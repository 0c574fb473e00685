//! Persistent album identity stored in a per-album sidecar file.
//!
//! Every album directory holds a small JSON file, `.meta.info`, with the
//! album's opaque ID and creation timestamp:
//!
//! ```json
//! {"id":"5f0c2e9a4b7d4c1e9a3f8b6d2c4e1a7b","created_at":1700000000}
//! ```
//!
//! The ID survives renames and moves of the directory, which is what lets the
//! catalog index address albums independently of their paths.
//!
//! ## Loading
//!
//! - Sidecar present: parse it. A missing `created_at` falls back to the
//!   directory's modification time and the completed record is written back.
//! - Sidecar absent: generate a fresh ID, take `created_at` from the
//!   directory's modification time, and write a new sidecar.
//!
//! Write failures are errors; an album never reports an identity that was
//! not persisted.

use crate::error::{GalleryError, Result};
use crate::persist;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::debug;

/// File name of the identity sidecar inside each album directory.
pub const SIDECAR_FILENAME: &str = ".meta.info";

/// A complete, persisted album identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRecord {
    pub id: String,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
}

/// On-disk shape as read. Older writers stored `created_at` as a string.
#[derive(Debug, Deserialize)]
struct SidecarFile {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    created_at: Option<RawTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(i64),
    Text(String),
}

impl RawTimestamp {
    fn seconds(&self) -> Option<i64> {
        match self {
            RawTimestamp::Seconds(s) => Some(*s),
            RawTimestamp::Text(t) => t.trim().parse().ok(),
        }
    }
}

/// Path of the sidecar file for an album directory.
pub fn sidecar_path(album_dir: &Path) -> PathBuf {
    album_dir.join(SIDECAR_FILENAME)
}

/// Generate a fresh album ID.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Load the album's identity, creating or completing the sidecar as needed.
pub fn load_or_create(album_dir: &Path) -> Result<IdentityRecord> {
    let path = sidecar_path(album_dir);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let record = IdentityRecord {
                id: generate_id(),
                created_at: directory_mtime(album_dir)?,
            };
            write(album_dir, &record)?;
            debug!(album = %album_dir.display(), id = %record.id, "created album sidecar");
            return Ok(record);
        }
        Err(e) => return Err(GalleryError::io(&path, e)),
    };

    let stored: SidecarFile = serde_json::from_str(&content)
        .map_err(|source| GalleryError::Sidecar {
            path: path.clone(),
            source,
        })?;

    let stored_id = stored.id.filter(|id| !id.is_empty());
    let stored_created = stored.created_at.as_ref().and_then(RawTimestamp::seconds);
    let is_complete = stored_id.is_some()
        && matches!(stored.created_at, Some(RawTimestamp::Seconds(_)));

    let record = IdentityRecord {
        id: stored_id.unwrap_or_else(generate_id),
        created_at: match stored_created {
            Some(s) => s,
            None => directory_mtime(album_dir)?,
        },
    };

    if !is_complete {
        write(album_dir, &record)?;
        debug!(album = %album_dir.display(), id = %record.id, "completed album sidecar");
    }

    Ok(record)
}

/// Atomically write a sidecar record, replacing any existing one.
pub fn write(album_dir: &Path, record: &IdentityRecord) -> Result<()> {
    let path = sidecar_path(album_dir);
    let json = serde_json::to_string(record).map_err(|source| GalleryError::Sidecar {
        path: path.clone(),
        source,
    })?;
    persist::write_atomic(&path, json.as_bytes())
}

/// Delete the album's sidecar. A sidecar that is already gone is not an error.
pub fn remove(album_dir: &Path) -> Result<()> {
    let path = sidecar_path(album_dir);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GalleryError::io(&path, e)),
    }
}

/// Modification time of a directory, in seconds since the Unix epoch.
pub fn directory_mtime(dir: &Path) -> Result<i64> {
    let modified = fs::metadata(dir)
        .and_then(|m| m.modified())
        .map_err(|e| GalleryError::io(dir, e))?;
    let secs = match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(before_epoch) => -(before_epoch.duration().as_secs() as i64),
    };
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_json(dir: &Path) -> serde_json::Value {
        let content = fs::read_to_string(sidecar_path(dir)).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn creates_sidecar_when_missing() {
        let tmp = TempDir::new().unwrap();
        assert!(!sidecar_path(tmp.path()).exists());

        let record = load_or_create(tmp.path()).unwrap();

        assert!(sidecar_path(tmp.path()).exists());
        assert!(!record.id.is_empty());
        assert!(record.created_at > 0);
        let json = read_json(tmp.path());
        assert_eq!(json["id"], record.id.as_str());
        assert_eq!(json["created_at"], record.created_at);
    }

    #[test]
    fn loads_existing_sidecar() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            sidecar_path(tmp.path()),
            r#"{"id":"foo","created_at":100000}"#,
        )
        .unwrap();

        let record = load_or_create(tmp.path()).unwrap();
        assert_eq!(record.id, "foo");
        assert_eq!(record.created_at, 100000);
    }

    #[test]
    fn repeated_loads_return_same_identity() {
        let tmp = TempDir::new().unwrap();
        let first = load_or_create(tmp.path()).unwrap();
        let second = load_or_create(tmp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_created_at_is_filled_and_written_back() {
        let tmp = TempDir::new().unwrap();
        fs::write(sidecar_path(tmp.path()), r#"{"id":"foo"}"#).unwrap();

        let record = load_or_create(tmp.path()).unwrap();

        assert_eq!(record.id, "foo");
        assert_eq!(record.created_at, directory_mtime(tmp.path()).unwrap());
        assert_eq!(read_json(tmp.path())["created_at"], record.created_at);
    }

    #[test]
    fn string_created_at_is_accepted_and_normalized() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            sidecar_path(tmp.path()),
            r#"{"id":"foo","created_at":"100000"}"#,
        )
        .unwrap();

        let record = load_or_create(tmp.path()).unwrap();

        assert_eq!(record.created_at, 100000);
        assert_eq!(read_json(tmp.path())["created_at"], 100000);
    }

    #[test]
    fn missing_id_is_generated_and_written_back() {
        let tmp = TempDir::new().unwrap();
        fs::write(sidecar_path(tmp.path()), r#"{"created_at":5}"#).unwrap();

        let record = load_or_create(tmp.path()).unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.created_at, 5);
        assert_eq!(read_json(tmp.path())["id"], record.id.as_str());
    }

    #[test]
    fn corrupt_sidecar_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(sidecar_path(tmp.path()), "not json").unwrap();

        let result = load_or_create(tmp.path());
        assert!(matches!(result, Err(GalleryError::Sidecar { .. })));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_or_create(&tmp.path().join("gone"));
        assert!(matches!(result, Err(GalleryError::Io { .. })));
    }

    #[test]
    fn remove_deletes_sidecar() {
        let tmp = TempDir::new().unwrap();
        load_or_create(tmp.path()).unwrap();

        remove(tmp.path()).unwrap();
        assert!(!sidecar_path(tmp.path()).exists());

        // Second removal is a no-op
        remove(tmp.path()).unwrap();
    }

    #[test]
    fn rewrite_replaces_sidecar_in_place() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            sidecar_path(tmp.path()),
            r#"{"id":"a-much-longer-previous-id","created_at":"100000"}"#,
        )
        .unwrap();

        let record = load_or_create(tmp.path()).unwrap();

        assert_eq!(read_json(tmp.path()), serde_json::json!({"id": record.id, "created_at": 100000}));
        // Only the sidecar remains, no temporary files
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![SIDECAR_FILENAME]);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let ids: std::collections::HashSet<String> = (0..100).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 100);
    }
}
