//! Catalog configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by whatever keys the user file sets; everything else keeps its
//! default. The resolved [`GalleryConfig`] is immutable and shared by the
//! catalog and every album/entry built from it.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! gallery_root_path = "gallery"          # Catalog root directory (created if missing)
//! gallery_public_base_url = "/gallery"   # Replaces the root path in entry URLs
//! header_image_name = "header.jpg"       # Reserved album header file name
//! index_storage_directory = ".gallery-index"  # Where gallery.idx is written
//! path_delimiter = "/"                   # Separator for relative path strings
//! image_extensions = ["jpg", "jpeg", "png", "webp"]
//! video_extensions = ["mp4"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the configuration file.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Catalog configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Catalog root directory. Every album path is below it.
    pub gallery_root_path: PathBuf,
    /// Public URL prefix substituted for the root path in entry URLs.
    pub gallery_public_base_url: String,
    /// Reserved file name of an album's header image.
    pub header_image_name: String,
    /// Directory holding the catalog index file.
    pub index_storage_directory: PathBuf,
    /// Separator used when building and parsing relative path strings.
    pub path_delimiter: String,
    /// Extensions (without dot, case-insensitive) classified as images.
    pub image_extensions: Vec<String>,
    /// Extensions (without dot, case-insensitive) classified as videos.
    pub video_extensions: Vec<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            gallery_root_path: PathBuf::from("gallery"),
            gallery_public_base_url: "/gallery".to_string(),
            header_image_name: "header.jpg".to_string(),
            index_storage_directory: PathBuf::from(".gallery-index"),
            path_delimiter: "/".to_string(),
            image_extensions: ["jpg", "jpeg", "png", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            video_extensions: vec!["mp4".to_string()],
        }
    }
}

impl GalleryConfig {
    /// Default configuration rooted at `root`, with the index stored inside it.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            index_storage_directory: root.join(".gallery-index"),
            gallery_root_path: root,
            ..Self::default()
        }
    }

    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path_delimiter.chars().count() != 1 {
            return Err(ConfigError::Validation(
                "path_delimiter must be exactly one character".into(),
            ));
        }
        if self.gallery_public_base_url.is_empty() {
            return Err(ConfigError::Validation(
                "gallery_public_base_url must not be empty".into(),
            ));
        }
        if self.header_image_name.is_empty() {
            return Err(ConfigError::Validation(
                "header_image_name must not be empty".into(),
            ));
        }
        if self.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "image_extensions must not be empty".into(),
            ));
        }
        if self.video_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "video_extensions must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The configured delimiter. Validated configs always have exactly one.
    pub fn delimiter(&self) -> &str {
        &self.path_delimiter
    }

    /// Join path segments with the configured delimiter.
    pub fn join_segments<S: AsRef<str>>(&self, segments: &[S]) -> String {
        segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(self.delimiter())
    }

    /// Split a relative path string on the configured delimiter.
    ///
    /// Empty segments (leading, trailing or doubled delimiters) are dropped,
    /// so `""` yields no segments.
    pub fn split_segments(&self, path: &str) -> Vec<String> {
        path.split(self.delimiter())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn is_video_extension(&self, ext: &str) -> bool {
        self.video_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(GalleryConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to defaults when absent.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# fs-gallery Configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Catalog root directory. Created if it does not exist.
gallery_root_path = "gallery"

# Public URL prefix. An entry's URL is its path with the root directory
# replaced by this prefix.
gallery_public_base_url = "/gallery"

# Reserved file name for album header images. Never listed as content.
header_image_name = "header.jpg"

# Directory holding the catalog index file (gallery.idx). Created if missing.
index_storage_directory = ".gallery-index"

# Separator used for relative album path strings, e.g. in the index file
# and for `show --path`. Must be a single character.
path_delimiter = "/"

# ---------------------------------------------------------------------------
# Content classification (extensions without dot, case-insensitive)
# ---------------------------------------------------------------------------
image_extensions = ["jpg", "jpeg", "png", "webp"]
video_extensions = ["mp4"]
"##
}
