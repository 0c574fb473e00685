//! Content classification by file name and extension.
//!
//! Classification never looks at file contents. Rules apply in order, first
//! match wins:
//!
//! 1. name equals the album sidecar name (`.meta.info`) → [`ContentKind::AlbumMetadata`]
//! 2. name ends with `_caption.txt` → [`ContentKind::Description`]
//! 3. extension in `image_extensions` → [`ContentKind::Image`]
//! 4. extension in `video_extensions` → [`ContentKind::Video`]
//! 5. anything else → [`ContentKind::Unrecognized`]

use crate::config::GalleryConfig;
use crate::identity::SIDECAR_FILENAME;
use serde::Serialize;

/// Suffix of caption files. `photo-1_caption.txt` captions the content titled `photo-1`.
pub const CAPTION_SUFFIX: &str = "_caption.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Image,
    Video,
    Description,
    AlbumMetadata,
    Unrecognized,
}

impl ContentKind {
    /// Whether entries of this kind can appear in an album's visible content.
    pub fn is_media(self) -> bool {
        matches!(self, ContentKind::Image | ContentKind::Video)
    }
}

/// Classify a file by its name.
pub fn classify(file_name: &str, config: &GalleryConfig) -> ContentKind {
    if file_name == SIDECAR_FILENAME {
        return ContentKind::AlbumMetadata;
    }
    if file_name.ends_with(CAPTION_SUFFIX) {
        return ContentKind::Description;
    }
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return ContentKind::Unrecognized;
    };
    if config.is_image_extension(ext) {
        ContentKind::Image
    } else if config.is_video_extension(ext) {
        ContentKind::Video
    } else {
        ContentKind::Unrecognized
    }
}

/// Name of the caption file for content titled `title`.
pub fn caption_file_name(title: &str) -> String {
    format!("{title}{CAPTION_SUFFIX}")
}
