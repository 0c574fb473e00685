//! Centralized name parsing for the underscore naming convention.
//!
//! Albums and files carry their attributes in their names, so the catalog
//! needs no database:
//!
//! ## Album (folder) names
//!
//! - `_name` → archived (hidden from default listings)
//! - `name_s` → sticky (pinned/featured by the consumer)
//! - `_name_s` → both
//!
//! The archived marker is stripped first, then the sticky suffix. A strip is
//! only applied when it leaves a non-empty title, so degenerate names like
//! `_` or `__s` keep their text as the title instead of failing.
//!
//! ## File names
//!
//! ```text
//! [_][NNN[_]]title[_thumb].ext
//! ```
//!
//! - `_photo.jpg` → archived
//! - `2_photo-2.jpg` → order 2, title "photo-2"
//! - `photo-3_thumb.jpg` → thumbnail of "photo-3"
//!
//! Names without an extension, or with nothing left after stripping the
//! markers, carry no structured data: [`parse_file_name`] returns `None` and
//! the caller treats the file as unrecognized content.

/// Leading marker for archived albums and files.
pub const ARCHIVED_MARKER: char = '_';

/// Trailing marker for sticky albums.
pub const STICKY_SUFFIX: &str = "_s";

/// Trailing marker for thumbnail files (before the extension).
pub const THUMBNAIL_SUFFIX: &str = "_thumb";

/// Result of parsing a folder name like `_travel_s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAlbumName {
    pub is_archived: bool,
    pub is_sticky: bool,
    /// Name with the archived marker and sticky suffix removed.
    pub title: String,
}

/// Result of parsing a file name like `_2_photo-3_thumb.jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFileName {
    pub is_archived: bool,
    /// Leading decimal digits, if any.
    pub order: Option<u64>,
    /// Never empty.
    pub title: String,
    pub is_thumbnail: bool,
    /// Everything after the final `.`, never empty.
    pub extension: String,
}

/// Parse a folder name following the `[_]title[_s]` convention.
///
/// - `"_boo"` → archived, title "boo"
/// - `"featured_s"` → sticky, title "featured"
/// - `"_old_s"` → archived and sticky, title "old"
/// - `"_"` → neither, title "_"
pub fn parse_album_name(name: &str) -> ParsedAlbumName {
    let (is_archived, rest) = match name.strip_prefix(ARCHIVED_MARKER) {
        Some(stripped) if !stripped.is_empty() => (true, stripped),
        _ => (false, name),
    };

    let (is_sticky, title) = match rest.strip_suffix(STICKY_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => (true, stripped),
        _ => (false, rest),
    };

    ParsedAlbumName {
        is_archived,
        is_sticky,
        title: title.to_string(),
    }
}

/// Parse a file name following the `[_][NNN[_]]title[_thumb].ext` convention.
///
/// Returns `None` when the name has no extension or no title.
pub fn parse_file_name(name: &str) -> Option<ParsedFileName> {
    let (stem, extension) = name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }

    let (is_archived, rest) = match stem.strip_prefix(ARCHIVED_MARKER) {
        Some(stripped) => (true, stripped),
        None => (false, stem),
    };

    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let (digits, rest) = rest.split_at(digits_end);
    // Overlong digit runs still strip, they just don't yield an order.
    let order = digits.parse::<u64>().ok();
    let rest = if digits.is_empty() {
        rest
    } else {
        rest.strip_prefix('_').unwrap_or(rest)
    };

    let (is_thumbnail, title) = match rest.strip_suffix(THUMBNAIL_SUFFIX) {
        Some(stripped) => (true, stripped),
        None => (false, rest),
    };

    if title.is_empty() {
        return None;
    }

    Some(ParsedFileName {
        is_archived,
        order,
        title: title.to_string(),
        is_thumbnail,
        extension: extension.to_string(),
    })
}
