//! CLI output formatting for catalog commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every album is shown
//! by its positional index among siblings and its title, with the directory
//! name, flags and relative path as indented context lines.
//!
//! # Output Format
//!
//! ## Tree
//!
//! ```text
//! Albums
//! 001 foo
//!     Source: foo
//!     001 all-archived
//!         Source: foo/all-archived
//!     002 bar (3 files)
//!         Source: foo/bar
//!     003 featured (3 files) [sticky]
//!         Source: foo/featured_s
//! ```
//!
//! ## Show
//!
//! ```text
//! bar
//!     Path: foo/bar
//!     Id: 5f0c2e9a4b7d4c1e9a3f8b6d2c4e1a7b
//!     Created: 1700000000
//!     Header: header.jpg
//! Albums
//! Files
//!     001 img-1
//!         Source: img-1.jpg
//!         Thumbnail: img-1_thumb.jpg
//!         Url: /gallery/foo/bar/img-1.jpg
//! ```
//!
//! ## Index
//!
//! ```text
//! Index (2 albums)
//!     5f0c2e9a... → foo
//!     9b1d44c0... → foo/bar
//! ```
//!
//! # Architecture
//!
//! Albums load lazily from disk, so each command first collects plain rows
//! ([`AlbumRow`], [`AlbumDetail`]) and then formats them. `format_*` functions
//! return `Vec<String>` and are pure; `print_*` wrappers write to stdout.

use crate::album::Album;
use crate::error::Result;
use crate::index::CatalogIndex;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional file count.
///
/// ```text
/// 001 bar (3 files)
/// 001 foo
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({} files)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// ` [archived, sticky]`-style suffix, empty when no flag is set.
fn flags_suffix(is_archived: bool, is_sticky: bool) -> String {
    let flags: Vec<&str> = [(is_archived, "archived"), (is_sticky, "sticky")]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect();
    if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    }
}

/// First line of `text`, truncated to `max` characters with `...`.
fn truncate_desc(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max).collect();
        format!("{}...", cut)
    }
}

// ============================================================================
// Collected rows
// ============================================================================

/// One album as shown in tree and leaf listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRow {
    /// Depth below the album the listing started from, 0-based.
    pub depth: usize,
    pub title: String,
    pub relative_path: String,
    pub is_archived: bool,
    pub is_sticky: bool,
    pub file_count: usize,
}

impl AlbumRow {
    pub fn from_album(album: &Album, depth: usize) -> Result<Self> {
        Ok(Self {
            depth,
            title: album.title().to_string(),
            relative_path: album.relative_path(),
            is_archived: album.is_archived(),
            is_sticky: album.is_sticky(),
            file_count: album.files()?.len(),
        })
    }
}

/// Every album below `start` in pre-order, `start` itself excluded.
pub fn collect_tree(start: &Album, include_archived: bool) -> Result<Vec<AlbumRow>> {
    let base = start.segments().len();
    let mut rows = Vec::new();
    start.walk(
        &mut |album| {
            let level = album.segments().len() - base;
            if level > 0 {
                rows.push(AlbumRow::from_album(album, level - 1)?);
            }
            Ok(())
        },
        include_archived,
    )?;
    Ok(rows)
}

/// Leaf albums below `start`, all at depth 0.
pub fn collect_leaves(start: &Album, include_archived: bool) -> Result<Vec<AlbumRow>> {
    start
        .leaf_albums(include_archived)?
        .into_iter()
        .map(|album| AlbumRow::from_album(album, 0))
        .collect()
}

/// A visible file as shown by `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub title: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub url: String,
    pub caption: String,
    pub is_archived: bool,
}

/// Everything `show` prints about one album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumDetail {
    pub name: String,
    pub relative_path: String,
    pub id: Option<String>,
    pub created_at: Option<i64>,
    pub is_archived: bool,
    pub is_sticky: bool,
    pub header: Option<String>,
    pub description: String,
    pub sub_albums: Vec<AlbumRow>,
    pub files: Vec<FileRow>,
}

impl AlbumDetail {
    /// Collect the detail view. The root has no identity and reports none.
    pub fn from_album(album: &Album) -> Result<Self> {
        let identity = if album.is_root() {
            None
        } else {
            Some(album.identity()?)
        };

        let mut files = Vec::new();
        for entry in album.files()? {
            files.push(FileRow {
                title: entry.title().to_string(),
                name: entry.name().to_string(),
                thumbnail: album
                    .thumbnail_for(entry.title())?
                    .map(|t| t.name().to_string()),
                url: entry.url().to_string(),
                caption: entry.description()?,
                is_archived: entry.is_archived(),
            });
        }

        let sub_albums = album
            .children(true)?
            .into_iter()
            .map(|sub| AlbumRow::from_album(sub, 0))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: album.name().to_string(),
            relative_path: album.relative_path(),
            id: identity.as_ref().map(|r| r.id.clone()),
            created_at: identity.as_ref().map(|r| r.created_at),
            is_archived: album.is_archived(),
            is_sticky: album.is_sticky(),
            header: album.header_image().map(|h| h.name().to_string()),
            description: album.description()?,
            sub_albums,
            files,
        })
    }
}

// ============================================================================
// Tree
// ============================================================================

/// Format the album tree with positional indices per sibling level.
pub fn format_tree(rows: &[AlbumRow]) -> Vec<String> {
    let mut lines = vec!["Albums".to_string()];
    let mut positions: Vec<usize> = Vec::new();

    for row in rows {
        positions.truncate(row.depth + 1);
        if positions.len() <= row.depth {
            positions.resize(row.depth + 1, 0);
        }
        positions[row.depth] += 1;

        let base_indent = indent(row.depth);
        lines.push(format!("{}{}", base_indent, album_header(positions[row.depth], row)));
        lines.push(format!("{}    Source: {}", base_indent, row.relative_path));
    }

    lines
}

pub fn print_tree(rows: &[AlbumRow]) {
    for line in format_tree(rows) {
        println!("{}", line);
    }
}

fn album_header(position: usize, row: &AlbumRow) -> String {
    let count = (row.file_count > 0).then_some(row.file_count);
    format!(
        "{}{}",
        entity_header(position, &row.title, count),
        flags_suffix(row.is_archived, row.is_sticky)
    )
}

// ============================================================================
// Leaves
// ============================================================================

/// Format leaf albums as a flat numbered list.
pub fn format_leaves(rows: &[AlbumRow]) -> Vec<String> {
    let mut lines = vec![format!("Leaves ({})", rows.len())];
    for (i, row) in rows.iter().enumerate() {
        lines.push(format!("    {}", album_header(i + 1, row)));
        lines.push(format!("        Source: {}", row.relative_path));
    }
    lines
}

pub fn print_leaves(rows: &[AlbumRow]) {
    for line in format_leaves(rows) {
        println!("{}", line);
    }
}

// ============================================================================
// Show
// ============================================================================

/// Format one album: identity and flags, then sub-albums and visible files.
pub fn format_album(detail: &AlbumDetail) -> Vec<String> {
    let mut lines = vec![format!(
        "{}{}",
        detail.name,
        flags_suffix(detail.is_archived, detail.is_sticky)
    )];
    lines.push(format!("    Path: {}", detail.relative_path));
    if let Some(ref id) = detail.id {
        lines.push(format!("    Id: {}", id));
    }
    if let Some(created_at) = detail.created_at {
        lines.push(format!("    Created: {}", created_at));
    }
    if let Some(ref header) = detail.header {
        lines.push(format!("    Header: {}", header));
    }
    let description = truncate_desc(&detail.description, 60);
    if !description.is_empty() {
        lines.push(format!("    Description: {}", description));
    }

    lines.push("Albums".to_string());
    for (i, sub) in detail.sub_albums.iter().enumerate() {
        lines.push(format!("    {}", album_header(i + 1, sub)));
    }

    lines.push("Files".to_string());
    for (i, file) in detail.files.iter().enumerate() {
        lines.push(format!(
            "    {}{}",
            entity_header(i + 1, &file.title, None),
            flags_suffix(file.is_archived, false)
        ));
        lines.push(format!("        Source: {}", file.name));
        if let Some(ref thumb) = file.thumbnail {
            lines.push(format!("        Thumbnail: {}", thumb));
        }
        lines.push(format!("        Url: {}", file.url));
        let caption = truncate_desc(&file.caption, 60);
        if !caption.is_empty() {
            lines.push(format!("        Caption: {}", caption));
        }
    }

    lines
}

pub fn print_album(detail: &AlbumDetail) {
    for line in format_album(detail) {
        println!("{}", line);
    }
}

// ============================================================================
// Index
// ============================================================================

/// Format the index as `id → path` lines, ordered by path.
pub fn format_index_table(index: &CatalogIndex) -> Vec<String> {
    let mut entries: Vec<(&str, &str)> = index.iter().collect();
    entries.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)));

    let mut lines = vec![format!("Index ({} albums)", entries.len())];
    for (id, path) in entries {
        lines.push(format!("    {} → {}", id, path));
    }
    lines
}

pub fn print_index_table(index: &CatalogIndex) {
    for line in format_index_table(index) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;

    fn row(depth: usize, title: &str, path: &str, files: usize) -> AlbumRow {
        AlbumRow {
            depth,
            title: title.to_string(),
            relative_path: path.to_string(),
            is_archived: false,
            is_sticky: false,
            file_count: files,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn entity_header_with_and_without_count() {
        assert_eq!(entity_header(1, "bar", Some(3)), "001 bar (3 files)");
        assert_eq!(entity_header(2, "foo", None), "002 foo");
    }

    #[test]
    fn flags_suffix_lists_set_flags() {
        assert_eq!(flags_suffix(false, false), "");
        assert_eq!(flags_suffix(true, false), " [archived]");
        assert_eq!(flags_suffix(true, true), " [archived, sticky]");
    }

    #[test]
    fn truncate_desc_keeps_first_line() {
        assert_eq!(truncate_desc("Short text\nmore", 40), "Short text");
        assert_eq!(truncate_desc("", 40), "");
    }

    #[test]
    fn truncate_desc_long_is_char_safe() {
        let text = "é".repeat(50);
        assert_eq!(truncate_desc(&text, 40), format!("{}...", "é".repeat(40)));
    }

    // =========================================================================
    // Tree
    // =========================================================================

    #[test]
    fn tree_positions_restart_per_sibling_level() {
        let rows = vec![
            row(0, "foo", "foo", 0),
            row(1, "bar", "foo/bar", 3),
            row(1, "baz", "foo/baz", 0),
            row(2, "bazzy", "foo/baz/bazzy", 3),
            row(1, "featured", "foo/featured_s", 3),
            row(0, "other", "other", 1),
        ];

        let lines = format_tree(&rows);

        assert_eq!(
            lines,
            vec![
                "Albums",
                "001 foo",
                "    Source: foo",
                "    001 bar (3 files)",
                "        Source: foo/bar",
                "    002 baz",
                "        Source: foo/baz",
                "        001 bazzy (3 files)",
                "            Source: foo/baz/bazzy",
                "    003 featured (3 files)",
                "        Source: foo/featured_s",
                "002 other (1 files)",
                "    Source: other",
            ]
        );
    }

    #[test]
    fn collect_tree_from_fixture() {
        let (_tmp, config) = setup_gallery();
        let root = album_at(&config, &[]);

        let rows = collect_tree(&root, false).unwrap();

        let paths: Vec<&str> = rows.iter().map(|r| r.relative_path.as_str()).collect();
        assert_eq!(paths.len(), 7);
        assert_eq!(paths[0], "foo");
        assert_eq!(rows[0].depth, 0);
        let bazzy = rows.iter().find(|r| r.title == "bazzy").unwrap();
        assert_eq!(bazzy.depth, 2);
        assert_eq!(bazzy.file_count, 3);
        let featured = rows.iter().find(|r| r.title == "featured").unwrap();
        assert!(featured.is_sticky);
    }

    #[test]
    fn collect_tree_with_archived() {
        let (_tmp, config) = setup_gallery();
        let rows = collect_tree(&album_at(&config, &[]), true).unwrap();
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().any(|r| r.is_archived && r.title == "boo"));
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    #[test]
    fn leaves_are_numbered_flat() {
        let (_tmp, config) = setup_gallery();
        let rows = collect_leaves(&album_at(&config, &["foo"]), false).unwrap();
        let lines = format_leaves(&rows);

        assert_eq!(lines[0], "Leaves (4)");
        assert_eq!(lines[1], "    001 bar (3 files)");
        assert_eq!(lines[2], "        Source: foo/bar");
        assert_eq!(lines[7], "    004 featured (3 files) [sticky]");
    }

    // =========================================================================
    // Show
    // =========================================================================

    #[test]
    fn album_detail_from_fixture() {
        let (_tmp, config) = setup_gallery();
        let dir = config.gallery_root_path.join("foo/bar");
        write_sidecar(&dir, "bar-id", 1234);
        fs::write(dir.join("img-2_caption.txt"), "Second image\nsecond line").unwrap();

        let detail = AlbumDetail::from_album(&album_at(&config, &["foo", "bar"])).unwrap();
        let lines = format_album(&detail);

        assert_eq!(lines[0], "bar");
        assert!(lines.contains(&"    Path: foo/bar".to_string()));
        assert!(lines.contains(&"    Id: bar-id".to_string()));
        assert!(lines.contains(&"    Created: 1234".to_string()));
        assert!(lines.contains(&"    Header: header.jpg".to_string()));
        assert!(lines.contains(&"        Thumbnail: img-1_thumb.jpg".to_string()));
        assert!(lines.contains(&"        Caption: Second image".to_string()));
        assert!(lines.contains(&"        Url: http://test.com/gallery/foo/bar/img-3.jpg".to_string()));
        assert_eq!(detail.files.len(), 3);
        assert!(detail.files[1].thumbnail.is_none());
    }

    #[test]
    fn root_detail_has_no_identity() {
        let (_tmp, config) = setup_gallery();
        let detail = AlbumDetail::from_album(&album_at(&config, &[])).unwrap();

        assert!(detail.id.is_none());
        assert_eq!(detail.sub_albums.len(), 1);
        assert!(!config.gallery_root_path.join(".meta.info").exists());
    }

    #[test]
    fn archived_files_are_flagged() {
        let (_tmp, config) = setup_gallery();
        let detail =
            AlbumDetail::from_album(&album_at(&config, &["foo", "baz", "bazzy"])).unwrap();
        let lines = format_album(&detail);
        assert!(lines.contains(&"    003 photo-3 [archived]".to_string()));
    }

    // =========================================================================
    // Index
    // =========================================================================

    #[test]
    fn index_table_is_ordered_by_path() {
        let mut index = CatalogIndex::empty();
        index.insert("b".into(), "foo".into());
        index.insert("a".into(), "foo/bar".into());

        assert_eq!(
            format_index_table(&index),
            vec!["Index (2 albums)", "    b → foo", "    a → foo/bar"]
        );
    }
}
