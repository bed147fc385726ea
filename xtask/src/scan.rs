//! Scan a local music folder into a `MemoryDatabase`.
//!
//! Metadata is inferred from folder structure: `{Artist}/{Album}/{NN} - {Title}.{ext}`
//! No tag parsing: files are never opened.

use std::path::Path;
use std::time::SystemTime;

use anyhow::Result;
use library::MemoryDatabase;
use tag::{Tag, TagBuilder, TagMask, TagPool, TagType};
use walkdir::WalkDir;

const AUDIO_EXTENSIONS: &[&str] = &["flac", "mp3", "wav", "aiff", "ogg", "opus", "m4a"];
const PLAYLIST_EXTENSIONS: &[&str] = &["m3u", "m3u8", "pls", "cue"];

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Library URI of `path` below `root`, `/`-separated.
fn uri_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.iter().map(|c| c.to_str()).collect();
    Some(parts?.join("/"))
}

fn mtime(entry: &walkdir::DirEntry) -> Option<SystemTime> {
    entry.metadata().ok().and_then(|m| m.modified().ok())
}

/// Build a database from every audio file, playlist and directory under
/// `music_dir`, interning tags into `pool` and keeping only `enabled` types.
pub fn scan_into(pool: &TagPool, enabled: TagMask, music_dir: &Path) -> Result<MemoryDatabase> {
    let db = MemoryDatabase::new();
    let mut songs = 0usize;

    for entry in WalkDir::new(music_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Some(uri) = uri_for(music_dir, entry.path()) else {
            tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 path");
            continue;
        };

        if entry.file_type().is_dir() {
            db.add_directory(&uri, mtime(&entry))?;
            continue;
        }
        let ext = extension(entry.path());
        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            let tag = infer_tag_from_path(pool, enabled, entry.path());
            db.add_song(&uri, tag, mtime(&entry))?;
            songs = songs.saturating_add(1);
        } else if PLAYLIST_EXTENSIONS.contains(&ext.as_str()) {
            db.add_playlist(&uri, mtime(&entry))?;
        }
    }

    tracing::info!(dir = %music_dir.display(), songs, "scan complete");
    Ok(db)
}

/// Infer a `Tag` from file path components.
///
/// Expected structure: `{Artist}/{Album}/{NN} - {Title}.{ext}`
/// or fallback to filename as title with no artist/album.
pub(crate) fn infer_tag_from_path(pool: &TagPool, enabled: TagMask, path: &Path) -> Tag {
    let components: Vec<&str> = path.iter().filter_map(|c| c.to_str()).collect();
    let mut parents = components.iter().rev().skip(1);
    let album = parents.next().copied().unwrap_or("");
    let artist = parents.next().copied().unwrap_or("");
    let filename = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");

    let (track_number, title) = parse_filename(filename);

    let mut builder = TagBuilder::new(pool).with_enabled(enabled);
    builder.add_item(TagType::Artist, artist);
    builder.add_item(TagType::Album, album);
    builder.add_item(TagType::Title, title);
    if track_number > 0 {
        builder.add_item(TagType::Track, &track_number.to_string());
    }
    builder.commit()
}

/// Parse `"02 - Track Title"` → `(2, "Track Title")`.
/// Returns `(0, filename)` if no leading number found.
fn parse_filename(filename: &str) -> (u16, &str) {
    let digits = filename
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    let (Some(number), Some(rest)) = (filename.get(..digits), filename.get(digits..)) else {
        return (0, filename);
    };
    if number.is_empty() {
        return (0, filename);
    }
    let num: u16 = number.parse().unwrap_or(0);
    (num, rest.trim_start_matches([' ', '-', '.']))
}
