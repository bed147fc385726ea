//! Print layer — turns query results into `name: value` response lines.
//!
//! The sink decides the wire format; this module decides what is emitted
//! and in which order.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use tag::{Tag, TagMask, TagType};

use crate::config::QueryShape;
use crate::context::LibraryContext;
use crate::directory::{LightDirectory, PlaylistInfo};
use crate::error::LibraryError;
use crate::filter::SongFilter;
use crate::path::{self, apply_base_flag};
use crate::query::{run_query, Window};
use crate::selection::DatabaseSelection;
use crate::song::LightSong;
use crate::stats::DatabaseStats;
use crate::visitor::{VisitResult, Visitor};

/// Line-oriented key/value output.
pub trait Response {
    /// Emit one `name: value` line.
    ///
    /// # Errors
    ///
    /// [`LibraryError::Io`] when the underlying writer fails.
    fn emit(&mut self, name: &str, value: fmt::Arguments<'_>) -> Result<(), LibraryError>;

    /// Tag types the client wants to see.
    fn tag_mask(&self) -> TagMask {
        TagMask::all()
    }
}

/// [`Response`] writing `name: value\n` to any [`Write`].
#[derive(Debug)]
pub struct LineResponse<W> {
    writer: W,
    tag_mask: TagMask,
}

impl<W: Write> LineResponse<W> {
    /// Wrap `writer`, showing every tag type.
    pub fn new(writer: W) -> Self {
        LineResponse {
            writer,
            tag_mask: TagMask::all(),
        }
    }

    /// Only print tag lines of types in `tag_mask`.
    #[must_use]
    pub fn with_tag_mask(mut self, tag_mask: TagMask) -> Self {
        self.tag_mask = tag_mask;
        self
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Response for LineResponse<W> {
    fn emit(&mut self, name: &str, value: fmt::Arguments<'_>) -> Result<(), LibraryError> {
        writeln!(self.writer, "{name}: {value}")?;
        Ok(())
    }

    fn tag_mask(&self) -> TagMask {
        self.tag_mask
    }
}

type PrintResult = Result<(), LibraryError>;

fn time_print<R: Response + ?Sized>(r: &mut R, name: &str, time: SystemTime) -> PrintResult {
    let time: DateTime<Utc> = time.into();
    r.emit(name, format_args!("{}", time.format("%Y-%m-%dT%H:%M:%SZ")))
}

fn tag_print<R: Response + ?Sized>(r: &mut R, tag_type: TagType, value: &str) -> PrintResult {
    r.emit(tag_type.name(), format_args!("{value}"))
}

fn tag_print_values<R: Response + ?Sized>(r: &mut R, tag: &Tag) -> PrintResult {
    let mask = r.tag_mask();
    for item in tag.iter().filter(|item| mask.test(item.tag_type())) {
        tag_print(r, item.tag_type(), item.value())?;
    }
    Ok(())
}

fn duration_print<R: Response + ?Sized>(r: &mut R, duration: Duration) -> PrintResult {
    let rounded = duration
        .as_secs()
        .saturating_add(u64::from(duration.subsec_millis() >= 500));
    r.emit("Time", format_args!("{rounded}"))?;
    r.emit("duration", format_args!("{:.3}", duration.as_secs_f64()))
}

fn print_directory_uri<R: Response + ?Sized>(
    r: &mut R,
    base: bool,
    directory: &LightDirectory<'_>,
) -> PrintResult {
    r.emit(
        "directory",
        format_args!("{}", apply_base_flag(directory.uri, base)),
    )
}

/// `directory:` line; nothing for the root.
///
/// # Errors
///
/// [`LibraryError::Io`] from the sink.
pub fn print_directory_brief<R: Response + ?Sized>(
    r: &mut R,
    base: bool,
    directory: &LightDirectory<'_>,
) -> PrintResult {
    if directory.is_root() {
        return Ok(());
    }
    print_directory_uri(r, base, directory)
}

/// `directory:` plus `Last-Modified:` when known; nothing for the root.
///
/// # Errors
///
/// [`LibraryError::Io`] from the sink.
pub fn print_directory_full<R: Response + ?Sized>(
    r: &mut R,
    base: bool,
    directory: &LightDirectory<'_>,
) -> PrintResult {
    if directory.is_root() {
        return Ok(());
    }
    print_directory_uri(r, base, directory)?;
    if let Some(mtime) = directory.mtime {
        time_print(r, "Last-Modified", mtime)?;
    }
    Ok(())
}

/// `playlist:` line for `name` inside `directory`.
///
/// With `base` set, or for a playlist in the root, only the name is
/// printed.
///
/// # Errors
///
/// [`LibraryError::Io`] from the sink.
pub fn print_playlist_in_directory<R: Response + ?Sized>(
    r: &mut R,
    base: bool,
    directory: Option<&str>,
    name: &str,
) -> PrintResult {
    match directory.filter(|d| !base && !d.is_empty()) {
        Some(directory) => r.emit("playlist", format_args!("{}", path::build(directory, name))),
        None => r.emit("playlist", format_args!("{}", apply_base_flag(name, base))),
    }
}

fn print_playlist_brief<R: Response + ?Sized>(
    r: &mut R,
    base: bool,
    playlist: &PlaylistInfo,
    directory: &LightDirectory<'_>,
) -> PrintResult {
    print_playlist_in_directory(r, base, Some(directory.uri), &playlist.name)
}

fn print_playlist_full<R: Response + ?Sized>(
    r: &mut R,
    base: bool,
    playlist: &PlaylistInfo,
    directory: &LightDirectory<'_>,
) -> PrintResult {
    print_playlist_brief(r, base, playlist, directory)?;
    if let Some(mtime) = playlist.mtime {
        time_print(r, "Last-Modified", mtime)?;
    }
    Ok(())
}

/// `file:` line for `song`.
///
/// # Errors
///
/// [`LibraryError::Io`] from the sink.
pub fn song_print_uri<R: Response + ?Sized>(
    r: &mut R,
    song: &LightSong<'_>,
    base: bool,
) -> PrintResult {
    match song.directory {
        Some(directory) if !base => {
            r.emit("file", format_args!("{}", path::build(directory, song.uri)))
        }
        _ => r.emit("file", format_args!("{}", apply_base_flag(song.uri, base))),
    }
}

fn print_embedded_playlist<R: Response + ?Sized>(
    r: &mut R,
    base: bool,
    song: &LightSong<'_>,
) -> PrintResult {
    if song.tag.has_playlist() {
        print_playlist_in_directory(r, base, song.directory, song.uri)?;
    }
    Ok(())
}

/// `file:` line, plus a `playlist:` line for an embedded playlist.
///
/// # Errors
///
/// [`LibraryError::Io`] from the sink.
pub fn print_song_brief<R: Response + ?Sized>(
    r: &mut R,
    base: bool,
    song: &LightSong<'_>,
) -> PrintResult {
    song_print_uri(r, song, base)?;
    print_embedded_playlist(r, base, song)
}

/// `file:`, `Last-Modified:`, every tag line the sink's mask allows, and
/// `Time:`/`duration:` when the duration is known.
///
/// # Errors
///
/// [`LibraryError::Io`] from the sink.
pub fn print_song_full<R: Response + ?Sized>(
    r: &mut R,
    base: bool,
    song: &LightSong<'_>,
) -> PrintResult {
    song_print_uri(r, song, base)?;
    if let Some(mtime) = song.mtime {
        time_print(r, "Last-Modified", mtime)?;
    }
    tag_print_values(r, song.tag)?;
    if let Some(duration) = song.tag.duration() {
        duration_print(r, duration)?;
    }
    print_embedded_playlist(r, base, song)
}

/// Print the result of `selection`, shaped by `shape`.
///
/// Filtered selections report songs only.
///
/// # Errors
///
/// [`LibraryError::NoDatabase`] without a database, otherwise whatever
/// the query or the sink returns.
pub fn db_selection_print<R: Response + ?Sized>(
    ctx: &LibraryContext,
    r: &mut R,
    selection: &DatabaseSelection<'_>,
    shape: &QueryShape,
) -> PrintResult {
    let db = ctx.database()?;
    let QueryShape {
        sort,
        window,
        base,
        full,
    } = *shape;

    let r = RefCell::new(r);
    let visitor = Visitor::new()
        .with_directory(|directory: &LightDirectory<'_>| {
            let mut r = r.borrow_mut();
            if full {
                print_directory_full(&mut **r, base, directory)
            } else {
                print_directory_brief(&mut **r, base, directory)
            }
        })
        .with_song(|song: &LightSong<'_>| {
            let mut r = r.borrow_mut();
            if full {
                print_song_full(&mut **r, base, song)
            } else {
                print_song_brief(&mut **r, base, song)
            }
        })
        .with_playlist(|playlist: &PlaylistInfo, directory: &LightDirectory<'_>| {
            let mut r = r.borrow_mut();
            if full {
                print_playlist_full(&mut **r, base, playlist, directory)
            } else {
                print_playlist_brief(&mut **r, base, playlist, directory)
            }
        });

    run_query(db, selection, sort, window, visitor)
}

/// What [`print_unique_tags`] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueTagKind {
    /// Every song URI, ungrouped.
    File,
    /// Distinct values of one tag type.
    Tag(TagType),
}

fn print_unique_tag<R: Response + ?Sized>(r: &mut R, tag_type: TagType, tag: &Tag) -> PrintResult {
    tag_print(r, tag_type, tag.get_value(tag_type).unwrap_or(""))?;
    let mask = r.tag_mask();
    for item in tag.iter() {
        let t = item.tag_type();
        if t != tag_type && mask.test(t) {
            tag_print(r, t, item.value())?;
        }
    }
    Ok(())
}

/// List every song URI, or every distinct value of a tag type followed by
/// its grouped items, over the whole database.
///
/// # Errors
///
/// [`LibraryError::NoDatabase`] without a database, otherwise whatever
/// the traversal or the sink returns.
pub fn print_unique_tags<R: Response + ?Sized>(
    ctx: &LibraryContext,
    r: &mut R,
    kind: UniqueTagKind,
    group_mask: TagMask,
    filter: Option<&SongFilter>,
) -> PrintResult {
    let db = ctx.database()?;
    let selection = DatabaseSelection::new("", true, filter);

    match kind {
        UniqueTagKind::File => {
            let visitor =
                Visitor::new().with_song(|song: &LightSong<'_>| song_print_uri(&mut *r, song, false));
            run_query(db, &selection, None, Window::ALL, visitor)
        }
        UniqueTagKind::Tag(tag_type) => {
            let mut on_tag = |tag: &Tag| -> VisitResult { print_unique_tag(&mut *r, tag_type, tag) };
            db.visit_unique_tags(ctx.pool(), &selection, tag_type, group_mask, &mut on_tag)
        }
    }
}

/// `artists:`, `albums:`, `songs:` and `db_playtime:` lines.
///
/// # Errors
///
/// [`LibraryError::Io`] from the sink.
pub fn print_stats<R: Response + ?Sized>(r: &mut R, stats: &DatabaseStats) -> PrintResult {
    r.emit("artists", format_args!("{}", stats.artist_count))?;
    r.emit("albums", format_args!("{}", stats.album_count))?;
    r.emit("songs", format_args!("{}", stats.song_count))?;
    r.emit("db_playtime", format_args!("{}", stats.total_duration.as_secs()))
}
