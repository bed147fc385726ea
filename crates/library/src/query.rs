//! Query engine — sort and window a selection.
//!
//! Unsorted queries stream: the database reports entities in its natural
//! order and a counting wrapper drops songs outside the window, so the
//! result set is never buffered. Sorted queries buffer: every matching
//! song is detached, stably sorted by the requested tag, sliced to the
//! window and only then reported.

use core::fmt;
use core::ops::Range;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tag::{compare_tags_with, ByteCollator, Collator, TagType};

use crate::error::LibraryError;
use crate::interface::Database;
use crate::selection::DatabaseSelection;
use crate::song::{DetachedSong, LightSong};
use crate::visitor::{VisitResult, Visitor};

/// Half-open range `[start, end)` of result positions. `end: None` is
/// unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// First position reported.
    pub start: usize,
    /// First position no longer reported; `None` for no limit.
    pub end: Option<usize>,
}

impl Window {
    /// Every position.
    pub const ALL: Window = Window {
        start: 0,
        end: None,
    };

    /// `[start, end)`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Window {
            start,
            end: Some(end),
        }
    }

    /// `[start, ∞)`.
    #[must_use]
    pub const fn starting_at(start: usize) -> Self {
        Window { start, end: None }
    }

    /// Does the window cover every position?
    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.start == 0 && self.end.is_none()
    }

    /// Is position `index` inside the window?
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && self.end.map_or(true, |end| index < end)
    }

    /// Positions of a `len`-long sequence inside the window; empty when
    /// `start >= len`.
    #[must_use]
    pub fn range(&self, len: usize) -> Range<usize> {
        let end = self.end.map_or(len, |end| end.min(len));
        if self.start >= end {
            return 0..0;
        }
        self.start..end
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::ALL
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}:{}", self.start, end),
            None => write!(f, "{}:", self.start),
        }
    }
}

/// Parses `START:END`, `START:` (unbounded) or `N` (just position `N`).
impl FromStr for Window {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LibraryError::InvalidWindow(s.to_owned());
        let parse = |n: &str| n.trim().parse::<usize>().map_err(|_| invalid());

        let window = match s.split_once(':') {
            Some((start, "")) => Window::starting_at(parse(start)?),
            Some((start, end)) => Window::new(parse(start)?, parse(end)?),
            None => {
                let n = parse(s)?;
                Window::new(n, n.checked_add(1).ok_or_else(invalid)?)
            }
        };
        if window.end.is_some_and(|end| end < window.start) {
            return Err(invalid());
        }
        Ok(window)
    }
}

fn finish(result: VisitResult) -> VisitResult {
    match result {
        Err(LibraryError::Interrupted) => Ok(()),
        other => other,
    }
}

/// [`run_query_with`] using byte order for text fields.
///
/// # Errors
///
/// Whatever the database or a visitor callback returns, except
/// [`LibraryError::Interrupted`], which ends the query early and cleanly.
pub fn run_query<D: Database + ?Sized>(
    db: &D,
    selection: &DatabaseSelection<'_>,
    sort: Option<TagType>,
    window: Window,
    visitor: Visitor<'_>,
) -> VisitResult {
    run_query_with(&ByteCollator, db, selection, sort, window, visitor)
}

/// Run `selection` against `db`, reporting to `visitor`.
///
/// With `sort` absent, entities stream in the database's order and only
/// songs are counted against `window`. With `sort` set, songs are stably
/// sorted by that tag (text compared with `collator`) and windowed;
/// directories and playlists are still reported, in natural order, while
/// the songs are being collected. A filtered selection reports songs only.
///
/// # Errors
///
/// Whatever the database or a visitor callback returns, except
/// [`LibraryError::Interrupted`], which ends the query early and cleanly.
pub fn run_query_with<C, D>(
    collator: &C,
    db: &D,
    selection: &DatabaseSelection<'_>,
    sort: Option<TagType>,
    window: Window,
    mut visitor: Visitor<'_>,
) -> VisitResult
where
    C: Collator + ?Sized,
    D: Database + ?Sized,
{
    if selection.is_filtered() {
        visitor.songs_only();
    }

    match sort {
        None => stream(db, selection, window, visitor),
        Some(sort) => buffer(collator, db, selection, sort, window, visitor),
    }
}

fn stream<D: Database + ?Sized>(
    db: &D,
    selection: &DatabaseSelection<'_>,
    window: Window,
    mut visitor: Visitor<'_>,
) -> VisitResult {
    tracing::trace!(uri = selection.uri, %window, "streaming query");
    if !window.is_all() {
        if let Some(mut on_song) = visitor.song.take() {
            // With nothing but songs to report, the traversal can stop once
            // the window is exhausted.
            let stop_early = !visitor.wants_directories() && !visitor.wants_playlists();
            let mut index = 0usize;
            visitor.song = Some(Box::new(move |song: &LightSong<'_>| {
                let position = index;
                index = index.saturating_add(1);
                if window.contains(position) {
                    return on_song(song);
                }
                if stop_early && window.end.is_some_and(|end| position >= end) {
                    return Err(LibraryError::Interrupted);
                }
                Ok(())
            }));
        }
    }
    finish(db.visit(selection, &mut visitor))
}

fn buffer<C, D>(
    collator: &C,
    db: &D,
    selection: &DatabaseSelection<'_>,
    sort: TagType,
    window: Window,
    visitor: Visitor<'_>,
) -> VisitResult
where
    C: Collator + ?Sized,
    D: Database + ?Sized,
{
    let Visitor {
        directory,
        song,
        playlist,
    } = visitor;

    let Some(mut on_song) = song else {
        let mut rest = Visitor {
            directory,
            song: None,
            playlist,
        };
        return finish(db.visit(selection, &mut rest));
    };

    let mut songs: Vec<DetachedSong> = Vec::new();
    {
        let mut collect = Visitor {
            directory,
            song: None,
            playlist,
        }
        .with_song(|song: &LightSong<'_>| {
            songs.push(DetachedSong::from(song));
            Ok(())
        });
        if let Err(e) = db.visit(selection, &mut collect) {
            return finish(Err(e));
        }
    }

    songs.sort_by(|a, b| compare_tags_with(collator, sort, a.tag(), b.tag()));
    let range = window.range(songs.len());
    tracing::debug!(tag = %sort, collected = songs.len(), reported = range.len(), "buffered query");

    for song in songs.get(range).unwrap_or_default() {
        if let Err(e) = on_song(&song.as_light()) {
            return finish(Err(e));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn window_contains() {
        let w = Window::new(3, 6);
        assert!(!w.contains(2));
        assert!(w.contains(3));
        assert!(w.contains(5));
        assert!(!w.contains(6));
        assert!(Window::starting_at(3).contains(usize::MAX));
    }

    #[test]
    fn window_range_clamps() {
        assert_eq!(Window::new(3, 6).range(10), 3..6);
        assert_eq!(Window::new(8, 100).range(10), 8..10);
        assert!(Window::new(20, 100).range(10).is_empty());
        assert_eq!(Window::ALL.range(4), 0..4);
    }

    #[test]
    fn window_parsing() {
        assert_eq!("3:6".parse::<Window>().unwrap(), Window::new(3, 6));
        assert_eq!("5:".parse::<Window>().unwrap(), Window::starting_at(5));
        assert_eq!("7".parse::<Window>().unwrap(), Window::new(7, 8));
        assert!("6:3".parse::<Window>().is_err());
        assert!("x:3".parse::<Window>().is_err());
        assert_eq!(Window::new(3, 6).to_string(), "3:6");
    }
}
