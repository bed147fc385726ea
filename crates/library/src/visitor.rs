//! Visitor — the per-kind callbacks a traversal reports entities to.
//!
//! Each of the three callbacks is optional; an absent callback means
//! "do not report this kind", and databases may skip work accordingly.
//! A callback returning an error stops the traversal and the error
//! propagates to the caller. [`LibraryError::Interrupted`] is the
//! conventional "enough, stop now" signal.

use std::fmt;

use crate::directory::{LightDirectory, PlaylistInfo};
use crate::error::LibraryError;
use crate::song::LightSong;

/// Result of one visitor callback.
pub type VisitResult = Result<(), LibraryError>;

pub(crate) type DirectoryFn<'v> = Box<dyn FnMut(&LightDirectory<'_>) -> VisitResult + 'v>;
pub(crate) type SongFn<'v> = Box<dyn FnMut(&LightSong<'_>) -> VisitResult + 'v>;
pub(crate) type PlaylistFn<'v> =
    Box<dyn FnMut(&PlaylistInfo, &LightDirectory<'_>) -> VisitResult + 'v>;

/// Callback set driving one traversal.
#[derive(Default)]
pub struct Visitor<'v> {
    pub(crate) directory: Option<DirectoryFn<'v>>,
    pub(crate) song: Option<SongFn<'v>>,
    pub(crate) playlist: Option<PlaylistFn<'v>>,
}

impl<'v> Visitor<'v> {
    /// A visitor that reports nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report directories to `f`.
    #[must_use]
    pub fn with_directory<F>(mut self, f: F) -> Self
    where
        F: FnMut(&LightDirectory<'_>) -> VisitResult + 'v,
    {
        self.directory = Some(Box::new(f));
        self
    }

    /// Report songs to `f`.
    #[must_use]
    pub fn with_song<F>(mut self, f: F) -> Self
    where
        F: FnMut(&LightSong<'_>) -> VisitResult + 'v,
    {
        self.song = Some(Box::new(f));
        self
    }

    /// Report playlists, with their containing directory, to `f`.
    #[must_use]
    pub fn with_playlist<F>(mut self, f: F) -> Self
    where
        F: FnMut(&PlaylistInfo, &LightDirectory<'_>) -> VisitResult + 'v,
    {
        self.playlist = Some(Box::new(f));
        self
    }

    /// Is a directory callback present?
    #[must_use]
    pub fn wants_directories(&self) -> bool {
        self.directory.is_some()
    }

    /// Is a song callback present?
    #[must_use]
    pub fn wants_songs(&self) -> bool {
        self.song.is_some()
    }

    /// Is a playlist callback present?
    #[must_use]
    pub fn wants_playlists(&self) -> bool {
        self.playlist.is_some()
    }

    /// Report `directory`; a no-op when no directory callback is present.
    ///
    /// # Errors
    ///
    /// Whatever the callback returns.
    pub fn visit_directory(&mut self, directory: &LightDirectory<'_>) -> VisitResult {
        match self.directory.as_mut() {
            Some(f) => f(directory),
            None => Ok(()),
        }
    }

    /// Report `song`; a no-op when no song callback is present.
    ///
    /// # Errors
    ///
    /// Whatever the callback returns.
    pub fn visit_song(&mut self, song: &LightSong<'_>) -> VisitResult {
        match self.song.as_mut() {
            Some(f) => f(song),
            None => Ok(()),
        }
    }

    /// Report `playlist` inside `directory`; a no-op when no playlist
    /// callback is present.
    ///
    /// # Errors
    ///
    /// Whatever the callback returns.
    pub fn visit_playlist(
        &mut self,
        playlist: &PlaylistInfo,
        directory: &LightDirectory<'_>,
    ) -> VisitResult {
        match self.playlist.as_mut() {
            Some(f) => f(playlist, directory),
            None => Ok(()),
        }
    }

    /// Drop the directory and playlist callbacks.
    pub(crate) fn songs_only(&mut self) {
        self.directory = None;
        self.playlist = None;
    }
}

impl fmt::Debug for Visitor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visitor")
            .field("directory", &self.wants_directories())
            .field("song", &self.wants_songs())
            .field("playlist", &self.wants_playlists())
            .finish()
    }
}
