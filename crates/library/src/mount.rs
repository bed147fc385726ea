//! Mount composer — present a database as a subtree of another namespace.
//!
//! Every entity the wrapped database reports is re-issued with its URI
//! prefixed by the mount point: the root directory becomes exactly the
//! mount point, everything else `base/uri`. The prefixed view is built
//! fresh for each callback; the wrapped database is never touched.

use std::borrow::Cow;

use crate::directory::{LightDirectory, PlaylistInfo};
use crate::error::LibraryError;
use crate::interface::Database;
use crate::path;
use crate::selection::DatabaseSelection;
use crate::song::LightSong;
use crate::visitor::{VisitResult, Visitor};

fn prefix_directory<'a>(base: &'a str, directory: &LightDirectory<'a>) -> Cow<'a, str> {
    if directory.is_root() {
        Cow::Borrowed(base)
    } else {
        path::build(base, directory.uri)
    }
}

/// Walk `db` with `selection`, reporting to `visitor` with every URI
/// prefixed by `base`.
///
/// `selection.uri` is relative to `db`'s root. The filter is applied to
/// the prefixed songs, so URI and base conditions see the mounted
/// namespace.
///
/// # Errors
///
/// Whatever `db` or a visitor callback returns.
pub fn walk_mount(
    base: &str,
    db: &dyn Database,
    selection: &DatabaseSelection<'_>,
    visitor: &mut Visitor<'_>,
) -> VisitResult {
    tracing::trace!(base, uri = selection.uri, "walking mount");

    let filter = selection.filter;
    let mut inner = Visitor::new();

    if let Some(visit_directory) = visitor.directory.as_mut() {
        inner = inner.with_directory(move |directory: &LightDirectory<'_>| {
            let uri = prefix_directory(base, directory);
            visit_directory(&LightDirectory {
                uri: &uri,
                mtime: directory.mtime,
            })
        });
    }

    if let Some(visit_song) = visitor.song.as_mut() {
        inner = inner.with_song(move |song: &LightSong<'_>| {
            let directory = match song.directory {
                Some(directory) => path::build(base, directory),
                None => Cow::Borrowed(base),
            };
            let prefixed = LightSong {
                directory: Some(&*directory),
                ..*song
            };
            if filter.map_or(true, |f| f.matches(&prefixed)) {
                visit_song(&prefixed)
            } else {
                Ok(())
            }
        });
    }

    if let Some(visit_playlist) = visitor.playlist.as_mut() {
        inner = inner.with_playlist(
            move |playlist: &PlaylistInfo, directory: &LightDirectory<'_>| {
                let uri = prefix_directory(base, directory);
                visit_playlist(
                    playlist,
                    &LightDirectory {
                        uri: &uri,
                        mtime: directory.mtime,
                    },
                )
            },
        );
    }

    let unfiltered = DatabaseSelection::new(selection.uri, selection.recursive, None);
    db.visit(&unfiltered, &mut inner)
}

/// A database whose every URI is prefixed by a mount point.
///
/// Selections addressed to a `Mount` are relative to the wrapped
/// database's root; reported URIs live in the mounted namespace.
#[derive(Debug)]
pub struct Mount<D> {
    base: String,
    inner: D,
}

impl<D: Database> Mount<D> {
    /// Mount `inner` at `base`.
    ///
    /// # Errors
    ///
    /// [`LibraryError::InvalidMountPoint`] unless `base` is a canonical,
    /// non-root URI.
    pub fn new(base: impl Into<String>, inner: D) -> Result<Self, LibraryError> {
        let base = base.into();
        if !path::is_valid_mount_point(&base) {
            return Err(LibraryError::InvalidMountPoint { uri: base });
        }
        Ok(Mount { base, inner })
    }

    /// The mount point.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The wrapped database.
    #[must_use]
    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Database> Database for Mount<D> {
    fn visit(&self, selection: &DatabaseSelection<'_>, visitor: &mut Visitor<'_>) -> VisitResult {
        walk_mount(&self.base, &self.inner, selection, visitor)
    }
}
