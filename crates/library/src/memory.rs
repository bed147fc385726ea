//! MemoryDatabase — an in-memory directory tree with mount points.
//!
//! The tree sits behind a read/write lock: writers (a scanner adding
//! songs, `mount`/`unmount`) take it exclusively, traversals share it, so
//! a traversal never observes a half-applied update. Visitors run with
//! the read lock held and must not call back into the same database's
//! write operations.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use tag::Tag;

use crate::directory::{LightDirectory, PlaylistInfo};
use crate::error::LibraryError;
use crate::interface::Database;
use crate::mount::walk_mount;
use crate::path::{self, SEPARATOR};
use crate::selection::DatabaseSelection;
use crate::song::LightSong;
use crate::visitor::{VisitResult, Visitor};

#[derive(Debug)]
struct SongRecord {
    tag: Tag,
    real_uri: Option<String>,
    mtime: Option<SystemTime>,
}

#[derive(Default)]
struct Directory {
    mtime: Option<SystemTime>,
    children: BTreeMap<String, Directory>,
    songs: BTreeMap<String, SongRecord>,
    playlists: BTreeMap<String, PlaylistInfo>,
    mounted: Option<Arc<dyn Database>>,
}

impl Directory {
    fn is_empty(&self) -> bool {
        self.children.is_empty() && self.songs.is_empty() && self.playlists.is_empty()
    }

    fn song_count(&self) -> usize {
        self.children
            .values()
            .map(Directory::song_count)
            .fold(self.songs.len(), usize::saturating_add)
    }

    /// Create every missing directory along `uri` and return the last one.
    fn make_dirs(&mut self, uri: &str) -> Result<&mut Directory, LibraryError> {
        let mut dir = self;
        for name in uri.split(SEPARATOR).filter(|c| !c.is_empty()) {
            if dir.mounted.is_some() {
                return Err(LibraryError::MountPointBusy {
                    uri: uri.to_owned(),
                });
            }
            dir = dir.children.entry(name.to_owned()).or_default();
        }
        if dir.mounted.is_some() {
            return Err(LibraryError::MountPointBusy {
                uri: uri.to_owned(),
            });
        }
        Ok(dir)
    }

    fn find_dir(&self, uri: &str) -> Option<&Directory> {
        let mut dir = self;
        for name in uri.split(SEPARATOR).filter(|c| !c.is_empty()) {
            dir = dir.children.get(name)?;
        }
        Some(dir)
    }

    fn find_dir_mut(&mut self, uri: &str) -> Option<&mut Directory> {
        let mut dir = self;
        for name in uri.split(SEPARATOR).filter(|c| !c.is_empty()) {
            dir = dir.children.get_mut(name)?;
        }
        Some(dir)
    }
}

/// Where a selection URI lands.
enum Lookup<'t, 'u> {
    Directory(&'t Directory),
    Song {
        parent: &'u str,
        name: &'u str,
        song: &'t SongRecord,
    },
    Mount {
        db: &'t Arc<dyn Database>,
        base: &'u str,
        rest: &'u str,
    },
}

fn lookup<'t, 'u>(root: &'t Directory, uri: &'u str) -> Result<Lookup<'t, 'u>, LibraryError> {
    if !uri.is_empty() && uri.split(SEPARATOR).any(str::is_empty) {
        return Err(LibraryError::not_found(uri));
    }
    let mut dir = root;
    let mut rest = uri;
    loop {
        if let Some(db) = &dir.mounted {
            let consumed = uri.len().saturating_sub(rest.len());
            let base = uri.get(..consumed).unwrap_or(uri).trim_end_matches(SEPARATOR);
            return Ok(Lookup::Mount { db, base, rest });
        }
        if rest.is_empty() {
            return Ok(Lookup::Directory(dir));
        }
        let (name, tail) = rest.split_once(SEPARATOR).unwrap_or((rest, ""));
        if let Some(child) = dir.children.get(name) {
            dir = child;
            rest = tail;
            continue;
        }
        if tail.is_empty() {
            if let Some(song) = dir.songs.get(name) {
                return Ok(Lookup::Song {
                    parent: path::get_parent(uri),
                    name,
                    song,
                });
            }
        }
        return Err(LibraryError::not_found(uri));
    }
}

fn light_song<'a>(parent: &'a str, name: &'a str, song: &'a SongRecord) -> LightSong<'a> {
    LightSong {
        directory: (!parent.is_empty()).then_some(parent),
        uri: name,
        real_uri: song.real_uri.as_deref(),
        tag: &song.tag,
        mtime: song.mtime,
    }
}

fn walk(
    dir: &Directory,
    uri: &str,
    selection: &DatabaseSelection<'_>,
    visitor: &mut Visitor<'_>,
) -> VisitResult {
    if visitor.wants_songs() {
        for (name, song) in &dir.songs {
            let light = light_song(uri, name, song);
            if selection.match_song(&light) {
                visitor.visit_song(&light)?;
            }
        }
    }

    if visitor.wants_playlists() {
        let this = LightDirectory {
            uri,
            mtime: dir.mtime,
        };
        for playlist in dir.playlists.values() {
            visitor.visit_playlist(playlist, &this)?;
        }
    }

    for (name, child) in &dir.children {
        let child_uri = path::build(uri, name);
        if let Some(db) = &child.mounted {
            if selection.recursive {
                // The mounted database reports its own root as `child_uri`.
                walk_mount(&child_uri, db.as_ref(), &selection.with_uri(""), visitor)?;
            } else {
                visitor.visit_directory(&LightDirectory {
                    uri: &child_uri,
                    mtime: child.mtime,
                })?;
            }
            continue;
        }

        visitor.visit_directory(&LightDirectory {
            uri: &child_uri,
            mtime: child.mtime,
        })?;
        if selection.recursive {
            walk(child, &child_uri, selection, visitor)?;
        }
    }
    Ok(())
}

/// An in-memory [`Database`].
#[derive(Default)]
pub struct MemoryDatabase {
    root: RwLock<Directory>,
}

impl MemoryDatabase {
    /// An empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Directory> {
        self.root.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Directory> {
        self.root.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create the directory `uri` and its missing parents, recording
    /// `mtime` on the last one.
    ///
    /// # Errors
    ///
    /// [`LibraryError::MountPointBusy`] if `uri` lies inside a mount point.
    pub fn add_directory(&self, uri: &str, mtime: Option<SystemTime>) -> Result<(), LibraryError> {
        let mut root = self.write();
        let dir = root.make_dirs(uri)?;
        dir.mtime = mtime;
        Ok(())
    }

    /// Insert or replace the song at `uri`, creating parent directories.
    ///
    /// # Errors
    ///
    /// [`LibraryError::MountPointBusy`] if `uri` lies inside a mount point.
    pub fn add_song(&self, uri: &str, tag: Tag, mtime: Option<SystemTime>) -> Result<(), LibraryError> {
        self.add_song_with_real_uri(uri, None, tag, mtime)
    }

    /// [`add_song`](Self::add_song) for a song stored somewhere other than
    /// its URI says.
    ///
    /// # Errors
    ///
    /// [`LibraryError::MountPointBusy`] if `uri` lies inside a mount point.
    pub fn add_song_with_real_uri(
        &self,
        uri: &str,
        real_uri: Option<String>,
        tag: Tag,
        mtime: Option<SystemTime>,
    ) -> Result<(), LibraryError> {
        let mut root = self.write();
        let dir = root.make_dirs(path::get_parent(uri))?;
        dir.songs.insert(
            path::get_base(uri).to_owned(),
            SongRecord {
                tag,
                real_uri,
                mtime,
            },
        );
        tracing::trace!(uri, "song added");
        Ok(())
    }

    /// Remove the song at `uri`. Returns whether it existed.
    pub fn remove_song(&self, uri: &str) -> bool {
        let mut root = self.write();
        root.find_dir_mut(path::get_parent(uri))
            .and_then(|dir| dir.songs.remove(path::get_base(uri)))
            .is_some()
    }

    /// Insert or replace the playlist file at `uri`.
    ///
    /// # Errors
    ///
    /// [`LibraryError::MountPointBusy`] if `uri` lies inside a mount point.
    pub fn add_playlist(&self, uri: &str, mtime: Option<SystemTime>) -> Result<(), LibraryError> {
        let mut root = self.write();
        let dir = root.make_dirs(path::get_parent(uri))?;
        let name = path::get_base(uri);
        dir.playlists.insert(
            name.to_owned(),
            PlaylistInfo {
                name: name.to_owned(),
                mtime,
            },
        );
        Ok(())
    }

    /// Attach `db` as the subtree at `uri`.
    ///
    /// Missing parent directories are created; `uri` itself must not exist
    /// yet.
    ///
    /// # Errors
    ///
    /// [`LibraryError::InvalidMountPoint`] for a non-canonical or root URI,
    /// [`LibraryError::MountPointBusy`] when `uri` already exists or lies
    /// inside another mount.
    pub fn mount(&self, uri: &str, db: Arc<dyn Database>) -> Result<(), LibraryError> {
        if !path::is_valid_mount_point(uri) {
            return Err(LibraryError::InvalidMountPoint {
                uri: uri.to_owned(),
            });
        }
        let mut root = self.write();
        let parent = root.make_dirs(path::get_parent(uri))?;
        let name = path::get_base(uri);
        if parent.children.contains_key(name) || parent.songs.contains_key(name) {
            return Err(LibraryError::MountPointBusy {
                uri: uri.to_owned(),
            });
        }
        parent.children.insert(
            name.to_owned(),
            Directory {
                mounted: Some(db),
                ..Directory::default()
            },
        );
        tracing::debug!(uri, "database mounted");
        Ok(())
    }

    /// Detach the database mounted at `uri` and return it.
    ///
    /// # Errors
    ///
    /// [`LibraryError::NotFound`] when nothing is mounted at `uri`.
    pub fn unmount(&self, uri: &str) -> Result<Arc<dyn Database>, LibraryError> {
        let mut root = self.write();
        let parent = root
            .find_dir_mut(path::get_parent(uri))
            .ok_or_else(|| LibraryError::not_found(uri))?;
        let name = path::get_base(uri);
        let is_mount = parent
            .children
            .get(name)
            .is_some_and(|child| child.mounted.is_some() && child.is_empty());
        if !is_mount {
            return Err(LibraryError::not_found(uri));
        }
        let db = parent
            .children
            .remove(name)
            .and_then(|child| child.mounted)
            .ok_or_else(|| LibraryError::not_found(uri))?;
        tracing::debug!(uri, "database unmounted");
        Ok(db)
    }

    /// Is a database mounted exactly at `uri`?
    #[must_use]
    pub fn is_mount_point(&self, uri: &str) -> bool {
        self.read()
            .find_dir(uri)
            .is_some_and(|dir| dir.mounted.is_some())
    }

    /// Songs stored directly in this database, not counting mounts.
    #[must_use]
    pub fn song_count(&self) -> usize {
        self.read().song_count()
    }
}

impl Database for MemoryDatabase {
    fn visit(&self, selection: &DatabaseSelection<'_>, visitor: &mut Visitor<'_>) -> VisitResult {
        let root = self.read();
        match lookup(&root, selection.uri)? {
            Lookup::Directory(dir) => {
                if selection.recursive {
                    visitor.visit_directory(&LightDirectory {
                        uri: selection.uri,
                        mtime: dir.mtime,
                    })?;
                }
                walk(dir, selection.uri, selection, visitor)
            }
            Lookup::Song { parent, name, song } => {
                let light = light_song(parent, name, song);
                if selection.match_song(&light) {
                    visitor.visit_song(&light)?;
                }
                Ok(())
            }
            Lookup::Mount { db, base, rest } => {
                walk_mount(base, db.as_ref(), &selection.with_uri(rest), visitor)
            }
        }
    }
}

impl std::fmt::Debug for MemoryDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDatabase")
            .field("songs", &self.song_count())
            .finish()
    }
}
