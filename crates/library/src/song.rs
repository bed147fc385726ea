//! Song views: the borrowed [`LightSong`] handed to visitors and the owned
//! [`DetachedSong`] that outlives a traversal.

use std::borrow::Cow;
use std::time::SystemTime;

use tag::Tag;

use crate::path;

/// Zero-copy view of one song, valid only inside the visitor call that
/// received it.
#[derive(Debug, Clone, Copy)]
pub struct LightSong<'a> {
    /// URI of the containing directory; `None` for songs in the root.
    pub directory: Option<&'a str>,
    /// URI relative to [`directory`](Self::directory).
    pub uri: &'a str,
    /// Location to read the file from, when it differs from the URI.
    pub real_uri: Option<&'a str>,
    /// The song's metadata.
    pub tag: &'a Tag,
    /// Last modification time of the file, when known.
    pub mtime: Option<SystemTime>,
}

impl<'a> LightSong<'a> {
    /// A root-level song with no modification time.
    #[must_use]
    pub fn new(uri: &'a str, tag: &'a Tag) -> Self {
        LightSong {
            directory: None,
            uri,
            real_uri: None,
            tag,
            mtime: None,
        }
    }

    /// Full library URI: `directory/uri`.
    #[must_use]
    pub fn full_uri(&self) -> Cow<'a, str> {
        match self.directory {
            Some(directory) => path::build(directory, self.uri),
            None => Cow::Borrowed(self.uri),
        }
    }
}

/// A song copied out of the database.
///
/// Holds its own pool references, so it stays valid after the traversal
/// that produced it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedSong {
    uri: String,
    real_uri: Option<String>,
    tag: Tag,
    mtime: Option<SystemTime>,
}

impl DetachedSong {
    /// Full library URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The song's metadata.
    #[must_use]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Last modification time, when known.
    #[must_use]
    pub fn mtime(&self) -> Option<SystemTime> {
        self.mtime
    }

    /// Borrow as a root-level [`LightSong`] whose `uri` is the full URI.
    #[must_use]
    pub fn as_light(&self) -> LightSong<'_> {
        LightSong {
            directory: None,
            uri: &self.uri,
            real_uri: self.real_uri.as_deref(),
            tag: &self.tag,
            mtime: self.mtime,
        }
    }
}

impl From<&LightSong<'_>> for DetachedSong {
    fn from(song: &LightSong<'_>) -> Self {
        DetachedSong {
            uri: song.full_uri().into_owned(),
            real_uri: song.real_uri.map(str::to_owned),
            tag: song.tag.clone(),
            mtime: song.mtime,
        }
    }
}
