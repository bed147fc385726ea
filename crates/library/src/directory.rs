//! Directory and playlist views handed to visitors.

use std::time::SystemTime;

/// Zero-copy view of one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightDirectory<'a> {
    /// Full library URI; `""` for the root.
    pub uri: &'a str,
    /// Last modification time, when known.
    pub mtime: Option<SystemTime>,
}

impl<'a> LightDirectory<'a> {
    /// A directory with no modification time.
    #[must_use]
    pub fn new(uri: &'a str) -> Self {
        LightDirectory { uri, mtime: None }
    }

    /// The root directory.
    #[must_use]
    pub fn root() -> Self {
        LightDirectory::new("")
    }

    /// Is this the root of its database?
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.uri.is_empty()
    }
}

/// A stored playlist file. Reported together with its containing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistInfo {
    /// File name, relative to the containing directory.
    pub name: String,
    /// Last modification time, when known.
    pub mtime: Option<SystemTime>,
}

impl PlaylistInfo {
    /// A playlist with no modification time.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        PlaylistInfo {
            name: name.into(),
            mtime: None,
        }
    }
}
