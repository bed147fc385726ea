//! DatabaseSelection — which part of a database a traversal covers.

use crate::filter::SongFilter;
use crate::song::LightSong;

/// Root URI, recursion flag and optional song filter of one query.
#[derive(Debug, Clone, Copy)]
pub struct DatabaseSelection<'a> {
    /// Directory or song URI the traversal starts at; `""` is the root.
    pub uri: &'a str,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Songs not matching the filter are skipped.
    pub filter: Option<&'a SongFilter>,
}

impl<'a> DatabaseSelection<'a> {
    /// Build a selection. An empty filter is treated as no filter.
    #[must_use]
    pub fn new(uri: &'a str, recursive: bool, filter: Option<&'a SongFilter>) -> Self {
        DatabaseSelection {
            uri,
            recursive,
            filter: filter.filter(|f| !f.is_empty()),
        }
    }

    /// Everything in the database, unfiltered.
    #[must_use]
    pub fn all() -> Self {
        DatabaseSelection::new("", true, None)
    }

    /// The same selection rooted at `uri`.
    #[must_use]
    pub fn with_uri(self, uri: &'a str) -> Self {
        DatabaseSelection { uri, ..self }
    }

    /// Does the selection carry a filter?
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    /// Does `song` pass the filter?
    #[must_use]
    pub fn match_song(&self, song: &LightSong<'_>) -> bool {
        self.filter.map_or(true, |filter| filter.matches(song))
    }
}
