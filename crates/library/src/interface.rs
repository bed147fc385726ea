//! Database — the read-only capability every library backend exposes.

use tag::{Tag, TagMask, TagPool, TagType};

use crate::error::LibraryError;
use crate::selection::DatabaseSelection;
use crate::stats::{self, DatabaseStats};
use crate::unique;
use crate::visitor::{VisitResult, Visitor};

/// A tree of directories, songs and playlists.
///
/// # Traversal contract
///
/// [`visit`](Self::visit) reports every entity matching the selection
/// exactly once, in the database's natural order:
///
/// - a selection naming a directory walks it, reporting the directory
///   itself first when the selection is recursive;
/// - a selection naming a song reports just that song (subject to the
///   filter);
/// - anything else fails with [`LibraryError::NotFound`].
///
/// Light views passed to the visitor are only valid for the duration of
/// the callback. A visitor error stops the traversal and is returned
/// unchanged.
pub trait Database: Send + Sync {
    /// Walk the entities matching `selection`, reporting them to `visitor`.
    ///
    /// # Errors
    ///
    /// [`LibraryError::NotFound`] when the selection root does not resolve,
    /// or whatever a visitor callback returned.
    fn visit(&self, selection: &DatabaseSelection<'_>, visitor: &mut Visitor<'_>) -> VisitResult;

    /// Report each distinct value of `tag_type` among the selected songs.
    ///
    /// `on_tag` receives one tag per value, in byte order of the value. The
    /// tag carries the value under `tag_type` and, deduplicated, every item
    /// of a type in `group_mask` found on a song with that value.
    ///
    /// # Errors
    ///
    /// As for [`visit`](Self::visit), or whatever `on_tag` returned.
    fn visit_unique_tags(
        &self,
        pool: &TagPool,
        selection: &DatabaseSelection<'_>,
        tag_type: TagType,
        group_mask: TagMask,
        on_tag: &mut dyn FnMut(&Tag) -> VisitResult,
    ) -> VisitResult {
        unique::visit_unique_tags(self, pool, selection, tag_type, group_mask, on_tag)
    }

    /// Song, artist and album counts and total play time of the selection.
    ///
    /// # Errors
    ///
    /// As for [`visit`](Self::visit).
    fn stats(&self, selection: &DatabaseSelection<'_>) -> Result<DatabaseStats, LibraryError> {
        stats::collect(self, selection)
    }
}

impl<D: Database + ?Sized> Database for &D {
    fn visit(&self, selection: &DatabaseSelection<'_>, visitor: &mut Visitor<'_>) -> VisitResult {
        (**self).visit(selection, visitor)
    }

    fn visit_unique_tags(
        &self,
        pool: &TagPool,
        selection: &DatabaseSelection<'_>,
        tag_type: TagType,
        group_mask: TagMask,
        on_tag: &mut dyn FnMut(&Tag) -> VisitResult,
    ) -> VisitResult {
        (**self).visit_unique_tags(pool, selection, tag_type, group_mask, on_tag)
    }

    fn stats(&self, selection: &DatabaseSelection<'_>) -> Result<DatabaseStats, LibraryError> {
        (**self).stats(selection)
    }
}

impl<D: Database + ?Sized> Database for std::sync::Arc<D> {
    fn visit(&self, selection: &DatabaseSelection<'_>, visitor: &mut Visitor<'_>) -> VisitResult {
        (**self).visit(selection, visitor)
    }

    fn visit_unique_tags(
        &self,
        pool: &TagPool,
        selection: &DatabaseSelection<'_>,
        tag_type: TagType,
        group_mask: TagMask,
        on_tag: &mut dyn FnMut(&Tag) -> VisitResult,
    ) -> VisitResult {
        (**self).visit_unique_tags(pool, selection, tag_type, group_mask, on_tag)
    }

    fn stats(&self, selection: &DatabaseSelection<'_>) -> Result<DatabaseStats, LibraryError> {
        (**self).stats(selection)
    }
}
