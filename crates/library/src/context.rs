//! LibraryContext — the explicit handle owning the tag pool and the
//! configured database.

use std::sync::Arc;

use tag::TagPool;

use crate::error::LibraryError;
use crate::interface::Database;

/// Process-wide library state.
///
/// Create one at startup, hand references to whoever needs the pool or
/// the database, and [`shutdown`](Self::shutdown) it on exit.
#[derive(Default)]
pub struct LibraryContext {
    pool: TagPool,
    database: Option<Arc<dyn Database>>,
}

impl LibraryContext {
    /// A context with a fresh pool and no database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `database`.
    #[must_use]
    pub fn with_database(mut self, database: Arc<dyn Database>) -> Self {
        self.database = Some(database);
        self
    }

    /// Replace the database, returning the previous one.
    pub fn set_database(&mut self, database: Option<Arc<dyn Database>>) -> Option<Arc<dyn Database>> {
        core::mem::replace(&mut self.database, database)
    }

    /// The tag pool every tag of this library is interned in.
    #[must_use]
    pub fn pool(&self) -> &TagPool {
        &self.pool
    }

    /// The configured database.
    ///
    /// # Errors
    ///
    /// [`LibraryError::NoDatabase`] when none is configured.
    pub fn database(&self) -> Result<&dyn Database, LibraryError> {
        self.database.as_deref().ok_or(LibraryError::NoDatabase)
    }

    /// Drop the database, then the pool. Returns the number of pool
    /// entries some tag still references.
    pub fn shutdown(self) -> usize {
        let LibraryContext { pool, database } = self;
        drop(database);
        pool.shutdown()
    }
}

impl std::fmt::Debug for LibraryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryContext")
            .field("pool", &self.pool)
            .field("database", &self.database.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::memory::MemoryDatabase;
    use tag::{TagBuilder, TagType};

    #[test]
    fn missing_database_is_an_error() {
        let ctx = LibraryContext::new();
        assert!(matches!(ctx.database(), Err(LibraryError::NoDatabase)));
    }

    #[test]
    fn shutdown_releases_library_tags() {
        let ctx = LibraryContext::new();
        let db = MemoryDatabase::new();
        let mut b = TagBuilder::new(ctx.pool());
        b.add_item(TagType::Artist, "Massive Attack");
        db.add_song("a.flac", b.commit(), None).unwrap();
        let ctx = ctx.with_database(Arc::new(db));
        assert_eq!(ctx.pool().len(), 1);
        assert_eq!(ctx.shutdown(), 0);
    }
}
