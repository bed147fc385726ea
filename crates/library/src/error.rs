//! Error type shared by every database operation.

use thiserror::Error;

/// Failure reported by a [`Database`](crate::Database) or the layers above it.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// No database is configured, or it is not initialised.
    #[error("no database")]
    NoDatabase,

    /// The selection root names neither a directory nor a song.
    #[error("no such directory or song: {uri}")]
    NotFound {
        /// The URI that failed to resolve.
        uri: String,
    },

    /// A mount point URI is empty or not in canonical form.
    #[error("invalid mount point: {uri}")]
    InvalidMountPoint {
        /// The rejected URI.
        uri: String,
    },

    /// Something already lives at the requested mount point.
    #[error("mount point busy: {uri}")]
    MountPointBusy {
        /// The occupied URI.
        uri: String,
    },

    /// A window specification could not be parsed.
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// A visitor asked the traversal to stop.
    ///
    /// Databases propagate this unchanged; the query engine treats it as a
    /// normal end of traversal.
    #[error("traversal interrupted")]
    Interrupted,

    /// Writing to a response sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LibraryError {
    pub(crate) fn not_found(uri: &str) -> Self {
        LibraryError::NotFound {
            uri: uri.to_owned(),
        }
    }
}
