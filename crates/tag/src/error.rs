//! Error type for tag-name parsing.

use thiserror::Error;

/// Errors raised while turning user-supplied names into [`TagType`](crate::TagType)s.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    /// The name does not match any tag type.
    #[error("unknown tag type: {0:?}")]
    UnknownTag(String),
}
