//! Song metadata — tag types, the interning tag pool, tags and their ordering.
//!
//! # Modules
//!
//! - [`tag_type`] — `TagType` enum and its name table
//! - [`mask`] — `TagMask` bit set
//! - [`pool`] — `TagPool` reference-counted interning store
//! - [`tag`] — immutable `Tag`, merge and sort-value resolution
//! - [`builder`] — `TagBuilder`
//! - [`fallback`] — sort-value fallback tables
//! - [`compare`] — numeric-aware tag comparator
//! - [`collate`] — string ordering seam
//! - [`config`] — `metadata_to_use` parsing

#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

pub mod builder;
pub mod collate;
pub mod compare;
pub mod config;
pub mod error;
pub mod fallback;
pub mod mask;
pub mod pool;
pub mod tag;
pub mod tag_type;

// Top-level re-exports for convenience
pub use builder::TagBuilder;
pub use collate::{ByteCollator, CaseFoldCollator, Collator};
pub use compare::{compare_tags, compare_tags_with};
pub use error::TagError;
pub use mask::TagMask;
pub use pool::{PooledItem, TagItem, TagPool};
pub use tag::Tag;
pub use tag_type::TagType;
