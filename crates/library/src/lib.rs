//! Music library indexing — directory tree, queries, mounts and printing.
//!
//! # Modules
//!
//! - [`interface`] — `Database` trait, its traversal contract and the
//!   default unique-tag aggregation
//! - [`memory`] — `MemoryDatabase` in-memory tree with mount points
//! - [`mount`] — `Mount` wrapper and `walk_mount` URI prefixing
//! - [`query`] — `run_query` streaming/buffered engine and `Window`
//! - [`print`] — response lines for listings, unique tags and stats
//! - [`selection`], [`filter`], [`visitor`] — query descriptors
//! - [`song`], [`directory`] — light views and detached songs
//! - [`context`] — `LibraryContext` owning pool and database

#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod filter;
pub mod interface;
pub mod memory;
pub mod mount;
pub mod path;
pub mod print;
pub mod query;
pub mod selection;
pub mod song;
pub mod stats;
mod unique;
pub mod visitor;

// Top-level re-exports for convenience
pub use config::QueryShape;
pub use context::LibraryContext;
pub use directory::{LightDirectory, PlaylistInfo};
pub use error::LibraryError;
pub use filter::{FilterItem, FilterKind, SongFilter};
pub use interface::Database;
pub use memory::MemoryDatabase;
pub use mount::{walk_mount, Mount};
pub use print::{LineResponse, Response, UniqueTagKind};
pub use query::{run_query, run_query_with, Window};
pub use selection::DatabaseSelection;
pub use song::{DetachedSong, LightSong};
pub use stats::DatabaseStats;
pub use visitor::{VisitResult, Visitor};
