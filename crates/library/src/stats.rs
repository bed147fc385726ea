//! Database statistics.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use tag::TagType;

use crate::error::LibraryError;
use crate::interface::Database;
use crate::selection::DatabaseSelection;
use crate::song::LightSong;
use crate::visitor::Visitor;

/// Aggregate figures over a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    /// Number of songs.
    pub song_count: usize,
    /// Number of distinct artist values.
    pub artist_count: usize,
    /// Number of distinct album values.
    pub album_count: usize,
    /// Sum of all known song durations.
    pub total_duration: Duration,
}

pub(crate) fn collect<D: Database + ?Sized>(
    db: &D,
    selection: &DatabaseSelection<'_>,
) -> Result<DatabaseStats, LibraryError> {
    let mut stats = DatabaseStats::default();
    let mut artists = HashSet::new();
    let mut albums = HashSet::new();
    {
        let mut visitor = Visitor::new().with_song(|song: &LightSong<'_>| {
            stats.song_count = stats.song_count.saturating_add(1);
            if let Some(duration) = song.tag.duration() {
                stats.total_duration = stats.total_duration.saturating_add(duration);
            }
            artists.extend(song.tag.values(TagType::Artist).map(str::to_owned));
            albums.extend(song.tag.values(TagType::Album).map(str::to_owned));
            Ok(())
        });
        db.visit(selection, &mut visitor)?;
    }
    stats.artist_count = artists.len();
    stats.album_count = albums.len();
    Ok(stats)
}
