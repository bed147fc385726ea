//! Sort-value fallback rules.
//!
//! Two finite tables drive [`Tag::get_sort_value`](crate::Tag::get_sort_value):
//!
//! - [`decay_sort`] maps a `*Sort` type to the field it sorts.
//! - [`fallback`] maps a field to the one that stands in for it when absent
//!   (album artist → artist and its MusicBrainz analog).
//!
//! Neither table contains a cycle, so following [`fallback`] from any type
//! terminates within [`TagType::COUNT`] steps. The tests walk every chain.

use crate::tag_type::TagType;

const DECAY_SORT: [(TagType, TagType); 3] = [
    (TagType::ArtistSort, TagType::Artist),
    (TagType::AlbumSort, TagType::Album),
    (TagType::AlbumArtistSort, TagType::AlbumArtist),
];

const FALLBACK: [(TagType, TagType); 2] = [
    (TagType::AlbumArtist, TagType::Artist),
    (TagType::MusicBrainzAlbumArtistId, TagType::MusicBrainzArtistId),
];

fn find(table: &[(TagType, TagType)], tag_type: TagType) -> Option<TagType> {
    table
        .iter()
        .find(|(from, _)| *from == tag_type)
        .map(|(_, to)| *to)
}

/// The base field of a `*Sort` type, or `None` for every other type.
#[must_use]
pub fn decay_sort(tag_type: TagType) -> Option<TagType> {
    find(&DECAY_SORT, tag_type)
}

/// The field that substitutes for `tag_type` when it is missing.
#[must_use]
pub fn fallback(tag_type: TagType) -> Option<TagType> {
    find(&FALLBACK, tag_type)
}

/// Next type to resolve after `tag_type` and its decayed form both missed.
///
/// The type's own fallback wins; otherwise the fallback of its decayed base.
#[must_use]
pub fn next_in_chain(tag_type: TagType) -> Option<TagType> {
    fallback(tag_type).or_else(|| decay_sort(tag_type).and_then(fallback))
}
