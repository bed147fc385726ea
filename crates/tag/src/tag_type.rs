//! TagType — the closed set of metadata fields a [`Tag`](crate::Tag) can hold.
//!
//! Every type has a canonical display name, which is what the print layer
//! emits (`Artist: …`) and what the config parser accepts (case-insensitive).

use core::fmt;
use core::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TagError;

/// One metadata field.
///
/// The discriminant doubles as the bit position inside a
/// [`TagMask`](crate::TagMask).
#[allow(missing_docs)] // variant names match their display names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TagType {
    Artist,
    ArtistSort,
    Album,
    AlbumSort,
    AlbumArtist,
    AlbumArtistSort,
    Title,
    Track,
    Name,
    Genre,
    Date,
    Composer,
    Performer,
    Comment,
    Disc,
    MusicBrainzArtistId,
    MusicBrainzAlbumId,
    MusicBrainzAlbumArtistId,
    MusicBrainzTrackId,
    MusicBrainzReleaseTrackId,
}

impl TagType {
    /// Number of real tag types.
    pub const COUNT: usize = 20;

    /// Every tag type, in discriminant order.
    pub const ALL: [TagType; Self::COUNT] = [
        TagType::Artist,
        TagType::ArtistSort,
        TagType::Album,
        TagType::AlbumSort,
        TagType::AlbumArtist,
        TagType::AlbumArtistSort,
        TagType::Title,
        TagType::Track,
        TagType::Name,
        TagType::Genre,
        TagType::Date,
        TagType::Composer,
        TagType::Performer,
        TagType::Comment,
        TagType::Disc,
        TagType::MusicBrainzArtistId,
        TagType::MusicBrainzAlbumId,
        TagType::MusicBrainzAlbumArtistId,
        TagType::MusicBrainzTrackId,
        TagType::MusicBrainzReleaseTrackId,
    ];

    /// Canonical display name, as printed in responses.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TagType::Artist => "Artist",
            TagType::ArtistSort => "ArtistSort",
            TagType::Album => "Album",
            TagType::AlbumSort => "AlbumSort",
            TagType::AlbumArtist => "AlbumArtist",
            TagType::AlbumArtistSort => "AlbumArtistSort",
            TagType::Title => "Title",
            TagType::Track => "Track",
            TagType::Name => "Name",
            TagType::Genre => "Genre",
            TagType::Date => "Date",
            TagType::Composer => "Composer",
            TagType::Performer => "Performer",
            TagType::Comment => "Comment",
            TagType::Disc => "Disc",
            TagType::MusicBrainzArtistId => "MUSICBRAINZ_ARTISTID",
            TagType::MusicBrainzAlbumId => "MUSICBRAINZ_ALBUMID",
            TagType::MusicBrainzAlbumArtistId => "MUSICBRAINZ_ALBUMARTISTID",
            TagType::MusicBrainzTrackId => "MUSICBRAINZ_TRACKID",
            TagType::MusicBrainzReleaseTrackId => "MUSICBRAINZ_RELEASETRACKID",
        }
    }

    /// Bit position of this type inside a [`TagMask`](crate::TagMask).
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Look a type up by its display name, ignoring ASCII case.
    #[must_use]
    pub fn parse(name: &str) -> Option<TagType> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Track and disc numbers compare by magnitude, not lexically.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, TagType::Track | TagType::Disc)
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TagType {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagType::parse(s).ok_or_else(|| TagError::UnknownTag(s.to_owned()))
    }
}

impl Serialize for TagType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TagType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        TagType::parse(&name).ok_or_else(|| de::Error::custom(TagError::UnknownTag(name)))
    }
}
