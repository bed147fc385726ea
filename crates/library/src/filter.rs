//! SongFilter — the predicate a [`DatabaseSelection`](crate::DatabaseSelection)
//! applies to every song.
//!
//! A filter is a conjunction of items. Each item matches one tag type, any
//! tag, the song URI, or a base directory, either exactly or as a
//! case-folded substring.

use tag::{Tag, TagType};

use crate::path;
use crate::song::LightSong;

/// What a [`FilterItem`] inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Values of one tag type.
    Tag(TagType),
    /// Values of every tag type.
    AnyTag,
    /// The full song URI.
    Uri,
    /// Song lies at or below this directory URI. Always exact.
    Base,
}

/// One condition of a [`SongFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    kind: FilterKind,
    value: String,
    fold_case: bool,
}

impl FilterItem {
    /// Exact match on values of `tag_type`.
    #[must_use]
    pub fn tag(tag_type: TagType, value: impl Into<String>) -> Self {
        FilterItem::new(FilterKind::Tag(tag_type), value)
    }

    /// Exact match on any tag value.
    #[must_use]
    pub fn any_tag(value: impl Into<String>) -> Self {
        FilterItem::new(FilterKind::AnyTag, value)
    }

    /// Exact match on the song URI.
    #[must_use]
    pub fn uri(value: impl Into<String>) -> Self {
        FilterItem::new(FilterKind::Uri, value)
    }

    /// Songs inside directory `value`.
    #[must_use]
    pub fn base(value: impl Into<String>) -> Self {
        FilterItem::new(FilterKind::Base, value)
    }

    fn new(kind: FilterKind, value: impl Into<String>) -> Self {
        FilterItem {
            kind,
            value: value.into(),
            fold_case: false,
        }
    }

    /// Switch to case-insensitive substring matching.
    #[must_use]
    pub fn fold_case(mut self) -> Self {
        if self.kind != FilterKind::Base {
            self.value = fold(&self.value);
            self.fold_case = true;
        }
        self
    }

    /// What this item inspects.
    #[must_use]
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// The value to match against.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    fn string_match(&self, candidate: &str) -> bool {
        if self.fold_case {
            fold(candidate).contains(&self.value)
        } else {
            candidate == self.value
        }
    }

    fn match_tag(&self, tag: &Tag, wanted: Option<TagType>) -> bool {
        let mut hit = false;
        let mut seen = false;
        for item in tag.iter() {
            if wanted.is_some_and(|t| t != item.tag_type()) {
                continue;
            }
            seen = true;
            if self.string_match(item.value()) {
                hit = true;
                break;
            }
        }
        if hit {
            return true;
        }

        let Some(wanted) = wanted else {
            return false;
        };
        if seen {
            return false;
        }
        // The field is absent: an empty search value matches, and an
        // album artist search looks at the artist instead.
        if self.value.is_empty() {
            return true;
        }
        wanted == TagType::AlbumArtist
            && tag
                .values(TagType::Artist)
                .any(|value| self.string_match(value))
    }

    /// Does `song` satisfy this item?
    #[must_use]
    pub fn matches(&self, song: &LightSong<'_>) -> bool {
        match self.kind {
            FilterKind::Tag(tag_type) => self.match_tag(song.tag, Some(tag_type)),
            FilterKind::AnyTag => self.match_tag(song.tag, None),
            FilterKind::Uri => self.string_match(&song.full_uri()),
            FilterKind::Base => path::relative_to(&self.value, &song.full_uri()).is_some(),
        }
    }
}

fn fold(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Conjunction of [`FilterItem`]s. The empty filter matches every song.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    items: Vec<FilterItem>,
}

impl SongFilter {
    /// The empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition.
    #[must_use]
    pub fn with(mut self, item: FilterItem) -> Self {
        self.items.push(item);
        self
    }

    /// Add a condition in place.
    pub fn push(&mut self, item: FilterItem) {
        self.items.push(item);
    }

    /// `true` when the filter has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The conditions, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[FilterItem] {
        &self.items
    }

    /// Does `song` satisfy every condition?
    #[must_use]
    pub fn matches(&self, song: &LightSong<'_>) -> bool {
        self.items.iter().all(|item| item.matches(song))
    }
}

impl FromIterator<FilterItem> for SongFilter {
    fn from_iter<I: IntoIterator<Item = FilterItem>>(iter: I) -> Self {
        SongFilter {
            items: iter.into_iter().collect(),
        }
    }
}
