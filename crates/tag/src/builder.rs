//! TagBuilder — the mutable staging area that produces [`Tag`]s.

use std::borrow::Cow;
use std::time::Duration;

use crate::mask::TagMask;
use crate::pool::{PooledItem, TagPool};
use crate::tag::{complement_items, Tag};
use crate::tag_type::TagType;

/// Accumulates items and scalar fields, then commits them into a [`Tag`].
///
/// Items of types outside the enabled mask and empty values are skipped
/// silently, so scanners can feed every field they find.
#[derive(Debug)]
pub struct TagBuilder {
    pool: TagPool,
    enabled: TagMask,
    duration: Option<Duration>,
    has_playlist: bool,
    items: Vec<PooledItem>,
}

impl TagBuilder {
    /// An empty builder interning into `pool`, with every type enabled.
    #[must_use]
    pub fn new(pool: &TagPool) -> Self {
        TagBuilder {
            pool: pool.clone(),
            enabled: TagMask::all(),
            duration: None,
            has_playlist: false,
            items: Vec::new(),
        }
    }

    /// A builder pre-filled with a copy of `tag`.
    #[must_use]
    pub fn from_tag(pool: &TagPool, tag: &Tag) -> Self {
        let mut builder = TagBuilder::new(pool);
        builder.duration = tag.duration;
        builder.has_playlist = tag.has_playlist;
        builder.items = tag.items().to_vec();
        builder
    }

    /// Restrict [`add_item`](Self::add_item) to the types in `enabled`.
    #[must_use]
    pub fn with_enabled(mut self, enabled: TagMask) -> Self {
        self.enabled = enabled;
        self
    }

    /// `true` when nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Does the builder hold an item of `tag_type`?
    #[must_use]
    pub fn has_type(&self, tag_type: TagType) -> bool {
        self.items.iter().any(|item| item.tag_type() == tag_type)
    }

    /// Set the song length.
    pub fn set_duration(&mut self, duration: Option<Duration>) {
        self.duration = duration;
    }

    /// Mark the song as carrying an embedded playlist.
    pub fn set_has_playlist(&mut self, has_playlist: bool) {
        self.has_playlist = has_playlist;
    }

    /// Append `(tag_type, value)`.
    ///
    /// Control characters in `value` are replaced by spaces.
    pub fn add_item(&mut self, tag_type: TagType, value: &str) {
        if value.is_empty() || !self.enabled.test(tag_type) {
            return;
        }
        let value = clear_non_printable(value);
        self.items.push(self.pool.intern(tag_type, &value));
    }

    /// Append `(tag_type, "")`.
    ///
    /// Bypasses the enabled mask. Used where an absent value must still be
    /// represented, e.g. the "no artist" group of a unique-tag listing.
    pub fn add_empty_item(&mut self, tag_type: TagType) {
        self.items.push(self.pool.intern(tag_type, ""));
    }

    /// Remove every item of `tag_type`.
    pub fn remove_type(&mut self, tag_type: TagType) {
        self.items.retain(|item| item.tag_type() != tag_type);
    }

    /// Fill in from `other` whatever this builder lacks.
    ///
    /// Copies all items of each type absent here, takes `other`'s duration
    /// if ours is unknown, and sets `has_playlist` if `other` has it.
    pub fn complement(&mut self, other: &Tag) {
        if self.duration.is_none() {
            self.duration = other.duration;
        }
        self.has_playlist |= other.has_playlist;
        complement_items(&mut self.items, other.items());
    }

    /// Discard everything staged so far.
    pub fn clear(&mut self) {
        self.duration = None;
        self.has_playlist = false;
        self.items.clear();
    }

    /// Move the staged contents into a new [`Tag`], leaving the builder empty.
    pub fn commit(&mut self) -> Tag {
        Tag::from_parts(
            self.duration.take(),
            core::mem::take(&mut self.has_playlist),
            core::mem::take(&mut self.items),
        )
    }
}

fn clear_non_printable(value: &str) -> Cow<'_, str> {
    if value.chars().any(char::is_control) {
        Cow::Owned(
            value
                .chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn commit_resets_builder() {
        let pool = TagPool::new();
        let mut b = TagBuilder::new(&pool);
        b.add_item(TagType::Artist, "A");
        b.set_duration(Some(Duration::from_secs(3)));
        b.set_has_playlist(true);
        let t = b.commit();
        assert_eq!(t.len(), 1);
        assert!(t.has_playlist);
        assert!(b.is_empty());
        let empty = b.commit();
        assert!(empty.is_empty());
        assert_eq!(empty.duration, None);
        assert!(!empty.has_playlist);
    }

    #[test]
    fn empty_values_are_skipped() {
        let pool = TagPool::new();
        let mut b = TagBuilder::new(&pool);
        b.add_item(TagType::Title, "");
        assert!(b.is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn disabled_types_are_skipped() {
        let pool = TagPool::new();
        let mut b = TagBuilder::new(&pool).with_enabled(TagMask::of(TagType::Artist));
        b.add_item(TagType::Artist, "A");
        b.add_item(TagType::Comment, "ripped by me");
        let t = b.commit();
        assert!(t.has_type(TagType::Artist));
        assert!(!t.has_type(TagType::Comment));
    }

    #[test]
    fn control_characters_become_spaces() {
        let pool = TagPool::new();
        let mut b = TagBuilder::new(&pool);
        b.add_item(TagType::Title, "line\none\ttab");
        let t = b.commit();
        assert_eq!(t.get_value(TagType::Title), Some("line one tab"));
    }

    #[test]
    fn complement_copies_all_items_of_missing_types() {
        let pool = TagPool::new();
        let mut other = TagBuilder::new(&pool);
        other.add_item(TagType::Artist, "X");
        other.add_item(TagType::Genre, "G1");
        other.add_item(TagType::Genre, "G2");
        other.set_duration(Some(Duration::from_secs(9)));
        let other = other.commit();

        let mut b = TagBuilder::new(&pool);
        b.add_item(TagType::Artist, "Mine");
        b.complement(&other);
        let t = b.commit();
        assert_eq!(t.values(TagType::Artist).collect::<Vec<_>>(), vec!["Mine"]);
        assert_eq!(t.values(TagType::Genre).collect::<Vec<_>>(), vec!["G1", "G2"]);
        assert_eq!(t.duration, Some(Duration::from_secs(9)));
    }

    #[test]
    fn from_tag_copies_and_duplicates() {
        let pool = TagPool::new();
        let mut b = TagBuilder::new(&pool);
        b.add_item(TagType::Album, "Dummy");
        let original = b.commit();
        let mut copy = TagBuilder::from_tag(&pool, &original);
        copy.remove_type(TagType::Album);
        copy.add_item(TagType::Album, "Third");
        let edited = copy.commit();
        assert_eq!(original.get_value(TagType::Album), Some("Dummy"));
        assert_eq!(edited.get_value(TagType::Album), Some("Third"));
        assert_eq!(pool.ref_count(TagType::Album, "Dummy"), 1);
    }

    #[test]
    fn empty_item_is_kept_even_when_disabled() {
        let pool = TagPool::new();
        let mut b = TagBuilder::new(&pool).with_enabled(TagMask::none());
        b.add_empty_item(TagType::Artist);
        let t = b.commit();
        assert_eq!(t.get_value(TagType::Artist), Some(""));
    }

    #[test]
    fn has_type_and_clear() {
        let pool = TagPool::new();
        let mut b = TagBuilder::new(&pool);
        b.add_item(TagType::Disc, "1");
        assert!(b.has_type(TagType::Disc));
        b.clear();
        assert!(!b.has_type(TagType::Disc));
        assert!(pool.is_empty());
    }
}
