//! Tag — the metadata attached to one song.
//!
//! A `Tag` is an ordered list of pooled items plus two scalar fields. It is
//! immutable once built: use a [`TagBuilder`](crate::TagBuilder) to make or
//! edit one. Cloning a `Tag` duplicates every pool reference it holds;
//! dropping it releases them.

use std::time::Duration;

use crate::fallback::{decay_sort, next_in_chain};
use crate::mask::TagMask;
use crate::pool::{PooledItem, TagItem};
use crate::tag_type::TagType;

/// Song metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub(crate) duration: Option<Duration>,
    pub(crate) has_playlist: bool,
    items: Box<[PooledItem]>,
}

impl Tag {
    pub(crate) fn from_parts(
        duration: Option<Duration>,
        has_playlist: bool,
        items: Vec<PooledItem>,
    ) -> Self {
        Tag {
            duration,
            has_playlist,
            items: items.into_boxed_slice(),
        }
    }

    /// Song length; `None` when unknown.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// The song file carries an embedded playlist (e.g. a CUE sheet).
    #[must_use]
    pub fn has_playlist(&self) -> bool {
        self.has_playlist
    }

    /// `true` when the tag holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TagItem> {
        self.items.iter().map(|item| &**item)
    }

    /// The pooled handles backing this tag.
    #[must_use]
    pub fn items(&self) -> &[PooledItem] {
        &self.items
    }

    /// Drop every item and reset the scalar fields.
    pub fn clear(&mut self) {
        self.duration = None;
        self.has_playlist = false;
        self.items = Box::default();
    }

    /// First value of `tag_type`, in insertion order.
    #[must_use]
    pub fn get_value(&self, tag_type: TagType) -> Option<&str> {
        self.values(tag_type).next()
    }

    /// Every value of `tag_type`, in insertion order.
    pub fn values(&self, tag_type: TagType) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(move |item| item.tag_type() == tag_type)
            .map(TagItem::value)
    }

    /// Does the tag hold at least one item of `tag_type`?
    #[must_use]
    pub fn has_type(&self, tag_type: TagType) -> bool {
        self.get_value(tag_type).is_some()
    }

    /// Set of types present.
    #[must_use]
    pub fn types(&self) -> TagMask {
        self.iter().map(TagItem::tag_type).collect()
    }

    /// The value to sort by when sorting on `tag_type`.
    ///
    /// Resolution order, stopping at the first hit:
    ///
    /// 1. `tag_type` itself;
    /// 2. its base type, if `tag_type` is a `*Sort` variant;
    /// 3. the fallback of `tag_type` (album artist → artist), resolved again
    ///    from step 1;
    /// 4. the fallback of the base type, resolved again from step 1;
    /// 5. the empty string.
    #[must_use]
    pub fn get_sort_value(&self, tag_type: TagType) -> &str {
        let mut current = tag_type;
        for _ in 0..=TagType::COUNT {
            if let Some(value) = self.get_value(current) {
                return value;
            }
            if let Some(value) = decay_sort(current).and_then(|base| self.get_value(base)) {
                return value;
            }
            match next_in_chain(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        ""
    }

    /// Layer `add` over `base`.
    ///
    /// The result holds every item of `add`, followed by every item of
    /// `base` whose type `add` lacks. `add`'s duration wins when known and
    /// `has_playlist` is set if either input has it.
    #[must_use]
    pub fn merge(base: &Tag, add: &Tag) -> Tag {
        let mut items = add.items.to_vec();
        complement_items(&mut items, &base.items);
        Tag::from_parts(
            add.duration.or(base.duration),
            add.has_playlist || base.has_playlist,
            items,
        )
    }

    /// [`Tag::merge`] that consumes both inputs and tolerates either being
    /// absent.
    #[must_use]
    pub fn merge_replace(base: Option<Tag>, add: Option<Tag>) -> Option<Tag> {
        match (base, add) {
            (base, None) => base,
            (None, add) => add,
            (Some(base), Some(add)) => Some(Tag::merge(&base, &add)),
        }
    }
}

/// Append every item of `other` whose type is not yet in `items`.
pub(crate) fn complement_items(items: &mut Vec<PooledItem>, other: &[PooledItem]) {
    let present: TagMask = items.iter().map(|item| item.tag_type()).collect();
    items.extend(
        other
            .iter()
            .filter(|item| !present.test(item.tag_type()))
            .cloned(),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::builder::TagBuilder;
    use crate::pool::TagPool;

    fn tag(pool: &TagPool, items: &[(TagType, &str)]) -> Tag {
        let mut b = TagBuilder::new(pool);
        for (t, v) in items {
            b.add_item(*t, v);
        }
        b.commit()
    }

    #[test]
    fn get_value_returns_first_match() {
        let pool = TagPool::new();
        let t = tag(
            &pool,
            &[(TagType::Artist, "A"), (TagType::Artist, "B"), (TagType::Album, "X")],
        );
        assert_eq!(t.get_value(TagType::Artist), Some("A"));
        assert_eq!(t.values(TagType::Artist).collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(t.get_value(TagType::Title), None);
    }

    #[test]
    fn sort_value_exact_type_wins() {
        let pool = TagPool::new();
        let t = tag(
            &pool,
            &[(TagType::ArtistSort, "Beatles, The"), (TagType::Artist, "The Beatles")],
        );
        assert_eq!(t.get_sort_value(TagType::ArtistSort), "Beatles, The");
    }

    #[test]
    fn sort_value_decays_to_base() {
        let pool = TagPool::new();
        let t = tag(&pool, &[(TagType::Album, "Dummy")]);
        assert_eq!(t.get_sort_value(TagType::AlbumSort), "Dummy");
    }

    #[test]
    fn album_artist_sort_falls_back_to_artist() {
        let pool = TagPool::new();
        let t = tag(&pool, &[(TagType::Artist, "Portishead")]);
        assert_eq!(t.get_sort_value(TagType::AlbumArtistSort), "Portishead");
        assert_eq!(t.get_sort_value(TagType::AlbumArtist), "Portishead");
    }

    #[test]
    fn album_artist_preferred_over_artist() {
        let pool = TagPool::new();
        let t = tag(
            &pool,
            &[(TagType::Artist, "Guest"), (TagType::AlbumArtist, "Various")],
        );
        assert_eq!(t.get_sort_value(TagType::AlbumArtistSort), "Various");
    }

    #[test]
    fn album_artist_sort_resolves_artist_not_artist_sort() {
        let pool = TagPool::new();
        let t = tag(
            &pool,
            &[(TagType::Artist, "The Beatles"), (TagType::ArtistSort, "Beatles, The")],
        );
        // AlbumArtistSort → AlbumArtist → Artist; ArtistSort is not on the chain.
        assert_eq!(t.get_sort_value(TagType::AlbumArtistSort), "The Beatles");
    }

    #[test]
    fn musicbrainz_album_artist_falls_back() {
        let pool = TagPool::new();
        let t = tag(&pool, &[(TagType::MusicBrainzArtistId, "abc-123")]);
        assert_eq!(
            t.get_sort_value(TagType::MusicBrainzAlbumArtistId),
            "abc-123"
        );
    }

    #[test]
    fn sort_value_empty_when_chain_misses() {
        let pool = TagPool::new();
        let t = tag(&pool, &[(TagType::Title, "Roads")]);
        assert_eq!(t.get_sort_value(TagType::AlbumArtistSort), "");
        assert_eq!(t.get_sort_value(TagType::Genre), "");
    }

    #[test]
    fn merge_keeps_add_and_complements_base() {
        let pool = TagPool::new();
        let base = tag(
            &pool,
            &[(TagType::Artist, "Base"), (TagType::Album, "Container")],
        );
        let add = tag(&pool, &[(TagType::Artist, "Embedded"), (TagType::Title, "T")]);
        let merged = Tag::merge(&base, &add);
        let items: Vec<_> = merged.iter().map(|i| (i.tag_type(), i.value())).collect();
        assert_eq!(
            items,
            vec![
                (TagType::Artist, "Embedded"),
                (TagType::Title, "T"),
                (TagType::Album, "Container"),
            ]
        );
    }

    #[test]
    fn merge_scalars() {
        let pool = TagPool::new();
        let mut base = tag(&pool, &[]);
        base.duration = Some(Duration::from_secs(100));
        base.has_playlist = true;
        let add = tag(&pool, &[(TagType::Title, "T")]);
        let merged = Tag::merge(&base, &add);
        assert_eq!(merged.duration, Some(Duration::from_secs(100)));
        assert!(merged.has_playlist);

        let mut add2 = add.clone();
        add2.duration = Some(Duration::from_secs(5));
        assert_eq!(
            Tag::merge(&base, &add2).duration,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn merge_replace_propagates_none() {
        let pool = TagPool::new();
        let a = tag(&pool, &[(TagType::Artist, "A")]);
        assert_eq!(Tag::merge_replace(None, None), None);
        assert_eq!(Tag::merge_replace(Some(a.clone()), None), Some(a.clone()));
        assert_eq!(Tag::merge_replace(None, Some(a.clone())), Some(a));
    }

    #[test]
    fn merge_replace_releases_inputs() {
        let pool = TagPool::new();
        let base = tag(&pool, &[(TagType::Album, "Gone")]);
        let add = tag(&pool, &[(TagType::Album, "Kept")]);
        let merged = Tag::merge_replace(Some(base), Some(add)).unwrap();
        assert_eq!(merged.get_value(TagType::Album), Some("Kept"));
        assert_eq!(pool.ref_count(TagType::Album, "Gone"), 0);
        assert_eq!(pool.ref_count(TagType::Album, "Kept"), 1);
    }

    #[test]
    fn clone_and_drop_balance_refcounts() {
        let pool = TagPool::new();
        let t = tag(&pool, &[(TagType::Genre, "Trip Hop")]);
        let copy = t.clone();
        assert_eq!(pool.ref_count(TagType::Genre, "Trip Hop"), 2);
        drop(copy);
        drop(t);
        assert!(pool.is_empty());
    }

    #[test]
    fn scalars_are_set_through_the_builder() {
        let pool = TagPool::new();
        let mut b = TagBuilder::new(&pool);
        b.set_duration(Some(Duration::from_millis(1500)));
        b.set_has_playlist(true);
        let t = b.commit();
        assert_eq!(t.duration(), Some(Duration::from_millis(1500)));
        assert!(t.has_playlist());

        let mut edit = TagBuilder::from_tag(&pool, &t);
        edit.set_duration(None);
        let edited = edit.commit();
        assert_eq!(edited.duration(), None);
        assert!(edited.has_playlist());
        assert_eq!(t.duration(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn clear_releases_items() {
        let pool = TagPool::new();
        let mut t = tag(&pool, &[(TagType::Date, "1994")]);
        t.duration = Some(Duration::from_secs(1));
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.duration, None);
        assert!(pool.is_empty());
    }
}
