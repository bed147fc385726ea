//! Unique-tag aggregation: distinct values of one tag type, each with the
//! grouped items found alongside it.

use std::collections::BTreeMap;

use tag::{PooledItem, Tag, TagBuilder, TagMask, TagPool, TagType};

use crate::interface::Database;
use crate::selection::DatabaseSelection;
use crate::song::LightSong;
use crate::visitor::{VisitResult, Visitor};

type Groups = BTreeMap<String, Vec<PooledItem>>;

fn add_group_items(group: &mut Vec<PooledItem>, tag: &Tag, tag_type: TagType, mask: TagMask) {
    for item in tag.items() {
        let t = item.tag_type();
        if t != tag_type && mask.test(t) && !group.contains(item) {
            group.push(item.clone());
        }
    }
}

fn collect_song(groups: &mut Groups, song: &LightSong<'_>, tag_type: TagType, mask: TagMask) {
    let tag = song.tag;
    let mut values: Vec<&str> = tag.values(tag_type).collect();
    if values.is_empty() && tag_type == TagType::AlbumArtist {
        values = tag.values(TagType::Artist).collect();
    }
    if values.is_empty() {
        values.push("");
    }

    for value in values {
        let group = groups.entry(value.to_owned()).or_default();
        add_group_items(group, tag, tag_type, mask);
    }
}

/// Generic [`Database::visit_unique_tags`] over [`Database::visit`].
pub(crate) fn visit_unique_tags<D: Database + ?Sized>(
    db: &D,
    pool: &TagPool,
    selection: &DatabaseSelection<'_>,
    tag_type: TagType,
    group_mask: TagMask,
    on_tag: &mut dyn FnMut(&Tag) -> VisitResult,
) -> VisitResult {
    let mut groups = Groups::new();
    {
        let mut visitor = Visitor::new().with_song(|song: &LightSong<'_>| {
            collect_song(&mut groups, song, tag_type, group_mask);
            Ok(())
        });
        db.visit(selection, &mut visitor)?;
    }
    tracing::debug!(tag = %tag_type, values = groups.len(), "unique tags collected");

    let mut builder = TagBuilder::new(pool);
    for (value, items) in groups {
        if value.is_empty() {
            builder.add_empty_item(tag_type);
        } else {
            builder.add_item(tag_type, &value);
        }
        for item in &items {
            builder.add_item(item.tag_type(), item.value());
        }
        on_tag(&builder.commit())?;
    }
    Ok(())
}
