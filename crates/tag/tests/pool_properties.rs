//! Property-based tests for the tag pool and tag merging.
//! Invariants are checked over arbitrary inputs, not just fixed examples.

use proptest::prelude::*;
use tag::{compare_tags, Tag, TagBuilder, TagPool, TagType};

fn tag_type() -> impl Strategy<Value = TagType> {
    proptest::sample::select(TagType::ALL.to_vec())
}

fn items() -> impl Strategy<Value = Vec<(TagType, String)>> {
    proptest::collection::vec((tag_type(), "[a-c]{1,2}"), 0..12)
}

fn build(pool: &TagPool, items: &[(TagType, String)]) -> Tag {
    let mut b = TagBuilder::new(pool);
    for (t, v) in items {
        b.add_item(*t, v);
    }
    b.commit()
}

proptest! {
    /// The refcount of an entry equals the number of outstanding handles.
    #[test]
    fn refcount_matches_outstanding_handles(n in 1usize..20, t in tag_type(), v in "[a-z]{1,8}") {
        let pool = TagPool::new();
        let handles: Vec<_> = (0..n).map(|_| pool.intern(t, &v)).collect();
        prop_assert_eq!(pool.ref_count(t, &v), n);
        prop_assert_eq!(pool.len(), 1);
        if let Some(first) = handles.first() {
            for h in &handles {
                prop_assert!(tag::PooledItem::ptr_eq(h, first));
            }
        }
        drop(handles);
        prop_assert_eq!(pool.ref_count(t, &v), 0);
        prop_assert!(pool.is_empty());
    }

    /// Building, cloning and dropping any set of tags leaves the pool empty.
    #[test]
    fn tags_never_leak(a in items(), b in items()) {
        let pool = TagPool::new();
        {
            let ta = build(&pool, &a);
            let tb = build(&pool, &b);
            let merged = Tag::merge(&ta, &tb);
            let _copy = merged.clone();
        }
        prop_assert!(pool.is_empty());
    }

    /// merge(base, add) = items of add, then items of base whose type add lacks.
    #[test]
    fn merge_complement_law(base in items(), add in items()) {
        let pool = TagPool::new();
        let tb = build(&pool, &base);
        let ta = build(&pool, &add);
        let merged = Tag::merge(&tb, &ta);

        let add_types = ta.types();
        let expected: Vec<(TagType, &str)> = ta
            .iter()
            .map(|i| (i.tag_type(), i.value()))
            .chain(
                tb.iter()
                    .filter(|i| !add_types.test(i.tag_type()))
                    .map(|i| (i.tag_type(), i.value())),
            )
            .collect();
        let got: Vec<(TagType, &str)> = merged.iter().map(|i| (i.tag_type(), i.value())).collect();
        prop_assert_eq!(got, expected);
    }

    /// Merging an empty tag over `base` yields `base`.
    #[test]
    fn merge_with_empty_add_is_base(base in items()) {
        let pool = TagPool::new();
        let tb = build(&pool, &base);
        let merged = Tag::merge(&tb, &Tag::default());
        prop_assert_eq!(merged, tb);
    }

    /// Track comparison agrees with integer comparison.
    #[test]
    fn track_order_is_numeric(a in 0u32..10_000, b in 0u32..10_000, pad in 0usize..3) {
        let pool = TagPool::new();
        let ta = build(&pool, &[(TagType::Track, format!("{:0width$}", a, width = pad))]);
        let tb = build(&pool, &[(TagType::Track, b.to_string())]);
        prop_assert_eq!(compare_tags(TagType::Track, &ta, &tb), a.cmp(&b));
    }
}
