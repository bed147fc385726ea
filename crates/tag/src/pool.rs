//! TagPool — reference-counted interning of `(TagType, value)` pairs.
//!
//! Every distinct pair lives exactly once per pool. A [`PooledItem`] is an
//! owning handle on one entry: cloning it duplicates the reference and
//! dropping it releases the reference. The entry is removed from the pool in
//! the same critical section that drops its count to zero, so no reader can
//! ever observe an entry with zero references.
//!
//! All bookkeeping happens under a single mutex. Nothing else (I/O, visitor
//! callbacks, allocation of caller data) runs while it is held.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::tag_type::TagType;

/// One interned `(type, value)` pair. Immutable after creation.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TagItem {
    tag_type: TagType,
    value: Arc<str>,
}

impl TagItem {
    /// The field this item belongs to.
    #[must_use]
    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    /// The field value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

struct Slot {
    item: Arc<TagItem>,
    refs: usize,
}

type Entries = HashMap<TagType, HashMap<Arc<str>, Slot>>;

#[derive(Default)]
struct Shared {
    entries: Mutex<Entries>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Entries> {
        // Every critical section is a single map update, so a panic in
        // another thread cannot leave an entry half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn intern(&self, tag_type: TagType, value: &str) -> Arc<TagItem> {
        let mut entries = self.lock();
        let values = entries.entry(tag_type).or_default();
        if let Some(slot) = values.get_mut(value) {
            slot.refs = slot.refs.saturating_add(1);
            return Arc::clone(&slot.item);
        }

        let value: Arc<str> = Arc::from(value);
        let item = Arc::new(TagItem {
            tag_type,
            value: Arc::clone(&value),
        });
        values.insert(
            value,
            Slot {
                item: Arc::clone(&item),
                refs: 1,
            },
        );
        item
    }

    fn duplicate(&self, item: &Arc<TagItem>) {
        let mut entries = self.lock();
        match lookup(&mut entries, item) {
            Some(slot) => slot.refs = slot.refs.saturating_add(1),
            None => tracing::error!(tag = %item.tag_type, "duplicated an item the pool does not own"),
        }
    }

    fn release(&self, item: &Arc<TagItem>) {
        let mut entries = self.lock();
        let Some(slot) = lookup(&mut entries, item) else {
            tracing::error!(tag = %item.tag_type, "released an item the pool does not own");
            return;
        };
        slot.refs = slot.refs.saturating_sub(1);
        if slot.refs > 0 {
            return;
        }
        if let Some(values) = entries.get_mut(&item.tag_type) {
            values.remove(item.value());
            if values.is_empty() {
                entries.remove(&item.tag_type);
            }
        }
    }
}

fn lookup<'e>(entries: &'e mut Entries, item: &Arc<TagItem>) -> Option<&'e mut Slot> {
    entries
        .get_mut(&item.tag_type)
        .and_then(|values| values.get_mut(item.value()))
        .filter(|slot| Arc::ptr_eq(&slot.item, item))
}

/// Handle on a process-wide tag pool.
///
/// Cloning the handle is cheap and yields the *same* pool. Construct one
/// pool per process (usually through the library context) and pass it to
/// every [`TagBuilder`](crate::TagBuilder).
#[derive(Clone, Default)]
pub struct TagPool {
    shared: Arc<Shared>,
}

impl TagPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `(tag_type, value)`.
    ///
    /// Returns a handle on the existing entry (bumping its count) or on a
    /// fresh entry with a count of one.
    #[must_use]
    pub fn intern(&self, tag_type: TagType, value: &str) -> PooledItem {
        PooledItem {
            item: self.shared.intern(tag_type, value),
            pool: Arc::clone(&self.shared),
        }
    }

    /// Number of distinct entries currently alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().values().map(HashMap::len).sum()
    }

    /// `true` when no entry is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Outstanding references on `(tag_type, value)`; zero when absent.
    #[must_use]
    pub fn ref_count(&self, tag_type: TagType, value: &str) -> usize {
        self.shared
            .lock()
            .get(&tag_type)
            .and_then(|values| values.get(value))
            .map_or(0, |slot| slot.refs)
    }

    /// Does `item` belong to this pool?
    #[must_use]
    pub fn owns(&self, item: &PooledItem) -> bool {
        Arc::ptr_eq(&self.shared, &item.pool)
    }

    /// Tear the pool handle down, returning how many entries were still
    /// referenced.
    ///
    /// Live [`PooledItem`]s keep the storage alive and release into it as
    /// usual; a non-zero result means some tag outlived the library that
    /// owned it.
    pub fn shutdown(self) -> usize {
        let leaked = self.len();
        if leaked == 0 {
            tracing::debug!("tag pool shut down cleanly");
        } else {
            tracing::warn!(leaked, "tag pool shut down with live entries");
        }
        leaked
    }
}

impl fmt::Debug for TagPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagPool").field("entries", &self.len()).finish()
    }
}

/// Owning reference on one pool entry.
///
/// `Clone` duplicates the reference, `Drop` releases it. Two handles for
/// the same `(type, value)` from the same pool point at the same
/// [`TagItem`].
pub struct PooledItem {
    item: Arc<TagItem>,
    pool: Arc<Shared>,
}

impl PooledItem {
    /// `true` when both handles share the same pooled storage.
    #[must_use]
    pub fn ptr_eq(a: &PooledItem, b: &PooledItem) -> bool {
        Arc::ptr_eq(&a.item, &b.item)
    }
}

impl Deref for PooledItem {
    type Target = TagItem;

    fn deref(&self) -> &TagItem {
        &self.item
    }
}

impl Clone for PooledItem {
    fn clone(&self) -> Self {
        self.pool.duplicate(&self.item);
        PooledItem {
            item: Arc::clone(&self.item),
            pool: Arc::clone(&self.pool),
        }
    }
}

impl Drop for PooledItem {
    fn drop(&mut self) {
        self.pool.release(&self.item);
    }
}

impl PartialEq for PooledItem {
    fn eq(&self, other: &Self) -> bool {
        PooledItem::ptr_eq(self, other) || *self.item == *other.item
    }
}

impl Eq for PooledItem {}

impl fmt::Debug for PooledItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.item.tag_type, self.item.value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn intern_twice_shares_storage() {
        let pool = TagPool::new();
        let a = pool.intern(TagType::Artist, "Portishead");
        let b = pool.intern(TagType::Artist, "Portishead");
        assert!(PooledItem::ptr_eq(&a, &b));
        assert_eq!(pool.ref_count(TagType::Artist, "Portishead"), 2);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn same_value_different_type_is_distinct() {
        let pool = TagPool::new();
        let a = pool.intern(TagType::Artist, "Dummy");
        let b = pool.intern(TagType::Album, "Dummy");
        assert!(!PooledItem::ptr_eq(&a, &b));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn clone_duplicates_without_allocating() {
        let pool = TagPool::new();
        let a = pool.intern(TagType::Genre, "Trip Hop");
        let b = a.clone();
        assert!(PooledItem::ptr_eq(&a, &b));
        assert_eq!(pool.ref_count(TagType::Genre, "Trip Hop"), 2);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn last_release_removes_entry() {
        let pool = TagPool::new();
        let a = pool.intern(TagType::Title, "Roads");
        let b = a.clone();
        drop(a);
        assert_eq!(pool.ref_count(TagType::Title, "Roads"), 1);
        drop(b);
        assert_eq!(pool.ref_count(TagType::Title, "Roads"), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn reintern_after_release_is_fresh() {
        let pool = TagPool::new();
        drop(pool.intern(TagType::Title, "Glory Box"));
        let again = pool.intern(TagType::Title, "Glory Box");
        assert_eq!(pool.ref_count(TagType::Title, "Glory Box"), 1);
        assert_eq!(again.value(), "Glory Box");
    }

    #[test]
    fn separate_pools_do_not_share() {
        let p1 = TagPool::new();
        let p2 = TagPool::new();
        let a = p1.intern(TagType::Artist, "X");
        let b = p2.intern(TagType::Artist, "X");
        assert!(!PooledItem::ptr_eq(&a, &b));
        assert!(p1.owns(&a));
        assert!(!p1.owns(&b));
    }

    #[test]
    fn shutdown_reports_leaks() {
        let pool = TagPool::new();
        let held = pool.intern(TagType::Date, "1994");
        assert_eq!(pool.clone().shutdown(), 1);
        drop(held);
        assert_eq!(pool.shutdown(), 0);
    }
}
