//! Property-based tests for query windows.
//! Streaming and buffered windowing must agree whenever the database's
//! natural order is already the sort order.

use library::{run_query, DatabaseSelection, LightSong, MemoryDatabase, Visitor, Window};
use proptest::prelude::*;
use tag::{TagBuilder, TagPool, TagType};

/// `n` root-level songs whose names and titles both sort by index.
fn ordered_db(pool: &TagPool, n: usize) -> MemoryDatabase {
    let db = MemoryDatabase::new();
    for i in 0..n {
        let name = format!("{i:04}");
        let mut b = TagBuilder::new(pool);
        b.add_item(TagType::Title, &name);
        db.add_song(&format!("{name}.flac"), b.commit(), None).unwrap();
    }
    db
}

fn run(db: &MemoryDatabase, sort: Option<TagType>, window: Window) -> Vec<String> {
    let mut out = Vec::new();
    let visitor = Visitor::new().with_song(|s: &LightSong<'_>| {
        out.push(s.full_uri().into_owned());
        Ok(())
    });
    run_query(db, &DatabaseSelection::all(), sort, window, visitor).unwrap();
    out
}

fn window() -> impl Strategy<Value = Window> {
    (0usize..40, proptest::option::of(0usize..40)).prop_map(|(start, len)| match len {
        Some(len) => Window::new(start, start + len),
        None => Window::starting_at(start),
    })
}

proptest! {
    /// Streaming with a window visits the same songs as buffering.
    #[test]
    fn streaming_matches_buffered(n in 0usize..30, w in window()) {
        let pool = TagPool::new();
        let db = ordered_db(&pool, n);
        let streamed = run(&db, None, w);
        let buffered = run(&db, Some(TagType::Title), w);
        prop_assert_eq!(&streamed, &buffered);
    }

    /// A windowed result is the full result sliced by position.
    #[test]
    fn window_is_a_slice_of_the_full_result(n in 0usize..30, w in window()) {
        let pool = TagPool::new();
        let db = ordered_db(&pool, n);
        let full = run(&db, None, Window::ALL);
        let windowed = run(&db, None, w);
        let expected: Vec<String> = full
            .iter()
            .enumerate()
            .filter(|(i, _)| w.contains(*i))
            .map(|(_, s)| s.clone())
            .collect();
        prop_assert_eq!(windowed.len(), w.range(n).len());
        prop_assert_eq!(windowed, expected);
    }
}
