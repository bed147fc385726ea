//! Collators — the string ordering used for non-numeric sort keys.
//!
//! Locale-aware collation is an external concern; this module only defines
//! the seam and two portable orderings. Any `Fn(&str, &str) -> Ordering`
//! is a collator too.

use core::cmp::Ordering;

/// A total order over UTF-8 strings.
pub trait Collator {
    /// Compare `a` with `b`.
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> Collator for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Plain byte order. The default for sorting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteCollator;

impl Collator for ByteCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.as_bytes().cmp(b.as_bytes())
    }
}

/// Unicode lower-case folding, then byte order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFoldCollator;

impl Collator for CaseFoldCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order_puts_upper_case_first() {
        assert_eq!(ByteCollator.compare("Zed", "abc"), Ordering::Less);
        assert_eq!(ByteCollator.compare("1", "10"), Ordering::Less);
        assert_eq!(ByteCollator.compare("10", "2"), Ordering::Less);
    }

    #[test]
    fn case_fold_ignores_case() {
        assert_eq!(CaseFoldCollator.compare("Zed", "abc"), Ordering::Greater);
        assert_eq!(CaseFoldCollator.compare("ÄBC", "äbc"), Ordering::Equal);
    }

    #[test]
    fn closures_are_collators() {
        let reverse = |a: &str, b: &str| b.cmp(a);
        assert_eq!(reverse.compare("a", "b"), Ordering::Greater);
    }
}
