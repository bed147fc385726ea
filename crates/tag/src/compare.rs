//! Tag comparator — orders two tags by one field.
//!
//! Track and disc numbers are compared by magnitude because sources pad
//! them inconsistently (`"2"` vs `"02"`); everything else goes through a
//! [`Collator`].

use core::cmp::Ordering;

use crate::collate::{ByteCollator, Collator};
use crate::tag::Tag;
use crate::tag_type::TagType;

/// Parse the leading integer of `s` the way `strtol` does.
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit. No digits at all yields `0`. Out-of-range values saturate.
#[must_use]
pub fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, s.get(1..).unwrap_or("")),
        Some(b'+') => (false, s.get(1..).unwrap_or("")),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b.saturating_sub(b'0'));
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Numeric comparison of two leading integers.
#[must_use]
pub fn compare_numeric(a: &str, b: &str) -> Ordering {
    parse_leading_int(a).cmp(&parse_leading_int(b))
}

/// Compare the sort values of `a` and `b` for `tag_type` in byte order.
#[must_use]
pub fn compare_tags(tag_type: TagType, a: &Tag, b: &Tag) -> Ordering {
    compare_tags_with(&ByteCollator, tag_type, a, b)
}

/// Compare the sort values of `a` and `b` for `tag_type` with `collator`.
///
/// Numeric types ignore the collator.
pub fn compare_tags_with<C>(collator: &C, tag_type: TagType, a: &Tag, b: &Tag) -> Ordering
where
    C: Collator + ?Sized,
{
    let a_value = a.get_sort_value(tag_type);
    let b_value = b.get_sort_value(tag_type);
    if tag_type.is_numeric() {
        compare_numeric(a_value, b_value)
    } else {
        collator.compare(a_value, b_value)
    }
}
