//! TagMask — a set of [`TagType`]s packed into one word.

use core::ops::{BitOr, BitOrAssign};

use crate::tag_type::TagType;

/// Bit set over [`TagType`], one bit per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TagMask(u32);

impl TagMask {
    /// The empty set.
    #[must_use]
    pub const fn none() -> Self {
        TagMask(0)
    }

    /// Every real tag type.
    #[must_use]
    pub const fn all() -> Self {
        // COUNT < 32, so the shift stays in range.
        #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
        TagMask((1u32 << TagType::COUNT as u32) - 1)
    }

    /// The set holding just `tag_type`.
    #[must_use]
    pub const fn of(tag_type: TagType) -> Self {
        TagMask(1u32 << tag_type.index())
    }

    /// Is `tag_type` in the set?
    #[must_use]
    pub const fn test(self, tag_type: TagType) -> bool {
        self.0 & Self::of(tag_type).0 != 0
    }

    /// Add `tag_type` to the set.
    pub fn set(&mut self, tag_type: TagType) {
        self.0 |= Self::of(tag_type).0;
    }

    /// Remove `tag_type` from the set.
    pub fn unset(&mut self, tag_type: TagType) {
        self.0 &= !Self::of(tag_type).0;
    }

    /// `true` when no type is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the members in [`TagType::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = TagType> {
        TagType::ALL.into_iter().filter(move |t| self.test(*t))
    }
}

impl From<TagType> for TagMask {
    fn from(tag_type: TagType) -> Self {
        TagMask::of(tag_type)
    }
}

impl BitOr for TagMask {
    type Output = TagMask;

    fn bitor(self, rhs: TagMask) -> TagMask {
        TagMask(self.0 | rhs.0)
    }
}

impl BitOr<TagType> for TagMask {
    type Output = TagMask;

    fn bitor(self, rhs: TagType) -> TagMask {
        self | TagMask::of(rhs)
    }
}

impl BitOrAssign for TagMask {
    fn bitor_assign(&mut self, rhs: TagMask) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<TagType> for TagMask {
    fn from_iter<I: IntoIterator<Item = TagType>>(iter: I) -> Self {
        iter.into_iter().fold(TagMask::none(), |m, t| m | t)
    }
}
