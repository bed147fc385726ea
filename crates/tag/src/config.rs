//! `metadata_to_use` — which tag types the scanner keeps.
//!
//! Grammar: a comma separated list of tag names (case-insensitive), or one
//! of the keywords `all` / `none`. Whitespace around names is ignored.

use crate::error::TagError;
use crate::mask::TagMask;
use crate::tag_type::TagType;

/// Types kept when no configuration is given: all but the comment.
#[must_use]
pub fn default_tag_mask() -> TagMask {
    let mut mask = TagMask::all();
    mask.unset(TagType::Comment);
    mask
}

/// Parse a `metadata_to_use` value.
///
/// # Errors
///
/// Returns [`TagError::UnknownTag`] for the first name that is not a tag type.
pub fn parse_tag_mask(value: &str) -> Result<TagMask, TagError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Ok(TagMask::none());
    }
    if value.eq_ignore_ascii_case("all") {
        return Ok(TagMask::all());
    }

    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse::<TagType>)
        .collect()
}
