//! URI helpers. Library URIs are relative, `/`-separated UTF-8 paths; the
//! empty string is the root.

use std::borrow::Cow;

/// Separator between URI components.
pub const SEPARATOR: char = '/';

/// Last component of `uri`.
#[must_use]
pub fn get_base(uri: &str) -> &str {
    uri.rsplit_once(SEPARATOR).map_or(uri, |(_, base)| base)
}

/// Everything before the last component of `uri`; `""` for top-level names.
#[must_use]
pub fn get_parent(uri: &str) -> &str {
    uri.rsplit_once(SEPARATOR).map_or("", |(parent, _)| parent)
}

/// Join two URIs. An empty side yields the other unchanged.
#[must_use]
pub fn build<'a>(a: &'a str, b: &'a str) -> Cow<'a, str> {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => Cow::Borrowed(b),
        (_, true) => Cow::Borrowed(a),
        _ => Cow::Owned(format!("{a}{SEPARATOR}{b}")),
    }
}

/// `uri` as printed in brief listings: just its last component when `base`
/// is set, the whole URI otherwise.
#[must_use]
pub fn apply_base_flag(uri: &str, base: bool) -> &str {
    if base {
        get_base(uri)
    } else {
        uri
    }
}

/// The part of `uri` below `parent`, or `None` when `uri` is outside it.
///
/// `parent` itself maps to `""`; the root contains everything.
#[must_use]
pub fn relative_to<'a>(parent: &str, uri: &'a str) -> Option<&'a str> {
    if parent.is_empty() {
        return Some(uri);
    }
    let rest = uri.strip_prefix(parent)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix(SEPARATOR)
    }
}

/// Is `uri` a canonical, non-root path that a database can be mounted on?
///
/// Rejects the root, leading or trailing separators, empty components and
/// `.`/`..` components, any of which would make prefixed URIs ambiguous.
#[must_use]
pub fn is_valid_mount_point(uri: &str) -> bool {
    !uri.is_empty()
        && uri
            .split(SEPARATOR)
            .all(|c| !c.is_empty() && c != "." && c != "..")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn base_and_parent() {
        assert_eq!(get_base("a/b/c.flac"), "c.flac");
        assert_eq!(get_parent("a/b/c.flac"), "a/b");
        assert_eq!(get_base("c.flac"), "c.flac");
        assert_eq!(get_parent("c.flac"), "");
    }

    #[test]
    fn build_skips_empty_sides() {
        assert_eq!(build("", "x"), "x");
        assert_eq!(build("x", ""), "x");
        assert_eq!(build("foo", "bar/song.mp3"), "foo/bar/song.mp3");
    }

    #[test]
    fn base_flag() {
        assert_eq!(apply_base_flag("Portishead/Dummy/01.flac", true), "01.flac");
        assert_eq!(
            apply_base_flag("Portishead/Dummy/01.flac", false),
            "Portishead/Dummy/01.flac"
        );
    }

    #[test]
    fn relative_paths() {
        assert_eq!(relative_to("foo", "foo"), Some(""));
        assert_eq!(relative_to("foo", "foo/bar"), Some("bar"));
        assert_eq!(relative_to("foo", "foobar"), None);
        assert_eq!(relative_to("", "x/y"), Some("x/y"));
    }

    #[test]
    fn mount_point_validation() {
        assert!(is_valid_mount_point("nas"));
        assert!(is_valid_mount_point("remote/nas"));
        assert!(!is_valid_mount_point(""));
        assert!(!is_valid_mount_point("/nas"));
        assert!(!is_valid_mount_point("nas/"));
        assert!(!is_valid_mount_point("a//b"));
        assert!(!is_valid_mount_point("a/../b"));
    }
}
