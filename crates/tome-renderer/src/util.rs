//! Shared utility functions for markdown rendering.

use pulldown_cmark::HeadingLevel;

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Language of a fenced code block: the first word of the info string.
pub(crate) fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace()
        .next()
        .map(|lang| lang.trim_matches(['{', '}']).trim_start_matches('.'))
        .filter(|lang| !lang.is_empty())
        .map(str::to_owned)
}

/// Whether a link points into the current site rather than elsewhere.
pub(crate) fn is_relative_link(url: &str) -> bool {
    url.starts_with('#')
        || (url.starts_with('/') && !url.starts_with("//"))
        || url.starts_with("./")
        || url.starts_with("../")
}

/// Whether a link uses a destination considered safe to follow.
///
/// Local paths may be exactly a path prefix; URIs need an alphanumeric
/// character after the scheme.
pub(crate) fn is_safe_link(url: &str) -> bool {
    const SAFE_PATHS: &[&str] = &["/", "./", "../"];
    const SAFE_URIS: &[&str] = &["http://", "https://", "ftp://", "mailto:"];
    let starts_alnum = |rest: &str| rest.chars().next().is_some_and(char::is_alphanumeric);
    let lower = url.to_ascii_lowercase();
    SAFE_PATHS.iter().any(|prefix| {
        url.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || starts_alnum(rest))
    }) || SAFE_URIS
        .iter()
        .any(|prefix| lower.strip_prefix(prefix).is_some_and(starts_alnum))
}
