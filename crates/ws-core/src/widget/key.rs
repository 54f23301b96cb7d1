//! Widget key conventions.
//!
//! Keys look like `contacts-widget`, `lead-profile-widget` or, when bound to
//! one record, `lead-profile-widget-35`.

/// Keys with this prefix render an inline search result.
pub const SEARCH_RESULT_PREFIX: &str = "search-result-";

pub const PROFILE_WIDGET_SUFFIX: &str = "-profile-widget";

const WIDGET_SEGMENT: &str = "-widget";

/// Splits a key into its base key and an optional trailing identifier.
///
/// Only text after the last `-widget-` counts as a suffix, so plain keys
/// such as `contacts-widget` come back unchanged.
pub fn split_key(key: &str) -> (&str, Option<&str>) {
    let marker = "-widget-";
    match key.rfind(marker) {
        Some(idx) => {
            let base_end = idx + WIDGET_SEGMENT.len();
            let suffix = &key[base_end + 1..];
            if suffix.is_empty() {
                (&key[..base_end], None)
            } else {
                (&key[..base_end], Some(suffix))
            }
        }
        None => (key, None),
    }
}

pub fn base_key(key: &str) -> &str {
    split_key(key).0
}

pub fn is_search_result(key: &str) -> bool {
    key.starts_with(SEARCH_RESULT_PREFIX)
}

/// `lead-profile-widget` → `Some("lead")`.
pub fn profile_stem(base_key: &str) -> Option<&str> {
    base_key
        .strip_suffix(PROFILE_WIDGET_SUFFIX)
        .filter(|stem| !stem.is_empty())
}
