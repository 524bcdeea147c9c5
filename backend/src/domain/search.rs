//! Text search helpers shared by the list filters.

/// Trim a raw search parameter, treating blank input as absent.
pub(crate) fn normalise_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Case-insensitive literal substring test.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
