//! Query helpers shared by the Diesel repositories.

use diesel::sql_types::Text;
use pagination::PageRequest;

diesel::define_sql_function! {
    /// SQL `lower(text)`, matching the expression indexes on names.
    fn lower(x: Text) -> Text;
}

/// Escape `LIKE` metacharacters and wrap the needle for a substring match.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    pattern.push_str(&escape_like(needle));
    pattern.push('%');
    pattern
}

/// Escape `LIKE` metacharacters so the value matches literally.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `(offset, limit)` for a page, saturating at `i64::MAX`.
pub(crate) fn page_bounds(page: PageRequest) -> (i64, i64) {
    let offset = i64::try_from(page.skip()).unwrap_or(i64::MAX);
    let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
    (offset, limit)
}

/// Postgres returns `count(*)` as `bigint`; it is never negative.
pub(crate) fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Convert loaded rows, mapping the first conversion failure through
/// `map_err`.
pub(crate) fn collect_rows<R, T, X, E>(
    rows: Vec<R>,
    map_err: impl Fn(X) -> E,
) -> Result<Vec<T>, E>
where
    T: TryFrom<R, Error = X>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(&map_err))
        .collect()
}
