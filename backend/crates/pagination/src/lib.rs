//! Offset pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] carries a zero-indexed page number and a page size.
//! Adapters translate it into `OFFSET`/`LIMIT` (or slice bounds) through
//! [`PageRequest::skip`] and [`PageRequest::limit`]. List responses are wrapped
//! in [`Paginated`], which serialises as:
//!
//! ```json
//! { "page": 0, "perPage": 10, "total": 3, "data": [] }
//! ```
//!
//! `total` always reports the size of the whole filtered set, independent of
//! which page was requested.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default zero-indexed page number.
pub const DEFAULT_PAGE: u64 = 0;

/// Default number of records per page.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The page size must be at least one record.
    #[error("perPage must be greater than zero")]
    ZeroPerPage,
}

/// Zero-indexed offset page request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 10).expect("valid page request");
/// assert_eq!(request.skip(), 20);
/// assert_eq!(request.limit(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    /// Build a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroPerPage`] when `per_page` is zero.
    pub const fn new(page: u64, per_page: u64) -> Result<Self, PageRequestError> {
        if per_page == 0 {
            return Err(PageRequestError::ZeroPerPage);
        }
        Ok(Self { page, per_page })
    }

    /// Zero-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Number of records per page.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of records to skip before the page starts.
    ///
    /// Saturates instead of overflowing for absurdly large page numbers, which
    /// simply yields an empty page.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.page.saturating_mul(self.per_page)
    }

    /// Maximum number of records on the page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Pagination envelope returned by every list endpoint.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, Paginated};
///
/// let page = Paginated::new(PageRequest::default(), 3, vec!["a", "b", "c"]);
/// let lengths = page.map(str::len);
/// assert_eq!(lengths.total, 3);
/// assert_eq!(lengths.data, vec![1, 1, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Zero-indexed page number that was requested.
    pub page: u64,
    /// Page size that was requested.
    pub per_page: u64,
    /// Number of records matching the filter across all pages.
    pub total: u64,
    /// Records on this page.
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wrap one page of records together with the filtered total.
    #[must_use]
    pub const fn new(request: PageRequest, total: u64, data: Vec<T>) -> Self {
        Self {
            page: request.page,
            per_page: request.per_page,
            total,
            data,
        }
    }

    /// Transform every record while keeping the envelope metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for page arithmetic and envelope serialisation.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 10)]
    #[case(3, 25, 75)]
    #[case(u64::MAX, 2, u64::MAX)]
    fn skip_is_page_times_per_page(#[case] page: u64, #[case] per_page: u64, #[case] skip: u64) {
        let request = PageRequest::new(page, per_page).expect("valid request");
        assert_eq!(request.skip(), skip);
        assert_eq!(request.limit(), per_page);
    }

    #[rstest]
    fn zero_per_page_is_rejected() {
        assert_eq!(PageRequest::new(0, 0), Err(PageRequestError::ZeroPerPage));
    }

    #[rstest]
    fn default_request_is_first_page_of_ten() {
        let request = PageRequest::default();
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.per_page(), DEFAULT_PER_PAGE);
    }

    #[rstest]
    fn envelope_uses_camel_case_keys() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let envelope = Paginated::new(request, 5, vec!["x", "y"]);
        let value = serde_json::to_value(&envelope).expect("serialise envelope");
        assert_eq!(
            value,
            json!({ "page": 1, "perPage": 2, "total": 5, "data": ["x", "y"] })
        );
    }

    #[rstest]
    fn map_preserves_metadata() {
        let request = PageRequest::new(4, 3).expect("valid request");
        let envelope = Paginated::new(request, 13, vec![1_u8]).map(u16::from);
        assert_eq!(envelope.page, 4);
        assert_eq!(envelope.per_page, 3);
        assert_eq!(envelope.total, 13);
        assert_eq!(envelope.data, vec![1_u16]);
    }
}
