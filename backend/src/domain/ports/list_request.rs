//! Request envelope shared by the list use-cases.

use pagination::PageRequest;

/// Filtered page request passed to driving list ports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListRequest<F> {
    pub filter: F,
    pub page: PageRequest,
}

impl<F> ListRequest<F> {
    /// Pair a filter with a page request.
    pub fn new(filter: F, page: PageRequest) -> Self {
        Self { filter, page }
    }
}
