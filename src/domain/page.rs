// ============================================================================
// Pagination
// Page and sort-order value objects for snapshot and quote queries
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sort order for paginated queries.
///
/// `Asc` walks the natural order of the queried collection from its start;
/// `Desc` takes elements from its end, newest-appearing-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Pagination request for order book snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pagination {
    pub page: usize,
    pub size: usize,
    pub sort: SortOrder,
}

impl Pagination {
    pub fn new(page: usize, size: usize, sort: SortOrder) -> Self {
        Self { page, size, sort }
    }

    /// Offset of the first element of this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// A single page of query results together with the pagination that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Page<T> {
    pub elements: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn of(elements: Vec<T>, pagination: Pagination) -> Self {
        Self {
            elements,
            pagination,
        }
    }

    pub fn map<R>(self, mapping: impl FnMut(T) -> R) -> Page<R> {
        Page {
            elements: self.elements.into_iter().map(mapping).collect(),
            pagination: self.pagination,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
