//! Paging types for repository listings
//!
//! # Example
//!
//! ```rust
//! use users_api::repository::Pagination;
//!
//! let page3 = Pagination::page(3, 10);
//! assert_eq!(page3.offset, 20);
//! assert_eq!(page3.limit, 10);
//! ```

/// Offset/limit window over an ordered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of records to skip
    pub offset: u64,
    /// Maximum number of records to return
    pub limit: u64,
}

impl Pagination {
    /// Create a window from a raw offset and limit
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Create the window for a 1-indexed page number
    ///
    /// Page 0 is treated as page 1.
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }
}

/// One page of records plus the size of the whole collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records in this page, in collection order
    pub items: Vec<T>,
    /// Number of records in the collection, ignoring the window
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    /// Map the records to a new type, keeping the total
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}
