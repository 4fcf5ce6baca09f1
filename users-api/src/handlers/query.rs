//! Query parameters for the list endpoint
//!
//! Page numbers and sizes are clamped, never rejected: a missing or
//! unparsable value takes its default, values below the minimum are raised,
//! and page sizes above [`MAX_PAGE_SIZE`] are capped.
//!
//! # Example
//!
//! ```rust
//! use users_api::handlers::ListQuery;
//!
//! let query = ListQuery::default().with_page_number(0).with_page_size(50);
//! assert_eq!(query.page_number(), 1);
//! assert_eq!(query.page_size(), 20);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::repository::Pagination;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum allowed items per page
pub const MAX_PAGE_SIZE: u32 = 20;

/// Query parameters for `GET /users`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Requested 1-indexed page. None defaults to 1.
    #[serde(default, deserialize_with = "lenient_integer", skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i64>,

    /// Requested page size. None defaults to DEFAULT_PAGE_SIZE.
    #[serde(default, deserialize_with = "lenient_integer", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl ListQuery {
    /// Create a new empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number
    #[must_use]
    pub fn with_page_number(mut self, page_number: i64) -> Self {
        self.page_number = Some(page_number);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// The 1-indexed page number, defaulting to 1; zero and negatives become 1
    #[must_use]
    pub fn page_number(&self) -> u32 {
        let page = self.page_number.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        u32::try_from(page).unwrap_or(u32::MAX)
    }

    /// The page size, defaulting to DEFAULT_PAGE_SIZE and clamped to 1..=MAX_PAGE_SIZE
    #[must_use]
    pub fn page_size(&self) -> u32 {
        let size = self
            .page_size
            .unwrap_or(i64::from(DEFAULT_PAGE_SIZE))
            .clamp(1, i64::from(MAX_PAGE_SIZE));
        u32::try_from(size).unwrap_or(MAX_PAGE_SIZE)
    }

    /// The repository window for this query
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::page(u64::from(self.page_number()), u64::from(self.page_size()))
    }
}

/// Accepts integers or integer strings; anything else reads as absent
fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer).unwrap_or(None);
    Ok(match raw {
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
