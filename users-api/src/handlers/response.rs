//! Response types for the user handlers
//!
//! Write operations answer with [`WriteOutcome`]: either `201 Created` with a
//! `Location` header and the new id as the body, or `204 No Content`.
//! Listing answers with [`ListResponse`], a plain JSON array whose paging
//! metadata travels in the `X-Pagination` header as [`PaginationMetadata`].
//!
//! # Example
//!
//! ```rust
//! use users_api::handlers::{PaginationMetadata, ResourceLinks};
//!
//! let links = ResourceLinks::new("");
//! let meta = PaginationMetadata::build(&links, 2, 10, 25);
//! assert_eq!(meta.total_pages, 3);
//! assert_eq!(meta.previous_page_link.as_deref(), Some("/users?pageNumber=1&pageSize=10"));
//! assert_eq!(meta.next_page_link.as_deref(), Some("/users?pageNumber=3&pageSize=10"));
//! ```

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Header carrying the serialized [`PaginationMetadata`]
pub static X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

/// Builds resource and page URLs under an optional public base URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLinks {
    base_url: String,
}

impl ResourceLinks {
    /// Create a link builder; an empty base produces relative links
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the users collection
    #[must_use]
    pub fn collection(&self) -> String {
        format!("{}/users", self.base_url)
    }

    /// URL of a single user
    #[must_use]
    pub fn user(&self, id: &UserId) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    /// URL of one page of the collection
    #[must_use]
    pub fn page(&self, page_number: u32, page_size: u32) -> String {
        format!(
            "{}?pageNumber={}&pageSize={}",
            self.collection(),
            page_number,
            page_size
        )
    }
}

/// HTTP 201 Created response
///
/// The body is the JSON-serialized data; the `Location` header is set when a
/// location was given and is a valid header value.
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    location: Option<String>,
}

impl<T> Created<T> {
    /// Create a new 201 Created response
    pub fn new(data: T) -> Self {
        Self {
            data,
            location: None,
        }
    }

    /// Add a Location header pointing to the created resource
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.data)).into_response();

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}

/// HTTP 204 No Content response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Result of a create, replace or patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A new record was stored under this id; `location` points at it
    Created { id: UserId, location: String },
    /// An existing record was overwritten, or a duplicate was absorbed
    NoContent,
}

impl WriteOutcome {
    /// Outcome for a freshly stored record
    pub fn created(id: UserId, links: &ResourceLinks) -> Self {
        Self::Created {
            id,
            location: links.user(&id),
        }
    }

    /// Returns `true` if a record was inserted
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

impl IntoResponse for WriteOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Created { id, location } => Created::new(id).with_location(location).into_response(),
            Self::NoContent => NoContent.into_response(),
        }
    }
}

/// Paging metadata for `GET /users`
///
/// `previous_page_link` is present iff `current_page > 1`; `next_page_link`
/// iff `current_page < total_pages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub previous_page_link: Option<String>,
    pub next_page_link: Option<String>,
    pub total_count: u64,
    pub page_size: u32,
    pub current_page: u32,
    pub total_pages: u32,
}

impl PaginationMetadata {
    /// Compute page counts and neighbour links
    ///
    /// `page_size` is treated as at least 1.
    #[must_use]
    pub fn build(links: &ResourceLinks, page_number: u32, page_size: u32, total_count: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = calculate_total_pages(total_count, page_size);

        let previous_page_link =
            (page_number > 1).then(|| links.page(page_number - 1, page_size));
        let next_page_link =
            (page_number < total_pages).then(|| links.page(page_number + 1, page_size));

        Self {
            previous_page_link,
            next_page_link,
            total_count,
            page_size,
            current_page: page_number,
            total_pages,
        }
    }

    /// Render as an `X-Pagination` header value
    ///
    /// Returns `None` if the JSON contains bytes a header cannot carry.
    #[must_use]
    pub fn to_header_value(&self) -> Option<HeaderValue> {
        let json = serde_json::to_string(self).ok()?;
        HeaderValue::from_str(&json).ok()
    }
}

/// Calculate total pages, rounding up
fn calculate_total_pages(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.saturating_add(per_page).saturating_sub(1) / per_page;
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// List response: JSON array body plus the `X-Pagination` header
#[derive(Debug, Clone)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> ListResponse<T> {
    /// Create a new list response
    pub fn new(items: Vec<T>, pagination: PaginationMetadata) -> Self {
        Self { items, pagination }
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(&self.items)).into_response();

        match self.pagination.to_header_value() {
            Some(value) => {
                response.headers_mut().insert(X_PAGINATION.clone(), value);
            }
            None => tracing::warn!("pagination metadata is not a valid header value, omitting it"),
        }

        response
    }
}
