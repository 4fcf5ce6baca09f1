//! Handlers for the user resource
//!
//! # Features
//!
//! - **Decision logic**: [`UserHandler`] for get, create, replace, patch, delete and list
//! - **Route functions**: thin axum adapters ([`get_user`], [`create_user`], ...) over the handler
//! - **Pagination**: [`ListQuery`] clamping and [`PaginationMetadata`] links in the `X-Pagination` header
//! - **Error Handling**: [`ApiError`] with automatic HTTP status code mapping
//!
//! # Example
//!
//! ```rust
//! use users_api::handlers::{ResourceLinks, UserHandler, WriteOutcome};
//! use users_api::repository::InMemoryUserRepository;
//!
//! # tokio::runtime::Builder::new_current_thread()
//! #     .build()
//! #     .unwrap()
//! #     .block_on(async {
//! let handler = UserHandler::new(InMemoryUserRepository::new(), ResourceLinks::default());
//!
//! let outcome = handler.create(br#"{"login": "johndoe375"}"#).await.unwrap();
//! let WriteOutcome::Created { id, .. } = outcome else { unreachable!() };
//!
//! let user = handler.get(&id.to_string()).await.unwrap();
//! assert_eq!(user.full_name, "Doe John");
//! # });
//! ```

mod error;
mod query;
mod response;
mod users;

pub use error::{ApiError, ApiErrorKind, ApiErrorResponse, ApiOperation};
pub use query::{ListQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use response::{
    Created, ListResponse, NoContent, PaginationMetadata, ResourceLinks, WriteOutcome,
    X_PAGINATION,
};
pub use users::{
    create_user, delete_user, get_user, list_users, patch_user, replace_user, UserHandler,
};
