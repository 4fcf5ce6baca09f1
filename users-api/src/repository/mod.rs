//! User storage
//!
//! # Features
//!
//! - **Storage contract**: [`UserRepository`] with find, insert, upsert-by-id, locked update, delete and paged listing
//! - **In-memory store**: [`InMemoryUserRepository`], insertion-ordered and lock-guarded
//! - **Paging**: [`Pagination`] windows and [`Page`] results carrying the collection size
//! - **Errors**: [`RepositoryError`], whose only kind is duplicate identity

mod error;
mod in_memory;
mod pagination;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use in_memory::InMemoryUserRepository;
pub use pagination::{Page, Pagination};
pub use traits::{RepositoryResult, UserRepository};
