//! Repository trait definitions
//!
//! [`UserRepository`] is the storage seam for user records. It uses RPITIT
//! (Return Position Impl Trait In Traits) so implementations can be plain
//! `async fn`s without `async_trait`.
//!
//! # Example
//!
//! ```rust
//! use users_api::models::User;
//! use users_api::ids::UserId;
//! use users_api::repository::{InMemoryUserRepository, UserRepository};
//!
//! # tokio::runtime::Builder::new_current_thread()
//! #     .build()
//! #     .unwrap()
//! #     .block_on(async {
//! let repo = InMemoryUserRepository::new();
//! let stored = repo
//!     .insert(User {
//!         id: UserId::nil(),
//!         login: "alice".to_string(),
//!         first_name: "Alice".to_string(),
//!         last_name: "Liddell".to_string(),
//!     })
//!     .await
//!     .unwrap();
//!
//! assert!(!stored.id.is_nil());
//! let found = repo.find_by_id(&stored.id).await;
//! assert_eq!(found, Some(stored));
//! # });
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::{Page, Pagination};
use crate::ids::UserId;
use crate::models::User;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Storage contract for user records
///
/// Implementations serialize mutations against each other and against
/// reads. Listing order is stable: records appear in insertion order, and
/// overwriting a record in place does not move it.
pub trait UserRepository: Send + Sync {
    /// Find a record by id
    ///
    /// Returns `None` when no live record has this id.
    fn find_by_id(&self, id: &UserId) -> impl Future<Output = Option<User>> + Send;

    /// Check whether a live record has this id
    fn exists(&self, id: &UserId) -> impl Future<Output = bool> + Send;

    /// Store a new record
    ///
    /// A nil `user.id` is replaced by a freshly minted id. The stored copy,
    /// including the final id, is returned.
    ///
    /// # Errors
    ///
    /// `DuplicateIdentity` if a non-nil id is already in use.
    fn insert(&self, user: User) -> impl Future<Output = RepositoryResult<User>> + Send;

    /// Overwrite the record at `user.id`, or insert it there if absent
    ///
    /// Returns the stored copy and `true` when the call inserted.
    ///
    /// # Errors
    ///
    /// `DuplicateIdentity` only if the insert branch collides, which cannot
    /// happen while the collection lock is held; the variant is kept so
    /// callers handle both paths the same way.
    fn upsert_by_id(
        &self,
        user: User,
    ) -> impl Future<Output = RepositoryResult<(User, bool)>> + Send;

    /// Read-modify-write an existing record under a single exclusive lock
    ///
    /// `apply` receives the stored record and returns its replacement, which
    /// is written at the same id and position. Returns `None` when no live
    /// record has this id; `apply` is not called and nothing is stored. When
    /// `apply` fails the stored record is left as it was.
    fn update_existing<F, E>(
        &self,
        id: &UserId,
        apply: F,
    ) -> impl Future<Output = Option<Result<User, E>>> + Send
    where
        F: FnOnce(&User) -> Result<User, E> + Send,
        E: Send;

    /// Remove the record with this id
    ///
    /// Absent ids are a no-op. Returns `true` if a record was removed.
    fn delete(&self, id: &UserId) -> impl Future<Output = bool> + Send;

    /// Read one window of records in collection order
    ///
    /// Windows past the end are empty. `total_count` always reflects the
    /// whole collection.
    fn list_page(&self, pagination: Pagination) -> impl Future<Output = Page<User>> + Send;

    /// Number of live records
    fn count(&self) -> impl Future<Output = u64> + Send;
}
