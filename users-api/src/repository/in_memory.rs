//! In-memory user store
//!
//! Records live in a `BTreeMap` keyed by an insertion sequence number, with a
//! `HashMap` index from id to sequence. Iterating the tree yields insertion
//! order; overwriting a record reuses its sequence number so it keeps its
//! position. The whole collection sits behind one tokio `RwLock`.
//!
//! * find/exists: O(1) index lookup + O(log n)
//! * insert/upsert/update/delete: O(log n)
//! * list_page: O(offset + limit)

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Page, Pagination};
use super::traits::{RepositoryResult, UserRepository};
use crate::ids::UserId;
use crate::models::User;

const ENTITY_TYPE: &str = "User";

#[derive(Debug, Default)]
struct Collection {
    next_seq: u64,
    records: BTreeMap<u64, User>,
    index: HashMap<UserId, u64>,
}

impl Collection {
    fn get(&self, id: &UserId) -> Option<&User> {
        self.index.get(id).and_then(|seq| self.records.get(seq))
    }

    fn push(&mut self, user: User) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(user.id, seq);
        self.records.insert(seq, user);
    }

    fn len(&self) -> u64 {
        self.records.len() as u64
    }
}

/// Thread-safe in-memory [`UserRepository`]
///
/// Cloning is cheap and every clone shares the same collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Collection>>,
}

impl InMemoryUserRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Option<User> {
        self.inner.read().await.get(id).cloned()
    }

    async fn exists(&self, id: &UserId) -> bool {
        self.inner.read().await.index.contains_key(id)
    }

    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let mut collection = self.inner.write().await;

        if user.id.is_nil() {
            user.id = UserId::new();
            while collection.index.contains_key(&user.id) {
                user.id = UserId::new();
            }
        } else if collection.index.contains_key(&user.id) {
            return Err(RepositoryError::duplicate_identity(
                ENTITY_TYPE,
                user.id.to_string(),
            ));
        }

        tracing::debug!(user_id = %user.id, "Inserting user record");
        collection.push(user.clone());
        Ok(user)
    }

    async fn upsert_by_id(&self, user: User) -> RepositoryResult<(User, bool)> {
        let mut collection = self.inner.write().await;

        if let Some(&seq) = collection.index.get(&user.id) {
            tracing::debug!(user_id = %user.id, "Overwriting user record in place");
            collection.records.insert(seq, user.clone());
            return Ok((user, false));
        }

        if user.id.is_nil() {
            return Err(RepositoryError::duplicate_identity(
                ENTITY_TYPE,
                user.id.to_string(),
            )
            .with_operation(RepositoryOperation::Upsert));
        }

        tracing::debug!(user_id = %user.id, "Inserting user record at caller-supplied id");
        collection.push(user.clone());
        Ok((user, true))
    }

    async fn update_existing<F, E>(&self, id: &UserId, apply: F) -> Option<Result<User, E>>
    where
        F: FnOnce(&User) -> Result<User, E> + Send,
        E: Send,
    {
        let mut collection = self.inner.write().await;
        let seq = *collection.index.get(id)?;
        let current = collection.records.get(&seq)?;

        let mut updated = match apply(current) {
            Ok(updated) => updated,
            Err(err) => return Some(Err(err)),
        };
        updated.id = *id;

        tracing::debug!(user_id = %id, "Updating user record in place");
        collection.records.insert(seq, updated.clone());
        Some(Ok(updated))
    }

    async fn delete(&self, id: &UserId) -> bool {
        let mut collection = self.inner.write().await;
        match collection.index.remove(id) {
            Some(seq) => {
                collection.records.remove(&seq);
                tracing::debug!(user_id = %id, "Deleted user record");
                true
            }
            None => false,
        }
    }

    async fn list_page(&self, pagination: Pagination) -> Page<User> {
        let collection = self.inner.read().await;
        let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);

        let items = collection
            .records
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Page::new(items, collection.len())
    }

    async fn count(&self) -> u64 {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(login: &str) -> User {
        User {
            id: UserId::nil(),
            login: login.to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
        }
    }

    fn user_at(id: UserId, login: &str) -> User {
        User { id, ..user(login) }
    }

    #[tokio::test]
    async fn test_insert_assigns_fresh_id() {
        let repo = InMemoryUserRepository::new();
        let a = repo.insert(user("alice")).await.unwrap();
        let b = repo.insert(user("bob")).await.unwrap();

        assert!(!a.id.is_nil());
        assert_ne!(a.id, b.id);
        assert_eq!(repo.find_by_id(&a.id).await, Some(a));
        assert_eq!(repo.count().await, 2);
    }

    #[tokio::test]
    async fn test_insert_keeps_supplied_id() {
        let repo = InMemoryUserRepository::new();
        let id = UserId::new();
        let stored = repo.insert(user_at(id, "alice")).await.unwrap();
        assert_eq!(stored.id, id);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_identity() {
        let repo = InMemoryUserRepository::new();
        let id = UserId::new();
        repo.insert(user_at(id, "alice")).await.unwrap();

        let err = repo.insert(user_at(id, "mallory")).await.unwrap_err();
        assert!(err.is_duplicate_identity());
        assert_eq!(err.entity_id, Some(id.to_string()));

        // The original record is untouched
        assert_eq!(repo.find_by_id(&id).await.unwrap().login, "alice");
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_upsert_inserts_at_requested_id() {
        let repo = InMemoryUserRepository::new();
        let id = UserId::new();

        let (stored, inserted) = repo.upsert_by_id(user_at(id, "alice")).await.unwrap();
        assert!(inserted);
        assert_eq!(stored.id, id);
        assert!(repo.exists(&id).await);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing() {
        let repo = InMemoryUserRepository::new();
        let created = repo.insert(user("alice")).await.unwrap();

        let (stored, inserted) = repo
            .upsert_by_id(user_at(created.id, "alicia"))
            .await
            .unwrap();
        assert!(!inserted);
        assert_eq!(stored.login, "alicia");
        assert_eq!(repo.find_by_id(&created.id).await.unwrap().login, "alicia");
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_upsert_rejects_nil_id() {
        let repo = InMemoryUserRepository::new();
        let err = repo.upsert_by_id(user("alice")).await.unwrap_err();
        assert_eq!(err.operation, RepositoryOperation::Upsert);
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_update_existing_rewrites_in_place() {
        let repo = InMemoryUserRepository::new();
        let first = repo.insert(user("first")).await.unwrap();
        repo.insert(user("second")).await.unwrap();

        let updated = repo
            .update_existing(&first.id, |current| {
                Ok::<_, ()>(User {
                    id: UserId::nil(),
                    login: format!("{}-renamed", current.login),
                    ..current.clone()
                })
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, first.id);
        let page = repo.list_page(Pagination::page(1, 10)).await;
        assert_eq!(page.items[0].login, "first-renamed");
        assert_eq!(page.items[0].id, first.id);
        assert_eq!(repo.count().await, 2);
    }

    #[tokio::test]
    async fn test_update_existing_unknown_id_stores_nothing() {
        let repo = InMemoryUserRepository::new();
        let mut called = false;

        let outcome = repo
            .update_existing(&UserId::new(), |current| {
                called = true;
                Ok::<_, ()>(current.clone())
            })
            .await;

        assert!(outcome.is_none());
        assert!(!called);
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_update_existing_failure_leaves_record() {
        let repo = InMemoryUserRepository::new();
        let created = repo.insert(user("alice")).await.unwrap();

        let outcome = repo
            .update_existing(&created.id, |_| Err::<User, _>("rejected"))
            .await;

        assert_eq!(outcome, Some(Err("rejected")));
        assert_eq!(repo.find_by_id(&created.id).await, Some(created));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let repo = InMemoryUserRepository::new();
        let created = repo.insert(user("counter")).await.unwrap();
        let mut tasks = Vec::new();
        for _ in 0..50 {
            let repo = repo.clone();
            let id = created.id;
            tasks.push(tokio::spawn(async move {
                repo.update_existing(&id, |current| {
                    Ok::<_, ()>(User {
                        first_name: format!("{}x", current.first_name),
                        ..current.clone()
                    })
                })
                .await
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap().is_some());
        }

        let stored = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(stored.first_name, format!("First{}", "x".repeat(50)));
    }

    #[tokio::test]
    async fn test_delete_is_noop_for_unknown_id() {
        let repo = InMemoryUserRepository::new();
        let created = repo.insert(user("alice")).await.unwrap();

        assert!(!repo.delete(&UserId::new()).await);
        assert!(repo.delete(&created.id).await);
        assert!(!repo.delete(&created.id).await);
        assert!(repo.find_by_id(&created.id).await.is_none());
    }

    #[tokio::test]
    async fn test_list_page_preserves_insertion_order() {
        let repo = InMemoryUserRepository::new();
        for n in 0..25 {
            repo.insert(user(&format!("user{n}"))).await.unwrap();
        }

        let page = repo.list_page(Pagination::page(2, 10)).await;
        assert_eq!(page.total_count, 25);
        let logins: Vec<_> = page.items.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins.first(), Some(&"user10"));
        assert_eq!(logins.last(), Some(&"user19"));

        let last = repo.list_page(Pagination::page(3, 10)).await;
        assert_eq!(last.items.len(), 5);

        // Reads are repeatable
        assert_eq!(repo.list_page(Pagination::page(2, 10)).await, page);
    }

    #[tokio::test]
    async fn test_list_page_out_of_range_is_empty() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("alice")).await.unwrap();

        let page = repo.list_page(Pagination::page(5, 20)).await;
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_list_position() {
        let repo = InMemoryUserRepository::new();
        let first = repo.insert(user("first")).await.unwrap();
        repo.insert(user("second")).await.unwrap();

        repo.upsert_by_id(user_at(first.id, "renamed")).await.unwrap();

        let page = repo.list_page(Pagination::page(1, 10)).await;
        assert_eq!(page.items[0].login, "renamed");
        assert_eq!(page.items[1].login, "second");
    }

    #[tokio::test]
    async fn test_delete_then_list_skips_removed() {
        let repo = InMemoryUserRepository::new();
        let a = repo.insert(user("a")).await.unwrap();
        repo.insert(user("b")).await.unwrap();
        repo.insert(user("c")).await.unwrap();
        repo.delete(&a.id).await;

        let page = repo.list_page(Pagination::page(1, 10)).await;
        let logins: Vec<_> = page.items.iter().map(|u| u.login.clone()).collect();
        assert_eq!(logins, vec!["b", "c"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryUserRepository::new();
        let clone = repo.clone();
        let created = repo.insert(user("alice")).await.unwrap();
        assert!(clone.exists(&created.id).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_are_not_lost() {
        let repo = InMemoryUserRepository::new();
        let mut tasks = Vec::new();
        for n in 0..50 {
            let repo = repo.clone();
            tasks.push(tokio::spawn(async move {
                repo.insert(user(&format!("user{n}"))).await.unwrap()
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(repo.count().await, 50);
    }
}
