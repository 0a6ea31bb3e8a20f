use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{PatchUser, User, UserInput};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user under the next identifier
    async fn create(&self, input: UserInput) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: u64) -> UserResult<Option<User>>;

    /// All users in insertion order
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Users born within `[from, to]`, in insertion order
    async fn search_by_birth_date(&self, from: NaiveDate, to: NaiveDate)
    -> UserResult<Vec<User>>;

    /// Overwrite every field of a user; `None` when the id is unknown
    async fn replace(&self, id: u64, input: UserInput) -> UserResult<Option<User>>;

    /// Merge the present fields into a user; `None` when the id is unknown
    async fn patch(&self, id: u64, patch: PatchUser) -> UserResult<Option<User>>;

    /// Delete a user by ID; `false` when the id is unknown
    async fn delete(&self, id: u64) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository.
///
/// Users live in a single list guarded by a lock. Identifiers come from a
/// monotonic counter starting at 1 and are never handed out twice, even
/// after the user holding one is deleted. Clones share the same store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
    counter: Arc<AtomicU64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails once every `u64` id has been handed out.
    fn next_id(&self) -> UserResult<u64> {
        self.counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map(|previous| previous + 1)
            .map_err(|_| UserError::Internal("user id space exhausted".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: UserInput) -> UserResult<User> {
        let mut users = self.users.write().await;

        let user = User::new(self.next_id()?, input);
        users.push(user.clone());

        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: u64) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.clone())
    }

    async fn search_by_birth_date(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let result: Vec<User> = users
            .iter()
            .filter(|u| u.born_between(from, to))
            .cloned()
            .collect();

        Ok(result)
    }

    async fn replace(&self, id: u64, input: UserInput) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.replace(input);

        tracing::info!(user_id = id, "Replaced user");
        Ok(Some(user.clone()))
    }

    async fn patch(&self, id: u64, patch: PatchUser) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.apply_patch(patch);

        tracing::info!(user_id = id, "Patched user");
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: u64) -> UserResult<bool> {
        let mut users = self.users.write().await;

        match users.iter().position(|u| u.id == id) {
            Some(index) => {
                users.remove(index);
                tracing::info!(user_id = id, "Deleted user");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, birth_date: NaiveDate) -> UserInput {
        UserInput {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            birth_date,
            address: None,
            phone_number: Some("1234567890".to_string()),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_monotonic_ids_from_one() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(input("a@example.com", date(1990, 1, 1))).await.unwrap();
        let second = repo.create(input("b@example.com", date(1991, 1, 1))).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(input("a@example.com", date(1990, 1, 1))).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let next = repo.create(input("b@example.com", date(1990, 1, 1))).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_create_fails_when_ids_run_out() {
        let repo = InMemoryUserRepository {
            counter: Arc::new(AtomicU64::new(u64::MAX)),
            ..Default::default()
        };

        let err = repo
            .create(input("a@example.com", date(1990, 1, 1)))
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Internal(_)));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_last_id_is_still_assigned() {
        let repo = InMemoryUserRepository {
            counter: Arc::new(AtomicU64::new(u64::MAX - 1)),
            ..Default::default()
        };

        let user = repo.create(input("a@example.com", date(1990, 1, 1))).await.unwrap();
        assert_eq!(user.id, u64::MAX);
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(input("test@example.com", date(1990, 1, 1))).await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched, Some(created));
        assert_eq!(repo.get_by_id(404).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_the_store() {
        let repo = InMemoryUserRepository::new();
        let clone = repo.clone();

        let created = repo.create(input("a@example.com", date(1990, 1, 1))).await.unwrap();
        assert!(clone.get_by_id(created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_search_is_inclusive_and_ordered() {
        let repo = InMemoryUserRepository::new();
        repo.create(input("late@example.com", date(2000, 12, 31))).await.unwrap();
        repo.create(input("out@example.com", date(2001, 1, 1))).await.unwrap();
        repo.create(input("early@example.com", date(2000, 1, 1))).await.unwrap();

        let found = repo
            .search_by_birth_date(date(2000, 1, 1), date(2000, 12, 31))
            .await
            .unwrap();

        let emails: Vec<&str> = found.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, ["late@example.com", "early@example.com"]);
    }

    #[tokio::test]
    async fn test_replace_and_patch_unknown_id() {
        let repo = InMemoryUserRepository::new();

        let replaced = repo.replace(9, input("a@example.com", date(1990, 1, 1))).await.unwrap();
        let patched = repo.patch(9, PatchUser::default()).await.unwrap();

        assert!(replaced.is_none());
        assert!(patched.is_none());
    }

    #[tokio::test]
    async fn test_replace_keeps_id() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(input("a@example.com", date(1990, 1, 1))).await.unwrap();

        let replaced = repo
            .replace(created.id, input("b@example.com", date(1985, 3, 3)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.email, "b@example.com");
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(replaced));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_returns_false() {
        let repo = InMemoryUserRepository::new();
        assert!(!repo.delete(1).await.unwrap());
    }
}
