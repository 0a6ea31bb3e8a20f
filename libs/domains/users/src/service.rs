use chrono::NaiveDate;
use std::sync::Arc;

use crate::config::UserConfig;
use crate::error::{UserError, UserResult};
use crate::models::{PatchUser, User, UserInput};
use crate::repository::UserRepository;
use crate::validation::{check_date_range, check_min_age, today};

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    config: UserConfig,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, config: UserConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            config,
        }
    }

    /// Create a new user after checking the minimum age
    pub async fn create_user(&self, input: UserInput) -> UserResult<User> {
        tracing::info!(email = %input.email, "Creating user");
        self.ensure_min_age(input.birth_date)?;

        let user = self.repository.create(input).await?;
        tracing::debug!(?user, "User created");
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: u64) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// List all users
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    /// Replace every field of a user (PUT)
    pub async fn update_user(&self, id: u64, input: UserInput) -> UserResult<User> {
        tracing::info!(user_id = id, "Replacing user");
        self.ensure_min_age(input.birth_date)?;

        let user = self
            .repository
            .replace(id, input)
            .await?
            .ok_or(UserError::NotFound(id))?;

        tracing::debug!(?user, "User replaced");
        Ok(user)
    }

    /// Update only the fields present in the request (PATCH)
    pub async fn patch_user(&self, id: u64, patch: PatchUser) -> UserResult<User> {
        tracing::info!(user_id = id, "Patching user");
        if let Some(birth_date) = patch.birth_date {
            self.ensure_min_age(birth_date)?;
        }

        let user = self
            .repository
            .patch(id, patch)
            .await?
            .ok_or(UserError::NotFound(id))?;

        tracing::debug!(?user, "User patched");
        Ok(user)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: u64) -> UserResult<()> {
        tracing::info!(user_id = id, "Deleting user");
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            tracing::warn!(user_id = id, "User not found for deletion");
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }

    /// Users born between `from` and `to`, both inclusive
    pub async fn search_by_birth_date(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> UserResult<Vec<User>> {
        tracing::info!(%from, %to, "Searching users by birth date range");
        check_date_range(from, to).inspect_err(|e| tracing::warn!(%from, %to, "{}", e))?;

        let users = self.repository.search_by_birth_date(from, to).await?;
        tracing::debug!(count = users.len(), "Users found");
        Ok(users)
    }

    fn ensure_min_age(&self, birth_date: NaiveDate) -> UserResult<()> {
        check_min_age(birth_date, self.config.min_age, today())
            .inspect_err(|e| tracing::warn!(%birth_date, "{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};
    use chrono::{Days, Months};
    use mockall::predicate::eq;

    fn years_ago(years: u32) -> NaiveDate {
        today().checked_sub_months(Months::new(years * 12)).unwrap()
    }

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

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(InMemoryUserRepository::new(), UserConfig::default())
    }

    #[tokio::test]
    async fn test_create_user_returns_user_with_id() {
        let service = service();
        let request = input("test5@example.com", years_ago(20));

        let created = service.create_user(request.clone()).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.email, request.email);
        assert_eq!(created.birth_date, request.birth_date);
        assert_eq!(created.phone_number, request.phone_number);
    }

    #[tokio::test]
    async fn test_create_user_under_age_never_reaches_repository() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo, UserConfig::default());
        let birth_date = years_ago(18).checked_add_days(Days::new(1)).unwrap();

        let err = service
            .create_user(input("kid@example.com", birth_date))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UnderAge { min_age: 18 }));
    }

    #[tokio::test]
    async fn test_create_user_at_exact_min_age() {
        let created = service()
            .create_user(input("adult@example.com", years_ago(18)))
            .await;
        assert!(created.is_ok());
    }

    #[tokio::test]
    async fn test_min_age_comes_from_config() {
        let service = UserService::new(InMemoryUserRepository::new(), UserConfig::new(21));

        let err = service
            .create_user(input("young@example.com", years_ago(20)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User must be at least 21 years old");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(7))
            .returning(|_| Ok(None));

        let service = UserService::new(mock_repo, UserConfig::default());
        let err = service.get_user(7).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_patch_user_updates_only_present_fields() {
        let service = service();
        let created = service
            .create_user(input("test3@example.com", years_ago(30)))
            .await
            .unwrap();

        let new_birth_date = years_ago(25);
        let patched = service
            .patch_user(
                created.id,
                PatchUser {
                    birth_date: Some(new_birth_date),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.birth_date, new_birth_date);
        assert_eq!(patched.email, created.email);
        assert_eq!(patched.phone_number, created.phone_number);
    }

    #[tokio::test]
    async fn test_patch_user_rejects_under_age_birth_date() {
        let service = service();
        let created = service
            .create_user(input("test3@example.com", years_ago(30)))
            .await
            .unwrap();

        let err = service
            .patch_user(
                created.id,
                PatchUser {
                    birth_date: Some(years_ago(10)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UnderAge { .. }));

        let unchanged = service.get_user(created.id).await.unwrap();
        assert_eq!(unchanged.birth_date, created.birth_date);
    }

    #[tokio::test]
    async fn test_patch_unknown_user_is_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_patch()
            .withf(|id, _| *id == 42)
            .returning(|_, _| Ok(None));

        let service = UserService::new(mock_repo, UserConfig::default());
        let err = service
            .patch_user(42, PatchUser::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_update_user_replaces_all_fields() {
        let service = service();
        let mut original = input("test3@example.com", years_ago(30));
        original.address = Some("Old street 1".to_string());
        let created = service.create_user(original).await.unwrap();

        let replacement = input("test5@example.com", years_ago(20));
        let updated = service
            .update_user(created.id, replacement.clone())
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.email, replacement.email);
        assert_eq!(updated.birth_date, replacement.birth_date);
        assert_eq!(updated.address, None);
    }

    #[tokio::test]
    async fn test_update_user_rejects_under_age_birth_date() {
        let service = service();
        let created = service
            .create_user(input("test3@example.com", years_ago(30)))
            .await
            .unwrap();

        let err = service
            .update_user(created.id, input("test3@example.com", years_ago(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UnderAge { min_age: 18 }));

        let unchanged = service.get_user(created.id).await.unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_update_user_under_age_never_reaches_repository() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_replace().never();

        let service = UserService::new(mock_repo, UserConfig::default());
        let err = service
            .update_user(1, input("kid@example.com", years_ago(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UnderAge { .. }));
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let err = service()
            .update_user(99, input("x@example.com", years_ago(30)))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::NotFound(99)));
    }

    #[tokio::test]
    async fn test_deleted_user_can_no_longer_be_updated() {
        let service = service();
        let created = service
            .create_user(input("test5@example.com", years_ago(20)))
            .await
            .unwrap();

        service.delete_user(created.id).await.unwrap();

        let err = service
            .patch_user(created.id, PatchUser::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_unknown_user_is_not_found() {
        let err = service().delete_user(1).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(1)));
    }

    #[tokio::test]
    async fn test_search_returns_users_within_range() {
        let service = service();
        service
            .create_user(input("test1@example.com", years_ago(20)))
            .await
            .unwrap();
        service
            .create_user(input("test2@example.com", years_ago(25)))
            .await
            .unwrap();

        let users = service
            .search_by_birth_date(years_ago(22), years_ago(18))
            .await
            .unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "test1@example.com");
    }

    #[tokio::test]
    async fn test_search_rejects_inverted_range_before_querying() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_search_by_birth_date().never();

        let service = UserService::new(mock_repo, UserConfig::default());
        let err = service
            .search_by_birth_date(years_ago(18), years_ago(22))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidDateRange { .. }));
    }
}
