//! User service implementation.

use crate::dto::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserResponse};
use crate::user_service::UserService;
use async_trait::async_trait;
use shaku::Component;
use sightline_core::{SightlineError, SightlineResult, UserId, ValidateExt};
use sightline_repository::UserRepository;
use std::sync::Arc;
use tracing::{debug, info};

const DUPLICATE_EMAIL: &str = "User with this email already exists.";

/// Replaces the storage-level uniqueness message with one fit for clients.
fn duplicate_email(err: SightlineError) -> SightlineError {
    match err {
        SightlineError::Conflict(detail) => {
            debug!("Rejected duplicate email: {}", detail);
            SightlineError::conflict(DUPLICATE_EMAIL)
        }
        other => other,
    }
}

/// Concrete user service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
}

impl UserServiceComponent {
    /// Creates a service over `user_repository`.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }
}

#[async_trait]
impl UserService for UserServiceComponent {
    async fn create_user(&self, request: CreateUserRequest) -> SightlineResult<UserResponse> {
        debug!("Creating user: {}", request.email);

        request.validate_request()?;

        let user = self
            .user_repository
            .create(&request.into())
            .await
            .map_err(duplicate_email)?;

        info!("User created: {}", user.id);
        Ok(UserResponse::from(user))
    }

    async fn list_users(&self, query: ListUsersQuery) -> SightlineResult<Vec<UserResponse>> {
        debug!("Listing users, skip: {}, limit: {}", query.skip, query.limit);

        query.validate_request()?;

        let users = self.user_repository.find_all(query.skip, query.limit).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn get_user(&self, id: UserId) -> SightlineResult<UserResponse> {
        debug!("Getting user: {}", id);

        let user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| SightlineError::not_found("User", id))?;

        Ok(UserResponse::from(user))
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> SightlineResult<UserResponse> {
        debug!("Updating user: {}", id);

        request.validate_request()?;

        let user = self
            .user_repository
            .update(id, &request.into())
            .await
            .map_err(duplicate_email)?
            .ok_or_else(|| SightlineError::not_found("User", id))?;

        info!("User updated: {}", id);
        Ok(UserResponse::from(user))
    }

    async fn delete_user(&self, id: UserId) -> SightlineResult<()> {
        debug!("Deleting user: {}", id);

        if !self.user_repository.delete(id).await? {
            return Err(SightlineError::not_found("User", id));
        }

        info!("User deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_repository::memory::InMemoryUserRepository;

    fn service() -> UserServiceComponent {
        UserServiceComponent::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn create_request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            full_name: Some("Ada Lovelace".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let service = service();

        let created = service.create_user(create_request("ada@example.com")).await.unwrap();
        assert!(created.is_active);

        let fetched = service.get_user(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_email() {
        let err = service().create_user(create_request("nope")).await.unwrap_err();
        assert!(matches!(err, SightlineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let service = service();
        service.create_user(create_request("ada@example.com")).await.unwrap();

        let err = service.create_user(create_request("ada@example.com")).await.unwrap_err();
        match err {
            SightlineError::Conflict(message) => assert_eq!(message, DUPLICATE_EMAIL),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_not_found() {
        let err = service().get_user(UserId(99)).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_list_users_paginates() {
        let service = service();
        for i in 0..3 {
            service
                .create_user(create_request(&format!("user{i}@example.com")))
                .await
                .unwrap();
        }

        let page = service.list_users(ListUsersQuery { skip: 1, limit: 1 }).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].email, "user1@example.com");

        let all = service.list_users(ListUsersQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let service = service();
        let created = service.create_user(create_request("ada@example.com")).await.unwrap();

        let updated = service
            .update_user(
                created.id,
                UpdateUserRequest {
                    is_active: Some(false),
                    ..UpdateUserRequest::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.email, "ada@example.com");
        assert_eq!(updated.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let err = service()
            .update_user(UserId(5), UpdateUserRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SightlineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = service();
        let created = service.create_user(create_request("ada@example.com")).await.unwrap();

        service.delete_user(created.id).await.unwrap();

        let err = service.delete_user(created.id).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
