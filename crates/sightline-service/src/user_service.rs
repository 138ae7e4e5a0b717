//! User service trait definition.

use crate::dto::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserResponse};
use async_trait::async_trait;
use sightline_core::{Interface, SightlineResult, UserId};

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Creates a new user.
    async fn create_user(&self, request: CreateUserRequest) -> SightlineResult<UserResponse>;

    /// Lists users in id order.
    async fn list_users(&self, query: ListUsersQuery) -> SightlineResult<Vec<UserResponse>>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> SightlineResult<UserResponse>;

    /// Applies a partial update.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> SightlineResult<UserResponse>;

    /// Deletes a user.
    async fn delete_user(&self, id: UserId) -> SightlineResult<()>;
}
