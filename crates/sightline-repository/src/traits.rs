//! Repository trait definitions.

use async_trait::async_trait;
use sightline_core::{Interface, NewUser, SightlineResult, User, UserChanges, UserId};

/// User repository trait.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Inserts a new user. A duplicate email fails with `Conflict`.
    async fn create(&self, user: &NewUser) -> SightlineResult<User>;

    /// Lists users ordered by id, skipping `skip` rows and returning at most `limit`.
    async fn find_all(&self, skip: i64, limit: i64) -> SightlineResult<Vec<User>>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> SightlineResult<Option<User>>;

    /// Applies a partial update. Returns `None` when the user does not exist.
    async fn update(&self, id: UserId, changes: &UserChanges) -> SightlineResult<Option<User>>;

    /// Deletes a user by ID. Returns whether a row was removed.
    async fn delete(&self, id: UserId) -> SightlineResult<bool>;
}
