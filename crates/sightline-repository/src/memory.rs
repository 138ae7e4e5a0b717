//! In-memory repository for tests of the layers above.

use crate::UserRepository;
use async_trait::async_trait;
use sightline_core::{NewUser, SightlineError, SightlineResult, User, UserChanges, UserId};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory user repository with the same uniqueness rules as the table.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> SightlineResult<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| SightlineError::internal("user store lock poisoned"))
    }
}

fn duplicate_email() -> SightlineError {
    SightlineError::conflict("duplicate key value violates unique constraint \"ix_users_email\"")
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> SightlineResult<User> {
        let mut state = self.lock()?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(duplicate_email());
        }
        state.next_id += 1;
        let created = User {
            id: UserId(state.next_id),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: true,
        };
        state.users.insert(created.id.into_inner(), created.clone());
        Ok(created)
    }

    async fn find_all(&self, skip: i64, limit: i64) -> SightlineResult<Vec<User>> {
        let state = self.lock()?;
        let skip = usize::try_from(skip.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(state.users.values().skip(skip).take(limit).cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> SightlineResult<Option<User>> {
        Ok(self.lock()?.users.get(&id.into_inner()).cloned())
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> SightlineResult<Option<User>> {
        let mut state = self.lock()?;
        if let Some(email) = &changes.email {
            if state.users.values().any(|u| &u.email == email && u.id != id) {
                return Err(duplicate_email());
            }
        }
        Ok(state.users.get_mut(&id.into_inner()).map(|user| {
            changes.apply_to(user);
            user.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> SightlineResult<bool> {
        Ok(self.lock()?.users.remove(&id.into_inner()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            full_name: Some("Test User".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();
        let first = repo.create(&new_user("a@example.com")).await.unwrap();
        let second = repo.create(&new_user("b@example.com")).await.unwrap();

        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
        assert!(first.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.create(&new_user("a@example.com")).await.unwrap();

        let err = repo.create(&new_user("a@example.com")).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_find_all_skip_and_limit() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5 {
            repo.create(&new_user(&format!("u{i}@example.com"))).await.unwrap();
        }

        let page = repo.find_all(1, 2).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|u| u.id.into_inner()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(repo.find_all(10, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(&new_user("a@example.com")).await.unwrap();

        let changes = UserChanges {
            is_active: Some(false),
            ..UserChanges::default()
        };
        let updated = repo.update(user.id, &changes).await.unwrap().unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.email, "a@example.com");

        assert!(repo.update(UserId(99), &changes).await.unwrap().is_none());
        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
    }
}
