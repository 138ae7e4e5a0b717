//! Postgres user repository implementation.

use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use shaku::Component;
use sightline_core::{
    monitored, ErrorReporter, NewUser, Operation, SightlineResult, User, UserChanges, UserId,
};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// Postgres user repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct PostgresUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,

    #[shaku(inject)]
    reporter: Arc<dyn ErrorReporter>,
}

impl PostgresUserRepository {
    /// Creates a new Postgres user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self { pool, reporter }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    full_name: Option<String>,
    is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            email: row.email,
            full_name: row.full_name,
            is_active: row.is_active,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &NewUser) -> SightlineResult<User> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("DB: INSERT users"),
            async {
                let row = sqlx::query_as::<_, UserRow>(
                    r#"
                    INSERT INTO users (email, full_name)
                    VALUES ($1, $2)
                    RETURNING id, email, full_name, is_active
                    "#,
                )
                .bind(&user.email)
                .bind(&user.full_name)
                .fetch_one(self.pool.inner()?)
                .await?;

                debug!("Created user with id: {}", row.id);
                Ok(row.into())
            },
        )
        .await
    }

    async fn find_all(&self, skip: i64, limit: i64) -> SightlineResult<Vec<User>> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("DB: SELECT users").with_args(format!("skip={skip} limit={limit}")),
            async {
                let rows = sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT id, email, full_name, is_active
                    FROM users
                    ORDER BY id
                    OFFSET $1
                    LIMIT $2
                    "#,
                )
                .bind(skip)
                .bind(limit)
                .fetch_all(self.pool.inner()?)
                .await?;

                Ok(rows.into_iter().map(User::from).collect())
            },
        )
        .await
    }

    async fn find_by_id(&self, id: UserId) -> SightlineResult<Option<User>> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("DB: SELECT users by id").with_args(format!("id={id}")),
            async {
                let row = sqlx::query_as::<_, UserRow>(
                    "SELECT id, email, full_name, is_active FROM users WHERE id = $1",
                )
                .bind(id.into_inner())
                .fetch_optional(self.pool.inner()?)
                .await?;

                Ok(row.map(User::from))
            },
        )
        .await
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> SightlineResult<Option<User>> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        monitored(
            self.reporter.as_ref(),
            Operation::new("DB: UPDATE users").with_args(format!("id={id}")),
            async {
                let row = sqlx::query_as::<_, UserRow>(
                    r#"
                    UPDATE users
                    SET email = COALESCE($2, email),
                        full_name = COALESCE($3, full_name),
                        is_active = COALESCE($4, is_active)
                    WHERE id = $1
                    RETURNING id, email, full_name, is_active
                    "#,
                )
                .bind(id.into_inner())
                .bind(&changes.email)
                .bind(&changes.full_name)
                .bind(changes.is_active)
                .fetch_optional(self.pool.inner()?)
                .await?;

                Ok(row.map(User::from))
            },
        )
        .await
    }

    async fn delete(&self, id: UserId) -> SightlineResult<bool> {
        monitored(
            self.reporter.as_ref(),
            Operation::new("DB: DELETE users").with_args(format!("id={id}")),
            async {
                let result = sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(id.into_inner())
                    .execute(self.pool.inner()?)
                    .await?;

                Ok(result.rows_affected() > 0)
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DatabasePool;
    use sightline_core::testing::RecordingReporter;
    use sightline_core::SightlineError;

    fn repository() -> (PostgresUserRepository, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::default());
        let repo = PostgresUserRepository::new(Arc::new(DatabasePool::default()), reporter.clone());
        (repo, reporter)
    }

    #[tokio::test]
    async fn test_find_by_id_failure_is_reported() {
        let (repo, reporter) = repository();

        let err = repo.find_by_id(UserId(7)).await.unwrap_err();
        assert!(matches!(err, SightlineError::Database(_)));

        let reports = reporter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].operation, "DB: SELECT users by id");
        assert_eq!(reports[0].error_code, "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_empty_update_reads_through_find_by_id() {
        let (repo, reporter) = repository();

        assert!(repo.update(UserId(7), &UserChanges::default()).await.is_err());

        let operations: Vec<String> = reporter.reports().into_iter().map(|r| r.operation).collect();
        assert_eq!(operations, vec!["DB: SELECT users by id".to_string()]);
    }
}
