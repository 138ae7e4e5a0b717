//! Integration tests for PostgresUserRepository.
//!
//! These tests run against a real Postgres database using testcontainers.
//! Run with `cargo test -- --ignored` on a machine with Docker.

mod common;

use common::TestDatabase;
use sightline_core::{NewUser, SightlineError, UserChanges, UserId};
use sightline_repository::UserRepository;

fn new_user(email: &str, full_name: Option<&str>) -> NewUser {
    NewUser {
        email: email.to_string(),
        full_name: full_name.map(str::to_string),
    }
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_create_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = db.user_repository();

    let created = repo
        .create(&new_user("ada@example.com", Some("Ada Lovelace")))
        .await
        .expect("Failed to create user");
    assert!(created.is_active);

    let found = repo
        .find_by_id(created.id)
        .await
        .expect("Query failed")
        .expect("User not found");
    assert_eq!(found, created);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = db.user_repository();

    assert!(repo.find_by_id(UserId(424_242)).await.expect("Query failed").is_none());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_duplicate_email_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = db.user_repository();

    repo.create(&new_user("dup@example.com", None)).await.expect("first insert");
    let err = repo
        .create(&new_user("dup@example.com", None))
        .await
        .expect_err("second insert must fail");
    assert!(matches!(err, SightlineError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_find_all_pagination() {
    let db = TestDatabase::new().await;
    let repo = db.user_repository();

    for i in 0..5 {
        repo.create(&new_user(&format!("user{i}@example.com"), None))
            .await
            .expect("insert");
    }

    let page = repo.find_all(2, 2).await.expect("Query failed");
    let emails: Vec<_> = page.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["user2@example.com", "user3@example.com"]);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_partial_update_keeps_other_columns() {
    let db = TestDatabase::new().await;
    let repo = db.user_repository();

    let user = repo
        .create(&new_user("grace@example.com", Some("Grace")))
        .await
        .expect("insert");

    let changes = UserChanges {
        is_active: Some(false),
        ..UserChanges::default()
    };
    let updated = repo
        .update(user.id, &changes)
        .await
        .expect("update")
        .expect("user exists");

    assert!(!updated.is_active);
    assert_eq!(updated.email, "grace@example.com");
    assert_eq!(updated.full_name.as_deref(), Some("Grace"));

    assert!(repo.update(UserId(424_242), &changes).await.expect("update").is_none());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_delete() {
    let db = TestDatabase::new().await;
    let repo = db.user_repository();

    let user = repo.create(&new_user("gone@example.com", None)).await.expect("insert");
    assert!(repo.delete(user.id).await.expect("delete"));
    assert!(!repo.delete(user.id).await.expect("delete"));
    assert!(repo.find_by_id(user.id).await.expect("Query failed").is_none());
}
