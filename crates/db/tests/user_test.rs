//! Integration tests for the user repository.
//!
//! These tests require a migrated Postgres database; they skip when
//! `DATABASE_URL` is not set.

use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;
use lyceum_db::UserRepository;

/// Connects to the test database, or returns `None` to skip.
async fn try_connect() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping: DATABASE_URL not set");
        return None;
    };
    Some(
        Database::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

fn unique_username(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

#[tokio::test]
async fn test_user_create_and_find() {
    let Some(db) = try_connect().await else { return };

    let repo = UserRepository::new(db);
    let username = unique_username("finder");

    let user = repo
        .create(&username, "$argon2id$test_hash", "Test User")
        .await
        .expect("Failed to create user");

    assert_eq!(user.username, username);
    assert!(user.is_active);
    assert!(user.credit_balance.is_zero());

    let found = repo
        .find_by_id(user.id)
        .await
        .expect("Failed to find user")
        .expect("User should exist");

    assert_eq!(found.id, user.id);
    assert_eq!(found.referral_code, user.referral_code);
}

#[tokio::test]
async fn test_referral_code_derived_from_username() {
    let Some(db) = try_connect().await else { return };

    let repo = UserRepository::new(db);
    let username = unique_username("Carol Danvers");

    let user = repo
        .create(&username, "$argon2id$test_hash", "Carol Danvers")
        .await
        .expect("Failed to create user");

    // Lowercased, spaces stripped, truncated to eight characters.
    assert!(user.referral_code.starts_with("caroldan"));
}

#[tokio::test]
async fn test_referral_codes_are_unique_per_user() {
    let Some(db) = try_connect().await else { return };

    let repo = UserRepository::new(db);
    // Same first-eight-characters base for both users.
    let first = repo
        .create(
            &unique_username("samename"),
            "$argon2id$test_hash",
            "First",
        )
        .await
        .expect("Failed to create first user");
    let second = repo
        .create(
            &unique_username("samename"),
            "$argon2id$test_hash",
            "Second",
        )
        .await
        .expect("Failed to create second user");

    assert_ne!(first.referral_code, second.referral_code);
}

#[tokio::test]
async fn test_find_by_referral_code() {
    let Some(db) = try_connect().await else { return };

    let repo = UserRepository::new(db);
    let user = repo
        .create(&unique_username("sharer"), "$argon2id$test_hash", "Sharer")
        .await
        .expect("Failed to create user");

    let found = repo
        .find_by_referral_code(&user.referral_code)
        .await
        .expect("Query should succeed")
        .expect("Referral code should resolve");
    assert_eq!(found.id, user.id);

    let missing = repo
        .find_by_referral_code("zzz-no-such-code")
        .await
        .expect("Query should succeed");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_username_exists() {
    let Some(db) = try_connect().await else { return };

    let repo = UserRepository::new(db);
    let username = unique_username("taken");

    assert!(!repo.username_exists(&username).await.expect("query"));

    repo.create(&username, "$argon2id$test_hash", "Taken")
        .await
        .expect("Failed to create user");

    assert!(repo.username_exists(&username).await.expect("query"));
}
