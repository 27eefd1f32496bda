//! Integration tests for the referral ledger.
//!
//! These tests require a migrated Postgres database; they skip when
//! `DATABASE_URL` is not set.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use lyceum_core::referral::{REFERRED_BONUS, REFERRER_CREDIT};
use lyceum_db::{ReferralOutcome, ReferralRepository, UserRepository};

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

async fn create_user(db: &DatabaseConnection, prefix: &str) -> lyceum_db::entities::users::Model {
    UserRepository::new(db.clone())
        .create(
            &format!("{prefix}-{}", Uuid::new_v4().simple()),
            "$argon2id$test_hash",
            prefix,
        )
        .await
        .expect("Failed to create user")
}

async fn balance_of(db: &DatabaseConnection, user_id: Uuid) -> Decimal {
    UserRepository::new(db.clone())
        .find_by_id(user_id)
        .await
        .expect("query")
        .expect("user exists")
        .credit_balance
}

#[tokio::test]
async fn test_valid_code_grants_both_parties() {
    let Some(db) = try_connect().await else { return };
    let referrer = create_user(&db, "alice").await;
    let referred = create_user(&db, "bob").await;

    let repo = ReferralRepository::new(db.clone());
    let outcome = repo
        .apply(referred.id, Some(&referrer.referral_code))
        .await
        .expect("apply");

    let ReferralOutcome::Applied(referral) = outcome else {
        panic!("expected referral to apply");
    };
    assert_eq!(referral.referrer_id, referrer.id);
    assert_eq!(referral.referred_user_id, referred.id);
    assert_eq!(referral.credit_amount, REFERRER_CREDIT);

    // Both balances started at zero; exactly one grant each.
    assert_eq!(balance_of(&db, referrer.id).await, REFERRER_CREDIT);
    assert_eq!(balance_of(&db, referred.id).await, REFERRED_BONUS);
}

#[tokio::test]
async fn test_invalid_code_is_nonfatal() {
    let Some(db) = try_connect().await else { return };
    let referred = create_user(&db, "stray").await;

    let repo = ReferralRepository::new(db.clone());
    let outcome = repo
        .apply(referred.id, Some("zzz-no-such-code"))
        .await
        .expect("apply");

    assert!(matches!(outcome, ReferralOutcome::InvalidCode));
    assert!(balance_of(&db, referred.id).await.is_zero());
    assert!(
        repo.list_made_by(referred.id)
            .await
            .expect("query")
            .is_empty()
    );
}

#[tokio::test]
async fn test_missing_code_is_not_attempted() {
    let Some(db) = try_connect().await else { return };
    let referred = create_user(&db, "plain").await;

    let repo = ReferralRepository::new(db.clone());
    let none = repo.apply(referred.id, None).await.expect("apply");
    let blank = repo.apply(referred.id, Some("   ")).await.expect("apply");

    assert!(matches!(none, ReferralOutcome::NotAttempted));
    assert!(matches!(blank, ReferralOutcome::NotAttempted));
    assert!(balance_of(&db, referred.id).await.is_zero());
}

#[tokio::test]
async fn test_second_referral_is_silent_noop() {
    let Some(db) = try_connect().await else { return };
    let first_referrer = create_user(&db, "first").await;
    let second_referrer = create_user(&db, "second").await;
    let referred = create_user(&db, "target").await;

    let repo = ReferralRepository::new(db.clone());
    repo.apply(referred.id, Some(&first_referrer.referral_code))
        .await
        .expect("apply");
    let repeat = repo
        .apply(referred.id, Some(&second_referrer.referral_code))
        .await
        .expect("apply");

    assert!(matches!(repeat, ReferralOutcome::AlreadyReferred));
    // Only the first referral's grants stand.
    assert_eq!(balance_of(&db, referred.id).await, REFERRED_BONUS);
    assert!(balance_of(&db, second_referrer.id).await.is_zero());
    assert_eq!(
        repo.list_made_by(first_referrer.id)
            .await
            .expect("query")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_grants_are_additive_to_existing_balance() {
    let Some(db) = try_connect().await else { return };
    let referrer = create_user(&db, "serial").await;
    let first = create_user(&db, "one").await;
    let second = create_user(&db, "two").await;

    let repo = ReferralRepository::new(db.clone());
    repo.apply(first.id, Some(&referrer.referral_code))
        .await
        .expect("apply");
    repo.apply(second.id, Some(&referrer.referral_code))
        .await
        .expect("apply");

    assert_eq!(
        balance_of(&db, referrer.id).await,
        REFERRER_CREDIT + REFERRER_CREDIT
    );
    assert_eq!(repo.total_earned(referrer.id).await.expect("sum"), dec!(100.00));
}
