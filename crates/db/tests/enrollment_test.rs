//! Integration tests for the enrollment ledger.
//!
//! These tests require a migrated Postgres database; they skip when
//! `DATABASE_URL` is not set.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use lyceum_db::entities::{
    courses, lessons,
    sea_orm_active_enums::{CourseLevel, LessonContent, SubscriptionTier},
    users,
};
use lyceum_db::{EnrollError, EnrollmentRepository, UserRepository};

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

async fn create_user(db: &DatabaseConnection) -> users::Model {
    UserRepository::new(db.clone())
        .create(
            &format!("student-{}", Uuid::new_v4().simple()),
            "$argon2id$test_hash",
            "Student",
        )
        .await
        .expect("Failed to create user")
}

async fn set_balance(db: &DatabaseConnection, user: &users::Model, balance: Decimal) {
    let mut active: users::ActiveModel = user.clone().into();
    active.credit_balance = Set(balance);
    active.update(db).await.expect("Failed to set balance");
}

async fn make_premium(db: &DatabaseConnection, user: &users::Model) {
    let mut active: users::ActiveModel = user.clone().into();
    active.subscription_tier = Set(SubscriptionTier::Premium);
    active.update(db).await.expect("Failed to set tier");
}

async fn create_course(db: &DatabaseConnection, price: Decimal) -> courses::Model {
    let now = chrono::Utc::now().into();
    courses::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set("Test Course".to_string()),
        description: Set("A course for testing".to_string()),
        instructor: Set(None),
        category_id: Set(None),
        level: Set(CourseLevel::Beginner),
        price: Set(price),
        duration_hours: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create course")
}

async fn add_lesson(db: &DatabaseConnection, course_id: Uuid, order: i32) -> lessons::Model {
    lessons::ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(course_id),
        title: Set(format!("Lesson {order}")),
        content_type: Set(LessonContent::Video),
        description: Set(None),
        video_url: Set(None),
        text_content: Set(None),
        duration_minutes: Set(10),
        order: Set(order),
        is_preview: Set(order == 1),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("Failed to create lesson")
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
async fn test_free_course_enrolls_without_charge() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    let course = create_course(&db, Decimal::ZERO).await;

    let repo = EnrollmentRepository::new(db.clone());
    let outcome = repo.enroll(user.id, course.id).await.expect("enroll");

    assert!(outcome.newly_enrolled());
    assert!(outcome.enrollment().progress.is_zero());
    assert!(!outcome.enrollment().completed);
    assert!(balance_of(&db, user.id).await.is_zero());
}

#[tokio::test]
async fn test_premium_user_enrolls_in_paid_course_without_charge() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    make_premium(&db, &user).await;
    let course = create_course(&db, dec!(49.99)).await;

    let repo = EnrollmentRepository::new(db.clone());
    let outcome = repo.enroll(user.id, course.id).await.expect("enroll");

    assert!(outcome.newly_enrolled());
    assert!(balance_of(&db, user.id).await.is_zero());
}

#[tokio::test]
async fn test_credit_enrollment_debits_exact_price() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    set_balance(&db, &user, dec!(50.00)).await;
    let course = create_course(&db, dec!(29.99)).await;

    let repo = EnrollmentRepository::new(db.clone());
    let outcome = repo.enroll(user.id, course.id).await.expect("enroll");

    assert!(outcome.newly_enrolled());
    assert_eq!(balance_of(&db, user.id).await, dec!(20.01));
}

#[tokio::test]
async fn test_insufficient_credits_reports_shortfall_and_leaves_balance() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    set_balance(&db, &user, dec!(20)).await;
    let course = create_course(&db, dec!(30)).await;

    let repo = EnrollmentRepository::new(db.clone());
    let err = repo
        .enroll(user.id, course.id)
        .await
        .expect_err("enroll should fail");

    assert_eq!(err.shortfall(), Some(dec!(10)));
    assert_eq!(balance_of(&db, user.id).await, dec!(20.00));
    assert!(
        repo.find(user.id, course.id)
            .await
            .expect("query")
            .is_none()
    );
}

#[tokio::test]
async fn test_enroll_is_idempotent_and_never_double_debits() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    set_balance(&db, &user, dec!(100)).await;
    let course = create_course(&db, dec!(40)).await;

    let repo = EnrollmentRepository::new(db.clone());
    let first = repo.enroll(user.id, course.id).await.expect("enroll");
    let second = repo.enroll(user.id, course.id).await.expect("re-enroll");

    assert!(first.newly_enrolled());
    assert!(!second.newly_enrolled());
    assert_eq!(first.enrollment().id, second.enrollment().id);
    assert_eq!(balance_of(&db, user.id).await, dec!(60.00));
}

#[tokio::test]
async fn test_inactive_course_is_not_found() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    let course = create_course(&db, Decimal::ZERO).await;

    let mut active: courses::ActiveModel = course.clone().into();
    active.is_active = Set(false);
    active.update(&db).await.expect("deactivate");

    let repo = EnrollmentRepository::new(db.clone());
    let err = repo
        .enroll(user.id, course.id)
        .await
        .expect_err("enroll should fail");
    assert!(matches!(err, EnrollError::CourseNotFound(_)));
}

#[tokio::test]
async fn test_visit_progress_scenario() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    let course = create_course(&db, Decimal::ZERO).await;
    let mut lesson_ids = Vec::new();
    for order in 1..=4 {
        lesson_ids.push(add_lesson(&db, course.id, order).await.id);
    }

    let repo = EnrollmentRepository::new(db.clone());

    // Second of four lessons: 50%, not completed.
    let mid = repo
        .record_lesson_visit(user.id, course.id, lesson_ids[1])
        .await
        .expect("visit");
    assert_eq!(mid.progress, dec!(50));
    assert!(!mid.completed);

    // Fourth of four: 100%, completed.
    let done = repo
        .record_lesson_visit(user.id, course.id, lesson_ids[3])
        .await
        .expect("visit");
    assert_eq!(done.progress, dec!(100));
    assert!(done.completed);
}

#[tokio::test]
async fn test_visit_implicitly_enrolls() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    let course = create_course(&db, Decimal::ZERO).await;
    let lesson = add_lesson(&db, course.id, 1).await;

    let repo = EnrollmentRepository::new(db.clone());
    assert!(
        repo.find(user.id, course.id)
            .await
            .expect("query")
            .is_none()
    );

    repo.record_lesson_visit(user.id, course.id, lesson.id)
        .await
        .expect("visit");

    assert!(
        repo.find(user.id, course.id)
            .await
            .expect("query")
            .is_some()
    );
}

#[tokio::test]
async fn test_revisiting_earlier_lesson_lowers_progress() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    let course = create_course(&db, Decimal::ZERO).await;
    let mut lesson_ids = Vec::new();
    for order in 1..=4 {
        lesson_ids.push(add_lesson(&db, course.id, order).await.id);
    }

    let repo = EnrollmentRepository::new(db.clone());
    repo.record_lesson_visit(user.id, course.id, lesson_ids[3])
        .await
        .expect("visit");

    // Default policy recomputes from the visited rank.
    let back = repo
        .record_lesson_visit(user.id, course.id, lesson_ids[0])
        .await
        .expect("visit");
    assert_eq!(back.progress, dec!(25));
    assert!(!back.completed);
}

#[tokio::test]
async fn test_visit_rejects_foreign_lesson() {
    let Some(db) = try_connect().await else { return };
    let user = create_user(&db).await;
    let course = create_course(&db, Decimal::ZERO).await;
    add_lesson(&db, course.id, 1).await;
    let other_course = create_course(&db, Decimal::ZERO).await;
    let foreign = add_lesson(&db, other_course.id, 1).await;

    let repo = EnrollmentRepository::new(db.clone());
    let err = repo
        .record_lesson_visit(user.id, course.id, foreign.id)
        .await
        .expect_err("visit should fail");
    assert!(matches!(
        err,
        lyceum_db::VisitError::LessonNotInCourse { .. }
    ));
}
