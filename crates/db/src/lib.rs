//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! The enrollment and referral ledgers live here: their atomicity
//! requirements are transactional boundaries around the store, so the
//! unit-of-work logic sits next to the entities it serializes.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    Admission, ContentRepository, CourseFilter, CourseRepository, EnrollError, EnrollOutcome,
    EnrollmentRepository, ReferralOutcome, ReferralRepository, UserRepository, VisitError,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
