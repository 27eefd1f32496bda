//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::SubscriptionTier, users};
use lyceum_core::referral::{code_base, code_candidate};
use rust_decimal::Decimal;

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds a user by their referral code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_referral_code(&self, code: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::ReferralCode.eq(code))
            .one(&self.db)
            .await
    }

    /// Checks if a username is already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new user on the free tier with a zero balance and a fresh
    /// referral code.
    ///
    /// The referral code is derived from the username; a numeric suffix is
    /// appended until the code is unused. Once stored it never changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<users::Model, DbErr> {
        let referral_code = self.unused_referral_code(username).await?;
        let now = chrono::Utc::now().into();

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            full_name: Set(full_name.to_string()),
            subscription_tier: Set(SubscriptionTier::Free),
            credit_balance: Set(Decimal::ZERO),
            referral_code: Set(referral_code),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Finds the first unused referral code candidate for a username.
    async fn unused_referral_code(&self, username: &str) -> Result<String, DbErr> {
        let base = code_base(username);
        let mut attempt = 0u32;

        loop {
            let candidate = code_candidate(&base, attempt);
            let taken = users::Entity::find()
                .filter(users::Column::ReferralCode.eq(&candidate))
                .count(&self.db)
                .await?;
            if taken == 0 {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}
