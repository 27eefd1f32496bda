//! Referral ledger repository.
//!
//! A referral is created once, transactionally with its two credit grants:
//! the referral row insert and both balance updates are a single atomic
//! unit — partial application is a consistency violation. The uniqueness
//! constraint on `referred_user_id` is the serialization point for
//! concurrent signups.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait, sea_query::Expr,
};
use tracing::warn;
use uuid::Uuid;

use crate::entities::{referrals, users};
use lyceum_core::referral::{REFERRED_BONUS, REFERRER_CREDIT};

/// Outcome of applying a referral code at signup.
///
/// None of these block signup: an invalid code is a warning, a repeat
/// referral a silent no-op.
#[derive(Debug, Clone)]
pub enum ReferralOutcome {
    /// No code was supplied.
    NotAttempted,
    /// The code matched no user (or the user referred themselves).
    InvalidCode,
    /// The user has already been referred; nothing was granted.
    AlreadyReferred,
    /// The referral was recorded and both grants applied.
    Applied(referrals::Model),
}

impl ReferralOutcome {
    /// True if a referral record was created by this call.
    #[must_use]
    pub const fn applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Referral ledger repository.
#[derive(Debug, Clone)]
pub struct ReferralRepository {
    db: DatabaseConnection,
}

impl ReferralRepository {
    /// Creates a new referral repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a referral code on behalf of a newly signed-up user.
    ///
    /// Looks up the referrer by code; if found and the new user has not been
    /// referred before, one transaction inserts the referral record, grants
    /// the referrer [`REFERRER_CREDIT`] and the new user [`REFERRED_BONUS`].
    /// Every failure mode is a non-fatal outcome: signup proceeds either way.
    ///
    /// # Errors
    ///
    /// Returns an error only if the database itself fails.
    pub async fn apply(
        &self,
        new_user_id: Uuid,
        code: Option<&str>,
    ) -> Result<ReferralOutcome, DbErr> {
        let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(ReferralOutcome::NotAttempted);
        };

        let Some(referrer) = users::Entity::find()
            .filter(users::Column::ReferralCode.eq(code))
            .one(&self.db)
            .await?
        else {
            warn!(code = %code, "Invalid referral code at signup");
            return Ok(ReferralOutcome::InvalidCode);
        };

        if referrer.id == new_user_id {
            warn!(user_id = %new_user_id, "Self-referral rejected");
            return Ok(ReferralOutcome::InvalidCode);
        }

        let txn = self.db.begin().await?;

        // The insert goes first: its unique referred_user_id constraint
        // serializes concurrent attempts before any balance is touched.
        let now = chrono::Utc::now().into();
        let referral = referrals::ActiveModel {
            id: Set(Uuid::new_v4()),
            referrer_id: Set(referrer.id),
            referred_user_id: Set(new_user_id),
            credit_amount: Set(REFERRER_CREDIT),
            created_at: Set(now),
        };

        let referral = match referral.insert(&txn).await {
            Ok(model) => model,
            Err(e) if is_unique_violation(&e) => {
                txn.rollback().await?;
                return Ok(ReferralOutcome::AlreadyReferred);
            }
            Err(e) => return Err(e),
        };

        grant_credits(&txn, referrer.id, REFERRER_CREDIT).await?;
        grant_credits(&txn, new_user_id, REFERRED_BONUS).await?;

        txn.commit().await?;
        Ok(ReferralOutcome::Applied(referral))
    }

    /// Lists referrals made by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_made_by(&self, referrer_id: Uuid) -> Result<Vec<referrals::Model>, DbErr> {
        referrals::Entity::find()
            .filter(referrals::Column::ReferrerId.eq(referrer_id))
            .order_by_desc(referrals::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Total credits a user has earned from referrals made.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn total_earned(&self, referrer_id: Uuid) -> Result<Decimal, DbErr> {
        let referrals = self.list_made_by(referrer_id).await?;
        Ok(referrals.iter().map(|r| r.credit_amount).sum())
    }
}

/// Adds `amount` to a user's balance within the given transaction.
async fn grant_credits(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    amount: Decimal,
) -> Result<(), DbErr> {
    users::Entity::update_many()
        .col_expr(
            users::Column::CreditBalance,
            Expr::col(users::Column::CreditBalance).add(amount),
        )
        .col_expr(users::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(users::Column::Id.eq(user_id))
        .exec(txn)
        .await?;

    Ok(())
}

/// True if the error is a uniqueness-constraint violation.
fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
