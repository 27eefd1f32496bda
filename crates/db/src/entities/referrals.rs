//! `SeaORM` Entity for the referrals table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "referrals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub referrer_id: Uuid,
    /// Unique across all referrals: a user is referred at most once.
    pub referred_user_id: Uuid,
    /// Credits granted to the referrer. Immutable after insert.
    pub credit_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReferrerId",
        to = "super::users::Column::Id"
    )]
    Referrer,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReferredUserId",
        to = "super::users::Column::Id"
    )]
    ReferredUser,
}

impl ActiveModelBehavior for ActiveModel {}
