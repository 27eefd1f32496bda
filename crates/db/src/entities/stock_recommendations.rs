//! `SeaORM` Entity for the stock_recommendations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{RiskLevel, StockAction};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_recommendations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub stock_symbol: String,
    pub company_name: String,
    pub action: StockAction,
    pub target_price: Decimal,
    pub current_price: Decimal,
    pub analysis: String,
    pub risk_level: RiskLevel,
    pub published_date: DateTimeWithTimeZone,
    pub expiry_date: DateTimeWithTimeZone,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
