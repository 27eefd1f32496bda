//! Postgres enum types mapped to closed Rust enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscription tier of a user account.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "subscription_tier")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// Free tier.
    #[sea_orm(string_value = "free")]
    Free,
    /// Premium tier.
    #[sea_orm(string_value = "premium")]
    Premium,
}

impl From<SubscriptionTier> for lyceum_shared::types::SubscriptionTier {
    fn from(tier: SubscriptionTier) -> Self {
        match tier {
            SubscriptionTier::Free => Self::Free,
            SubscriptionTier::Premium => Self::Premium,
        }
    }
}

/// Difficulty level of a course.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_level")]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    /// Beginner level.
    #[sea_orm(string_value = "beginner")]
    Beginner,
    /// Intermediate level.
    #[sea_orm(string_value = "intermediate")]
    Intermediate,
    /// Advanced level.
    #[sea_orm(string_value = "advanced")]
    Advanced,
}

/// Primary content type of a lesson.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "lesson_content")]
#[serde(rename_all = "lowercase")]
pub enum LessonContent {
    /// Video lesson.
    #[sea_orm(string_value = "video")]
    Video,
    /// Image content.
    #[sea_orm(string_value = "image")]
    Image,
    /// PDF document.
    #[sea_orm(string_value = "pdf")]
    Pdf,
    /// Text content.
    #[sea_orm(string_value = "text")]
    Text,
    /// Quiz.
    #[sea_orm(string_value = "quiz")]
    Quiz,
}

/// Analyst action on a stock recommendation.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stock_action")]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    /// Buy.
    #[sea_orm(string_value = "buy")]
    Buy,
    /// Hold.
    #[sea_orm(string_value = "hold")]
    Hold,
    /// Sell.
    #[sea_orm(string_value = "sell")]
    Sell,
}

/// Risk level of a stock recommendation.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "risk_level")]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk.
    #[sea_orm(string_value = "low")]
    Low,
    /// Medium risk.
    #[sea_orm(string_value = "medium")]
    Medium,
    /// High risk.
    #[sea_orm(string_value = "high")]
    High,
}
