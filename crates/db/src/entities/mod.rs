//! `SeaORM` entity definitions for all Lyceum tables.

pub mod course_categories;
pub mod courses;
pub mod enrollments;
pub mod lessons;
pub mod news_articles;
pub mod referrals;
pub mod sea_orm_active_enums;
pub mod stock_recommendations;
pub mod users;
