//! Premium content repository: stock recommendations and market news.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{news_articles, stock_recommendations};

/// Repository for tier-gated content listings.
///
/// Callers derive `limit` from `lyceum_core::visibility` for the requesting
/// user's tier; `None` lists everything.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    db: DatabaseConnection,
}

impl ContentRepository {
    /// Creates a new content repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active stock recommendations, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_recommendations(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<stock_recommendations::Model>, DbErr> {
        let mut query = stock_recommendations::Entity::find()
            .filter(stock_recommendations::Column::IsActive.eq(true))
            .order_by_desc(stock_recommendations::Column::PublishedDate);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query.all(&self.db).await
    }

    /// Lists active news articles, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_news(&self, limit: Option<u64>) -> Result<Vec<news_articles::Model>, DbErr> {
        let mut query = news_articles::Entity::find()
            .filter(news_articles::Column::IsActive.eq(true))
            .order_by_desc(news_articles::Column::PublishedDate);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query.all(&self.db).await
    }
}
