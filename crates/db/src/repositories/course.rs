//! Course catalog repository.

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr, sea_query::extension::postgres::PgExpr,
};
use uuid::Uuid;

use crate::entities::{course_categories, courses, lessons, sea_orm_active_enums::CourseLevel};

/// Filter options for listing courses.
///
/// `search` is a case-insensitive substring match over title, description,
/// and instructor. No relevance ranking.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Filter by difficulty level.
    pub level: Option<CourseLevel>,
    /// Substring search term.
    pub search: Option<String>,
}

/// Course catalog repository for read operations.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    db: DatabaseConnection,
}

impl CourseRepository {
    /// Creates a new course repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active courses, newest first, with optional filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self, filter: CourseFilter) -> Result<Vec<courses::Model>, DbErr> {
        let mut query = courses::Entity::find().filter(courses::Column::IsActive.eq(true));

        if let Some(category_id) = filter.category_id {
            query = query.filter(courses::Column::CategoryId.eq(category_id));
        }

        if let Some(level) = filter.level {
            query = query.filter(courses::Column::Level.eq(level));
        }

        if let Some(term) = filter.search.filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(Expr::col(courses::Column::Title).ilike(&pattern))
                    .add(Expr::col(courses::Column::Description).ilike(&pattern))
                    .add(Expr::col(courses::Column::Instructor).ilike(&pattern)),
            );
        }

        query
            .order_by_desc(courses::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Finds an active course by ID. Inactive courses are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active(&self, id: Uuid) -> Result<Option<courses::Model>, DbErr> {
        courses::Entity::find_by_id(id)
            .filter(courses::Column::IsActive.eq(true))
            .one(&self.db)
            .await
    }

    /// Returns a course's full lesson sequence, ordered ascending by
    /// `order` with ties broken by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn lesson_sequence(&self, course_id: Uuid) -> Result<Vec<lessons::Model>, DbErr> {
        lessons::Entity::find()
            .filter(lessons::Column::CourseId.eq(course_id))
            .order_by_asc(lessons::Column::Order)
            .order_by_asc(lessons::Column::Id)
            .all(&self.db)
            .await
    }

    /// Finds a lesson by ID within a specific course.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_lesson(
        &self,
        course_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<lessons::Model>, DbErr> {
        lessons::Entity::find_by_id(lesson_id)
            .filter(lessons::Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
    }

    /// Lists all course categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(&self) -> Result<Vec<course_categories::Model>, DbErr> {
        course_categories::Entity::find()
            .order_by_asc(course_categories::Column::Name)
            .all(&self.db)
            .await
    }
}
