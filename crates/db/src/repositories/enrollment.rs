//! Enrollment ledger repository.
//!
//! Binds users to courses and tracks completion progress. The admission
//! rules for `enroll` are evaluated in strict order: free admission (free
//! course or premium subscriber), then credit admission (balance covers the
//! price), then failure with the exact shortfall.
//!
//! Concurrency is settled at the storage layer: the balance debit is a
//! compare-and-set conditioned on the balance within the same transaction as
//! the enrollment insert, and the `(user_id, course_id)` uniqueness
//! constraint is the serialization point. A constraint violation racing with
//! a concurrent request is treated as a benign race: state is re-read once
//! and the surviving enrollment returned.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::{
    courses, enrollments, lessons, sea_orm_active_enums::SubscriptionTier, users,
};
use lyceum_core::progress::{self, ProgressPolicy};

/// Error types for enrollment operations.
#[derive(Debug, thiserror::Error)]
pub enum EnrollError {
    /// Course does not exist or is inactive.
    #[error("Course not found: {0}")]
    CourseNotFound(Uuid),

    /// User does not exist.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Balance does not cover the course price. No mutation occurred.
    #[error("Insufficient credits: need {required}, have {available}")]
    InsufficientCredits {
        /// The course price.
        required: Decimal,
        /// The user's balance at decision time.
        available: Decimal,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl EnrollError {
    /// The missing amount for an `InsufficientCredits` failure.
    #[must_use]
    pub fn shortfall(&self) -> Option<Decimal> {
        match self {
            Self::InsufficientCredits {
                required,
                available,
            } => Some(*required - *available),
            _ => None,
        }
    }
}

/// Error types for lesson-visit recording.
#[derive(Debug, thiserror::Error)]
pub enum VisitError {
    /// Course does not exist or is inactive.
    #[error("Course not found: {0}")]
    CourseNotFound(Uuid),

    /// The lesson does not belong to the course's sequence. This is a
    /// data-integrity error, fatal to the request.
    #[error("Lesson {lesson_id} is not in course {course_id}")]
    LessonNotInCourse {
        /// The visited lesson.
        lesson_id: Uuid,
        /// The course whose sequence was searched.
        course_id: Uuid,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// How an admission was funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The course is free.
    Free,
    /// The user holds a premium subscription.
    Premium,
    /// The price was debited from the user's credit balance.
    Credits,
}

/// Outcome of an enroll call.
#[derive(Debug, Clone)]
pub enum EnrollOutcome {
    /// A new enrollment was created.
    Enrolled {
        /// The created enrollment.
        enrollment: enrollments::Model,
        /// How admission was funded.
        admission: Admission,
    },
    /// An enrollment already existed; nothing was charged.
    AlreadyEnrolled(enrollments::Model),
}

impl EnrollOutcome {
    /// The enrollment record, whichever way it came about.
    #[must_use]
    pub const fn enrollment(&self) -> &enrollments::Model {
        match self {
            Self::Enrolled { enrollment, .. } | Self::AlreadyEnrolled(enrollment) => enrollment,
        }
    }

    /// True if this call created the enrollment.
    #[must_use]
    pub const fn newly_enrolled(&self) -> bool {
        matches!(self, Self::Enrolled { .. })
    }
}

/// Enrollment ledger repository.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    db: DatabaseConnection,
    policy: ProgressPolicy,
}

impl EnrollmentRepository {
    /// Creates a new enrollment repository with the default progress policy.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            policy: ProgressPolicy::default(),
        }
    }

    /// Creates a repository with an explicit progress policy.
    #[must_use]
    pub const fn with_policy(db: DatabaseConnection, policy: ProgressPolicy) -> Self {
        Self { db, policy }
    }

    /// Finds the enrollment for a (user, course) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<enrollments::Model>, DbErr> {
        enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
    }

    /// Lists a user's enrollments with their courses, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(enrollments::Model, Option<courses::Model>)>, DbErr> {
        enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .find_also_related(courses::Entity)
            .order_by_desc(enrollments::Column::EnrolledAt)
            .all(&self.db)
            .await
    }

    /// Enrolls a user in a course.
    ///
    /// Idempotent: if an enrollment already exists, it is returned unchanged
    /// and nothing is charged. Otherwise admission is evaluated in strict
    /// order (free course or premium subscription, then credit balance), the
    /// debit — if any — and the insert happening in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `EnrollError::InsufficientCredits` with the exact shortfall
    /// if no admission path applies; `CourseNotFound`/`UserNotFound` for
    /// missing or inactive references.
    pub async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<EnrollOutcome, EnrollError> {
        let course = courses::Entity::find_by_id(course_id)
            .filter(courses::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(EnrollError::CourseNotFound(course_id))?;

        if let Some(existing) = self.find(user_id, course_id).await? {
            return Ok(EnrollOutcome::AlreadyEnrolled(existing));
        }

        let txn = self.db.begin().await?;

        let user = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(EnrollError::UserNotFound(user_id))?;

        let admission = if course.price.is_zero() {
            Admission::Free
        } else if user.subscription_tier == SubscriptionTier::Premium {
            Admission::Premium
        } else {
            // Compare-and-set: debit exactly the price, conditioned on the
            // balance covering it, in the same statement. Zero rows affected
            // means the balance (as of this transaction) falls short.
            let debit = users::Entity::update_many()
                .col_expr(
                    users::Column::CreditBalance,
                    Expr::col(users::Column::CreditBalance).sub(course.price),
                )
                .col_expr(users::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
                .filter(users::Column::Id.eq(user_id))
                .filter(users::Column::CreditBalance.gte(course.price))
                .exec(&txn)
                .await?;

            if debit.rows_affected == 0 {
                txn.rollback().await?;
                return Err(EnrollError::InsufficientCredits {
                    required: course.price,
                    available: user.credit_balance,
                });
            }
            Admission::Credits
        };

        match insert_enrollment(&txn, user_id, course_id).await {
            Ok(enrollment) => {
                txn.commit().await?;
                Ok(EnrollOutcome::Enrolled {
                    enrollment,
                    admission,
                })
            }
            Err(e) if is_unique_violation(&e) => {
                // A concurrent request enrolled this pair first. Rolling back
                // undoes our debit; re-read once and return the survivor.
                txn.rollback().await?;
                let existing = self
                    .find(user_id, course_id)
                    .await?
                    .ok_or(EnrollError::Database(e))?;
                Ok(EnrollOutcome::AlreadyEnrolled(existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Records a lesson visit, creating the enrollment if needed.
    ///
    /// Callers are responsible for the access check; visiting a lesson
    /// implicitly enrolls. Progress is recomputed from the visited lesson's
    /// rank in the full ordered sequence under the repository's
    /// [`ProgressPolicy`]; the write is last-writer-wins.
    ///
    /// # Errors
    ///
    /// Returns `VisitError::LessonNotInCourse` if the lesson is absent from
    /// the course's sequence.
    pub async fn record_lesson_visit(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<enrollments::Model, VisitError> {
        courses::Entity::find_by_id(course_id)
            .filter(courses::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(VisitError::CourseNotFound(course_id))?;

        let sequence: Vec<(i32, Uuid)> = lessons::Entity::find()
            .filter(lessons::Column::CourseId.eq(course_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|lesson| (lesson.order, lesson.id))
            .collect();

        let rank = progress::lesson_rank(&sequence, lesson_id).ok_or(
            VisitError::LessonNotInCourse {
                lesson_id,
                course_id,
            },
        )?;

        let enrollment = match self.find(user_id, course_id).await? {
            Some(enrollment) => enrollment,
            None => match insert_enrollment(&self.db, user_id, course_id).await {
                Ok(enrollment) => enrollment,
                Err(e) if is_unique_violation(&e) => self
                    .find(user_id, course_id)
                    .await?
                    .ok_or(VisitError::Database(e))?,
                Err(e) => return Err(e.into()),
            },
        };

        let update =
            progress::progress_after_visit(self.policy, enrollment.progress, rank, sequence.len());

        let mut active: enrollments::ActiveModel = enrollment.into();
        active.progress = Set(update.progress);
        active.completed = Set(update.completed);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}

/// Inserts a fresh enrollment with zero progress.
async fn insert_enrollment<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<enrollments::Model, DbErr> {
    let now = chrono::Utc::now().into();
    let enrollment = enrollments::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        course_id: Set(course_id),
        progress: Set(Decimal::ZERO),
        completed: Set(false),
        enrolled_at: Set(now),
        updated_at: Set(now),
    };

    enrollment.insert(conn).await
}

/// True if the error is a uniqueness-constraint violation.
fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
