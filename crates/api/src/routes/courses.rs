//! Course catalog, enrollment, and lesson routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use lyceum_core::access;
use lyceum_shared::types::Credits;
use lyceum_db::{
    Admission, CourseFilter, CourseRepository, EnrollError, EnrollOutcome, EnrollmentRepository,
    VisitError,
    entities::{lessons, sea_orm_active_enums::CourseLevel},
};

/// Creates the course routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/{course_id}", get(get_course))
        .route("/courses/{course_id}/enroll", post(enroll_course))
        .route(
            "/courses/{course_id}/lessons/{lesson_id}",
            get(view_lesson),
        )
}

/// Query parameters for the course listing.
#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    /// Filter by category ID.
    pub category: Option<Uuid>,
    /// Filter by level: beginner, intermediate, advanced.
    pub level: Option<String>,
    /// Case-insensitive substring search.
    pub search: Option<String>,
}

/// Converts a level string to the enum value.
fn parse_level(s: &str) -> Option<CourseLevel> {
    match s.to_lowercase().as_str() {
        "beginner" => Some(CourseLevel::Beginner),
        "intermediate" => Some(CourseLevel::Intermediate),
        "advanced" => Some(CourseLevel::Advanced),
        _ => None,
    }
}

/// GET /courses - List active courses with optional filters.
async fn list_courses(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CourseListQuery>,
) -> impl IntoResponse {
    let level = match query.level.as_deref() {
        Some(s) => match parse_level(s) {
            Some(level) => Some(level),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_level",
                        "message": "Level must be one of: beginner, intermediate, advanced"
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let repo = CourseRepository::new((*state.db).clone());
    let filter = CourseFilter {
        category_id: query.category,
        level,
        search: query.search,
    };

    let courses = match repo.list_active(filter).await {
        Ok(courses) => courses,
        Err(e) => {
            error!(error = %e, "Failed to list courses");
            return super::internal_error();
        }
    };

    let categories = match repo.list_categories().await {
        Ok(categories) => categories,
        Err(e) => {
            error!(error = %e, "Failed to list categories");
            return super::internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(json!({ "courses": courses, "categories": categories })),
    )
        .into_response()
}

/// GET /courses/{course_id} - Course detail with its lesson sequence and the
/// caller's aggregate access decision.
async fn get_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> impl IntoResponse {
    let user = match super::load_user(&state, auth.user_id()).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let course_repo = CourseRepository::new((*state.db).clone());
    let course = match course_repo.find_active(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return course_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to load course");
            return super::internal_error();
        }
    };

    let lessons = match course_repo.lesson_sequence(course_id).await {
        Ok(lessons) => lessons,
        Err(e) => {
            error!(error = %e, "Failed to load lesson sequence");
            return super::internal_error();
        }
    };

    let enrollment_repo = EnrollmentRepository::new((*state.db).clone());
    let enrollment = match enrollment_repo.find(user.id, course_id).await {
        Ok(enrollment) => enrollment,
        Err(e) => {
            error!(error = %e, "Failed to load enrollment");
            return super::internal_error();
        }
    };

    let can_access = access::course_access(
        user.subscription_tier.clone().into(),
        Credits::new(course.price),
        enrollment.is_some(),
    );

    (
        StatusCode::OK,
        Json(json!({
            "course": course,
            "lessons": lessons,
            "is_enrolled": enrollment.is_some(),
            "can_access": can_access,
            "enrollment": enrollment,
        })),
    )
        .into_response()
}

/// POST /courses/{course_id}/enroll - Enroll the caller in a course.
///
/// Idempotent: repeating the call returns the existing enrollment and
/// charges nothing.
async fn enroll_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = EnrollmentRepository::new((*state.db).clone());

    match repo.enroll(auth.user_id(), course_id).await {
        Ok(outcome) => {
            let status = if outcome.newly_enrolled() {
                info!(user_id = %auth.user_id(), course_id = %course_id, "User enrolled");
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            let admission = match &outcome {
                EnrollOutcome::Enrolled { admission, .. } => Some(admission_label(*admission)),
                EnrollOutcome::AlreadyEnrolled(_) => None,
            };

            (
                status,
                Json(json!({
                    "enrollment": outcome.enrollment(),
                    "already_enrolled": !outcome.newly_enrolled(),
                    "admission": admission,
                })),
            )
                .into_response()
        }
        Err(e) => map_enroll_error(&e),
    }
}

/// Converts an admission to its response label.
const fn admission_label(admission: Admission) -> &'static str {
    match admission {
        Admission::Free => "free",
        Admission::Premium => "premium",
        Admission::Credits => "credits",
    }
}

/// GET /courses/{course_id}/lessons/{lesson_id} - View a lesson.
///
/// Course-level access records the visit and updates progress. A preview
/// lesson is viewable without any course-level grant, but a preview-only
/// view does not implicitly enroll or touch progress.
#[allow(clippy::too_many_lines)]
async fn view_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((course_id, lesson_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let user = match super::load_user(&state, auth.user_id()).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let course_repo = CourseRepository::new((*state.db).clone());
    let course = match course_repo.find_active(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return course_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to load course");
            return super::internal_error();
        }
    };

    let lesson = match course_repo.find_lesson(course_id, lesson_id).await {
        Ok(Some(lesson)) => lesson,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "lesson_not_found",
                    "message": "This lesson is not available"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to load lesson");
            return super::internal_error();
        }
    };

    let enrollment_repo = EnrollmentRepository::new((*state.db).clone());
    let is_enrolled = match enrollment_repo.find(user.id, course_id).await {
        Ok(enrollment) => enrollment.is_some(),
        Err(e) => {
            error!(error = %e, "Failed to load enrollment");
            return super::internal_error();
        }
    };

    let course_grant = access::course_access(
        user.subscription_tier.clone().into(),
        Credits::new(course.price),
        is_enrolled,
    );

    if !access::lesson_access(course_grant, lesson.is_preview) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "enrollment_required",
                "message": "You need to enroll in this course to access the lessons"
            })),
        )
            .into_response();
    }

    let sequence = match course_repo.lesson_sequence(course_id).await {
        Ok(sequence) => sequence,
        Err(e) => {
            error!(error = %e, "Failed to load lesson sequence");
            return super::internal_error();
        }
    };
    let (previous_lesson, next_lesson) = neighbors(&sequence, lesson_id);

    // Only a course-level grant drives progress; a preview peek does not
    // implicitly enroll.
    let enrollment = if course_grant {
        match enrollment_repo
            .record_lesson_visit(user.id, course_id, lesson_id)
            .await
        {
            Ok(enrollment) => Some(enrollment),
            Err(e) => {
                error!(error = %e, "Failed to record lesson visit");
                return map_visit_error(&e);
            }
        }
    } else {
        None
    };

    (
        StatusCode::OK,
        Json(json!({
            "lesson": lesson,
            "previous_lesson_id": previous_lesson,
            "next_lesson_id": next_lesson,
            "progress": enrollment.as_ref().map(|e| e.progress),
            "completed": enrollment.as_ref().map(|e| e.completed),
        })),
    )
        .into_response()
}

/// Previous and next lesson IDs around `lesson_id` in an ordered sequence.
fn neighbors(sequence: &[lessons::Model], lesson_id: Uuid) -> (Option<Uuid>, Option<Uuid>) {
    let Some(index) = sequence.iter().position(|l| l.id == lesson_id) else {
        return (None, None);
    };

    let previous = index.checked_sub(1).map(|i| sequence[i].id);
    let next = sequence.get(index + 1).map(|l| l.id);
    (previous, next)
}

fn course_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "course_not_found",
            "message": "This course is not available"
        })),
    )
        .into_response()
}

/// Maps enrollment errors to HTTP responses.
fn map_enroll_error(e: &EnrollError) -> axum::response::Response {
    match e {
        EnrollError::CourseNotFound(_) => course_not_found(),
        EnrollError::UserNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "user_not_found",
                "message": "Account not found"
            })),
        )
            .into_response(),
        EnrollError::InsufficientCredits {
            required,
            available,
        } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "insufficient_credits",
                "message": format!(
                    "Insufficient credits. You need {required} but have {available}."
                ),
                "required": required,
                "available": available,
                "shortfall": e.shortfall(),
            })),
        )
            .into_response(),
        EnrollError::Database(err) => {
            error!(error = %err, "Enrollment failed");
            super::internal_error()
        }
    }
}

/// Maps visit errors to HTTP responses.
fn map_visit_error(e: &VisitError) -> axum::response::Response {
    match e {
        VisitError::CourseNotFound(_) => course_not_found(),
        VisitError::LessonNotInCourse { .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "lesson_not_found",
                "message": "This lesson is not available"
            })),
        )
            .into_response(),
        VisitError::Database(err) => {
            error!(error = %err, "Lesson visit failed");
            super::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("beginner"), Some(CourseLevel::Beginner));
        assert_eq!(parse_level("ADVANCED"), Some(CourseLevel::Advanced));
        assert_eq!(parse_level("expert"), None);
    }
}
