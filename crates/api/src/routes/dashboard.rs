//! Dashboard route: enrollments, referral stats, and content previews.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use lyceum_core::visibility;
use lyceum_db::{
    ContentRepository, EnrollmentRepository, ReferralRepository,
    entities::{courses, enrollments},
};
use lyceum_shared::types::SubscriptionTier;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// GET /dashboard - The user's landing view.
///
/// In-progress and completed courses, referral stats, and tier-limited
/// previews of recommendations and news.
async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user = match super::load_user(&state, auth.user_id()).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    let tier: SubscriptionTier = user.subscription_tier.clone().into();

    let enrollment_repo = EnrollmentRepository::new((*state.db).clone());
    let enrollments = match enrollment_repo.list_for_user(user.id).await {
        Ok(enrollments) => enrollments,
        Err(e) => {
            error!(error = %e, "Failed to list enrollments");
            return super::internal_error();
        }
    };

    let (completed, in_progress): (Vec<_>, Vec<_>) = enrollments
        .into_iter()
        .partition(|(enrollment, _)| enrollment.completed);

    let referral_repo = ReferralRepository::new((*state.db).clone());
    let referrals = match referral_repo.list_made_by(user.id).await {
        Ok(referrals) => referrals,
        Err(e) => {
            error!(error = %e, "Failed to list referrals");
            return super::internal_error();
        }
    };

    let content_repo = ContentRepository::new((*state.db).clone());
    let recommendations = match content_repo
        .list_recommendations(Some(visibility::dashboard_recommendations(tier)))
        .await
    {
        Ok(recommendations) => recommendations,
        Err(e) => {
            error!(error = %e, "Failed to list recommendations");
            return super::internal_error();
        }
    };
    let news = match content_repo
        .list_news(Some(visibility::dashboard_news(tier)))
        .await
    {
        Ok(news) => news,
        Err(e) => {
            error!(error = %e, "Failed to list news");
            return super::internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "in_progress_courses": course_entries(in_progress),
            "completed_courses": course_entries(completed),
            "referrals": {
                "code": user.referral_code,
                "count": referrals.len(),
                "credit_balance": user.credit_balance,
            },
            "recommendations": recommendations,
            "news_articles": news,
        })),
    )
        .into_response()
}

/// Pairs each enrollment with its course for the response.
fn course_entries(rows: Vec<(enrollments::Model, Option<courses::Model>)>) -> Vec<serde_json::Value> {
    rows.into_iter()
        .map(|(enrollment, course)| json!({ "enrollment": enrollment, "course": course }))
        .collect()
}
