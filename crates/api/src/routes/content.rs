//! Premium content routes: stock recommendations and market news.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use lyceum_core::visibility;
use lyceum_db::ContentRepository;
use lyceum_shared::types::SubscriptionTier;

/// Creates the content routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(list_recommendations))
        .route("/news", get(list_news))
}

/// GET /recommendations - Active stock recommendations, capped for free tier.
async fn list_recommendations(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user = match super::load_user(&state, auth.user_id()).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    let tier: SubscriptionTier = user.subscription_tier.clone().into();
    let cap = visibility::recommendations_cap(tier);

    let repo = ContentRepository::new((*state.db).clone());
    match repo.list_recommendations(cap).await {
        Ok(recommendations) => (
            StatusCode::OK,
            Json(json!({
                "recommendations": recommendations,
                "limited": cap.is_some(),
                "notice": cap.map(|_| {
                    "Upgrade to premium for full access to all stock recommendations."
                }),
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list recommendations");
            super::internal_error()
        }
    }
}

/// GET /news - Active news articles, capped for free tier.
async fn list_news(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user = match super::load_user(&state, auth.user_id()).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    let tier: SubscriptionTier = user.subscription_tier.clone().into();
    let cap = visibility::news_cap(tier);

    let repo = ContentRepository::new((*state.db).clone());
    match repo.list_news(cap).await {
        Ok(articles) => (
            StatusCode::OK,
            Json(json!({
                "news_articles": articles,
                "limited": cap.is_some(),
                "notice": cap.map(|_| "Upgrade to premium for unlimited access to daily market news."),
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list news");
            super::internal_error()
        }
    }
}
