//! Referral overview route.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use lyceum_db::ReferralRepository;

/// Creates the referral routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/referrals", get(referral_overview))
}

/// GET /referrals - Referrals made, total earned, and the shareable code.
async fn referral_overview(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user = match super::load_user(&state, auth.user_id()).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let repo = ReferralRepository::new((*state.db).clone());
    let referrals = match repo.list_made_by(user.id).await {
        Ok(referrals) => referrals,
        Err(e) => {
            error!(error = %e, "Failed to list referrals");
            return super::internal_error();
        }
    };

    let total_earned: rust_decimal::Decimal = referrals.iter().map(|r| r.credit_amount).sum();

    (
        StatusCode::OK,
        Json(json!({
            "referral_code": user.referral_code,
            "referrals": referrals,
            "referral_count": referrals.len(),
            "total_earned": total_earned,
            "available_credits": user.credit_balance,
        })),
    )
        .into_response()
}
