//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::auth::auth_middleware};
use lyceum_db::{UserRepository, entities::users};
use lyceum_shared::AppError;

pub mod auth;
pub mod content;
pub mod courses;
pub mod dashboard;
pub mod health;
pub mod referrals;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(courses::routes())
        .merge(dashboard::routes())
        .merge(referrals::routes())
        .merge(content::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Loads the authenticated user's account row, rejecting disabled accounts.
pub(crate) async fn load_user(state: &AppState, user_id: Uuid) -> Result<users::Model, Response> {
    match UserRepository::new((*state.db).clone())
        .find_by_id(user_id)
        .await
    {
        Ok(Some(user)) if user.is_active => Ok(user),
        Ok(_) => Err(error_response(&AppError::Unauthorized(
            "Account not found or disabled".to_string(),
        ))),
        Err(e) => {
            error!(error = %e, "Failed to load user");
            Err(internal_error())
        }
    }
}

/// Renders an `AppError` as its JSON envelope.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// The standard opaque 500 response.
pub(crate) fn internal_error() -> Response {
    error_response(&AppError::Internal("An error occurred".to_string()))
}
