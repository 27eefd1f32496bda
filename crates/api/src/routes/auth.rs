//! Authentication routes for signup, login, and token refresh.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use lyceum_core::auth::{hash_password, verify_password};
use lyceum_db::{ReferralOutcome, ReferralRepository, UserRepository, entities::users};
use lyceum_shared::auth::{AuthResponse, LoginRequest, RefreshRequest, SignupRequest, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Maps a user row to the info payload (never exposes the password hash).
fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username.clone(),
        full_name: user.full_name.clone(),
        subscription_tier: user.subscription_tier.clone().into(),
        credit_balance: user.credit_balance,
        referral_code: user.referral_code.clone(),
    }
}

/// Generates the token pair for a user, or a 500 response.
fn issue_tokens(
    state: &AppState,
    user: &users::Model,
) -> Result<(String, String), axum::response::Response> {
    let access = state
        .jwt_service
        .generate_access_token(user.id, &user.username);
    let refresh = state
        .jwt_service
        .generate_refresh_token(user.id, &user.username);

    match (access, refresh) {
        (Ok(a), Ok(r)) => Ok((a, r)),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to generate tokens");
            Err(super::internal_error())
        }
    }
}

/// Describes a referral outcome for the signup response.
fn referral_notice(outcome: &ReferralOutcome) -> serde_json::Value {
    match outcome {
        ReferralOutcome::NotAttempted => json!({ "applied": false }),
        ReferralOutcome::InvalidCode => json!({
            "applied": false,
            "warning": "Invalid referral code. Account created without referral bonus."
        }),
        ReferralOutcome::AlreadyReferred => json!({ "applied": false }),
        ReferralOutcome::Applied(referral) => json!({
            "applied": true,
            "bonus": lyceum_core::referral::REFERRED_BONUS,
            "referral_id": referral.id,
        }),
    }
}

/// POST /auth/signup - Create an account, applying an optional referral code.
///
/// The referral is strictly non-fatal: an invalid code produces a warning in
/// the response, never a failed signup.
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> impl IntoResponse {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_signup",
                "message": "Username must be non-empty and password at least 8 characters"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.username_exists(username).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "username_taken",
                    "message": "An account with this username already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking username");
            return super::internal_error();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return super::internal_error();
        }
    };

    let user = match user_repo
        .create(username, &password_hash, payload.full_name.trim())
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return super::internal_error();
        }
    };

    // Apply the referral after the account exists; failures here must not
    // undo the signup.
    let referral_repo = ReferralRepository::new((*state.db).clone());
    let referral = match referral_repo
        .apply(user.id, payload.referral_code.as_deref())
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Referral application failed; signup continues");
            ReferralOutcome::NotAttempted
        }
    };

    // Re-read: the referral bonus may have changed the balance.
    let user = match user_repo.find_by_id(user.id).await {
        Ok(Some(u)) => u,
        Ok(None) | Err(_) => user,
    };

    let (access_token, refresh_token) = match issue_tokens(&state, &user) {
        Ok(tokens) => tokens,
        Err(response) => return response,
    };

    info!(user_id = %user.id, username = %user.username, "User signed up");

    (
        StatusCode::CREATED,
        Json(json!({
            "user": user_info(&user),
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_in": state.jwt_service.access_token_expires_in(),
            "referral": referral_notice(&referral),
        })),
    )
        .into_response()
}

/// POST /auth/login - Authenticate a user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return super::internal_error();
        }
    };

    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return super::internal_error();
        }
    }

    let (access_token, refresh_token) = match issue_tokens(&state, &user) {
        Ok(tokens) => tokens,
        Err(response) => return response,
    };

    info!(user_id = %user.id, "User logged in");

    let response = AuthResponse {
        user: user_info(&user),
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/refresh - Exchange a refresh token for a fresh pair.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!(error = %e, "Refresh with invalid token");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_token",
                    "message": "Refresh token is invalid or expired"
                })),
            )
                .into_response();
        }
    };

    let user = match super::load_user(&state, claims.user_id()).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let (access_token, refresh_token) = match issue_tokens(&state, &user) {
        Ok(tokens) => tokens,
        Err(response) => return response,
    };

    let response = AuthResponse {
        user: user_info(&user),
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid username or password"
        })),
    )
        .into_response()
}
