//! Auth API endpoints.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::auth;
use crate::errors::AppError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::AppState;

/// POST /api/auth/login - Verify credentials and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let found = state
        .repo
        .find_member_credentials(&request.username)
        .await?;

    // One message for both failure modes; which check failed stays private.
    let (member, hash) = found.ok_or_else(unauthorized)?;
    if !auth::verify_password(&request.password, &hash) {
        return Err(unauthorized());
    }

    let token = auth::issue_token(
        &member,
        &state.config.jwt_secret,
        state.config.token_ttl_minutes,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: member,
    }))
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("Invalid username or password".to_string())
}

/// POST /api/auth/register - Create a member account and issue a token.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    if request.full_name.trim().is_empty() {
        return Err(AppError::Validation("Full name is required".to_string()));
    }
    if request.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let password_hash = auth::hash_password(&request.password)?;
    let member = state.repo.create_member(&request, &password_hash).await?;
    tracing::info!(member_id = member.id, "Registered new member");

    let token = auth::issue_token(
        &member,
        &state.config.jwt_secret,
        state.config.token_ttl_minutes,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: member,
    }))
}
