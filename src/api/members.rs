//! Member and wallet API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{
    cents_from_decimal, decimal_from_cents, Member, TopUpReceipt, TopUpRequest,
    UpdateMemberRequest, WalletTransaction,
};
use crate::AppState;

/// GET /api/members - List all members.
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Vec<Member>> {
    Ok(Json(state.repo.list_members().await?))
}

/// GET /api/members/{id} - Get a single member.
pub async fn get_member(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Member> {
    let member = state
        .repo
        .get_member(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))?;

    Ok(Json(member))
}

/// PUT /api/members/{id} - Update a member profile.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateMemberRequest>,
) -> ApiResult<Member> {
    if let Some(name) = &request.full_name {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "Full name must not be empty".to_string(),
            ));
        }
    }

    Ok(Json(state.repo.update_member_profile(id, &request).await?))
}

/// DELETE /api/members/{id} - Delete a member.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    state.repo.delete_member(id).await?;
    Ok(Json(serde_json::json!({
        "message": "Member deleted",
        "memberId": id,
    })))
}

/// POST /api/members/{id}/topup - Apply a wallet top-up.
pub async fn top_up(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<TopUpRequest>,
) -> ApiResult<TopUpReceipt> {
    let amount_cents = cents_from_decimal(request.amount).ok_or_else(|| {
        AppError::Validation("Amount must have at most 2 decimal places".to_string())
    })?;

    let new_balance_cents = state.repo.top_up(id, amount_cents).await?;
    tracing::info!(member_id = id, amount_cents, "Wallet top-up applied");

    Ok(Json(TopUpReceipt {
        message: "Top-up successful".to_string(),
        member_id: id,
        new_balance: decimal_from_cents(new_balance_cents),
        amount: decimal_from_cents(amount_cents),
    }))
}

/// GET /api/members/{id}/transactions - Ledger history, newest first.
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<WalletTransaction>> {
    state
        .repo
        .get_member(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))?;

    Ok(Json(state.repo.list_transactions(id).await?))
}
