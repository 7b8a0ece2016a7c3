//! Court API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{Court, CreateCourtRequest, UpdateCourtRequest};
use crate::AppState;

/// GET /api/courts - List all courts.
pub async fn list_courts(State(state): State<AppState>) -> ApiResult<Vec<Court>> {
    Ok(Json(state.repo.list_courts().await?))
}

/// GET /api/courts/{id} - Get a single court.
pub async fn get_court(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Court> {
    let court = state
        .repo
        .get_court(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Court {} not found", id)))?;

    Ok(Json(court))
}

/// POST /api/courts - Create a new court.
pub async fn create_court(
    State(state): State<AppState>,
    Json(request): Json<CreateCourtRequest>,
) -> ApiResult<Court> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    Ok(Json(state.repo.create_court(&request).await?))
}

/// PUT /api/courts/{id} - Update a court.
pub async fn update_court(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCourtRequest>,
) -> ApiResult<Court> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    Ok(Json(state.repo.update_court(id, &request).await?))
}

/// DELETE /api/courts/{id} - Delete a court.
pub async fn delete_court(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    state.repo.delete_court(id).await?;
    Ok(Json(serde_json::json!({
        "message": "Court deleted",
        "courtId": id,
    })))
}
