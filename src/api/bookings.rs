//! Booking API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{Booking, CreateBookingRequest, UpdateBookingRequest};
use crate::AppState;

/// GET /api/bookings - List all bookings.
pub async fn list_bookings(State(state): State<AppState>) -> ApiResult<Vec<Booking>> {
    Ok(Json(state.repo.list_bookings().await?))
}

/// GET /api/bookings/{id} - Get a single booking.
pub async fn get_booking(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Booking> {
    let booking = state
        .repo
        .get_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

    Ok(Json(booking))
}

/// POST /api/bookings - Create a new booking.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> ApiResult<Booking> {
    if request.start_time.trim().is_empty() || request.end_time.trim().is_empty() {
        return Err(AppError::Validation(
            "startTime and endTime are required".to_string(),
        ));
    }

    // The booking must reference an existing member
    state
        .repo
        .get_member(request.member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", request.member_id)))?;

    if let Some(court_id) = request.court_id {
        state
            .repo
            .get_court(court_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Court {} not found", court_id)))?;
    }

    Ok(Json(state.repo.create_booking(&request).await?))
}

/// PUT /api/bookings/{id} - Update a booking.
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateBookingRequest>,
) -> ApiResult<Booking> {
    Ok(Json(state.repo.update_booking(id, &request).await?))
}

/// DELETE /api/bookings/{id} - Delete a booking.
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    state.repo.delete_booking(id).await?;
    Ok(Json(serde_json::json!({
        "message": "Booking deleted",
        "bookingId": id,
    })))
}
