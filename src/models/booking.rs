//! Booking model and request shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A court booking held by a member.
///
/// `total_price` and `transaction_id` are carried as plain data; bookings are
/// not linked to the wallet ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub member_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_booking_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_until: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Request body for creating a booking.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub member_id: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub court_id: Option<i64>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(default)]
    pub recurrence_rule: Option<String>,
    #[serde(default)]
    pub parent_booking_id: Option<i64>,
    #[serde(default)]
    pub hold_until: Option<String>,
}

fn default_status() -> String {
    "Pending".to_string()
}

/// Request body for updating a booking.
///
/// Replaces the mutable fields wholesale; omitted optionals clear the stored
/// value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    #[serde(default)]
    pub court_id: Option<i64>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
}
