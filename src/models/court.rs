//! Court model and request shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bookable court.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price_per_hour: Decimal,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Request body for creating a court.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourtRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_per_hour: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Request body for updating a court.
///
/// Replaces all mutable fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourtRequest {
    pub name: String,
    pub description: String,
    pub price_per_hour: Decimal,
    pub is_active: bool,
}
