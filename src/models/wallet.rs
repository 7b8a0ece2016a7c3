//! Wallet ledger models and money conversion helpers.
//!
//! Monetary values cross the wire as decimals with 2 fractional digits and
//! are stored as integer cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger entry kind written by the top-up path.
pub const KIND_DEPOSIT: &str = "Deposit";
/// Ledger entry status written by the top-up path.
pub const STATUS_COMPLETED: &str = "Completed";

/// An immutable ledger entry for a single balance-affecting event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: i64,
    pub member_id: i64,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub description: String,
    pub created_date: String,
}

/// Request body for a wallet top-up.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpRequest {
    pub amount: Decimal,
}

/// Response body for a successful top-up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpReceipt {
    pub message: String,
    pub member_id: i64,
    pub new_balance: Decimal,
    pub amount: Decimal,
}

/// Convert a decimal amount to integer cents.
///
/// Returns `None` when the value carries more than 2 fractional digits or
/// does not fit the storage range.
pub fn cents_from_decimal(amount: Decimal) -> Option<i64> {
    let scaled = amount.checked_mul(Decimal::ONE_HUNDRED)?;
    if scaled.fract() != Decimal::ZERO {
        return None;
    }
    scaled.to_i64()
}

/// Convert integer cents back to a decimal with 2 fractional digits.
pub fn decimal_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
