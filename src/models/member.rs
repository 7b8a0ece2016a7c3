//! Member model and the request shapes around it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Role assigned to an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MemberRole {
    Member,
    Admin,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Member => "Member",
            MemberRole::Admin => "Admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Member" => Some(MemberRole::Member),
            "Admin" => Some(MemberRole::Admin),
            _ => None,
        }
    }
}

/// Membership tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MemberTier {
    Standard,
    Premium,
}

impl MemberTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberTier::Standard => "Standard",
            MemberTier::Premium => "Premium",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Standard" => Some(MemberTier::Standard),
            "Premium" => Some(MemberTier::Premium),
            _ => None,
        }
    }
}

/// An account holder with a wallet balance.
///
/// The credential hash stays in the store and is never part of this struct,
/// so a member record is always safe to serialize into a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub wallet_balance: Decimal,
    pub role: MemberRole,
    pub tier: MemberTier,
    pub join_date: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Request body for updating a member profile.
///
/// Only profile fields are accepted here. The wallet balance is owned by the
/// ledger and never moves through a profile update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or full name.
    pub username: String,
    pub password: String,
}

/// Request body for registering a new member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Response body for a successful login or registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: Member,
}
