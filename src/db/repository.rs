//! Database repository for all data operations.
//!
//! Uses prepared statements and transactions for data integrity. The
//! repository is the only path that reads or writes wallet balances.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    cents_from_decimal, decimal_from_cents, Booking, Court, CreateBookingRequest,
    CreateCourtRequest, Member, MemberRole, MemberTier, RegisterRequest, UpdateBookingRequest,
    UpdateCourtRequest, UpdateMemberRequest, WalletTransaction, KIND_DEPOSIT, STATUS_COMPLETED,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== MEMBER OPERATIONS ====================

    /// List all members.
    pub async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        let rows = sqlx::query(
            "SELECT id, full_name, email, phone, avatar_url, wallet_balance_cents, role, tier, join_date, created_at, updated_at FROM members ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    /// Get a member by ID.
    pub async fn get_member(&self, id: i64) -> Result<Option<Member>, AppError> {
        let row = sqlx::query(
            "SELECT id, full_name, email, phone, avatar_url, wallet_balance_cents, role, tier, join_date, created_at, updated_at FROM members WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(member_from_row))
    }

    /// Look up a member by login handle (email or full name), returning the
    /// record together with its stored credential hash.
    pub async fn find_member_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(Member, String)>, AppError> {
        let row = sqlx::query(
            "SELECT id, full_name, email, phone, avatar_url, wallet_balance_cents, role, tier, join_date, created_at, updated_at, password_hash FROM members WHERE email = ? OR full_name = ? LIMIT 1"
        )
        .bind(username)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(|row| {
            let hash: String = row.get("password_hash");
            (member_from_row(row), hash)
        }))
    }

    /// Create a new member from a registration request.
    ///
    /// Fails with Conflict when the email is already taken.
    pub async fn create_member(
        &self,
        request: &RegisterRequest,
        password_hash: &str,
    ) -> Result<Member, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM members WHERE email = ?")
            .bind(&request.email)
            .fetch_one(&self.pool)
            .await?;
        let taken: i64 = row.get("n");
        if taken > 0 {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let role = MemberRole::Member;
        let tier = MemberTier::Standard;

        let result = sqlx::query(
            "INSERT INTO members (full_name, email, password_hash, phone, wallet_balance_cents, role, tier, join_date, created_at) VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?)"
        )
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(password_hash)
        .bind(&request.phone)
        .bind(role.as_str())
        .bind(tier.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Member {
            id: result.last_insert_rowid(),
            full_name: request.full_name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            avatar_url: None,
            wallet_balance: decimal_from_cents(0),
            role,
            tier,
            join_date: now.clone(),
            created_at: now,
            updated_at: None,
        })
    }

    /// Update a member profile.
    ///
    /// Touches only name, phone and avatar; the wallet balance never moves
    /// through this path.
    pub async fn update_member_profile(
        &self,
        id: i64,
        request: &UpdateMemberRequest,
    ) -> Result<Member, AppError> {
        let existing = self
            .get_member(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))?;

        let now = Utc::now().to_rfc3339();
        let full_name = request.full_name.as_ref().unwrap_or(&existing.full_name);
        let phone = request.phone.clone().or(existing.phone.clone());
        let avatar_url = request.avatar_url.clone().or(existing.avatar_url.clone());

        sqlx::query(
            "UPDATE members SET full_name = ?, phone = ?, avatar_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(full_name)
        .bind(&phone)
        .bind(&avatar_url)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Member {
            id,
            full_name: full_name.clone(),
            phone,
            avatar_url,
            updated_at: Some(now),
            ..existing
        })
    }

    /// Delete a member.
    pub async fn delete_member(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member {} not found", id)));
        }

        Ok(())
    }

    /// Ensure the seed admin account exists.
    ///
    /// First run creates it; later runs reset its name, credential and
    /// balance to the configured values.
    pub async fn ensure_admin(&self, email: &str, password_hash: &str) -> Result<(), AppError> {
        let existing = sqlx::query("SELECT id FROM members WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        let now = Utc::now().to_rfc3339();
        match existing {
            None => {
                sqlx::query(
                    "INSERT INTO members (full_name, email, password_hash, wallet_balance_cents, role, tier, join_date, created_at) VALUES ('Admin', ?, ?, 0, ?, ?, ?, ?)"
                )
                .bind(email)
                .bind(password_hash)
                .bind(MemberRole::Admin.as_str())
                .bind(MemberTier::Premium.as_str())
                .bind(&now)
                .bind(&now)
                .execute(&self.pool)
                .await?;
            }
            Some(_) => {
                sqlx::query(
                    "UPDATE members SET full_name = 'Admin', password_hash = ?, wallet_balance_cents = 0 WHERE email = ?",
                )
                .bind(password_hash)
                .bind(email)
                .execute(&self.pool)
                .await?;
            }
        }

        Ok(())
    }

    // ==================== WALLET LEDGER ====================

    /// Apply a top-up to a member's wallet and append the ledger entry.
    ///
    /// The balance increment and the transaction insert commit or roll back
    /// together. The increment is a single in-place UPDATE, so concurrent
    /// top-ups for the same member serialize at the store and never lose
    /// updates. Returns the post-update balance in cents.
    pub async fn top_up(&self, member_id: i64, amount_cents: i64) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let result =
            sqlx::query("UPDATE members SET wallet_balance_cents = wallet_balance_cents + ? WHERE id = ?")
                .bind(amount_cents)
                .bind(member_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back; no side effects.
            return Err(AppError::NotFound(format!("Member {} not found", member_id)));
        }

        let row = sqlx::query("SELECT wallet_balance_cents FROM members WHERE id = ?")
            .bind(member_id)
            .fetch_one(&mut *tx)
            .await?;
        let new_balance_cents: i64 = row.get("wallet_balance_cents");

        let now = Utc::now().to_rfc3339();
        let description = format!("Wallet top-up: {}", decimal_from_cents(amount_cents));
        sqlx::query(
            "INSERT INTO wallet_transactions (member_id, amount_cents, kind, status, description, created_date) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(member_id)
        .bind(amount_cents)
        .bind(KIND_DEPOSIT)
        .bind(STATUS_COMPLETED)
        .bind(&description)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(new_balance_cents)
    }

    /// List a member's ledger entries, newest first.
    pub async fn list_transactions(
        &self,
        member_id: i64,
    ) -> Result<Vec<WalletTransaction>, AppError> {
        let rows = sqlx::query(
            "SELECT id, member_id, amount_cents, kind, status, description, created_date FROM wallet_transactions WHERE member_id = ? ORDER BY id DESC"
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(transaction_from_row).collect())
    }

    // ==================== BOOKING OPERATIONS ====================

    /// List all bookings.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query(
            "SELECT id, member_id, start_time, end_time, status, court_id, total_price_cents, transaction_id, is_recurring, recurrence_rule, parent_booking_id, hold_until, created_at FROM bookings ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    /// Get a booking by ID.
    pub async fn get_booking(&self, id: i64) -> Result<Option<Booking>, AppError> {
        let row = sqlx::query(
            "SELECT id, member_id, start_time, end_time, status, court_id, total_price_cents, transaction_id, is_recurring, recurrence_rule, parent_booking_id, hold_until, created_at FROM bookings WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(booking_from_row))
    }

    /// Create a new booking.
    pub async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, AppError> {
        let total_price_cents = price_cents(request.total_price, "totalPrice")?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO bookings (member_id, start_time, end_time, status, court_id, total_price_cents, is_recurring, recurrence_rule, parent_booking_id, hold_until, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(request.member_id)
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(&request.status)
        .bind(request.court_id)
        .bind(total_price_cents)
        .bind(request.is_recurring.map(|b| b as i32))
        .bind(&request.recurrence_rule)
        .bind(request.parent_booking_id)
        .bind(&request.hold_until)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Booking {
            id: result.last_insert_rowid(),
            member_id: request.member_id,
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            status: request.status.clone(),
            court_id: request.court_id,
            total_price: total_price_cents.map(decimal_from_cents),
            transaction_id: None,
            is_recurring: request.is_recurring,
            recurrence_rule: request.recurrence_rule.clone(),
            parent_booking_id: request.parent_booking_id,
            hold_until: request.hold_until.clone(),
            created_at: Some(now),
        })
    }

    /// Update a booking, replacing its mutable fields.
    pub async fn update_booking(
        &self,
        id: i64,
        request: &UpdateBookingRequest,
    ) -> Result<Booking, AppError> {
        let existing = self
            .get_booking(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

        let total_price_cents = price_cents(request.total_price, "totalPrice")?;

        sqlx::query(
            "UPDATE bookings SET start_time = ?, end_time = ?, status = ?, court_id = ?, total_price_cents = ? WHERE id = ?",
        )
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(&request.status)
        .bind(request.court_id)
        .bind(total_price_cents)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Booking {
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            status: request.status.clone(),
            court_id: request.court_id,
            total_price: total_price_cents.map(decimal_from_cents),
            ..existing
        })
    }

    /// Delete a booking.
    pub async fn delete_booking(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking {} not found", id)));
        }

        Ok(())
    }

    // ==================== COURT OPERATIONS ====================

    /// List all courts.
    pub async fn list_courts(&self) -> Result<Vec<Court>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, description, price_per_hour_cents, is_active, created_at FROM courts ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(court_from_row).collect())
    }

    /// Get a court by ID.
    pub async fn get_court(&self, id: i64) -> Result<Option<Court>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, description, price_per_hour_cents, is_active, created_at FROM courts WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(court_from_row))
    }

    /// Create a new court.
    pub async fn create_court(&self, request: &CreateCourtRequest) -> Result<Court, AppError> {
        let price_per_hour_cents = cents_from_decimal(request.price_per_hour)
            .ok_or_else(|| AppError::Validation("pricePerHour must have at most 2 decimal places".to_string()))?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO courts (name, description, price_per_hour_cents, is_active, created_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(price_per_hour_cents)
        .bind(request.is_active as i32)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Court {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            description: request.description.clone(),
            price_per_hour: decimal_from_cents(price_per_hour_cents),
            is_active: request.is_active,
            created_at: Some(now),
        })
    }

    /// Update a court, replacing its mutable fields.
    pub async fn update_court(
        &self,
        id: i64,
        request: &UpdateCourtRequest,
    ) -> Result<Court, AppError> {
        let existing = self
            .get_court(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Court {} not found", id)))?;

        let price_per_hour_cents = cents_from_decimal(request.price_per_hour)
            .ok_or_else(|| AppError::Validation("pricePerHour must have at most 2 decimal places".to_string()))?;

        sqlx::query(
            "UPDATE courts SET name = ?, description = ?, price_per_hour_cents = ?, is_active = ? WHERE id = ?",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(price_per_hour_cents)
        .bind(request.is_active as i32)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Court {
            name: request.name.clone(),
            description: request.description.clone(),
            price_per_hour: decimal_from_cents(price_per_hour_cents),
            is_active: request.is_active,
            ..existing
        })
    }

    /// Delete a court.
    pub async fn delete_court(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Court {} not found", id)));
        }

        Ok(())
    }
}

// Helper functions for row conversion

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> Member {
    let balance_cents: i64 = row.get("wallet_balance_cents");
    let role: String = row.get("role");
    let tier: String = row.get("tier");
    Member {
        id: row.get("id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        avatar_url: row.get("avatar_url"),
        wallet_balance: decimal_from_cents(balance_cents),
        role: MemberRole::from_str(&role).unwrap_or(MemberRole::Member),
        tier: MemberTier::from_str(&tier).unwrap_or(MemberTier::Standard),
        join_date: row.get("join_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn transaction_from_row(row: &sqlx::sqlite::SqliteRow) -> WalletTransaction {
    let amount_cents: i64 = row.get("amount_cents");
    WalletTransaction {
        id: row.get("id"),
        member_id: row.get("member_id"),
        amount: decimal_from_cents(amount_cents),
        kind: row.get("kind"),
        status: row.get("status"),
        description: row.get("description"),
        created_date: row.get("created_date"),
    }
}

fn booking_from_row(row: &sqlx::sqlite::SqliteRow) -> Booking {
    let total_price_cents: Option<i64> = row.get("total_price_cents");
    let is_recurring: Option<i32> = row.get("is_recurring");
    Booking {
        id: row.get("id"),
        member_id: row.get("member_id"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        status: row.get("status"),
        court_id: row.get("court_id"),
        total_price: total_price_cents.map(decimal_from_cents),
        transaction_id: row.get("transaction_id"),
        is_recurring: is_recurring.map(|v| v != 0),
        recurrence_rule: row.get("recurrence_rule"),
        parent_booking_id: row.get("parent_booking_id"),
        hold_until: row.get("hold_until"),
        created_at: row.get("created_at"),
    }
}

fn court_from_row(row: &sqlx::sqlite::SqliteRow) -> Court {
    let price_per_hour_cents: i64 = row.get("price_per_hour_cents");
    let is_active: i32 = row.get("is_active");
    Court {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price_per_hour: decimal_from_cents(price_per_hour_cents),
        is_active: is_active != 0,
        created_at: row.get("created_at"),
    }
}

fn price_cents(
    price: Option<rust_decimal::Decimal>,
    field: &str,
) -> Result<Option<i64>, AppError> {
    match price {
        Some(price) => cents_from_decimal(price).map(Some).ok_or_else(|| {
            AppError::Validation(format!("{} must have at most 2 decimal places", field))
        }),
        None => Ok(None),
    }
}
