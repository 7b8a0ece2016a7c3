//! Integration tests for the courtclub backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::auth;
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::{create_router, AppState};

const ADMIN_EMAIL: &str = "admin@club.local";
const ADMIN_PASSWORD: &str = "admin-pass";

/// Test fixture for integration tests.
///
/// Spawns the real router on an ephemeral port against a temp database and
/// logs in as the seeded admin, so `client` carries a valid bearer token.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            jwt_secret: "test-signing-secret".to_string(),
            token_ttl_minutes: 60,
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        };

        // Seed the admin account
        let admin_hash = auth::hash_password(ADMIN_PASSWORD).unwrap();
        repo.ensure_admin(ADMIN_EMAIL, &admin_hash).await.unwrap();

        let state = AppState {
            repo,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        // Log in as the seeded admin for a default bearer token
        let login = Client::new()
            .post(format!("{}/api/auth/login", base_url))
            .json(&json!({ "username": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .send()
            .await
            .unwrap();
        assert_eq!(login.status(), 200);
        let body: Value = login.json().await.unwrap();
        let token = body["token"].as_str().unwrap().to_string();

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );

        TestFixture {
            client: Client::builder().default_headers(headers).build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a member and return its id.
    async fn register_member(&self, name: &str, email: &str) -> i64 {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "fullName": name, "email": email, "password": "pw-123456" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["user"]["id"].as_i64().unwrap()
    }

    /// Apply a top-up and return the response body, asserting success.
    async fn top_up(&self, member_id: i64, amount: f64) -> Value {
        let resp = self
            .client
            .post(self.url(&format!("/api/members/{}/topup", member_id)))
            .json(&json!({ "amount": amount }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_token() {
    let fixture = TestFixture::new().await;

    // Plain client without the default Authorization header
    let resp = Client::new()
        .get(fixture.url("/api/members"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Missing bearer token");
}

#[tokio::test]
async fn test_auth_invalid_token() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/members"))
        .header("authorization", "Bearer not-a-real-token")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let fixture = TestFixture::new().await;

    // Wrong password
    let resp = Client::new()
        .post(fixture.url("/api/auth/login"))
        .json(&json!({ "username": ADMIN_EMAIL, "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid username or password");

    // Unknown account gets the same message
    let resp = Client::new()
        .post(fixture.url("/api/auth/login"))
        .json(&json!({ "username": "nobody@club.local", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn test_login_by_full_name() {
    let fixture = TestFixture::new().await;
    fixture
        .register_member("Frida Vo", "frida@example.com")
        .await;

    let resp = Client::new()
        .post(fixture.url("/api/auth/login"))
        .json(&json!({ "username": "Frida Vo", "password": "pw-123456" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["user"]["email"], "frida@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let fixture = TestFixture::new().await;
    fixture
        .register_member("First User", "dup@example.com")
        .await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({ "fullName": "Second User", "email": "dup@example.com", "password": "pw-123456" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn test_top_up_scenario() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Scenario Member", "scenario@example.com")
        .await;

    // Fresh member starts at zero
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["walletBalance"], "0.00");

    // First top-up
    let receipt = fixture.top_up(member_id, 50.00).await;
    assert_eq!(receipt["message"], "Top-up successful");
    assert_eq!(receipt["memberId"].as_i64().unwrap(), member_id);
    assert_eq!(receipt["amount"], "50.00");
    assert_eq!(receipt["newBalance"], "50.00");

    // Second top-up accumulates
    let receipt = fixture.top_up(member_id, 25.50).await;
    assert_eq!(receipt["newBalance"], "75.50");

    // Exactly two Deposit ledger entries, newest first
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}/transactions", member_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let entries: Value = resp.json().await.unwrap();
    let entries = entries.as_array().unwrap().clone();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["amount"], "25.50");
    assert_eq!(entries[1]["amount"], "50.00");
    for entry in &entries {
        assert_eq!(entry["type"], "Deposit");
        assert_eq!(entry["status"], "Completed");
        assert_eq!(entry["memberId"].as_i64().unwrap(), member_id);
    }
    assert_eq!(entries[1]["description"], "Wallet top-up: 50.00");
}

#[tokio::test]
async fn test_balance_accounting_over_sequence() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Ledger Member", "ledger@example.com")
        .await;

    let amounts = [10.00, 0.01, 99.99, 3.50];
    for amount in amounts {
        fixture.top_up(member_id, amount).await;
    }

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["walletBalance"], "113.50");

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}/transactions", member_id)))
        .send()
        .await
        .unwrap();
    let entries: Value = resp.json().await.unwrap();
    assert_eq!(entries.as_array().unwrap().len(), amounts.len());
}

#[tokio::test]
async fn test_negative_amount_flows_through() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Signed Member", "signed@example.com")
        .await;

    fixture.top_up(member_id, 50.00).await;
    let receipt = fixture.top_up(member_id, -10.25).await;
    assert_eq!(receipt["newBalance"], "39.75");

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}/transactions", member_id)))
        .send()
        .await
        .unwrap();
    let entries: Value = resp.json().await.unwrap();
    assert_eq!(entries.as_array().unwrap()[0]["amount"], "-10.25");
}

#[tokio::test]
async fn test_top_up_rejects_sub_cent_precision() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Precise Member", "precise@example.com")
        .await;

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/members/{}/topup", member_id)))
        .json(&json!({ "amount": "10.005" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);

    // No mutation on rejection
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["walletBalance"], "0.00");
}

#[tokio::test]
async fn test_top_up_unknown_member_leaves_no_trace() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Bystander", "bystander@example.com")
        .await;

    let resp = fixture
        .client
        .post(fixture.url("/api/members/999999/topup"))
        .json(&json!({ "amount": 10.00 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Member 999999 not found");

    // Member table row count unchanged (admin + bystander)
    let resp = fixture
        .client
        .get(fixture.url("/api/members"))
        .send()
        .await
        .unwrap();
    let members: Value = resp.json().await.unwrap();
    assert_eq!(members.as_array().unwrap().len(), 2);

    // No orphaned ledger entry
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}/transactions", member_id)))
        .send()
        .await
        .unwrap();
    let entries: Value = resp.json().await.unwrap();
    assert!(entries.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_member_is_side_effect_free() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Lookup Member", "lookup@example.com")
        .await;
    fixture.top_up(member_id, 20.00).await;

    for _ in 0..5 {
        let resp = fixture
            .client
            .get(fixture.url(&format!("/api/members/{}", member_id)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["walletBalance"], "20.00");
    }

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}/transactions", member_id)))
        .send()
        .await
        .unwrap();
    let entries: Value = resp.json().await.unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_top_ups_lose_no_updates() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Concurrent Member", "concurrent@example.com")
        .await;

    const TASKS: usize = 8;
    let mut handles = Vec::new();
    for _ in 0..TASKS {
        let client = fixture.client.clone();
        let url = fixture.url(&format!("/api/members/{}/topup", member_id));
        handles.push(tokio::spawn(async move {
            let resp = client
                .post(url)
                .json(&json!({ "amount": 10.00 }))
                .send()
                .await
                .unwrap();
            resp.status().as_u16()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["walletBalance"], "80.00");

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}/transactions", member_id)))
        .send()
        .await
        .unwrap();
    let entries: Value = resp.json().await.unwrap();
    assert_eq!(entries.as_array().unwrap().len(), TASKS);
}

#[tokio::test]
async fn test_profile_update_never_touches_wallet() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Profile Member", "profile@example.com")
        .await;
    fixture.top_up(member_id, 30.00).await;

    // walletBalance in the payload is ignored; only profile fields move
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/members/{}", member_id)))
        .json(&json!({
            "fullName": "Renamed Member",
            "phone": "555-0100",
            "walletBalance": 9999.00
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["fullName"], "Renamed Member");
    assert_eq!(body["phone"], "555-0100");
    assert_eq!(body["walletBalance"], "30.00");

    // And no ledger entry was written
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}/transactions", member_id)))
        .send()
        .await
        .unwrap();
    let entries: Value = resp.json().await.unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_member_delete() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Leaving Member", "leaving@example.com")
        .await;

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_booking_crud() {
    let fixture = TestFixture::new().await;
    let member_id = fixture
        .register_member("Booking Member", "booking@example.com")
        .await;

    // Create court for the booking
    let resp = fixture
        .client
        .post(fixture.url("/api/courts"))
        .json(&json!({ "name": "Court 1", "pricePerHour": 20.00 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let court: Value = resp.json().await.unwrap();
    let court_id = court["id"].as_i64().unwrap();

    // Create booking
    let resp = fixture
        .client
        .post(fixture.url("/api/bookings"))
        .json(&json!({
            "memberId": member_id,
            "courtId": court_id,
            "startTime": "2026-08-10T18:00:00+00:00",
            "endTime": "2026-08-10T19:00:00+00:00",
            "totalPrice": 20.00
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let booking: Value = resp.json().await.unwrap();
    let booking_id = booking["id"].as_i64().unwrap();
    assert_eq!(booking["status"], "Pending");
    assert_eq!(booking["totalPrice"], "20.00");

    // Get booking
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/bookings/{}", booking_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Update replaces the mutable fields
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/bookings/{}", booking_id)))
        .json(&json!({
            "startTime": "2026-08-10T19:00:00+00:00",
            "endTime": "2026-08-10T20:00:00+00:00",
            "status": "Confirmed",
            "courtId": court_id,
            "totalPrice": 25.00
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["status"], "Confirmed");
    assert_eq!(updated["totalPrice"], "25.00");
    assert_eq!(updated["memberId"].as_i64().unwrap(), member_id);

    // List bookings
    let resp = fixture
        .client
        .get(fixture.url("/api/bookings"))
        .send()
        .await
        .unwrap();
    let bookings: Value = resp.json().await.unwrap();
    assert_eq!(bookings.as_array().unwrap().len(), 1);

    // Delete booking
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/bookings/{}", booking_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/bookings/{}", booking_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_booking_requires_existing_member() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/bookings"))
        .json(&json!({
            "memberId": 424242,
            "startTime": "2026-08-10T18:00:00+00:00",
            "endTime": "2026-08-10T19:00:00+00:00"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);

    let resp = fixture
        .client
        .get(fixture.url("/api/bookings"))
        .send()
        .await
        .unwrap();
    let bookings: Value = resp.json().await.unwrap();
    assert!(bookings.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_court_crud() {
    let fixture = TestFixture::new().await;

    // Empty name is rejected
    let resp = fixture
        .client
        .post(fixture.url("/api/courts"))
        .json(&json!({ "name": "  ", "pricePerHour": 15.00 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Create court
    let resp = fixture
        .client
        .post(fixture.url("/api/courts"))
        .json(&json!({
            "name": "Center Court",
            "description": "Main show court",
            "pricePerHour": 32.50
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let court: Value = resp.json().await.unwrap();
    let court_id = court["id"].as_i64().unwrap();
    assert_eq!(court["pricePerHour"], "32.50");
    assert_eq!(court["isActive"], true);

    // Update replaces all mutable fields
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/courts/{}", court_id)))
        .json(&json!({
            "name": "Center Court",
            "description": "Closed for resurfacing",
            "pricePerHour": 0.00,
            "isActive": false
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["isActive"], false);
    assert_eq!(updated["pricePerHour"], "0.00");

    // Delete court
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/courts/{}", court_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/courts/{}", court_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
