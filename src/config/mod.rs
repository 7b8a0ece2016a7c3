//! Configuration module for the courtclub backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fallback signing secret for development runs.
const DEV_JWT_SECRET: &str = "courtclub-dev-secret-change-me";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Secret used to sign session tokens
    pub jwt_secret: String,
    /// Session token lifetime in minutes
    pub token_ttl_minutes: i64,
    /// Email of the seeded admin account
    pub admin_email: String,
    /// Password of the seeded admin account
    pub admin_password: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("CLUB_DB_PATH")
            .unwrap_or_else(|_| "./data/club.sqlite".to_string())
            .into();

        let bind_addr = env::var("CLUB_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid CLUB_BIND_ADDR format");

        let log_level = env::var("CLUB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let jwt_secret =
            env::var("CLUB_JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());

        let token_ttl_minutes = env::var("CLUB_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1440);

        let admin_email =
            env::var("CLUB_ADMIN_EMAIL").unwrap_or_else(|_| "admin@club.local".to_string());

        let admin_password =
            env::var("CLUB_ADMIN_PASSWORD").unwrap_or_else(|_| "change-me".to_string());

        Self {
            db_path,
            bind_addr,
            log_level,
            jwt_secret,
            token_ttl_minutes,
            admin_email,
            admin_password,
        }
    }

    /// True when the signing secret is the built-in development fallback.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}
