//! Courtclub Backend
//!
//! A booking/membership REST backend with SQLite persistence and a wallet
//! transaction ledger.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Courtclub Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.uses_dev_secret() {
        tracing::warn!("No CLUB_JWT_SECRET configured. Tokens are signed with the development secret!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Seed the admin account
    let admin_hash = auth::hash_password(&config.admin_password)?;
    repo.ensure_admin(&config.admin_email, &admin_hash).await?;
    tracing::info!("Admin account ready: {}", config.admin_email);

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the signing secret for the auth layer
    let secret = state.config.jwt_secret.clone();

    // Routes behind the bearer-token guard
    let protected_routes = Router::new()
        // Members and wallet
        .route("/members", get(api::list_members))
        .route("/members/{id}", get(api::get_member))
        .route("/members/{id}", put(api::update_member))
        .route("/members/{id}", delete(api::delete_member))
        .route("/members/{id}/topup", post(api::top_up))
        .route("/members/{id}/transactions", get(api::list_transactions))
        // Bookings
        .route("/bookings", get(api::list_bookings))
        .route("/bookings", post(api::create_booking))
        .route("/bookings/{id}", get(api::get_booking))
        .route("/bookings/{id}", put(api::update_booking))
        .route("/bookings/{id}", delete(api::delete_booking))
        // Courts
        .route("/courts", get(api::list_courts))
        .route("/courts", post(api::create_court))
        .route("/courts/{id}", get(api::get_court))
        .route("/courts/{id}", put(api::update_court))
        .route("/courts/{id}", delete(api::delete_court))
        // Apply bearer-token auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::bearer_auth_layer(secret.clone(), req, next)
        }));

    // Credential endpoints issue the tokens, so they sit outside the guard
    let auth_routes = Router::new()
        .route("/auth/login", post(api::login))
        .route("/auth/register", post(api::register));

    let api_routes = auth_routes.merge(protected_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
