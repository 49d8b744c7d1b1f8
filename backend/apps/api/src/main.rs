//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallet::{PgWalletRepository, QueryCache, WalletConfig, wallet_router};
use withdrawal::{PgWithdrawalRepository, WithdrawalConfig, withdrawal_router};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,wallet=info,withdrawal=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let wallet_repo = PgWalletRepository::new(pool.clone());
    let withdrawal_repo = PgWithdrawalRepository::new(pool.clone());

    // Startup sanity report: totals over the user table
    // Errors here should not prevent server startup
    {
        use wallet::domain::repository::UserQueryRepository;
        match wallet_repo.stats().await {
            Ok(stats) => {
                tracing::info!(
                    total_users = stats.total_users,
                    active_users = stats.active_users,
                    total_balance = stats.total_balance,
                    "Wallet state at startup"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Wallet startup report failed, continuing anyway"
                );
            }
        }
    }

    let wallet_config = WalletConfig::default();
    let withdrawal_config = WithdrawalConfig::default();

    // One cache handle for both routers, so a withdrawal refund can stale
    // the wallet projections it touched
    let cache = Arc::new(QueryCache::new(wallet_config.cache_ttl));

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/wallet",
            wallet_router(wallet_repo, wallet_config, cache.clone()),
        )
        .nest(
            "/api/withdrawals",
            withdrawal_router(withdrawal_repo, withdrawal_config, cache),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3002);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
