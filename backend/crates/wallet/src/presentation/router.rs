//! Wallet Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::cache::QueryCache;
use crate::application::config::WalletConfig;
use crate::domain::repository::{BalanceRepository, LedgerRepository, UserQueryRepository};
use crate::infra::postgres::PgWalletRepository;
use crate::presentation::handlers::{self, WalletAppState};

/// Create the wallet router with PostgreSQL repository
pub fn wallet_router(
    repo: PgWalletRepository,
    config: WalletConfig,
    cache: Arc<QueryCache>,
) -> Router {
    wallet_router_generic(repo, config, cache)
}

/// Create a generic wallet router for any repository implementation
pub fn wallet_router_generic<R>(repo: R, config: WalletConfig, cache: Arc<QueryCache>) -> Router
where
    R: BalanceRepository
        + LedgerRepository
        + UserQueryRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = WalletAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        cache,
    };

    Router::new()
        .route("/balance/credit", post(handlers::credit_balance::<R>))
        .route("/balance/debit", post(handlers::debit_balance::<R>))
        .route("/ledger", get(handlers::list_ledger::<R>))
        .route("/users", get(handlers::list_users::<R>))
        .route("/users/{id}/ban", post(handlers::ban_user::<R>))
        .route("/users/{id}/unban", post(handlers::unban_user::<R>))
        .route("/stats", get(handlers::wallet_stats::<R>))
        .with_state(state)
}
