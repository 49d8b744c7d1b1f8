//! Withdrawal Router

use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;
use wallet::QueryCache;

use crate::application::config::WithdrawalConfig;
use crate::domain::repository::WithdrawalRepository;
use crate::infra::postgres::PgWithdrawalRepository;
use crate::presentation::handlers::{self, WithdrawalAppState};

/// Create the withdrawal router with PostgreSQL repository
pub fn withdrawal_router(
    repo: PgWithdrawalRepository,
    config: WithdrawalConfig,
    cache: Arc<QueryCache>,
) -> Router {
    withdrawal_router_generic(repo, config, cache)
}

/// Create a generic withdrawal router for any repository implementation
pub fn withdrawal_router_generic<R>(
    repo: R,
    config: WithdrawalConfig,
    cache: Arc<QueryCache>,
) -> Router
where
    R: WithdrawalRepository + Clone + Send + Sync + 'static,
{
    let state = WithdrawalAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        cache,
    };

    Router::new()
        .route("/", get(handlers::list_withdrawals::<R>))
        .route("/{id}/status", put(handlers::update_withdrawal_status::<R>))
        .with_state(state)
}
