//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use kernel::id::UserId;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::apply_delta::ApplyBalanceDeltaUseCase;
use crate::application::cache::{CacheScope, QueryCache};
use crate::application::config::WalletConfig;
use crate::application::list_transfers::{ListTransfersInput, ListTransfersUseCase};
use crate::application::list_users::{ListUsersInput, ListUsersUseCase};
use crate::application::moderate_user::ModerateUserUseCase;
use crate::application::stats::WalletStatsUseCase;
use crate::domain::repository::{BalanceRepository, LedgerRepository, UserQueryRepository};
use crate::error::WalletResult;
use crate::presentation::dto::{
    BalanceChangeResponse, BalanceMutationRequest, LedgerListParams, LedgerListResponse, PageMeta,
    StatsResponse, UserDto, UserListParams, UserListResponse,
};

/// Shared state for wallet handlers
#[derive(Clone)]
pub struct WalletAppState<R>
where
    R: BalanceRepository
        + LedgerRepository
        + UserQueryRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<WalletConfig>,
    pub cache: Arc<QueryCache>,
}

/// POST /api/wallet/balance/credit
pub async fn credit_balance<R>(
    State(state): State<WalletAppState<R>>,
    Json(req): Json<BalanceMutationRequest>,
) -> WalletResult<Json<BalanceChangeResponse>>
where
    R: BalanceRepository
        + LedgerRepository
        + UserQueryRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ApplyBalanceDeltaUseCase::new(state.repo.clone(), state.cache.clone());

    let change = use_case
        .credit(UserId::from_uuid(req.user_id), req.amount, req.sender_name)
        .await?;

    Ok(Json(change.into()))
}

/// POST /api/wallet/balance/debit
pub async fn debit_balance<R>(
    State(state): State<WalletAppState<R>>,
    Json(req): Json<BalanceMutationRequest>,
) -> WalletResult<Json<BalanceChangeResponse>>
where
    R: BalanceRepository
        + LedgerRepository
        + UserQueryRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ApplyBalanceDeltaUseCase::new(state.repo.clone(), state.cache.clone());

    let change = use_case
        .debit(UserId::from_uuid(req.user_id), req.amount, req.sender_name)
        .await?;

    Ok(Json(change.into()))
}

/// GET /api/wallet/ledger
pub async fn list_ledger<R>(
    State(state): State<WalletAppState<R>>,
    Query(params): Query<LedgerListParams>,
) -> WalletResult<Json<LedgerListResponse>>
where
    R: BalanceRepository
        + LedgerRepository
        + UserQueryRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let key = ledger_cache_key(&params);
    if let Some(hit) = state
        .cache
        .get::<LedgerListResponse>(CacheScope::Transfers, &key)
        .await
    {
        return Ok(Json(hit));
    }

    let use_case = ListTransfersUseCase::new(state.repo.clone(), state.config.clone());

    let input = ListTransfersInput {
        search: params.search,
        page: params.page,
        limit: params.limit,
        sort_by: params.sort_by,
        sort_order: params.sort_order,
    };

    let (query, records, total) = use_case.execute(input).await?;

    let response = LedgerListResponse {
        transfers: records.into_iter().map(Into::into).collect(),
        pagination: PageMeta::compute(total, query.page, query.limit),
    };

    state
        .cache
        .put(CacheScope::Transfers, &key, &response)
        .await;

    Ok(Json(response))
}

/// GET /api/wallet/users
pub async fn list_users<R>(
    State(state): State<WalletAppState<R>>,
    Query(params): Query<UserListParams>,
) -> WalletResult<Json<UserListResponse>>
where
    R: BalanceRepository
        + LedgerRepository
        + UserQueryRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let key = user_cache_key(&params);
    if let Some(hit) = state
        .cache
        .get::<UserListResponse>(CacheScope::Users, &key)
        .await
    {
        return Ok(Json(hit));
    }

    let use_case = ListUsersUseCase::new(state.repo.clone(), state.config.clone());

    let input = ListUsersInput {
        search: params.search,
        is_active: params.is_active,
        page: params.page,
        limit: params.limit,
        sort_by: params.sort_by,
        sort_order: params.sort_order,
    };

    let (query, users, total) = use_case.execute(input).await?;

    let response = UserListResponse {
        users: users.into_iter().map(Into::into).collect(),
        pagination: PageMeta::compute(total, query.page, query.limit),
    };

    state.cache.put(CacheScope::Users, &key, &response).await;

    Ok(Json(response))
}

/// POST /api/wallet/users/{id}/ban
pub async fn ban_user<R>(
    State(state): State<WalletAppState<R>>,
    Path(user_id): Path<Uuid>,
) -> WalletResult<Json<UserDto>>
where
    R: BalanceRepository
        + LedgerRepository
        + UserQueryRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ModerateUserUseCase::new(state.repo.clone(), state.cache.clone());
    let user = use_case.ban(UserId::from_uuid(user_id)).await?;
    Ok(Json(user.into()))
}

/// POST /api/wallet/users/{id}/unban
pub async fn unban_user<R>(
    State(state): State<WalletAppState<R>>,
    Path(user_id): Path<Uuid>,
) -> WalletResult<Json<UserDto>>
where
    R: BalanceRepository
        + LedgerRepository
        + UserQueryRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ModerateUserUseCase::new(state.repo.clone(), state.cache.clone());
    let user = use_case.unban(UserId::from_uuid(user_id)).await?;
    Ok(Json(user.into()))
}

/// GET /api/wallet/stats
pub async fn wallet_stats<R>(
    State(state): State<WalletAppState<R>>,
) -> WalletResult<Json<StatsResponse>>
where
    R: BalanceRepository
        + LedgerRepository
        + UserQueryRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    const KEY: &str = "stats";

    if let Some(hit) = state
        .cache
        .get::<StatsResponse>(CacheScope::Users, KEY)
        .await
    {
        return Ok(Json(hit));
    }

    let use_case = WalletStatsUseCase::new(state.repo.clone());
    let stats = use_case.execute().await?;

    let response = StatsResponse::from(stats);
    state.cache.put(CacheScope::Users, KEY, &response).await;

    Ok(Json(response))
}

fn ledger_cache_key(params: &LedgerListParams) -> String {
    format!(
        "ledger|{}|{}|{}|{}|{}",
        params.search.as_deref().unwrap_or(""),
        params.page.unwrap_or(1),
        params.limit.unwrap_or(0),
        params.sort_by.as_deref().unwrap_or(""),
        params.sort_order.as_deref().unwrap_or(""),
    )
}

fn user_cache_key(params: &UserListParams) -> String {
    format!(
        "list|{}|{}|{}|{}|{}|{}",
        params.search.as_deref().unwrap_or(""),
        params
            .is_active
            .map(|b| b.to_string())
            .unwrap_or_default(),
        params.page.unwrap_or(1),
        params.limit.unwrap_or(0),
        params.sort_by.as_deref().unwrap_or(""),
        params.sort_order.as_deref().unwrap_or(""),
    )
}
