//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use kernel::id::WithdrawalId;
use std::sync::Arc;
use uuid::Uuid;
use wallet::{CacheScope, QueryCache};

use crate::application::config::WithdrawalConfig;
use crate::application::list_withdrawals::{ListWithdrawalsInput, ListWithdrawalsUseCase};
use crate::application::resolve::ResolveWithdrawalUseCase;
use crate::domain::repository::WithdrawalRepository;
use crate::error::WithdrawalResult;
use crate::presentation::dto::{
    PageMeta, UpdateStatusRequest, WithdrawalDto, WithdrawalListParams, WithdrawalListResponse,
};

/// Shared state for withdrawal handlers
#[derive(Clone)]
pub struct WithdrawalAppState<R>
where
    R: WithdrawalRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<WithdrawalConfig>,
    pub cache: Arc<QueryCache>,
}

/// GET /api/withdrawals
pub async fn list_withdrawals<R>(
    State(state): State<WithdrawalAppState<R>>,
    Query(params): Query<WithdrawalListParams>,
) -> WithdrawalResult<Json<WithdrawalListResponse>>
where
    R: WithdrawalRepository + Clone + Send + Sync + 'static,
{
    let key = withdrawal_cache_key(&params);
    if let Some(hit) = state
        .cache
        .get::<WithdrawalListResponse>(CacheScope::Withdrawals, &key)
        .await
    {
        return Ok(Json(hit));
    }

    let use_case = ListWithdrawalsUseCase::new(state.repo.clone(), state.config.clone());

    let input = ListWithdrawalsInput {
        status: params.status.clone(),
        search: params.search.clone(),
        page: params.page,
        limit: params.limit,
    };

    let (query, withdrawals, total) = use_case.execute(input).await?;

    let response = WithdrawalListResponse {
        withdrawals: withdrawals.into_iter().map(Into::into).collect(),
        pagination: PageMeta::compute(total, query.page, query.limit),
    };

    state
        .cache
        .put(CacheScope::Withdrawals, &key, &response)
        .await;

    Ok(Json(response))
}

/// PUT /api/withdrawals/{id}/status
pub async fn update_withdrawal_status<R>(
    State(state): State<WithdrawalAppState<R>>,
    Path(withdrawal_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> WithdrawalResult<Json<WithdrawalDto>>
where
    R: WithdrawalRepository + Clone + Send + Sync + 'static,
{
    let use_case = ResolveWithdrawalUseCase::new(state.repo.clone(), state.cache.clone());

    let joined = use_case
        .execute(WithdrawalId::from_uuid(withdrawal_id), &req.status)
        .await?;

    Ok(Json(joined.into()))
}

fn withdrawal_cache_key(params: &WithdrawalListParams) -> String {
    format!(
        "list|{}|{}|{}|{}",
        params.status.as_deref().unwrap_or(""),
        params.search.as_deref().unwrap_or(""),
        params.page.unwrap_or(1),
        params.limit.unwrap_or(0),
    )
}
