//! API DTOs (Data Transfer Objects)
//!
//! Response DTOs also derive `Deserialize` so they can round-trip through
//! the query cache. Pagination metadata is shared with the wallet API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use wallet::presentation::dto::PageMeta;

use crate::domain::entities::WithdrawalWithUser;

/// Request body for PUT /api/withdrawals/{id}/status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Query parameters for GET /api/withdrawals
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// One withdrawal request joined with its user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalDto {
    pub withdrawal_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub email: String,
    pub amount: i64,
    pub status: String,
    pub user_balance: i64,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<WithdrawalWithUser> for WithdrawalDto {
    fn from(joined: WithdrawalWithUser) -> Self {
        Self {
            withdrawal_id: joined.withdrawal.withdrawal_id.into_uuid(),
            user_id: joined.withdrawal.user_id.into_uuid(),
            user_name: joined.user_name,
            email: joined.email,
            amount: joined.withdrawal.amount,
            status: joined.withdrawal.status.code().to_string(),
            user_balance: joined.balance,
            created_at: joined.withdrawal.created_at,
            resolved_at: joined.withdrawal.resolved_at,
        }
    }
}

/// Response for GET /api/withdrawals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalListResponse {
    pub withdrawals: Vec<WithdrawalDto>,
    pub pagination: PageMeta,
}
