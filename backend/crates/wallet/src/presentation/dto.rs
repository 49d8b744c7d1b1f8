//! API DTOs (Data Transfer Objects)
//!
//! Response DTOs also derive `Deserialize` so they can round-trip through
//! the query cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{BalanceChange, TransferRecord, User, WalletStats};

/// Request for POST /api/wallet/balance/credit and /balance/debit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceMutationRequest {
    pub user_id: Uuid,
    pub amount: i64,
    #[serde(default)]
    pub sender_name: Option<String>,
}

/// Response for balance mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChangeResponse {
    pub user_id: Uuid,
    pub user_name: String,
    pub transaction_id: String,
    pub balance_before: i64,
    pub balance_after: i64,
    pub amount_changed: i64,
    pub sender_name: String,
    pub timestamp: DateTime<Utc>,
}

impl From<BalanceChange> for BalanceChangeResponse {
    fn from(change: BalanceChange) -> Self {
        Self {
            user_id: change.user.user_id.into_uuid(),
            user_name: change.user.user_name,
            transaction_id: change.entry.transaction_id.into_string(),
            balance_before: change.entry.balance_before,
            balance_after: change.entry.balance_after,
            amount_changed: change.entry.amount_changed,
            sender_name: change.entry.sender_name,
            timestamp: change.entry.created_at,
        }
    }
}

/// Query parameters for GET /api/wallet/ledger
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerListParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Query parameters for GET /api/wallet/users
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Pagination metadata attached to every listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageMeta {
    pub fn compute(total_items: u64, page: u32, limit: u32) -> Self {
        let total_pages = (total_items.div_ceil(limit as u64)) as u32;
        Self {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// One ledger entry joined with its subject user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDto {
    pub transaction_id: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub email: String,
    pub balance_before: i64,
    pub balance_after: i64,
    pub amount_changed: i64,
    pub sender_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<TransferRecord> for TransferDto {
    fn from(record: TransferRecord) -> Self {
        Self {
            transaction_id: record.entry.transaction_id.into_string(),
            user_id: record.entry.user_id.into_uuid(),
            user_name: record.user_name,
            email: record.email,
            balance_before: record.entry.balance_before,
            balance_after: record.entry.balance_after,
            amount_changed: record.entry.amount_changed,
            sender_name: record.entry.sender_name,
            created_at: record.entry.created_at,
        }
    }
}

/// Response for GET /api/wallet/ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerListResponse {
    pub transfers: Vec<TransferDto>,
    pub pagination: PageMeta,
}

/// User summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: Uuid,
    pub user_name: String,
    pub email: String,
    pub balance: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id.into_uuid(),
            user_name: user.user_name,
            email: user.email,
            balance: user.balance,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response for GET /api/wallet/users
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
    pub pagination: PageMeta,
}

/// Response for GET /api/wallet/stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: u64,
    pub active_users: u64,
    pub total_balance: i64,
}

impl From<WalletStats> for StatsResponse {
    fn from(stats: WalletStats) -> Self {
        Self {
            total_users: stats.total_users,
            active_users: stats.active_users,
            total_balance: stats.total_balance,
        }
    }
}
