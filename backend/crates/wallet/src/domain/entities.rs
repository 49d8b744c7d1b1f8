//! Domain Entities
//!
//! Core business entities for the wallet domain.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_objects::{Delta, SenderName, TxnId};

/// User entity - subject of balance mutation.
///
/// `balance` is only ever written through the apply-delta path; every write
/// is paired with a [`LedgerEntry`].
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub balance: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// LedgerEntry entity - one immutable transfer-history record.
///
/// Append-only: once created it is never mutated or deleted.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub transaction_id: TxnId,
    pub user_id: UserId,
    pub balance_before: i64,
    pub balance_after: i64,
    pub amount_changed: i64,
    pub sender_name: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Record a delta applied to `user_id`. The before/after/amount triple is
    /// derived from one source so `amount_changed == balance_after - balance_before`
    /// holds by construction.
    pub fn record(user_id: UserId, balance_before: i64, delta: Delta, sender: &SenderName) -> Self {
        Self {
            transaction_id: TxnId::generate(),
            user_id,
            balance_before,
            balance_after: balance_before + delta.value(),
            amount_changed: delta.value(),
            sender_name: sender.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    /// The round-trip invariant every entry must satisfy.
    pub fn is_consistent(&self) -> bool {
        self.amount_changed == self.balance_after - self.balance_before
    }
}

/// Result of one balance mutation: the updated user and the ledger entry
/// committed alongside it.
#[derive(Debug, Clone)]
pub struct BalanceChange {
    pub user: User,
    pub entry: LedgerEntry,
}

/// A ledger entry joined with its subject user, for listings.
#[derive(Debug, Clone)]
pub struct TransferRecord {
    pub entry: LedgerEntry,
    pub user_name: String,
    pub email: String,
}

/// Aggregate totals over the user balance repository.
#[derive(Debug, Clone, Copy)]
pub struct WalletStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_balance: i64,
}
