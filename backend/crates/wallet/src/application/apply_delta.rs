//! Apply Balance Delta Use Case
//!
//! The single entry point for mutating a user balance. Every mutation is
//! committed together with its ledger entry by the repository; this layer
//! validates the amount, picks the sign, and invalidates cached projections.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::cache::{CacheScope, QueryCache};
use crate::domain::entities::BalanceChange;
use crate::domain::repository::BalanceRepository;
use crate::domain::value_objects::{Delta, SenderName};
use crate::error::{WalletError, WalletResult};

/// Apply Balance Delta Use Case
pub struct ApplyBalanceDeltaUseCase<R>
where
    R: BalanceRepository,
{
    repo: Arc<R>,
    cache: Arc<QueryCache>,
}

impl<R> ApplyBalanceDeltaUseCase<R>
where
    R: BalanceRepository,
{
    pub fn new(repo: Arc<R>, cache: Arc<QueryCache>) -> Self {
        Self { repo, cache }
    }

    /// Credit `amount` to the user. Rejects non-positive amounts.
    pub async fn credit(
        &self,
        user_id: UserId,
        amount: i64,
        sender: Option<String>,
    ) -> WalletResult<BalanceChange> {
        let delta = Delta::credit(amount).ok_or_else(|| {
            WalletError::InvalidAmount(format!("credit amount must be positive, got {amount}"))
        })?;
        self.execute(user_id, delta, SenderName::new(sender)).await
    }

    /// Debit `amount` from the user. Rejects non-positive amounts.
    pub async fn debit(
        &self,
        user_id: UserId,
        amount: i64,
        sender: Option<String>,
    ) -> WalletResult<BalanceChange> {
        let delta = Delta::debit(amount).ok_or_else(|| {
            WalletError::InvalidAmount(format!("debit amount must be positive, got {amount}"))
        })?;
        self.execute(user_id, delta, SenderName::new(sender)).await
    }

    /// Apply a pre-validated signed delta.
    pub async fn execute(
        &self,
        user_id: UserId,
        delta: Delta,
        sender: SenderName,
    ) -> WalletResult<BalanceChange> {
        let change = self.repo.apply_delta(user_id, delta, &sender).await?;

        // Projections of users and transfers are stale now
        self.cache
            .invalidate(&[CacheScope::Users, CacheScope::Transfers])
            .await;

        tracing::info!(
            user_id = %user_id,
            transaction_id = %change.entry.transaction_id,
            delta = %delta,
            balance_after = change.user.balance,
            sender = %sender,
            "Balance delta applied"
        );

        Ok(change)
    }
}
