//! Request Withdrawal Use Case
//!
//! Opens a pending request on behalf of a user. The debit and its ledger
//! entry commit together with the request row; there is no HTTP surface for
//! this in the admin API, callers are internal.

use std::sync::Arc;

use kernel::id::UserId;
use wallet::{CacheScope, QueryCache};

use crate::domain::entities::Withdrawal;
use crate::domain::repository::WithdrawalRepository;
use crate::error::WithdrawalResult;

/// Request Withdrawal Use Case
pub struct RequestWithdrawalUseCase<R>
where
    R: WithdrawalRepository,
{
    repo: Arc<R>,
    cache: Arc<QueryCache>,
}

impl<R> RequestWithdrawalUseCase<R>
where
    R: WithdrawalRepository,
{
    pub fn new(repo: Arc<R>, cache: Arc<QueryCache>) -> Self {
        Self { repo, cache }
    }

    pub async fn execute(&self, user_id: UserId, amount: i64) -> WithdrawalResult<Withdrawal> {
        let withdrawal = self.repo.create(user_id, amount).await?;

        // The debit changed the balance and appended a ledger entry
        self.cache
            .invalidate(&[
                CacheScope::Withdrawals,
                CacheScope::Users,
                CacheScope::Transfers,
            ])
            .await;

        tracing::info!(
            withdrawal_id = %withdrawal.withdrawal_id,
            user_id = %user_id,
            amount = amount,
            "Withdrawal requested"
        );

        Ok(withdrawal)
    }
}
