//! Resolve Withdrawal Use Case
//!
//! Moves a pending request to a terminal status. The repository guarantees
//! exactly-once resolution and the transactional refund; this layer parses
//! the requested status and invalidates the projections the outcome touched.

use std::sync::Arc;

use kernel::id::WithdrawalId;
use wallet::{CacheScope, QueryCache};

use crate::domain::entities::{Resolution, WithdrawalWithUser};
use crate::domain::repository::WithdrawalRepository;
use crate::error::{WithdrawalError, WithdrawalResult};

/// Resolve Withdrawal Use Case
pub struct ResolveWithdrawalUseCase<R>
where
    R: WithdrawalRepository,
{
    repo: Arc<R>,
    cache: Arc<QueryCache>,
}

impl<R> ResolveWithdrawalUseCase<R>
where
    R: WithdrawalRepository,
{
    pub fn new(repo: Arc<R>, cache: Arc<QueryCache>) -> Self {
        Self { repo, cache }
    }

    pub async fn execute(
        &self,
        withdrawal_id: WithdrawalId,
        raw_status: &str,
    ) -> WithdrawalResult<WithdrawalWithUser> {
        let resolution = Resolution::parse(raw_status)
            .ok_or_else(|| WithdrawalError::InvalidStatus(raw_status.to_string()))?;

        let withdrawal = self.repo.resolve(withdrawal_id, resolution).await?;

        // A refund changes the user balance and appends a ledger entry, so
        // those projections go stale too. A completion touches only the
        // withdrawal listing.
        if resolution.refunds() {
            self.cache
                .invalidate(&[
                    CacheScope::Withdrawals,
                    CacheScope::Users,
                    CacheScope::Transfers,
                ])
                .await;
        } else {
            self.cache.invalidate(&[CacheScope::Withdrawals]).await;
        }

        tracing::info!(
            withdrawal_id = %withdrawal_id,
            status = %withdrawal.status,
            refunded = resolution.refunds(),
            amount = withdrawal.amount,
            "Withdrawal resolved"
        );

        self.repo
            .find_with_user(withdrawal.withdrawal_id)
            .await?
            .ok_or(WithdrawalError::NotFound)
    }
}
