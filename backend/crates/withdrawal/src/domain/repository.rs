//! Repository Trait
//!
//! Interface for withdrawal persistence. Implementation is in
//! infrastructure layer.

use kernel::id::{UserId, WithdrawalId};

use crate::domain::entities::{Resolution, Withdrawal, WithdrawalStatus, WithdrawalWithUser};
use crate::error::WithdrawalResult;

/// Withdrawal listing parameters. Page is 1-based; limit is pre-clamped by
/// the application layer.
#[derive(Debug, Clone)]
pub struct WithdrawalQuery {
    pub status: Option<WithdrawalStatus>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl WithdrawalQuery {
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.limit as i64
    }
}

/// Withdrawal repository trait
#[trait_variant::make(WithdrawalRepository: Send)]
pub trait LocalWithdrawalRepository {
    /// Open a pending request, debiting the user and recording the debit in
    /// the ledger as one atomic unit. Fails when the balance cannot cover
    /// the amount.
    async fn create(&self, user_id: UserId, amount: i64) -> WithdrawalResult<Withdrawal>;

    /// Move a pending request to a terminal status exactly once. Failed and
    /// rejected refund the amount in the same transaction. A request that
    /// already left pending is reported, never re-resolved.
    async fn resolve(
        &self,
        withdrawal_id: WithdrawalId,
        resolution: Resolution,
    ) -> WithdrawalResult<Withdrawal>;

    /// Fetch one request joined with its user
    async fn find_with_user(
        &self,
        withdrawal_id: WithdrawalId,
    ) -> WithdrawalResult<Option<WithdrawalWithUser>>;

    /// Page of requests plus the total match count, newest first
    async fn list(
        &self,
        query: &WithdrawalQuery,
    ) -> WithdrawalResult<(Vec<WithdrawalWithUser>, u64)>;
}
