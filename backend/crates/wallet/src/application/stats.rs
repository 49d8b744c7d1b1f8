//! Wallet Stats Use Case

use std::sync::Arc;

use crate::domain::entities::WalletStats;
use crate::domain::repository::UserQueryRepository;
use crate::error::WalletResult;

/// Wallet Stats Use Case - aggregate totals over the user repository
pub struct WalletStatsUseCase<U>
where
    U: UserQueryRepository,
{
    repo: Arc<U>,
}

impl<U> WalletStatsUseCase<U>
where
    U: UserQueryRepository,
{
    pub fn new(repo: Arc<U>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> WalletResult<WalletStats> {
        self.repo.stats().await
    }
}
