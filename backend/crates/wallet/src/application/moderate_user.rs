//! Moderate User Use Case
//!
//! Ban / unban toggles the `is_active` flag. Balance is untouched, so no
//! ledger entry is produced; only the user projections go stale.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::cache::{CacheScope, QueryCache};
use crate::domain::entities::User;
use crate::domain::repository::BalanceRepository;
use crate::error::{WalletError, WalletResult};

/// Moderate User Use Case
pub struct ModerateUserUseCase<R>
where
    R: BalanceRepository,
{
    repo: Arc<R>,
    cache: Arc<QueryCache>,
}

impl<R> ModerateUserUseCase<R>
where
    R: BalanceRepository,
{
    pub fn new(repo: Arc<R>, cache: Arc<QueryCache>) -> Self {
        Self { repo, cache }
    }

    pub async fn ban(&self, user_id: UserId) -> WalletResult<User> {
        self.set_active(user_id, false).await
    }

    pub async fn unban(&self, user_id: UserId) -> WalletResult<User> {
        self.set_active(user_id, true).await
    }

    async fn set_active(&self, user_id: UserId, active: bool) -> WalletResult<User> {
        let user = self
            .repo
            .set_active(user_id, active)
            .await?
            .ok_or(WalletError::UserNotFound)?;

        self.cache.invalidate(&[CacheScope::Users]).await;

        tracing::info!(user_id = %user_id, active = active, "User moderation applied");

        Ok(user)
    }
}
