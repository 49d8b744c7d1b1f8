//! List Withdrawals Use Case

use std::sync::Arc;

use crate::application::config::WithdrawalConfig;
use crate::domain::entities::{WithdrawalStatus, WithdrawalWithUser};
use crate::domain::repository::{WithdrawalQuery, WithdrawalRepository};
use crate::error::{WithdrawalError, WithdrawalResult};

/// Raw listing input as it arrives from the query string.
#[derive(Debug, Clone, Default)]
pub struct ListWithdrawalsInput {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListWithdrawalsInput {
    /// Normalize into a repository query. An unknown status filter is an
    /// error, not an empty result.
    pub fn into_query(self, config: &WithdrawalConfig) -> WithdrawalResult<WithdrawalQuery> {
        let status = match self.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some("pending") => Some(WithdrawalStatus::Pending),
            Some("completed") => Some(WithdrawalStatus::Completed),
            Some("failed") => Some(WithdrawalStatus::Failed),
            Some("rejected") => Some(WithdrawalStatus::Rejected),
            Some(other) => return Err(WithdrawalError::InvalidStatus(other.to_string())),
        };

        Ok(WithdrawalQuery {
            status,
            search: self.search.filter(|s| !s.trim().is_empty()),
            page: config.clamp_page(self.page),
            limit: config.clamp_limit(self.limit),
        })
    }
}

/// List Withdrawals Use Case
pub struct ListWithdrawalsUseCase<R>
where
    R: WithdrawalRepository,
{
    repo: Arc<R>,
    config: Arc<WithdrawalConfig>,
}

impl<R> ListWithdrawalsUseCase<R>
where
    R: WithdrawalRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<WithdrawalConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        input: ListWithdrawalsInput,
    ) -> WithdrawalResult<(WithdrawalQuery, Vec<WithdrawalWithUser>, u64)> {
        let query = input.into_query(&self.config)?;
        let (withdrawals, total) = self.repo.list(&query).await?;
        Ok((query, withdrawals, total))
    }
}
