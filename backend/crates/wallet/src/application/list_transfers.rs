//! List Transfers Use Case

use std::sync::Arc;

use crate::application::config::WalletConfig;
use crate::domain::entities::TransferRecord;
use crate::domain::repository::{LedgerQuery, LedgerRepository, LedgerSortKey, SortOrder};
use crate::error::WalletResult;

/// Raw listing input as it arrives from the query string.
#[derive(Debug, Clone, Default)]
pub struct ListTransfersInput {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListTransfersInput {
    /// Normalize into a repository query, clamping pagination.
    pub fn into_query(self, config: &WalletConfig) -> LedgerQuery {
        LedgerQuery {
            search: self.search.filter(|s| !s.trim().is_empty()),
            page: config.clamp_page(self.page),
            limit: config.clamp_limit(self.limit),
            sort_by: LedgerSortKey::parse(self.sort_by.as_deref()),
            sort_order: SortOrder::parse(self.sort_order.as_deref()),
        }
    }
}

/// List Transfers Use Case
pub struct ListTransfersUseCase<L>
where
    L: LedgerRepository,
{
    repo: Arc<L>,
    config: Arc<WalletConfig>,
}

impl<L> ListTransfersUseCase<L>
where
    L: LedgerRepository,
{
    pub fn new(repo: Arc<L>, config: Arc<WalletConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        input: ListTransfersInput,
    ) -> WalletResult<(LedgerQuery, Vec<TransferRecord>, u64)> {
        let query = input.into_query(&self.config);
        let (records, total) = self.repo.list(&query).await?;
        Ok((query, records, total))
    }
}
