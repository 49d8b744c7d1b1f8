//! List Users Use Case

use std::sync::Arc;

use crate::application::config::WalletConfig;
use crate::domain::entities::User;
use crate::domain::repository::{SortOrder, UserQuery, UserQueryRepository, UserSortKey};
use crate::error::WalletResult;

/// Raw listing input as it arrives from the query string.
#[derive(Debug, Clone, Default)]
pub struct ListUsersInput {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListUsersInput {
    pub fn into_query(self, config: &WalletConfig) -> UserQuery {
        UserQuery {
            search: self.search.filter(|s| !s.trim().is_empty()),
            is_active: self.is_active,
            page: config.clamp_page(self.page),
            limit: config.clamp_limit(self.limit),
            sort_by: UserSortKey::parse(self.sort_by.as_deref()),
            sort_order: SortOrder::parse(self.sort_order.as_deref()),
        }
    }
}

/// List Users Use Case
pub struct ListUsersUseCase<U>
where
    U: UserQueryRepository,
{
    repo: Arc<U>,
    config: Arc<WalletConfig>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserQueryRepository,
{
    pub fn new(repo: Arc<U>, config: Arc<WalletConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        input: ListUsersInput,
    ) -> WalletResult<(UserQuery, Vec<User>, u64)> {
        let query = input.into_query(&self.config);
        let (users, total) = self.repo.list(&query).await?;
        Ok((query, users, total))
    }
}
