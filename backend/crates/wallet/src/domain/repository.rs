//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entities::{BalanceChange, TransferRecord, User, WalletStats};
use crate::domain::value_objects::{Delta, SenderName};
use crate::error::WalletResult;

/// Sort direction for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Parse a query-string value; anything but "asc" means descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(v) if v.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Whitelisted sort keys for the ledger listing. Keeps user input out of
/// the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerSortKey {
    #[default]
    CreatedAt,
    AmountChanged,
    BalanceAfter,
}

impl LedgerSortKey {
    pub fn as_column(&self) -> &'static str {
        match self {
            LedgerSortKey::CreatedAt => "t.created_at",
            LedgerSortKey::AmountChanged => "t.amount_changed",
            LedgerSortKey::BalanceAfter => "t.balance_after",
        }
    }

    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("amountChanged") => LedgerSortKey::AmountChanged,
            Some("balanceAfter") => LedgerSortKey::BalanceAfter,
            _ => LedgerSortKey::CreatedAt,
        }
    }
}

/// Whitelisted sort keys for the user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortKey {
    #[default]
    CreatedAt,
    UserName,
    Balance,
}

impl UserSortKey {
    pub fn as_column(&self) -> &'static str {
        match self {
            UserSortKey::CreatedAt => "created_at",
            UserSortKey::UserName => "user_name",
            UserSortKey::Balance => "balance",
        }
    }

    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("userName") => UserSortKey::UserName,
            Some("balance") => UserSortKey::Balance,
            _ => UserSortKey::CreatedAt,
        }
    }
}

/// Ledger listing parameters. Page is 1-based; limit is pre-clamped by the
/// application layer.
#[derive(Debug, Clone)]
pub struct LedgerQuery {
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: LedgerSortKey,
    pub sort_order: SortOrder,
}

impl LedgerQuery {
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.limit as i64
    }
}

/// User listing parameters.
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: UserSortKey,
    pub sort_order: SortOrder,
}

impl UserQuery {
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.limit as i64
    }
}

/// Balance repository trait - the only write path to a user balance
#[trait_variant::make(BalanceRepository: Send)]
pub trait LocalBalanceRepository {
    /// Fetch a single user
    async fn find_user(&self, user_id: UserId) -> WalletResult<Option<User>>;

    /// Apply a signed delta and append the matching ledger entry as one
    /// atomic unit. Must never commit one side without the other, and must
    /// not lose concurrent updates to the same user.
    async fn apply_delta(
        &self,
        user_id: UserId,
        delta: Delta,
        sender: &SenderName,
    ) -> WalletResult<BalanceChange>;

    /// Set the ban flag. Does not touch balance.
    async fn set_active(&self, user_id: UserId, active: bool) -> WalletResult<Option<User>>;
}

/// Ledger repository trait - read-side projection over transfer history
#[trait_variant::make(LedgerRepository: Send)]
pub trait LocalLedgerRepository {
    /// Page of committed entries plus the total match count
    async fn list(&self, query: &LedgerQuery) -> WalletResult<(Vec<TransferRecord>, u64)>;
}

/// User query repository trait - read-side projection over users
#[trait_variant::make(UserQueryRepository: Send)]
pub trait LocalUserQueryRepository {
    /// Page of users plus the total match count
    async fn list(&self, query: &UserQuery) -> WalletResult<(Vec<User>, u64)>;

    /// Aggregate totals
    async fn stats(&self) -> WalletResult<WalletStats>;
}
