//! Unit tests for the wallet crate
//!
//! Use cases are exercised against an in-memory repository that mirrors the
//! PostgreSQL implementation's contract: the balance increment and the
//! ledger append happen under one lock, all or nothing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entities::{BalanceChange, LedgerEntry, TransferRecord, User, WalletStats};
use crate::domain::repository::{
    BalanceRepository, LedgerQuery, LedgerRepository, UserQuery, UserQueryRepository,
};
use crate::domain::value_objects::{Delta, SenderName};
use crate::error::{WalletError, WalletResult};

// ============================================================================
// In-memory repository double
// ============================================================================

#[derive(Default)]
struct InMemState {
    users: HashMap<Uuid, User>,
    ledger: Vec<LedgerEntry>,
}

#[derive(Clone, Default)]
pub(crate) struct InMemWallet {
    inner: Arc<Mutex<InMemState>>,
}

impl InMemWallet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_user(&self, name: &str, email: &str, balance: i64) -> UserId {
        let user_id = UserId::new();
        let now = Utc::now();
        let user = User {
            user_id,
            user_name: name.to_string(),
            email: email.to_string(),
            balance,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(user_id.into_uuid(), user);
        user_id
    }

    pub(crate) fn ledger_len(&self) -> usize {
        self.inner.lock().unwrap().ledger.len()
    }

    pub(crate) fn ledger_sum_for(&self, user_id: UserId) -> i64 {
        self.inner
            .lock()
            .unwrap()
            .ledger
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.amount_changed)
            .sum()
    }

    pub(crate) fn entries_for(&self, user_id: UserId) -> Vec<LedgerEntry> {
        self.inner
            .lock()
            .unwrap()
            .ledger
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl BalanceRepository for InMemWallet {
    async fn find_user(&self, user_id: UserId) -> WalletResult<Option<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .get(user_id.as_uuid())
            .cloned())
    }

    async fn apply_delta(
        &self,
        user_id: UserId,
        delta: Delta,
        sender: &SenderName,
    ) -> WalletResult<BalanceChange> {
        // One lock for the whole mutation, like one database transaction
        let mut state = self.inner.lock().unwrap();

        let user = state
            .users
            .get_mut(user_id.as_uuid())
            .ok_or(WalletError::UserNotFound)?;

        let before = user.balance;
        if before + delta.value() < 0 {
            return Err(WalletError::InsufficientBalance {
                balance: before,
                amount: -delta.value(),
            });
        }
        user.balance += delta.value();
        user.updated_at = Utc::now();
        let updated = user.clone();

        let entry = LedgerEntry::record(user_id, before, delta, sender);
        state.ledger.push(entry.clone());

        Ok(BalanceChange {
            user: updated,
            entry,
        })
    }

    async fn set_active(&self, user_id: UserId, active: bool) -> WalletResult<Option<User>> {
        let mut state = self.inner.lock().unwrap();
        Ok(state.users.get_mut(user_id.as_uuid()).map(|user| {
            user.is_active = active;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

impl LedgerRepository for InMemWallet {
    async fn list(&self, query: &LedgerQuery) -> WalletResult<(Vec<TransferRecord>, u64)> {
        let state = self.inner.lock().unwrap();

        let mut records: Vec<TransferRecord> = state
            .ledger
            .iter()
            .filter(|e| match &query.search {
                Some(s) => {
                    e.transaction_id.as_str().contains(s.as_str())
                        || e.sender_name.contains(s.as_str())
                }
                None => true,
            })
            .map(|e| {
                let user = state.users.get(e.user_id.as_uuid());
                TransferRecord {
                    entry: e.clone(),
                    user_name: user.map(|u| u.user_name.clone()).unwrap_or_default(),
                    email: user.map(|u| u.email.clone()).unwrap_or_default(),
                }
            })
            .collect();

        records.sort_by(|a, b| b.entry.created_at.cmp(&a.entry.created_at));

        let total = records.len() as u64;
        let page = records
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok((page, total))
    }
}

impl UserQueryRepository for InMemWallet {
    async fn list(&self, query: &UserQuery) -> WalletResult<(Vec<User>, u64)> {
        let state = self.inner.lock().unwrap();

        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| match &query.search {
                Some(s) => u.user_name.contains(s.as_str()) || u.email.contains(s.as_str()),
                None => true,
            })
            .filter(|u| query.is_active.is_none_or(|active| u.is_active == active))
            .cloned()
            .collect();

        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = users.len() as u64;
        let page = users
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn stats(&self) -> WalletResult<WalletStats> {
        let state = self.inner.lock().unwrap();
        Ok(WalletStats {
            total_users: state.users.len() as u64,
            active_users: state.users.values().filter(|u| u.is_active).count() as u64,
            total_balance: state.users.values().map(|u| u.balance).sum(),
        })
    }
}

// ============================================================================
// Value object tests
// ============================================================================

mod value_object_tests {
    use crate::domain::value_objects::{Delta, SenderName, TxnId};

    #[test]
    fn test_delta_rejects_zero() {
        assert!(Delta::new(0).is_none());
        assert!(Delta::new(1).is_some());
        assert!(Delta::new(-1).is_some());
    }

    #[test]
    fn test_delta_credit_debit_signs() {
        let credit = Delta::credit(25).unwrap();
        assert_eq!(credit.value(), 25);
        assert!(credit.is_credit());

        let debit = Delta::debit(25).unwrap();
        assert_eq!(debit.value(), -25);
        assert!(!debit.is_credit());

        assert!(Delta::credit(0).is_none());
        assert!(Delta::credit(-5).is_none());
        assert!(Delta::debit(0).is_none());
        assert!(Delta::debit(-5).is_none());
    }

    #[test]
    fn test_txn_id_format() {
        let id = TxnId::generate();
        let raw = id.as_str();

        assert!(raw.starts_with("TXN_"));

        let parts: Vec<&str> = raw.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 6);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_txn_id_uniqueness() {
        let a = TxnId::generate();
        let b = TxnId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sender_name_default() {
        assert_eq!(SenderName::new(None).as_str(), "System");
        assert_eq!(SenderName::new(Some("".into())).as_str(), "System");
        assert_eq!(SenderName::new(Some("   ".into())).as_str(), "System");
        assert_eq!(SenderName::system().as_str(), "System");
    }

    #[test]
    fn test_sender_name_trims_and_truncates() {
        assert_eq!(SenderName::new(Some("  Admin  ".into())).as_str(), "Admin");

        let long = "x".repeat(200);
        assert_eq!(SenderName::new(Some(long)).as_str().len(), 64);
    }
}

// ============================================================================
// Entity tests
// ============================================================================

mod entity_tests {
    use kernel::id::UserId;

    use crate::domain::entities::LedgerEntry;
    use crate::domain::value_objects::{Delta, SenderName};

    #[test]
    fn test_ledger_entry_consistency_by_construction() {
        let credit = LedgerEntry::record(
            UserId::new(),
            50,
            Delta::credit(25).unwrap(),
            &SenderName::system(),
        );
        assert_eq!(credit.balance_before, 50);
        assert_eq!(credit.balance_after, 75);
        assert_eq!(credit.amount_changed, 25);
        assert!(credit.is_consistent());

        let debit = LedgerEntry::record(
            UserId::new(),
            50,
            Delta::debit(30).unwrap(),
            &SenderName::system(),
        );
        assert_eq!(debit.balance_after, 20);
        assert_eq!(debit.amount_changed, -30);
        assert!(debit.is_consistent());
    }
}

// ============================================================================
// Apply delta use case tests
// ============================================================================

mod apply_delta_tests {
    use super::*;
    use crate::application::apply_delta::ApplyBalanceDeltaUseCase;
    use crate::application::cache::{CacheScope, QueryCache};
    use std::time::Duration;

    fn use_case(repo: &InMemWallet) -> ApplyBalanceDeltaUseCase<InMemWallet> {
        ApplyBalanceDeltaUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(QueryCache::new(Duration::from_secs(300))),
        )
    }

    #[tokio::test]
    async fn test_credit_scenario() {
        // Balance 50, credit +25 from "Admin"
        let repo = InMemWallet::new();
        let user_id = repo.add_user("alice", "alice@example.com", 50);

        let change = use_case(&repo)
            .credit(user_id, 25, Some("Admin".into()))
            .await
            .unwrap();

        assert_eq!(change.entry.balance_before, 50);
        assert_eq!(change.entry.balance_after, 75);
        assert_eq!(change.entry.amount_changed, 25);
        assert_eq!(change.entry.sender_name, "Admin");
        assert_eq!(change.user.balance, 75);
        assert_eq!(repo.ledger_len(), 1);
    }

    #[tokio::test]
    async fn test_delta_sequence_sums() {
        let repo = InMemWallet::new();
        let user_id = repo.add_user("bob", "bob@example.com", 100);
        let uc = use_case(&repo);

        let deltas: [i64; 5] = [10, -40, 3, -3, 30];
        for d in deltas {
            let delta = Delta::new(d).unwrap();
            uc.execute(user_id, delta, SenderName::system()).await.unwrap();
        }

        let user = repo.find_user(user_id).await.unwrap().unwrap();
        let expected: i64 = deltas.iter().sum();
        assert_eq!(user.balance, 100 + expected);

        // Exactly n entries, summing to the same total, each consistent
        let entries = repo.entries_for(user_id);
        assert_eq!(entries.len(), deltas.len());
        assert_eq!(repo.ledger_sum_for(user_id), expected);
        assert!(entries.iter().all(|e| e.is_consistent()));
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amounts() {
        let repo = InMemWallet::new();
        let user_id = repo.add_user("carol", "carol@example.com", 0);
        let uc = use_case(&repo);

        for amount in [0, -10] {
            let err = uc.credit(user_id, amount, None).await.unwrap_err();
            assert!(matches!(err, WalletError::InvalidAmount(_)));

            let err = uc.debit(user_id, amount, None).await.unwrap_err();
            assert!(matches!(err, WalletError::InvalidAmount(_)));
        }

        // Nothing was written
        assert_eq!(repo.ledger_len(), 0);
        assert_eq!(repo.find_user(user_id).await.unwrap().unwrap().balance, 0);
    }

    #[tokio::test]
    async fn test_debit_cannot_overdraw() {
        let repo = InMemWallet::new();
        let user_id = repo.add_user("oliver", "oliver@example.com", 10);
        let uc = use_case(&repo);

        let err = uc.debit(user_id, 40, None).await.unwrap_err();
        assert!(matches!(
            err,
            WalletError::InsufficientBalance {
                balance: 10,
                amount: 40
            }
        ));

        // Balance floor held, nothing was written
        assert_eq!(repo.find_user(user_id).await.unwrap().unwrap().balance, 10);
        assert_eq!(repo.ledger_len(), 0);

        // Draining to exactly zero is allowed
        let change = uc.debit(user_id, 10, None).await.unwrap();
        assert_eq!(change.user.balance, 0);
        assert_eq!(change.entry.balance_after, 0);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let repo = InMemWallet::new();
        let err = use_case(&repo)
            .credit(UserId::new(), 10, None)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::UserNotFound));
        assert_eq!(repo.ledger_len(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_credits_lose_nothing() {
        let repo = InMemWallet::new();
        let user_id = repo.add_user("dave", "dave@example.com", 0);
        let uc = Arc::new(use_case(&repo));

        let mut handles = Vec::with_capacity(100);
        for _ in 0..100 {
            let uc = uc.clone();
            handles.push(tokio::spawn(async move {
                uc.credit(user_id, 1, None).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let user = repo.find_user(user_id).await.unwrap().unwrap();
        assert_eq!(user.balance, 100);
        assert_eq!(repo.ledger_len(), 100);
        assert_eq!(repo.ledger_sum_for(user_id), 100);
    }

    #[tokio::test]
    async fn test_mutation_invalidates_touched_scopes_only() {
        let repo = InMemWallet::new();
        let user_id = repo.add_user("erin", "erin@example.com", 0);

        let cache = Arc::new(QueryCache::new(Duration::from_secs(300)));
        cache.put(CacheScope::Users, "list", &1u32).await;
        cache.put(CacheScope::Transfers, "ledger", &2u32).await;
        cache.put(CacheScope::Withdrawals, "list", &3u32).await;

        let uc = ApplyBalanceDeltaUseCase::new(Arc::new(repo), cache.clone());
        uc.credit(user_id, 5, None).await.unwrap();

        assert_eq!(cache.get::<u32>(CacheScope::Users, "list").await, None);
        assert_eq!(cache.get::<u32>(CacheScope::Transfers, "ledger").await, None);
        assert_eq!(
            cache.get::<u32>(CacheScope::Withdrawals, "list").await,
            Some(3)
        );
    }
}

// ============================================================================
// Moderation and listing tests
// ============================================================================

mod query_tests {
    use super::*;
    use crate::application::cache::QueryCache;
    use crate::application::config::WalletConfig;
    use crate::application::list_transfers::{ListTransfersInput, ListTransfersUseCase};
    use crate::application::list_users::{ListUsersInput, ListUsersUseCase};
    use crate::application::moderate_user::ModerateUserUseCase;
    use crate::application::stats::WalletStatsUseCase;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ban_unban_roundtrip() {
        let repo = InMemWallet::new();
        let user_id = repo.add_user("frank", "frank@example.com", 10);
        let uc = ModerateUserUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(QueryCache::new(Duration::from_secs(300))),
        );

        let banned = uc.ban(user_id).await.unwrap();
        assert!(!banned.is_active);
        // Balance untouched, no ledger entry
        assert_eq!(banned.balance, 10);
        assert_eq!(repo.ledger_len(), 0);

        let unbanned = uc.unban(user_id).await.unwrap();
        assert!(unbanned.is_active);

        let err = uc.ban(UserId::new()).await.unwrap_err();
        assert!(matches!(err, WalletError::UserNotFound));
    }

    #[tokio::test]
    async fn test_list_transfers_pagination() {
        let repo = InMemWallet::new();
        let user_id = repo.add_user("grace", "grace@example.com", 0);

        for _ in 0..7 {
            repo.apply_delta(user_id, Delta::credit(1).unwrap(), &SenderName::system())
                .await
                .unwrap();
        }

        let uc = ListTransfersUseCase::new(
            Arc::new(repo),
            Arc::new(WalletConfig::default()),
        );

        let (query, records, total) = uc
            .execute(ListTransfersInput {
                page: Some(2),
                limit: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(total, 7);
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 3);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].user_name, "grace");
    }

    #[tokio::test]
    async fn test_list_users_filters() {
        let repo = InMemWallet::new();
        let a = repo.add_user("henry", "henry@example.com", 1);
        let _b = repo.add_user("iris", "iris@example.com", 2);
        repo.set_active(a, false).await.unwrap();

        let uc = ListUsersUseCase::new(Arc::new(repo), Arc::new(WalletConfig::default()));

        let (_, users, total) = uc
            .execute(ListUsersInput {
                is_active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(users[0].user_name, "iris");

        let (_, users, total) = uc
            .execute(ListUsersInput {
                search: Some("henry".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(users[0].user_name, "henry");
    }

    #[tokio::test]
    async fn test_stats_totals() {
        let repo = InMemWallet::new();
        let a = repo.add_user("jack", "jack@example.com", 40);
        repo.add_user("kate", "kate@example.com", 2);
        repo.set_active(a, false).await.unwrap();

        let stats = WalletStatsUseCase::new(Arc::new(repo)).execute().await.unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.active_users, 1);
        assert_eq!(stats.total_balance, 42);
    }
}

// ============================================================================
// Cache tests
// ============================================================================

mod cache_tests {
    use crate::application::cache::{CacheScope, QueryCache};
    use std::time::Duration;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put(CacheScope::Users, "k", &vec![1u32, 2, 3]).await;
        assert_eq!(
            cache.get::<Vec<u32>>(CacheScope::Users, "k").await,
            Some(vec![1, 2, 3])
        );
        // Same key in a different scope is a different entry
        assert_eq!(cache.get::<Vec<u32>>(CacheScope::Transfers, "k").await, None);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = QueryCache::new(Duration::ZERO);
        cache.put(CacheScope::Users, "k", &1u32).await;
        assert_eq!(cache.get::<u32>(CacheScope::Users, "k").await, None);
        // Expired entry was dropped
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_scope_invalidation_is_precise() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put(CacheScope::Users, "a", &1u32).await;
        cache.put(CacheScope::Transfers, "b", &2u32).await;
        cache.put(CacheScope::Withdrawals, "c", &3u32).await;

        cache
            .invalidate(&[CacheScope::Users, CacheScope::Transfers])
            .await;

        assert_eq!(cache.get::<u32>(CacheScope::Users, "a").await, None);
        assert_eq!(cache.get::<u32>(CacheScope::Transfers, "b").await, None);
        assert_eq!(cache.get::<u32>(CacheScope::Withdrawals, "c").await, Some(3));
        assert_eq!(cache.len().await, 1);
    }
}

// ============================================================================
// DTO and config tests
// ============================================================================

mod dto_tests {
    use crate::application::config::WalletConfig;
    use crate::presentation::dto::{BalanceMutationRequest, PageMeta};

    #[test]
    fn test_page_meta_compute() {
        let meta = PageMeta::compute(25, 2, 10);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_items, 25);
        assert!(meta.has_next_page);
        assert!(meta.has_prev_page);

        let meta = PageMeta::compute(0, 1, 10);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn test_mutation_request_deserialization() {
        let json = r#"{"userId":"00000000-0000-0000-0000-000000000000","amount":25,"senderName":"Admin"}"#;
        let req: BalanceMutationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.amount, 25);
        assert_eq!(req.sender_name.as_deref(), Some("Admin"));

        let json = r#"{"userId":"00000000-0000-0000-0000-000000000000","amount":5}"#;
        let req: BalanceMutationRequest = serde_json::from_str(json).unwrap();
        assert!(req.sender_name.is_none());
    }

    #[test]
    fn test_config_clamps() {
        let config = WalletConfig::default();
        assert_eq!(config.clamp_limit(None), 10);
        assert_eq!(config.clamp_limit(Some(0)), 1);
        assert_eq!(config.clamp_limit(Some(1000)), 100);
        assert_eq!(config.clamp_page(None), 1);
        assert_eq!(config.clamp_page(Some(0)), 1);
        assert_eq!(config.clamp_page(Some(7)), 7);
    }
}

// ============================================================================
// Error tests
// ============================================================================

mod error_tests {
    use crate::error::WalletError;
    use axum::http::StatusCode;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(WalletError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            WalletError::InvalidAmount("zero".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WalletError::InsufficientBalance {
                balance: 10,
                amount: 40
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(WalletError::TxnIdCollision.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            WalletError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_display() {
        assert!(WalletError::UserNotFound.to_string().contains("not found"));
        assert!(
            WalletError::InvalidAmount("must be positive".into())
                .to_string()
                .contains("positive")
        );
    }
}
