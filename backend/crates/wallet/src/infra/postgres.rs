//! PostgreSQL Repository Implementations
//!
//! `apply_delta_tx` is the transactional primitive shared with the
//! withdrawal crate: it pairs the atomic balance increment with the
//! ledger insert on one open transaction, so a caller can compose it
//! with its own writes and commit everything together.

use kernel::id::UserId;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::{BalanceChange, LedgerEntry, TransferRecord, User, WalletStats};
use crate::domain::repository::{
    BalanceRepository, LedgerQuery, LedgerRepository, UserQuery, UserQueryRepository,
};
use crate::domain::value_objects::{Delta, SenderName, TxnId};
use crate::error::{WalletError, WalletResult, is_unique_violation};

/// Transaction-id collision retries before giving up. Collisions need the
/// same millisecond plus the same 6-char random suffix, so one retry is
/// already generous.
const TXN_ID_RETRY: u32 = 3;

/// Apply a signed delta on an open transaction.
///
/// The balance write is an atomic increment (`balance = balance + $delta`),
/// never an application-side read-modify-write, so concurrent deltas against
/// one user cannot lose updates. The update is conditional on the balance
/// staying non-negative; a debit past zero matches no row and is rejected
/// without touching anything. The matching ledger entry is inserted on the
/// same transaction; if either statement fails the caller's transaction is
/// aborted and neither side becomes visible.
pub async fn apply_delta_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
    delta: Delta,
    sender: &SenderName,
) -> WalletResult<BalanceChange> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET balance = balance + $1,
            updated_at = now()
        WHERE user_id = $2
          AND balance + $1 >= 0
        RETURNING
            user_id,
            user_name,
            email,
            balance,
            is_active,
            created_at,
            updated_at
        "#,
    )
    .bind(delta.value())
    .bind(user_id.as_uuid())
    .fetch_optional(&mut **tx)
    .await?;

    let user = match row {
        Some(row) => row.into_user(),
        // No row matched: nonexistent user, or the debit would overdraw
        None => {
            let balance =
                sqlx::query_scalar::<_, i64>("SELECT balance FROM users WHERE user_id = $1")
                    .bind(user_id.as_uuid())
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(WalletError::UserNotFound)?;
            return Err(WalletError::InsufficientBalance {
                balance,
                amount: -delta.value(),
            });
        }
    };

    let entry = LedgerEntry::record(user.user_id, user.balance - delta.value(), delta, sender);

    sqlx::query(
        r#"
        INSERT INTO transfer_history (
            transaction_id,
            user_id,
            balance_before,
            balance_after,
            amount_changed,
            sender_name,
            created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry.transaction_id.as_str())
    .bind(entry.user_id.as_uuid())
    .bind(entry.balance_before)
    .bind(entry.balance_after)
    .bind(entry.amount_changed)
    .bind(&entry.sender_name)
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            WalletError::TxnIdCollision
        } else {
            WalletError::Database(e)
        }
    })?;

    Ok(BalanceChange { user, entry })
}

/// PostgreSQL-backed wallet repository
#[derive(Clone)]
pub struct PgWalletRepository {
    pool: PgPool,
}

impl PgWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BalanceRepository for PgWalletRepository {
    async fn find_user(&self, user_id: UserId) -> WalletResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                user_name,
                email,
                balance,
                is_active,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn apply_delta(
        &self,
        user_id: UserId,
        delta: Delta,
        sender: &SenderName,
    ) -> WalletResult<BalanceChange> {
        // A collision aborts the whole transaction, so the retry restarts
        // from begin() with a freshly generated id.
        let mut attempt = 0;
        loop {
            let mut tx = self.pool.begin().await?;

            match apply_delta_tx(&mut tx, user_id, delta, sender).await {
                Ok(change) => {
                    tx.commit().await?;
                    return Ok(change);
                }
                Err(WalletError::TxnIdCollision) if attempt + 1 < TXN_ID_RETRY => {
                    tx.rollback().await?;
                    attempt += 1;
                    tracing::warn!(
                        user_id = %user_id,
                        attempt = attempt,
                        "Transaction id collision, regenerating"
                    );
                }
                Err(e) => {
                    // Dropping tx rolls back
                    return Err(e);
                }
            }
        }
    }

    async fn set_active(&self, user_id: UserId, active: bool) -> WalletResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET is_active = $1,
                updated_at = now()
            WHERE user_id = $2
            RETURNING
                user_id,
                user_name,
                email,
                balance,
                is_active,
                created_at,
                updated_at
            "#,
        )
        .bind(active)
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }
}

impl LedgerRepository for PgWalletRepository {
    async fn list(&self, query: &LedgerQuery) -> WalletResult<(Vec<TransferRecord>, u64)> {
        let search = query.search.clone().unwrap_or_default();

        // Sort column and order come from whitelisted enums, never from
        // raw caller input.
        let list_sql = format!(
            r#"
            SELECT
                t.transaction_id,
                t.user_id,
                t.balance_before,
                t.balance_after,
                t.amount_changed,
                t.sender_name,
                t.created_at,
                u.user_name,
                u.email
            FROM transfer_history t
            JOIN users u ON u.user_id = t.user_id
            WHERE ($1 = ''
                OR t.transaction_id ILIKE '%' || $1 || '%'
                OR t.sender_name ILIKE '%' || $1 || '%'
                OR u.user_name ILIKE '%' || $1 || '%'
                OR u.email ILIKE '%' || $1 || '%')
            ORDER BY {} {}
            LIMIT $2 OFFSET $3
            "#,
            query.sort_by.as_column(),
            query.sort_order.as_sql(),
        );

        let rows = sqlx::query_as::<_, TransferRow>(&list_sql)
            .bind(&search)
            .bind(query.limit as i64)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transfer_history t
            JOIN users u ON u.user_id = t.user_id
            WHERE ($1 = ''
                OR t.transaction_id ILIKE '%' || $1 || '%'
                OR t.sender_name ILIKE '%' || $1 || '%'
                OR u.user_name ILIKE '%' || $1 || '%'
                OR u.email ILIKE '%' || $1 || '%')
            "#,
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let records = rows.into_iter().map(TransferRow::into_record).collect();

        Ok((records, total as u64))
    }
}

impl UserQueryRepository for PgWalletRepository {
    async fn list(&self, query: &UserQuery) -> WalletResult<(Vec<User>, u64)> {
        let search = query.search.clone().unwrap_or_default();

        let list_sql = format!(
            r#"
            SELECT
                user_id,
                user_name,
                email,
                balance,
                is_active,
                created_at,
                updated_at
            FROM users
            WHERE ($1 = ''
                OR user_name ILIKE '%' || $1 || '%'
                OR email ILIKE '%' || $1 || '%')
              AND ($2::BOOLEAN IS NULL OR is_active = $2)
            ORDER BY {} {}
            LIMIT $3 OFFSET $4
            "#,
            query.sort_by.as_column(),
            query.sort_order.as_sql(),
        );

        let rows = sqlx::query_as::<_, UserRow>(&list_sql)
            .bind(&search)
            .bind(query.is_active)
            .bind(query.limit as i64)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE ($1 = ''
                OR user_name ILIKE '%' || $1 || '%'
                OR email ILIKE '%' || $1 || '%')
              AND ($2::BOOLEAN IS NULL OR is_active = $2)
            "#,
        )
        .bind(&search)
        .bind(query.is_active)
        .fetch_one(&self.pool)
        .await?;

        let users = rows.into_iter().map(UserRow::into_user).collect();

        Ok((users, total as u64))
    }

    async fn stats(&self) -> WalletResult<WalletStats> {
        let (total_users, active_users, total_balance) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE is_active),
                    COALESCE(SUM(balance), 0)::BIGINT
                FROM users
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(WalletStats {
            total_users: total_users as u64,
            active_users: active_users as u64,
            total_balance,
        })
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    email: String,
    balance: i64,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            user_name: self.user_name,
            email: self.email,
            balance: self.balance,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TransferRow {
    transaction_id: String,
    user_id: Uuid,
    balance_before: i64,
    balance_after: i64,
    amount_changed: i64,
    sender_name: String,
    created_at: chrono::DateTime<chrono::Utc>,
    user_name: String,
    email: String,
}

impl TransferRow {
    fn into_record(self) -> TransferRecord {
        TransferRecord {
            entry: LedgerEntry {
                transaction_id: TxnId::from_raw(self.transaction_id),
                user_id: UserId::from_uuid(self.user_id),
                balance_before: self.balance_before,
                balance_after: self.balance_after,
                amount_changed: self.amount_changed,
                sender_name: self.sender_name,
                created_at: self.created_at,
            },
            user_name: self.user_name,
            email: self.email,
        }
    }
}
