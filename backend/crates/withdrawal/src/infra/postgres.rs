//! PostgreSQL Repository Implementation
//!
//! Resolution runs as: lock the request row, check it is still pending,
//! apply the refund (failed / rejected only) through the wallet crate's
//! transactional delta primitive, flip the status, commit. Either all of it
//! becomes visible or none of it does.

use chrono::{DateTime, Utc};
use kernel::id::{UserId, WithdrawalId};
use sqlx::PgPool;
use uuid::Uuid;
use wallet::domain::value_objects::{Delta, SenderName};
use wallet::{WalletError, apply_delta_tx};

use crate::domain::entities::{Resolution, Withdrawal, WithdrawalStatus, WithdrawalWithUser};
use crate::domain::repository::{WithdrawalQuery, WithdrawalRepository};
use crate::error::{WithdrawalError, WithdrawalResult};

/// Transaction-id collision retries before giving up. A collision aborts the
/// whole transaction, so each retry restarts from begin().
const TXN_ID_RETRY: u32 = 3;

/// PostgreSQL-backed withdrawal repository
#[derive(Clone)]
pub struct PgWithdrawalRepository {
    pool: PgPool,
}

impl PgWithdrawalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl WithdrawalRepository for PgWithdrawalRepository {
    async fn create(&self, user_id: UserId, amount: i64) -> WithdrawalResult<Withdrawal> {
        let delta = Delta::debit(amount).ok_or_else(|| {
            WalletError::InvalidAmount(format!(
                "withdrawal amount must be positive, got {amount}"
            ))
        })?;

        let mut attempt = 0;
        loop {
            let mut tx = self.pool.begin().await?;

            match apply_delta_tx(&mut tx, user_id, delta, &SenderName::system()).await {
                Ok(_) => {}
                Err(WalletError::TxnIdCollision) if attempt + 1 < TXN_ID_RETRY => {
                    tx.rollback().await?;
                    attempt += 1;
                    tracing::warn!(
                        user_id = %user_id,
                        attempt = attempt,
                        "Transaction id collision on withdrawal debit, regenerating"
                    );
                    continue;
                }
                Err(WalletError::InsufficientBalance { balance, amount }) => {
                    return Err(WithdrawalError::InsufficientBalance { balance, amount });
                }
                Err(e) => return Err(e.into()),
            }

            let withdrawal_id = WithdrawalId::new();
            let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
                r#"
                INSERT INTO withdrawal_requests (withdrawal_id, user_id, amount)
                VALUES ($1, $2, $3)
                RETURNING created_at
                "#,
            )
            .bind(withdrawal_id.as_uuid())
            .bind(user_id.as_uuid())
            .bind(amount)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;

            return Ok(Withdrawal {
                withdrawal_id,
                user_id,
                amount,
                status: WithdrawalStatus::Pending,
                created_at,
                resolved_at: None,
            });
        }
    }

    async fn resolve(
        &self,
        withdrawal_id: WithdrawalId,
        resolution: Resolution,
    ) -> WithdrawalResult<Withdrawal> {
        let mut attempt = 0;
        loop {
            let mut tx = self.pool.begin().await?;

            // Row lock serializes concurrent resolutions of the same request
            let row = sqlx::query_as::<_, WithdrawalRow>(
                r#"
                SELECT withdrawal_id, user_id, amount, status, created_at, resolved_at
                FROM withdrawal_requests
                WHERE withdrawal_id = $1
                FOR UPDATE
                "#,
            )
            .bind(withdrawal_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;

            let current = row.ok_or(WithdrawalError::NotFound)?.into_withdrawal()?;

            if current.status.is_terminal() {
                return Err(WithdrawalError::AlreadyResolved(current.status));
            }

            if resolution.refunds() {
                let refund = Delta::credit(current.amount).ok_or_else(|| {
                    WithdrawalError::Internal(format!(
                        "stored withdrawal amount not positive: {}",
                        current.amount
                    ))
                })?;

                match apply_delta_tx(&mut tx, current.user_id, refund, &SenderName::system())
                    .await
                {
                    Ok(_) => {}
                    Err(WalletError::TxnIdCollision) if attempt + 1 < TXN_ID_RETRY => {
                        tx.rollback().await?;
                        attempt += 1;
                        tracing::warn!(
                            withdrawal_id = %withdrawal_id,
                            attempt = attempt,
                            "Transaction id collision on refund, regenerating"
                        );
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            let updated = sqlx::query_as::<_, WithdrawalRow>(
                r#"
                UPDATE withdrawal_requests
                SET status = $1,
                    resolved_at = now()
                WHERE withdrawal_id = $2
                RETURNING withdrawal_id, user_id, amount, status, created_at, resolved_at
                "#,
            )
            .bind(resolution.as_status().id())
            .bind(withdrawal_id.as_uuid())
            .fetch_one(&mut *tx)
            .await?
            .into_withdrawal()?;

            tx.commit().await?;

            return Ok(updated);
        }
    }

    async fn find_with_user(
        &self,
        withdrawal_id: WithdrawalId,
    ) -> WithdrawalResult<Option<WithdrawalWithUser>> {
        let row = sqlx::query_as::<_, JoinedRow>(
            r#"
            SELECT
                w.withdrawal_id,
                w.user_id,
                w.amount,
                w.status,
                w.created_at,
                w.resolved_at,
                u.user_name,
                u.email,
                u.balance
            FROM withdrawal_requests w
            JOIN users u ON u.user_id = w.user_id
            WHERE w.withdrawal_id = $1
            "#,
        )
        .bind(withdrawal_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(JoinedRow::into_joined).transpose()
    }

    async fn list(
        &self,
        query: &WithdrawalQuery,
    ) -> WithdrawalResult<(Vec<WithdrawalWithUser>, u64)> {
        let search = query.search.clone().unwrap_or_default();
        let status = query.status.map(|s| s.id());

        let rows = sqlx::query_as::<_, JoinedRow>(
            r#"
            SELECT
                w.withdrawal_id,
                w.user_id,
                w.amount,
                w.status,
                w.created_at,
                w.resolved_at,
                u.user_name,
                u.email,
                u.balance
            FROM withdrawal_requests w
            JOIN users u ON u.user_id = w.user_id
            WHERE ($1::SMALLINT IS NULL OR w.status = $1)
              AND ($2 = ''
                OR u.user_name ILIKE '%' || $2 || '%'
                OR u.email ILIKE '%' || $2 || '%')
            ORDER BY w.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(status)
        .bind(&search)
        .bind(query.limit as i64)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM withdrawal_requests w
            JOIN users u ON u.user_id = w.user_id
            WHERE ($1::SMALLINT IS NULL OR w.status = $1)
              AND ($2 = ''
                OR u.user_name ILIKE '%' || $2 || '%'
                OR u.email ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(status)
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let withdrawals = rows
            .into_iter()
            .map(JoinedRow::into_joined)
            .collect::<WithdrawalResult<Vec<_>>>()?;

        Ok((withdrawals, total as u64))
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct WithdrawalRow {
    withdrawal_id: Uuid,
    user_id: Uuid,
    amount: i64,
    status: i16,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl WithdrawalRow {
    fn into_withdrawal(self) -> WithdrawalResult<Withdrawal> {
        let status = WithdrawalStatus::from_id(self.status).ok_or_else(|| {
            WithdrawalError::Internal(format!("unknown withdrawal status id: {}", self.status))
        })?;

        Ok(Withdrawal {
            withdrawal_id: WithdrawalId::from_uuid(self.withdrawal_id),
            user_id: UserId::from_uuid(self.user_id),
            amount: self.amount,
            status,
            created_at: self.created_at,
            resolved_at: self.resolved_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct JoinedRow {
    withdrawal_id: Uuid,
    user_id: Uuid,
    amount: i64,
    status: i16,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
    user_name: String,
    email: String,
    balance: i64,
}

impl JoinedRow {
    fn into_joined(self) -> WithdrawalResult<WithdrawalWithUser> {
        let row = WithdrawalRow {
            withdrawal_id: self.withdrawal_id,
            user_id: self.user_id,
            amount: self.amount,
            status: self.status,
            created_at: self.created_at,
            resolved_at: self.resolved_at,
        };

        Ok(WithdrawalWithUser {
            withdrawal: row.into_withdrawal()?,
            user_name: self.user_name,
            email: self.email,
            balance: self.balance,
        })
    }
}
