//! Withdrawal Error Types
//!
//! This module provides withdrawal-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;
use wallet::WalletError;

use crate::domain::entities::WithdrawalStatus;

/// Withdrawal-specific result type alias
pub type WithdrawalResult<T> = Result<T, WithdrawalError>;

/// Withdrawal-specific error variants
#[derive(Debug, Error)]
pub enum WithdrawalError {
    /// Request does not exist
    #[error("Withdrawal request not found")]
    NotFound,

    /// Request was already resolved; resolution happens exactly once
    #[error("Request is already {0}")]
    AlreadyResolved(WithdrawalStatus),

    /// Caller asked for a status outside completed / failed / rejected
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// User balance cannot cover the requested amount
    #[error("Insufficient balance: {balance} available, {amount} requested")]
    InsufficientBalance { balance: i64, amount: i64 },

    /// Error surfaced by the wallet crate (debit, refund, user lookup)
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WithdrawalError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WithdrawalError::NotFound => StatusCode::NOT_FOUND,
            WithdrawalError::AlreadyResolved(_) => StatusCode::CONFLICT,
            WithdrawalError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            WithdrawalError::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
            WithdrawalError::Wallet(e) => e.status_code(),
            WithdrawalError::Database(_) | WithdrawalError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WithdrawalError::NotFound => ErrorKind::NotFound,
            WithdrawalError::AlreadyResolved(_) => ErrorKind::Conflict,
            WithdrawalError::InvalidStatus(_) => ErrorKind::BadRequest,
            WithdrawalError::InsufficientBalance { .. } => ErrorKind::BadRequest,
            WithdrawalError::Wallet(e) => e.kind(),
            WithdrawalError::Database(_) | WithdrawalError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            WithdrawalError::Database(e) => {
                tracing::error!(error = %e, "Withdrawal database error");
            }
            WithdrawalError::Internal(msg) => {
                tracing::error!(message = %msg, "Withdrawal internal error");
            }
            WithdrawalError::Wallet(e) => {
                tracing::error!(error = %e, "Wallet error during withdrawal operation");
            }
            _ => {
                tracing::debug!(error = %self, "Withdrawal error");
            }
        }
    }
}

impl From<WithdrawalError> for AppError {
    fn from(err: WithdrawalError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            WithdrawalError::InvalidStatus(_) => AppError::new(kind, message)
                .with_action("Use one of: completed, failed, rejected"),
            _ => AppError::new(kind, message),
        }
    }
}

impl IntoResponse for WithdrawalError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
