//! Wallet Error Types
//!
//! This module provides wallet-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Wallet-specific result type alias
pub type WalletResult<T> = Result<T, WalletError>;

/// Wallet-specific error variants
///
/// These are domain-specific errors that map to appropriate HTTP status codes
/// and can be converted to `AppError` for unified error handling.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Subject user does not exist
    #[error("User not found")]
    UserNotFound,

    /// Rejected amount or delta (zero, negative where positive required, ...)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Debit would drive the balance below zero
    #[error("Insufficient balance: {balance} available, {amount} requested")]
    InsufficientBalance { balance: i64, amount: i64 },

    /// Generated transaction id collided, retries exhausted
    #[error("Transaction id collision")]
    TxnIdCollision,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WalletError::UserNotFound => StatusCode::NOT_FOUND,
            WalletError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            WalletError::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
            WalletError::TxnIdCollision => StatusCode::CONFLICT,
            WalletError::Database(_) | WalletError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::UserNotFound => ErrorKind::NotFound,
            WalletError::InvalidAmount(_) => ErrorKind::BadRequest,
            WalletError::InsufficientBalance { .. } => ErrorKind::BadRequest,
            WalletError::TxnIdCollision => ErrorKind::Conflict,
            WalletError::Database(_) | WalletError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            WalletError::Database(e) => {
                tracing::error!(error = %e, "Wallet database error");
            }
            WalletError::Internal(msg) => {
                tracing::error!(message = %msg, "Wallet internal error");
            }
            WalletError::TxnIdCollision => {
                tracing::warn!("Transaction id collision after retries");
            }
            _ => {
                tracing::debug!(error = %self, "Wallet error");
            }
        }
    }
}

/// True when the error is a unique-violation on the ledger primary key.
/// The caller treats this as retryable with a regenerated transaction id.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            WalletError::InvalidAmount(_) => AppError::new(kind, message)
                .with_action("Provide a positive whole-koin amount"),
            _ => AppError::new(kind, message),
        }
    }
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
