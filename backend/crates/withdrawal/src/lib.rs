//! Withdrawal Backend Module
//!
//! Withdrawal request lifecycle: pending until an admin resolves it to
//! completed, failed or rejected, exactly once.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, resolution value object, repository trait
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers
//!
//! ## Consistency Model
//! - Creating a request debits the user and records the debit in the ledger,
//!   all in one database transaction
//! - Resolution locks the request row, so two concurrent resolutions of the
//!   same request serialize and the loser sees a terminal status
//! - A failed or rejected resolution refunds the amount through the wallet
//!   crate's transactional delta primitive, inside the same transaction that
//!   flips the status; the refund and the status change commit together or
//!   not at all

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::WithdrawalConfig;
pub use error::{WithdrawalError, WithdrawalResult};
pub use infra::postgres::PgWithdrawalRepository;
pub use presentation::router::withdrawal_router;
