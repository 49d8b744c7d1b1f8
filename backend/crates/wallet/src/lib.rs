//! Wallet Backend Module
//!
//! Balance mutation with a mandatory audit trail.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the query cache
//! - `infra/` - PostgreSQL implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Consistency Model
//! - A user balance is only ever written through `apply_delta`, which pairs
//!   the atomic balance increment with a `transfer_history` insert in one
//!   database transaction
//! - Ledger entries are append-only; there is no update or delete path
//! - Concurrent deltas against one user are serialized by the storage-level
//!   increment, never by application-side read-modify-write

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::cache::{CacheScope, QueryCache};
pub use application::config::WalletConfig;
pub use error::{WalletError, WalletResult};
pub use infra::postgres::{PgWalletRepository, apply_delta_tx};
pub use presentation::router::wallet_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
