//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Withdrawal, WithdrawalStatus, Resolution)
//! - Repository trait (interface) and its query types

pub mod entities;
pub mod repository;
