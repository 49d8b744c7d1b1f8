//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (User, LedgerEntry)
//! - Domain value objects (Delta, TxnId, SenderName)
//! - Repository traits (interfaces) and their query types

pub mod entities;
pub mod repository;
pub mod value_objects;
