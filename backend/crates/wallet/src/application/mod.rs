//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations and the read-through query cache.

pub mod apply_delta;
pub mod cache;
pub mod config;
pub mod list_transfers;
pub mod list_users;
pub mod moderate_user;
pub mod stats;
