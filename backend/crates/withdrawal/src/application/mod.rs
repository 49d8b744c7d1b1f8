//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod list_withdrawals;
pub mod request_withdrawal;
pub mod resolve;
