//! Domain Entities
//!
//! Core business entities for the withdrawal domain.

use std::fmt;

use chrono::{DateTime, Utc};
use kernel::id::{UserId, WithdrawalId};

/// Lifecycle state of a withdrawal request.
///
/// Stored as a SMALLINT id. Pending is the only non-terminal state; a
/// request leaves it exactly once and never comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum WithdrawalStatus {
    Pending = 0,
    Completed = 1,
    Failed = 2,
    Rejected = 3,
}

impl WithdrawalStatus {
    /// Storage id
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(WithdrawalStatus::Pending),
            1 => Some(WithdrawalStatus::Completed),
            2 => Some(WithdrawalStatus::Failed),
            3 => Some(WithdrawalStatus::Rejected),
            _ => None,
        }
    }

    /// Wire label used in the API
    pub fn code(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Completed => "completed",
            WithdrawalStatus::Failed => "failed",
            WithdrawalStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, WithdrawalStatus::Pending)
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Admin decision on a pending request. Only terminal outcomes are
/// expressible, so a resolution can never move a request back to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Completed,
    Failed,
    Rejected,
}

impl Resolution {
    /// Parse a wire label. Anything else is rejected by the caller.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "completed" => Some(Resolution::Completed),
            "failed" => Some(Resolution::Failed),
            "rejected" => Some(Resolution::Rejected),
            _ => None,
        }
    }

    /// Failed and rejected give the debited amount back to the user.
    pub fn refunds(&self) -> bool {
        matches!(self, Resolution::Failed | Resolution::Rejected)
    }

    pub fn as_status(&self) -> WithdrawalStatus {
        match self {
            Resolution::Completed => WithdrawalStatus::Completed,
            Resolution::Failed => WithdrawalStatus::Failed,
            Resolution::Rejected => WithdrawalStatus::Rejected,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_status().code())
    }
}

/// Withdrawal request entity.
///
/// `resolved_at` is set exactly when the status leaves pending.
#[derive(Debug, Clone)]
pub struct Withdrawal {
    pub withdrawal_id: WithdrawalId,
    pub user_id: UserId,
    pub amount: i64,
    pub status: WithdrawalStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// A withdrawal joined with its requesting user, for listings and responses.
#[derive(Debug, Clone)]
pub struct WithdrawalWithUser {
    pub withdrawal: Withdrawal,
    pub user_name: String,
    pub email: String,
    pub balance: i64,
}
