//! Domain Value Objects
//!
//! Immutable value types for the wallet domain.

use std::fmt;

/// Signed, non-zero balance delta.
///
/// The raw mutation contract is always signed; the HTTP boundary exposes
/// credit/debit wrappers that require a strictly positive amount and pick
/// the sign themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta(i64);

impl Delta {
    /// Create a signed delta. Zero is rejected.
    pub fn new(value: i64) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Positive-amount credit (balance increases by `amount`).
    pub fn credit(amount: i64) -> Option<Self> {
        if amount > 0 { Some(Self(amount)) } else { None }
    }

    /// Positive-amount debit (balance decreases by `amount`).
    pub fn debit(amount: i64) -> Option<Self> {
        if amount > 0 { Some(Self(-amount)) } else { None }
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_credit(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Ledger transaction identifier: `TXN_<millis>_<6 base36 chars>`.
///
/// Generated at entry creation; globally unique by primary key. A collision
/// on insert is treated as retryable with a freshly generated id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxnId(String);

const TXN_PREFIX: &str = "TXN_";
const TXN_SUFFIX_LEN: usize = 6;
const TXN_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

impl TxnId {
    /// Generate a new id from the current timestamp and a random suffix.
    pub fn generate() -> Self {
        use rand::Rng;

        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::rng();
        let suffix: String = (0..TXN_SUFFIX_LEN)
            .map(|_| TXN_ALPHABET[rng.random_range(0..TXN_ALPHABET.len())] as char)
            .collect();

        Self(format!("{TXN_PREFIX}{millis}_{suffix}"))
    }

    /// Wrap an id read back from storage.
    pub fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counterparty label recorded on a ledger entry. Defaults to "System".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderName(String);

impl SenderName {
    pub const DEFAULT: &'static str = "System";
    const MAX_LEN: usize = 64;

    /// Build from an optional caller-supplied label. Blank input falls back
    /// to the system default; overlong input is truncated.
    pub fn new(label: Option<String>) -> Self {
        let trimmed = label.as_deref().map(str::trim).unwrap_or("");
        if trimmed.is_empty() {
            return Self::system();
        }
        let mut value = trimmed.to_string();
        if value.len() > Self::MAX_LEN {
            let mut cut = Self::MAX_LEN;
            while !value.is_char_boundary(cut) {
                cut -= 1;
            }
            value.truncate(cut);
        }
        Self(value)
    }

    /// The system-default counterparty.
    pub fn system() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SenderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
