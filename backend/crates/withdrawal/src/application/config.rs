//! Application Configuration

/// Withdrawal application configuration
#[derive(Debug, Clone)]
pub struct WithdrawalConfig {
    /// Page size when the caller omits `limit`
    pub default_page_size: u32,
    /// Upper bound enforced on caller-supplied `limit`
    pub max_page_size: u32,
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl WithdrawalConfig {
    /// Clamp a caller-supplied limit into `1..=max_page_size`.
    pub fn clamp_limit(&self, limit: Option<u32>) -> u32 {
        limit
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }

    /// Normalize a caller-supplied page to 1-based.
    pub fn clamp_page(&self, page: Option<u32>) -> u32 {
        page.unwrap_or(1).max(1)
    }
}
