//! Configuration for the sale coordinator.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Lock acquisition bounds for the sales subsystem.
///
/// The bounded waits are the system's only admission control: a request that
/// cannot take its lock within the bound is rejected as busy instead of
/// queueing indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesConfig {
    /// How long a sale request may wait for the process-wide sale lock
    pub sale_lock_timeout: Duration,
    /// How long an ID issuance request may wait for its issuance lock
    pub id_lock_timeout: Duration,
}

impl SalesConfig {
    /// Load configuration from environment variables.
    ///
    /// - `SALE_LOCK_TIMEOUT_SECS` (default: 8)
    /// - `ID_LOCK_TIMEOUT_SECS` (default: 5)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            sale_lock_timeout: Duration::from_secs(
                env::var("SALE_LOCK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8),
            ),
            id_lock_timeout: Duration::from_secs(
                env::var("ID_LOCK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            sale_lock_timeout: Duration::from_secs(8),
            id_lock_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_bounds() {
        let config = SalesConfig::default();
        assert_eq!(config.sale_lock_timeout, Duration::from_secs(8));
        assert_eq!(config.id_lock_timeout, Duration::from_secs(5));
    }
}
