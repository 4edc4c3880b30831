//! Error taxonomy for the sales core.
//!
//! Three distinct categories drive the caller's reaction:
//!
//! - [`ValidationError`]: bad input, fix and retry immediately. Never touches
//!   shared mutable state.
//! - [`SalesError::Busy`]: the sale lock was not acquired within its bound.
//!   Transient; retry after a short delay.
//! - [`SalesError::Transaction`]: a persistence primitive failed mid-flight.
//!   The sale was not committed (a consumed sequence value may be left as an
//!   acceptable gap). Never retried silently by the coordinator.

use crate::types::{ClientId, EventId};
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a persistence primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store is unreachable or rejected the operation.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored document violated the shape this crate expects.
    #[error("corrupt store document: {0}")]
    Corrupt(String),
}

/// Input problems detected before entering the critical section.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Quantity of units must be strictly positive.
    #[error("quantity must be positive")]
    NonPositiveQuantity,

    /// The requested event does not exist in the catalog.
    #[error("unknown event: {0}")]
    UnknownEvent(EventId),

    /// The requested event exists but is not open for sales.
    #[error("event {0} is not open for sales")]
    EventNotSellable(EventId),

    /// The requested client does not exist in the registry.
    #[error("unknown client: {0}")]
    UnknownClient(ClientId),

    /// The sale would grant more cards than the numbering space holds,
    /// which would make the allocated ranges overlap themselves.
    #[error("sale of {requested} cards exceeds the numbering space of {limit}")]
    TooManyCards {
        /// Cards the sale asked for (`units * cards_per_unit`)
        requested: u64,
        /// Size of the event's numbering space
        limit: u32,
    },
}

/// Errors returned by the sale transaction coordinator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SalesError {
    /// A precondition failed; shared state was not touched.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The exclusive sale section could not be acquired within its bound.
    #[error("system busy: sale lock not acquired within {0:?}")]
    Busy(Duration),

    /// A store primitive failed while the sale was in flight.
    #[error("transaction failed: {0}")]
    Transaction(#[from] StoreError),
}

impl SalesError {
    /// Whether the caller may retry the same request unchanged.
    ///
    /// Only [`SalesError::Busy`] is transient; validation errors need a
    /// corrected request and transaction failures need escalation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let error = ValidationError::UnknownEvent(EventId::new(9));
        assert_eq!(format!("{error}"), "unknown event: 9");

        let error = ValidationError::UnknownClient(ClientId::new(3));
        assert!(format!("{error}").contains("CLI3"));
    }

    #[test]
    fn busy_error_mentions_the_bound() {
        let error = SalesError::Busy(Duration::from_secs(8));
        let display = format!("{error}");
        assert!(display.contains("busy"));
        assert!(display.contains("8s"));
    }

    #[test]
    fn transaction_error_wraps_store_error() {
        let error = SalesError::from(StoreError::Backend("connection reset".into()));
        let display = format!("{error}");
        assert!(display.starts_with("transaction failed"));
        assert!(display.contains("connection reset"));
    }

    #[test]
    fn only_busy_is_retryable() {
        assert!(SalesError::Busy(Duration::from_secs(1)).is_retryable());
        assert!(!SalesError::Validation(ValidationError::NonPositiveQuantity).is_retryable());
        assert!(!SalesError::Transaction(StoreError::Backend(String::new())).is_retryable());
    }
}
