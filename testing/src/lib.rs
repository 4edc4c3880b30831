//! # Cartela Testing
//!
//! Testing utilities for the Cartela sales core.
//!
//! This crate provides:
//! - In-memory implementations of every `cartela-core` store contract
//! - Failure and latency injection for exercising error paths
//! - A fixed clock for deterministic timestamps
//!
//! ## Example
//!
//! ```
//! use cartela_testing::{mocks::test_clock, InMemorySalesStore};
//! use cartela_core::store::SequenceStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(InMemorySalesStore::with_clock(Arc::new(test_clock())));
//! assert_eq!(store.next("sales").await.unwrap_or_default(), 1);
//! assert_eq!(store.next("sales").await.unwrap_or_default(), 2);
//! # }
//! ```

use chrono::{DateTime, Utc};
use cartela_core::clock::Clock;

pub mod memory;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use cartela_testing::mocks::FixedClock;
    /// use cartela_core::clock::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use memory::{InMemoryClientRegistry, InMemoryEventCatalog, InMemorySalesStore};
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use cartela_core::store::{CursorStore, SequenceStore};
    use cartela_core::types::EventId;
    use std::sync::Arc;

    #[test]
    fn fixed_clock_is_frozen() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[tokio::test]
    async fn counters_start_at_one_and_are_independent() {
        let store = InMemorySalesStore::new();
        assert_eq!(store.next("sales").await, Ok(1));
        assert_eq!(store.next("sales").await, Ok(2));
        assert_eq!(store.next("clients").await, Ok(1));
    }

    #[tokio::test]
    async fn cursor_upsert_starts_at_the_starting_number() {
        let store = InMemorySalesStore::with_clock(Arc::new(test_clock()));
        let event_id = EventId::new(1);

        // First advance creates the cursor at position 50 and returns it.
        assert_eq!(store.advance(event_id, 10, 100, 50).await, Ok(50));

        let cursor = store.load(event_id).await.unwrap_or_default();
        assert_eq!(cursor.map(|c| c.next_position), Some(60));
    }

    #[tokio::test]
    async fn cursor_wraps_within_one_to_limit() {
        let store = InMemorySalesStore::new();
        let event_id = EventId::new(2);

        assert_eq!(store.advance(event_id, 5, 10, 8).await, Ok(8));
        let cursor = store.load(event_id).await.unwrap_or_default();
        // 8 + 5 = 13 exceeds the limit, so the cursor wraps to 3, never 0.
        assert_eq!(cursor.map(|c| c.next_position), Some(3));
    }

    #[tokio::test]
    async fn cursor_landing_exactly_on_limit_stays_at_limit() {
        let store = InMemorySalesStore::new();
        let event_id = EventId::new(3);

        assert_eq!(store.advance(event_id, 9, 10, 1).await, Ok(1));
        let cursor = store.load(event_id).await.unwrap_or_default();
        // 1 + 9 = 10 does not exceed the limit; position 10 is still valid.
        assert_eq!(cursor.map(|c| c.next_position), Some(10));
    }
}
