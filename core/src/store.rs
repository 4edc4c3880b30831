//! Persistence contracts for counters, cursors, and sale records.
//!
//! The shared mutable state of the whole system is exactly two kinds of
//! document: named sequence counters and per-event ticket cursors. Both are
//! mutated only through the atomic primitives below; callers never
//! read-modify-write the raw values. Sale records are immutable inserts into
//! a per-event partition.
//!
//! # Implementations
//!
//! - `InMemorySalesStore` (in `cartela-testing`): deterministic, in-process
//! - A document store such as `MongoDB` supplies all three primitives
//!   natively (`findOneAndUpdate` with upsert, plain inserts)
//!
//! # Dyn Compatibility
//!
//! The traits use explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` so they can be held as trait objects (`Arc<dyn SequenceStore>`)
//! by the coordinator.

use crate::error::StoreError;
use crate::types::{ClientId, EventId, EventTicketCursor, SaleRecord};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by every store primitive.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Named, atomically-incrementing integer counters.
///
/// One counter exists per logical entity (`"sales"`, `"clients"`,
/// `"collaborators"`, `"events"`). Counters are created on first use and
/// never deleted.
pub trait SequenceStore: Send + Sync {
    /// Atomically increments the named counter and returns the **new** value.
    ///
    /// A counter that does not exist yet behaves as if its prior value were
    /// 0, so the first call returns 1. Two concurrent calls on the same name
    /// never return the same value, and values are never reused; a gap can
    /// only appear when a caller obtains a value and then fails to use it.
    /// No ordering is guaranteed across different names.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store is unreachable or the
    /// update fails; no partial increment is ever observable.
    fn next(&self, name: &str) -> StoreFuture<'_, u64>;
}

/// Per-event cyclic cursor documents.
///
/// The cursor holds the next unallocated position of the event's numbering
/// space `[1, limit]` and is the allocation subsystem's only mutable state.
pub trait CursorStore: Send + Sync {
    /// Atomically advances the event's cursor and returns its **previous**
    /// position.
    ///
    /// In one indivisible step: if no cursor document exists for `event_id`,
    /// one is created with `starting_number` as its position (so the event's
    /// first sale begins exactly where the catalog says it should); then,
    /// with current position `c`, the new position becomes `c + quantity -
    /// limit` when `c + quantity` exceeds `limit`, else `c + quantity`; the
    /// previous position `c` is returned. The stored position therefore
    /// always remains in `[1, limit]` for `quantity <= limit`.
    ///
    /// Making `starting_number` the upsert's initial value is what keeps two
    /// concurrent first-time sales on a brand-new event from both observing a
    /// generic default and overlapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the atomic step fails; no partial cursor
    /// update is ever observable.
    fn advance(
        &self,
        event_id: EventId,
        quantity: u32,
        limit: u32,
        starting_number: u32,
    ) -> StoreFuture<'_, u32>;

    /// Loads the cursor document for an event, if one exists yet.
    ///
    /// Read-only; intended for inspection and tests, not for allocation
    /// decisions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store is unreachable.
    fn load(&self, event_id: EventId) -> StoreFuture<'_, Option<EventTicketCursor>>;
}

/// Append-only sale record partitions, one per event.
pub trait SaleStore: Send + Sync {
    /// Inserts an immutable sale record into its event's partition.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the insert fails; the record is then absent
    /// (never half-written).
    fn insert(&self, record: SaleRecord) -> StoreFuture<'_, ()>;

    /// Loads all of one client's sale records for one event, in commit order.
    ///
    /// Returns an empty vector for a client with no sales yet. Each call
    /// observes a consistent snapshot but is not isolated from concurrent
    /// writers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store is unreachable.
    fn sales_for_client(
        &self,
        event_id: EventId,
        client_id: ClientId,
    ) -> StoreFuture<'_, Vec<SaleRecord>>;
}
