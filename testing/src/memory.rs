//! In-memory implementations of the `cartela-core` store and collaborator
//! contracts.
//!
//! [`InMemorySalesStore`] backs all three persistence traits with plain maps
//! behind one mutex, which trivially gives every primitive the atomicity the
//! contracts demand. The store also carries two injection knobs for failure
//! tests: an artificial insert delay (to keep the sale lock held past its
//! bound) and a forced-failure switch for inserts.

use cartela_core::clock::{Clock, SystemClock};
use cartela_core::directory::{ClientRegistry, EventCatalog};
use cartela_core::error::StoreError;
use cartela_core::store::{CursorStore, SaleStore, SequenceStore, StoreFuture};
use cartela_core::types::{
    Client, ClientId, Event, EventId, EventTicketCursor, SaleRecord,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct StoreInner {
    counters: HashMap<String, u64>,
    cursors: HashMap<EventId, EventTicketCursor>,
    sales: HashMap<EventId, Vec<SaleRecord>>,
}

/// In-memory sequence counters, ticket cursors, and sale partitions.
pub struct InMemorySalesStore {
    inner: Mutex<StoreInner>,
    clock: Arc<dyn Clock>,
    insert_delay: Mutex<Option<Duration>>,
    fail_inserts: AtomicBool,
}

impl InMemorySalesStore {
    /// Creates an empty store stamping cursors with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store stamping cursors with the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            clock,
            insert_delay: Mutex::new(None),
            fail_inserts: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent [`SaleStore::insert`] sleep for `delay` before
    /// touching the store. Used to hold the coordinator's sale lock past its
    /// acquisition bound.
    pub fn delay_inserts(&self, delay: Duration) {
        *lock(&self.insert_delay) = Some(delay);
    }

    /// Makes every subsequent [`SaleStore::insert`] fail with a backend
    /// error without writing anything.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Number of sale records in an event's partition.
    #[must_use]
    pub fn partition_len(&self, event_id: EventId) -> usize {
        lock(&self.inner)
            .sales
            .get(&event_id)
            .map_or(0, Vec::len)
    }
}

impl Default for InMemorySalesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceStore for InMemorySalesStore {
    fn next(&self, name: &str) -> StoreFuture<'_, u64> {
        let name = name.to_owned();
        Box::pin(async move {
            let mut inner = lock(&self.inner);
            let counter = inner.counters.entry(name).or_insert(0);
            *counter += 1;
            Ok(*counter)
        })
    }
}

impl CursorStore for InMemorySalesStore {
    fn advance(
        &self,
        event_id: EventId,
        quantity: u32,
        limit: u32,
        starting_number: u32,
    ) -> StoreFuture<'_, u32> {
        Box::pin(async move {
            let now = self.clock.now();
            let mut inner = lock(&self.inner);
            let cursor = inner
                .cursors
                .entry(event_id)
                .or_insert_with(|| EventTicketCursor {
                    event_id,
                    next_position: starting_number,
                    last_update: now,
                });

            let previous = cursor.next_position;
            let sum = u64::from(previous) + u64::from(quantity);
            let next = if sum > u64::from(limit) {
                sum - u64::from(limit)
            } else {
                sum
            };
            cursor.next_position = u32::try_from(next).map_err(|_| {
                StoreError::Corrupt(format!(
                    "cursor for event {event_id} advanced past u32 range"
                ))
            })?;
            cursor.last_update = now;
            Ok(previous)
        })
    }

    fn load(&self, event_id: EventId) -> StoreFuture<'_, Option<EventTicketCursor>> {
        Box::pin(async move { Ok(lock(&self.inner).cursors.get(&event_id).copied()) })
    }
}

impl SaleStore for InMemorySalesStore {
    fn insert(&self, record: SaleRecord) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let delay = *lock(&self.insert_delay);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("insert failure injected".into()));
            }
            lock(&self.inner)
                .sales
                .entry(record.event_id)
                .or_default()
                .push(record);
            Ok(())
        })
    }

    fn sales_for_client(
        &self,
        event_id: EventId,
        client_id: ClientId,
    ) -> StoreFuture<'_, Vec<SaleRecord>> {
        Box::pin(async move {
            let inner = lock(&self.inner);
            let records = inner
                .sales
                .get(&event_id)
                .map(|partition| {
                    partition
                        .iter()
                        .filter(|record| record.client_id == client_id)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            Ok(records)
        })
    }
}

/// In-memory event catalog for tests.
#[derive(Default)]
pub struct InMemoryEventCatalog {
    events: Mutex<HashMap<EventId, Event>>,
}

impl InMemoryEventCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an event.
    pub fn put(&self, event: Event) {
        lock(&self.events).insert(event.id, event);
    }
}

impl EventCatalog for InMemoryEventCatalog {
    fn event(&self, id: EventId) -> StoreFuture<'_, Option<Event>> {
        Box::pin(async move { Ok(lock(&self.events).get(&id).cloned()) })
    }
}

/// In-memory client registry for tests.
///
/// The last-purchase write hook can be told to fail, to exercise the
/// coordinator's non-fatal side-effect path.
#[derive(Default)]
pub struct InMemoryClientRegistry {
    clients: Mutex<HashMap<ClientId, Client>>,
    fail_purchase_updates: AtomicBool,
}

impl InMemoryClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a client.
    pub fn put(&self, client: Client) {
        lock(&self.clients).insert(client.id, client);
    }

    /// Makes every subsequent `record_purchase` fail with a backend error.
    pub fn fail_purchase_updates(&self, fail: bool) {
        self.fail_purchase_updates.store(fail, Ordering::SeqCst);
    }

    /// Reads a client's last recorded purchase time.
    #[must_use]
    pub fn last_purchase_at(&self, id: ClientId) -> Option<DateTime<Utc>> {
        lock(&self.clients)
            .get(&id)
            .and_then(|client| client.last_purchase_at)
    }
}

impl ClientRegistry for InMemoryClientRegistry {
    fn client(&self, id: ClientId) -> StoreFuture<'_, Option<Client>> {
        Box::pin(async move { Ok(lock(&self.clients).get(&id).cloned()) })
    }

    fn record_purchase(&self, id: ClientId, at: DateTime<Utc>) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            if self.fail_purchase_updates.load(Ordering::SeqCst) {
                return Err(StoreError::Backend(
                    "purchase update failure injected".into(),
                ));
            }
            let mut clients = lock(&self.clients);
            let client = clients
                .get_mut(&id)
                .ok_or_else(|| StoreError::Backend(format!("no such client: {id}")))?;
            client.last_purchase_at = Some(at);
            Ok(())
        })
    }
}
